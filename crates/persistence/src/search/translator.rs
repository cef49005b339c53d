//! Query translation.
//!
//! Turns textual constraints, spatial filters, temporal filters and sort
//! requests into validated [`StructuredQuery`] parts. Every field name is
//! checked against the registry, so an unknown field is reported as
//! [`SearchError::NotQueryable`] instead of silently matching nothing.
//!
//! Range bounds are coerced to the field's type before comparison: on a
//! numeric field `[5 TO 25]` compares numbers, never strings.

use std::sync::Arc;

use crate::error::SearchError;
use crate::types::{
    Envelope, IndexValue, Predicate, RangeBound, SortKey, SortValueType, SpatialOperator,
    SpatialPredicate, StructuredQuery, TemporalOperator, TermMatch, ValueRange, WildcardPattern,
};

use super::converters::{ValueConverter, canonical_date, canonical_date_end};
use super::query_parser::{QueryParser, RawBound, RawClause, RawTerm};
use super::registry::{ANY_TEXT, FieldType, QueryableField, QueryableRegistry};

/// Translates requests into structured queries.
#[derive(Debug, Clone)]
pub struct QueryTranslator {
    registry: Arc<QueryableRegistry>,
}

impl QueryTranslator {
    /// Creates a translator over a registry.
    pub fn new(registry: Arc<QueryableRegistry>) -> Self {
        Self { registry }
    }

    /// Parses a textual constraint. An empty constraint matches everything.
    pub fn parse(&self, constraint: &str) -> Result<StructuredQuery, SearchError> {
        let mut query = StructuredQuery::new();
        for (op, clause) in QueryParser::parse(constraint)? {
            let predicate = self.clause_predicate(clause)?;
            query = query.push(op, predicate);
        }
        tracing::trace!(constraint, links = query.links().len(), "Parsed constraint");
        Ok(query)
    }

    fn field(&self, name: &str) -> Result<&QueryableField, SearchError> {
        Ok(self.registry.field(name)?)
    }

    fn clause_predicate(&self, clause: RawClause) -> Result<Predicate, SearchError> {
        match clause {
            RawClause::Term { field, term } => {
                let field = self.field(field.as_deref().unwrap_or(ANY_TEXT))?;
                self.term_predicate(field, term)
            }
            RawClause::Range {
                field,
                lower,
                upper,
                fragment,
            } => {
                let field = self.field(&field)?;
                let range = ValueRange {
                    lower: coerce_bound(field, lower, false, &fragment)?,
                    upper: coerce_bound(field, upper, true, &fragment)?,
                };
                Ok(Predicate::Range {
                    field: field.name().to_string(),
                    range,
                })
            }
        }
    }

    fn term_predicate(&self, field: &QueryableField, term: RawTerm) -> Result<Predicate, SearchError> {
        let name = field.name().to_string();

        if let RawTerm::Word(word) = &term {
            if word == "*" {
                return Ok(Predicate::Exists { field: name });
            }
            if word.contains(['*', '?']) {
                if field.field_type() != FieldType::Text {
                    return Err(SearchError::malformed(
                        word.as_str(),
                        format!("wildcards apply to text fields only, {} is {}", name, field.field_type()),
                    ));
                }
                let pattern = WildcardPattern::new(word)
                    .map_err(|e| SearchError::malformed(word.as_str(), e.to_string()))?;
                return Ok(Predicate::Term {
                    field: name,
                    matcher: TermMatch::Wildcard(pattern),
                });
            }
        }

        if field.field_type() == FieldType::Text {
            let matcher = match term {
                RawTerm::Phrase(p) => TermMatch::Phrase(p),
                RawTerm::Word(w) => TermMatch::Token(w),
            };
            return Ok(Predicate::Term {
                field: name,
                matcher,
            });
        }

        let literal = match term {
            RawTerm::Phrase(p) | RawTerm::Word(p) => p,
        };
        let value = coerce(field, &literal, &literal)?;
        Ok(Predicate::Range {
            field: name,
            range: ValueRange::exact(value),
        })
    }

    /// Validates a spatial filter.
    pub fn translate_spatial(
        &self,
        envelope: Envelope,
        operator: SpatialOperator,
    ) -> Result<SpatialPredicate, SearchError> {
        if !envelope.is_valid() {
            return Err(SearchError::malformed(
                format!(
                    "{} {} {} {}",
                    envelope.min_x, envelope.min_y, envelope.max_x, envelope.max_y
                ),
                "envelope corners are out of order or not finite",
            ));
        }
        Ok(SpatialPredicate { envelope, operator })
    }

    /// Translates a temporal filter on a date field into a range predicate.
    pub fn translate_temporal(
        &self,
        field: &str,
        operator: &TemporalOperator,
    ) -> Result<Predicate, SearchError> {
        let field = self.field(field)?;
        if field.field_type() != FieldType::Date {
            return Err(SearchError::malformed(
                field.name(),
                "temporal operators apply to date fields only",
            ));
        }

        let date = |instant: &str| -> Result<IndexValue, SearchError> {
            canonical_date(instant)
                .map(IndexValue::Date)
                .ok_or_else(|| SearchError::malformed(instant, "not a recognisable date"))
        };

        let range = match operator {
            TemporalOperator::After(t) => ValueRange {
                lower: RangeBound::Exclusive(date(t)?),
                upper: RangeBound::Unbounded,
            },
            TemporalOperator::Before(t) => ValueRange {
                lower: RangeBound::Unbounded,
                upper: RangeBound::Exclusive(date(t)?),
            },
            TemporalOperator::During(begin, end) => ValueRange {
                lower: RangeBound::Exclusive(date(begin)?),
                upper: RangeBound::Exclusive(date(end)?),
            },
            TemporalOperator::TEquals(t) => ValueRange::exact(date(t)?),
        };

        Ok(Predicate::Range {
            field: field.name().to_string(),
            range,
        })
    }

    /// Validates a sort request.
    pub fn translate_sort(
        &self,
        field: &str,
        ascending: bool,
        value_type: SortValueType,
    ) -> Result<SortKey, SearchError> {
        let field = self.field(field)?;
        if !field.is_sortable() {
            return Err(SearchError::NotSortable {
                field: field.name().to_string(),
            });
        }
        Ok(SortKey {
            field: field.name().to_string(),
            ascending,
            value_type,
        })
    }

    /// Parses `Field[:asc|desc[:text|number|date]]`.
    ///
    /// Without an explicit type the field's own type decides.
    pub fn parse_sort(&self, request: &str) -> Result<SortKey, SearchError> {
        let mut parts = request.split(':').map(str::trim);
        let name = parts.next().filter(|n| !n.is_empty()).ok_or_else(|| {
            SearchError::malformed(request, "sort needs a field name")
        })?;

        let ascending = match parts.next().map(str::to_lowercase).as_deref() {
            None | Some("asc") | Some("a") => true,
            Some("desc") | Some("d") => false,
            Some(other) => {
                return Err(SearchError::malformed(
                    request,
                    format!("unknown sort direction '{}'", other),
                ));
            }
        };

        let value_type = match parts.next() {
            Some(t) => t
                .parse::<SortValueType>()
                .map_err(|e| SearchError::malformed(request, e))?,
            None => match self.field(name)?.field_type() {
                FieldType::Number => SortValueType::Number,
                FieldType::Date => SortValueType::Date,
                FieldType::Text | FieldType::Boolean => SortValueType::Text,
            },
        };

        self.translate_sort(name, ascending, value_type)
    }
}

fn coerce(field: &QueryableField, literal: &str, fragment: &str) -> Result<IndexValue, SearchError> {
    ValueConverter::convert_literal(literal, field.field_type()).ok_or_else(|| {
        SearchError::malformed(
            fragment,
            format!("'{}' is not a valid {} for {}", literal, field.field_type(), field.name()),
        )
    })
}

/// Coerces a range bound. A partial date that should include its whole
/// period (an inclusive upper or exclusive lower bound) takes the period's
/// last instant.
fn coerce_bound(
    field: &QueryableField,
    bound: RawBound,
    upper: bool,
    fragment: &str,
) -> Result<RangeBound, SearchError> {
    let period_end = |literal: &str| -> Result<IndexValue, SearchError> {
        if field.field_type() != FieldType::Date {
            return coerce(field, literal, fragment);
        }
        canonical_date_end(literal).map(IndexValue::Date).ok_or_else(|| {
            SearchError::malformed(
                fragment,
                format!("'{}' is not a valid date for {}", literal, field.name()),
            )
        })
    };

    Ok(match bound {
        RawBound::Open => RangeBound::Unbounded,
        RawBound::Inclusive(v) if upper => RangeBound::Inclusive(period_end(&v)?),
        RawBound::Exclusive(v) if !upper => RangeBound::Exclusive(period_end(&v)?),
        RawBound::Inclusive(v) => RangeBound::Inclusive(coerce(field, &v, fragment)?),
        RawBound::Exclusive(v) => RangeBound::Exclusive(coerce(field, &v, fragment)?),
    })
}
