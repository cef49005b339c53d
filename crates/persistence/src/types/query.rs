//! Structured queries.
//!
//! A [`StructuredQuery`] is a serial chain of filters: each link is combined
//! with the partial result of the links before it, strictly left to right.
//! `a OR b AND c` therefore means `(a OR b) AND c`; there is no precedence and
//! no grouping.

use std::fmt;

use regex::Regex;

use super::document::IndexValue;
use super::spatial::SpatialPredicate;

/// How a link combines with the partial result before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainOp {
    /// Keep documents matching both.
    And,
    /// Keep documents matching either.
    Or,
    /// Remove documents matching this link (AND NOT).
    Not,
}

impl fmt::Display for ChainOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainOp::And => f.write_str("AND"),
            ChainOp::Or => f.write_str("OR"),
            ChainOp::Not => f.write_str("NOT"),
        }
    }
}

/// A glob-style pattern (`*`, `?`) compiled to a regular expression.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    pattern: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compiles a glob pattern; matching is case-insensitive.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let mut expr = String::from("(?i)^");
        for c in pattern.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(&other.to_string())),
            }
        }
        expr.push('$');
        Ok(Self {
            pattern: pattern.to_string(),
            regex: Regex::new(&expr)?,
        })
    }

    /// The original pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns true if the whole text matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

/// How a term is compared with text values.
#[derive(Debug, Clone, PartialEq)]
pub enum TermMatch {
    /// The value's words equal the phrase's words, case-insensitively. On
    /// `AnyText` the words need only occur contiguously.
    Phrase(String),
    /// One word of the value equals the token, case-insensitively.
    Token(String),
    /// The whole value or one of its words matches the pattern.
    Wildcard(WildcardPattern),
}

/// One end of a range.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBound {
    /// No limit.
    Unbounded,
    /// Limit included (`[` / `]`).
    Inclusive(IndexValue),
    /// Limit excluded (`{` / `}`).
    Exclusive(IndexValue),
}

impl RangeBound {
    /// The bound value, if any.
    pub fn value(&self) -> Option<&IndexValue> {
        match self {
            RangeBound::Unbounded => None,
            RangeBound::Inclusive(v) | RangeBound::Exclusive(v) => Some(v),
        }
    }
}

/// A typed value range; both bounds were coerced to the field's type.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRange {
    /// Lower bound.
    pub lower: RangeBound,
    /// Upper bound.
    pub upper: RangeBound,
}

impl ValueRange {
    /// A range matching exactly one value.
    pub fn exact(value: IndexValue) -> Self {
        Self {
            lower: RangeBound::Inclusive(value.clone()),
            upper: RangeBound::Inclusive(value),
        }
    }
}

/// A single filter in the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every document.
    All,
    /// Text comparison on a field.
    Term {
        /// Canonical field name.
        field: String,
        /// How to compare.
        matcher: TermMatch,
    },
    /// The field has at least one value.
    Exists {
        /// Canonical field name.
        field: String,
    },
    /// Typed range comparison on a field.
    Range {
        /// Canonical field name.
        field: String,
        /// The range.
        range: ValueRange,
    },
    /// Spatial comparison on the document geometry.
    Spatial(SpatialPredicate),
}

/// One link of the serial chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainLink {
    /// Combination with the previous partial result. On the first link,
    /// `Not` negates the predicate and `And`/`Or` take it as-is.
    pub op: ChainOp,
    /// The filter.
    pub predicate: Predicate,
}

/// A parsed and validated query.
///
/// An empty chain matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredQuery {
    links: Vec<ChainLink>,
}

impl StructuredQuery {
    /// Creates a query matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a link.
    pub fn push(mut self, op: ChainOp, predicate: Predicate) -> Self {
        self.links.push(ChainLink { op, predicate });
        self
    }

    /// Appends an AND link.
    pub fn and(self, predicate: Predicate) -> Self {
        self.push(ChainOp::And, predicate)
    }

    /// Appends an OR link.
    pub fn or(self, predicate: Predicate) -> Self {
        self.push(ChainOp::Or, predicate)
    }

    /// Appends a NOT link.
    pub fn not(self, predicate: Predicate) -> Self {
        self.push(ChainOp::Not, predicate)
    }

    /// The links in evaluation order.
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    /// Returns true if the query has no filters.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Folds per-link match results left to right.
    pub fn combine<F>(&self, mut matches: F) -> bool
    where
        F: FnMut(&Predicate) -> bool,
    {
        let mut links = self.links.iter();
        let Some(first) = links.next() else {
            return true;
        };
        let mut acc = match first.op {
            ChainOp::Not => !matches(&first.predicate),
            ChainOp::And | ChainOp::Or => matches(&first.predicate),
        };
        for link in links {
            acc = match link.op {
                ChainOp::And => acc && matches(&link.predicate),
                ChainOp::Or => acc || matches(&link.predicate),
                ChainOp::Not => acc && !matches(&link.predicate),
            };
        }
        acc
    }
}
