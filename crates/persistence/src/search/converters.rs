//! Value converters for the document index.
//!
//! Converts primitives reached by path evaluation into [`IndexValue`]s of the
//! queryable field's type. Dates from every standard end up in one canonical
//! `yyyyMMddHHmmss` UTC form, so the indexer and query side never see native
//! date representations.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, Utc};
use geocat_model::Primitive;

use crate::types::IndexValue;

use super::registry::FieldType;

const CANONICAL_FORMAT: &str = "%Y%m%d%H%M%S";

/// Converts extracted primitives to index values.
pub struct ValueConverter;

impl ValueConverter {
    /// Converts a primitive to the given field type.
    ///
    /// Returns `None` when the primitive cannot represent the type; the value
    /// is then left out of the document.
    pub fn convert(value: &Primitive, field_type: FieldType) -> Option<IndexValue> {
        match field_type {
            FieldType::Text => {
                let text = value.to_string();
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| IndexValue::text(trimmed))
            }
            FieldType::Number => value
                .as_f64()
                .filter(|n| n.is_finite())
                .map(IndexValue::Number),
            FieldType::Date => Self::convert_date(value).map(IndexValue::Date),
            FieldType::Boolean => Self::convert_boolean(value).map(IndexValue::Boolean),
        }
    }

    /// Converts a query literal to the given field type.
    pub fn convert_literal(literal: &str, field_type: FieldType) -> Option<IndexValue> {
        Self::convert(&Primitive::text(literal), field_type)
    }

    fn convert_date(value: &Primitive) -> Option<String> {
        match value {
            Primitive::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.format(CANONICAL_FORMAT).to_string()),
            Primitive::DateTime(dt) => Some(
                dt.with_timezone(&Utc)
                    .format(CANONICAL_FORMAT)
                    .to_string(),
            ),
            Primitive::Text(s) => canonical_date(s),
            _ => None,
        }
    }

    fn convert_boolean(value: &Primitive) -> Option<bool> {
        match value {
            Primitive::Boolean(b) => Some(*b),
            Primitive::Integer(1) => Some(true),
            Primitive::Integer(0) => Some(false),
            Primitive::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Normalises a textual date to canonical `yyyyMMddHHmmss` UTC.
///
/// Partial dates are padded to the first instant they denote: `2020-05`
/// becomes `20200501000000`. Values with an offset are converted to UTC;
/// values without one are taken as UTC.
pub fn canonical_date(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).format(CANONICAL_FORMAT).to_string());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y%m%d%H%M%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.format(CANONICAL_FORMAT).to_string());
        }
    }

    let padded = match s.len() {
        4 if s.chars().all(|c| c.is_ascii_digit()) => format!("{}-01-01", s),
        7 if s.as_bytes().get(4) == Some(&b'-') => format!("{}-01", s),
        _ => s.to_string(),
    };

    for format in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(&padded, format) {
            return d
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.format(CANONICAL_FORMAT).to_string());
        }
    }

    None
}

/// Normalises a textual date to the last instant of the period it denotes.
///
/// `2010` becomes `20101231235959`, `2010-02` becomes `20100228235959` and a
/// plain day ends at `23:59:59`. Values with a time of day are unchanged.
pub fn canonical_date_end(input: &str) -> Option<String> {
    let s = input.trim();
    let end_of_day = |d: NaiveDate| {
        d.and_hms_opt(23, 59, 59)
            .map(|dt| dt.format(CANONICAL_FORMAT).to_string())
    };

    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        let year = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 12, 31).and_then(end_of_day);
    }
    if s.len() == 7 && s.as_bytes().get(4) == Some(&b'-') {
        let first = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()?;
        return first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .and_then(end_of_day);
    }
    for format in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return end_of_day(d);
        }
    }

    canonical_date(s)
}
