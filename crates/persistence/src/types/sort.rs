//! Sort keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which pre-computed representation a sort uses.
///
/// The caller chooses. Sorting a numeric field as `Text` orders `"10"`
/// before `"9"`; that is the documented behaviour, not a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortValueType {
    /// Lexical order of the lower-cased value.
    Text,
    /// Numeric order.
    Number,
    /// Chronological order.
    Date,
}

impl FromStr for SortValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "string" => Ok(SortValueType::Text),
            "number" | "numeric" | "double" | "integer" => Ok(SortValueType::Number),
            "date" | "datetime" => Ok(SortValueType::Date),
            _ => Err(format!("unknown sort value type: {}", s)),
        }
    }
}

impl fmt::Display for SortValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortValueType::Text => f.write_str("text"),
            SortValueType::Number => f.write_str("number"),
            SortValueType::Date => f.write_str("date"),
        }
    }
}

/// A validated sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Canonical field name.
    pub field: String,
    /// Ascending when true.
    pub ascending: bool,
    /// Representation to sort on.
    pub value_type: SortValueType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_type() {
        assert_eq!("numeric".parse::<SortValueType>().unwrap(), SortValueType::Number);
        assert_eq!("String".parse::<SortValueType>().unwrap(), SortValueType::Text);
        assert!("colour".parse::<SortValueType>().is_err());
    }
}
