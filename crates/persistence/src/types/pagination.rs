//! Paged search results.
//!
//! Positions follow catalogue conventions: the first record is at position 1
//! and a `next_record` of 0 means there is nothing left.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Paging request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based position of the first record to return.
    pub start: usize,
    /// Maximum number of records to return.
    pub max: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { start: 1, max: 10 }
    }
}

impl Pagination {
    /// Creates a paging request.
    pub fn new(start: usize, max: usize) -> Result<Self, SearchError> {
        if start == 0 {
            return Err(SearchError::InvalidPagination {
                message: "start position is 1-based".to_string(),
            });
        }
        Ok(Self { start, max })
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total number of matching records.
    pub total: usize,
    /// Position of the first identifier in this page.
    pub start: usize,
    /// Identifiers on this page, in result order.
    pub identifiers: Vec<String>,
    /// Position of the next page, or 0 when exhausted.
    pub next_record: usize,
}

impl SearchPage {
    /// Cuts one page out of a complete, ordered result list.
    pub fn slice(all: Vec<String>, pagination: Pagination) -> Self {
        let total = all.len();
        let identifiers: Vec<String> = all
            .into_iter()
            .skip(pagination.start - 1)
            .take(pagination.max)
            .collect();
        let end = pagination.start - 1 + identifiers.len();
        let next_record = if end < total { end + 1 } else { 0 };
        Self {
            total,
            start: pagination.start,
            identifiers,
            next_record,
        }
    }
}
