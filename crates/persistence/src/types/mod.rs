//! Core types for the persistence layer.
//!
//! - [`IndexedDocument`], [`IndexValue`], [`SortValues`] - the searchable form of a record
//! - [`StructuredQuery`], [`Predicate`], [`ChainOp`] - serial filter chains
//! - [`SortKey`], [`SortValueType`] - caller-selected sort representation
//! - [`Envelope`], [`SpatialPredicate`], [`TemporalOperator`] - spatial and temporal filters
//! - [`Pagination`], [`SearchPage`] - paged results
//!
//! # Building a query by hand
//!
//! ```
//! use geocat_persistence::types::{
//!     Envelope, Predicate, SpatialOperator, SpatialPredicate, StructuredQuery, TermMatch,
//! };
//!
//! let query = StructuredQuery::new()
//!     .and(Predicate::Term {
//!         field: "Title".to_string(),
//!         matcher: TermMatch::Token("ocean".to_string()),
//!     })
//!     .not(Predicate::Spatial(SpatialPredicate {
//!         envelope: Envelope::new(-10.0, 35.0, 30.0, 70.0),
//!         operator: SpatialOperator::Intersects,
//!     }));
//!
//! assert_eq!(query.links().len(), 2);
//! ```

mod document;
mod pagination;
mod query;
mod sort;
mod spatial;

pub use document::{IndexValue, IndexedDocument, SortValues};
pub use pagination::{Pagination, SearchPage};
pub use query::{
    ChainLink, ChainOp, Predicate, RangeBound, StructuredQuery, TermMatch, ValueRange,
    WildcardPattern,
};
pub use sort::{SortKey, SortValueType};
pub use spatial::{Envelope, SpatialOperator, SpatialPredicate, TemporalOperator};
