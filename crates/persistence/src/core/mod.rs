//! Storage traits and the catalogue facade.
//!
//! - [`RecordStorage`] - authoritative record storage
//! - [`Catalogue`] - storage plus search index behind one API

pub mod catalogue;
pub mod storage;

pub use catalogue::Catalogue;
pub use storage::{RecordStorage, SharedRecord, StoreOutcome};
