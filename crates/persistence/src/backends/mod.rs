//! Record storage backends.
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`MemoryRecordStorage`] | Process-local map, used by the CLI and tests |
//!
//! [`RecordFileLoader`] reads record files into any backend.

pub mod directory;
pub mod memory;

pub use directory::{LoadedRecords, RecordFileLoader};
pub use memory::MemoryRecordStorage;
