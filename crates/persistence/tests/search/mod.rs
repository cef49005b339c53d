//! Search behaviour tests.
//!
//! Ranges, sorting, visibility after refresh, field mapping and
//! document extraction.

pub mod extraction_tests;
pub mod range_tests;
pub mod registry_tests;
pub mod sort_tests;
pub mod visibility_tests;
