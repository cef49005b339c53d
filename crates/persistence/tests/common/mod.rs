//! Shared fixtures for the catalogue integration tests.

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;
