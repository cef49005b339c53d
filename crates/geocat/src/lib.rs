//! The geocat metadata catalogue.
//!
//! Wires the queryable registry, record storage, search index and harvester
//! behind a command line:
//!
//! - `queryables` lists the searchable fields
//! - `index` loads records and reports what was indexed
//! - `search` runs a textual constraint over loaded records
//! - `harvest` replicates a remote CSW catalogue

pub mod commands;
pub mod config;

pub use commands::run;
pub use config::{CatalogueConfig, Cli, Command};

/// Installs the tracing subscriber. `RUST_LOG` overrides `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "geocat={level},geocat_persistence={level},geocat_harvest={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
