//! Command-line and environment configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GEOCAT_LOG_LEVEL` | info | Log level |
//! | `GEOCAT_PAGE_SIZE` | 20 | Harvest page size (1 to 1000) |
//! | `GEOCAT_HTTP_TIMEOUT` | 30 | Remote request timeout (seconds) |
//! | `GEOCAT_QUERYABLES` | | JSON file of extra queryable definitions |
//! | `GEOCAT_RECORDS_DIR` | | Directory of records loaded at start-up |

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use geocat_persistence::search::{LoaderError, QueryableLoader, QueryableRegistry, Vocabulary};

/// Largest accepted harvest page size.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Command line of the `geocat` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "geocat")]
#[command(about = "Geospatial metadata catalogue")]
#[command(version)]
pub struct Cli {
    /// Shared settings.
    #[command(flatten)]
    pub config: CatalogueConfig,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct CatalogueConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "GEOCAT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Records requested per harvest page.
    #[arg(long, global = true, env = "GEOCAT_PAGE_SIZE", default_value = "20")]
    pub page_size: usize,

    /// Remote request timeout in seconds.
    #[arg(long, global = true, env = "GEOCAT_HTTP_TIMEOUT", default_value = "30")]
    pub http_timeout: u64,

    /// JSON file of extra queryable definitions.
    #[arg(long, global = true, env = "GEOCAT_QUERYABLES")]
    pub queryables: Option<PathBuf>,

    /// Directory of `.json`/`.xml` records loaded before the command runs.
    #[arg(long, global = true, env = "GEOCAT_RECORDS_DIR")]
    pub records_dir: Option<PathBuf>,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            page_size: 20,
            http_timeout: 30,
            queryables: None,
            records_dir: None,
        }
    }
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List queryable fields.
    Queryables {
        /// Only fields mapped in this vocabulary (iso, dublincore, ebrim, inspire).
        #[arg(long)]
        vocabulary: Option<Vocabulary>,
    },

    /// Load and index records, then report counts.
    Index {
        /// File or directory of records.
        #[arg(long)]
        records: Option<PathBuf>,

        /// Print the indexed document of this record.
        #[arg(long)]
        dump: Option<String>,
    },

    /// Search loaded records.
    Search {
        /// File or directory of records.
        #[arg(long)]
        records: Option<PathBuf>,

        /// Textual constraint; empty matches everything.
        #[arg(long, short, default_value = "")]
        query: String,

        /// Sort as `Field[:asc|desc[:text|number|date]]`.
        #[arg(long)]
        sort: Option<String>,

        /// 1-based position of the first result.
        #[arg(long, default_value = "1")]
        start: usize,

        /// Maximum results returned.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Harvest a remote CSW catalogue.
    Harvest {
        /// Catalogue endpoint URL.
        url: String,
    },
}

impl CatalogueConfig {
    /// Validates the configuration, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            errors.push(format!(
                "Page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            ));
        }

        if self.http_timeout == 0 {
            errors.push("HTTP timeout cannot be 0".to_string());
        }

        if let Some(path) = &self.queryables {
            if !path.is_file() {
                errors.push(format!("Queryables file not found: {}", path.display()));
            }
        }

        if let Some(path) = &self.records_dir {
            if !path.exists() {
                errors.push(format!("Records directory not found: {}", path.display()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Remote request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Builds the queryable registry, with the overlay file when configured.
    pub fn registry(&self) -> Result<QueryableRegistry, LoaderError> {
        let mut loader = QueryableLoader::new();
        if let Some(path) = &self.queryables {
            loader = loader.with_config(path);
        }
        QueryableRegistry::load_all(&loader)
    }
}
