//! Command implementations.
//!
//! Every command returns its output as text so the binary only has to print
//! it and tests can inspect it.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use geocat_harvest::{Harvester, HttpTransport};
use geocat_model::MetadataRecord as _;
use geocat_persistence::backends::{MemoryRecordStorage, RecordFileLoader};
use geocat_persistence::search::{QueryableRegistry, Vocabulary};
use geocat_persistence::{Catalogue, Pagination, StoreOutcome};
use tracing::{info, warn};

use crate::config::{CatalogueConfig, Cli, Command};

/// Counts from loading record files into a catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records stored for the first time.
    pub inserted: usize,
    /// Records that replaced one with the same identifier.
    pub updated: usize,
    /// Files or records that could not be loaded.
    pub failed: usize,
}

/// Runs a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = cli.config;
    let registry = Arc::new(
        config
            .registry()
            .context("failed to load queryable definitions")?,
    );

    match cli.command {
        Command::Queryables { vocabulary } => Ok(queryables(&registry, vocabulary)),
        Command::Index { records, dump } => {
            let records = records_path(records, &config)?;
            index(registry, &records, dump.as_deref()).await
        }
        Command::Search {
            records,
            query,
            sort,
            start,
            max,
        } => {
            let records = records_path(records, &config)?;
            let pagination = Pagination::new(start, max)?;
            search(registry, &records, &query, sort.as_deref(), pagination).await
        }
        Command::Harvest { url } => harvest(&config, registry, &url).await,
    }
}

fn records_path(explicit: Option<PathBuf>, config: &CatalogueConfig) -> anyhow::Result<PathBuf> {
    match explicit.or_else(|| config.records_dir.clone()) {
        Some(path) => Ok(path),
        None => bail!("no records given: pass --records or set GEOCAT_RECORDS_DIR"),
    }
}

/// Lists queryable fields, one per line: name, type, flags.
pub fn queryables(registry: &QueryableRegistry, vocabulary: Option<Vocabulary>) -> String {
    let fields: Vec<_> = match vocabulary {
        Some(vocabulary) => registry.queryables(vocabulary),
        None => registry.fields().collect(),
    };

    let mut out = String::new();
    for field in fields {
        let mut flags = Vec::new();
        if field.is_multi_valued() {
            flags.push("multi");
        }
        if field.is_sortable() {
            flags.push("sortable");
        }
        let _ = writeln!(out, "{}\t{}\t{}", field.name(), field.field_type(), flags.join(","));
    }
    out.trim_end().to_string()
}

/// Creates a catalogue and loads record files into it.
pub async fn load_catalogue(
    registry: Arc<QueryableRegistry>,
    path: &Path,
) -> anyhow::Result<(Catalogue, LoadSummary)> {
    let loaded = RecordFileLoader::new(&registry)
        .load_lenient(path)
        .with_context(|| format!("failed to read records from {}", path.display()))?;

    let catalogue = Catalogue::new(Arc::new(MemoryRecordStorage::new()), registry);
    let mut summary = LoadSummary {
        failed: loaded.skipped.len(),
        ..Default::default()
    };

    for record in loaded.records {
        let identifier = record.identifier().to_string();
        match catalogue.put(record).await {
            Ok(StoreOutcome::Inserted) => summary.inserted += 1,
            Ok(StoreOutcome::Updated) => summary.updated += 1,
            Err(e) => {
                warn!(record_id = %identifier, error = %e, "Skipping record");
                summary.failed += 1;
            }
        }
    }
    catalogue.refresh();

    info!(
        path = %path.display(),
        inserted = summary.inserted,
        updated = summary.updated,
        failed = summary.failed,
        "Records loaded"
    );
    Ok((catalogue, summary))
}

async fn index(
    registry: Arc<QueryableRegistry>,
    path: &Path,
    dump: Option<&str>,
) -> anyhow::Result<String> {
    let (catalogue, summary) = load_catalogue(registry, path).await?;

    if let Some(identifier) = dump {
        return match catalogue.indexer().dump(identifier)? {
            Some(json) => Ok(json),
            None => bail!("record not indexed: {}", identifier),
        };
    }

    Ok(format!(
        "indexed {} records ({} inserted, {} updated, {} failed)",
        summary.inserted + summary.updated,
        summary.inserted,
        summary.updated,
        summary.failed
    ))
}

async fn search(
    registry: Arc<QueryableRegistry>,
    path: &Path,
    query: &str,
    sort: Option<&str>,
    pagination: Pagination,
) -> anyhow::Result<String> {
    let (catalogue, _) = load_catalogue(registry, path).await?;
    let page = catalogue.search(query, sort, pagination)?;

    let mut out = format!(
        "{} matched, showing {} from {}",
        page.total,
        page.identifiers.len(),
        page.start
    );
    for identifier in &page.identifiers {
        let _ = write!(out, "\n{}", identifier);
    }
    if page.next_record > 0 {
        let _ = write!(out, "\nnext: {}", page.next_record);
    }
    Ok(out)
}

async fn harvest(
    config: &CatalogueConfig,
    registry: Arc<QueryableRegistry>,
    url: &str,
) -> anyhow::Result<String> {
    let catalogue = match &config.records_dir {
        Some(path) => load_catalogue(registry, path).await?.0,
        None => Catalogue::new(Arc::new(MemoryRecordStorage::new()), registry),
    };

    let transport = HttpTransport::new(config.timeout())?;
    let report = Harvester::new(Arc::new(transport), Arc::new(catalogue))
        .with_page_size(config.page_size)
        .harvest(url)
        .await?;

    Ok(serde_json::to_string_pretty(&report)?)
}
