//! The harvest control loop.
//!
//! One [`HarvestSession`] per source. The session negotiates capabilities,
//! then pages through GetRecords results, storing every record through the
//! [`Catalogue`]. A page that cannot be used moves the session one rung down
//! the retry ladder and the same page is requested again; when the ladder is
//! exhausted the session fails with the first error it saw. Pages stored
//! before a failure stay stored and visible.

use std::sync::Arc;

use chrono::Utc;
use geocat_model::MetadataRecord;
use geocat_persistence::{Catalogue, StoreOutcome};
use url::Url;

use crate::capabilities::Capabilities;
use crate::error::{HarvestError, HarvestResult};
use crate::protocol::ProtocolVersion;
use crate::request::{GetRecordsBuilder, Rung, capabilities_probe, capabilities_request, source_url};
use crate::response::RecordsPage;
use crate::session::{HarvestReport, HarvestState};
use crate::transport::{RemoteRequest, Transport};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Harvests remote catalogues into a local one.
#[derive(Clone)]
pub struct Harvester {
    transport: Arc<dyn Transport>,
    catalogue: Arc<Catalogue>,
    page_size: usize,
}

impl Harvester {
    /// Creates a harvester.
    pub fn new(transport: Arc<dyn Transport>, catalogue: Arc<Catalogue>) -> Self {
        Self {
            transport,
            catalogue,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the page size. Values below 1 are raised to 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// The page size in use.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The catalogue records are stored into.
    pub fn catalogue(&self) -> &Arc<Catalogue> {
        &self.catalogue
    }

    /// Starts a session for a source.
    pub fn session(&self, source: &str) -> HarvestSession<'_> {
        HarvestSession {
            harvester: self,
            state: HarvestState::Idle,
            report: HarvestReport::new(source),
            first_error: None,
        }
    }

    /// Harvests a source to completion.
    pub async fn harvest(&self, source: &str) -> HarvestResult<HarvestReport> {
        self.session(source).run().await
    }
}

impl std::fmt::Debug for Harvester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harvester")
            .field("catalogue", &self.catalogue)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// One harvest of one source.
pub struct HarvestSession<'a> {
    harvester: &'a Harvester,
    state: HarvestState,
    report: HarvestReport,
    first_error: Option<HarvestError>,
}

impl HarvestSession<'_> {
    /// Current state.
    pub fn state(&self) -> HarvestState {
        self.state
    }

    /// The report so far.
    pub fn report(&self) -> &HarvestReport {
        &self.report
    }

    fn transition(&mut self, next: HarvestState) {
        tracing::debug!(
            session = %self.report.session_id,
            from = %self.state,
            to = %next,
            "Harvest state transition"
        );
        self.state = next;
    }

    fn remember(&mut self, error: HarvestError) {
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }

    fn fail(&mut self) -> HarvestError {
        self.transition(HarvestState::Failed);
        self.report.finished_at = Some(Utc::now());
        let error = self
            .first_error
            .take()
            .unwrap_or_else(|| HarvestError::remote("harvest failed without a captured error", None));
        tracing::warn!(
            session = %self.report.session_id,
            source = %self.report.source,
            error = %error,
            "Harvest failed"
        );
        error
    }

    /// Runs the session to a terminal state.
    pub async fn run(&mut self) -> HarvestResult<HarvestReport> {
        if self.state.is_terminal() {
            return Err(HarvestError::remote(
                format!("session already {}", self.state),
                None,
            ));
        }

        let source = match source_url(&self.report.source) {
            Ok(url) => url,
            Err(e) => {
                self.remember(e);
                return Err(self.fail());
            }
        };
        tracing::info!(
            session = %self.report.session_id,
            source = %source,
            page_size = self.harvester.page_size,
            "Harvest started"
        );

        self.transition(HarvestState::Negotiating);
        let capabilities = match self.negotiate(&source).await {
            Some(caps) => caps,
            None => return Err(self.fail()),
        };
        // Negotiation errors are not pagination errors.
        self.first_error = None;

        let builder = GetRecordsBuilder::new(&source, &capabilities, self.harvester.page_size);
        self.report.protocol_version = Some(capabilities.version);
        self.report.output_schema = Some(builder.output_schema().to_string());
        tracing::info!(
            session = %self.report.session_id,
            version = %capabilities.version,
            output_schema = %builder.output_schema(),
            endpoint = %builder.endpoint(),
            quirks = ?capabilities.quirks.product,
            "Capabilities negotiated"
        );

        self.paginate(&builder, &capabilities).await?;

        self.transition(HarvestState::Completed);
        self.report.finished_at = Some(Utc::now());
        tracing::info!(
            session = %self.report.session_id,
            inserted = self.report.inserted,
            updated = self.report.updated,
            failed = self.report.failed,
            pages = self.report.pages,
            "Harvest completed"
        );
        Ok(self.report.clone())
    }

    /// Probe with GET, then POST each version in preference order.
    async fn negotiate(&mut self, source: &Url) -> Option<Capabilities> {
        let mut attempts: Vec<(RemoteRequest, ProtocolVersion)> =
            vec![(capabilities_probe(source), ProtocolVersion::V2_0_2)];
        attempts.extend(
            ProtocolVersion::PREFERENCE
                .into_iter()
                .map(|v| (capabilities_request(source, v), v)),
        );

        for (request, version) in attempts {
            let result = match self.harvester.transport.send(&request).await {
                Ok(response) => Capabilities::parse(&response.body, version).map_err(HarvestError::from),
                Err(e) => Err(HarvestError::from(e)),
            };
            match result {
                Ok(caps) => return Some(caps),
                Err(e) => {
                    tracing::debug!(
                        session = %self.report.session_id,
                        method = %request.method,
                        version = %version,
                        error = %e,
                        "Capabilities attempt failed"
                    );
                    self.remember(e);
                }
            }
        }
        None
    }

    async fn paginate(
        &mut self,
        builder: &GetRecordsBuilder,
        capabilities: &Capabilities,
    ) -> HarvestResult<()> {
        let catalogue = Arc::clone(&self.harvester.catalogue);
        let registry = Arc::clone(catalogue.indexer().registry());
        let mut rung = Rung::Constrained;
        let mut start_position = 1;
        self.report.rungs_tried.push(rung);

        loop {
            self.transition(HarvestState::Paginating {
                rung,
                start_position,
            });

            let request = builder.build(start_position, rung);
            let outcome = match self.harvester.transport.send(&request).await {
                Ok(response) => RecordsPage::parse(&response.body, &registry).map_err(HarvestError::from),
                Err(e) => Err(HarvestError::from(e)),
            };

            let mut page = match outcome {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        session = %self.report.session_id,
                        rung = ?rung,
                        start_position,
                        error = %e,
                        "Page attempt failed"
                    );
                    self.remember(e);
                    match rung.next() {
                        Some(next) => {
                            if next == Rung::AlternateLanguage && !capabilities.supports_language("CQL_TEXT") {
                                tracing::debug!(
                                    session = %self.report.session_id,
                                    "Peer does not advertise CQL_TEXT, trying it anyway"
                                );
                            }
                            rung = next;
                            self.report.rungs_tried.push(rung);
                            continue;
                        }
                        None => return Err(self.fail()),
                    }
                }
            };

            for record in std::mem::take(&mut page.records) {
                let identifier = record.identifier().to_string();
                match catalogue.put(Arc::new(record)).await {
                    Ok(StoreOutcome::Inserted) => self.report.inserted += 1,
                    Ok(StoreOutcome::Updated) => self.report.updated += 1,
                    Err(e) => {
                        tracing::warn!(
                            session = %self.report.session_id,
                            record_id = %identifier,
                            error = %e,
                            "Skipping harvested record"
                        );
                        self.report.failed += 1;
                    }
                }
            }
            self.report.failed += page.unidentified;
            self.report.pages += 1;
            catalogue.refresh();

            tracing::debug!(
                session = %self.report.session_id,
                start_position,
                returned = page.returned,
                matched = page.matched,
                next_record = ?page.next_record,
                "Page stored"
            );

            if !page.has_more(start_position) {
                return Ok(());
            }
            start_position += page.returned;
        }
    }
}
