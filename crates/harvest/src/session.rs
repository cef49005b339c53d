//! Harvest session state and report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::protocol::ProtocolVersion;
use crate::request::Rung;

/// Where a harvest session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum HarvestState {
    /// Not started.
    Idle,
    /// Asking the peer for its capabilities.
    Negotiating,
    /// Requesting a page of records.
    Paginating {
        /// Active constraint strategy.
        rung: Rung,
        /// 1-based position of the page.
        start_position: usize,
    },
    /// Every page was retrieved.
    Completed,
    /// The harvest gave up.
    Failed,
}

impl HarvestState {
    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, HarvestState::Completed | HarvestState::Failed)
    }
}

impl fmt::Display for HarvestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestState::Idle => write!(f, "idle"),
            HarvestState::Negotiating => write!(f, "negotiating"),
            HarvestState::Paginating {
                rung,
                start_position,
            } => write!(f, "paginating({}, start={})", rung, start_position),
            HarvestState::Completed => write!(f, "completed"),
            HarvestState::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a completed harvest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestReport {
    /// Correlates the session's log lines.
    pub session_id: Uuid,
    /// The harvested source.
    pub source: String,
    /// Records stored for the first time.
    pub inserted: usize,
    /// Records that replaced an existing one.
    pub updated: usize,
    /// Records removed locally. Always 0: deletions are not replicated.
    pub deleted: usize,
    /// Records that could not be identified or stored.
    pub failed: usize,
    /// Pages retrieved.
    pub pages: usize,
    /// Rungs used, in order.
    pub rungs_tried: Vec<Rung>,
    /// Negotiated protocol version.
    pub protocol_version: Option<ProtocolVersion>,
    /// Requested output schema.
    pub output_schema: Option<String>,
    /// Session start.
    pub started_at: DateTime<Utc>,
    /// Session end.
    pub finished_at: Option<DateTime<Utc>>,
}

impl HarvestReport {
    /// An empty report for a new session.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            source: source.into(),
            inserted: 0,
            updated: 0,
            deleted: 0,
            failed: 0,
            pages: 0,
            rungs_tried: Vec::new(),
            protocol_version: None,
            output_schema: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Records stored, inserted or updated.
    pub fn stored(&self) -> usize {
        self.inserted + self.updated
    }
}
