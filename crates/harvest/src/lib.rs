//! Harvesting of remote CSW catalogues.
//!
//! A harvest negotiates the peer's capabilities, picks the richest output
//! schema it offers and pages through its records, storing each one in a
//! local [`Catalogue`](geocat_persistence::Catalogue).
//!
//! ```text
//! Idle -> Negotiating -> Paginating(rung, start) -> Completed
//!                     \             |              \
//!                      `-----------> Failed <-------'
//! ```
//!
//! Remote I/O goes through the [`Transport`] trait; [`HttpTransport`] is
//! the HTTP implementation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use geocat_harvest::{HttpTransport, Harvester};
//! use geocat_persistence::Catalogue;
//! use geocat_persistence::backends::MemoryRecordStorage;
//! use geocat_persistence::search::QueryableRegistry;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let catalogue = Arc::new(Catalogue::new(
//!     Arc::new(MemoryRecordStorage::new()),
//!     Arc::new(QueryableRegistry::builtin()?),
//! ));
//! let transport = Arc::new(HttpTransport::new(Duration::from_secs(30))?);
//! let report = Harvester::new(transport, catalogue)
//!     .with_page_size(50)
//!     .harvest("https://catalogue.example/csw")
//!     .await?;
//! println!("{} inserted, {} updated", report.inserted, report.updated);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod capabilities;
pub mod error;
pub mod harvester;
pub mod protocol;
pub mod quirks;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;

pub use capabilities::Capabilities;
pub use error::{ExceptionReport, HarvestError, HarvestResult, ResponseError, TransportError};
pub use harvester::{DEFAULT_PAGE_SIZE, HarvestSession, Harvester};
pub use protocol::{ProtocolVersion, select_output_schema};
pub use quirks::Quirks;
pub use request::Rung;
pub use session::{HarvestReport, HarvestState};
pub use transport::{HttpTransport, Method, RemoteRequest, RemoteResponse, Transport};
