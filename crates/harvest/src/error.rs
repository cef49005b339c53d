//! Error types for harvesting.

use geocat_persistence::StorageError;
use thiserror::Error;

/// Result alias for harvest operations.
pub type HarvestResult<T> = Result<T, HarvestError>;

/// A harvest that could not complete.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Talking to the remote peer failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The remote peer never produced a usable answer.
    #[error("remote catalogue error: {message}")]
    RemoteProtocol {
        /// What went wrong.
        message: String,
        /// The remote exception report or offending body, when there was one.
        report: Option<String>,
    },

    /// The local catalogue rejected a write.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The source URL is unusable.
    #[error("invalid harvest source '{url}': {message}")]
    InvalidSource {
        /// The URL as given.
        url: String,
        /// Parser message.
        message: String,
    },
}

impl HarvestError {
    /// Creates a remote protocol error.
    pub fn remote(message: impl Into<String>, report: Option<String>) -> Self {
        HarvestError::RemoteProtocol {
            message: message.into(),
            report,
        }
    }
}

impl From<ResponseError> for HarvestError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Exception(report) => HarvestError::RemoteProtocol {
                message: report.to_string(),
                report: Some(report.raw),
            },
            ResponseError::Unparseable { message, body } => HarvestError::RemoteProtocol {
                message,
                report: Some(body),
            },
        }
    }
}

/// I/O failures talking to a remote peer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The request could not be sent or the body not read.
    #[error("request to {url} failed: {message}")]
    Request {
        /// Target URL.
        url: String,
        /// Client message.
        message: String,
    },

    /// The peer answered with a non-success status.
    #[error("{url} answered HTTP {status}")]
    Status {
        /// Target URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request ran out of time.
    #[error("request to {url} timed out")]
    Timeout {
        /// Target URL.
        url: String,
    },
}

/// An `ows:ExceptionReport` returned instead of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionReport {
    /// `exceptionCode` of the first exception.
    pub code: Option<String>,
    /// `locator` of the first exception.
    pub locator: Option<String>,
    /// Exception texts.
    pub texts: Vec<String>,
    /// The report as received.
    pub raw: String,
}

impl std::fmt::Display for ExceptionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "exception report")?;
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(locator) = &self.locator {
            write!(f, " at {}", locator)?;
        }
        if !self.texts.is_empty() {
            write!(f, ": {}", self.texts.join("; "))?;
        }
        Ok(())
    }
}

/// Why a remote response could not be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// The peer sent an exception report.
    #[error("{0}")]
    Exception(ExceptionReport),

    /// The body is not XML or not the expected document.
    #[error("unusable response: {message}")]
    Unparseable {
        /// What was wrong.
        message: String,
        /// The body as received.
        body: String,
    },
}

impl ResponseError {
    /// Creates an unparseable-response error.
    pub fn unparseable(message: impl Into<String>, body: impl Into<String>) -> Self {
        ResponseError::Unparseable {
            message: message.into(),
            body: body.into(),
        }
    }
}
