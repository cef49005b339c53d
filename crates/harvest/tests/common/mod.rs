//! Scripted transport and canned CSW responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use geocat_harvest::{RemoteRequest, RemoteResponse, Transport, TransportError};
use geocat_persistence::Catalogue;
use geocat_persistence::backends::MemoryRecordStorage;
use geocat_persistence::search::QueryableRegistry;

pub const SOURCE: &str = "http://remote.example/csw";

/// Answers requests from a queue, in order, and logs every request.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RemoteResponse, TransportError>>>,
    log: Mutex<Vec<RemoteRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(RemoteResponse {
            status: 200,
            body: body.into(),
        }));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.log.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RemoteRequest) -> Result<RemoteResponse, TransportError> {
        self.log.lock().push(request.clone());
        self.script.lock().pop_front().unwrap_or_else(|| {
            Err(TransportError::Request {
                url: request.url.clone(),
                message: "script exhausted".to_string(),
            })
        })
    }
}

pub fn timeout() -> TransportError {
    TransportError::Timeout {
        url: SOURCE.to_string(),
    }
}

pub fn catalogue() -> Arc<Catalogue> {
    Arc::new(Catalogue::new(
        Arc::new(MemoryRecordStorage::new()),
        Arc::new(QueryableRegistry::builtin().unwrap()),
    ))
}

pub fn capabilities(version: Option<&str>, title: &str, schemas: &[&str]) -> String {
    let version_attr = version
        .map(|v| format!(r#" version="{}""#, v))
        .unwrap_or_default();
    let namespace = match version {
        Some("2.0.2") => "http://www.opengis.net/cat/csw/2.0.2",
        _ => "http://www.opengis.net/cat/csw",
    };
    let values: String = schemas
        .iter()
        .map(|s| format!("<ows:Value>{}</ows:Value>", s))
        .collect();
    format!(
        r#"<?xml version="1.0"?>
<csw:Capabilities{version_attr} xmlns:csw="{namespace}"
    xmlns:ows="http://www.opengis.net/ows">
  <ows:ServiceIdentification><ows:Title>{title}</ows:Title></ows:ServiceIdentification>
  <ows:OperationsMetadata>
    <ows:Operation name="GetRecords">
      <ows:Parameter name="outputSchema">{values}</ows:Parameter>
    </ows:Operation>
  </ows:OperationsMetadata>
</csw:Capabilities>"#
    )
}

pub fn standard_capabilities() -> String {
    capabilities(
        Some("2.0.2"),
        "Test catalogue",
        &["http://www.opengis.net/cat/csw/2.0.2"],
    )
}

/// A page of Dublin Core records.
pub fn records_page(identifiers: &[&str], matched: usize, next_record: usize) -> String {
    let records: String = identifiers
        .iter()
        .map(|id| {
            format!(
                "<csw:Record><dc:identifier>{id}</dc:identifier><dc:title>Record {id}</dc:title></csw:Record>"
            )
        })
        .collect();
    format!(
        r#"<csw:GetRecordsResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"
    xmlns:dc="http://purl.org/dc/elements/1.1/">
  <csw:SearchStatus timestamp="2024-05-01T00:00:00Z"/>
  <csw:SearchResults numberOfRecordsMatched="{matched}" numberOfRecordsReturned="{returned}" nextRecord="{next_record}">
    {records}
  </csw:SearchResults>
</csw:GetRecordsResponse>"#,
        returned = identifiers.len(),
    )
}

pub fn exception(text: &str) -> String {
    format!(
        r#"<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows" version="1.0.0">
  <ows:Exception exceptionCode="NoApplicableCode"><ows:ExceptionText>{text}</ows:ExceptionText></ows:Exception>
</ows:ExceptionReport>"#
    )
}
