//! Request construction.

use std::fmt;

use geocat_persistence::search::ANY_TEXT;
use serde::Serialize;
use url::Url;

use crate::capabilities::Capabilities;
use crate::error::HarvestError;
use crate::protocol::{OGC_NAMESPACE, OWS_NAMESPACE, ProtocolVersion};
use crate::transport::RemoteRequest;

/// Constraint strategy of a GetRecords request, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rung {
    /// Filter-encoded constraint excluding records without any text.
    Constrained,
    /// No constraint.
    Unconstrained,
    /// The same constraint in CQL.
    AlternateLanguage,
}

impl Rung {
    /// The retry ladder.
    pub const LADDER: [Rung; 3] = [Rung::Constrained, Rung::Unconstrained, Rung::AlternateLanguage];

    /// The next rung, if any.
    pub fn next(self) -> Option<Rung> {
        match self {
            Rung::Constrained => Some(Rung::Unconstrained),
            Rung::Unconstrained => Some(Rung::AlternateLanguage),
            Rung::AlternateLanguage => None,
        }
    }
}

impl fmt::Display for Rung {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rung::Constrained => write!(f, "constrained"),
            Rung::Unconstrained => write!(f, "unconstrained"),
            Rung::AlternateLanguage => write!(f, "alternate-language"),
        }
    }
}

/// Parses and checks a harvest source URL.
pub fn source_url(source: &str) -> Result<Url, HarvestError> {
    let url = Url::parse(source.trim()).map_err(|e| HarvestError::InvalidSource {
        url: source.to_string(),
        message: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HarvestError::InvalidSource {
            url: source.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// The unencoded GET capabilities probe.
pub fn capabilities_probe(source: &Url) -> RemoteRequest {
    let mut url = source.clone();
    url.query_pairs_mut()
        .append_pair("service", "CSW")
        .append_pair("request", "GetCapabilities");
    RemoteRequest::get(url.as_str())
}

/// A POST capabilities request for one version.
pub fn capabilities_request(source: &Url, version: ProtocolVersion) -> RemoteRequest {
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<csw:GetCapabilities xmlns:csw="{csw}" xmlns:ows="{ows}" service="CSW">
  <ows:AcceptVersions><ows:Version>{version}</ows:Version></ows:AcceptVersions>
</csw:GetCapabilities>"#,
        csw = version.namespace(),
        ows = OWS_NAMESPACE,
        version = version,
    );
    RemoteRequest::post(source.as_str(), body)
}

/// Builds GetRecords requests for a negotiated peer.
#[derive(Debug, Clone)]
pub struct GetRecordsBuilder {
    endpoint: String,
    version: ProtocolVersion,
    namespace: &'static str,
    filter_version: &'static str,
    output_schema: String,
    max_records: usize,
}

impl GetRecordsBuilder {
    /// Creates a builder from negotiated capabilities.
    pub fn new(source: &Url, capabilities: &Capabilities, max_records: usize) -> Self {
        Self {
            endpoint: capabilities
                .get_records_url
                .clone()
                .unwrap_or_else(|| source.to_string()),
            version: capabilities.version,
            namespace: capabilities.namespace(),
            filter_version: capabilities.filter_version(),
            output_schema: capabilities.output_schema(),
            max_records,
        }
    }

    /// The requested output schema.
    pub fn output_schema(&self) -> &str {
        &self.output_schema
    }

    /// The GetRecords endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds the request for one page under one rung.
    pub fn build(&self, start_position: usize, rung: Rung) -> RemoteRequest {
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<csw:GetRecords xmlns:csw="{csw}" xmlns:ogc="{ogc}" service="CSW" version="{version}" resultType="results" startPosition="{start}" maxRecords="{max}" outputSchema="{schema}">
  <csw:Query typeNames="csw:Record">
    <csw:ElementSetName>full</csw:ElementSetName>{constraint}
  </csw:Query>
</csw:GetRecords>"#,
            csw = self.namespace,
            ogc = OGC_NAMESPACE,
            version = self.version,
            start = start_position,
            max = self.max_records,
            schema = escape(&self.output_schema),
            constraint = self.constraint(rung),
        );
        RemoteRequest::post(self.endpoint.as_str(), body)
    }

    fn constraint(&self, rung: Rung) -> String {
        let field = format!("csw:{}", ANY_TEXT);
        match rung {
            Rung::Unconstrained => String::new(),
            Rung::Constrained => {
                let escape_attr = if self.filter_version == "1.0.0" {
                    "escape"
                } else {
                    "escapeChar"
                };
                format!(
                    r#"
    <csw:Constraint version="{fv}">
      <ogc:Filter>
        <ogc:PropertyIsLike wildCard="%" singleChar="_" {escape_attr}="\">
          <ogc:PropertyName>{field}</ogc:PropertyName>
          <ogc:Literal>%</ogc:Literal>
        </ogc:PropertyIsLike>
      </ogc:Filter>
    </csw:Constraint>"#,
                    fv = self.filter_version,
                )
            }
            Rung::AlternateLanguage => format!(
                r#"
    <csw:Constraint version="{fv}">
      <csw:CqlText>{field} like '%'</csw:CqlText>
    </csw:Constraint>"#,
                fv = self.filter_version,
            ),
        }
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quirks::Quirks;
    use crate::transport::Method;

    fn capabilities() -> Capabilities {
        Capabilities {
            version: ProtocolVersion::V2_0_2,
            title: None,
            provider: None,
            output_schemas: vec!["http://www.isotc211.org/2005/gmd".into()],
            constraint_languages: vec![],
            get_records_url: None,
            quirks: Quirks::default(),
        }
    }

    #[test]
    fn test_probe_appends_parameters() {
        let url = source_url("http://remote.example/csw?lang=en").unwrap();
        let probe = capabilities_probe(&url);
        assert_eq!(probe.method, Method::Get);
        assert_eq!(
            probe.url,
            "http://remote.example/csw?lang=en&service=CSW&request=GetCapabilities"
        );
    }

    #[test]
    fn test_bad_source_rejected() {
        assert!(matches!(
            source_url("ftp://remote.example/csw"),
            Err(HarvestError::InvalidSource { .. })
        ));
        assert!(source_url("not a url").is_err());
    }

    #[test]
    fn test_rungs_change_constraint() {
        let url = source_url("http://remote.example/csw").unwrap();
        let builder = GetRecordsBuilder::new(&url, &capabilities(), 10);

        let constrained = builder.build(11, Rung::Constrained).body.unwrap();
        assert!(constrained.contains(r#"startPosition="11""#));
        assert!(constrained.contains(r#"maxRecords="10""#));
        assert!(constrained.contains("<ogc:PropertyName>csw:AnyText</ogc:PropertyName>"));
        assert!(constrained.contains(r#"escapeChar="\""#));

        let unconstrained = builder.build(1, Rung::Unconstrained).body.unwrap();
        assert!(!unconstrained.contains("Constraint"));

        let cql = builder.build(1, Rung::AlternateLanguage).body.unwrap();
        assert!(cql.contains("<csw:CqlText>csw:AnyText like '%'</csw:CqlText>"));
    }

    #[test]
    fn test_quirks_alter_namespace_and_filter() {
        let mut caps = capabilities();
        caps.quirks = Quirks::detect(["ArcIMS"]);
        caps.get_records_url = Some("http://remote.example/post".into());
        let url = source_url("http://remote.example/csw").unwrap();
        let builder = GetRecordsBuilder::new(&url, &caps, 5);
        let request = builder.build(1, Rung::Constrained);
        assert_eq!(request.url, "http://remote.example/post");
        let body = request.body.unwrap();
        assert!(body.contains(r#"xmlns:csw="http://www.opengis.net/cat/csw""#));
        assert!(body.contains(r#"<csw:Constraint version="1.0.0">"#));
        assert!(body.contains(r#"escape="\""#));
    }

    #[test]
    fn test_ladder_order() {
        assert_eq!(Rung::Constrained.next(), Some(Rung::Unconstrained));
        assert_eq!(Rung::Unconstrained.next(), Some(Rung::AlternateLanguage));
        assert_eq!(Rung::AlternateLanguage.next(), None);
        assert_eq!(Rung::LADDER[0], Rung::Constrained);
    }
}
