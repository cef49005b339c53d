//! Capabilities documents.

use geocat_model::XmlElement;
use serde::Serialize;

use crate::error::ResponseError;
use crate::protocol::{ProtocolVersion, select_output_schema};
use crate::quirks::Quirks;
use crate::response::parse_document;

/// What a remote catalogue advertises.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capabilities {
    /// Negotiated protocol version.
    pub version: ProtocolVersion,
    /// Service title.
    pub title: Option<String>,
    /// Service provider name.
    pub provider: Option<String>,
    /// Advertised `outputSchema` values of GetRecords.
    pub output_schemas: Vec<String>,
    /// Advertised constraint languages of GetRecords.
    pub constraint_languages: Vec<String>,
    /// POST endpoint of GetRecords, when advertised.
    pub get_records_url: Option<String>,
    /// Product deviations detected from the identification.
    pub quirks: Quirks,
}

impl Capabilities {
    /// Parses a capabilities response.
    ///
    /// `requested` is the version asked for; it applies when the document
    /// does not say which version it describes.
    pub fn parse(body: &str, requested: ProtocolVersion) -> Result<Self, ResponseError> {
        let root = parse_document(body)?;
        if root.name() != "Capabilities" {
            return Err(ResponseError::unparseable(
                format!("expected Capabilities, found {}", root.name()),
                body,
            ));
        }

        let version = detect_version(&root).unwrap_or(requested);
        let title = text_of(&root, "ServiceIdentification", "Title");
        let provider = text_of(&root, "ServiceProvider", "ProviderName");
        let quirks = Quirks::detect(title.iter().chain(provider.iter()).map(String::as_str));

        let operations = root.find("OperationsMetadata");
        let get_records = operations.and_then(|ops| {
            ops.children_named("Operation")
                .find(|op| op.attribute("name") == Some("GetRecords"))
        });

        let mut parameters: Vec<&XmlElement> = Vec::new();
        if let Some(op) = get_records {
            parameters.extend(op.children_named("Parameter"));
            parameters.extend(op.children_named("Constraint"));
        }
        if let Some(ops) = operations {
            parameters.extend(ops.children_named("Parameter"));
            parameters.extend(ops.children_named("Constraint"));
        }

        let values_of = |name: &str| -> Vec<String> {
            let mut values: Vec<String> = Vec::new();
            for parameter in &parameters {
                let matches = parameter
                    .attribute("name")
                    .is_some_and(|n| n.eq_ignore_ascii_case(name));
                if !matches {
                    continue;
                }
                collect_values(parameter, &mut values);
            }
            values
        };

        let get_records_url = get_records
            .and_then(|op| op.find("Post"))
            .and_then(|post| post.attribute("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty());

        Ok(Capabilities {
            version,
            title,
            provider,
            output_schemas: values_of("outputSchema"),
            constraint_languages: values_of("ConstraintLanguage"),
            get_records_url,
            quirks,
        })
    }

    /// The output schema to request.
    pub fn output_schema(&self) -> String {
        select_output_schema(&self.output_schemas, self.version)
    }

    /// Returns true when the peer advertises the constraint language.
    /// A peer that lists no languages is assumed to accept any.
    pub fn supports_language(&self, language: &str) -> bool {
        self.constraint_languages.is_empty()
            || self
                .constraint_languages
                .iter()
                .any(|l| l.eq_ignore_ascii_case(language))
    }

    /// CSW namespace to use in requests.
    pub fn namespace(&self) -> &'static str {
        self.quirks.namespace.unwrap_or(self.version.namespace())
    }

    /// Filter encoding version to use in constraints.
    pub fn filter_version(&self) -> &'static str {
        self.quirks
            .filter_version
            .unwrap_or(self.version.filter_version())
    }
}

fn detect_version(root: &XmlElement) -> Option<ProtocolVersion> {
    if let Some(version) = root.attribute("version").and_then(ProtocolVersion::parse) {
        return Some(version);
    }
    let advertised: Vec<ProtocolVersion> = root
        .find("ServiceIdentification")
        .map(|id| {
            id.children_named("ServiceTypeVersion")
                .filter_map(|v| ProtocolVersion::parse(v.text()))
                .collect()
        })
        .unwrap_or_default();
    if let Some(best) = ProtocolVersion::PREFERENCE
        .into_iter()
        .find(|v| advertised.contains(v))
    {
        return Some(best);
    }
    ProtocolVersion::PREFERENCE
        .into_iter()
        .find(|v| root.namespace() == Some(v.namespace()))
}

fn text_of(root: &XmlElement, section: &str, name: &str) -> Option<String> {
    root.find(section)
        .and_then(|s| s.child(name))
        .map(|e| e.text().to_string())
        .filter(|t| !t.is_empty())
}

fn collect_values(parameter: &XmlElement, out: &mut Vec<String>) {
    for child in parameter.children() {
        if child.name() == "Value" {
            let value = child.text();
            if !value.is_empty() && !out.iter().any(|v| v == value) {
                out.push(value.to_string());
            }
        } else {
            collect_values(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::GMD_SCHEMA;

    const CAPABILITIES: &str = r#"<?xml version="1.0"?>
<csw:Capabilities version="2.0.2"
    xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"
    xmlns:ows="http://www.opengis.net/ows"
    xmlns:xlink="http://www.w3.org/1999/xlink">
  <ows:ServiceIdentification>
    <ows:Title>Esri Geoportal Server</ows:Title>
    <ows:ServiceType>CSW</ows:ServiceType>
    <ows:ServiceTypeVersion>2.0.2</ows:ServiceTypeVersion>
  </ows:ServiceIdentification>
  <ows:OperationsMetadata>
    <ows:Operation name="GetRecords">
      <ows:DCP><ows:HTTP>
        <ows:Get xlink:href="http://remote.example/csw"/>
        <ows:Post xlink:href="http://remote.example/csw/post"/>
      </ows:HTTP></ows:DCP>
      <ows:Parameter name="outputSchema">
        <ows:Value>http://www.opengis.net/cat/csw/2.0.2</ows:Value>
        <ows:Value>http://www.isotc211.org/2005/gmd</ows:Value>
      </ows:Parameter>
      <ows:Parameter name="CONSTRAINTLANGUAGE">
        <ows:Value>FILTER</ows:Value>
        <ows:Value>CQL_TEXT</ows:Value>
      </ows:Parameter>
    </ows:Operation>
  </ows:OperationsMetadata>
</csw:Capabilities>"#;

    #[test]
    fn test_parse_capabilities() {
        let caps = Capabilities::parse(CAPABILITIES, ProtocolVersion::V2_0_0).unwrap();
        assert_eq!(caps.version, ProtocolVersion::V2_0_2);
        assert_eq!(caps.title.as_deref(), Some("Esri Geoportal Server"));
        assert_eq!(caps.output_schemas.len(), 2);
        assert_eq!(caps.output_schema(), GMD_SCHEMA);
        assert!(caps.supports_language("cql_text"));
        assert_eq!(caps.get_records_url.as_deref(), Some("http://remote.example/csw/post"));
        assert_eq!(caps.quirks.product, Some("Geoportal Server"));
        assert_eq!(caps.filter_version(), "1.0.0");
    }

    #[test]
    fn test_version_falls_back_to_requested() {
        let body = r#"<Capabilities><ServiceIdentification><Title>x</Title></ServiceIdentification></Capabilities>"#;
        let caps = Capabilities::parse(body, ProtocolVersion::V2_0_0).unwrap();
        assert_eq!(caps.version, ProtocolVersion::V2_0_0);
        assert!(caps.output_schemas.is_empty());
        assert_eq!(caps.output_schema(), "http://www.opengis.net/cat/csw");
        assert_eq!(caps.namespace(), "http://www.opengis.net/cat/csw");
    }

    #[test]
    fn test_other_documents_rejected() {
        assert!(matches!(
            Capabilities::parse("<html><body>Not here</body></html>", ProtocolVersion::V2_0_2),
            Err(ResponseError::Unparseable { .. })
        ));
        assert!(matches!(
            Capabilities::parse("not xml at all", ProtocolVersion::V2_0_2),
            Err(ResponseError::Unparseable { .. })
        ));
    }
}
