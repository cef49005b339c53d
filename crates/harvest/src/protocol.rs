//! CSW protocol versions, namespaces and output schema selection.

use std::fmt;

use geocat_model::Standard;
use serde::Serialize;

/// Namespace of full ISO 19139 records.
pub const GMD_SCHEMA: &str = "http://www.isotc211.org/2005/gmd";
/// Generic profile marker advertised by profile-aware catalogues.
pub const PROFILE_SCHEMA: &str = "csw:profile";
/// OGC Web Services common namespace.
pub const OWS_NAMESPACE: &str = "http://www.opengis.net/ows";
/// OGC Filter Encoding namespace.
pub const OGC_NAMESPACE: &str = "http://www.opengis.net/ogc";

/// A CSW protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProtocolVersion {
    /// CSW 2.0.2.
    #[serde(rename = "2.0.2")]
    V2_0_2,
    /// CSW 2.0.0.
    #[serde(rename = "2.0.0")]
    V2_0_0,
}

impl ProtocolVersion {
    /// Versions in decreasing preference.
    pub const PREFERENCE: [ProtocolVersion; 2] = [ProtocolVersion::V2_0_2, ProtocolVersion::V2_0_0];

    /// The version string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::V2_0_2 => "2.0.2",
            ProtocolVersion::V2_0_0 => "2.0.0",
        }
    }

    /// The CSW namespace of this version, which is also its Dublin Core schema.
    pub fn namespace(&self) -> &'static str {
        match self {
            ProtocolVersion::V2_0_2 => "http://www.opengis.net/cat/csw/2.0.2",
            ProtocolVersion::V2_0_0 => "http://www.opengis.net/cat/csw",
        }
    }

    /// Filter encoding version used in constraints.
    pub fn filter_version(&self) -> &'static str {
        match self {
            ProtocolVersion::V2_0_2 => "1.1.0",
            ProtocolVersion::V2_0_0 => "1.0.0",
        }
    }

    /// Parses an advertised version string.
    pub fn parse(version: &str) -> Option<Self> {
        match version.trim() {
            "2.0.2" => Some(ProtocolVersion::V2_0_2),
            "2.0.0" | "2.0.1" => Some(ProtocolVersion::V2_0_0),
            _ => None,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the output schema to request.
///
/// Priority: ISO (`gmd`), then the profile marker, then the version's Dublin
/// Core schema, then any other schema of a known standard. When nothing known
/// is advertised the Dublin Core schema of the version is used.
pub fn select_output_schema(advertised: &[String], version: ProtocolVersion) -> String {
    let dublin_core = version.namespace();
    let offered = |schema: &str| advertised.iter().any(|s| s.trim() == schema);

    for preferred in [GMD_SCHEMA, PROFILE_SCHEMA, dublin_core] {
        if offered(preferred) {
            return preferred.to_string();
        }
    }

    known_schemas()
        .find(|schema| offered(schema))
        .unwrap_or(dublin_core)
        .to_string()
}

/// Namespaces of every record standard the catalogue can index.
fn known_schemas() -> impl Iterator<Item = &'static str> {
    Standard::ALL
        .into_iter()
        .map(|standard| standard.namespace())
        .chain(ProtocolVersion::PREFERENCE.into_iter().map(|v| v.namespace()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schemas(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_gmd_wins() {
        let advertised = schemas(&[
            "http://www.opengis.net/cat/csw/2.0.2",
            "csw:profile",
            GMD_SCHEMA,
            "http://www.w3.org/ns/dcat#",
        ]);
        assert_eq!(select_output_schema(&advertised, ProtocolVersion::V2_0_2), GMD_SCHEMA);
    }

    #[test]
    fn test_profile_before_dublin_core() {
        let advertised = schemas(&["http://www.opengis.net/cat/csw/2.0.2", "csw:profile"]);
        assert_eq!(
            select_output_schema(&advertised, ProtocolVersion::V2_0_2),
            PROFILE_SCHEMA
        );
    }

    #[test]
    fn test_dublin_core_follows_version() {
        let advertised = schemas(&["urn:other", "http://www.opengis.net/cat/csw"]);
        assert_eq!(
            select_output_schema(&advertised, ProtocolVersion::V2_0_0),
            "http://www.opengis.net/cat/csw"
        );
        // The 2.0.0 namespace is still a known Dublin Core schema.
        assert_eq!(
            select_output_schema(&advertised, ProtocolVersion::V2_0_2),
            "http://www.opengis.net/cat/csw"
        );
    }

    #[test]
    fn test_other_known_standard_before_default() {
        let advertised = schemas(&["urn:other", "urn:oasis:names:tc:ebxml-regrep:xsd:rim:3.0"]);
        assert_eq!(
            select_output_schema(&advertised, ProtocolVersion::V2_0_2),
            "urn:oasis:names:tc:ebxml-regrep:xsd:rim:3.0"
        );
    }

    #[test]
    fn test_unknown_schemas_fall_back_to_default() {
        let advertised = schemas(&["urn:vendor:custom", "http://www.w3.org/ns/dcat#"]);
        assert_eq!(
            select_output_schema(&advertised, ProtocolVersion::V2_0_2),
            "http://www.opengis.net/cat/csw/2.0.2"
        );
    }

    #[test]
    fn test_default_when_nothing_advertised() {
        assert_eq!(
            select_output_schema(&[], ProtocolVersion::V2_0_2),
            "http://www.opengis.net/cat/csw/2.0.2"
        );
        assert_eq!(
            select_output_schema(&schemas(&["  "]), ProtocolVersion::V2_0_0),
            "http://www.opengis.net/cat/csw"
        );
    }
}
