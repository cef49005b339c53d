//! Metadata records and the standards they conform to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::node::MetadataNode;

/// The metadata standard (schema) a record conforms to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Standard {
    /// ISO 19115 content encoded per ISO 19139 (`gmd:MD_Metadata`).
    Iso19139,
    /// Dublin Core based CSW records (`csw:Record` and its summaries).
    DublinCore,
    /// OASIS ebRIM registry objects.
    Ebrim,
}

impl Standard {
    /// All supported standards.
    pub const ALL: [Standard; 3] = [Standard::Iso19139, Standard::DublinCore, Standard::Ebrim];

    /// Short identifier used in configuration and dumps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Standard::Iso19139 => "iso19139",
            Standard::DublinCore => "dublincore",
            Standard::Ebrim => "ebrim",
        }
    }

    /// The XML namespace of the standard's root element.
    pub fn namespace(&self) -> &'static str {
        match self {
            Standard::Iso19139 => "http://www.isotc211.org/2005/gmd",
            Standard::DublinCore => "http://www.opengis.net/cat/csw/2.0.2",
            Standard::Ebrim => "urn:oasis:names:tc:ebxml-regrep:xsd:rim:3.0",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Standard {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iso19139" | "iso19115" | "iso" | "gmd" => Ok(Standard::Iso19139),
            "dublincore" | "dc" | "csw" => Ok(Standard::DublinCore),
            "ebrim" | "rim" => Ok(Standard::Ebrim),
            _ => Err(ModelError::UnknownStandard {
                name: s.to_string(),
            }),
        }
    }
}

/// A metadata record as handed to the indexing engine.
///
/// Records are owned by the storage collaborator; the engine only reads them.
pub trait MetadataRecord: fmt::Debug + Send + Sync {
    /// Stable identifier of the record.
    fn identifier(&self) -> &str;

    /// The standard the record conforms to.
    fn standard(&self) -> Standard;

    /// The root node of the record's object graph.
    fn root(&self) -> &dyn MetadataNode;
}
