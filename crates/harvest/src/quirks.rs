//! Known deviations of specific catalogue products.
//!
//! Matched against the advertised service title and provider name. The first
//! matching entry wins.

use serde::Serialize;

/// Request adjustments for one catalogue product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Quirks {
    /// Product name, `None` for a standard peer.
    pub product: Option<&'static str>,
    /// CSW namespace to use in requests instead of the version's own.
    pub namespace: Option<&'static str>,
    /// Filter encoding version the peer accepts in constraints.
    pub filter_version: Option<&'static str>,
}

impl Quirks {
    /// Returns true when no adjustment applies.
    pub fn is_standard(&self) -> bool {
        self.product.is_none()
    }

    /// Looks up the quirks for an advertised title or provider.
    pub fn detect<'a>(identifications: impl IntoIterator<Item = &'a str>) -> Quirks {
        let haystack: Vec<String> = identifications
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        KNOWN_PRODUCTS
            .iter()
            .find(|(needle, _)| haystack.iter().any(|h| h.contains(needle)))
            .map(|(_, quirks)| *quirks)
            .unwrap_or_default()
    }
}

const KNOWN_PRODUCTS: &[(&str, Quirks)] = &[
    (
        "arcims",
        Quirks {
            product: Some("ArcIMS"),
            namespace: Some("http://www.opengis.net/cat/csw"),
            filter_version: Some("1.0.0"),
        },
    ),
    (
        "geoportal",
        Quirks {
            product: Some("Geoportal Server"),
            namespace: None,
            filter_version: Some("1.0.0"),
        },
    ),
    (
        "gi-cat",
        Quirks {
            product: Some("GI-cat"),
            namespace: None,
            filter_version: Some("1.0.0"),
        },
    ),
];
