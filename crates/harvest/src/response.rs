//! GetRecords responses and exception reports.

use geocat_model::{XmlElement, XmlRecord};
use geocat_persistence::search::{QueryableRegistry, identify_xml};

use crate::error::{ExceptionReport, ResponseError};

/// Parses a response body, turning exception reports into errors.
pub fn parse_document(body: &str) -> Result<XmlElement, ResponseError> {
    let root = XmlElement::parse(body)
        .map_err(|e| ResponseError::unparseable(e.to_string(), body))?;
    if root.name() == "ExceptionReport" {
        return Err(ResponseError::Exception(exception_report(&root, body)));
    }
    Ok(root)
}

fn exception_report(root: &XmlElement, body: &str) -> ExceptionReport {
    let first = root.child("Exception");
    let texts = root
        .children_named("Exception")
        .flat_map(|e| e.children_named("ExceptionText"))
        .map(|t| t.text().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    ExceptionReport {
        code: first.and_then(|e| e.attribute("exceptionCode")).map(str::to_string),
        locator: first.and_then(|e| e.attribute("locator")).map(str::to_string),
        texts,
        raw: body.to_string(),
    }
}

/// One page of harvested records.
#[derive(Debug)]
pub struct RecordsPage {
    /// `numberOfRecordsMatched`.
    pub matched: usize,
    /// `numberOfRecordsReturned`, or the number of records present.
    pub returned: usize,
    /// `nextRecord`, 0 when the peer reports no more.
    pub next_record: Option<usize>,
    /// Records that could be identified.
    pub records: Vec<XmlRecord>,
    /// Records that could not be identified.
    pub unidentified: usize,
}

impl RecordsPage {
    /// Parses a GetRecords response.
    pub fn parse(body: &str, registry: &QueryableRegistry) -> Result<Self, ResponseError> {
        let root = parse_document(body)?;
        if root.name() != "GetRecordsResponse" {
            return Err(ResponseError::unparseable(
                format!("expected GetRecordsResponse, found {}", root.name()),
                body,
            ));
        }
        let results = root
            .child("SearchResults")
            .ok_or_else(|| ResponseError::unparseable("response has no SearchResults", body))?;

        let number = |name: &str| -> Result<Option<usize>, ResponseError> {
            results
                .attribute(name)
                .map(|v| {
                    v.trim().parse::<usize>().map_err(|_| {
                        ResponseError::unparseable(format!("{} is not a count: '{}'", name, v), body)
                    })
                })
                .transpose()
        };

        let mut records = Vec::new();
        let mut unidentified = 0;
        for element in results.children() {
            match identify_xml(registry, element.clone()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(element = %element.name(), error = %e, "Skipping unidentifiable record");
                    unidentified += 1;
                }
            }
        }

        let present = records.len() + unidentified;
        Ok(RecordsPage {
            matched: number("numberOfRecordsMatched")?.unwrap_or(present),
            returned: number("numberOfRecordsReturned")?.unwrap_or(present),
            next_record: number("nextRecord")?,
            records,
            unidentified,
        })
    }

    /// Whether the peer reports results after `start`, given this page.
    pub fn has_more(&self, start: usize) -> bool {
        if self.returned == 0 {
            return false;
        }
        match self.next_record {
            Some(next) => next > 0,
            None => start + self.returned <= self.matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> QueryableRegistry {
        QueryableRegistry::builtin().unwrap()
    }

    const PAGE: &str = r#"
<csw:GetRecordsResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"
    xmlns:dc="http://purl.org/dc/elements/1.1/">
  <csw:SearchStatus timestamp="2024-01-01T00:00:00Z"/>
  <csw:SearchResults numberOfRecordsMatched="3" numberOfRecordsReturned="2" nextRecord="3">
    <csw:Record><dc:identifier>a</dc:identifier><dc:title>A</dc:title></csw:Record>
    <csw:Record><dc:title>no identifier</dc:title></csw:Record>
  </csw:SearchResults>
</csw:GetRecordsResponse>"#;

    #[test]
    fn test_parse_page() {
        let page = RecordsPage::parse(PAGE, &registry()).unwrap();
        assert_eq!(page.matched, 3);
        assert_eq!(page.returned, 2);
        assert_eq!(page.next_record, Some(3));
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.unidentified, 1);
        assert!(page.has_more(1));
    }

    #[test]
    fn test_exception_report() {
        let body = r#"<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows" version="1.0.0">
  <ows:Exception exceptionCode="NoApplicableCode" locator="Constraint">
    <ows:ExceptionText>Filter not supported</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#;
        match RecordsPage::parse(body, &registry()).unwrap_err() {
            ResponseError::Exception(report) => {
                assert_eq!(report.code.as_deref(), Some("NoApplicableCode"));
                assert_eq!(report.locator.as_deref(), Some("Constraint"));
                assert_eq!(report.texts, vec!["Filter not supported"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_last_page_has_no_more() {
        let body = r#"<GetRecordsResponse><SearchResults numberOfRecordsMatched="1"
            numberOfRecordsReturned="1" nextRecord="0"/></GetRecordsResponse>"#;
        let page = RecordsPage::parse(body, &registry()).unwrap();
        assert!(!page.has_more(1));

        let garbage = "<html>oops</html>";
        assert!(matches!(
            RecordsPage::parse(garbage, &registry()),
            Err(ResponseError::Unparseable { .. })
        ));
    }
}
