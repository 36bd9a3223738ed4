//! Paper models matching the Europe PMC `core` result schema.

use serde::{Deserialize, Serialize};

use super::{AuthorId, PaperAuthor, Pmid};

/// One publication record. Candidate or confirmed status is a property of
/// which pool it sits in, not of the record itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    /// PubMed identifier. Records without one are dropped at ingest.
    pub pmid: Pmid,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Publication year as reported (string in the wire format).
    #[serde(default)]
    pub pub_year: Option<String>,

    /// Pre-rendered author string, e.g. "Darwin C, Wallace AR.".
    #[serde(default)]
    pub author_string: Option<String>,

    /// Ordered author list. Empty when the record carries no author list.
    #[serde(default)]
    pub authors: Vec<PaperAuthor>,
}

impl PaperRecord {
    /// Get the paper title, falling back to "Untitled" if not available.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Identifiers attached to this paper's authors, in author order.
    pub fn author_ids(&self) -> impl Iterator<Item = &AuthorId> {
        self.authors.iter().filter_map(|a| a.author_id.as_ref())
    }

    /// Number of authors listed on the paper.
    #[must_use]
    pub fn author_count(&self) -> usize {
        self.authors.len()
    }
}

/// Raw wire shape of one search result. Converted to [`PaperRecord`] at
/// ingest; results without a pmid are skipped there.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResult {
    #[serde(default)]
    pub pmid: Option<Pmid>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub pub_year: Option<String>,

    #[serde(default)]
    pub author_string: Option<String>,

    #[serde(default)]
    pub author_list: Option<RawAuthorList>,
}

impl RawResult {
    /// Convert to a [`PaperRecord`], or `None` when the pmid is missing.
    #[must_use]
    pub fn into_record(self) -> Option<PaperRecord> {
        let pmid = self.pmid?;
        Some(PaperRecord {
            pmid,
            title: self.title,
            pub_year: self.pub_year,
            author_string: self.author_string,
            authors: self.author_list.map(|l| l.author).unwrap_or_default(),
        })
    }
}

/// Wire wrapper: `"authorList": {"author": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthorList {
    #[serde(default)]
    pub author: Vec<PaperAuthor>,
}

/// One page of cursor-mark paginated search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Cursor for the next page. Repeats the request cursor on the last page.
    #[serde(default)]
    pub next_cursor_mark: Option<String>,

    /// Result list wrapper.
    #[serde(default)]
    pub result_list: Option<ResultList>,
}

impl SearchPage {
    /// Take the results of this page, empty when the wrapper is absent.
    #[must_use]
    pub fn into_results(self) -> Vec<RawResult> {
        self.result_list.map(|l| l.result).unwrap_or_default()
    }

    /// Number of results on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.result_list.as_ref().map_or(0, |l| l.result.len())
    }

    /// Whether this page carries no results (pagination end).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wire wrapper: `"resultList": {"result": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultList {
    #[serde(default)]
    pub result: Vec<RawResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_result_without_pmid_is_skipped() {
        let json = r#"{"title": "Preprint without pmid"}"#;
        let raw: RawResult = serde_json::from_str(json).unwrap();
        assert!(raw.into_record().is_none());
    }

    #[test]
    fn test_raw_result_without_author_list() {
        let json = r#"{"pmid": "100", "title": "Editorial", "pubYear": "1859"}"#;
        let raw: RawResult = serde_json::from_str(json).unwrap();
        let record = raw.into_record().unwrap();
        assert_eq!(record.pmid, "100");
        assert!(record.authors.is_empty());
        assert_eq!(record.author_count(), 0);
    }

    #[test]
    fn test_search_page_deserialize() {
        let json = r#"{
            "nextCursorMark": "AoIIP4AAACs0",
            "resultList": {"result": [
                {"pmid": "1", "title": "On the Origin of Species", "pubYear": "1859",
                 "authorString": "Darwin C.",
                 "authorList": {"author": [
                    {"fullName": "Darwin C", "firstName": "Charles",
                     "authorId": {"type": "ORCID", "value": "0000-0002-1825-0097"}}
                 ]}}
            ]}
        }"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.len(), 1);
        assert!(!page.is_empty());

        let record = page.into_results().remove(0).into_record().unwrap();
        assert_eq!(record.pmid, "1");
        assert_eq!(record.title_or_default(), "On the Origin of Species");
        assert_eq!(record.author_ids().count(), 1);
    }

    #[test]
    fn test_empty_page() {
        let json = r#"{"nextCursorMark": "x", "resultList": {"result": []}}"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert!(page.is_empty());
    }
}
