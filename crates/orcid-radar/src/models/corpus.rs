//! Accumulated view over every page of one search.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{AuthorId, AuthorRecord, PaperRecord, Pmid, RawResult};

/// Everything one search produced: papers keyed by pmid, identified authors
/// with their co-authorship sets, and the per-paper author-identifier index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCorpus {
    /// Papers keyed by pmid. Ordered map for deterministic traversal.
    pub papers: BTreeMap<Pmid, PaperRecord>,

    /// Identified authors aggregated across all papers.
    pub authors: HashMap<AuthorId, AuthorRecord>,

    /// Identifiers attached to each paper's author list.
    pub paper_author_ids: HashMap<Pmid, BTreeSet<AuthorId>>,
}

impl SearchCorpus {
    /// Fold one page of raw results into the corpus. Results without a pmid
    /// are skipped; results without an author list still enter `papers` and
    /// get an empty identifier set.
    pub fn absorb(&mut self, results: Vec<RawResult>) {
        for raw in results {
            let Some(record) = raw.into_record() else { continue };
            let pmid = record.pmid.clone();

            let ids = self.paper_author_ids.entry(pmid.clone()).or_default();
            for author in &record.authors {
                let Some(id) = &author.author_id else { continue };
                ids.insert(id.clone());

                let entry = self.authors.entry(id.clone()).or_default();
                if entry.full_name.is_none() {
                    entry.full_name.clone_from(&author.full_name);
                }
                if entry.first_name.is_none() {
                    entry.first_name.clone_from(&author.first_name);
                }
                if entry.last_name.is_none() {
                    entry.last_name.clone_from(&author.last_name);
                }
                entry.papers.insert(pmid.clone());
            }

            self.papers.insert(pmid, record);
        }
    }

    /// Number of papers in the corpus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether the corpus holds no papers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

/// Result of one (possibly truncated) search.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Records gathered so far.
    pub corpus: SearchCorpus,

    /// Cursor to resume from when pagination failed mid-way. `None` means
    /// the search ran to completion.
    pub resume_cursor: Option<String>,
}

impl SearchOutcome {
    /// Whether the search ran to completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.resume_cursor.is_none()
    }
}
