//! Identifier propagation pass.
//!
//! Identifier overlap is essentially unambiguous evidence of co-authorship
//! with a known collaborator, so this is the cheap, high-confidence signal.
//! The known-identifier frontier expands within the pass: a paper early in
//! the traversal can unlock one later in it, and the convergence loop
//! re-runs the pass until it finds nothing, so the result is the transitive
//! closure either way.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{AuthorId, PaperRecord, Pmid};

/// Outcome of one propagation pass.
#[derive(Debug, Clone, Default)]
pub struct PropagationOutcome {
    /// Candidate papers attributed by this pass.
    pub papers: BTreeSet<Pmid>,

    /// Every non-target identifier on the attributed papers, including ones
    /// already known. Each gets a fresh profile credit from the caller, so
    /// a collaborator accumulates affinity per paper attributed through
    /// them, not once ever.
    pub new_collaborators: BTreeSet<AuthorId>,
}

impl PropagationOutcome {
    /// Whether the pass attributed at least one paper.
    #[must_use]
    pub fn found_any(&self) -> bool {
        !self.papers.is_empty()
    }
}

/// Attribute every candidate whose author-identifier set intersects the
/// known-collaborator set. All identifiers on an attributed paper, except
/// the target's own, are merged into `known_ids`.
pub fn pass(
    candidates: &BTreeMap<Pmid, PaperRecord>,
    candidate_author_ids: &HashMap<Pmid, BTreeSet<AuthorId>>,
    known_ids: &mut BTreeSet<AuthorId>,
    target: &str,
) -> PropagationOutcome {
    let mut outcome = PropagationOutcome::default();

    for pmid in candidates.keys() {
        let Some(ids) = candidate_author_ids.get(pmid) else { continue };
        if ids.iter().any(|id| known_ids.contains(id)) {
            for id in ids {
                if id != target {
                    known_ids.insert(id.clone());
                    outcome.new_collaborators.insert(id.clone());
                }
            }
            outcome.papers.insert(pmid.clone());
        }
    }

    outcome
}
