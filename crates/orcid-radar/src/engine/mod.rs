//! The iterative attribution engine.
//!
//! Seeds a collaboration profile from ORCID-confirmed papers, then
//! alternates two passes over the candidate pool until a fixed point:
//! identifier propagation (high confidence, run exhaustively first every
//! round) and scored attribution (heuristic fallback). Newly attributed
//! papers feed their authors back into the profile, so each round can
//! unlock the next.
//!
//! All engine state is owned by one [`AttributionEngine`] per target; batch
//! runs over several ORCIDs are fully independent.

pub mod profile;
pub mod propagate;
pub mod score;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use profile::CollaborationProfile;

use crate::client::EuropePmcClient;
use crate::config::weights;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuthorId, AuthorRecord, NameKey, PaperRecord, Pmid, SearchCorpus};
use crate::report::{AttributionReport, RoundTrace};

/// Attribution state for a single target identifier.
#[derive(Debug)]
pub struct AttributionEngine {
    /// The target's identifier.
    target: AuthorId,

    /// Collaborator affinity scores.
    profile: CollaborationProfile,

    /// Identifiers believed to belong to real collaborators.
    known_ids: BTreeSet<AuthorId>,

    /// The target's own NameKeys, as seen on confirmed papers.
    target_keys: BTreeSet<NameKey>,

    /// Remaining candidate papers. Shrinks monotonically.
    candidates: BTreeMap<Pmid, PaperRecord>,

    /// Author-identifier index over the remaining candidates.
    candidate_author_ids: HashMap<Pmid, BTreeSet<AuthorId>>,

    /// Identified authors across the candidate corpus, for resolving an
    /// identifier discovered mid-run to a NameKey.
    candidate_authors: HashMap<AuthorId, AuthorRecord>,

    /// Papers attributed so far. Grows monotonically.
    attributed: BTreeSet<Pmid>,

    /// Round counter, 1-based once the loop starts.
    iteration: u64,

    /// Per-round attribution trace.
    rounds: Vec<RoundTrace>,
}

impl AttributionEngine {
    /// Build an engine from the confirmed corpus and the candidate corpus.
    ///
    /// Confirmed papers are deleted from the candidate pool up front; the
    /// profile, known-collaborator set and target NameKeys are seeded from
    /// the confirmed papers.
    #[must_use]
    pub fn new(target: &str, confirmed: &SearchCorpus, mut candidates: SearchCorpus) -> Self {
        for pmid in confirmed.papers.keys() {
            candidates.papers.remove(pmid);
            candidates.paper_author_ids.remove(pmid);
        }

        let seeded = profile::seed(target, &confirmed.papers);

        Self {
            target: target.to_string(),
            profile: seeded.profile,
            known_ids: seeded.known_ids,
            target_keys: seeded.target_keys,
            candidates: candidates.papers,
            candidate_author_ids: candidates.paper_author_ids,
            candidate_authors: candidates.authors,
            attributed: BTreeSet::new(),
            iteration: 0,
            rounds: Vec::new(),
        }
    }

    /// Number of candidates still in the pool.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Papers attributed so far.
    #[must_use]
    pub fn attributed(&self) -> &BTreeSet<Pmid> {
        &self.attributed
    }

    /// Per-round trace of what each pass attributed.
    #[must_use]
    pub fn rounds(&self) -> &[RoundTrace] {
        &self.rounds
    }

    /// Run rounds until neither pass attributes a paper.
    ///
    /// Each round increments the iteration counter and runs propagation
    /// first; scoring only runs in rounds where propagation found nothing.
    /// Terminates after at most |initial pool| productive rounds plus one.
    pub fn converge(&mut self) -> &BTreeSet<Pmid> {
        loop {
            self.iteration += 1;
            let mut trace = RoundTrace::new(self.iteration);

            let prop = propagate::pass(
                &self.candidates,
                &self.candidate_author_ids,
                &mut self.known_ids,
                &self.target,
            );

            if prop.found_any() {
                self.credit_identified(&prop.new_collaborators, weights::IDENTIFIER_CONFIRMED);
                trace.by_propagation = prop.papers.iter().cloned().collect();
                self.remove_attributed(&prop.papers);
                tracing::debug!(
                    iteration = self.iteration,
                    papers = prop.papers.len(),
                    "attributed via collaborator identifiers"
                );
                self.rounds.push(trace);
                continue;
            }

            let scored = score::pass(
                &self.candidates,
                &self.candidate_author_ids,
                &self.profile,
                self.iteration,
                &self.target_keys,
                &self.target,
            );

            self.credit_identified(&scored.collaborator_ids, weights::IDENTIFIER_CONFIRMED);
            for key in &scored.collaborator_keys {
                if !self.target_keys.contains(key) {
                    self.profile.credit(key.clone(), weights::NAME_ONLY);
                }
            }

            if scored.found_any() {
                trace.by_score = scored.papers.iter().cloned().collect();
                self.remove_attributed(&scored.papers);
                tracing::debug!(
                    iteration = self.iteration,
                    papers = scored.papers.len(),
                    "attributed via affinity score"
                );
                self.rounds.push(trace);
            } else {
                tracing::debug!(iteration = self.iteration, "no more papers found, converged");
                self.rounds.push(trace);
                return &self.attributed;
            }
        }
    }

    /// Credit identifier-confirmed collaborators into the profile, when the
    /// candidate corpus has a usable name for them. The target's own
    /// NameKeys stay excluded.
    fn credit_identified(&mut self, ids: &BTreeSet<AuthorId>, weight: u32) {
        for id in ids {
            let Some(key) = self.candidate_authors.get(id).and_then(AuthorRecord::name_key)
            else {
                continue;
            };
            if !self.target_keys.contains(&key) {
                self.profile.credit(key, weight);
            }
        }
    }

    /// Move a pass's papers from the pool into the attributed set. Applied
    /// together with that pass's profile credits, inside the same round.
    fn remove_attributed(&mut self, papers: &BTreeSet<Pmid>) {
        for pmid in papers {
            self.candidates.remove(pmid);
            self.candidate_author_ids.remove(pmid);
            self.attributed.insert(pmid.clone());
        }
    }
}

/// Drop from `attributed` any paper already in the confirmed set. Defends
/// against the upstream source listing a paper as both confirmed and
/// candidate.
#[must_use]
pub fn delete_existing(
    attributed: &BTreeSet<Pmid>,
    confirmed: &BTreeMap<Pmid, PaperRecord>,
) -> BTreeSet<Pmid> {
    attributed.iter().filter(|pmid| !confirmed.contains_key(*pmid)).cloned().collect()
}

/// Run the full attribution pipeline for one ORCID.
///
/// Searches Europe PMC for the ORCID's linked papers, then for every paper
/// sharing the target's name, and drives the engine to convergence. Partial
/// search results (interrupted pagination) are used as-is.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTarget`] when the ORCID has no linked
/// papers or no resolvable name, and [`EngineError::Client`] when the
/// search service is unreachable.
pub async fn run(client: &EuropePmcClient, orcid: &str) -> EngineResult<AttributionReport> {
    tracing::info!(orcid, "retrieving linked papers");
    let confirmed = client.search(orcid).await?.corpus;

    if confirmed.is_empty() {
        return Err(EngineError::invalid_target(orcid));
    }

    let Some(target_name) =
        confirmed.authors.get(orcid).and_then(|a| a.full_name.clone())
    else {
        return Err(EngineError::invalid_target(orcid));
    };

    tracing::info!(orcid, %target_name, linked = confirmed.len(), "retrieving potential papers");
    let candidates = client.search(&target_name).await?.corpus;

    let mut engine = AttributionEngine::new(orcid, &confirmed, candidates);
    let potential_count = engine.candidate_count();
    tracing::info!(orcid, potential = potential_count, "starting attribution rounds");

    engine.converge();
    let new_found = delete_existing(engine.attributed(), &confirmed.papers);

    tracing::info!(orcid, new_found = new_found.len(), rounds = engine.rounds().len(), "run complete");

    Ok(AttributionReport {
        orcid: orcid.to_string(),
        potential_count,
        linked_count: confirmed.len(),
        new_found,
        rounds: engine.rounds().to_vec(),
    })
}
