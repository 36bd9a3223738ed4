//! Scored attribution pass.
//!
//! The fallback signal when no identifier overlap remains. Each candidate
//! gets an affinity score from the collaboration profile and is attributed
//! when the score strictly clears an iteration-dependent threshold. The
//! threshold grows with the iteration number, so later rounds are
//! progressively harder to clear and an inflating profile cannot cascade
//! into runaway false positives. The pool-density term normalizes for how
//! common the target's surname is in the remaining pool.
//!
//! The formula's exact shape replicates long-observed behavior upstream;
//! treat it as a contract when touching this module.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::profile::CollaborationProfile;
use crate::models::{AuthorId, NameKey, PaperRecord, Pmid};
use crate::normalize;

/// Outcome of one scoring pass.
#[derive(Debug, Clone, Default)]
pub struct ScoreOutcome {
    /// Candidate papers attributed by this pass.
    pub papers: BTreeSet<Pmid>,

    /// Identifiers of every co-author on the attributed papers (target
    /// excluded).
    pub collaborator_ids: BTreeSet<AuthorId>,

    /// NameKeys of every named co-author on the attributed papers.
    pub collaborator_keys: BTreeSet<NameKey>,
}

impl ScoreOutcome {
    /// Whether the pass attributed at least one paper.
    #[must_use]
    pub fn found_any(&self) -> bool {
        !self.papers.is_empty()
    }
}

/// Pool-wide surname density: the number of distinct NameKeys across the
/// remaining pool whose folded full-name first token matches any target
/// NameKey's first token.
#[must_use]
pub fn pool_density(
    candidates: &BTreeMap<Pmid, PaperRecord>,
    target_keys: &BTreeSet<NameKey>,
) -> u64 {
    let target_tokens: BTreeSet<String> =
        target_keys.iter().map(|k| normalize::first_token(&k.full_name)).collect();

    let mut matching: BTreeSet<NameKey> = BTreeSet::new();
    for paper in candidates.values() {
        for author in &paper.authors {
            let Some(key) = author.name_key() else { continue };
            if target_tokens.contains(&normalize::first_token(&key.full_name)) {
                matching.insert(key);
            }
        }
    }
    matching.len() as u64
}

/// Attribution threshold for one paper at the given iteration.
#[must_use]
pub fn threshold(author_count: u64, iteration: u64, density: u64) -> u64 {
    author_count * iteration * density
}

/// Affinity score for one paper against the profile.
///
/// Per named author: an exact NameKey hit in the profile adds its score; a
/// match against the target's own NameKey flags `exact_name` (counted once,
/// adds nothing); otherwise a surname collision earns half the summed
/// affinity of same-full-name profile entries. The summed score doubles on
/// `exact_name` and is multiplied by the squared count of contributing
/// authors.
#[must_use]
pub fn paper_score(
    paper: &PaperRecord,
    profile: &CollaborationProfile,
    target_keys: &BTreeSet<NameKey>,
) -> u64 {
    let mut scores: Vec<u64> = Vec::new();
    let mut exact_name = false;

    for author in &paper.authors {
        let Some(key) = author.name_key() else { continue };
        if let Some(score) = profile.get(&key) {
            scores.push(u64::from(score));
        } else if target_keys.contains(&key) {
            exact_name = true;
        } else {
            let partial = profile.partial_credit(&key.full_name);
            if partial > 0 {
                scores.push(partial);
            }
        }
    }

    let nonzeros = scores.len() as u64;
    let mut score: u64 = scores.iter().sum();
    if exact_name {
        score *= 2;
    }
    score * nonzeros * nonzeros
}

/// Run the scoring pass over the remaining pool at `iteration`.
///
/// The density term is computed once against the pool as it stands on
/// entry; attributed papers are removed by the caller after the pass.
pub fn pass(
    candidates: &BTreeMap<Pmid, PaperRecord>,
    candidate_author_ids: &HashMap<Pmid, BTreeSet<AuthorId>>,
    profile: &CollaborationProfile,
    iteration: u64,
    target_keys: &BTreeSet<NameKey>,
    target: &str,
) -> ScoreOutcome {
    let density = pool_density(candidates, target_keys);
    let mut outcome = ScoreOutcome::default();

    for (pmid, paper) in candidates {
        let score = paper_score(paper, profile, target_keys);
        let threshold = threshold(paper.author_count() as u64, iteration, density);
        tracing::trace!(%pmid, score, threshold, iteration, "scored candidate");

        if score > threshold {
            outcome.papers.insert(pmid.clone());

            if let Some(ids) = candidate_author_ids.get(pmid) {
                outcome
                    .collaborator_ids
                    .extend(ids.iter().filter(|id| *id != target).cloned());
            }
            outcome.collaborator_keys.extend(paper.authors.iter().filter_map(|a| a.name_key()));
        }
    }

    outcome
}
