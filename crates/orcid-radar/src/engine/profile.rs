//! Collaboration profile: NameKey -> affinity score accumulator.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::weights;
use crate::models::{AuthorId, NameKey, PaperRecord, Pmid};
use crate::normalize;

/// Affinity scores per collaborator NameKey. Scores only grow; the target's
/// own NameKeys never appear (see [`seed`]).
#[derive(Debug, Clone, Default)]
pub struct CollaborationProfile {
    scores: HashMap<NameKey, u32>,
}

impl CollaborationProfile {
    /// Add `weight` to the collaborator's affinity score.
    pub fn credit(&mut self, key: NameKey, weight: u32) {
        *self.scores.entry(key).or_insert(0) += weight;
    }

    /// Affinity score for an exact NameKey, if present.
    #[must_use]
    pub fn get(&self, key: &NameKey) -> Option<u32> {
        self.scores.get(key).copied()
    }

    /// Half the summed affinity of every entry whose full name matches
    /// `full_name` after folding. Partial credit for a surname collision
    /// where the first name disagrees or is differently abbreviated.
    #[must_use]
    pub fn partial_credit(&self, full_name: &str) -> u64 {
        let folded = normalize::fold_name(full_name);
        let total: u64 = self
            .scores
            .iter()
            .filter(|(key, _)| normalize::fold_name(&key.full_name) == folded)
            .map(|(_, score)| u64::from(*score))
            .sum();
        total / 2
    }

    /// Remove a NameKey outright. Used once, while seeding, to evict the
    /// target's own keys.
    pub fn remove(&mut self, key: &NameKey) {
        self.scores.remove(key);
    }

    /// Number of scored collaborators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no collaborator has been scored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Output of profile seeding.
#[derive(Debug, Clone, Default)]
pub struct SeededProfile {
    /// Collaborator affinity scores, target keys excluded.
    pub profile: CollaborationProfile,

    /// Identifiers of collaborators seen on confirmed papers.
    pub known_ids: BTreeSet<AuthorId>,

    /// The target's own NameKeys, as they appear on confirmed papers.
    pub target_keys: BTreeSet<NameKey>,
}

/// Build the initial profile from the target's confirmed papers.
///
/// Every named author is credited [`weights::IDENTIFIER_CONFIRMED`]; authors
/// carrying a non-target identifier join `known_ids`. Target NameKeys are
/// collected over the whole pass and removed from the profile only at the
/// end, so the outcome does not depend on author order within a paper.
#[must_use]
pub fn seed(target: &str, confirmed: &BTreeMap<Pmid, PaperRecord>) -> SeededProfile {
    let mut seeded = SeededProfile::default();

    for paper in confirmed.values() {
        for author in &paper.authors {
            let Some(key) = author.name_key() else { continue };
            seeded.profile.credit(key.clone(), weights::IDENTIFIER_CONFIRMED);

            if let Some(id) = &author.author_id {
                if id == target {
                    seeded.target_keys.insert(key);
                } else {
                    seeded.known_ids.insert(id.clone());
                }
            }
        }
    }

    for key in &seeded.target_keys {
        seeded.profile.remove(key);
    }

    seeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperAuthor;

    fn author(full: &str, first: &str, id: Option<&str>) -> PaperAuthor {
        PaperAuthor {
            author_id: id.map(String::from),
            full_name: Some(full.to_string()),
            first_name: Some(first.to_string()),
            last_name: None,
        }
    }

    fn paper(pmid: &str, authors: Vec<PaperAuthor>) -> (Pmid, PaperRecord) {
        (pmid.to_string(), PaperRecord { pmid: pmid.to_string(), authors, ..Default::default() })
    }

    #[test]
    fn test_seed_credits_and_excludes_target() {
        let confirmed: BTreeMap<_, _> = [paper(
            "1",
            vec![
                author("Darwin C", "Charles", Some("id-darwin")),
                author("Wallace AR", "Alfred", Some("id-wallace")),
                author("Hooker JD", "Joseph", None),
            ],
        )]
        .into_iter()
        .collect();

        let seeded = seed("id-darwin", &confirmed);

        // The target's own NameKey never stays in the profile.
        assert!(seeded.profile.get(&NameKey::new("Darwin C", "Charles")).is_none());
        assert!(seeded.target_keys.contains(&NameKey::new("Darwin C", "Charles")));

        assert_eq!(seeded.profile.get(&NameKey::new("Wallace AR", "Alfred")), Some(20));
        // No identifier: profile credit but no known id.
        assert_eq!(seeded.profile.get(&NameKey::new("Hooker JD", "Joseph")), Some(20));
        assert_eq!(seeded.known_ids.len(), 1);
        assert!(seeded.known_ids.contains("id-wallace"));
    }

    #[test]
    fn test_seed_target_exclusion_is_order_independent() {
        // Target listed last: the earlier credit must still be evicted.
        let confirmed: BTreeMap<_, _> = [
            paper("1", vec![author("Darwin C", "Charles", None)]),
            paper("2", vec![author("Darwin C", "Charles", Some("id-darwin"))]),
        ]
        .into_iter()
        .collect();

        let seeded = seed("id-darwin", &confirmed);
        assert!(seeded.profile.get(&NameKey::new("Darwin C", "Charles")).is_none());
    }

    #[test]
    fn test_repeat_collaborator_accumulates() {
        let confirmed: BTreeMap<_, _> = [
            paper("1", vec![author("Wallace AR", "Alfred", Some("id-wallace"))]),
            paper("2", vec![author("Wallace AR", "Alfred", Some("id-wallace"))]),
        ]
        .into_iter()
        .collect();

        let seeded = seed("id-darwin", &confirmed);
        assert_eq!(seeded.profile.get(&NameKey::new("Wallace AR", "Alfred")), Some(40));
    }

    #[test]
    fn test_partial_credit_folds_accents() {
        let mut profile = CollaborationProfile::default();
        profile.credit(NameKey::new("García J", "Juan"), 20);
        profile.credit(NameKey::new("Garcia J", "Jose"), 20);
        profile.credit(NameKey::new("Smith K", "Kate"), 20);

        // Both García entries fold to the same full name.
        assert_eq!(profile.partial_credit("Garcia J"), 20);
        assert_eq!(profile.partial_credit("Nobody X"), 0);
    }
}
