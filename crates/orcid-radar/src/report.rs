//! Run results and their CLI rendering.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::Pmid;

/// What one pass of one round attributed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoundTrace {
    /// 1-based round number.
    pub iteration: u64,

    /// Papers attributed by identifier propagation this round.
    pub by_propagation: Vec<Pmid>,

    /// Papers attributed by the scoring pass this round.
    pub by_score: Vec<Pmid>,
}

impl RoundTrace {
    /// Start an empty trace for the given round.
    #[must_use]
    pub fn new(iteration: u64) -> Self {
        Self { iteration, ..Default::default() }
    }

    /// Whether this round attributed anything at all.
    #[must_use]
    pub fn found_any(&self) -> bool {
        !self.by_propagation.is_empty() || !self.by_score.is_empty()
    }
}

/// Final result of one attribution run.
#[derive(Debug, Clone, Serialize)]
pub struct AttributionReport {
    /// The target identifier this run was for.
    pub orcid: String,

    /// Size of the candidate pool before the first round.
    pub potential_count: usize,

    /// Papers already linked to the ORCID upstream.
    pub linked_count: usize,

    /// Papers the engine attributed that were not linked upstream.
    pub new_found: BTreeSet<Pmid>,

    /// Per-round attribution trace.
    pub rounds: Vec<RoundTrace>,
}

impl AttributionReport {
    /// One-line summary in the shape of the classic CLI output.
    #[must_use]
    pub fn summary(&self) -> String {
        let pmids: Vec<&str> = self.new_found.iter().map(String::as_str).collect();
        format!(
            "ORCID: {}\tPotential papers: {}\tLinked papers: {}\tNew found papers: {} [{}]",
            self.orcid,
            self.potential_count,
            self.linked_count,
            self.new_found.len(),
            pmids.join(", ")
        )
    }

    /// Multi-line per-round trace for verbose mode.
    #[must_use]
    pub fn render_trace(&self) -> String {
        let mut out = String::new();
        for round in &self.rounds {
            out.push_str(&format!("Iteration {}\n", round.iteration));
            if !round.by_propagation.is_empty() {
                out.push_str(&format!(
                    "  {} new found papers by collaborator identifiers: {}\n",
                    round.by_propagation.len(),
                    round.by_propagation.join(", ")
                ));
            }
            if !round.by_score.is_empty() {
                out.push_str(&format!(
                    "  {} new found papers by score: {}\n",
                    round.by_score.len(),
                    round.by_score.join(", ")
                ));
            }
            if !round.found_any() {
                out.push_str("  no more papers were found\n");
            }
        }
        out
    }
}
