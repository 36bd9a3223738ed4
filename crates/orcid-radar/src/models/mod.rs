//! Data models for Europe PMC search results and the attribution engine.
//!
//! Wire types use `#[serde(default)]` for optional fields and
//! `#[serde(rename_all = "camelCase")]` to match the Europe PMC schema.

mod author;
mod corpus;
mod paper;

pub use author::{AuthorRecord, NameKey, PaperAuthor};
pub use corpus::{SearchCorpus, SearchOutcome};
pub use paper::{PaperRecord, RawResult, SearchPage};

/// PubMed identifier of a paper. Opaque string key.
pub type Pmid = String;

/// Unique author identifier in the literature database (an ORCID in
/// practice, but opaque to the engine).
pub type AuthorId = String;
