//! Author models matching the Europe PMC `core` result schema.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{AuthorId, Pmid};

/// (full name, first name) identity proxy used when no identifier is
/// attached to an author entry.
///
/// Not globally unique: two different people may share a NameKey. That
/// ambiguity is an accepted source of false positives and negatives; the
/// scoring pass compensates with its pool-density threshold term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NameKey {
    /// Full name as printed on the paper, e.g. "Darwin C".
    pub full_name: String,

    /// First name, e.g. "Charles".
    pub first_name: String,
}

impl NameKey {
    /// Build a NameKey from owned parts.
    #[must_use]
    pub fn new(full_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self { full_name: full_name.into(), first_name: first_name.into() }
    }
}

impl std::fmt::Display for NameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.full_name, self.first_name)
    }
}

/// An author entry as it appears on one paper. Every field is optional;
/// consumers match on presence rather than assume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperAuthor {
    /// Attached identifier, if the record carries one.
    #[serde(default, deserialize_with = "deserialize_author_id")]
    pub author_id: Option<AuthorId>,

    /// Full name as printed.
    #[serde(default)]
    pub full_name: Option<String>,

    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
}

impl PaperAuthor {
    /// The author's NameKey, present only when both name parts are.
    #[must_use]
    pub fn name_key(&self) -> Option<NameKey> {
        match (&self.full_name, &self.first_name) {
            (Some(full), Some(first)) => Some(NameKey::new(full.clone(), first.clone())),
            _ => None,
        }
    }

    /// Whether this entry carries the given identifier.
    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.author_id.as_deref() == Some(id)
    }
}

/// Wire shape of `authorId`: `{"type": "ORCID", "value": "…"}`. Flattened
/// to the value string on deserialization.
fn deserialize_author_id<'de, D>(deserializer: D) -> Result<Option<AuthorId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wire {
        #[serde(default)]
        value: Option<String>,
    }

    let wire: Option<Wire> = Option::deserialize(deserializer)?;
    Ok(wire.and_then(|w| w.value))
}

/// An identified author aggregated across every paper in a search corpus:
/// identity fields plus the set of papers they appear on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorRecord {
    /// Full name as printed.
    pub full_name: Option<String>,

    /// First name.
    pub first_name: Option<String>,

    /// Last name.
    pub last_name: Option<String>,

    /// Papers this identifier appears on (co-authorship set).
    pub papers: BTreeSet<Pmid>,
}

impl AuthorRecord {
    /// The author's NameKey, present only when both name parts are.
    #[must_use]
    pub fn name_key(&self) -> Option<NameKey> {
        match (&self.full_name, &self.first_name) {
            (Some(full), Some(first)) => Some(NameKey::new(full.clone(), first.clone())),
            _ => None,
        }
    }
}
