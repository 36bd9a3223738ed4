//! Name folding for accent- and punctuation-tolerant comparison.
//!
//! Europe PMC author strings are typed by journals, not curated: the same
//! person appears as "García-Pérez" on one paper and "Garcia Perez" on
//! another. Comparisons in the scoring pass run on the folded form so those
//! spellings collide; the stored records keep their source spelling.

use unicode_normalization::UnicodeNormalization;

/// Fold a name for comparison: NFKD-decompose, drop combining marks and
/// other non-ASCII, lowercase, map hyphens to spaces, strip periods.
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '-' { ' ' } else { c })
        .filter(|c| *c != '.')
        .collect::<String>()
        .to_lowercase()
}

/// First whitespace-separated token of a folded name, used as the
/// surname proxy in the pool-density term (Europe PMC full names are
/// "Surname Initials").
#[must_use]
pub fn first_token(name: &str) -> String {
    fold_name(name).split_whitespace().next().unwrap_or_default().to_string()
}

/// Whether two names are equal after folding.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    fold_name(a) == fold_name(b)
}
