//! Mention extraction: which canonical terms a free text refers to

use crate::matching::contains_alias;
use medrag_domain::{normalize, AliasTable, CanonicalTerm};
use std::collections::BTreeSet;

/// Canonical terms with at least one alias mentioned in `text`
///
/// Matching is case-insensitive, whitespace-normalized and on word
/// boundaries (a trailing plural `s`/`es` is allowed). Presence is binary per
/// term: several matching aliases still yield the term once. An alias shared
/// by several terms (a drug-class name) yields all of them.
///
/// # Examples
///
/// ```
/// use medrag_domain::{AliasTable, CanonicalTerm};
/// use medrag_safety::extract_mentions;
///
/// let mut drugs = AliasTable::new();
/// drugs.insert("ibuprofen", ["advil"]);
///
/// let found = extract_mentions("Can I take ADVIL?", &drugs);
/// assert!(found.contains(&CanonicalTerm::new("ibuprofen")));
/// assert!(extract_mentions("", &drugs).is_empty());
/// ```
pub fn extract_mentions(text: &str, aliases: &AliasTable) -> BTreeSet<CanonicalTerm> {
    let text = normalize(text);
    if text.is_empty() {
        return BTreeSet::new();
    }

    aliases
        .iter()
        .filter(|(_, surface)| surface.iter().any(|alias| contains_alias(&text, alias)))
        .map(|(term, _)| term.clone())
        .collect()
}
