//! Alias tables mapping surface forms to canonical terms
//!
//! The dictionary is built once at process start and shared read-only
//! (typically behind an `Arc`) by every component that needs it.

use crate::term::{normalize, CanonicalTerm};
use std::collections::{BTreeMap, BTreeSet};

/// Which table of the dictionary a term lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Medications, brand names, drug classes
    Drug,

    /// Diseases and conditions
    Condition,
}

impl TermKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::Drug => "drug",
            TermKind::Condition => "condition",
        }
    }
}

/// Mapping from canonical term to its set of normalized aliases
///
/// Every canonical term is implicitly its own alias, both as written
/// (`heart_failure`) and read as words (`heart failure`).
///
/// # Examples
///
/// ```
/// use medrag_domain::{AliasTable, CanonicalTerm};
///
/// let mut table = AliasTable::new();
/// table.insert("ibuprofen", ["Advil", "motrin"]);
///
/// let term = table.canonicalize("ADVIL").unwrap();
/// assert_eq!(term, &CanonicalTerm::new("ibuprofen"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    entries: BTreeMap<CanonicalTerm, BTreeSet<String>>,
    reverse: BTreeMap<String, BTreeSet<CanonicalTerm>>,
}

impl AliasTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add aliases for a canonical term, creating the entry if needed
    ///
    /// Aliases are normalized; empty aliases are skipped.
    pub fn insert<I, S>(&mut self, term: impl Into<CanonicalTerm>, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let term = term.into();
        let mut surface: Vec<String> = vec![term.as_str().to_string(), term.as_phrase()];
        surface.extend(aliases.into_iter().map(|a| normalize(a.as_ref())));

        let set = self.entries.entry(term.clone()).or_default();
        for alias in surface.into_iter().filter(|a| !a.is_empty()) {
            self.reverse
                .entry(alias.clone())
                .or_default()
                .insert(term.clone());
            set.insert(alias);
        }
    }

    /// Canonical terms in ascending order
    pub fn terms(&self) -> impl Iterator<Item = &CanonicalTerm> {
        self.entries.keys()
    }

    /// Iterate over (term, aliases) pairs in ascending term order
    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalTerm, &BTreeSet<String>)> {
        self.entries.iter()
    }

    /// Aliases for a term, if the term is known
    pub fn aliases(&self, term: &CanonicalTerm) -> Option<&BTreeSet<String>> {
        self.entries.get(term)
    }

    /// Whether the term has an entry
    pub fn contains(&self, term: &CanonicalTerm) -> bool {
        self.entries.contains_key(term)
    }

    /// Exact lookup of a surface form (case and whitespace insensitive)
    ///
    /// A shared alias resolves to the lowest owning term; use [`owners`]
    /// to see all of them.
    ///
    /// [`owners`]: AliasTable::owners
    pub fn canonicalize(&self, surface: &str) -> Option<&CanonicalTerm> {
        self.reverse
            .get(&normalize(surface))
            .and_then(|owners| owners.iter().next())
    }

    /// Every canonical term listing this surface form, ascending
    pub fn owners(&self, surface: &str) -> Vec<&CanonicalTerm> {
        self.reverse
            .get(&normalize(surface))
            .map(|owners| owners.iter().collect())
            .unwrap_or_default()
    }

    /// All surface strings for the given terms, sorted and deduplicated
    ///
    /// Terms without an entry contribute their own key and phrase form.
    pub fn surface_forms<'a, I>(&self, terms: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a CanonicalTerm>,
    {
        let mut forms = BTreeSet::new();
        for term in terms {
            match self.entries.get(term) {
                Some(aliases) => forms.extend(aliases.iter().cloned()),
                None => {
                    forms.insert(term.as_str().to_string());
                    forms.insert(term.as_phrase());
                }
            }
        }
        forms.into_iter().filter(|f| !f.is_empty()).collect()
    }

    /// Number of canonical terms
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no terms
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable drug and condition alias tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasDictionary {
    drugs: AliasTable,
    conditions: AliasTable,
}

impl AliasDictionary {
    /// Create a dictionary from its two tables
    pub fn new(drugs: AliasTable, conditions: AliasTable) -> Self {
        Self { drugs, conditions }
    }

    /// Drug table
    pub fn drugs(&self) -> &AliasTable {
        &self.drugs
    }

    /// Condition table
    pub fn conditions(&self) -> &AliasTable {
        &self.conditions
    }

    /// Table for the given kind
    pub fn table(&self, kind: TermKind) -> &AliasTable {
        match kind {
            TermKind::Drug => &self.drugs,
            TermKind::Condition => &self.conditions,
        }
    }
}
