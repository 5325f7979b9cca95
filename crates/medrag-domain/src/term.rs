//! Canonical terms and text normalization

use std::fmt;

/// Lowercase `text` and collapse every whitespace run into a single space.
///
/// # Examples
///
/// ```
/// use medrag_domain::normalize;
///
/// assert_eq!(normalize("  Heart\tFailure \n"), "heart failure");
/// ```
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized identity of a drug or condition, independent of surface form.
///
/// Canonical terms are lowercase and whitespace-normalized; they typically use
/// underscores between words (`heart_failure`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTerm(String);

impl CanonicalTerm {
    /// Create a canonical term, normalizing case and whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use medrag_domain::CanonicalTerm;
    ///
    /// let term = CanonicalTerm::new("Heart_Failure");
    /// assert_eq!(term.as_str(), "heart_failure");
    /// ```
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(normalize(name.as_ref()))
    }

    /// The normalized key
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The term read as words (`heart_failure` → `heart failure`)
    pub fn as_phrase(&self) -> String {
        self.0.replace('_', " ")
    }

    /// Upper-case rendering used in directive lines (`HEART_FAILURE`)
    pub fn to_upper(&self) -> String {
        self.0.to_uppercase()
    }

    /// Whether a graph or text name spells this term
    ///
    /// Case, whitespace and underscores versus spaces are ignored, so
    /// `Atrial Fibrillation` names `atrial_fibrillation`.
    ///
    /// # Examples
    ///
    /// ```
    /// use medrag_domain::CanonicalTerm;
    ///
    /// let term = CanonicalTerm::new("atrial_fibrillation");
    /// assert!(term.is_named("Atrial  Fibrillation"));
    /// assert!(term.is_named("ATRIAL_FIBRILLATION"));
    /// assert!(!term.is_named("fibrillation"));
    /// ```
    pub fn is_named(&self, name: &str) -> bool {
        normalize(name).replace('_', " ") == self.as_phrase()
    }

    /// Whether the term is empty after normalization
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalTerm {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CanonicalTerm {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
