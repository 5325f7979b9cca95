//! Alias dictionary loading
//!
//! The dictionary is plain data: a TOML file with a `[drugs]` and a
//! `[conditions]` table, each mapping a canonical term to its aliases.
//! Adding a drug or condition is a data edit, not a code change.

use crate::error::SafetyError;
use medrag_domain::{AliasDictionary, AliasTable};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Built-in alias dictionary source (TOML)
pub const BUILTIN_ALIASES: &str = include_str!("../config/aliases.toml");

#[derive(Debug, Deserialize)]
struct AliasFile {
    #[serde(default)]
    drugs: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    conditions: BTreeMap<String, Vec<String>>,
}

/// The alias dictionary shipped with the crate
pub fn builtin_aliases() -> Result<AliasDictionary, SafetyError> {
    aliases_from_toml(BUILTIN_ALIASES)
}

/// Parse an alias dictionary from a TOML string
///
/// # Examples
///
/// ```
/// use medrag_safety::aliases_from_toml;
/// use medrag_domain::CanonicalTerm;
///
/// let dict = aliases_from_toml(r#"
/// [drugs]
/// ibuprofen = ["advil", "motrin"]
///
/// [conditions]
/// heart_failure = ["chf"]
/// "#).unwrap();
///
/// assert_eq!(dict.drugs().canonicalize("Advil"), Some(&CanonicalTerm::new("ibuprofen")));
/// ```
pub fn aliases_from_toml(toml_str: &str) -> Result<AliasDictionary, SafetyError> {
    let file: AliasFile = toml::from_str(toml_str)
        .map_err(|e| SafetyError::Config(format!("Failed to parse alias TOML: {}", e)))?;

    let drugs = build_table("drugs", file.drugs)?;
    let conditions = build_table("conditions", file.conditions)?;
    Ok(AliasDictionary::new(drugs, conditions))
}

/// Load an alias dictionary from a TOML file
pub fn load_aliases(path: impl AsRef<Path>) -> Result<AliasDictionary, SafetyError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        SafetyError::Config(format!("Failed to read alias file {}: {}", path.display(), e))
    })?;
    aliases_from_toml(&contents)
}

fn build_table(
    section: &str,
    entries: BTreeMap<String, Vec<String>>,
) -> Result<AliasTable, SafetyError> {
    let mut table = AliasTable::new();
    for (term, aliases) in entries {
        if term.trim().is_empty() {
            return Err(SafetyError::Config(format!(
                "[{}] contains an empty canonical term",
                section
            )));
        }
        if let Some(blank) = aliases.iter().position(|a| a.trim().is_empty()) {
            return Err(SafetyError::Config(format!(
                "[{}] {}: alias #{} is empty",
                section,
                term,
                blank + 1
            )));
        }
        table.insert(term.as_str(), aliases);
    }
    Ok(table)
}
