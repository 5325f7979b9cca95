//! Contraindication rules read from the knowledge graph

use crate::term::CanonicalTerm;
use std::fmt;

/// Typed drug → condition relationship kinds the safety check enforces
///
/// Variant order is the sort order used for rule presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    /// The drug must not be used with the condition
    ContraindicatedIn,

    /// The drug interacts with treatment of the condition
    InteractsWith,

    /// The drug makes the condition worse
    Worsens,
}

impl Relation {
    /// All enforced relation kinds
    pub const ALL: [Relation; 3] = [
        Relation::ContraindicatedIn,
        Relation::InteractsWith,
        Relation::Worsens,
    ];

    /// Relationship-type string as stored in the graph
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::ContraindicatedIn => "CONTRAINDICATED_IN",
            Relation::InteractsWith => "INTERACTS_WITH",
            Relation::Worsens => "WORSENS",
        }
    }

    /// Parse a graph relationship type (case-insensitive)
    ///
    /// Returns `None` for kinds the check does not enforce, such as `SAFE_FOR`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CONTRAINDICATED_IN" => Some(Relation::ContraindicatedIn),
            "INTERACTS_WITH" => Some(Relation::InteractsWith),
            "WORSENS" => Some(Relation::Worsens),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contraindication rule: `drug` `relation` `condition`, with a reason
///
/// Rules order by (drug, relation, condition); the reason does not take part
/// in the ordering beyond breaking exact ties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContraindicationRule {
    /// Canonical drug
    pub drug: CanonicalTerm,

    /// Relationship kind
    pub relation: Relation,

    /// Canonical condition
    pub condition: CanonicalTerm,

    /// Free-text reason from the graph (may be empty)
    pub reason: String,
}

impl ContraindicationRule {
    /// Create a new rule
    pub fn new(
        drug: impl Into<CanonicalTerm>,
        relation: Relation,
        condition: impl Into<CanonicalTerm>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            drug: drug.into(),
            relation,
            condition: condition.into(),
            reason: reason.into(),
        }
    }

    /// Directive line: `WARNING: IBUPROFEN is CONTRAINDICATED_IN HEART_FAILURE`
    pub fn directive(&self) -> String {
        format!(
            "WARNING: {} is {} {}",
            self.drug.to_upper(),
            self.relation,
            self.condition.to_upper()
        )
    }

    /// Identity used for deduplication (reason excluded)
    pub fn key(&self) -> (&CanonicalTerm, Relation, &CanonicalTerm) {
        (&self.drug, self.relation, &self.condition)
    }
}

/// Parameters of a contraindication query against the graph
///
/// Names are lowercase surface forms; the store matches them
/// case-insensitively against entity identifiers and display names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleQuery {
    /// Surface forms of the mentioned drugs
    pub drug_names: Vec<String>,

    /// Surface forms of the patient's conditions
    pub condition_names: Vec<String>,

    /// Relationship-type strings to match
    pub relations: Vec<String>,
}

impl RuleQuery {
    /// Build a query over every enforced relation kind
    pub fn new(drug_names: Vec<String>, condition_names: Vec<String>) -> Self {
        Self {
            drug_names,
            condition_names,
            relations: Relation::ALL.iter().map(|r| r.as_str().to_string()).collect(),
        }
    }
}

/// Raw relationship row returned by the graph store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    /// Drug entity name (identifier or display name)
    pub drug: String,

    /// Relationship type string
    pub relation: String,

    /// Condition entity name (identifier or display name)
    pub condition: String,

    /// Reason property, when the relationship carries one
    pub reason: Option<String>,
}

impl RuleRecord {
    /// Create a new record
    pub fn new(
        drug: impl Into<String>,
        relation: impl Into<String>,
        condition: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            drug: drug.into(),
            relation: relation.into(),
            condition: condition.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_parse() {
        assert_eq!(Relation::parse("CONTRAINDICATED_IN"), Some(Relation::ContraindicatedIn));
        assert_eq!(Relation::parse("worsens"), Some(Relation::Worsens));
        assert_eq!(Relation::parse(" Interacts_With "), Some(Relation::InteractsWith));
        assert_eq!(Relation::parse("SAFE_FOR"), None);
    }

    #[test]
    fn test_relation_round_trip() {
        for relation in Relation::ALL {
            assert_eq!(Relation::parse(relation.as_str()), Some(relation));
        }
    }

    #[test]
    fn test_directive_format() {
        let rule = ContraindicationRule::new(
            "ibuprofen",
            Relation::ContraindicatedIn,
            "heart_failure",
            "causes fluid retention",
        );
        assert_eq!(rule.directive(), "WARNING: IBUPROFEN is CONTRAINDICATED_IN HEART_FAILURE");

        let rule = ContraindicationRule::new("warfarin", Relation::InteractsWith, "liver_disease", "");
        assert_eq!(rule.directive(), "WARNING: WARFARIN is INTERACTS_WITH LIVER_DISEASE");
    }

    #[test]
    fn test_rule_ordering() {
        let mut rules = vec![
            ContraindicationRule::new("naproxen", Relation::ContraindicatedIn, "ckd", ""),
            ContraindicationRule::new("ibuprofen", Relation::Worsens, "hypertension", ""),
            ContraindicationRule::new("ibuprofen", Relation::ContraindicatedIn, "heart_failure", ""),
            ContraindicationRule::new("ibuprofen", Relation::ContraindicatedIn, "ckd", ""),
        ];
        rules.sort();

        let keys: Vec<_> = rules
            .iter()
            .map(|r| format!("{} {} {}", r.drug, r.relation, r.condition))
            .collect();
        assert_eq!(
            keys,
            vec![
                "ibuprofen CONTRAINDICATED_IN ckd",
                "ibuprofen CONTRAINDICATED_IN heart_failure",
                "ibuprofen WORSENS hypertension",
                "naproxen CONTRAINDICATED_IN ckd",
            ]
        );
    }

    #[test]
    fn test_rule_query_covers_all_relations() {
        let query = RuleQuery::new(vec!["ibuprofen".into()], vec!["heart failure".into()]);
        assert_eq!(
            query.relations,
            vec!["CONTRAINDICATED_IN", "INTERACTS_WITH", "WORSENS"]
        );
    }
}
