//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use colored::*;
use medrag_domain::{AliasTable, CanonicalTerm, ContraindicationRule, SafetyCheckResult, TermKind};
use medrag_pipeline::Answer;
use std::collections::BTreeSet;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a safety check result.
    pub fn format_check(&self, check: &SafetyCheckResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&check_json(check))?),
            OutputFormat::Table => Ok(self.format_check_table(check)),
        }
    }

    /// Format a pipeline answer.
    pub fn format_answer(&self, answer: &Answer) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let verdicts: Vec<serde_json::Value> = answer
                    .verdicts
                    .iter()
                    .map(|v| {
                        serde_json::json!({
                            "passed": v.passed,
                            "violated_rule": v.violated_rule.map(|r| r.as_str()),
                            "detail": v.detail,
                        })
                    })
                    .collect();
                let value = serde_json::json!({
                    "question_id": answer.question_id.to_string(),
                    "outcome": answer.outcome.as_str(),
                    "model": answer.model,
                    "answer": answer.text,
                    "check": check_json(&answer.check),
                    "verdicts": verdicts,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut out = String::new();
                if answer.check.has_warnings() {
                    out.push_str(&self.format_check_table(&answer.check));
                    out.push('\n');
                }
                out.push_str(&answer.text);
                out.push('\n');
                let footer = format!("[{} via {}]", answer.outcome, answer.model);
                out.push_str(&self.colorize(&footer, "cyan"));
                Ok(out)
            }
        }
    }

    /// Format one alias table.
    pub fn format_aliases(&self, kind: TermKind, table: &AliasTable) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: serde_json::Map<String, serde_json::Value> = table
                    .iter()
                    .map(|(term, aliases)| {
                        (term.as_str().to_string(), serde_json::json!(aliases))
                    })
                    .collect();
                let mut value = serde_json::Map::new();
                value.insert(kind.as_str().to_string(), serde_json::Value::Object(entries));
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                if table.is_empty() {
                    return Ok(self.colorize(&format!("No {} aliases.", kind.as_str()), "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Term", "Aliases"]);
                for (term, aliases) in table.iter() {
                    // The term's own spellings are implicit
                    let phrase = term.as_phrase();
                    let listed: Vec<&str> = aliases
                        .iter()
                        .map(String::as_str)
                        .filter(|a| *a != term.as_str() && *a != phrase)
                        .collect();
                    builder.push_record([term.as_str().to_string(), listed.join(", ")]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format the canonical terms found in a text.
    pub fn format_mentions(
        &self,
        text: &str,
        drugs: &BTreeSet<CanonicalTerm>,
        conditions: &BTreeSet<CanonicalTerm>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "text": text,
                "drugs": terms_json(drugs),
                "conditions": terms_json(conditions),
            }))?),
            OutputFormat::Table => {
                if drugs.is_empty() && conditions.is_empty() {
                    return Ok(self.colorize("No known drugs or conditions mentioned.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Kind", "Term"]);
                for term in drugs {
                    builder.push_record([TermKind::Drug.as_str(), term.as_str()]);
                }
                for term in conditions {
                    builder.push_record([TermKind::Condition.as_str(), term.as_str()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    fn format_check_table(&self, check: &SafetyCheckResult) -> String {
        let mut out = String::new();
        out.push_str(&self.info(&format!("Drugs mentioned: {}", join_terms(&check.drug_mentions))));
        out.push('\n');
        out.push_str(&self.info(&format!(
            "Patient conditions: {}",
            join_terms(&check.patient_conditions)
        )));
        out.push('\n');

        if !check.has_warnings() {
            out.push_str(&self.success("No contraindications found."));
            return out;
        }

        out.push_str(&self.warning(&format!(
            "{} contraindication(s) found",
            check.matched_rules.len()
        )));
        out.push('\n');

        let mut builder = Builder::default();
        builder.push_record(["Drug", "Relation", "Condition", "Reason"]);
        for rule in &check.matched_rules {
            builder.push_record([
                rule.drug.as_str(),
                rule.relation.as_str(),
                rule.condition.as_str(),
                rule.reason.as_str(),
            ]);
        }
        out.push_str(&self.render(builder));
        out
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a failed command for stderr.
    ///
    /// Pipeline failures show the refusal text meant for the person asking.
    pub fn format_error(&self, error: &CliError) -> String {
        match error {
            CliError::Pipeline(e) => self.error(&e.user_message()),
            e => self.error(&e.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn check_json(check: &SafetyCheckResult) -> serde_json::Value {
    let rules: Vec<serde_json::Value> = check.matched_rules.iter().map(rule_json).collect();
    serde_json::json!({
        "has_warnings": check.has_warnings(),
        "drug_mentions": terms_json(&check.drug_mentions),
        "patient_conditions": terms_json(&check.patient_conditions),
        "matched_rules": rules,
    })
}

fn rule_json(rule: &ContraindicationRule) -> serde_json::Value {
    serde_json::json!({
        "drug": rule.drug.as_str(),
        "relation": rule.relation.as_str(),
        "condition": rule.condition.as_str(),
        "reason": rule.reason,
        "directive": rule.directive(),
    })
}

fn terms_json(terms: &BTreeSet<CanonicalTerm>) -> Vec<&str> {
    terms.iter().map(CanonicalTerm::as_str).collect()
}

fn join_terms(terms: &BTreeSet<CanonicalTerm>) -> String {
    if terms.is_empty() {
        return "none".to_string();
    }
    terms.iter().map(CanonicalTerm::as_str).collect::<Vec<_>>().join(", ")
}
