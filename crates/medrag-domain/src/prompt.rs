//! Generation prompts and graph context rows

use std::fmt;

/// A prompt for the external text generator
///
/// `render()` flattens it into the single text most local model APIs take.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    /// System instructions
    pub system: String,

    /// Context lines, in presentation order
    pub context: Vec<String>,

    /// The user's question
    pub question: String,
}

impl Prompt {
    /// Create a new prompt
    pub fn new(system: impl Into<String>, context: Vec<String>, question: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            context,
            question: question.into(),
        }
    }

    /// Everything except the system instructions
    pub fn user_text(&self) -> String {
        let mut text = format!("Question: {}\n", self.question);
        if !self.context.is_empty() {
            text.push_str("\nPatient Information and Medical Knowledge Graph:\n");
            text.push_str(&self.context.join("\n"));
            text.push('\n');
        }
        text
    }

    /// System instructions followed by the user text
    pub fn render(&self) -> String {
        if self.system.is_empty() {
            return self.user_text();
        }
        format!("{}\n\n{}", self.system, self.user_text())
    }
}

/// One relationship row of patient subgraph context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTriple {
    /// Source entity name
    pub source: String,

    /// Relationship type
    pub relation: String,

    /// Target entity name
    pub target: String,
}

impl ContextTriple {
    /// Create a new triple
    pub fn new(
        source: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            relation: relation.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for ContextTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.relation, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_orders_sections() {
        let prompt = Prompt::new(
            "You are a careful assistant.",
            vec!["line one".to_string(), "line two".to_string()],
            "Can I take ibuprofen?",
        );
        let text = prompt.render();

        let system = text.find("careful assistant").unwrap();
        let question = text.find("Can I take ibuprofen?").unwrap();
        let first = text.find("line one").unwrap();
        let second = text.find("line two").unwrap();
        assert!(system < question);
        assert!(question < first);
        assert!(first < second);
    }

    #[test]
    fn test_render_without_context() {
        let prompt = Prompt::new("", vec![], "Hello?");
        assert_eq!(prompt.render(), "Question: Hello?\n");
    }

    #[test]
    fn test_triple_display() {
        let triple = ContextTriple::new("Patient_001", "HAS_CONDITION", "heart failure");
        assert_eq!(triple.to_string(), "Patient_001 HAS_CONDITION heart failure");
    }
}
