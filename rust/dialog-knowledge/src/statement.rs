//! The textual triple wire format.
//!
//! A statement is exactly three whitespace-separated tokens. Tokens starting
//! with `?` are variables, everything else is a constant (a concept id, a
//! class name, a prefixed predicate such as `rdf:type`, a literal).
//!
//! The textual rendering is what remote KBs receive, so `Display` must give
//! back `subject predicate object` with single spaces and `?name` variables.

use crate::error::KnowledgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Either an unbound variable or a constant token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Variable name without the leading `?`.
    Variable(String),
    Constant(String),
}

impl Term {
    /// Parse a single token: `?x` is a variable, anything else a constant.
    pub fn parse(token: &str) -> Self {
        match token.strip_prefix('?') {
            Some(name) => Term::Variable(name.to_string()),
            None => Term::Constant(token.to_string()),
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix('?') {
            Some(stripped) => Term::Variable(stripped.to_string()),
            None => Term::Variable(name),
        }
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Term::Constant(value.into())
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_constant(&self) -> Option<&str> {
        match self {
            Term::Constant(value) => Some(value),
            Term::Variable(_) => None,
        }
    }

    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            Term::Constant(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "?{name}"),
            Term::Constant(value) => write!(f, "{value}"),
        }
    }
}

/// One `subject predicate object` constraint or fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Statement {
            subject,
            predicate,
            object,
        }
    }

    /// Build a statement from three tokens, parsing `?` variables.
    pub fn triple(subject: &str, predicate: &str, object: &str) -> Self {
        Statement::new(Term::parse(subject), Term::parse(predicate), Term::parse(object))
    }

    pub fn terms(&self) -> [&Term; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Variable names (without `?`) appearing in this statement.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms().into_iter().filter_map(Term::as_variable)
    }

    /// Whether the statement mentions no variable at all.
    pub fn is_bound(&self) -> bool {
        self.variables().next().is_none()
    }

    pub fn mentions(&self, variable: &str) -> bool {
        let variable = variable.strip_prefix('?').unwrap_or(variable);
        self.variables().any(|name| name == variable)
    }

    /// Replace every occurrence of `variable` with the constant `value`.
    pub fn substitute(&self, variable: &str, value: &str) -> Statement {
        let variable = variable.strip_prefix('?').unwrap_or(variable);
        let bind = |term: &Term| match term {
            Term::Variable(name) if name == variable => Term::constant(value),
            other => other.clone(),
        };
        Statement::new(bind(&self.subject), bind(&self.predicate), bind(&self.object))
    }
}

impl FromStr for Statement {
    type Err = KnowledgeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        match tokens.as_slice() {
            [subject, predicate, object] => Ok(Statement::triple(subject, predicate, object)),
            _ => Err(KnowledgeError::MalformedStatement {
                statement: text.to_string(),
                reason: format!("expected 3 tokens, found {}", tokens.len()),
            }),
        }
    }
}

impl TryFrom<String> for Statement {
    type Error = KnowledgeError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<Statement> for String {
    fn from(statement: Statement) -> Self {
        statement.to_string()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_variables_and_constants() {
        let statement: Statement = "?concept rdf:type Bottle".parse().unwrap();
        assert_eq!(statement.subject, Term::Variable("concept".into()));
        assert_eq!(statement.predicate, Term::Constant("rdf:type".into()));
        assert_eq!(statement.object, Term::Constant("Bottle".into()));
        assert!(!statement.is_bound());
        assert!(statement.mentions("?concept"));
    }

    #[test]
    fn renders_back_to_the_wire_format() {
        let statement: Statement = "  human   focusesOn\t?concept ".parse().unwrap();
        assert_eq!(statement.to_string(), "human focusesOn ?concept");
    }

    #[test]
    fn rejects_wrong_arity() {
        let error = "?concept rdf:type".parse::<Statement>().unwrap_err();
        assert!(matches!(error, KnowledgeError::MalformedStatement { .. }));
    }

    #[test]
    fn substitution_binds_only_the_named_variable() {
        let statement = Statement::triple("?concept", "belongsTo", "?id_1");
        let bound = statement.substitute("?concept", "banana_7");
        assert_eq!(bound.to_string(), "banana_7 belongsTo ?id_1");
        assert!(!bound.is_bound());
        assert!(bound.substitute("id_1", "human").is_bound());
    }

    #[test]
    fn serializes_as_text() {
        let statement = Statement::triple("cup_a", "owl:differentFrom", "?concept");
        let json = serde_json::to_string(&statement).unwrap();
        assert_eq!(json, "\"cup_a owl:differentFrom ?concept\"");
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, statement);
    }
}
