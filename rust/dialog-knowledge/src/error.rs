//! Error types for knowledge base access.

use thiserror::Error;

/// Failures reported by a knowledge base.
///
/// Callers in the interpretation engine treat `Unavailable` and
/// `AgentUnknown` on lookups as "no results"; only writes surface them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KnowledgeError {
    /// The KB could not be reached.
    #[error("knowledge base unavailable: {0}")]
    Unavailable(String),

    /// The requested agent has no model in the ontology.
    #[error("agent model {model:?} is not known to the knowledge base")]
    AgentUnknown { model: String },

    /// A statement does not follow the `subject predicate object` format.
    #[error("malformed statement {statement:?}: {reason}")]
    MalformedStatement { statement: String, reason: String },
}

/// Result type for knowledge base operations
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
