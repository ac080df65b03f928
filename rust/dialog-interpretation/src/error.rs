//! Error types for interpretation.
//!
//! [`Clarification`] is not a failure of the engine: it is the question the
//! system has to ask before the turn can finish. Everything a driver needs
//! to ask it and to resume afterwards travels in the variant.

use dialog_knowledge::KnowledgeError;
use dialog_sentence::{GroupPath, NominalGroup, PathError, Sentence};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discrimination::Discriminant;

/// A turn suspended on a question to the user.
///
/// `object` is the group that could not be grounded, `question` the
/// sentences to verbalize, and `path` where the group sits in the pending
/// sentence.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Clarification {
    #[error("no dialogue history to resolve \"{object}\"")]
    EmptyHistory {
        object: NominalGroup,
        question: Vec<Sentence>,
        path: GroupPath,
    },

    #[error("nothing in recent dialogue matches \"{object}\"")]
    NoAnaphoricMatch {
        object: NominalGroup,
        question: Vec<Sentence>,
        path: GroupPath,
    },

    #[error("\"{object}\" may refer to {} earlier mentions", candidates.len())]
    AmbiguousAnaphor {
        object: NominalGroup,
        /// The candidate the question asks about.
        top: NominalGroup,
        /// Every remaining candidate, `top` first.
        candidates: Vec<NominalGroup>,
        question: Vec<Sentence>,
        path: GroupPath,
    },

    #[error("\"{object}\" does not identify a single known concept")]
    InsufficientDescription {
        object: NominalGroup,
        question: Vec<Sentence>,
        path: GroupPath,
    },

    #[error("no instance of \"{object}\" is known")]
    NoInstanceOfClass {
        object: NominalGroup,
        question: Vec<Sentence>,
        path: GroupPath,
    },
}

impl Clarification {
    pub fn object(&self) -> &NominalGroup {
        match self {
            Self::EmptyHistory { object, .. }
            | Self::NoAnaphoricMatch { object, .. }
            | Self::AmbiguousAnaphor { object, .. }
            | Self::InsufficientDescription { object, .. }
            | Self::NoInstanceOfClass { object, .. } => object,
        }
    }

    pub fn question(&self) -> &[Sentence] {
        match self {
            Self::EmptyHistory { question, .. }
            | Self::NoAnaphoricMatch { question, .. }
            | Self::AmbiguousAnaphor { question, .. }
            | Self::InsufficientDescription { question, .. }
            | Self::NoInstanceOfClass { question, .. } => question,
        }
    }

    pub fn path(&self) -> &GroupPath {
        match self {
            Self::EmptyHistory { path, .. }
            | Self::NoAnaphoricMatch { path, .. }
            | Self::AmbiguousAnaphor { path, .. }
            | Self::InsufficientDescription { path, .. }
            | Self::NoInstanceOfClass { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretationError {
    #[error("clarification needed: {0}")]
    Clarification(#[from] Clarification),

    #[error("sentence nesting exceeds {limit} levels at {path}")]
    NestingTooDeep { limit: usize, path: GroupPath },

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("answer does not fit the pending clarification: {clarification}")]
    UnexpectedAnswer { clarification: Clarification },

    #[error("there is no pending clarification to answer")]
    NothingPending,
}

impl InterpretationError {
    pub fn clarification(&self) -> Option<&Clarification> {
        match self {
            Self::Clarification(clarification) => Some(clarification),
            _ => None,
        }
    }
}

/// Result type for interpretation operations
pub type InterpretationResult<T> = Result<T, InterpretationError>;

/// A verb kept literally because no canonical form is known.
///
/// Reported next to a successful result; never fails a turn.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("no canonical form for verb {verb:?}")]
pub struct UnknownVerb {
    pub verb: String,
}

/// Why the anaphora matcher found no single antecedent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("dialogue history is empty")]
    NoHistory,

    #[error("no compatible antecedent in recent history")]
    NoMatch,

    #[error("{} antecedents are equally plausible", all.len())]
    Ambiguous {
        top: NominalGroup,
        all: Vec<NominalGroup>,
    },
}

/// Why discrimination could not settle on one concept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmbiguityError {
    #[error("no concept matches the description")]
    NoMatch,

    #[error("{} concepts match the description", candidates.len())]
    StillAmbiguous {
        candidates: Vec<String>,
        /// A feature whose values tell the candidates apart, if any.
        discriminant: Option<Discriminant>,
    },
}
