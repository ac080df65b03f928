//! The knowledge base client interface.

use crate::error::KnowledgeResult;
use crate::statement::Statement;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a looked-up term denotes in an agent's model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    Class,
    Instance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionMethod {
    Add,
    Retract,
}

/// How and where a batch of statements is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub method: RevisionMethod,
    pub models: Vec<String>,
}

impl Revision {
    pub fn add<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Revision {
            method: RevisionMethod::Add,
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    pub fn retract<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Revision {
            method: RevisionMethod::Retract,
            models: models.into_iter().map(Into::into).collect(),
        }
    }
}

/// A synchronous, agent-relative knowledge base.
///
/// Every query names the model it runs against. Calls are the only
/// suspension point of a resolution turn; failures are typed rather than
/// silently dropped, and callers decide whether a failure means "no
/// results".
pub trait KnowledgeBase {
    /// Concepts whose id or label matches `term` in `model`.
    fn lookup(&self, model: &str, term: &str) -> KnowledgeResult<Vec<(ConceptKind, String)>>;

    /// Values of `variable` satisfying every constraint in `model`.
    ///
    /// `variable` may be given with or without its leading `?`.
    fn find(&self, model: &str, variable: &str, constraints: &[Statement]) -> KnowledgeResult<Vec<String>>;

    /// Human-readable label of a concept, or the id itself when unlabelled.
    fn label(&self, id: &str) -> KnowledgeResult<String>;

    /// Commit (or retract) fully bound statements in the given models.
    fn revise(&self, statements: &[Statement], revision: &Revision) -> KnowledgeResult<()>;

    /// Every statement whose subject is `id` in `model`.
    fn about(&self, model: &str, id: &str) -> KnowledgeResult<Vec<Statement>>;
}

impl<K: KnowledgeBase + ?Sized> KnowledgeBase for &K {
    fn lookup(&self, model: &str, term: &str) -> KnowledgeResult<Vec<(ConceptKind, String)>> {
        (**self).lookup(model, term)
    }

    fn find(&self, model: &str, variable: &str, constraints: &[Statement]) -> KnowledgeResult<Vec<String>> {
        (**self).find(model, variable, constraints)
    }

    fn label(&self, id: &str) -> KnowledgeResult<String> {
        (**self).label(id)
    }

    fn revise(&self, statements: &[Statement], revision: &Revision) -> KnowledgeResult<()> {
        (**self).revise(statements, revision)
    }

    fn about(&self, model: &str, id: &str) -> KnowledgeResult<Vec<Statement>> {
        (**self).about(model, id)
    }
}

impl<K: KnowledgeBase + ?Sized> KnowledgeBase for Arc<K> {
    fn lookup(&self, model: &str, term: &str) -> KnowledgeResult<Vec<(ConceptKind, String)>> {
        (**self).lookup(model, term)
    }

    fn find(&self, model: &str, variable: &str, constraints: &[Statement]) -> KnowledgeResult<Vec<String>> {
        (**self).find(model, variable, constraints)
    }

    fn label(&self, id: &str) -> KnowledgeResult<String> {
        (**self).label(id)
    }

    fn revise(&self, statements: &[Statement], revision: &Revision) -> KnowledgeResult<()> {
        (**self).revise(statements, revision)
    }

    fn about(&self, model: &str, id: &str) -> KnowledgeResult<Vec<Statement>> {
        (**self).about(model, id)
    }
}
