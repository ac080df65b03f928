//! Concept references produced by resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The grounded identity of a nominal group.
///
/// Most groups resolve to a single KB concept. Universally quantified
/// groups ("bring the bottles") may resolve to every instance of a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConceptRef {
    Single(String),
    Many(Vec<String>),
}

impl ConceptRef {
    /// All concept ids carried by this reference, in order.
    pub fn ids(&self) -> &[String] {
        match self {
            ConceptRef::Single(id) => std::slice::from_ref(id),
            ConceptRef::Many(ids) => ids,
        }
    }

    /// The single id, if this reference is not a collection.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ConceptRef::Single(id) => Some(id),
            ConceptRef::Many(_) => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids().iter().any(|candidate| candidate == id)
    }

    pub fn is_many(&self) -> bool {
        matches!(self, ConceptRef::Many(_))
    }
}

impl From<String> for ConceptRef {
    fn from(id: String) -> Self {
        ConceptRef::Single(id)
    }
}

impl From<&str> for ConceptRef {
    fn from(id: &str) -> Self {
        ConceptRef::Single(id.to_string())
    }
}

/// A one-element list collapses to `Single`.
impl From<Vec<String>> for ConceptRef {
    fn from(mut ids: Vec<String>) -> Self {
        if ids.len() == 1 {
            ConceptRef::Single(ids.remove(0))
        } else {
            ConceptRef::Many(ids)
        }
    }
}

impl fmt::Display for ConceptRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConceptRef::Single(id) => write!(f, "{id}"),
            ConceptRef::Many(ids) => write!(f, "[{}]", ids.join(", ")),
        }
    }
}
