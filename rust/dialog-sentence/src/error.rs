//! Error types for the sentence model.

use crate::path::GroupPath;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    #[error("no nominal group at {path}")]
    Missing { path: GroupPath },

    #[error("path is empty and does not address a nominal group")]
    Empty,
}
