//! # Dialog Knowledge: the agent-relative knowledge base interface
//!
//! The interpretation engine never stores facts itself. It talks to a
//! knowledge base (KB) through the [`KnowledgeBase`] trait, whose wire
//! format is the textual triple convention:
//!
//! ```text
//! subject predicate object      e.g.  "?concept rdf:type Bottle"
//! ```
//!
//! Tokens are whitespace separated and `?name` marks an unbound variable.
//! Each speaker's beliefs live in their own *model*; the same query can
//! give different answers for different agents.
//!
//! [`MemoryKnowledgeBase`] is a small in-process implementation of the
//! trait, suitable for tests and for embedders without a remote KB.

pub mod client;
pub mod error;
pub mod memory;
pub mod statement;
pub mod vocabulary;

pub use client::{ConceptKind, KnowledgeBase, Revision, RevisionMethod};
pub use error::{KnowledgeError, KnowledgeResult};
pub use memory::MemoryKnowledgeBase;
pub use statement::{Statement, Term};
