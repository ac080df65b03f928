//! # Dialog Sentence: the semantic model of a parsed utterance
//!
//! The parser produces a tree of [`Sentence`], [`NominalGroup`] and
//! [`VerbalGroup`] values. The interpretation engine walks that tree and
//! grounds it in place: nominal groups receive a [`ConceptRef`], verbal
//! groups get canonical verbs.
//!
//! The three node kinds are mutually recursive (relative clauses nest
//! sentences inside nominal groups, subordinate clauses nest sentences
//! inside verbal groups). The parser only ever nests strictly smaller
//! sub-utterances, so the structure is always a finite tree.
//!
//! Nodes are addressed by [`GroupPath`], a stable index from the sentence
//! root. Substituting a node after a clarification turn is "replace the
//! node at this path" rather than a search by identity.

pub mod concept;
pub mod error;
pub mod nominal;
pub mod path;
pub mod sentence;
pub mod verbal;

pub use concept::ConceptRef;
pub use error::PathError;
pub use nominal::{Conjunction, NominalGroup, Quantifier};
pub use path::{GroupPath, Step};
pub use sentence::{Sentence, SentenceKind};
pub use verbal::{IndirectComplement, VerbState, VerbalGroup};
