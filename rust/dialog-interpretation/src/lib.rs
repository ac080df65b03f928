//! # Dialog Interpretation: grounding parsed utterances in a knowledge base
//!
//! The parser hands over a [`Sentence`](dialog_sentence::Sentence) tree whose
//! nominal groups are still plain words ("it", "the other cup", "this").
//! Interpretation grounds every group to a concept id of the speaker's
//! knowledge base, canonicalizes verbs, and asks the user back when the
//! utterance alone is not enough.
//!
//! ## Architecture
//!
//! ```text
//! Sentence ─▶ References (pronouns, demonstratives, anaphora, quantifiers)
//!   ─▶ Noun phrases (description → KB query → discrimination)
//!     ─▶ Verbs (modal split, state/goal verbs, thematic synonyms)
//!       ─▶ grounded Sentence  ──▶ DialogueHistory
//!
//! any stage ──Clarification──▶ driver asks the user ──Answer──▶ resume
//! ```
//!
//! - [`anaphora`] finds antecedents for "it"/"one" in recent history.
//! - [`statements`] turns a nominal group into triple constraints.
//! - [`discrimination`] narrows KB candidates down to one concept, handles
//!   "other", and learns new concepts from teaching statements.
//! - [`resolver`] walks the tree and owns the suspend/resume protocol.
//! - [`dialogue`] is a small session driver keeping history and the
//!   pending clarification.
//!
//! All lexical knowledge lives in [`InterpretationConfig`]; there is no
//! global state besides the knowledge base handle and the [`FocusTracker`]
//! owned by each [`Resolver`].

pub mod anaphora;
pub mod config;
pub mod dialogue;
pub mod discrimination;
pub mod error;
pub mod factory;
pub mod focus;
pub mod history;
pub mod resolver;
pub mod statements;

mod query;

pub use anaphora::AnaphoraMatcher;
pub use config::{ConfigError, InterpretationConfig, Lexicon};
pub use dialogue::{Dialogue, PendingTurn, TurnOutcome};
pub use discrimination::{ConceptDescription, Discriminant, Discriminator};
pub use error::{
    AmbiguityError, Clarification, InterpretationError, InterpretationResult, MatchError,
    UnknownVerb,
};
pub use factory::{EnglishSentenceFactory, SentenceFactory};
pub use focus::FocusTracker;
pub use history::DialogueHistory;
pub use resolver::{Answer, Resolver, Substitution};
pub use statements::{Description, StatementBuilder};
