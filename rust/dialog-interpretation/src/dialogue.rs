//! A session: history plus at most one turn waiting for the user.

use crate::error::{Clarification, InterpretationError, InterpretationResult, UnknownVerb};
use crate::factory::{EnglishSentenceFactory, SentenceFactory};
use crate::history::DialogueHistory;
use crate::resolver::{Answer, Resolver};
use dialog_knowledge::KnowledgeBase;
use dialog_sentence::Sentence;
use serde::{Deserialize, Serialize};

/// A turn suspended on a clarification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTurn {
    pub sentence: Sentence,
    pub speaker: String,
    pub clarification: Clarification,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The sentence is grounded and was added to history.
    Resolved {
        sentence: Sentence,
        unknown_verbs: Vec<UnknownVerb>,
    },
    /// The user has to answer before the turn can go on.
    Clarify(Clarification),
}

/// Drives a [`Resolver`] across turns.
///
/// ```
/// use dialog_interpretation::{Dialogue, InterpretationConfig, Resolver, TurnOutcome};
/// use dialog_knowledge::MemoryKnowledgeBase;
/// use dialog_sentence::{NominalGroup, Sentence, VerbalGroup};
///
/// let kb = MemoryKnowledgeBase::new().with_model("human");
/// let mut dialogue = Dialogue::new(Resolver::new(kb, InterpretationConfig::default()));
///
/// let order = Sentence::imperative()
///     .with_predicate(VerbalGroup::new("give").with_object(NominalGroup::pronoun("it")));
/// let outcome = dialogue.hear(order, "human").unwrap();
/// assert!(matches!(outcome, TurnOutcome::Clarify(_)));
/// assert!(dialogue.pending().is_some());
/// ```
pub struct Dialogue<K, F = EnglishSentenceFactory> {
    resolver: Resolver<K, F>,
    history: DialogueHistory,
    pending: Option<PendingTurn>,
}

impl<K: KnowledgeBase, F: SentenceFactory> Dialogue<K, F> {
    pub fn new(resolver: Resolver<K, F>) -> Self {
        Dialogue {
            resolver,
            history: DialogueHistory::new(),
            pending: None,
        }
    }

    pub fn resolver(&self) -> &Resolver<K, F> {
        &self.resolver
    }

    pub fn history(&self) -> &DialogueHistory {
        &self.history
    }

    pub fn pending(&self) -> Option<&PendingTurn> {
        self.pending.as_ref()
    }

    /// Interpret a new utterance. A turn still waiting for an answer is
    /// dropped.
    pub fn hear(&mut self, sentence: Sentence, speaker: &str) -> InterpretationResult<TurnOutcome> {
        if let Some(abandoned) = self.abandon() {
            tracing::info!(speaker = %abandoned.speaker, "unanswered clarification abandoned");
        }
        let mut sentence = sentence;
        let result = self.resolver.interpret(&mut sentence, speaker, &self.history);
        self.settle(sentence, speaker, result)
    }

    /// Answer the pending clarification.
    ///
    /// An answer that does not fit the question leaves the turn pending.
    pub fn answer(&mut self, answer: Answer) -> InterpretationResult<TurnOutcome> {
        let PendingTurn {
            mut sentence,
            speaker,
            clarification,
        } = self.pending.take().ok_or(InterpretationError::NothingPending)?;

        let result = self
            .resolver
            .resume(&mut sentence, &speaker, &clarification, answer, &self.history);
        match result {
            Err(error @ InterpretationError::UnexpectedAnswer { .. }) => {
                self.pending = Some(PendingTurn {
                    sentence,
                    speaker,
                    clarification,
                });
                Err(error)
            }
            result => self.settle(sentence, &speaker, result),
        }
    }

    /// Forget the pending turn, if any.
    pub fn abandon(&mut self) -> Option<PendingTurn> {
        self.pending.take()
    }

    fn settle(
        &mut self,
        sentence: Sentence,
        speaker: &str,
        result: InterpretationResult<Vec<UnknownVerb>>,
    ) -> InterpretationResult<TurnOutcome> {
        match result {
            Ok(unknown_verbs) => {
                self.history.push(sentence.clone());
                Ok(TurnOutcome::Resolved {
                    sentence,
                    unknown_verbs,
                })
            }
            Err(InterpretationError::Clarification(clarification)) => {
                tracing::debug!(%clarification, path = %clarification.path(), "turn suspended");
                self.pending = Some(PendingTurn {
                    sentence,
                    speaker: speaker.to_string(),
                    clarification: clarification.clone(),
                });
                Ok(TurnOutcome::Clarify(clarification))
            }
            Err(error) => Err(error),
        }
    }
}
