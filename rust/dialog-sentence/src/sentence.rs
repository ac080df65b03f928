//! Sentences: the root of a parsed utterance.

use crate::nominal::NominalGroup;
use crate::verbal::VerbalGroup;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The speech act a sentence performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceKind {
    Statement,
    YesNoQuestion,
    WQuestion,
    Imperative,
    Interjection,
    Exclamation,
    Relative,
    Subsentence,
    Start,
    End,
    Agreement,
    Disagreement,
    Gratulation,
}

impl SentenceKind {
    /// Only statements, questions and orders carry references to ground.
    pub fn is_resolvable(self) -> bool {
        matches!(
            self,
            SentenceKind::Statement
                | SentenceKind::YesNoQuestion
                | SentenceKind::WQuestion
                | SentenceKind::Imperative
        )
    }

    pub fn is_question(self) -> bool {
        matches!(self, SentenceKind::YesNoQuestion | SentenceKind::WQuestion)
    }
}

impl fmt::Display for SentenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Statement => "statement",
            Self::YesNoQuestion => "yes_no_question",
            Self::WQuestion => "w_question",
            Self::Imperative => "imperative",
            Self::Interjection => "interjection",
            Self::Exclamation => "exclamation",
            Self::Relative => "relative",
            Self::Subsentence => "subsentence",
            Self::Start => "start",
            Self::End => "end",
            Self::Agreement => "agreement",
            Self::Disagreement => "disagreement",
            Self::Gratulation => "gratulation",
        };
        write!(f, "{name}")
    }
}

/// A parsed utterance or clause.
///
/// `aim` is a free-form semantic target tag ("place", "thing", "color",
/// "classification+fruit", ...). Questions use it to say what they ask about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub kind: SentenceKind,
    #[serde(default)]
    pub aim: String,
    #[serde(default)]
    pub subjects: Vec<NominalGroup>,
    #[serde(default)]
    pub predicates: Vec<VerbalGroup>,
}

impl Sentence {
    pub fn new(kind: SentenceKind) -> Self {
        Sentence {
            kind,
            aim: String::new(),
            subjects: Vec::new(),
            predicates: Vec::new(),
        }
    }

    pub fn statement() -> Self {
        Self::new(SentenceKind::Statement)
    }

    pub fn imperative() -> Self {
        Self::new(SentenceKind::Imperative)
    }

    pub fn with_aim(mut self, aim: impl Into<String>) -> Self {
        self.aim = aim.into();
        self
    }

    pub fn with_subject(mut self, subject: NominalGroup) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: VerbalGroup) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn is_resolvable(&self) -> bool {
        self.kind.is_resolvable()
    }

    /// The verb of the first verbal group, e.g. "be" in "the girls are human".
    pub fn first_verb(&self) -> Option<&str> {
        self.predicates.first().and_then(VerbalGroup::main_verb)
    }

    /// Whether this sentence teaches a new fact ("learn that a banana is a
    /// fruit") rather than querying known ones.
    ///
    /// `learning_verbs` comes from the lexicon; compound verbs such as
    /// `must+learn` match on their last component.
    pub fn is_learning<S: AsRef<str>>(&self, learning_verbs: &[S]) -> bool {
        self.kind == SentenceKind::Statement
            && self.predicates.iter().any(|group| {
                group.main_verbs.iter().any(|verb| {
                    let verb = verb.rsplit('+').next().unwrap_or(verb.as_str());
                    learning_verbs.iter().any(|learning| learning.as_ref() == verb)
                })
            })
    }

    /// Whether every nominal group in the tree carries an id.
    pub fn is_fully_resolved(&self) -> bool {
        self.group_paths()
            .iter()
            .all(|path| self.group(path).is_some_and(NominalGroup::is_resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_statements_questions_and_orders_resolve() {
        assert!(SentenceKind::Statement.is_resolvable());
        assert!(SentenceKind::WQuestion.is_resolvable());
        assert!(SentenceKind::Imperative.is_resolvable());
        assert!(!SentenceKind::Gratulation.is_resolvable());
        assert!(!SentenceKind::Agreement.is_resolvable());
    }

    #[test]
    fn learning_statements_are_detected() {
        let fact = Sentence::statement()
            .with_subject(NominalGroup::noun_phrase("a", "banana"))
            .with_predicate(VerbalGroup::new("be").with_object(NominalGroup::noun_phrase("a", "fruit")));
        let learning = Sentence::statement()
            .with_subject(NominalGroup::pronoun("you"))
            .with_predicate(VerbalGroup::new("must+learn").with_subordinate(fact.clone()));

        assert!(learning.is_learning(&["learn"]));
        assert!(!fact.is_learning(&["learn"]));

        let mut question = learning.clone();
        question.kind = SentenceKind::YesNoQuestion;
        assert!(!question.is_learning(&["learn"]));
    }

    #[test]
    fn first_verb_reads_first_predicate() {
        let sentence = Sentence::imperative().with_predicate(VerbalGroup::new("take"));
        assert_eq!(sentence.first_verb(), Some("take"));
        assert_eq!(Sentence::statement().first_verb(), None);
    }
}
