//! Verbal groups: verb phrases with their arguments and nested clauses.

use crate::nominal::NominalGroup;
use crate::sentence::Sentence;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbState {
    #[default]
    Affirmative,
    Negative,
}

/// A prepositional argument: "on the table", "next to the shelf".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndirectComplement {
    pub preposition: Vec<String>,
    pub groups: Vec<NominalGroup>,
}

impl IndirectComplement {
    pub fn new<I, S>(preposition: I, groups: Vec<NominalGroup>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndirectComplement {
            preposition: preposition.into_iter().map(Into::into).collect(),
            groups,
        }
    }
}

/// A verb phrase.
///
/// `main_verbs` may hold compounds such as `can+take` (modal + verb) or
/// `look+up` (verb + particle); verb resolution splits and canonicalizes
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerbalGroup {
    pub main_verbs: Vec<String>,
    pub tense: String,
    pub direct_objects: Vec<NominalGroup>,
    pub indirect_complements: Vec<IndirectComplement>,
    pub adverbs: Vec<String>,
    pub time_adverbs: Vec<String>,
    pub state: VerbState,
    /// Conjoined verb phrases sharing the subject.
    pub secondary_groups: Vec<VerbalGroup>,
    pub subordinate_sentences: Vec<Sentence>,
    resolved: bool,
}

impl VerbalGroup {
    pub fn new(verb: impl Into<String>) -> Self {
        VerbalGroup {
            main_verbs: vec![verb.into()],
            tense: "present simple".into(),
            ..Self::default()
        }
    }

    pub fn with_tense(mut self, tense: impl Into<String>) -> Self {
        self.tense = tense.into();
        self
    }

    pub fn with_object(mut self, object: NominalGroup) -> Self {
        self.direct_objects.push(object);
        self
    }

    pub fn with_complement(mut self, complement: IndirectComplement) -> Self {
        self.indirect_complements.push(complement);
        self
    }

    pub fn with_adverb(mut self, adverb: impl Into<String>) -> Self {
        self.adverbs.push(adverb.into());
        self
    }

    pub fn with_time_adverb(mut self, adverb: impl Into<String>) -> Self {
        self.time_adverbs.push(adverb.into());
        self
    }

    pub fn with_state(mut self, state: VerbState) -> Self {
        self.state = state;
        self
    }

    pub fn with_secondary(mut self, secondary: VerbalGroup) -> Self {
        self.secondary_groups.push(secondary);
        self
    }

    pub fn with_subordinate(mut self, subordinate: Sentence) -> Self {
        self.subordinate_sentences.push(subordinate);
        self
    }

    pub fn main_verb(&self) -> Option<&str> {
        self.main_verbs.first().map(String::as_str)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn mark_resolved(&mut self) {
        self.resolved = true;
    }
}
