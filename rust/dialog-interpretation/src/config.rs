//! Lexical tables and engine settings.
//!
//! Built once per process, usually from [`InterpretationConfig::default`] or
//! a JSON document, and read-only afterwards. Every field has a default, so a
//! partial document only overrides what it names:
//!
//! ```json
//! { "history_window": 5, "lexicon": { "learning_verbs": ["learn", "remember"] } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid interpretation config: {0}")]
    Json(#[from] serde_json::Error),
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| word.to_string()).collect()
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn contains(list: &[String], word: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(word))
}

/// Closed word classes the resolver reasons about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub demonstratives: Vec<String>,
    /// Copular verbs; normalized to "be".
    pub state_verbs: Vec<String>,
    /// Verbs of desire, passed through unchanged.
    pub goal_verbs: Vec<String>,
    pub modal_verbs: Vec<String>,
    /// Verb (or concatenated verb+particle) to its canonical thematic verb.
    /// Canonical verbs map to themselves.
    pub thematic_verbs: BTreeMap<String, String>,
    pub learning_verbs: Vec<String>,
    /// Pronouns denoting the speaker.
    pub first_person: Vec<String>,
    /// Pronouns denoting the addressed agent.
    pub second_person: Vec<String>,
    /// Words resolved against dialogue history.
    pub anaphors: Vec<String>,
    /// Nouns that enumerate every instance of `universal_class`.
    pub universal_nouns: Vec<String>,
    pub universal_class: String,
    /// Adjective to feature category, e.g. `red` → `Color` (`hasColor`).
    pub adjective_categories: BTreeMap<String, String>,
    /// Question aims that name a feature category, e.g. `color`.
    pub feature_aims: Vec<String>,
    /// Preposition (compounds joined with `+`) to KB predicate.
    pub prepositions: BTreeMap<String, String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon {
            demonstratives: words(&["this", "that", "these", "those"]),
            state_verbs: words(&[
                "be", "am", "is", "are", "was", "were", "been", "being", "become", "remain", "stay", "seem",
                "appear",
            ]),
            goal_verbs: words(&["want", "like", "desire", "prefer", "love", "hate", "need", "wish"]),
            modal_verbs: words(&[
                "can", "could", "may", "might", "must", "shall", "should", "will", "would",
            ]),
            thematic_verbs: table(&[
                ("bring", "bring"),
                ("carry", "bring"),
                ("fetch", "bring"),
                ("close", "close"),
                ("find", "find"),
                ("lookfor", "find"),
                ("search", "find"),
                ("give", "give"),
                ("hand", "give"),
                ("pass", "give"),
                ("go", "go"),
                ("have", "have"),
                ("own", "have"),
                ("know", "know"),
                ("understand", "know"),
                ("learn", "learn"),
                ("look", "look"),
                ("lookat", "look"),
                ("mean", "mean"),
                ("move", "move"),
                ("open", "open"),
                ("place", "put"),
                ("put", "put"),
                ("set", "put"),
                ("see", "see"),
                ("watch", "see"),
                ("display", "show"),
                ("show", "show"),
                ("get", "take"),
                ("grab", "take"),
                ("pickup", "take"),
                ("take", "take"),
            ]),
            learning_verbs: words(&["learn"]),
            first_person: words(&["me", "i"]),
            second_person: words(&["you"]),
            anaphors: words(&["it", "one"]),
            universal_nouns: words(&["everything", "anything"]),
            universal_class: "Artifact".into(),
            adjective_categories: table(&[
                ("black", "Color"),
                ("blue", "Color"),
                ("brown", "Color"),
                ("green", "Color"),
                ("grey", "Color"),
                ("orange", "Color"),
                ("pink", "Color"),
                ("purple", "Color"),
                ("red", "Color"),
                ("white", "Color"),
                ("yellow", "Color"),
                ("big", "Size"),
                ("huge", "Size"),
                ("large", "Size"),
                ("little", "Size"),
                ("small", "Size"),
                ("tiny", "Size"),
                ("flat", "Shape"),
                ("rectangular", "Shape"),
                ("round", "Shape"),
                ("square", "Shape"),
            ]),
            feature_aims: words(&["color", "size", "shape"]),
            prepositions: table(&[
                ("above", "isAbove"),
                ("at", "isAt"),
                ("behind", "isBehind"),
                ("in", "isIn"),
                ("in+front+of", "isInFrontOf"),
                ("near", "isNear"),
                ("next+to", "isNextTo"),
                ("on", "isOn"),
                ("under", "isUnder"),
            ]),
        }
    }
}

impl Lexicon {
    pub fn is_demonstrative(&self, word: &str) -> bool {
        contains(&self.demonstratives, word)
    }

    pub fn is_state_verb(&self, verb: &str) -> bool {
        contains(&self.state_verbs, verb)
    }

    pub fn is_goal_verb(&self, verb: &str) -> bool {
        contains(&self.goal_verbs, verb)
    }

    pub fn is_modal(&self, verb: &str) -> bool {
        contains(&self.modal_verbs, verb)
    }

    pub fn is_first_person(&self, word: &str) -> bool {
        contains(&self.first_person, word)
    }

    pub fn is_second_person(&self, word: &str) -> bool {
        contains(&self.second_person, word)
    }

    pub fn is_anaphor(&self, word: &str) -> bool {
        contains(&self.anaphors, word)
    }

    /// Any word standing for an agent or an earlier mention rather than a
    /// description.
    pub fn is_pronoun(&self, word: &str) -> bool {
        self.is_first_person(word)
            || self.is_second_person(word)
            || self.is_anaphor(word)
            || self.is_demonstrative(word)
    }

    pub fn is_universal(&self, noun: &str) -> bool {
        contains(&self.universal_nouns, noun)
    }

    pub fn thematic_verb(&self, verb: &str) -> Option<&str> {
        self.thematic_verbs
            .get(&verb.to_lowercase())
            .map(String::as_str)
    }

    /// The feature predicate an adjective constrains, `hasFeature` when
    /// its category is unknown.
    pub fn feature_predicate(&self, adjective: &str) -> String {
        let category = self
            .adjective_categories
            .get(&adjective.to_lowercase())
            .map(String::as_str)
            .unwrap_or("Feature");
        format!("has{category}")
    }

    pub fn is_feature_aim(&self, aim: &str) -> bool {
        contains(&self.feature_aims, aim)
    }

    pub fn preposition_predicate(&self, preposition: &str) -> Option<&str> {
        self.prepositions
            .get(&preposition.to_lowercase())
            .map(String::as_str)
    }
}

/// Everything the resolver needs besides the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretationConfig {
    pub lexicon: Lexicon,
    /// How many past sentences anaphora and "other" look at.
    pub history_window: usize,
    /// Deepest sentence nesting the walkers accept.
    pub max_depth: usize,
    /// How many recently active concepts the focus tracker remembers.
    pub focus_capacity: usize,
    /// The system's own KB model.
    pub default_model: String,
    /// The id the system uses for itself; "you" resolves to it.
    pub self_id: String,
    /// Speaker id to KB model, for speakers whose model is named
    /// differently.
    pub speaker_models: BTreeMap<String, String>,
}

impl Default for InterpretationConfig {
    fn default() -> Self {
        InterpretationConfig {
            lexicon: Lexicon::default(),
            history_window: 10,
            max_depth: 32,
            focus_capacity: 16,
            default_model: "default".into(),
            self_id: "myself".into(),
            speaker_models: BTreeMap::new(),
        }
    }
}

impl InterpretationConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The KB model holding `speaker`'s beliefs.
    pub fn model_for<'a>(&'a self, speaker: &'a str) -> &'a str {
        if let Some(model) = self.speaker_models.get(speaker) {
            model
        } else if speaker == self.self_id {
            &self.default_model
        } else {
            speaker
        }
    }
}
