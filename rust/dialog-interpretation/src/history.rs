//! Previously grounded sentences.

use dialog_sentence::{NominalGroup, Sentence};
use serde::{Deserialize, Serialize};

/// Append-only record of fully resolved turns, oldest first.
///
/// Only completely grounded sentences belong here; a turn suspended on a
/// clarification is kept aside by the driver until it resolves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueHistory {
    sentences: Vec<Sentence>,
}

impl DialogueHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn last(&self) -> Option<&Sentence> {
        self.sentences.last()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter()
    }

    /// At most `window` sentences, newest first.
    pub fn recent(&self, window: usize) -> Vec<&Sentence> {
        self.sentences.iter().rev().take(window).collect()
    }

    /// Every grounded nominal group mentioned in the last `window` turns,
    /// newest turn first.
    pub fn mentioned_groups(&self, window: usize) -> Vec<&NominalGroup> {
        self.recent(window)
            .into_iter()
            .flat_map(|sentence| {
                sentence
                    .group_paths()
                    .into_iter()
                    .filter_map(move |path| sentence.group(&path))
            })
            .filter(|group| group.is_resolved())
            .collect()
    }
}

impl FromIterator<Sentence> for DialogueHistory {
    fn from_iter<I: IntoIterator<Item = Sentence>>(iter: I) -> Self {
        DialogueHistory {
            sentences: iter.into_iter().collect(),
        }
    }
}
