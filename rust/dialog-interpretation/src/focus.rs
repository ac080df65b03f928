//! Which concepts were referenced most recently.
//!
//! Every successful resolution marks its concept active. Demonstratives
//! ("this", "that one") read the tracker to choose between several
//! concepts the speaker focuses on.

use dialog_sentence::ConceptRef;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Debug)]
pub struct FocusTracker {
    capacity: usize,
    /// Oldest first.
    recent: Mutex<VecDeque<String>>,
}

impl FocusTracker {
    pub fn new(capacity: usize) -> Self {
        FocusTracker {
            capacity: capacity.max(1),
            recent: Mutex::new(VecDeque::new()),
        }
    }

    pub fn mark_active(&self, id: &str) {
        let mut recent = self.recent.lock();
        recent.retain(|entry| entry != id);
        recent.push_back(id.to_string());
        while recent.len() > self.capacity {
            recent.pop_front();
        }
    }

    /// Mark every id of a (possibly plural) reference.
    pub fn mark_all(&self, concept: &ConceptRef) {
        for id in concept.ids() {
            self.mark_active(id);
        }
    }

    /// The most recently active concept.
    pub fn active(&self) -> Option<String> {
        self.recent.lock().back().cloned()
    }

    /// Among `candidates`, the one that was active most recently.
    pub fn most_recent_of(&self, candidates: &[String]) -> Option<String> {
        self.recent
            .lock()
            .iter()
            .rev()
            .find(|id| candidates.contains(id))
            .cloned()
    }

    pub fn clear(&self) {
        self.recent.lock().clear();
    }
}

impl Default for FocusTracker {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn remembers_latest_activation() {
        let focus = FocusTracker::new(3);
        focus.mark_active("cup_a");
        focus.mark_active("bottle_b");
        focus.mark_active("cup_a");

        assert_eq!(focus.active().as_deref(), Some("cup_a"));
        assert_eq!(
            focus.most_recent_of(&["bottle_b".into(), "table_1".into()]),
            Some("bottle_b".into())
        );
    }

    #[test]
    fn forgets_beyond_capacity() {
        let focus = FocusTracker::new(2);
        focus.mark_all(&ConceptRef::from(vec!["a".to_string(), "b".into(), "c".into()]));

        assert_eq!(focus.most_recent_of(&["a".into()]), None);
        assert_eq!(focus.active().as_deref(), Some("c"));
    }
}
