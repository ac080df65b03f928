//! Nominal groups: noun phrases with their resolution state.

use crate::concept::ConceptRef;
use crate::sentence::Sentence;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many things a nominal group talks about.
///
/// `One` is the definite/singular default ("the bottle"), `Some` an
/// existential or indefinite reading ("a bottle"), `All` a universal one
/// ("bottles", "every bottle") and `Digit` an explicit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quantifier {
    #[default]
    One,
    Some,
    All,
    Digit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conjunction {
    And,
    Or,
}

/// A noun phrase: determiners, head nouns, adjectives, complements and
/// relative clauses, plus the concept it was grounded to.
///
/// The group is resolved exactly when it carries an id. Resolution is
/// permanent: there is no way to clear an id once set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominalGroup {
    pub determiners: Vec<String>,
    pub nouns: Vec<String>,
    /// Adjective with its modifiers, e.g. `("big", ["very"])`.
    pub adjectives: Vec<(String, Vec<String>)>,
    /// Possessive / "of" phrases.
    pub noun_complements: Vec<NominalGroup>,
    pub relative_clauses: Vec<Sentence>,
    pub quantifier: Quantifier,
    pub conjunction: Option<Conjunction>,
    id: Option<ConceptRef>,
}

impl NominalGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the common `determiner + noun` shape.
    pub fn noun_phrase(determiner: impl Into<String>, noun: impl Into<String>) -> Self {
        Self::new().with_determiner(determiner).with_noun(noun)
    }

    /// A bare pronoun such as "it", "me" or "you".
    pub fn pronoun(word: impl Into<String>) -> Self {
        Self::new().with_noun(word)
    }

    pub fn with_determiner(mut self, determiner: impl Into<String>) -> Self {
        self.determiners.push(determiner.into());
        self
    }

    pub fn with_noun(mut self, noun: impl Into<String>) -> Self {
        self.nouns.push(noun.into());
        self
    }

    pub fn with_adjective(mut self, adjective: impl Into<String>) -> Self {
        self.adjectives.push((adjective.into(), Vec::new()));
        self
    }

    pub fn with_modified_adjective<I, S>(mut self, adjective: impl Into<String>, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.adjectives.push((
            adjective.into(),
            modifiers.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn with_complement(mut self, complement: NominalGroup) -> Self {
        self.noun_complements.push(complement);
        self
    }

    pub fn with_relative(mut self, relative: Sentence) -> Self {
        self.relative_clauses.push(relative);
        self
    }

    pub fn with_quantifier(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = quantifier;
        self
    }

    pub fn with_conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = Some(conjunction);
        self
    }

    /// Builder form of [`NominalGroup::resolve`], mostly for history fixtures.
    pub fn resolved_as(mut self, id: impl Into<ConceptRef>) -> Self {
        self.resolve(id);
        self
    }

    pub fn id(&self) -> Option<&ConceptRef> {
        self.id.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.id.is_some()
    }

    /// Ground this group. A group that is already resolved keeps its id.
    pub fn resolve(&mut self, id: impl Into<ConceptRef>) {
        if self.id.is_none() {
            self.id = Some(id.into());
        }
    }

    pub fn head_noun(&self) -> Option<&str> {
        self.nouns.first().map(String::as_str)
    }

    pub fn first_determiner(&self) -> Option<&str> {
        self.determiners.first().map(String::as_str)
    }

    pub fn first_adjective(&self) -> Option<&str> {
        self.adjectives.first().map(|(word, _)| word.as_str())
    }

    /// "big" in "the yellow banana is big".
    pub fn is_adjective_only(&self) -> bool {
        self.nouns.is_empty() && !self.adjectives.is_empty()
    }

    pub fn has_adjective(&self, word: &str) -> bool {
        self.adjectives
            .iter()
            .any(|(adjective, _)| adjective.eq_ignore_ascii_case(word))
    }

    /// Whether the group talks about several things.
    pub fn is_plural(&self) -> bool {
        matches!(self.quantifier, Quantifier::All | Quantifier::Digit)
            || self.id.as_ref().is_some_and(ConceptRef::is_many)
    }
}

impl fmt::Display for NominalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<&str> = self.determiners.iter().map(String::as_str).collect();
        for (adjective, modifiers) in &self.adjectives {
            words.extend(modifiers.iter().map(String::as_str));
            words.push(adjective);
        }
        words.extend(self.nouns.iter().map(String::as_str));
        write!(f, "{}", words.join(" ").replace('+', " "))?;
        for complement in &self.noun_complements {
            write!(f, " of {complement}")?;
        }
        if let Some(id) = &self.id {
            write!(f, " <{id}>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolution_is_permanent() {
        let mut group = NominalGroup::noun_phrase("the", "bottle");
        assert!(!group.is_resolved());

        group.resolve("bottle_1");
        group.resolve("bottle_2");

        assert!(group.is_resolved());
        assert_eq!(group.id(), Some(&ConceptRef::from("bottle_1")));
    }

    #[test]
    fn adjective_only_groups() {
        let big = NominalGroup::new().with_adjective("big");
        assert!(big.is_adjective_only());
        assert_eq!(big.first_adjective(), Some("big"));

        let bottle = NominalGroup::noun_phrase("the", "bottle").with_adjective("red");
        assert!(!bottle.is_adjective_only());
        assert!(bottle.has_adjective("Red"));
    }

    #[test]
    fn displays_as_phrase() {
        let group = NominalGroup::noun_phrase("the", "bottle")
            .with_modified_adjective("big", ["very"])
            .with_complement(NominalGroup::pronoun("Jido"));
        assert_eq!(group.to_string(), "the very big bottle of Jido");
    }

    #[test]
    fn plural_from_quantifier_or_many_ids() {
        let bottles = NominalGroup::noun_phrase("the", "bottle").with_quantifier(Quantifier::All);
        assert!(bottles.is_plural());

        let both = NominalGroup::noun_phrase("the", "cup")
            .resolved_as(vec!["cup_a".to_string(), "cup_b".to_string()]);
        assert!(both.is_plural());
    }

    #[test]
    fn deserializes_without_resolution_fields() {
        let group: NominalGroup = serde_json::from_str(
            r#"{"determiners":["a"],"nouns":["banana"],"adjectives":[],"noun_complements":[],"relative_clauses":[],"quantifier":"SOME"}"#,
        )
        .unwrap();
        assert_eq!(group.quantifier, Quantifier::Some);
        assert!(!group.is_resolved());
    }
}
