//! Antecedents for "it", "one" and unresolved demonstratives.
//!
//! Candidates are the grounded nominal groups of recent sentences, ranked
//! by recency and then by grammatical role:
//!
//! ```text
//! turn 0 (newest): direct objects ▸ complements ▸ subjects
//! turn 1:          direct objects ▸ complements ▸ subjects
//! ...
//! ```
//!
//! Several distinct concepts fitting the anaphor is an ambiguity, reported
//! with the best-ranked candidate first so the caller can ask about it
//! before falling back to the others.

use crate::config::Lexicon;
use crate::error::MatchError;
use dialog_sentence::{NominalGroup, Sentence, VerbalGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    DirectObject,
    Complement,
    Subject,
}

struct Candidate<'h> {
    turn: usize,
    role: Role,
    group: &'h NominalGroup,
}

pub struct AnaphoraMatcher<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> AnaphoraMatcher<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        AnaphoraMatcher { lexicon }
    }

    /// Find the antecedent of `anaphor` in `history`, newest sentence
    /// first, already bounded to the window the caller wants searched.
    pub fn match_first_candidate<'h, I>(&self, history: I, anaphor: &NominalGroup) -> Result<NominalGroup, MatchError>
    where
        I: IntoIterator<Item = &'h Sentence>,
    {
        let mut candidates = Vec::new();
        let mut turns = 0;
        for (turn, sentence) in history.into_iter().enumerate() {
            collect_sentence(sentence, turn, &mut candidates);
            turns += 1;
        }
        if turns == 0 {
            return Err(MatchError::NoHistory);
        }

        candidates.retain(|candidate| self.is_compatible(candidate.group, anaphor));
        candidates.sort_by_key(|candidate| (candidate.turn, candidate.role));

        let mut antecedents: Vec<NominalGroup> = Vec::new();
        for candidate in candidates {
            let known = antecedents
                .iter()
                .any(|antecedent| antecedent.id() == candidate.group.id());
            if !known {
                antecedents.push(candidate.group.clone());
            }
        }

        tracing::trace!(anaphor = %anaphor, count = antecedents.len(), "anaphora candidates");
        match antecedents.len() {
            0 => Err(MatchError::NoMatch),
            1 => Ok(antecedents.remove(0)),
            _ => Err(MatchError::Ambiguous {
                top: antecedents[0].clone(),
                all: antecedents,
            }),
        }
    }

    fn is_compatible(&self, candidate: &NominalGroup, anaphor: &NominalGroup) -> bool {
        let Some(noun) = candidate.head_noun() else {
            return false;
        };
        if !candidate.is_resolved() || self.lexicon.is_pronoun(noun) {
            return false;
        }

        if candidate.is_plural() != self.is_plural_anaphor(anaphor) {
            return false;
        }

        // "this bottle" only refers back to bottles.
        if let Some(anaphor_noun) = anaphor.head_noun() {
            if !self.lexicon.is_pronoun(anaphor_noun) && !noun.eq_ignore_ascii_case(anaphor_noun) {
                return false;
            }
        }

        // "the red one" only refers back to red things.
        anaphor
            .adjectives
            .iter()
            .filter(|(adjective, _)| !adjective.eq_ignore_ascii_case("other"))
            .all(|(adjective, _)| candidate.has_adjective(adjective))
    }

    fn is_plural_anaphor(&self, anaphor: &NominalGroup) -> bool {
        anaphor.is_plural()
            || anaphor.determiners.iter().any(|determiner| {
                determiner.eq_ignore_ascii_case("these") || determiner.eq_ignore_ascii_case("those")
            })
    }
}

fn collect_sentence<'h>(sentence: &'h Sentence, turn: usize, out: &mut Vec<Candidate<'h>>) {
    for predicate in &sentence.predicates {
        collect_verbal(predicate, turn, out);
    }
    for subject in &sentence.subjects {
        collect_nominal(subject, turn, Role::Subject, out);
    }
}

fn collect_verbal<'h>(group: &'h VerbalGroup, turn: usize, out: &mut Vec<Candidate<'h>>) {
    for object in &group.direct_objects {
        collect_nominal(object, turn, Role::DirectObject, out);
    }
    for complement in &group.indirect_complements {
        for nominal in &complement.groups {
            collect_nominal(nominal, turn, Role::Complement, out);
        }
    }
    for secondary in &group.secondary_groups {
        collect_verbal(secondary, turn, out);
    }
    for subordinate in &group.subordinate_sentences {
        collect_sentence(subordinate, turn, out);
    }
}

fn collect_nominal<'h>(group: &'h NominalGroup, turn: usize, role: Role, out: &mut Vec<Candidate<'h>>) {
    out.push(Candidate { turn, role, group });
    for complement in &group.noun_complements {
        collect_nominal(complement, turn, Role::Complement, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialog_sentence::{IndirectComplement, Quantifier};
    use pretty_assertions::assert_eq;

    fn i_see(object: NominalGroup) -> Sentence {
        Sentence::statement()
            .with_subject(NominalGroup::pronoun("I").resolved_as("human"))
            .with_predicate(VerbalGroup::new("see").with_object(object))
    }

    fn red_bottle() -> NominalGroup {
        NominalGroup::noun_phrase("the", "bottle")
            .with_adjective("red")
            .resolved_as("bottle_red")
    }

    #[test]
    fn single_antecedent_is_returned() {
        let lexicon = Lexicon::default();
        let history = vec![i_see(red_bottle())];

        let found = AnaphoraMatcher::new(&lexicon)
            .match_first_candidate(&history, &NominalGroup::pronoun("it"))
            .unwrap();
        assert_eq!(found, red_bottle());
    }

    #[test]
    fn no_history_differs_from_no_match() {
        let lexicon = Lexicon::default();
        let matcher = AnaphoraMatcher::new(&lexicon);
        let empty: Vec<Sentence> = Vec::new();

        assert_eq!(
            matcher.match_first_candidate(&empty, &NominalGroup::pronoun("it")),
            Err(MatchError::NoHistory)
        );

        let only_pronouns = vec![Sentence::statement()
            .with_subject(NominalGroup::pronoun("you").resolved_as("myself"))];
        assert_eq!(
            matcher.match_first_candidate(&only_pronouns, &NominalGroup::pronoun("it")),
            Err(MatchError::NoMatch)
        );
    }

    #[test]
    fn newest_direct_object_ranks_first() {
        let lexicon = Lexicon::default();
        let blue = NominalGroup::noun_phrase("the", "bottle").resolved_as("bottle_blue");
        let table = NominalGroup::noun_phrase("the", "table").resolved_as("table_1");
        let put = Sentence::imperative().with_predicate(
            VerbalGroup::new("put")
                .with_object(blue.clone())
                .with_complement(IndirectComplement::new(["on"], vec![table.clone()])),
        );
        let history = vec![put, i_see(red_bottle())];

        let error = AnaphoraMatcher::new(&lexicon)
            .match_first_candidate(&history, &NominalGroup::pronoun("it"))
            .unwrap_err();
        assert_eq!(
            error,
            MatchError::Ambiguous {
                top: blue.clone(),
                all: vec![blue, table, red_bottle()],
            }
        );
    }

    #[test]
    fn number_and_adjectives_filter_candidates() {
        let lexicon = Lexicon::default();
        let cups = NominalGroup::noun_phrase("the", "cup")
            .with_quantifier(Quantifier::All)
            .resolved_as(vec!["cup_a".to_string(), "cup_b".into()]);
        let history = vec![i_see(cups), i_see(red_bottle())];

        let red_one = NominalGroup::noun_phrase("the", "one").with_adjective("red");
        let found = AnaphoraMatcher::new(&lexicon)
            .match_first_candidate(&history, &red_one)
            .unwrap();
        assert_eq!(found.id().map(ToString::to_string).as_deref(), Some("bottle_red"));
    }

    #[test]
    fn same_concept_twice_is_not_ambiguous() {
        let lexicon = Lexicon::default();
        let history = vec![i_see(red_bottle()), i_see(red_bottle())];

        assert!(
            AnaphoraMatcher::new(&lexicon)
                .match_first_candidate(&history, &NominalGroup::pronoun("it"))
                .is_ok()
        );
    }
}
