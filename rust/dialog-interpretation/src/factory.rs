//! Building the questions attached to clarifications.
//!
//! The resolver never verbalizes anything itself. It asks a
//! [`SentenceFactory`] for sentence trees and ships them unchanged inside a
//! [`Clarification`](crate::Clarification); the verbalizer turns them into
//! text later.

use dialog_sentence::{Conjunction, NominalGroup, Sentence, SentenceKind, VerbState, VerbalGroup};

pub trait SentenceFactory {
    /// "Do you mean the bottle?"
    fn do_you_mean(&self, object: &NominalGroup) -> Vec<Sentence>;

    /// "The bottle? What do you mean?"
    fn what_do_you_mean(&self, object: &NominalGroup) -> Vec<Sentence>;

    /// "I don't know any bottle."
    fn no_instance_of(&self, object: &NominalGroup) -> Vec<Sentence>;

    /// "Which color is the bottle? Blue or red."
    fn which_choice(&self, object: &NominalGroup, feature: &str, values: &[String]) -> Vec<Sentence>;
}

impl<F: SentenceFactory + ?Sized> SentenceFactory for &F {
    fn do_you_mean(&self, object: &NominalGroup) -> Vec<Sentence> {
        (**self).do_you_mean(object)
    }

    fn what_do_you_mean(&self, object: &NominalGroup) -> Vec<Sentence> {
        (**self).what_do_you_mean(object)
    }

    fn no_instance_of(&self, object: &NominalGroup) -> Vec<Sentence> {
        (**self).no_instance_of(object)
    }

    fn which_choice(&self, object: &NominalGroup, feature: &str, values: &[String]) -> Vec<Sentence> {
        (**self).which_choice(object, feature, values)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishSentenceFactory;

impl SentenceFactory for EnglishSentenceFactory {
    fn do_you_mean(&self, object: &NominalGroup) -> Vec<Sentence> {
        vec![Sentence::new(SentenceKind::YesNoQuestion)
            .with_subject(NominalGroup::pronoun("you"))
            .with_predicate(VerbalGroup::new("mean").with_object(object.clone()))]
    }

    fn what_do_you_mean(&self, object: &NominalGroup) -> Vec<Sentence> {
        vec![
            Sentence::new(SentenceKind::YesNoQuestion).with_subject(object.clone()),
            Sentence::new(SentenceKind::WQuestion)
                .with_aim("thing")
                .with_subject(NominalGroup::pronoun("you"))
                .with_predicate(VerbalGroup::new("mean")),
        ]
    }

    fn no_instance_of(&self, object: &NominalGroup) -> Vec<Sentence> {
        let mut any = object.clone();
        any.determiners = vec!["any".into()];

        vec![Sentence::statement()
            .with_aim("thing")
            .with_subject(NominalGroup::pronoun("I"))
            .with_predicate(
                VerbalGroup::new("know")
                    .with_state(VerbState::Negative)
                    .with_object(any),
            )]
    }

    fn which_choice(&self, object: &NominalGroup, feature: &str, values: &[String]) -> Vec<Sentence> {
        let name = object.head_noun().unwrap_or("thing").to_lowercase();
        let question = Sentence::new(SentenceKind::WQuestion)
            .with_aim("choice")
            .with_subject(NominalGroup::pronoun(feature))
            .with_predicate(VerbalGroup::new("be").with_object(NominalGroup::noun_phrase("the", name)));

        let mut choices = Sentence::statement();
        for (i, value) in values.iter().enumerate() {
            let mut choice = NominalGroup::new().with_adjective(value.to_lowercase());
            if i > 0 {
                choice = choice.with_conjunction(Conjunction::Or);
            }
            choices = choices.with_subject(choice);
        }

        vec![question, choices]
    }
}
