mod common;

use anyhow::{bail, Result};
use common::{give_me, kitchen, object_id, order, resolver, the, SPEAKER};
use dialog_interpretation::{
    Answer, Clarification, Dialogue, DialogueHistory, InterpretationError, Substitution, TurnOutcome,
};
use dialog_sentence::{ConceptRef, IndirectComplement, NominalGroup, Sentence, VerbalGroup};
use pretty_assertions::assert_eq;

fn put_red_cup_on_table() -> Sentence {
    Sentence::imperative().with_predicate(
        VerbalGroup::new("put")
            .with_object(the("cup").with_adjective("red"))
            .with_complement(IndirectComplement::new(["on"], vec![the("table")])),
    )
}

fn clarification(outcome: TurnOutcome) -> Result<Clarification> {
    match outcome {
        TurnOutcome::Clarify(clarification) => Ok(clarification),
        TurnOutcome::Resolved { sentence, .. } => bail!("resolved unexpectedly: {sentence:?}"),
    }
}

fn resolved(outcome: TurnOutcome) -> Result<Sentence> {
    match outcome {
        TurnOutcome::Resolved { sentence, .. } => Ok(sentence),
        TurnOutcome::Clarify(clarification) => bail!("still needs clarification: {clarification}"),
    }
}

#[test_log::test]
fn better_descriptions_resume_the_turn() -> Result<()> {
    let kb = kitchen()?;
    let resolver = resolver(&kb);
    let history = DialogueHistory::new();
    let mut sentence = give_me(the("cup"));

    let Err(InterpretationError::Clarification(clarification)) =
        resolver.interpret(&mut sentence, SPEAKER, &history)
    else {
        bail!("expected the cup to be ambiguous");
    };

    let unknown = resolver.resume(
        &mut sentence,
        SPEAKER,
        &clarification,
        Answer::Describe(the("cup").with_adjective("blue")),
        &history,
    )?;

    assert!(unknown.is_empty());
    assert_eq!(object_id(&sentence).as_deref(), Some("cup_b"));
    assert!(sentence.is_fully_resolved());
    Ok(())
}

#[test_log::test]
fn substitutions_locate_the_group_to_replace() -> Result<()> {
    let kb = kitchen()?;
    let resolver = resolver(&kb);
    let history = DialogueHistory::new();
    let mut sentence = give_me(the("cup"));

    let substitution = Substitution::locate(&sentence, &the("cup"), the("cup").with_adjective("red"))
        .ok_or_else(|| anyhow::anyhow!("the cup is in the sentence"))?;
    resolver.resolve_noun_phrases(&mut sentence, SPEAKER, &history, Some(substitution))?;
    assert_eq!(object_id(&sentence), None);

    resolver.interpret(&mut sentence, SPEAKER, &history)?;
    assert_eq!(object_id(&sentence).as_deref(), Some("cup_a"));
    Ok(())
}

#[test_log::test]
fn confirming_an_antecedent_grounds_the_anaphor() -> Result<()> {
    let kb = kitchen()?;
    let mut dialogue = Dialogue::new(resolver(&kb));

    resolved(dialogue.hear(put_red_cup_on_table(), SPEAKER)?)?;
    let asked = clarification(dialogue.hear(order("take", NominalGroup::pronoun("it")), SPEAKER)?)?;
    let Clarification::AmbiguousAnaphor { top, .. } = &asked else {
        bail!("expected an ambiguous anaphor, got {asked:?}");
    };
    assert_eq!(top.id(), Some(&ConceptRef::from("cup_a")));

    let sentence = resolved(dialogue.answer(Answer::Confirm)?)?;
    assert_eq!(object_id(&sentence).as_deref(), Some("cup_a"));
    assert_eq!(dialogue.history().len(), 2);
    assert!(dialogue.pending().is_none());
    Ok(())
}

#[test_log::test]
fn rejecting_walks_through_the_candidates() -> Result<()> {
    let kb = kitchen()?;
    let mut dialogue = Dialogue::new(resolver(&kb));
    resolved(dialogue.hear(put_red_cup_on_table(), SPEAKER)?)?;
    clarification(dialogue.hear(order("take", NominalGroup::pronoun("it")), SPEAKER)?)?;

    let next = clarification(dialogue.answer(Answer::Reject)?)?;
    let Clarification::AmbiguousAnaphor { top, candidates, .. } = &next else {
        bail!("expected the next candidate, got {next:?}");
    };
    assert_eq!(top.id(), Some(&ConceptRef::from("table_1")));
    assert_eq!(candidates.len(), 1);

    let exhausted = clarification(dialogue.answer(Answer::Reject)?)?;
    assert!(matches!(exhausted, Clarification::NoAnaphoricMatch { .. }));

    let sentence = resolved(dialogue.answer(Answer::Describe(the("cup").with_adjective("blue")))?)?;
    assert_eq!(object_id(&sentence).as_deref(), Some("cup_b"));
    Ok(())
}

#[test_log::test]
fn unfitting_answers_keep_the_turn_pending() -> Result<()> {
    let kb = kitchen()?;
    let mut dialogue = Dialogue::new(resolver(&kb));
    clarification(dialogue.hear(give_me(the("cup")), SPEAKER)?)?;

    let error = dialogue.answer(Answer::Confirm).unwrap_err();
    assert!(matches!(error, InterpretationError::UnexpectedAnswer { .. }));
    assert!(dialogue.pending().is_some());

    let sentence = resolved(dialogue.answer(Answer::Describe(the("cup").with_adjective("red")))?)?;
    assert_eq!(object_id(&sentence).as_deref(), Some("cup_a"));
    Ok(())
}

#[test_log::test]
fn answers_need_a_pending_turn() -> Result<()> {
    let kb = kitchen()?;
    let mut dialogue = Dialogue::new(resolver(&kb));

    assert_eq!(
        dialogue.answer(Answer::Confirm).unwrap_err(),
        InterpretationError::NothingPending
    );

    clarification(dialogue.hear(give_me(the("cup")), SPEAKER)?)?;
    let abandoned = dialogue.abandon();
    assert!(abandoned.is_some());
    assert!(dialogue.history().is_empty());
    Ok(())
}

#[test_log::test]
fn new_utterances_replace_unanswered_questions() -> Result<()> {
    let kb = kitchen()?;
    let mut dialogue = Dialogue::new(resolver(&kb));

    clarification(dialogue.hear(give_me(the("cup")), SPEAKER)?)?;
    let sentence = resolved(dialogue.hear(give_me(the("banana")), SPEAKER)?)?;

    assert_eq!(object_id(&sentence).as_deref(), Some("banana_1"));
    assert!(dialogue.pending().is_none());
    assert_eq!(dialogue.history().len(), 1);
    Ok(())
}

#[test_log::test]
fn pending_turns_survive_serialization() -> Result<()> {
    let kb = kitchen()?;
    let mut dialogue = Dialogue::new(resolver(&kb));
    clarification(dialogue.hear(give_me(the("cup")), SPEAKER)?)?;

    let pending = dialogue
        .pending()
        .ok_or_else(|| anyhow::anyhow!("a turn is pending"))?;
    let json = serde_json::to_string(pending)?;
    let restored: dialog_interpretation::PendingTurn = serde_json::from_str(&json)?;

    assert_eq!(&restored, pending);
    assert!(json.contains("\"kind\":\"insufficient_description\""));
    Ok(())
}
