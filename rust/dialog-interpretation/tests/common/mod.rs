#![allow(dead_code)]

use dialog_interpretation::{InterpretationConfig, Resolver};
use dialog_knowledge::{KnowledgeResult, MemoryKnowledgeBase};
use dialog_sentence::{IndirectComplement, NominalGroup, Sentence, VerbalGroup};

pub const SPEAKER: &str = "human";

/// Two cups (red on the table, blue), a yellow banana and a table, all
/// visible to the human.
pub fn kitchen() -> KnowledgeResult<MemoryKnowledgeBase> {
    let kb = MemoryKnowledgeBase::new();
    kb.assert_all(
        SPEAKER,
        [
            "Cup rdfs:subClassOf Artifact",
            "Table rdfs:subClassOf Artifact",
            "Banana rdfs:subClassOf Fruit",
            "Fruit rdfs:subClassOf Artifact",
            "cup_a rdf:type Cup",
            "cup_a hasColor red",
            "cup_a isOn table_1",
            "cup_b rdf:type Cup",
            "cup_b hasColor blue",
            "banana_1 rdf:type Banana",
            "banana_1 hasColor yellow",
            "table_1 rdf:type Table",
            "human sees cup_a",
            "human sees cup_b",
            "human sees banana_1",
        ],
    )?;
    kb.add_model("default");
    Ok(kb)
}

pub fn resolver(kb: &MemoryKnowledgeBase) -> Resolver<&MemoryKnowledgeBase> {
    Resolver::new(kb, InterpretationConfig::default())
}

pub fn order(verb: &str, object: NominalGroup) -> Sentence {
    Sentence::imperative().with_predicate(VerbalGroup::new(verb).with_object(object))
}

pub fn give_me(object: NominalGroup) -> Sentence {
    Sentence::imperative().with_predicate(
        VerbalGroup::new("give")
            .with_object(object)
            .with_complement(IndirectComplement::new(["to"], vec![NominalGroup::pronoun("me")])),
    )
}

pub fn the(noun: &str) -> NominalGroup {
    NominalGroup::noun_phrase("the", noun)
}

/// Id of the first direct object of the first predicate.
pub fn object_id(sentence: &Sentence) -> Option<String> {
    sentence
        .predicates
        .first()?
        .direct_objects
        .first()?
        .id()
        .map(ToString::to_string)
}
