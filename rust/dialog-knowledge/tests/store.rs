use dialog_knowledge::{KnowledgeBase, MemoryKnowledgeBase, Revision, Statement};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use testresult::TestResult;

fn parse(text: &[&str]) -> Result<Vec<Statement>, dialog_knowledge::KnowledgeError> {
    text.iter().map(|statement| statement.parse()).collect()
}

#[test]
fn models_hold_agent_relative_beliefs() -> TestResult {
    let kb = MemoryKnowledgeBase::new();
    kb.assert_all("human", ["cup_a rdf:type Cup", "cup_a hasColor red"])?;
    kb.assert_all("myself", ["cup_a rdf:type Cup", "cup_a hasColor blue"])?;

    let red = parse(&["?concept rdf:type Cup", "?concept hasColor red"])?;
    assert_eq!(kb.find("human", "?concept", &red)?, vec!["cup_a"]);
    assert!(kb.find("myself", "?concept", &red)?.is_empty());
    assert_eq!(kb.models(), vec!["human", "myself"]);
    Ok(())
}

#[test]
fn revisions_reach_every_listed_model_once() -> TestResult {
    let kb = MemoryKnowledgeBase::new().with_model("human");
    let facts = parse(&["banana_1 rdf:type Banana", "banana_1 hasColor yellow"])?;

    kb.revise(&facts, &Revision::add(["human", "myself"]))?;
    kb.revise(&facts, &Revision::add(["human"]))?;

    assert_eq!(kb.about("human", "banana_1")?, facts);
    assert_eq!(kb.about("myself", "banana_1")?, facts);

    kb.revise(&facts[1..], &Revision::retract(["myself", "nobody"]))?;
    assert_eq!(kb.about("myself", "banana_1")?, facts[..1].to_vec());
    Ok(())
}

#[test]
fn queries_bind_several_variables() -> TestResult {
    let kb = MemoryKnowledgeBase::new();
    kb.assert_all(
        "human",
        [
            "cup_a rdf:type Cup",
            "cup_b rdf:type Cup",
            "table_1 rdf:type Table",
            "cup_b isOn table_1",
        ],
    )?;

    let on_a_table = parse(&["?id_1 rdf:type Table", "?concept isOn ?id_1", "?concept rdf:type Cup"])?;
    assert_eq!(kb.find("human", "?concept", &on_a_table)?, vec!["cup_b"]);
    assert_eq!(kb.find("human", "?id_1", &on_a_table)?, vec!["table_1"]);
    Ok(())
}

#[test]
fn shared_handles_see_each_others_writes() -> TestResult {
    let kb = Arc::new(MemoryKnowledgeBase::new().with_model("human"));
    let writer = Arc::clone(&kb);

    std::thread::spawn(move || writer.assert("human", "jido rdfs:label Jido"))
        .join()
        .map_err(|_| "writer thread panicked")??;

    assert_eq!(kb.label("jido")?, "Jido");
    assert_eq!(
        kb.lookup("human", "JIDO")?,
        vec![(dialog_knowledge::ConceptKind::Instance, "jido".to_string())]
    );
    Ok(())
}

#[test]
fn statements_travel_as_text() -> TestResult {
    let statements = parse(&["?concept rdf:type Cup", "human sees ?concept"])?;
    let json = serde_json::to_string(&statements)?;
    assert_eq!(json, r#"["?concept rdf:type Cup","human sees ?concept"]"#);

    let back: Vec<Statement> = serde_json::from_str(&json)?;
    assert_eq!(back, statements);
    assert!(serde_json::from_str::<Statement>(r#""too few""#).is_err());
    Ok(())
}
