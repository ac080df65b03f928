//! An in-process, multi-model triple store.
//!
//! Each agent model is an insertion-ordered set of fully bound triples.
//! Queries are conjunctions of statement patterns solved by backtracking
//! over the model's triples, so results come back in a deterministic order
//! for a given set of facts.
//!
//! Two pieces of reasoning are built in:
//!
//! - `?x rdf:type C` also matches instances of every transitive
//!   `rdfs:subClassOf` descendant of `C`;
//! - `a owl:differentFrom b` is an inequality check evaluated once both
//!   sides are bound, whatever their position in the query.

use crate::client::{ConceptKind, KnowledgeBase, Revision, RevisionMethod};
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::statement::{Statement, Term};
use crate::vocabulary::{OWL_DIFFERENT_FROM, RDF_TYPE, RDFS_LABEL, RDFS_SUBCLASS_OF};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Fact {
    subject: String,
    predicate: String,
    object: String,
}

impl Fact {
    fn from_statement(statement: &Statement) -> KnowledgeResult<Self> {
        match (
            statement.subject.as_constant(),
            statement.predicate.as_constant(),
            statement.object.as_constant(),
        ) {
            (Some(subject), Some(predicate), Some(object)) => Ok(Fact {
                subject: subject.to_string(),
                predicate: predicate.to_string(),
                object: object.to_string(),
            }),
            _ => Err(KnowledgeError::MalformedStatement {
                statement: statement.to_string(),
                reason: "facts cannot hold unbound variables".into(),
            }),
        }
    }

    fn to_statement(&self) -> Statement {
        Statement::new(
            Term::constant(&self.subject),
            Term::constant(&self.predicate),
            Term::constant(&self.object),
        )
    }
}

type Bindings = HashMap<String, String>;

/// A knowledge base kept entirely in memory.
///
/// Interior mutability lets it be shared behind `&` or `Arc` like a remote
/// client would be. [`MemoryKnowledgeBase::set_available`] simulates a lost
/// connection.
#[derive(Debug, Default)]
pub struct MemoryKnowledgeBase {
    models: RwLock<BTreeMap<String, Vec<Fact>>>,
    offline: AtomicBool,
}

impl MemoryKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(self, model: impl Into<String>) -> Self {
        self.add_model(model);
        self
    }

    /// Register an (initially empty) agent model.
    pub fn add_model(&self, model: impl Into<String>) {
        self.models.write().entry(model.into()).or_default();
    }

    pub fn models(&self) -> Vec<String> {
        self.models.read().keys().cloned().collect()
    }

    /// Add one textual fact to `model`, creating the model if needed.
    pub fn assert(&self, model: &str, statement: &str) -> KnowledgeResult<()> {
        let statement: Statement = statement.parse()?;
        self.revise(&[statement], &Revision::add([model]))
    }

    pub fn assert_all<'a, I>(&self, model: &str, statements: I) -> KnowledgeResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let statements = statements
            .into_iter()
            .map(str::parse)
            .collect::<KnowledgeResult<Vec<Statement>>>()?;
        self.revise(&statements, &Revision::add([model]))
    }

    /// Toggle simulated connectivity. While unavailable every call fails
    /// with [`KnowledgeError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> KnowledgeResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(KnowledgeError::Unavailable("memory knowledge base is offline".into()))
        } else {
            Ok(())
        }
    }

    fn with_facts<T>(&self, model: &str, read: impl FnOnce(&[Fact]) -> T) -> KnowledgeResult<T> {
        self.ensure_available()?;
        let models = self.models.read();
        let facts = models.get(model).ok_or_else(|| KnowledgeError::AgentUnknown {
            model: model.to_string(),
        })?;
        Ok(read(facts.as_slice()))
    }
}

impl KnowledgeBase for MemoryKnowledgeBase {
    fn lookup(&self, model: &str, term: &str) -> KnowledgeResult<Vec<(ConceptKind, String)>> {
        self.with_facts(model, |facts| {
            let mut seen = HashSet::new();
            let mut candidates = Vec::new();
            let mut push = |id: &str| {
                if seen.insert(id.to_string()) {
                    candidates.push(id.to_string());
                }
            };
            for fact in facts {
                if fact.predicate == RDFS_LABEL {
                    if fact.object.eq_ignore_ascii_case(term) {
                        push(&fact.subject);
                    }
                    continue;
                }
                if fact.subject.eq_ignore_ascii_case(term) {
                    push(&fact.subject);
                }
                if fact.object.eq_ignore_ascii_case(term) {
                    push(&fact.object);
                }
            }

            let mut found = Vec::new();
            for id in candidates {
                let class = is_class(facts, &id);
                let instance = facts
                    .iter()
                    .any(|fact| fact.subject == id && fact.predicate == RDF_TYPE);
                if class {
                    found.push((ConceptKind::Class, id.clone()));
                }
                if instance || !class {
                    found.push((ConceptKind::Instance, id));
                }
            }
            found
        })
    }

    fn find(&self, model: &str, variable: &str, constraints: &[Statement]) -> KnowledgeResult<Vec<String>> {
        let variable = variable.strip_prefix('?').unwrap_or(variable);
        tracing::trace!(
            model,
            variable,
            query = %constraints.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            "find"
        );
        self.with_facts(model, |facts| {
            let mut seen = HashSet::new();
            solve(facts, constraints)
                .into_iter()
                .filter_map(|mut bindings| bindings.remove(variable))
                .filter(|value| seen.insert(value.clone()))
                .collect()
        })
    }

    fn label(&self, id: &str) -> KnowledgeResult<String> {
        self.ensure_available()?;
        let models = self.models.read();
        let label = models
            .values()
            .flatten()
            .find(|fact| fact.subject == id && fact.predicate == RDFS_LABEL)
            .map(|fact| fact.object.clone());
        Ok(label.unwrap_or_else(|| id.to_string()))
    }

    fn revise(&self, statements: &[Statement], revision: &Revision) -> KnowledgeResult<()> {
        self.ensure_available()?;
        let facts = statements
            .iter()
            .map(Fact::from_statement)
            .collect::<KnowledgeResult<Vec<Fact>>>()?;

        let mut models = self.models.write();
        for model in &revision.models {
            match revision.method {
                RevisionMethod::Add => {
                    let stored = models.entry(model.clone()).or_default();
                    for fact in &facts {
                        if !stored.contains(fact) {
                            stored.push(fact.clone());
                        }
                    }
                }
                RevisionMethod::Retract => {
                    if let Some(stored) = models.get_mut(model) {
                        stored.retain(|fact| !facts.contains(fact));
                    }
                }
            }
            tracing::debug!(%model, method = ?revision.method, count = facts.len(), "revised model");
        }
        Ok(())
    }

    fn about(&self, model: &str, id: &str) -> KnowledgeResult<Vec<Statement>> {
        self.with_facts(model, |facts| {
            facts
                .iter()
                .filter(|fact| fact.subject == id)
                .map(Fact::to_statement)
                .collect()
        })
    }
}

fn is_class(facts: &[Fact], id: &str) -> bool {
    facts.iter().any(|fact| {
        (fact.predicate == RDF_TYPE && fact.object == id)
            || (fact.predicate == RDFS_SUBCLASS_OF && (fact.subject == id || fact.object == id))
    })
}

/// `class` and all of its transitive subclasses.
fn subclasses(facts: &[Fact], class: &str) -> HashSet<String> {
    let mut classes = HashSet::from([class.to_string()]);
    loop {
        let before = classes.len();
        for fact in facts {
            if fact.predicate == RDFS_SUBCLASS_OF && classes.contains(&fact.object) {
                classes.insert(fact.subject.clone());
            }
        }
        if classes.len() == before {
            return classes;
        }
    }
}

fn is_builtin(statement: &Statement) -> bool {
    statement.predicate.as_constant() == Some(OWL_DIFFERENT_FROM)
}

fn value_of<'a>(term: &'a Term, bindings: &'a Bindings) -> Option<&'a str> {
    match term {
        Term::Constant(value) => Some(value),
        Term::Variable(name) => bindings.get(name).map(String::as_str),
    }
}

fn bind(term: &Term, value: &str, bindings: &mut Bindings) -> bool {
    match term {
        Term::Constant(constant) => constant == value,
        Term::Variable(name) => match bindings.get(name) {
            Some(existing) => existing == value,
            None => {
                bindings.insert(name.clone(), value.to_string());
                true
            }
        },
    }
}

fn solve(facts: &[Fact], constraints: &[Statement]) -> Vec<Bindings> {
    // Built-ins need both sides bound, so they run after every pattern.
    let mut ordered: Vec<&Statement> = constraints.iter().filter(|s| !is_builtin(s)).collect();
    ordered.extend(constraints.iter().filter(|s| is_builtin(s)));

    let mut solutions = Vec::new();
    extend(facts, &ordered, Bindings::new(), &mut solutions);
    solutions
}

fn extend(facts: &[Fact], patterns: &[&Statement], bindings: Bindings, out: &mut Vec<Bindings>) {
    let Some((pattern, rest)) = patterns.split_first() else {
        out.push(bindings);
        return;
    };

    if is_builtin(pattern) {
        let differs = match (
            value_of(&pattern.subject, &bindings),
            value_of(&pattern.object, &bindings),
        ) {
            (Some(subject), Some(object)) => subject != object,
            _ => false,
        };
        if differs {
            extend(facts, rest, bindings, out);
        }
        return;
    }

    let classes = match (
        pattern.predicate.as_constant(),
        value_of(&pattern.object, &bindings),
    ) {
        (Some(RDF_TYPE), Some(class)) => Some(subclasses(facts, class)),
        _ => None,
    };

    for fact in facts {
        let mut candidate = bindings.clone();
        if !bind(&pattern.subject, &fact.subject, &mut candidate)
            || !bind(&pattern.predicate, &fact.predicate, &mut candidate)
        {
            continue;
        }
        let object_matches = match &classes {
            Some(classes) => classes.contains(&fact.object),
            None => bind(&pattern.object, &fact.object, &mut candidate),
        };
        if object_matches {
            extend(facts, rest, candidate, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn kitchen() -> KnowledgeResult<MemoryKnowledgeBase> {
        let kb = MemoryKnowledgeBase::new();
        kb.assert_all(
            "human",
            [
                "Cup rdfs:subClassOf Artifact",
                "Mug rdfs:subClassOf Cup",
                "cup_a rdf:type Cup",
                "mug_b rdf:type Mug",
                "cup_a hasColor red",
                "mug_b hasColor blue",
                "human sees cup_a",
                "jido rdfs:label Jido",
                "jido rdf:type Robot",
            ],
        )?;
        Ok(kb)
    }

    fn query(text: &[&str]) -> Vec<Statement> {
        text.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn type_queries_follow_subclasses() -> TestResult {
        let kb = kitchen()?;
        let cups = kb.find("human", "?concept", &query(&["?concept rdf:type Cup"]))?;
        assert_eq!(cups, vec!["cup_a", "mug_b"]);

        let artifacts = kb.find("human", "concept", &query(&["?concept rdf:type Artifact"]))?;
        assert_eq!(artifacts.len(), 2);
        Ok(())
    }

    #[test]
    fn conjunctions_join_on_shared_variables() -> TestResult {
        let kb = kitchen()?;
        let red = kb.find(
            "human",
            "?concept",
            &query(&["?concept rdf:type Cup", "?concept hasColor red"]),
        )?;
        assert_eq!(red, vec!["cup_a"]);

        let visible = kb.find(
            "human",
            "?concept",
            &query(&["human sees ?concept", "?concept rdf:type Mug"]),
        )?;
        assert!(visible.is_empty());
        Ok(())
    }

    #[test]
    fn different_from_is_an_inequality() -> TestResult {
        let kb = kitchen()?;
        let other = kb.find(
            "human",
            "?concept",
            &query(&["?concept owl:differentFrom cup_a", "?concept rdf:type Cup"]),
        )?;
        assert_eq!(other, vec!["mug_b"]);
        Ok(())
    }

    #[test]
    fn lookup_matches_ids_and_labels() -> TestResult {
        let kb = kitchen()?;
        assert_eq!(
            kb.lookup("human", "jido")?,
            vec![(ConceptKind::Instance, "jido".to_string())]
        );
        assert_eq!(
            kb.lookup("human", "cup")?,
            vec![(ConceptKind::Class, "Cup".to_string())]
        );
        assert_eq!(kb.label("jido")?, "Jido");
        assert_eq!(kb.label("cup_a")?, "cup_a");
        Ok(())
    }

    #[test]
    fn unknown_models_and_offline_are_typed_failures() -> TestResult {
        let kb = kitchen()?;
        assert_eq!(
            kb.find("robot", "?x", &[]),
            Err(KnowledgeError::AgentUnknown {
                model: "robot".into()
            })
        );

        kb.set_available(false);
        assert!(matches!(
            kb.lookup("human", "cup"),
            Err(KnowledgeError::Unavailable(_))
        ));
        kb.set_available(true);
        assert!(kb.lookup("human", "cup").is_ok());
        Ok(())
    }

    #[test]
    fn revise_rejects_unbound_statements_and_retracts() -> TestResult {
        let kb = kitchen()?;
        let unbound = query(&["?x rdf:type Cup"]);
        assert!(matches!(
            kb.revise(&unbound, &Revision::add(["human"])),
            Err(KnowledgeError::MalformedStatement { .. })
        ));

        kb.revise(&query(&["cup_a hasColor red"]), &Revision::retract(["human"]))?;
        assert_eq!(
            kb.about("human", "cup_a")?,
            query(&["cup_a rdf:type Cup"])
        );
        Ok(())
    }
}
