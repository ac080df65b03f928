//! KB reads that degrade to "no results".
//!
//! A lookup that fails because the KB is unreachable or does not know the
//! speaker's model behaves like an empty answer; the failure is logged and
//! resolution carries on.

use dialog_knowledge::{ConceptKind, KnowledgeBase, Statement};

pub(crate) const CONCEPT: &str = "?concept";

pub(crate) fn find<K: KnowledgeBase>(kb: &K, model: &str, constraints: &[Statement]) -> Vec<String> {
    find_var(kb, model, CONCEPT, constraints)
}

pub(crate) fn find_var<K: KnowledgeBase>(
    kb: &K,
    model: &str,
    variable: &str,
    constraints: &[Statement],
) -> Vec<String> {
    match kb.find(model, variable, constraints) {
        Ok(found) => found,
        Err(error) => {
            tracing::warn!(model, variable, %error, "knowledge base query failed, assuming no results");
            Vec::new()
        }
    }
}

pub(crate) fn lookup<K: KnowledgeBase>(kb: &K, model: &str, term: &str) -> Vec<(ConceptKind, String)> {
    match kb.lookup(model, term) {
        Ok(found) => found,
        Err(error) => {
            tracing::warn!(model, term, %error, "knowledge base lookup failed, assuming no results");
            Vec::new()
        }
    }
}

/// A known instance named `term` in `model`.
pub(crate) fn instance_named<K: KnowledgeBase>(kb: &K, model: &str, term: &str) -> Option<String> {
    lookup(kb, model, term)
        .into_iter()
        .find(|(kind, _)| *kind == ConceptKind::Instance)
        .map(|(_, id)| id)
}

/// The ontology class a noun names: the KB's class id when it knows one,
/// else the noun in CamelCase ("fruit+basket" → "FruitBasket").
pub(crate) fn class_of<K: KnowledgeBase>(kb: &K, model: &str, noun: &str) -> String {
    lookup(kb, model, noun)
        .into_iter()
        .find(|(kind, _)| *kind == ConceptKind::Class)
        .map(|(_, id)| id)
        .unwrap_or_else(|| camel_case(noun))
}

fn camel_case(noun: &str) -> String {
    noun.split(['+', ' ', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}
