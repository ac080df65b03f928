//! From nominal groups to KB constraints.
//!
//! A description is the set of triples a concept must satisfy to match a
//! nominal group, with the group's own concept as the free variable:
//!
//! ```text
//! "the red cup of Jido which is on the table"
//!   ?concept rdf:type Cup
//!   ?concept hasColor red
//!   ?concept belongsTo jido
//!   ?id_1 rdf:type Table
//!   ?concept isOn ?id_1
//! ```
//!
//! Unresolved complements get fresh `?id_N` variables and are described in
//! turn, so one query constrains the whole phrase.

use crate::config::InterpretationConfig;
use crate::query;
use dialog_knowledge::vocabulary::{BELONGS_TO, RDF_TYPE};
use dialog_knowledge::{KnowledgeBase, Statement};
use dialog_sentence::{NominalGroup, Sentence};

/// Constraints describing one nominal group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    pub statements: Vec<Statement>,
    /// The group carries the adjective "other": the concept must differ
    /// from one mentioned earlier.
    pub process_other: bool,
}

pub struct StatementBuilder<'a, K> {
    kb: &'a K,
    config: &'a InterpretationConfig,
    speaker: &'a str,
    fresh: usize,
}

impl<'a, K: KnowledgeBase> StatementBuilder<'a, K> {
    pub fn new(kb: &'a K, config: &'a InterpretationConfig, speaker: &'a str) -> Self {
        StatementBuilder {
            kb,
            config,
            speaker,
            fresh: 0,
        }
    }

    /// Describe `group` with `variable` (e.g. `?concept`) standing for it.
    pub fn describe(&mut self, group: &NominalGroup, variable: &str) -> Description {
        let mut description = Description::default();
        self.describe_into(group, variable, &mut description);
        description
    }

    fn model(&self) -> &'a str {
        self.config.model_for(self.speaker)
    }

    fn fresh_variable(&mut self) -> String {
        self.fresh += 1;
        format!("?id_{}", self.fresh)
    }

    fn describe_into(&mut self, group: &NominalGroup, variable: &str, out: &mut Description) {
        let config: &'a InterpretationConfig = self.config;
        let lexicon = &config.lexicon;

        if let Some(noun) = group.head_noun() {
            if !lexicon.is_pronoun(noun) && !lexicon.is_universal(noun) {
                let class = query::class_of(self.kb, self.model(), noun);
                out.statements
                    .push(Statement::triple(variable, RDF_TYPE, &class));
            }
        }

        for (adjective, _) in &group.adjectives {
            if adjective.eq_ignore_ascii_case("other") {
                out.process_other = true;
                continue;
            }
            out.statements.push(Statement::triple(
                variable,
                &lexicon.feature_predicate(adjective),
                &adjective.to_lowercase(),
            ));
        }

        for complement in &group.noun_complements {
            for owner in self.terms_for(complement, out) {
                out.statements
                    .push(Statement::triple(variable, BELONGS_TO, &owner));
            }
        }

        for relative in &group.relative_clauses {
            self.describe_relative(relative, variable, out);
        }
    }

    /// Terms standing for `group` inside another group's description.
    fn terms_for(&mut self, group: &NominalGroup, out: &mut Description) -> Vec<String> {
        if let Some(id) = group.id() {
            return id.ids().to_vec();
        }
        let lexicon = &self.config.lexicon;
        if let Some(noun) = group.head_noun() {
            if lexicon.is_first_person(noun) {
                return vec![self.speaker.to_string()];
            }
            if lexicon.is_second_person(noun) {
                return vec![self.config.self_id.clone()];
            }
        }
        let variable = self.fresh_variable();
        self.describe_into(group, &variable, out);
        vec![variable]
    }

    /// Relative clauses describe the group through their verbs.
    ///
    /// Without a subject the group is the clause's subject ("the cup which
    /// is on the table"); with one, the group is its object ("the cup that
    /// Jido sees").
    fn describe_relative(&mut self, relative: &Sentence, variable: &str, out: &mut Description) {
        let config: &'a InterpretationConfig = self.config;
        let lexicon = &config.lexicon;
        let mut subjects = Vec::new();
        for subject in &relative.subjects {
            subjects.extend(self.terms_for(subject, out));
        }

        for predicate in &relative.predicates {
            let Some(verb) = predicate.main_verb() else {
                continue;
            };
            let verb = verb.rsplit('+').next().unwrap_or(verb);
            let copular = lexicon.is_state_verb(verb);

            if !subjects.is_empty() {
                let property = verb_predicate(lexicon.thematic_verb(verb).unwrap_or(verb));
                for subject in &subjects {
                    out.statements
                        .push(Statement::triple(subject, &property, variable));
                }
                continue;
            }

            for object in &predicate.direct_objects {
                if copular && object.is_adjective_only() {
                    let mut features = object.clone();
                    features.nouns.clear();
                    self.describe_into(&features, variable, out);
                } else if copular {
                    let mut class = object.clone();
                    class.adjectives.clear();
                    class.noun_complements.clear();
                    class.relative_clauses.clear();
                    self.describe_into(&class, variable, out);
                } else {
                    let property = verb_predicate(lexicon.thematic_verb(verb).unwrap_or(verb));
                    for term in self.terms_for(object, out) {
                        out.statements
                            .push(Statement::triple(variable, &property, &term));
                    }
                }
            }

            for complement in &predicate.indirect_complements {
                let preposition = complement.preposition.join("+");
                let Some(property) = lexicon.preposition_predicate(&preposition) else {
                    tracing::debug!(%preposition, "no predicate for preposition, skipping");
                    continue;
                };
                let property = property.to_string();
                for group in &complement.groups {
                    for term in self.terms_for(group, out) {
                        out.statements
                            .push(Statement::triple(variable, &property, &term));
                    }
                }
            }
        }
    }
}

/// Third person form used as KB predicate: "see" → "sees".
fn verb_predicate(verb: &str) -> String {
    if verb.ends_with('s') || verb.ends_with("sh") || verb.ends_with("ch") {
        format!("{verb}es")
    } else {
        format!("{verb}s")
    }
}
