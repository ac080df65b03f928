//! Narrowing KB candidates down to the concept a description means.
//!
//! ```text
//! description ──find──▶ 0 candidates  ─▶ NoMatch (or learn, when teaching)
//!                      1 candidate   ─▶ done
//!                      n candidates  ─▶ visible to the speaker? ─▶ 1 ─▶ done
//!                                                              └▶ n ─▶ StillAmbiguous
//!                                                                     + discriminant
//! ```
//!
//! The discriminant is the feature whose values tell the remaining
//! candidates apart, so the user can be asked "which color is the cup?".

use crate::config::InterpretationConfig;
use crate::error::{AmbiguityError, MatchError};
use crate::history::DialogueHistory;
use crate::query::{self, CONCEPT};
use dialog_knowledge::vocabulary::{FOCUSES_ON, OWL_DIFFERENT_FROM, RDF_TYPE, RDFS_LABEL, SEES};
use dialog_knowledge::{KnowledgeBase, KnowledgeResult, Revision, Statement};
use dialog_sentence::NominalGroup;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// What one agent believes the concept looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptDescription {
    pub speaker: String,
    pub variable: String,
    pub constraints: Vec<Statement>,
}

impl ConceptDescription {
    pub fn new(speaker: impl Into<String>, constraints: Vec<Statement>) -> Self {
        ConceptDescription {
            speaker: speaker.into(),
            variable: CONCEPT.into(),
            constraints,
        }
    }
}

/// A feature distinguishing ambiguous candidates, with its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discriminant {
    /// Question word for the feature, e.g. `color` for `hasColor`.
    pub feature: String,
    /// Distinct labelled values, in candidate order.
    pub values: Vec<String>,
}

pub struct Discriminator<'a, K> {
    kb: &'a K,
    config: &'a InterpretationConfig,
}

impl<'a, K: KnowledgeBase> Discriminator<'a, K> {
    pub fn new(kb: &'a K, config: &'a InterpretationConfig) -> Self {
        Discriminator { kb, config }
    }

    /// The single concept matching every description.
    ///
    /// `ignore_features` are predicates never proposed as discriminant,
    /// typically the feature the current question asks about.
    pub fn clarify(
        &self,
        descriptions: &[ConceptDescription],
        ignore_features: &[String],
    ) -> Result<String, AmbiguityError> {
        let mut candidates: Option<Vec<String>> = None;
        for description in descriptions {
            let model = self.config.model_for(&description.speaker);
            let found = query::find_var(self.kb, model, &description.variable, &description.constraints);
            candidates = Some(match candidates {
                None => found,
                Some(previous) => previous.into_iter().filter(|id| found.contains(id)).collect(),
            });
        }
        let mut candidates = candidates.unwrap_or_default();
        tracing::debug!(count = candidates.len(), "discrimination candidates");

        match candidates.len() {
            0 => Err(AmbiguityError::NoMatch),
            1 => Ok(candidates.remove(0)),
            _ => self.narrow(descriptions, candidates, ignore_features),
        }
    }

    fn narrow(
        &self,
        descriptions: &[ConceptDescription],
        mut candidates: Vec<String>,
        ignore_features: &[String],
    ) -> Result<String, AmbiguityError> {
        let Some(first) = descriptions.first() else {
            return Err(AmbiguityError::NoMatch);
        };
        let model = self.config.model_for(&first.speaker);

        let mut visible = first.constraints.clone();
        visible.push(Statement::triple(&first.speaker, SEES, &first.variable));
        let mut seen: Vec<String> = query::find_var(self.kb, model, &first.variable, &visible)
            .into_iter()
            .filter(|id| candidates.contains(id))
            .collect();
        match seen.len() {
            0 => {}
            1 => {
                tracing::debug!(id = %seen[0], "only one candidate is visible");
                return Ok(seen.remove(0));
            }
            _ => candidates = seen,
        }

        let discriminant = self.discriminant(model, &candidates, ignore_features);
        Err(AmbiguityError::StillAmbiguous {
            candidates,
            discriminant,
        })
    }

    /// The first feature, type first, that every candidate has and whose
    /// values are not all the same.
    fn discriminant(&self, model: &str, candidates: &[String], ignore_features: &[String]) -> Option<Discriminant> {
        let facts: Vec<Vec<Statement>> = candidates
            .iter()
            .map(|id| {
                self.kb.about(model, id).unwrap_or_else(|error| {
                    tracing::warn!(model, id, %error, "could not read candidate facts");
                    Vec::new()
                })
            })
            .collect();

        let mut predicates = vec![RDF_TYPE.to_string()];
        for statement in facts.iter().flatten() {
            if let Some(predicate) = statement.predicate.as_constant() {
                if !predicates.iter().any(|known| known == predicate) {
                    predicates.push(predicate.to_string());
                }
            }
        }

        let skipped = [RDFS_LABEL, OWL_DIFFERENT_FROM, SEES, FOCUSES_ON];
        for predicate in predicates {
            if skipped.contains(&predicate.as_str()) || ignore_features.contains(&predicate) {
                continue;
            }
            let values: Option<Vec<&str>> = facts
                .iter()
                .map(|statements| {
                    statements
                        .iter()
                        .find(|statement| statement.predicate.as_constant() == Some(predicate.as_str()))
                        .and_then(|statement| statement.object.as_constant())
                })
                .collect();
            let Some(values) = values else {
                continue;
            };

            let mut distinct: Vec<&str> = Vec::new();
            for value in values {
                if !distinct.contains(&value) {
                    distinct.push(value);
                }
            }
            if distinct.len() < 2 {
                continue;
            }

            let values = distinct
                .into_iter()
                .map(|value| self.kb.label(value).unwrap_or_else(|_| value.to_string()))
                .collect();
            return Some(Discriminant {
                feature: feature_name(&predicate),
                values,
            });
        }
        None
    }

    /// Handle "the other X": when several concepts match, exclude those
    /// mentioned in recent dialogue.
    ///
    /// A single match resolves `group` right away. Otherwise the returned
    /// constraints gain one `owl:differentFrom` per earlier mention.
    pub fn resolve_other(
        &self,
        mut group: NominalGroup,
        speaker: &str,
        base: Vec<Statement>,
        history: &DialogueHistory,
    ) -> Result<(NominalGroup, Vec<Statement>), MatchError> {
        let model = self.config.model_for(speaker);
        let found = query::find(self.kb, model, &base);
        let mut statements = base;

        match found.len() {
            0 => {}
            1 => {
                tracing::debug!(id = %found[0], "only one concept for \"other\"");
                group.resolve(found[0].clone());
            }
            _ => {
                let mentioned = history.mentioned_groups(self.config.history_window);
                if mentioned.is_empty() {
                    return Err(MatchError::NoHistory);
                }
                let before = statements.len();
                for id in &found {
                    let earlier = mentioned
                        .iter()
                        .any(|group| group.id().is_some_and(|concept| concept.contains(id)));
                    if earlier {
                        statements.push(Statement::triple(CONCEPT, OWL_DIFFERENT_FROM, id));
                    }
                }
                if statements.len() == before {
                    tracing::debug!("no candidate for \"other\" was mentioned before");
                }
            }
        }
        Ok((group, statements))
    }

    /// Commit a concept described by `constraints` under a fresh id.
    ///
    /// Statements still holding variables other than `?concept` are
    /// dropped. The facts go to the speaker's model and, when that is not
    /// the system's own, to the system's model as well.
    pub fn learn_new_concept(&self, constraints: &[Statement], speaker: &str) -> KnowledgeResult<String> {
        let id = Ulid::new().to_string().to_lowercase();
        let statements: Vec<Statement> = constraints
            .iter()
            .map(|statement| statement.substitute(CONCEPT, &id))
            .filter(Statement::is_bound)
            .collect();

        let model = self.config.model_for(speaker);
        let mut models = vec![model.to_string()];
        if model != self.config.default_model {
            models.push(self.config.default_model.clone());
        }
        self.kb.revise(&statements, &Revision::add(models))?;

        tracing::info!(id = %id, speaker, facts = statements.len(), "learned new concept");
        Ok(id)
    }
}

/// `hasColor` → `color`, `rdf:type` → `type`.
fn feature_name(predicate: &str) -> String {
    if predicate == RDF_TYPE {
        return "type".into();
    }
    match predicate.strip_prefix("has") {
        Some(rest) if rest.starts_with(char::is_uppercase) => rest.to_lowercase(),
        _ => predicate.to_string(),
    }
}
