//! The resolution pipeline.
//!
//! A turn runs three passes over the sentence tree, each visiting every
//! node once:
//!
//! ```text
//! resolve_references   verbs' arguments before subjects; pronouns, "this",
//!                      "it"/"one", quantified groups
//! resolve_noun_phrases descriptions ("the red cup") through discrimination
//! resolve_verbs        modal split, state/goal verbs, thematic synonyms
//! ```
//!
//! Whenever a group cannot be grounded the pass stops with a
//! [`Clarification`]. Groups grounded so far stay grounded, so once the
//! user answers, [`Resolver::resume`] simply runs the passes again with the
//! answer applied; already resolved nodes are left untouched.

use crate::anaphora::AnaphoraMatcher;
use crate::config::InterpretationConfig;
use crate::discrimination::{ConceptDescription, Discriminator};
use crate::error::{AmbiguityError, Clarification, InterpretationError, InterpretationResult, MatchError, UnknownVerb};
use crate::factory::{EnglishSentenceFactory, SentenceFactory};
use crate::focus::FocusTracker;
use crate::history::DialogueHistory;
use crate::query::{self, CONCEPT};
use crate::statements::StatementBuilder;
use dialog_knowledge::vocabulary::{FOCUSES_ON, RDF_TYPE, SEES};
use dialog_knowledge::{KnowledgeBase, Statement};
use dialog_sentence::{
    ConceptRef, GroupPath, NominalGroup, Quantifier, Sentence, SentenceKind, Step, VerbalGroup,
};
use serde::{Deserialize, Serialize};

/// The user's reply to a clarification question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    /// "Yes": the candidate asked about is the right one.
    Confirm,
    /// "No": try the next candidate.
    Reject,
    /// A better description of the object ("the blue one on the table").
    Describe(NominalGroup),
}

/// A nominal group to put at `path` in place of the one there.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub path: GroupPath,
    pub group: NominalGroup,
}

impl Substitution {
    pub fn new(path: GroupPath, group: NominalGroup) -> Self {
        Substitution { path, group }
    }

    /// Build a substitution for the first group of `sentence` equal to
    /// `previous`.
    pub fn locate(sentence: &Sentence, previous: &NominalGroup, group: NominalGroup) -> Option<Self> {
        sentence
            .find_group(previous)
            .map(|path| Substitution { path, group })
    }
}

/// Grounds sentences against a knowledge base.
///
/// Holds the read-only configuration, the KB handle, the question factory
/// and the focus tracker, which is the only state shared across turns.
pub struct Resolver<K, F = EnglishSentenceFactory> {
    kb: K,
    factory: F,
    config: InterpretationConfig,
    focus: FocusTracker,
}

impl<K: KnowledgeBase> Resolver<K> {
    pub fn new(kb: K, config: InterpretationConfig) -> Self {
        Self::with_factory(kb, EnglishSentenceFactory, config)
    }
}

impl<K: KnowledgeBase, F: SentenceFactory> Resolver<K, F> {
    pub fn with_factory(kb: K, factory: F, config: InterpretationConfig) -> Self {
        Resolver {
            focus: FocusTracker::new(config.focus_capacity),
            kb,
            factory,
            config,
        }
    }

    pub fn kb(&self) -> &K {
        &self.kb
    }

    pub fn config(&self) -> &InterpretationConfig {
        &self.config
    }

    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Ground pronouns, demonstratives, anaphors and quantified groups.
    ///
    /// `current_object` is an antecedent the user already confirmed; the
    /// first anaphor of the sentence takes it instead of searching history.
    #[tracing::instrument(skip(self, sentence, history, current_object))]
    pub fn resolve_references(
        &self,
        sentence: &mut Sentence,
        speaker: &str,
        history: &DialogueHistory,
        current_object: Option<NominalGroup>,
    ) -> InterpretationResult<()> {
        if !sentence.is_resolvable() {
            return Ok(());
        }
        let mut turn = Turn::new(self, sentence, speaker, history, current_object);
        turn.sentence_references(sentence, &GroupPath::root())
    }

    /// Ground descriptive noun phrases by discrimination.
    ///
    /// With `clarified`, only put the better description in place; the
    /// next pass grounds it.
    #[tracing::instrument(skip(self, sentence, history, clarified))]
    pub fn resolve_noun_phrases(
        &self,
        sentence: &mut Sentence,
        speaker: &str,
        history: &DialogueHistory,
        clarified: Option<Substitution>,
    ) -> InterpretationResult<()> {
        if !sentence.is_resolvable() {
            return Ok(());
        }
        if let Some(substitution) = clarified {
            tracing::debug!(path = %substitution.path, group = %substitution.group, "substituting clarified group");
            sentence.replace_group(&substitution.path, substitution.group)?;
            return Ok(());
        }
        let mut turn = Turn::new(self, sentence, speaker, history, None);
        turn.sentence_nouns(sentence, &GroupPath::root())
    }

    /// Canonicalize every verb; returns the verbs kept as they were.
    pub fn resolve_verbs(&self, sentence: &mut Sentence) -> InterpretationResult<Vec<UnknownVerb>> {
        let mut unknown = Vec::new();
        if sentence.is_resolvable() {
            self.sentence_verbs(sentence, &GroupPath::root(), &mut unknown)?;
        }
        Ok(unknown)
    }

    /// Run all three passes.
    pub fn interpret(
        &self,
        sentence: &mut Sentence,
        speaker: &str,
        history: &DialogueHistory,
    ) -> InterpretationResult<Vec<UnknownVerb>> {
        self.resolve_references(sentence, speaker, history, None)?;
        self.resolve_noun_phrases(sentence, speaker, history, None)?;
        self.resolve_verbs(sentence)
    }

    /// Continue a turn suspended on `clarification` with the user's
    /// `answer`.
    ///
    /// Rejecting an ambiguous anaphor asks about the next candidate, and
    /// reports no match once the candidates run out.
    #[tracing::instrument(skip(self, sentence, clarification, history))]
    pub fn resume(
        &self,
        sentence: &mut Sentence,
        speaker: &str,
        clarification: &Clarification,
        answer: Answer,
        history: &DialogueHistory,
    ) -> InterpretationResult<Vec<UnknownVerb>> {
        match (clarification, answer) {
            (Clarification::AmbiguousAnaphor { top, .. }, Answer::Confirm) => {
                self.resolve_references(sentence, speaker, history, Some(top.clone()))?;
                self.resolve_noun_phrases(sentence, speaker, history, None)?;
                self.resolve_verbs(sentence)
            }
            (
                Clarification::AmbiguousAnaphor {
                    object,
                    top,
                    candidates,
                    path,
                    ..
                },
                Answer::Reject,
            ) => {
                let remaining: Vec<NominalGroup> = candidates
                    .iter()
                    .filter(|candidate| candidate.id() != top.id())
                    .cloned()
                    .collect();
                let next = match remaining.first() {
                    Some(next) => Clarification::AmbiguousAnaphor {
                        object: object.clone(),
                        top: next.clone(),
                        question: self.factory.do_you_mean(next),
                        candidates: remaining.clone(),
                        path: path.clone(),
                    },
                    None => Clarification::NoAnaphoricMatch {
                        object: object.clone(),
                        question: self.factory.what_do_you_mean(object),
                        path: path.clone(),
                    },
                };
                Err(next.into())
            }
            (Clarification::InsufficientDescription { path, .. }, Answer::Describe(group)) => {
                let substitution = Substitution::new(path.clone(), group);
                self.resolve_noun_phrases(sentence, speaker, history, Some(substitution))?;
                self.interpret(sentence, speaker, history)
            }
            (clarification, Answer::Describe(group)) => {
                sentence.replace_group(clarification.path(), group)?;
                self.interpret(sentence, speaker, history)
            }
            (clarification, _) => Err(InterpretationError::UnexpectedAnswer {
                clarification: clarification.clone(),
            }),
        }
    }

    fn sentence_verbs(
        &self,
        sentence: &mut Sentence,
        at: &GroupPath,
        unknown: &mut Vec<UnknownVerb>,
    ) -> InterpretationResult<()> {
        guard(&self.config, at)?;
        for (i, predicate) in sentence.predicates.iter_mut().enumerate() {
            self.verbal_verbs(predicate, &at.child(Step::Predicate(i)), unknown)?;
        }
        Ok(())
    }

    fn verbal_verbs(
        &self,
        group: &mut VerbalGroup,
        at: &GroupPath,
        unknown: &mut Vec<UnknownVerb>,
    ) -> InterpretationResult<()> {
        guard(&self.config, at)?;
        if group.is_resolved() {
            return Ok(());
        }

        group.main_verbs = group
            .main_verbs
            .iter()
            .map(|verb| self.canonical_verb(verb, unknown))
            .collect();
        for (i, secondary) in group.secondary_groups.iter_mut().enumerate() {
            self.verbal_verbs(secondary, &at.child(Step::Secondary(i)), unknown)?;
        }
        for (i, subordinate) in group.subordinate_sentences.iter_mut().enumerate() {
            self.sentence_verbs(subordinate, &at.child(Step::Subordinate(i)), unknown)?;
        }
        group.mark_resolved();
        Ok(())
    }

    /// `must+grab` → `must+take`, `pick+up` → `take`, `is` → `be`.
    fn canonical_verb(&self, verb: &str, unknown: &mut Vec<UnknownVerb>) -> String {
        let lexicon = &self.config.lexicon;
        let parts: Vec<&str> = verb.split('+').filter(|part| !part.is_empty()).collect();
        let (modal, base) = match parts.split_first() {
            Some((first, rest)) if !rest.is_empty() && lexicon.is_modal(first) => {
                (Some(*first), rest.concat())
            }
            _ => (None, parts.concat()),
        };

        let canonical = if lexicon.is_state_verb(&base) {
            "be".to_string()
        } else if lexicon.is_goal_verb(&base) {
            base
        } else if let Some(thematic) = lexicon.thematic_verb(&base) {
            thematic.to_string()
        } else {
            tracing::debug!(verb = %base, "unknown verb kept as is");
            unknown.push(UnknownVerb { verb: base.clone() });
            base
        };

        match modal {
            Some(modal) => format!("{modal}+{canonical}"),
            None => canonical,
        }
    }
}

fn guard(config: &InterpretationConfig, at: &GroupPath) -> InterpretationResult<()> {
    if at.depth() > config.max_depth {
        Err(InterpretationError::NestingTooDeep {
            limit: config.max_depth,
            path: at.clone(),
        })
    } else {
        Ok(())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Per-call state of one resolution pass.
///
/// Learning and question handling follow the top-level sentence even while
/// walking its subordinate clauses.
struct Turn<'r, K, F> {
    resolver: &'r Resolver<K, F>,
    speaker: &'r str,
    model: &'r str,
    history: &'r DialogueHistory,
    kind: SentenceKind,
    aim: String,
    learning: bool,
    current_object: Option<NominalGroup>,
}

impl<'r, K: KnowledgeBase, F: SentenceFactory> Turn<'r, K, F> {
    fn new(
        resolver: &'r Resolver<K, F>,
        sentence: &Sentence,
        speaker: &'r str,
        history: &'r DialogueHistory,
        current_object: Option<NominalGroup>,
    ) -> Self {
        Turn {
            resolver,
            speaker,
            model: resolver.config.model_for(speaker),
            history,
            kind: sentence.kind,
            aim: sentence.aim.clone(),
            learning: sentence.is_learning(&resolver.config.lexicon.learning_verbs),
            current_object,
        }
    }

    fn adopt(&self, group: &mut NominalGroup, id: impl Into<ConceptRef>) {
        group.resolve(id);
        if let Some(concept) = group.id() {
            self.resolver.focus.mark_all(concept);
        }
    }

    // Reference pass.

    fn sentence_references(&mut self, sentence: &mut Sentence, at: &GroupPath) -> InterpretationResult<()> {
        guard(&self.resolver.config, at)?;
        // The verb helps to read the subject: "the girls are human" vs
        // "the girls are playing".
        let verb = sentence.first_verb().map(str::to_string);
        for (i, predicate) in sentence.predicates.iter_mut().enumerate() {
            self.verbal_references(predicate, &at.child(Step::Predicate(i)))?;
        }
        for (i, subject) in sentence.subjects.iter_mut().enumerate() {
            self.nominal_references(subject, verb.as_deref(), &at.child(Step::Subject(i)))?;
        }
        Ok(())
    }

    fn verbal_references(&mut self, group: &mut VerbalGroup, at: &GroupPath) -> InterpretationResult<()> {
        guard(&self.resolver.config, at)?;
        let verb = group.main_verb().map(str::to_string);
        for (i, object) in group.direct_objects.iter_mut().enumerate() {
            self.nominal_references(object, verb.as_deref(), &at.child(Step::DirectObject(i)))?;
        }
        for (c, complement) in group.indirect_complements.iter_mut().enumerate() {
            for (g, nominal) in complement.groups.iter_mut().enumerate() {
                let step = Step::Complement {
                    complement: c,
                    group: g,
                };
                self.nominal_references(nominal, verb.as_deref(), &at.child(step))?;
            }
        }
        for (i, secondary) in group.secondary_groups.iter_mut().enumerate() {
            self.verbal_references(secondary, &at.child(Step::Secondary(i)))?;
        }
        for (i, subordinate) in group.subordinate_sentences.iter_mut().enumerate() {
            self.sentence_references(subordinate, &at.child(Step::Subordinate(i)))?;
        }
        Ok(())
    }

    fn nominal_references(
        &mut self,
        group: &mut NominalGroup,
        verb: Option<&str>,
        at: &GroupPath,
    ) -> InterpretationResult<()> {
        guard(&self.resolver.config, at)?;
        if self.learning {
            for (i, complement) in group.noun_complements.iter_mut().enumerate() {
                self.nominal_references(complement, verb, &at.child(Step::NounComplement(i)))?;
            }
        }
        self.resolve_reference(group, verb, at)
    }

    fn resolve_reference(
        &mut self,
        group: &mut NominalGroup,
        verb: Option<&str>,
        at: &GroupPath,
    ) -> InterpretationResult<()> {
        if group.is_resolved() {
            return Ok(());
        }
        let resolver: &'r Resolver<K, F> = self.resolver;
        let lexicon = &resolver.config.lexicon;

        if group.is_adjective_only() {
            if let Some(adjective) = group.first_adjective().map(str::to_string) {
                group.resolve(adjective);
            }
            return Ok(());
        }

        if self.is_demonstrative(group) && self.demonstrative(group, at)? {
            return Ok(());
        }

        let Some(noun) = group.head_noun().map(str::to_string) else {
            return Ok(());
        };

        if lexicon.is_first_person(&noun) {
            tracing::debug!(pronoun = %noun, speaker = self.speaker, "first person resolved to speaker");
            self.adopt(group, self.speaker);
            return Ok(());
        }
        if lexicon.is_second_person(&noun) {
            tracing::debug!(pronoun = %noun, "second person resolved to self");
            self.adopt(group, resolver.config.self_id.as_str());
            return Ok(());
        }

        if let Some(id) = query::instance_named(&resolver.kb, self.model, &noun) {
            tracing::debug!(noun = %noun, id = %id, "known instance");
            self.adopt(group, id);
            return Ok(());
        }

        if lexicon.is_anaphor(&noun) {
            // "the other one" is settled by discrimination.
            if group.has_adjective("other") {
                return Ok(());
            }
            return self.anaphora(group, at);
        }

        if matches!(group.quantifier, Quantifier::Some | Quantifier::All) {
            return self.quantified(group, &noun, verb, at);
        }
        Ok(())
    }

    fn is_demonstrative(&self, group: &NominalGroup) -> bool {
        let lexicon = &self.resolver.config.lexicon;
        match group.first_determiner() {
            Some(determiner) => lexicon.is_demonstrative(determiner),
            None => group.head_noun().is_some_and(|noun| lexicon.is_demonstrative(noun)),
        }
    }

    /// "this", "that one", "this bottle": what the speaker focuses on.
    ///
    /// Returns `false` when a demonstrative with a real noun found nothing
    /// in focus; the group is then read like "the <noun>".
    fn demonstrative(&mut self, group: &mut NominalGroup, at: &GroupPath) -> InterpretationResult<bool> {
        let resolver: &'r Resolver<K, F> = self.resolver;
        let lexicon = &resolver.config.lexicon;
        let noun = group
            .head_noun()
            .filter(|noun| !lexicon.is_pronoun(noun))
            .map(str::to_string);

        let focus = Statement::triple(self.speaker, FOCUSES_ON, CONCEPT);
        let mut hits = Vec::new();
        if let Some(noun) = &noun {
            let class = query::class_of(&resolver.kb, self.model, noun);
            hits = query::find(
                &resolver.kb,
                self.model,
                &[focus.clone(), Statement::triple(CONCEPT, RDF_TYPE, &class)],
            );
        }
        if hits.is_empty() {
            hits = query::find(&resolver.kb, self.model, &[focus]);
        }

        let chosen = resolver
            .focus
            .most_recent_of(&hits)
            .or_else(|| hits.first().cloned());
        if let Some(id) = chosen {
            tracing::debug!(id = %id, hits = hits.len(), "demonstrative resolved through focus");
            self.adopt(group, id);
            return Ok(true);
        }

        if noun.is_some() {
            return Ok(false);
        }
        self.anaphora(group, at)?;
        Ok(true)
    }

    fn anaphora(&mut self, group: &mut NominalGroup, at: &GroupPath) -> InterpretationResult<()> {
        if let Some(current) = self.current_object.take() {
            if let Some(id) = current.id().cloned() {
                tracing::debug!(id = %id, "anaphor takes the confirmed antecedent");
                self.adopt(group, id);
                return Ok(());
            }
        }

        let resolver: &'r Resolver<K, F> = self.resolver;
        let window = self.history.recent(resolver.config.history_window);
        let matcher = AnaphoraMatcher::new(&resolver.config.lexicon);
        match matcher.match_first_candidate(window, group) {
            Ok(antecedent) => {
                if let Some(id) = antecedent.id().cloned() {
                    tracing::debug!(anaphor = %group, id = %id, "anaphora matched");
                    self.adopt(group, id);
                }
                Ok(())
            }
            Err(MatchError::NoHistory) => Err(Clarification::EmptyHistory {
                object: group.clone(),
                question: resolver.factory.what_do_you_mean(group),
                path: at.clone(),
            }
            .into()),
            Err(MatchError::NoMatch) => Err(Clarification::NoAnaphoricMatch {
                object: group.clone(),
                question: resolver.factory.what_do_you_mean(group),
                path: at.clone(),
            }
            .into()),
            Err(MatchError::Ambiguous { top, all }) => {
                tracing::debug!(anaphor = %group, candidates = all.len(), "ambiguous anaphor");
                Err(Clarification::AmbiguousAnaphor {
                    object: group.clone(),
                    question: resolver.factory.do_you_mean(&top),
                    top,
                    candidates: all,
                    path: at.clone(),
                }
                .into())
            }
        }
    }

    /// SOME/ALL groups.
    ///
    /// Under a state verb a non-universal group names its class ("apples
    /// are fruits"). Otherwise SOME waits for discrimination, while ALL
    /// (and "everything"/"anything") enumerates the class instances.
    fn quantified(
        &mut self,
        group: &mut NominalGroup,
        noun: &str,
        verb: Option<&str>,
        at: &GroupPath,
    ) -> InterpretationResult<()> {
        let resolver: &'r Resolver<K, F> = self.resolver;
        let lexicon = &resolver.config.lexicon;
        let universal = lexicon.is_universal(noun);
        let copular = verb.is_some_and(|verb| lexicon.is_state_verb(verb.rsplit('+').next().unwrap_or(verb)));

        if copular && !universal {
            let class = query::class_of(&resolver.kb, self.model, noun);
            tracing::debug!(noun, class = %class, "quantified group under a state verb names its class");
            self.adopt(group, class);
            return Ok(());
        }
        if group.quantifier == Quantifier::Some && !universal {
            tracing::trace!(noun, "indefinite group deferred to discrimination");
            return Ok(());
        }

        let class = if universal {
            lexicon.universal_class.clone()
        } else {
            query::class_of(&resolver.kb, self.model, noun)
        };
        let instances = query::find(
            &resolver.kb,
            self.model,
            &[Statement::triple(CONCEPT, RDF_TYPE, &class)],
        );
        tracing::debug!(class = %class, count = instances.len(), "instances of quantified group");

        if instances.is_empty() {
            return Err(Clarification::NoInstanceOfClass {
                object: group.clone(),
                question: resolver.factory.no_instance_of(group),
                path: at.clone(),
            }
            .into());
        }
        self.adopt(group, ConceptRef::from(instances));
        Ok(())
    }

    // Noun phrase pass.

    fn sentence_nouns(&mut self, sentence: &mut Sentence, at: &GroupPath) -> InterpretationResult<()> {
        guard(&self.resolver.config, at)?;
        for (i, subject) in sentence.subjects.iter_mut().enumerate() {
            self.nominal_nouns(subject, &at.child(Step::Subject(i)))?;
        }
        for (i, predicate) in sentence.predicates.iter_mut().enumerate() {
            self.verbal_nouns(predicate, &at.child(Step::Predicate(i)))?;
        }
        Ok(())
    }

    fn verbal_nouns(&mut self, group: &mut VerbalGroup, at: &GroupPath) -> InterpretationResult<()> {
        guard(&self.resolver.config, at)?;
        for (i, object) in group.direct_objects.iter_mut().enumerate() {
            self.nominal_nouns(object, &at.child(Step::DirectObject(i)))?;
        }
        for (c, complement) in group.indirect_complements.iter_mut().enumerate() {
            for (g, nominal) in complement.groups.iter_mut().enumerate() {
                let step = Step::Complement {
                    complement: c,
                    group: g,
                };
                self.nominal_nouns(nominal, &at.child(step))?;
            }
        }
        for (i, secondary) in group.secondary_groups.iter_mut().enumerate() {
            self.verbal_nouns(secondary, &at.child(Step::Secondary(i)))?;
        }
        for (i, subordinate) in group.subordinate_sentences.iter_mut().enumerate() {
            self.sentence_nouns(subordinate, &at.child(Step::Subordinate(i)))?;
        }
        Ok(())
    }

    fn nominal_nouns(&mut self, group: &mut NominalGroup, at: &GroupPath) -> InterpretationResult<()> {
        guard(&self.resolver.config, at)?;
        if self.learning {
            for (i, complement) in group.noun_complements.iter_mut().enumerate() {
                self.nominal_nouns(complement, &at.child(Step::NounComplement(i)))?;
            }
        }
        self.resolve_noun(group, at)
    }

    fn resolve_noun(&mut self, group: &mut NominalGroup, at: &GroupPath) -> InterpretationResult<()> {
        if group.is_resolved() || group.nouns.is_empty() {
            return Ok(());
        }
        let resolver: &'r Resolver<K, F> = self.resolver;
        let config = &resolver.config;
        let discriminator = Discriminator::new(&resolver.kb, config);

        let description = StatementBuilder::new(&resolver.kb, config, self.speaker).describe(group, CONCEPT);
        let mut statements = description.statements;
        tracing::debug!(
            group = %group,
            model = self.model,
            query = %statements.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            "discriminating noun phrase"
        );

        if description.process_other {
            if let Some(class) = self.class_of_anaphor(group) {
                statements.insert(0, Statement::triple(CONCEPT, RDF_TYPE, &class));
            }
            match discriminator.resolve_other(group.clone(), self.speaker, statements, self.history) {
                Ok((other, narrowed)) => {
                    if let Some(id) = other.id().cloned() {
                        self.adopt(group, id);
                        return Ok(());
                    }
                    statements = narrowed;
                }
                Err(_) => {
                    return Err(Clarification::EmptyHistory {
                        object: group.clone(),
                        question: resolver.factory.what_do_you_mean(group),
                        path: at.clone(),
                    }
                    .into());
                }
            }
        }

        let id = if group.quantifier == Quantifier::Some {
            self.pick_some(group, &statements, at)?
        } else {
            let descriptions = [ConceptDescription::new(self.speaker, statements.clone())];
            match discriminator.clarify(&descriptions, &self.ignored_features()) {
                Ok(id) => id,
                Err(error) if self.learning => {
                    tracing::debug!(%error, "unknown concept in a learning statement");
                    discriminator.learn_new_concept(&statements, self.speaker)?
                }
                Err(AmbiguityError::NoMatch) => {
                    return Err(self.insufficient(group, resolver.factory.what_do_you_mean(group), at));
                }
                Err(AmbiguityError::StillAmbiguous { discriminant, .. }) => {
                    let question = match discriminant {
                        Some(discriminant) => {
                            resolver
                                .factory
                                .which_choice(group, &discriminant.feature, &discriminant.values)
                        }
                        None => resolver.factory.what_do_you_mean(group),
                    };
                    return Err(self.insufficient(group, question, at));
                }
            }
        };

        tracing::debug!(group = %group, id = %id, "noun phrase resolved");
        self.adopt(group, id);
        Ok(())
    }

    /// "the other one" says nothing about its type; it borrows the class
    /// of the latest mention with a real noun.
    fn class_of_anaphor(&self, group: &NominalGroup) -> Option<String> {
        let resolver: &'r Resolver<K, F> = self.resolver;
        let lexicon = &resolver.config.lexicon;
        if !group.head_noun().is_some_and(|noun| lexicon.is_anaphor(noun)) {
            return None;
        }
        let noun = self
            .history
            .mentioned_groups(resolver.config.history_window)
            .into_iter()
            .filter_map(NominalGroup::head_noun)
            .find(|noun| !lexicon.is_pronoun(noun) && !lexicon.is_universal(noun))?;
        let class = query::class_of(&resolver.kb, self.model, noun);
        tracing::debug!(noun, class = %class, "\"other\" takes the class of the latest mention");
        Some(class)
    }

    /// An indefinite group ("a cup") takes any matching concept, preferably
    /// one the speaker sees. The first in KB order wins.
    fn pick_some(&self, group: &NominalGroup, statements: &[Statement], at: &GroupPath) -> InterpretationResult<String> {
        let resolver: &'r Resolver<K, F> = self.resolver;
        let mut visible = statements.to_vec();
        visible.push(Statement::triple(self.speaker, SEES, CONCEPT));

        let mut concepts = query::find(&resolver.kb, self.model, &visible);
        if concepts.is_empty() {
            tracing::debug!("no visible concept, dropping the visibility constraint");
            concepts = query::find(&resolver.kb, self.model, statements);
        }
        concepts
            .into_iter()
            .next()
            .ok_or_else(|| self.insufficient(group, resolver.factory.what_do_you_mean(group), at))
    }

    fn insufficient(&self, group: &NominalGroup, question: Vec<Sentence>, at: &GroupPath) -> InterpretationError {
        Clarification::InsufficientDescription {
            object: group.clone(),
            question,
            path: at.clone(),
        }
        .into()
    }

    /// Features discrimination must not ask about: the one a question is
    /// asking for, or the type for other questions.
    fn ignored_features(&self) -> Vec<String> {
        if !self.kind.is_question() {
            return Vec::new();
        }
        if self.resolver.config.lexicon.is_feature_aim(&self.aim) {
            vec![format!("has{}", capitalize(&self.aim))]
        } else {
            vec![RDF_TYPE.to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialog_knowledge::MemoryKnowledgeBase;
    use pretty_assertions::assert_eq;

    fn resolver() -> Resolver<MemoryKnowledgeBase> {
        let kb = MemoryKnowledgeBase::new().with_model("human");
        Resolver::new(kb, InterpretationConfig::default())
    }

    #[test]
    fn verbs_are_canonicalized() {
        let resolver = resolver();
        let mut sentence = Sentence::imperative().with_predicate(
            VerbalGroup::new("must+grab")
                .with_secondary(VerbalGroup::new("pick+up"))
                .with_secondary(VerbalGroup::new("juggle")),
        );
        sentence.predicates.push(VerbalGroup::new("seem"));
        sentence.predicates.push(VerbalGroup::new("is"));
        sentence.predicates.push(VerbalGroup::new("can+are"));

        let unknown = resolver.resolve_verbs(&mut sentence).unwrap();

        assert_eq!(sentence.predicates[0].main_verbs, vec!["must+take"]);
        assert_eq!(sentence.predicates[0].secondary_groups[0].main_verbs, vec!["take"]);
        assert_eq!(sentence.predicates[0].secondary_groups[1].main_verbs, vec!["juggle"]);
        assert_eq!(sentence.predicates[1].main_verbs, vec!["be"]);
        assert_eq!(sentence.predicates[2].main_verbs, vec!["be"]);
        assert_eq!(sentence.predicates[3].main_verbs, vec!["can+be"]);
        assert_eq!(
            unknown,
            vec![UnknownVerb {
                verb: "juggle".into()
            }]
        );
        assert!(sentence.predicates[0].is_resolved());
    }

    #[test]
    fn goal_verbs_pass_through() {
        let resolver = resolver();
        let mut sentence = Sentence::statement().with_predicate(VerbalGroup::new("want"));
        assert!(resolver.resolve_verbs(&mut sentence).unwrap().is_empty());
        assert_eq!(sentence.predicates[0].main_verbs, vec!["want"]);
    }

    #[test]
    fn non_resolvable_sentences_are_untouched() {
        let resolver = resolver();
        let mut sentence = Sentence::new(SentenceKind::Gratulation)
            .with_subject(NominalGroup::pronoun("it"))
            .with_predicate(VerbalGroup::new("grab"));
        let before = sentence.clone();

        let unknown = resolver
            .interpret(&mut sentence, "human", &DialogueHistory::new())
            .unwrap();
        assert!(unknown.is_empty());
        assert_eq!(sentence, before);
    }

    #[test]
    fn adjective_only_groups_name_themselves() {
        let resolver = resolver();
        let mut sentence = Sentence::statement()
            .with_subject(NominalGroup::pronoun("it").resolved_as("banana_1"))
            .with_predicate(VerbalGroup::new("be").with_object(NominalGroup::new().with_adjective("big")));

        resolver
            .resolve_references(&mut sentence, "human", &DialogueHistory::new(), None)
            .unwrap();
        assert_eq!(
            sentence.predicates[0].direct_objects[0].id(),
            Some(&ConceptRef::from("big"))
        );
    }

    #[test]
    fn nesting_beyond_the_limit_is_rejected() {
        let mut config = InterpretationConfig::default();
        config.max_depth = 3;
        let resolver = Resolver::new(MemoryKnowledgeBase::new(), config);

        let mut sentence = Sentence::statement().with_predicate(VerbalGroup::new("know"));
        for _ in 0..3 {
            sentence = Sentence::statement().with_predicate(VerbalGroup::new("say").with_subordinate(sentence));
        }

        let error = resolver.resolve_verbs(&mut sentence).unwrap_err();
        assert!(matches!(error, InterpretationError::NestingTooDeep { limit: 3, .. }));
    }

    #[test]
    fn question_aims_select_ignored_features() {
        let resolver = resolver();
        let history = DialogueHistory::new();
        let color = Sentence::new(SentenceKind::WQuestion).with_aim("color");
        let place = Sentence::new(SentenceKind::WQuestion).with_aim("place");

        assert_eq!(
            Turn::new(&resolver, &color, "human", &history, None).ignored_features(),
            vec!["hasColor"]
        );
        assert_eq!(
            Turn::new(&resolver, &place, "human", &history, None).ignored_features(),
            vec!["rdf:type"]
        );
        assert!(
            Turn::new(&resolver, &Sentence::statement(), "human", &history, None)
                .ignored_features()
                .is_empty()
        );
    }
}
