//! Stable addressing of nominal groups inside a sentence tree.
//!
//! A [`GroupPath`] is the sequence of child steps from the sentence root to
//! one nominal group. Resolution never adds or removes nodes, so a path
//! taken before a clarification turn still names the same node when the
//! turn resumes. Substitution is then "replace the node at this path".
//!
//! ```text
//! Sentence ──Subject(i)──────────▶ NominalGroup
//!          ──Predicate(i)────────▶ VerbalGroup
//! VerbalGroup ──DirectObject(i)──▶ NominalGroup
//!             ──Complement(c, g)─▶ NominalGroup
//!             ──Secondary(i)─────▶ VerbalGroup
//!             ──Subordinate(i)───▶ Sentence
//! NominalGroup ──NounComplement(i)▶ NominalGroup
//!              ──Relative(i)──────▶ Sentence
//! ```

use crate::error::PathError;
use crate::nominal::NominalGroup;
use crate::sentence::Sentence;
use crate::verbal::VerbalGroup;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Subject(usize),
    Predicate(usize),
    DirectObject(usize),
    Complement { complement: usize, group: usize },
    Secondary(usize),
    Subordinate(usize),
    NounComplement(usize),
    Relative(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Subject(i) => write!(f, "subject[{i}]"),
            Step::Predicate(i) => write!(f, "predicate[{i}]"),
            Step::DirectObject(i) => write!(f, "object[{i}]"),
            Step::Complement { complement, group } => {
                write!(f, "complement[{complement}][{group}]")
            }
            Step::Secondary(i) => write!(f, "secondary[{i}]"),
            Step::Subordinate(i) => write!(f, "subordinate[{i}]"),
            Step::NounComplement(i) => write!(f, "noun_complement[{i}]"),
            Step::Relative(i) => write!(f, "relative[{i}]"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupPath(Vec<Step>);

impl GroupPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path one step deeper.
    pub fn child(&self, step: Step) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        GroupPath(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Step>> for GroupPath {
    fn from(steps: Vec<Step>) -> Self {
        GroupPath(steps)
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for step in &self.0 {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

enum Node<'a> {
    Sentence(&'a Sentence),
    Verbal(&'a VerbalGroup),
    Nominal(&'a NominalGroup),
}

enum NodeMut<'a> {
    Sentence(&'a mut Sentence),
    Verbal(&'a mut VerbalGroup),
    Nominal(&'a mut NominalGroup),
}

impl Sentence {
    /// The nominal group at `path`, if the path addresses one.
    pub fn group(&self, path: &GroupPath) -> Option<&NominalGroup> {
        let mut node = Node::Sentence(self);
        for step in path.steps() {
            node = match (node, *step) {
                (Node::Sentence(s), Step::Subject(i)) => Node::Nominal(s.subjects.get(i)?),
                (Node::Sentence(s), Step::Predicate(i)) => Node::Verbal(s.predicates.get(i)?),
                (Node::Verbal(v), Step::DirectObject(i)) => Node::Nominal(v.direct_objects.get(i)?),
                (Node::Verbal(v), Step::Complement { complement, group }) => Node::Nominal(
                    v.indirect_complements.get(complement)?.groups.get(group)?,
                ),
                (Node::Verbal(v), Step::Secondary(i)) => Node::Verbal(v.secondary_groups.get(i)?),
                (Node::Verbal(v), Step::Subordinate(i)) => {
                    Node::Sentence(v.subordinate_sentences.get(i)?)
                }
                (Node::Nominal(n), Step::NounComplement(i)) => {
                    Node::Nominal(n.noun_complements.get(i)?)
                }
                (Node::Nominal(n), Step::Relative(i)) => Node::Sentence(n.relative_clauses.get(i)?),
                _ => return None,
            };
        }
        match node {
            Node::Nominal(group) => Some(group),
            _ => None,
        }
    }

    pub fn group_mut(&mut self, path: &GroupPath) -> Option<&mut NominalGroup> {
        let mut node = NodeMut::Sentence(self);
        for step in path.steps() {
            node = match (node, *step) {
                (NodeMut::Sentence(s), Step::Subject(i)) => {
                    NodeMut::Nominal(s.subjects.get_mut(i)?)
                }
                (NodeMut::Sentence(s), Step::Predicate(i)) => {
                    NodeMut::Verbal(s.predicates.get_mut(i)?)
                }
                (NodeMut::Verbal(v), Step::DirectObject(i)) => {
                    NodeMut::Nominal(v.direct_objects.get_mut(i)?)
                }
                (NodeMut::Verbal(v), Step::Complement { complement, group }) => NodeMut::Nominal(
                    v.indirect_complements
                        .get_mut(complement)?
                        .groups
                        .get_mut(group)?,
                ),
                (NodeMut::Verbal(v), Step::Secondary(i)) => {
                    NodeMut::Verbal(v.secondary_groups.get_mut(i)?)
                }
                (NodeMut::Verbal(v), Step::Subordinate(i)) => {
                    NodeMut::Sentence(v.subordinate_sentences.get_mut(i)?)
                }
                (NodeMut::Nominal(n), Step::NounComplement(i)) => {
                    NodeMut::Nominal(n.noun_complements.get_mut(i)?)
                }
                (NodeMut::Nominal(n), Step::Relative(i)) => {
                    NodeMut::Sentence(n.relative_clauses.get_mut(i)?)
                }
                _ => return None,
            };
        }
        match node {
            NodeMut::Nominal(group) => Some(group),
            _ => None,
        }
    }

    /// Swap the group at `path` for `replacement`, returning the old one.
    pub fn replace_group(
        &mut self,
        path: &GroupPath,
        replacement: NominalGroup,
    ) -> Result<NominalGroup, PathError> {
        if path.is_root() {
            return Err(PathError::Empty);
        }
        let slot = self
            .group_mut(path)
            .ok_or_else(|| PathError::Missing { path: path.clone() })?;
        Ok(std::mem::replace(slot, replacement))
    }

    /// Every nominal group of the tree, in pre-order.
    ///
    /// The order is stable for a given tree shape: subjects first, then each
    /// predicate's direct objects, indirect complements, secondary groups and
    /// subordinate sentences. A group's own complements and relative clauses
    /// follow the group itself.
    pub fn group_paths(&self) -> Vec<GroupPath> {
        let mut paths = Vec::new();
        collect_sentence(self, &GroupPath::root(), &mut paths);
        paths
    }

    /// The first path whose group is structurally equal to `target`.
    pub fn find_group(&self, target: &NominalGroup) -> Option<GroupPath> {
        self.group_paths()
            .into_iter()
            .find(|path| self.group(path) == Some(target))
    }
}

fn collect_sentence(sentence: &Sentence, at: &GroupPath, paths: &mut Vec<GroupPath>) {
    for (i, subject) in sentence.subjects.iter().enumerate() {
        collect_nominal(subject, &at.child(Step::Subject(i)), paths);
    }
    for (i, predicate) in sentence.predicates.iter().enumerate() {
        collect_verbal(predicate, &at.child(Step::Predicate(i)), paths);
    }
}

fn collect_verbal(group: &VerbalGroup, at: &GroupPath, paths: &mut Vec<GroupPath>) {
    for (i, object) in group.direct_objects.iter().enumerate() {
        collect_nominal(object, &at.child(Step::DirectObject(i)), paths);
    }
    for (c, complement) in group.indirect_complements.iter().enumerate() {
        for (g, nominal) in complement.groups.iter().enumerate() {
            let step = Step::Complement {
                complement: c,
                group: g,
            };
            collect_nominal(nominal, &at.child(step), paths);
        }
    }
    for (i, secondary) in group.secondary_groups.iter().enumerate() {
        collect_verbal(secondary, &at.child(Step::Secondary(i)), paths);
    }
    for (i, subordinate) in group.subordinate_sentences.iter().enumerate() {
        collect_sentence(subordinate, &at.child(Step::Subordinate(i)), paths);
    }
}

fn collect_nominal(group: &NominalGroup, at: &GroupPath, paths: &mut Vec<GroupPath>) {
    paths.push(at.clone());
    for (i, complement) in group.noun_complements.iter().enumerate() {
        collect_nominal(complement, &at.child(Step::NounComplement(i)), paths);
    }
    for (i, relative) in group.relative_clauses.iter().enumerate() {
        collect_sentence(relative, &at.child(Step::Relative(i)), paths);
    }
}
