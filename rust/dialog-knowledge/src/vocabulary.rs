//! Predicates and classes the interpretation engine relies on.

pub const RDF_TYPE: &str = "rdf:type";
pub const RDFS_SUBCLASS_OF: &str = "rdfs:subClassOf";
pub const RDFS_LABEL: &str = "rdfs:label";
pub const OWL_DIFFERENT_FROM: &str = "owl:differentFrom";

/// `agent focusesOn concept`: what an agent currently attends to.
pub const FOCUSES_ON: &str = "focusesOn";
/// `agent sees concept`: visibility, used to prefer perceivable concepts.
pub const SEES: &str = "sees";
/// `concept belongsTo owner`: possessive noun complements.
pub const BELONGS_TO: &str = "belongsTo";
/// Fallback feature predicate for adjectives without a known category.
pub const HAS_FEATURE: &str = "hasFeature";
