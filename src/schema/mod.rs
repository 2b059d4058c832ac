//! Schema discovery: classes, applicable properties, and value kinds.
//!
//! A [`SchemaIndex`] is a snapshot of the schema-relevant triples
//! (`rdf:type`, `rdfs:subClassOf`, `rdfs:domain`, `rdfs:range`,
//! `rdfs:label`). It can be built from a store or from any synthetic triple
//! set, and answers every discovery question without touching the store
//! again.

pub mod classify;
pub mod hierarchy;

use std::collections::{HashMap, HashSet};

use oxigraph::model::{Literal, NamedNode, Term};
use serde::Serialize;

use crate::error::QueryError;
use crate::graph::{GraphStore, SparqlQuery, Triple};
use crate::label::{fallback_label, LabelPolicy};
use crate::vocab;

pub use classify::{classify, PropertyKind, ValueKind};
pub use hierarchy::ClassHierarchy;

/// Predicates read into a [`SchemaIndex`].
pub const SCHEMA_PREDICATES: [oxigraph::model::NamedNodeRef<'static>; 5] = [
    vocab::TYPE,
    vocab::SUB_CLASS_OF,
    vocab::DOMAIN,
    vocab::RANGE,
    vocab::LABEL,
];

/// Named classes inside `owl:unionOf` domains and ranges, as
/// `(property, rdfs:domain | rdfs:range, member)`.
const UNION_MEMBERS: &str = "SELECT ?s ?p ?o WHERE { \
    VALUES ?p { rdfs:domain rdfs:range } \
    ?s ?p ?list . FILTER(isIRI(?s) && isBlank(?list)) \
    ?list owl:unionOf/rdf:rest*/rdf:first ?o . FILTER(isIRI(?o)) }";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A class offered as a subject type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntry {
    pub iri: String,
    pub label: String,
}

/// A property applicable to a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEntry {
    pub iri: String,
    pub label: String,
    pub range: Option<String>,
    pub value_kind: ValueKind,
}

/// Outcome of a discovery query.
///
/// Query failures never reach the caller as errors; they arrive as
/// `Degraded` so the form can still render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Listing<T> {
    Complete { items: Vec<T> },
    Degraded { reason: String },
}

impl<T> Listing<T> {
    /// Wrap a query result, logging the failure if there is one.
    pub fn from_result(operation: &str, result: Result<Vec<T>, QueryError>) -> Self {
        match result {
            Ok(items) => Listing::Complete { items },
            Err(e) => {
                tracing::warn!(operation, "discovery query degraded to empty result: {e}");
                Listing::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// The items, empty when degraded.
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Complete { items } => items,
            Listing::Degraded { .. } => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Complete { items } => items,
            Listing::Degraded { .. } => Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Listing::Degraded { .. })
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Schema index
// ---------------------------------------------------------------------------

/// What the schema says about one property.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropertyDecl {
    /// Typed as one of the property classes.
    pub declared: bool,
    /// Any `rdfs:domain` triple, including blank-node domains.
    pub has_domain: bool,
    pub kind: Option<PropertyKind>,
    pub domains: Vec<String>,
    pub ranges: Vec<String>,
}

impl PropertyDecl {
    fn kind(&self) -> PropertyKind {
        self.kind.unwrap_or(PropertyKind::Unknown)
    }
}

/// In-memory view of the schema portion of a graph.
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    policy: LabelPolicy,
    classes: HashSet<String>,
    pub(crate) properties: HashMap<String, PropertyDecl>,
    hierarchy: ClassHierarchy,
    labels: HashMap<String, Vec<Literal>>,
    /// Every `(subject, type)` pair with an IRI type.
    pub(crate) typings: Vec<(String, String)>,
    /// Subjects typed `owl:Ontology`.
    pub(crate) ontology_headers: HashSet<String>,
    /// Subjects typed `rdfs:Datatype`.
    pub(crate) datatypes: HashSet<String>,
}

impl SchemaIndex {
    /// Build an index from an arbitrary set of triples.
    pub fn from_triples<'a>(
        triples: impl IntoIterator<Item = &'a Triple>,
        policy: LabelPolicy,
    ) -> Self {
        let mut index = Self {
            policy,
            classes: HashSet::new(),
            properties: HashMap::new(),
            hierarchy: ClassHierarchy::new(),
            labels: HashMap::new(),
            typings: Vec::new(),
            ontology_headers: HashSet::new(),
            datatypes: HashSet::new(),
        };

        for triple in triples {
            let subject = triple.subject.as_str();
            let predicate = triple.predicate.as_ref();

            if predicate == vocab::LABEL {
                if let Term::Literal(lit) = &triple.object {
                    index
                        .labels
                        .entry(subject.to_string())
                        .or_default()
                        .push(lit.clone());
                }
                continue;
            }

            // These hold for the subject whatever the object is.
            if predicate == vocab::SUB_CLASS_OF {
                index.classes.insert(subject.to_string());
            } else if predicate == vocab::DOMAIN {
                index
                    .properties
                    .entry(subject.to_string())
                    .or_default()
                    .has_domain = true;
            }

            // Blank-node objects (restrictions, unions) carry nothing more here.
            let Some(object) = triple.object_iri() else {
                continue;
            };

            if predicate == vocab::TYPE {
                if vocab::CLASS_TYPES.iter().any(|t| t.as_str() == object) {
                    index.classes.insert(subject.to_string());
                } else if let Some(kind) = PropertyKind::from_type_iri(object) {
                    let decl = index.properties.entry(subject.to_string()).or_default();
                    decl.declared = true;
                    decl.kind = Some(decl.kind.map_or(kind, |k| k.merge(kind)));
                } else if object == vocab::OWL_ONTOLOGY.as_str() {
                    index.ontology_headers.insert(subject.to_string());
                } else if object == vocab::RDFS_DATATYPE.as_str() {
                    index.datatypes.insert(subject.to_string());
                }
                index
                    .typings
                    .push((subject.to_string(), object.to_string()));
            } else if predicate == vocab::SUB_CLASS_OF {
                index.hierarchy.add_subclass(subject, object);
            } else if predicate == vocab::DOMAIN {
                index.classes.insert(object.to_string());
                index
                    .properties
                    .entry(subject.to_string())
                    .or_default()
                    .domains
                    .push(object.to_string());
            } else if predicate == vocab::RANGE {
                index
                    .properties
                    .entry(subject.to_string())
                    .or_default()
                    .ranges
                    .push(object.to_string());
            }
        }

        index.normalize();
        index
    }

    /// Read the schema triples from a store and index them.
    ///
    /// Domains and ranges given as `owl:unionOf` lists are expanded to their
    /// named member classes.
    pub fn load(store: &GraphStore, policy: LabelPolicy) -> Result<Self, QueryError> {
        let triples = store.triples_with_predicates(&SCHEMA_PREDICATES)?;
        let mut index = Self::from_triples(&triples, policy);
        let members = store.select_triples(&SparqlQuery::new(UNION_MEMBERS))?;
        tracing::debug!(
            triples = triples.len(),
            union_members = members.len(),
            "indexed schema triples"
        );
        index.add_union_members(&members);
        Ok(index)
    }

    /// Record `(property, rdfs:domain | rdfs:range, class)` triples whose
    /// class came from a union.
    fn add_union_members(&mut self, members: &[Triple]) {
        for triple in members {
            let Some(member) = triple.object_iri() else {
                continue;
            };
            let decl = self
                .properties
                .entry(triple.subject.as_str().to_string())
                .or_default();
            if triple.predicate.as_ref() == vocab::DOMAIN {
                decl.has_domain = true;
                decl.domains.push(member.to_string());
                self.classes.insert(member.to_string());
            } else if triple.predicate.as_ref() == vocab::RANGE {
                decl.ranges.push(member.to_string());
            }
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        for decl in self.properties.values_mut() {
            decl.domains.sort();
            decl.domains.dedup();
            decl.ranges.sort();
            decl.ranges.dedup();
        }
    }

    /// Preferred label, else local name, else the IRI itself.
    pub fn label_of(&self, iri: &str) -> String {
        self.labels
            .get(iri)
            .and_then(|labels| self.policy.select(labels))
            .unwrap_or_else(|| fallback_label(iri))
    }

    /// Declared or implied class, directly or through the subclass chain.
    pub fn is_class(&self, iri: &str) -> bool {
        self.classes.contains(iri) || self.hierarchy.contains(iri)
    }

    pub fn is_property(&self, iri: &str) -> bool {
        self.properties.contains_key(iri)
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    pub fn class_count(&self) -> usize {
        self.classes.iter().filter(|c| !vocab::is_reserved(c)).count()
    }

    pub fn property_count(&self) -> usize {
        self.properties.keys().filter(|p| !vocab::is_reserved(p)).count()
    }

    /// All non-reserved classes, ordered by label then IRI.
    pub fn classes(&self) -> Vec<ClassEntry> {
        let mut entries: Vec<ClassEntry> = self
            .classes
            .iter()
            .filter(|iri| !vocab::is_reserved(iri))
            .map(|iri| ClassEntry {
                iri: iri.clone(),
                label: self.label_of(iri),
            })
            .collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.iri.cmp(&b.iri)));
        entries
    }

    /// Properties applicable to `class_iri`, ordered by label then IRI.
    ///
    /// A property applies when its domain meets the class's superclass
    /// closure, or when it is a declared property with no `rdfs:domain`
    /// triple at all.
    pub fn properties_for(&self, class_iri: &str) -> Vec<PropertyEntry> {
        let closure: HashSet<String> = self.hierarchy.ancestors(class_iri).into_iter().collect();

        let mut names: Vec<&String> = self.properties.keys().collect();
        names.sort();

        let domain_matched = names.iter().filter(|iri| {
            self.properties[iri.as_str()]
                .domains
                .iter()
                .any(|d| closure.contains(d))
        });
        let global = names.iter().filter(|iri| {
            let decl = &self.properties[iri.as_str()];
            decl.declared && !decl.has_domain
        });

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for iri in domain_matched.chain(global) {
            if vocab::is_reserved(iri) || !seen.insert(iri.as_str()) {
                continue;
            }
            entries.push(self.property_entry(iri));
        }

        entries.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.iri.cmp(&b.iri)));
        entries
    }

    fn property_entry(&self, iri: &str) -> PropertyEntry {
        let decl = &self.properties[iri];
        let value_kind = classify(
            decl.kind(),
            decl.ranges.iter().map(String::as_str),
            |range| self.is_class(range),
        );
        let range = match value_kind {
            ValueKind::Instance => decl
                .ranges
                .iter()
                .find(|r| self.is_class(r))
                .or_else(|| decl.ranges.first()),
            ValueKind::Literal => decl.ranges.first(),
        };
        PropertyEntry {
            iri: iri.to_string(),
            label: self.label_of(iri),
            range: range.cloned(),
            value_kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Store-backed discovery
// ---------------------------------------------------------------------------

/// List every class declared in the store.
pub fn list_classes(store: &GraphStore, policy: &LabelPolicy) -> Listing<ClassEntry> {
    let result = SchemaIndex::load(store, policy.clone()).map(|index| index.classes());
    Listing::from_result("list_classes", result)
}

/// List the properties applicable to a class.
pub fn list_properties(
    store: &GraphStore,
    class_iri: &str,
    policy: &LabelPolicy,
) -> Listing<PropertyEntry> {
    let result = parse_class_iri(class_iri).and_then(|class| {
        let index = SchemaIndex::load(store, policy.clone())?;
        Ok(index.properties_for(class.as_str()))
    });
    Listing::from_result("list_properties", result)
}

/// Validate a caller-supplied class IRI.
pub(crate) fn parse_class_iri(value: &str) -> Result<NamedNode, QueryError> {
    NamedNode::new(value.trim()).map_err(|e| QueryError::InvalidIri {
        value: value.to_string(),
        message: e.to_string(),
    })
}
