//! Triple store adapter.
//!
//! The knowledge graph is a set of (subject, predicate, object) triples held
//! in an `oxigraph` store. Subjects written by ontoform are always IRIs;
//! objects are IRIs or literals.
//!
//! - **Store** ([`GraphStore`]): in-memory or on-disk oxigraph store with
//!   insertion, pattern checks, SPARQL and serialization
//! - **Queries** ([`SparqlQuery`]): parameterized SPARQL templates bound to
//!   validated terms

pub mod query;
pub mod store;

use oxigraph::model::{GraphName, NamedNode, Quad, Term};

pub use query::SparqlQuery;
pub use store::{GraphStore, StoreResult};

/// A triple (subject, predicate, object) in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// The subject IRI.
    pub subject: NamedNode,
    /// The predicate IRI.
    pub predicate: NamedNode,
    /// The object: an IRI or a literal.
    pub object: Term,
}

impl Triple {
    pub fn new(
        subject: impl Into<NamedNode>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// The quad this triple occupies in the default graph.
    pub(crate) fn to_quad(&self) -> Quad {
        Quad::new(
            self.subject.clone(),
            self.predicate.clone(),
            self.object.clone(),
            GraphName::DefaultGraph,
        )
    }

    /// The object as an IRI string, if it is one.
    pub fn object_iri(&self) -> Option<&str> {
        match &self.object {
            Term::NamedNode(node) => Some(node.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
