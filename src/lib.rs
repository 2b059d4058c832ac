// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ontoform
//!
//! Ontology-driven entry forms over an RDF triple store.
//!
//! Given a loaded OWL/RDFS ontology, ontoform discovers which classes exist,
//! which properties apply to a class (inherited through `rdfs:subClassOf`),
//! and whether each property takes a literal or a reference to an existing
//! instance. Submissions become three triples about a freshly minted subject.
//!
//! ## Architecture
//!
//! - **Triple store** (`graph`): oxigraph store with parameterized SPARQL
//! - **Ontology loading** (`ontology`): idempotent, marker-guarded load
//! - **Schema discovery** (`schema`): classes, properties, value kinds
//! - **Instance catalog** (`catalog`): instances scoped through subclasses
//! - **Labels and identity** (`label`, `mint`)
//! - **Mutation gateway** (`mutation`): validated three-triple writes
//! - **Facade** (`kb`): [`kb::KnowledgeBase`] owning store and config
//!
//! ## Library usage
//!
//! ```no_run
//! use ontoform::config::KbConfig;
//! use ontoform::kb::KnowledgeBase;
//!
//! let kb = KnowledgeBase::open(KbConfig::default()).unwrap();
//! for class in kb.list_classes().items() {
//!     println!("{} <{}>", class.label, class.iri);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod kb;
pub mod label;
pub mod mint;
pub mod mutation;
pub mod ontology;
pub mod schema;
pub mod vocab;
