//! Graph export for operational inspection.
//!
//! RDF formats are serialized by the store; the JSON format is a
//! label-resolved listing of every triple with an IRI subject.

use std::fmt;
use std::str::FromStr;

use oxigraph::io::RdfFormat;
use oxigraph::model::Term;
use serde::{Deserialize, Serialize};

use crate::error::{OntoResult, StoreError};
use crate::graph::GraphStore;
use crate::label::LabelPolicy;
use crate::schema::SchemaIndex;
use crate::vocab;

/// Output format of a graph dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    NTriples,
    Turtle,
    RdfXml,
    Json,
}

impl ExportFormat {
    fn rdf_format(self) -> Option<RdfFormat> {
        match self {
            ExportFormat::NTriples => Some(RdfFormat::NTriples),
            ExportFormat::Turtle => Some(RdfFormat::Turtle),
            ExportFormat::RdfXml => Some(RdfFormat::RdfXml),
            ExportFormat::Json => None,
        }
    }

    /// MIME type for HTTP responses.
    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::NTriples => "application/n-triples",
            ExportFormat::Turtle => "text/turtle",
            ExportFormat::RdfXml => "application/rdf+xml",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::NTriples => "ntriples",
            ExportFormat::Turtle => "turtle",
            ExportFormat::RdfXml => "rdfxml",
            ExportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ntriples" | "n-triples" | "nt" => Ok(ExportFormat::NTriples),
            "turtle" | "ttl" => Ok(ExportFormat::Turtle),
            "rdfxml" | "rdf/xml" | "xml" => Ok(ExportFormat::RdfXml),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "unknown export format \"{other}\" (expected ntriples, turtle, rdfxml or json)"
            )),
        }
    }
}

/// Exported triple with resolved labels for all positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripleExport {
    pub subject: String,
    pub subject_label: String,
    pub predicate: String,
    pub predicate_label: String,
    /// IRI or lexical value.
    pub object: String,
    pub object_label: String,
    /// Whether the object is a literal.
    pub literal: bool,
}

/// Dump the default graph in the given format.
pub fn export_graph(
    store: &GraphStore,
    format: ExportFormat,
    base_namespace: &str,
    policy: &LabelPolicy,
) -> OntoResult<Vec<u8>> {
    match format.rdf_format() {
        Some(rdf) => {
            // `ex` for the instance namespace plus the core vocabularies.
            let mut bindings: Vec<(&str, &str)> = vec![("ex", base_namespace)];
            bindings.extend(vocab::standard_prefixes());
            Ok(store.dump(rdf, &bindings)?)
        }
        None => {
            let rows = labelled_triples(store, policy)?;
            serde_json::to_vec_pretty(&rows).map_err(|e| {
                StoreError::Dump {
                    message: e.to_string(),
                }
                .into()
            })
        }
    }
}

/// Every IRI-subject triple with display labels.
pub fn labelled_triples(store: &GraphStore, policy: &LabelPolicy) -> OntoResult<Vec<TripleExport>> {
    let index = SchemaIndex::load(store, policy.clone())?;
    let rows = store
        .triples()?
        .into_iter()
        .map(|t| {
            let (object, object_label, literal) = match &t.object {
                Term::Literal(lit) => (lit.value().to_string(), lit.value().to_string(), true),
                Term::NamedNode(node) => {
                    (node.as_str().to_string(), index.label_of(node.as_str()), false)
                }
                other => (other.to_string(), other.to_string(), false),
            };
            TripleExport {
                subject_label: index.label_of(t.subject.as_str()),
                subject: t.subject.into_string(),
                predicate_label: index.label_of(t.predicate.as_str()),
                predicate: t.predicate.into_string(),
                object,
                object_label,
                literal,
            }
        })
        .collect();
    Ok(rows)
}
