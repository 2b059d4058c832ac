//! Ontology loading: parse a schema document into the store exactly once.
//!
//! A load is skipped when either the configured marker triple
//! (`<marker> rdf:type owl:Class`) or a load record for the same source is
//! already present. The load record is written after every successful parse,
//! so reloading stays idempotent even for ontologies that do not declare the
//! marker class (re-parsing would otherwise duplicate their blank nodes).

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use oxigraph::io::RdfFormat;
use oxigraph::model::{Literal, NamedNode, NamedNodeRef};
use serde::Serialize;

use crate::error::OntologyError;
use crate::graph::{GraphStore, Triple};
use crate::vocab;

/// Sample ontology compiled into the binary.
pub const BUNDLED_ONTOLOGY: &str = include_str!("../data/ontology/people.ttl");

/// Namespace of the bundled ontology.
pub const BUNDLED_NAMESPACE: &str = "https://example.org/onto/";

const LOAD_RECORD_SUBJECT: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("urn:ontoform:ontology");
const LOAD_RECORD_PREDICATE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("urn:ontoform:loadedFrom");

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// RDF serialization of an ontology document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OntologyFormat {
    Turtle,
    RdfXml,
    NTriples,
}

impl OntologyFormat {
    pub fn rdf_format(self) -> RdfFormat {
        match self {
            OntologyFormat::Turtle => RdfFormat::Turtle,
            OntologyFormat::RdfXml => RdfFormat::RdfXml,
            OntologyFormat::NTriples => RdfFormat::NTriples,
        }
    }

    /// Guess from a path or URL extension.
    pub fn detect(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let ext = path.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" => Some(OntologyFormat::Turtle),
            "owl" | "rdf" | "xml" => Some(OntologyFormat::RdfXml),
            "nt" => Some(OntologyFormat::NTriples),
            _ => None,
        }
    }

    /// Guess from an HTTP Content-Type header.
    pub fn detect_from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
        match mime.as_str() {
            "text/turtle" | "application/x-turtle" => Some(OntologyFormat::Turtle),
            "application/rdf+xml" | "application/owl+xml" => Some(OntologyFormat::RdfXml),
            "application/n-triples" => Some(OntologyFormat::NTriples),
            _ => None,
        }
    }
}

impl FromStr for OntologyFormat {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(OntologyFormat::Turtle),
            "rdfxml" | "rdf/xml" | "rdf" | "owl" | "xml" => Ok(OntologyFormat::RdfXml),
            "ntriples" | "n-triples" | "nt" => Ok(OntologyFormat::NTriples),
            other => Err(OntologyError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Where the ontology document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OntologySource {
    /// The sample ontology bundled via `include_str!`.
    Bundled,
    File(PathBuf),
    Url(String),
}

impl fmt::Display for OntologySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OntologySource::Bundled => write!(f, "bundled:people.ttl"),
            OntologySource::File(path) => write!(f, "{}", path.display()),
            OntologySource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Report after a load attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub source: String,
    pub already_loaded: bool,
    pub triples_added: usize,
}

/// Loads one ontology document into a store, at most once.
#[derive(Debug, Clone)]
pub struct OntologyLoader {
    source: OntologySource,
    format: Option<OntologyFormat>,
    marker: NamedNode,
}

impl OntologyLoader {
    pub fn new(source: OntologySource, marker: NamedNode) -> Self {
        Self {
            source,
            format: None,
            marker,
        }
    }

    /// Force a format instead of detecting it.
    pub fn with_format(mut self, format: Option<OntologyFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn source(&self) -> &OntologySource {
        &self.source
    }

    fn marker_triple(&self) -> Triple {
        Triple::new(
            self.marker.clone(),
            vocab::TYPE.into_owned(),
            vocab::OWL_CLASS.into_owned(),
        )
    }

    fn load_record(&self) -> Triple {
        Triple::new(
            LOAD_RECORD_SUBJECT.into_owned(),
            LOAD_RECORD_PREDICATE.into_owned(),
            Literal::new_simple_literal(self.source.to_string()),
        )
    }

    /// Whether this ontology is already present in the store.
    pub fn is_loaded(&self, store: &GraphStore) -> Result<bool, OntologyError> {
        Ok(store.contains(&self.marker_triple())? || store.contains(&self.load_record())?)
    }

    /// Load the ontology unless it is already present.
    pub fn load(&self, store: &GraphStore) -> Result<LoadReport, OntologyError> {
        let source = self.source.to_string();
        if self.is_loaded(store)? {
            tracing::info!(source = %source, "ontology already loaded in the store");
            return Ok(LoadReport {
                source,
                already_loaded: true,
                triples_added: 0,
            });
        }

        tracing::info!(source = %source, "ontology not found in store, parsing");
        let before = store.triple_count()?;
        let (data, format, base_iri) = self.read()?;

        store
            .load(format.rdf_format(), base_iri.as_deref(), data.as_slice())
            .map_err(|message| OntologyError::Parse {
                origin: source.clone(),
                message,
            })?;
        store.insert(&self.load_record())?;

        if !store.contains(&self.marker_triple())? {
            tracing::warn!(
                marker = self.marker.as_str(),
                "ontology does not declare the marker class; relying on the load record"
            );
        }

        let triples_added = store.triple_count()?.saturating_sub(before);
        tracing::info!(source = %source, triples_added, "ontology parsed successfully");
        Ok(LoadReport {
            source,
            already_loaded: false,
            triples_added,
        })
    }

    /// Read the raw document, its format, and the base IRI for relative references.
    fn read(&self) -> Result<(Vec<u8>, OntologyFormat, Option<String>), OntologyError> {
        match &self.source {
            OntologySource::Bundled => Ok((
                BUNDLED_ONTOLOGY.as_bytes().to_vec(),
                self.format.unwrap_or(OntologyFormat::Turtle),
                Some(BUNDLED_NAMESPACE.to_string()),
            )),
            OntologySource::File(path) => {
                let data = read_file(path)?;
                let format = self
                    .format
                    .or_else(|| OntologyFormat::detect(&path.display().to_string()))
                    .unwrap_or(OntologyFormat::RdfXml);
                Ok((data, format, None))
            }
            OntologySource::Url(url) => {
                let (data, content_type) = fetch(url)?;
                let format = self
                    .format
                    .or_else(|| content_type.as_deref().and_then(OntologyFormat::detect_from_content_type))
                    .or_else(|| OntologyFormat::detect(url))
                    .unwrap_or(OntologyFormat::RdfXml);
                Ok((data, format, Some(url.clone())))
            }
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, OntologyError> {
    std::fs::read(path).map_err(|source| OntologyError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Download a document, returning its body and Content-Type.
fn fetch(url: &str) -> Result<(Vec<u8>, Option<String>), OntologyError> {
    let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
    let response = agent
        .get(url)
        .set(
            "Accept",
            "text/turtle, application/rdf+xml;q=0.9, application/n-triples;q=0.8, */*;q=0.1",
        )
        .call()
        .map_err(|e| OntologyError::Fetch {
            url: url.into(),
            message: e.to_string(),
        })?;

    let content_type = Some(response.content_type().to_string());
    let mut data = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut data)
        .map_err(|e| OntologyError::Fetch {
            url: url.into(),
            message: format!("read body: {e}"),
        })?;
    Ok((data, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> NamedNode {
        NamedNode::new(format!("{BUNDLED_NAMESPACE}Person")).unwrap()
    }

    #[test]
    fn bundled_load_is_idempotent() {
        let store = GraphStore::in_memory().unwrap();
        let loader = OntologyLoader::new(OntologySource::Bundled, marker());

        let first = loader.load(&store).unwrap();
        assert!(!first.already_loaded);
        assert!(first.triples_added > 30);
        let count = store.triple_count().unwrap();

        let second = loader.load(&store).unwrap();
        assert!(second.already_loaded);
        assert_eq!(second.triples_added, 0);
        assert_eq!(store.triple_count().unwrap(), count);
    }

    #[test]
    fn load_record_guards_when_marker_is_absent() {
        let store = GraphStore::in_memory().unwrap();
        let absent = NamedNode::new("https://example.org/other/Nothing").unwrap();
        let loader = OntologyLoader::new(OntologySource::Bundled, absent);

        loader.load(&store).unwrap();
        let count = store.triple_count().unwrap();
        assert!(loader.load(&store).unwrap().already_loaded);
        assert_eq!(store.triple_count().unwrap(), count);
    }

    #[test]
    fn file_source_with_detected_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tiny.nt");
        std::fs::write(
            &path,
            "<https://example.org/t/A> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n",
        )
        .unwrap();

        let store = GraphStore::in_memory().unwrap();
        let loader = OntologyLoader::new(
            OntologySource::File(path),
            NamedNode::new("https://example.org/t/A").unwrap(),
        );
        let report = loader.load(&store).unwrap();
        // One ontology triple plus the load record.
        assert_eq!(report.triples_added, 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let store = GraphStore::in_memory().unwrap();
        let loader = OntologyLoader::new(
            OntologySource::File(PathBuf::from("/nonexistent/onto.ttl")),
            marker(),
        );
        assert!(matches!(loader.load(&store), Err(OntologyError::Io { .. })));
        assert_eq!(store.triple_count().unwrap(), 0);
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.ttl");
        std::fs::write(&path, "this is not turtle").unwrap();

        let store = GraphStore::in_memory().unwrap();
        let loader = OntologyLoader::new(OntologySource::File(path), marker());
        assert!(matches!(loader.load(&store), Err(OntologyError::Parse { .. })));
    }

    #[test]
    fn format_detection() {
        assert_eq!(
            OntologyFormat::detect("https://host/onto.owl?raw=1"),
            Some(OntologyFormat::RdfXml)
        );
        assert_eq!(OntologyFormat::detect("onto.ttl"), Some(OntologyFormat::Turtle));
        assert_eq!(OntologyFormat::detect("README"), None);
        assert_eq!(
            OntologyFormat::detect_from_content_type("text/turtle; charset=utf-8"),
            Some(OntologyFormat::Turtle)
        );
        assert!("jsonld".parse::<OntologyFormat>().is_err());
    }
}
