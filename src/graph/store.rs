//! Persistent SPARQL RDF graph backed by oxigraph.
//!
//! Provides durable storage of triples and SPARQL query capabilities. All
//! ontoform data lives in the store's default graph.

use std::io::Read;

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{GraphNameRef, NamedNodeRef, Term};
use oxigraph::sparql::{QueryResults, QuerySolution};
use oxigraph::store::Store;

use crate::error::{QueryError, StoreError};

use super::{SparqlQuery, Triple};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistent SPARQL-capable RDF store.
pub struct GraphStore {
    store: Store,
}

impl GraphStore {
    /// Create a new in-memory store (no persistence).
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(|e| StoreError::Unavailable {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Open or create a persistent store at the given path.
    pub fn open(path: &std::path::Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path).map_err(|source| StoreError::Io { source })?;
        let store = Store::open(path).map_err(|e| StoreError::Unavailable {
            message: format!("failed to open oxigraph store at {}: {e}", path.display()),
        })?;
        Ok(Self { store })
    }

    /// Insert a triple. Inserting a triple that is already present is a no-op.
    pub fn insert(&self, triple: &Triple) -> StoreResult<()> {
        self.store
            .insert(&triple.to_quad())
            .map_err(|e| StoreError::Insert {
                message: format!("insert of {triple} failed: {e}"),
            })
    }

    /// Whether the exact triple is present.
    pub fn contains(&self, triple: &Triple) -> StoreResult<bool> {
        self.store
            .contains(&triple.to_quad())
            .map_err(|e| StoreError::Sparql {
                message: format!("contains check failed: {e}"),
            })
    }

    /// Number of triples in the store.
    pub fn triple_count(&self) -> StoreResult<usize> {
        self.store.len().map_err(|e| StoreError::Sparql {
            message: format!("count failed: {e}"),
        })
    }

    /// Execute a SPARQL SELECT query and return its solutions.
    pub fn select(&self, query: &SparqlQuery) -> Result<Vec<QuerySolution>, QueryError> {
        let text = query.render()?;
        #[allow(deprecated)]
        let results = self.store.query(text.as_str()).map_err(|e| StoreError::Sparql {
            message: format!("SPARQL query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| StoreError::Sparql {
                        message: format!("solution error: {e}"),
                    })?;
                    rows.push(solution);
                }
                Ok(rows)
            }
            _ => Err(StoreError::Sparql {
                message: "expected solutions from SELECT query".into(),
            }
            .into()),
        }
    }

    /// All triples with an IRI subject whose predicate is one of `predicates`.
    pub fn triples_with_predicates(
        &self,
        predicates: &[NamedNodeRef<'_>],
    ) -> Result<Vec<Triple>, QueryError> {
        let values: Vec<String> = predicates.iter().map(|p| p.to_string()).collect();
        let query = SparqlQuery::new(format!(
            "SELECT ?s ?p ?o WHERE {{ VALUES ?p {{ {} }} ?s ?p ?o . FILTER(isIRI(?s)) }}",
            values.join(" ")
        ));
        self.select_triples(&query)
    }

    /// Every triple in the default graph with an IRI subject.
    pub fn triples(&self) -> Result<Vec<Triple>, QueryError> {
        self.select_triples(&SparqlQuery::new(
            "SELECT ?s ?p ?o WHERE { ?s ?p ?o . FILTER(isIRI(?s)) } ORDER BY ?s ?p ?o",
        ))
    }

    /// Run a SELECT binding `?s ?p ?o` and keep the rows with IRI subject and predicate.
    pub fn select_triples(&self, query: &SparqlQuery) -> Result<Vec<Triple>, QueryError> {
        let mut triples = Vec::new();
        for row in self.select(query)? {
            if let (Some(Term::NamedNode(s)), Some(Term::NamedNode(p)), Some(o)) =
                (row.get("s"), row.get("p"), row.get("o"))
            {
                triples.push(Triple::new(s.clone(), p.clone(), o.clone()));
            }
        }
        Ok(triples)
    }

    /// Parse an RDF document into the default graph.
    pub fn load(
        &self,
        format: RdfFormat,
        base_iri: Option<&str>,
        reader: impl Read,
    ) -> Result<(), String> {
        let mut parser = RdfParser::from_format(format);
        if let Some(base) = base_iri {
            parser = parser.with_base_iri(base).map_err(|e| e.to_string())?;
        }
        self.store
            .load_from_reader(parser, reader)
            .map_err(|e| e.to_string())
    }

    /// Serialize the default graph.
    pub fn dump(&self, format: RdfFormat, prefixes: &[(&str, &str)]) -> StoreResult<Vec<u8>> {
        let mut serializer = RdfSerializer::from_format(format);
        for (prefix, ns) in prefixes {
            serializer = serializer
                .with_prefix(*prefix, *ns)
                .map_err(|e| StoreError::Dump {
                    message: format!("invalid prefix {prefix}: {e}"),
                })?;
        }
        self.store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, serializer, Vec::new())
            .map_err(|e| StoreError::Dump {
                message: e.to_string(),
            })
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore").finish()
    }
}
