//! Knowledge base facade: top-level API for ontoform.
//!
//! A `KnowledgeBase` owns the store and configuration. It is constructed once
//! per process and shared by reference; the ontology is loaded on first use.

use std::sync::OnceLock;

use oxigraph::model::{NamedNode, Term};
use serde::Serialize;

use crate::catalog::{self, InstanceEntry};
use crate::config::KbConfig;
use crate::error::OntoResult;
use crate::export::{self, ExportFormat};
use crate::graph::GraphStore;
use crate::label::{self, LabelPolicy};
use crate::mint;
use crate::mutation::{self, Confirmation, EntitySubmission};
use crate::ontology::{LoadReport, OntologyLoader};
use crate::schema::{self, ClassEntry, Listing, PropertyEntry, SchemaIndex};

/// Outcome of the one-time ontology initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OntologyStatus {
    Loaded(LoadReport),
    /// The store stays usable; schema lists may be empty.
    Failed { source: String, message: String },
}

impl OntologyStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, OntologyStatus::Loaded(_))
    }
}

impl std::fmt::Display for OntologyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OntologyStatus::Loaded(report) if report.already_loaded => {
                write!(f, "loaded ({}, already present)", report.source)
            }
            OntologyStatus::Loaded(report) => write!(
                f,
                "loaded ({}, {} triples added)",
                report.source, report.triples_added
            ),
            OntologyStatus::Failed { source, message } => {
                write!(f, "failed ({source}): {message}")
            }
        }
    }
}

/// The ontology-backed knowledge base.
pub struct KnowledgeBase {
    config: KbConfig,
    store: GraphStore,
    policy: LabelPolicy,
    loader: OntologyLoader,
    ontology: OnceLock<OntologyStatus>,
}

impl KnowledgeBase {
    /// Open the store described by `config`. The ontology is not loaded yet.
    pub fn open(config: KbConfig) -> OntoResult<Self> {
        config.validate()?;
        let loader = OntologyLoader::new(config.ontology_source(), config.marker()?)
            .with_format(config.ontology_format()?);

        let store = match &config.data_dir {
            Some(dir) => GraphStore::open(dir)?,
            None => GraphStore::in_memory()?,
        };

        tracing::info!(
            persistent = config.data_dir.is_some(),
            ontology = %loader.source(),
            base = %config.base_namespace,
            "opened knowledge base"
        );

        Ok(Self {
            policy: config.label_policy(),
            config,
            store,
            loader,
            ontology: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn label_policy(&self) -> &LabelPolicy {
        &self.policy
    }

    /// Load the ontology once. Concurrent callers wait for the same attempt.
    pub fn ensure_ontology(&self) -> &OntologyStatus {
        self.ontology.get_or_init(|| match self.loader.load(&self.store) {
            Ok(report) => OntologyStatus::Loaded(report),
            Err(e) => {
                tracing::error!(source = %self.loader.source(), "ontology load failed: {e}");
                OntologyStatus::Failed {
                    source: self.loader.source().to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    pub fn list_classes(&self) -> Listing<ClassEntry> {
        self.ensure_ontology();
        schema::list_classes(&self.store, &self.policy)
    }

    pub fn list_properties(&self, class_iri: &str) -> Listing<PropertyEntry> {
        self.ensure_ontology();
        schema::list_properties(&self.store, class_iri, &self.policy)
    }

    pub fn list_instances(&self, class_iri: Option<&str>) -> Listing<InstanceEntry> {
        self.ensure_ontology();
        catalog::list_instances(
            &self.store,
            class_iri,
            Some(&self.config.base_namespace),
            &self.policy,
        )
    }

    /// Validate and apply one entity submission.
    pub fn submit(&self, submission: &EntitySubmission) -> OntoResult<Confirmation> {
        self.ensure_ontology();
        mutation::add_typed_entity(
            &self.store,
            &self.config.base_namespace,
            &self.policy,
            submission,
        )
    }

    /// Mint a fresh IRI in the instance namespace without writing anything.
    pub fn mint_iri(&self, hint: Option<&str>) -> OntoResult<NamedNode> {
        Ok(mint::mint_instance_iri(&self.config.base_namespace, hint)?)
    }

    /// Display label of an IRI; strings that are not IRIs are returned as-is.
    pub fn resolve_label(&self, iri: &str) -> String {
        match NamedNode::new(iri) {
            Ok(node) => label::resolve_label(&Term::from(node), &self.store, &self.policy),
            Err(_) => iri.to_string(),
        }
    }

    pub fn triple_count(&self) -> OntoResult<usize> {
        Ok(self.store.triple_count()?)
    }

    pub fn export(&self, format: ExportFormat) -> OntoResult<Vec<u8>> {
        export::export_graph(
            &self.store,
            format,
            &self.config.base_namespace,
            &self.policy,
        )
    }

    /// Store statistics.
    pub fn info(&self) -> OntoResult<KbInfo> {
        let ontology = self.ensure_ontology().clone();
        let index = SchemaIndex::load(&self.store, self.policy.clone())?;
        let instances =
            catalog::instances(&index, None, Some(&self.config.base_namespace)).len();
        Ok(KbInfo {
            triple_count: self.store.triple_count()?,
            class_count: index.class_count(),
            property_count: index.property_count(),
            instance_count: instances,
            persistent: self.config.data_dir.is_some(),
            base_namespace: self.config.base_namespace.clone(),
            ontology,
        })
    }
}

/// Summary information about the knowledge base.
#[derive(Debug, Clone, Serialize)]
pub struct KbInfo {
    pub triple_count: usize,
    pub class_count: usize,
    pub property_count: usize,
    pub instance_count: usize,
    pub persistent: bool,
    pub base_namespace: String,
    pub ontology: OntologyStatus,
}

impl std::fmt::Display for KbInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ontoform knowledge base")?;
        writeln!(f, "  ontology:     {}", self.ontology)?;
        writeln!(f, "  namespace:    {}", self.base_namespace)?;
        writeln!(f, "  triples:      {}", self.triple_count)?;
        writeln!(f, "  classes:      {}", self.class_count)?;
        writeln!(f, "  properties:   {}", self.property_count)?;
        writeln!(f, "  instances:    {}", self.instance_count)?;
        writeln!(f, "  persistent:   {}", self.persistent)?;
        Ok(())
    }
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("config", &self.config)
            .field("ontology", &self.ontology.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OntologyConfig;

    #[test]
    fn ontology_loads_once_on_first_use() {
        let kb = KnowledgeBase::open(KbConfig::default()).unwrap();
        assert_eq!(kb.triple_count().unwrap(), 0);

        assert!(!kb.list_classes().is_empty());
        let count = kb.triple_count().unwrap();
        kb.list_classes();
        assert_eq!(kb.triple_count().unwrap(), count);
        assert!(kb.ensure_ontology().is_loaded());
    }

    #[test]
    fn failed_load_leaves_store_usable() {
        let config = KbConfig {
            ontology: OntologyConfig {
                url: None,
                path: Some("/nonexistent/ontology.ttl".into()),
            },
            ..Default::default()
        };
        let kb = KnowledgeBase::open(config).unwrap();
        assert!(matches!(
            kb.ensure_ontology(),
            OntologyStatus::Failed { .. }
        ));
        let listing = kb.list_classes();
        assert!(!listing.is_degraded());
        assert!(listing.is_empty());
    }

    #[test]
    fn info_counts() {
        let kb = KnowledgeBase::open(KbConfig::default()).unwrap();
        let info = kb.info().unwrap();
        assert!(info.class_count >= 6);
        assert!(info.property_count >= 8);
        assert_eq!(info.instance_count, 0);
        assert!(!info.persistent);
        assert!(info.to_string().contains("classes:"));
    }

    #[test]
    fn resolve_label_passes_non_iris_through() {
        let kb = KnowledgeBase::open(KbConfig::default()).unwrap();
        assert_eq!(kb.resolve_label("not an iri"), "not an iri");
        kb.ensure_ontology();
        assert_eq!(
            kb.resolve_label("https://example.org/onto/worksFor"),
            "works for"
        );
    }
}
