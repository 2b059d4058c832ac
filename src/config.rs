//! Configuration for a knowledge base, persisted as TOML.
//!
//! Resolution order, lowest to highest: built-in defaults, the config file
//! (`$XDG_CONFIG_HOME/ontoform/config.toml`), `ONTOFORM_*` environment
//! variables, then command-line flags applied by the binaries.

use std::path::{Path, PathBuf};

use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::label::LabelPolicy;
use crate::ontology::{OntologyFormat, OntologySource, BUNDLED_NAMESPACE};

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub const ENV_DATA_DIR: &str = "ONTOFORM_DATA_DIR";
pub const ENV_ONTOLOGY_URL: &str = "ONTOFORM_ONTOLOGY_URL";
pub const ENV_BASE_NAMESPACE: &str = "ONTOFORM_BASE_NAMESPACE";
pub const ENV_LISTEN: &str = "ONTOFORM_LISTEN";

/// XDG directories for ontoform.
#[derive(Debug, Clone)]
pub struct OntoPaths {
    /// `$XDG_CONFIG_HOME/ontoform/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/ontoform/`
    pub data_dir: PathBuf,
}

impl OntoPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> ConfigResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("ontoform");

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("ontoform");

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default location of the persistent store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

/// Where to read the ontology from. Neither set means the bundled sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Knowledge base configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbConfig {
    /// Persistent store directory. `None` keeps everything in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub ontology: OntologyConfig,
    /// Forced ontology format (`turtle`, `rdfxml`, `ntriples`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_format: Option<String>,
    /// Namespace new instances are minted under.
    #[serde(default = "default_base_namespace")]
    pub base_namespace: String,
    /// Class whose `rdf:type owl:Class` triple marks the ontology as loaded.
    #[serde(default = "default_marker_class")]
    pub marker_class: String,
    #[serde(default = "default_label_language")]
    pub label_language: String,
    /// Server listen address.
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_base_namespace() -> String {
    BUNDLED_NAMESPACE.into()
}
fn default_marker_class() -> String {
    format!("{BUNDLED_NAMESPACE}Person")
}
fn default_label_language() -> String {
    "en".into()
}
fn default_listen() -> String {
    "127.0.0.1:8380".into()
}

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            ontology: OntologyConfig::default(),
            ontology_format: None,
            base_namespace: default_base_namespace(),
            marker_class: default_marker_class(),
            label_language: default_label_language(),
            listen: default_listen(),
        }
    }
}

impl KbConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Apply `ONTOFORM_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = get(ENV_ONTOLOGY_URL) {
            self.ontology.url = Some(url);
            self.ontology.path = None;
        }
        if let Some(ns) = get(ENV_BASE_NAMESPACE) {
            self.base_namespace = ns;
        }
        if let Some(listen) = get(ENV_LISTEN) {
            self.listen = listen;
        }
    }

    pub fn ontology_source(&self) -> OntologySource {
        match (&self.ontology.url, &self.ontology.path) {
            (Some(url), _) => OntologySource::Url(url.clone()),
            (None, Some(path)) => OntologySource::File(path.clone()),
            (None, None) => OntologySource::Bundled,
        }
    }

    pub fn ontology_format(&self) -> ConfigResult<Option<OntologyFormat>> {
        self.ontology_format
            .as_deref()
            .map(str::parse::<OntologyFormat>)
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })
    }

    pub fn marker(&self) -> ConfigResult<NamedNode> {
        NamedNode::new(&self.marker_class).map_err(|e| ConfigError::Invalid {
            message: format!("marker_class {:?}: {e}", self.marker_class),
        })
    }

    pub fn label_policy(&self) -> LabelPolicy {
        LabelPolicy::new(&self.label_language)
    }

    /// Check the fields that are otherwise only parsed on first use.
    pub fn validate(&self) -> ConfigResult<()> {
        NamedNode::new(&self.base_namespace).map_err(|e| ConfigError::Invalid {
            message: format!("base_namespace {:?}: {e}", self.base_namespace),
        })?;
        self.marker()?;
        self.ontology_format()?;
        if self.ontology.url.is_some() && self.ontology.path.is_some() {
            return Err(ConfigError::Invalid {
                message: "set either ontology.url or ontology.path, not both".into(),
            });
        }
        if self.label_language.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "label_language must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = KbConfig::default();
        config.validate().unwrap();
        assert_eq!(config.ontology_source(), OntologySource::Bundled);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = KbConfig {
            data_dir: Some(dir.path().join("store")),
            ontology: OntologyConfig {
                url: Some("https://example.org/onto.owl".into()),
                path: None,
            },
            ontology_format: Some("rdfxml".into()),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(KbConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: KbConfig = toml::from_str("label_language = \"de\"\n").unwrap();
        assert_eq!(config.label_language, "de");
        assert_eq!(config.base_namespace, BUNDLED_NAMESPACE);
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = KbConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, KbConfig::default());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_namespace = [").unwrap();
        assert!(matches!(
            KbConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_ONTOLOGY_URL, "https://example.org/x.ttl"),
            (ENV_BASE_NAMESPACE, "https://data.example.org/"),
            (ENV_LISTEN, ""),
        ]
        .into_iter()
        .collect();

        let mut config = KbConfig {
            ontology: OntologyConfig {
                url: None,
                path: Some("/tmp/local.ttl".into()),
            },
            ..Default::default()
        };
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(
            config.ontology_source(),
            OntologySource::Url("https://example.org/x.ttl".into())
        );
        assert_eq!(config.base_namespace, "https://data.example.org/");
        assert_eq!(config.listen, default_listen());
    }

    #[test]
    fn invalid_values_rejected() {
        let config = KbConfig {
            base_namespace: "not an iri".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let config = KbConfig {
            ontology_format: Some("jsonld".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
