//! Mutation gateway: turns one form submission into three triples.
//!
//! Every submission mints a new subject. The subject name becomes its
//! `rdfs:label`; it is never used to find or merge with an existing entity.

use oxigraph::model::{Literal, NamedNode, Term};
use serde::{Deserialize, Serialize};

use crate::error::{MutationError, OntoResult, ValidationError};
use crate::graph::{GraphStore, Triple};
use crate::label::{resolve_label, LabelPolicy};
use crate::mint::mint_instance_iri;
use crate::schema::ValueKind;
use crate::vocab;

/// Raw field values of an entity submission, as received from a form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySubmission {
    pub subject_name: String,
    pub subject_class_iri: String,
    pub property_iri: String,
    pub value_kind: String,
    #[serde(default)]
    pub literal_value: Option<String>,
    #[serde(default)]
    pub instance_iri: Option<String>,
}

/// A submission whose fields have all been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub subject_name: String,
    pub subject_class: NamedNode,
    pub property: NamedNode,
    pub object: Term,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub subject_iri: String,
    pub message: String,
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(value)
    }
}

fn required_opt<'a>(
    field: &'static str,
    value: Option<&'a String>,
) -> Result<&'a str, ValidationError> {
    required(field, value.map(String::as_str).unwrap_or_default())
}

fn iri(field: &'static str, value: &str) -> Result<NamedNode, ValidationError> {
    NamedNode::new(value).map_err(|e| ValidationError::InvalidIri {
        field,
        value: value.to_string(),
        message: e.to_string(),
    })
}

impl EntitySubmission {
    /// Check every field. Nothing is written on failure.
    pub fn validate(&self) -> Result<ValidatedSubmission, ValidationError> {
        let subject_name = required("subject_name", &self.subject_name)?;
        let subject_class = iri(
            "subject_class_iri",
            required("subject_class_iri", &self.subject_class_iri)?,
        )?;
        let property = iri("property_iri", required("property_iri", &self.property_iri)?)?;
        let value_kind: ValueKind = required("value_kind", &self.value_kind)?.parse()?;

        let object = match value_kind {
            ValueKind::Literal => {
                let value = required_opt("literal_value", self.literal_value.as_ref())?;
                Term::from(Literal::new_simple_literal(value))
            }
            ValueKind::Instance => {
                let value = required_opt("instance_iri", self.instance_iri.as_ref())?;
                Term::from(iri("instance_iri", value)?)
            }
        };

        Ok(ValidatedSubmission {
            subject_name: subject_name.to_string(),
            subject_class,
            property,
            object,
        })
    }
}

impl ValidatedSubmission {
    /// The three triples describing a freshly minted subject.
    pub fn triples(&self, subject: &NamedNode) -> [Triple; 3] {
        [
            Triple::new(
                subject.clone(),
                vocab::TYPE.into_owned(),
                self.subject_class.clone(),
            ),
            Triple::new(
                subject.clone(),
                vocab::LABEL.into_owned(),
                Literal::new_simple_literal(&self.subject_name),
            ),
            Triple::new(subject.clone(), self.property.clone(), self.object.clone()),
        ]
    }
}

/// Validate a submission, mint a subject, and write its triples.
///
/// Triples written before an insert failure stay in the store.
pub fn add_typed_entity(
    store: &GraphStore,
    base_namespace: &str,
    policy: &LabelPolicy,
    submission: &EntitySubmission,
) -> OntoResult<Confirmation> {
    let valid = submission.validate()?;
    let subject = mint_instance_iri(base_namespace, Some(&valid.subject_name))?;

    for (written_before, triple) in valid.triples(&subject).iter().enumerate() {
        store
            .insert(triple)
            .map_err(|source| MutationError::Write {
                subject: subject.as_str().to_string(),
                written_before,
                source,
            })?;
    }

    let class_label = resolve_label(&Term::from(valid.subject_class.clone()), store, policy);
    let property_label = resolve_label(&Term::from(valid.property.clone()), store, policy);
    let object_label = resolve_label(&valid.object, store, policy);

    let message = format!(
        "Added \"{}\" ({class_label}) with {property_label}: {object_label}",
        valid.subject_name
    );
    tracing::info!(subject = subject.as_str(), "{message}");

    Ok(Confirmation {
        subject_iri: subject.into_string(),
        message,
    })
}
