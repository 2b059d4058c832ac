//! Value-kind classification for properties.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::vocab;

/// The declared OWL/RDF kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// `owl:ObjectProperty`
    Object,
    /// `owl:DatatypeProperty`
    Datatype,
    /// `rdf:Property`, `owl:AnnotationProperty`, or undeclared.
    Unknown,
}

impl PropertyKind {
    /// Combine two declarations of the same property; `Object` wins, then `Datatype`.
    pub fn merge(self, other: PropertyKind) -> PropertyKind {
        match (self, other) {
            (PropertyKind::Object, _) | (_, PropertyKind::Object) => PropertyKind::Object,
            (PropertyKind::Datatype, _) | (_, PropertyKind::Datatype) => PropertyKind::Datatype,
            _ => PropertyKind::Unknown,
        }
    }

    /// Kind implied by an `rdf:type` object, if it is a property type.
    ///
    /// Characteristics such as `owl:TransitiveProperty` count as declarations.
    /// Those defined only for object properties imply `Object`;
    /// `owl:FunctionalProperty` says nothing about the value kind.
    pub fn from_type_iri(iri: &str) -> Option<PropertyKind> {
        if !vocab::PROPERTY_TYPES.iter().any(|t| t.as_str() == iri) {
            return None;
        }
        if iri == vocab::OBJECT_PROPERTY.as_str()
            || vocab::OBJECT_PROPERTY_CHARACTERISTICS
                .iter()
                .any(|t| t.as_str() == iri)
        {
            Some(PropertyKind::Object)
        } else if iri == vocab::DATATYPE_PROPERTY.as_str() {
            Some(PropertyKind::Datatype)
        } else {
            Some(PropertyKind::Unknown)
        }
    }
}

/// Whether a property's object is entered as a literal or chosen from instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Literal,
    Instance,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Literal => f.pad("literal"),
            ValueKind::Instance => f.pad("instance"),
        }
    }
}

impl FromStr for ValueKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(ValueKind::Literal),
            "instance" => Ok(ValueKind::Instance),
            other => Err(ValidationError::UnknownValueKind {
                value: other.to_string(),
            }),
        }
    }
}

/// Resolve the value kind of a property.
///
/// Object properties take instances. Otherwise the first range that is a
/// known class makes it an instance property; primitive datatype ranges, no
/// range, or unrecognized ranges all mean literal.
pub fn classify<'a>(
    kind: PropertyKind,
    ranges: impl IntoIterator<Item = &'a str>,
    is_class: impl Fn(&str) -> bool,
) -> ValueKind {
    if kind == PropertyKind::Object {
        return ValueKind::Instance;
    }
    for range in ranges {
        if vocab::is_primitive_datatype(range) {
            continue;
        }
        if is_class(range) {
            return ValueKind::Instance;
        }
    }
    ValueKind::Literal
}
