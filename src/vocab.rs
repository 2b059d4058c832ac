//! Well-known RDF, RDFS, OWL and XSD terms used by schema discovery.

use oxigraph::model::NamedNodeRef;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Core vocabularies whose terms never appear in class, property or instance lists.
pub const RESERVED_NAMESPACES: [&str; 4] = [RDF_NS, RDFS_NS, OWL_NS, XSD_NS];

// rdf
pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const RDF_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#Property");
pub const LANG_STRING: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");
pub const PLAIN_LITERAL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#PlainLiteral");
// rdfs
pub const LABEL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label");
pub const SUB_CLASS_OF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#subClassOf");
pub const DOMAIN: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#domain");
pub const RANGE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#range");
pub const RDFS_CLASS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#Class");
pub const RDFS_LITERAL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#Literal");
pub const RDFS_DATATYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#Datatype");
// owl
pub const OWL_CLASS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
pub const OWL_ONTOLOGY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
pub const ANNOTATION_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
pub const FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#FunctionalProperty");
pub const INVERSE_FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#InverseFunctionalProperty");
pub const TRANSITIVE_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
pub const SYMMETRIC_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#SymmetricProperty");
pub const ASYMMETRIC_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AsymmetricProperty");
pub const REFLEXIVE_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ReflexiveProperty");
pub const IRREFLEXIVE_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#IrreflexiveProperty");
pub const UNION_OF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#unionOf");

/// Types that mark their subject as a class.
pub const CLASS_TYPES: [NamedNodeRef<'_>; 2] = [OWL_CLASS, RDFS_CLASS];

/// Types that mark their subject as a property.
pub const PROPERTY_TYPES: [NamedNodeRef<'_>; 11] = [
    OBJECT_PROPERTY,
    DATATYPE_PROPERTY,
    RDF_PROPERTY,
    ANNOTATION_PROPERTY,
    FUNCTIONAL_PROPERTY,
    INVERSE_FUNCTIONAL_PROPERTY,
    TRANSITIVE_PROPERTY,
    SYMMETRIC_PROPERTY,
    ASYMMETRIC_PROPERTY,
    REFLEXIVE_PROPERTY,
    IRREFLEXIVE_PROPERTY,
];

/// Property characteristics that only apply to object properties.
pub const OBJECT_PROPERTY_CHARACTERISTICS: [NamedNodeRef<'_>; 6] = [
    INVERSE_FUNCTIONAL_PROPERTY,
    TRANSITIVE_PROPERTY,
    SYMMETRIC_PROPERTY,
    ASYMMETRIC_PROPERTY,
    REFLEXIVE_PROPERTY,
    IRREFLEXIVE_PROPERTY,
];

/// Whether `iri` lives in one of the core RDF/RDFS/OWL/XSD vocabularies.
pub fn is_reserved(iri: &str) -> bool {
    RESERVED_NAMESPACES.iter().any(|ns| iri.starts_with(ns))
}

/// Whether `iri` names a primitive literal datatype.
pub fn is_primitive_datatype(iri: &str) -> bool {
    iri.starts_with(XSD_NS)
        || iri == RDFS_LITERAL.as_str()
        || iri == LANG_STRING.as_str()
        || iri == PLAIN_LITERAL.as_str()
}

/// Prefix bindings used when serializing Turtle.
pub fn standard_prefixes() -> [(&'static str, &'static str); 4] {
    [("rdf", RDF_NS), ("rdfs", RDFS_NS), ("owl", OWL_NS), ("xsd", XSD_NS)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_namespaces_are_detected() {
        assert!(is_reserved(OWL_CLASS.as_str()));
        assert!(is_reserved("http://www.w3.org/2001/XMLSchema#string"));
        assert!(!is_reserved("https://example.org/onto/Person"));
    }

    #[test]
    fn primitive_datatypes() {
        assert!(is_primitive_datatype("http://www.w3.org/2001/XMLSchema#dateTime"));
        assert!(is_primitive_datatype(RDFS_LITERAL.as_str()));
        assert!(!is_primitive_datatype("https://example.org/onto/Company"));
    }
}
