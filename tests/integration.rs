//! End-to-end integration tests for ontoform.
//!
//! These tests run against the bundled sample ontology and exercise the full
//! path from ontology load through discovery, submission, and export.

use std::collections::HashSet;
use std::sync::Arc;

use ontoform::config::KbConfig;
use ontoform::error::OntoError;
use ontoform::export::ExportFormat;
use ontoform::kb::{KnowledgeBase, OntologyStatus};
use ontoform::mutation::EntitySubmission;
use ontoform::schema::ValueKind;

const NS: &str = "https://example.org/onto/";

fn iri(local: &str) -> String {
    format!("{NS}{local}")
}

fn test_kb() -> KnowledgeBase {
    let kb = KnowledgeBase::open(KbConfig::default()).unwrap();
    assert!(kb.ensure_ontology().is_loaded());
    kb
}

fn literal(name: &str, class: &str, property: &str, value: &str) -> EntitySubmission {
    EntitySubmission {
        subject_name: name.into(),
        subject_class_iri: iri(class),
        property_iri: iri(property),
        value_kind: "literal".into(),
        literal_value: Some(value.into()),
        instance_iri: None,
    }
}

fn reference(name: &str, class: &str, property: &str, target: &str) -> EntitySubmission {
    EntitySubmission {
        subject_name: name.into(),
        subject_class_iri: iri(class),
        property_iri: iri(property),
        value_kind: "instance".into(),
        literal_value: None,
        instance_iri: Some(target.into()),
    }
}

fn property_labels(kb: &KnowledgeBase, class: &str) -> Vec<String> {
    kb.list_properties(&iri(class))
        .into_items()
        .into_iter()
        .map(|p| p.label)
        .collect()
}

#[test]
fn ontology_load_is_idempotent() {
    let kb = test_kb();
    let count = kb.triple_count().unwrap();
    assert!(count > 0);

    // A second loader against the same store finds the marker and skips.
    let loader = ontoform::ontology::OntologyLoader::new(
        kb.config().ontology_source(),
        kb.config().marker().unwrap(),
    );
    let report = loader.load(kb.store()).unwrap();
    assert!(report.already_loaded);
    assert_eq!(kb.triple_count().unwrap(), count);
}

#[test]
fn class_list_is_deterministic() {
    let kb = test_kb();
    let first = kb.list_classes().into_items();
    let second = kb.list_classes().into_items();
    assert_eq!(first, second);

    let labels: Vec<&str> = first.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Agent", "Company", "Employee", "Organization", "Person", "Project"]
    );
    assert!(first.iter().all(|c| c.iri.starts_with(NS)));
}

#[test]
fn person_properties_include_domain_matches_and_globals() {
    let kb = test_kb();
    assert_eq!(
        property_labels(&kb, "Person"),
        vec!["birth date", "has name", "homepage", "knows", "note", "works for"]
    );
}

#[test]
fn subclass_inherits_superclass_properties() {
    let kb = test_kb();
    let employee = property_labels(&kb, "Employee");
    for inherited in ["birth date", "knows", "works for"] {
        assert!(employee.contains(&inherited.to_string()), "missing {inherited}");
    }
    assert!(employee.contains(&"salary".to_string()));
    assert!(employee.contains(&"manages".to_string()));

    // Nothing flows upward.
    assert!(!property_labels(&kb, "Person").contains(&"salary".to_string()));
}

#[test]
fn properties_are_listed_once() {
    let kb = test_kb();
    let props = kb.list_properties(&iri("Company")).into_items();
    let unique: HashSet<&str> = props.iter().map(|p| p.iri.as_str()).collect();
    assert_eq!(unique.len(), props.len());
    assert_eq!(props.len(), 5);
}

#[test]
fn value_kinds_follow_declarations_and_ranges() {
    let kb = test_kb();
    let kind_of = |class: &str, prop: &str| {
        kb.list_properties(&iri(class))
            .into_items()
            .into_iter()
            .find(|p| p.iri == iri(prop))
            .map(|p| p.value_kind)
    };

    assert_eq!(kind_of("Person", "worksFor"), Some(ValueKind::Instance));
    assert_eq!(kind_of("Person", "hasName"), Some(ValueKind::Literal));
    assert_eq!(kind_of("Person", "birthDate"), Some(ValueKind::Literal));
    assert_eq!(kind_of("Person", "homepage"), Some(ValueKind::Literal));
    // Undeclared, but its range is a class.
    assert_eq!(kind_of("Company", "partnerOf"), Some(ValueKind::Instance));
}

#[test]
fn unknown_class_gets_only_global_properties() {
    let kb = test_kb();
    assert_eq!(
        property_labels(&kb, "Spaceship"),
        vec!["has name", "homepage", "note"]
    );
}

#[test]
fn invalid_class_iri_degrades() {
    let kb = test_kb();
    let listing = kb.list_properties("not an iri");
    assert!(listing.is_degraded());
    assert!(listing.is_empty());
    assert!(kb.list_instances(Some("also bad")).is_degraded());
}

#[test]
fn add_entity_writes_three_triples_and_is_listed() {
    let kb = test_kb();

    let acme = kb
        .submit(&literal("AcmeCorp", "Company", "hasName", "Acme Corporation"))
        .unwrap();
    let before = kb.triple_count().unwrap();

    let ada = kb
        .submit(&reference("Ada", "Person", "worksFor", &acme.subject_iri))
        .unwrap();
    assert_eq!(kb.triple_count().unwrap(), before + 3);
    assert_eq!(ada.message, "Added \"Ada\" (Person) with works for: AcmeCorp");

    let people = kb.list_instances(Some(&iri("Person"))).into_items();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].label, "Ada");
    assert_eq!(people[0].iri, ada.subject_iri);
}

#[test]
fn instances_are_scoped_through_subclasses() {
    let kb = test_kb();
    kb.submit(&literal("Grace", "Employee", "salary", "100"))
        .unwrap();
    kb.submit(&literal("Initech", "Company", "foundedIn", "1999"))
        .unwrap();

    let labels = |class: Option<&str>| -> Vec<String> {
        let class = class.map(iri);
        kb.list_instances(class.as_deref())
            .into_items()
            .into_iter()
            .map(|i| i.label)
            .collect()
    };

    assert_eq!(labels(Some("Person")), vec!["Grace"]);
    assert_eq!(labels(Some("Organization")), vec!["Initech"]);
    assert_eq!(labels(Some("Agent")), vec!["Grace", "Initech"]);
    assert!(labels(Some("Project")).is_empty());
    // Unscoped: no classes, properties or ontology header.
    assert_eq!(labels(None), vec!["Grace", "Initech"]);
}

#[test]
fn incomplete_submission_writes_nothing() {
    let kb = test_kb();
    let before = kb.triple_count().unwrap();

    let mut submission = literal("Ada", "Person", "hasName", "");
    submission.literal_value = None;
    let err = kb.submit(&submission).unwrap_err();
    assert!(matches!(err, OntoError::Validation(_)));

    let err = kb
        .submit(&reference("Ada", "Person", "worksFor", "not an iri"))
        .unwrap_err();
    assert!(matches!(err, OntoError::Validation(_)));

    assert_eq!(kb.triple_count().unwrap(), before);
}

#[test]
fn same_name_twice_creates_distinct_instances() {
    let kb = test_kb();
    let a = kb.submit(&literal("Ada", "Person", "hasName", "one")).unwrap();
    let b = kb.submit(&literal("Ada", "Person", "hasName", "two")).unwrap();
    assert_ne!(a.subject_iri, b.subject_iri);
    assert_eq!(kb.list_instances(Some(&iri("Person"))).len(), 2);
}

#[test]
fn minted_iris_are_unique() {
    let kb = test_kb();
    let minted: HashSet<String> = (0..1000)
        .map(|_| kb.mint_iri(Some("Ada")).unwrap().into_string())
        .collect();
    assert_eq!(minted.len(), 1000);
    assert!(minted.iter().all(|m| m.starts_with(NS)));
}

#[test]
fn label_fallback_chain() {
    let kb = test_kb();
    assert_eq!(kb.resolve_label(&iri("Person")), "Person");
    // No label: local name.
    assert_eq!(kb.resolve_label(&iri("note")), "note");
    // No label and no fragment: the IRI itself.
    assert_eq!(kb.resolve_label("urn:isbn:0451450523"), "urn:isbn:0451450523");
}

#[test]
fn concurrent_submissions_share_one_ontology_load() {
    let kb = Arc::new(KnowledgeBase::open(KbConfig::default()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let kb = Arc::clone(&kb);
            std::thread::spawn(move || {
                assert!(!kb.list_classes().is_empty());
                kb.submit(&literal(&format!("p{i}"), "Person", "hasName", "x"))
                    .unwrap()
                    .subject_iri
            })
        })
        .collect();

    let subjects: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(subjects.len(), 8);

    let OntologyStatus::Loaded(report) = kb.ensure_ontology() else {
        panic!("ontology should be loaded");
    };
    assert_eq!(
        kb.triple_count().unwrap(),
        report.triples_added + 8 * 3
    );
}

#[test]
fn export_ntriples_covers_the_store() {
    let kb = test_kb();
    kb.submit(&literal("Ada", "Person", "hasName", "Ada Lovelace"))
        .unwrap();

    let bytes = kb.export(ExportFormat::NTriples).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines = text.lines().filter(|l| !l.trim().is_empty()).count();
    assert_eq!(lines, kb.triple_count().unwrap());
    assert!(text.contains("\"Ada Lovelace\""));

    let json = kb.export(ExportFormat::Json).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&json).unwrap();
    assert!(rows.iter().any(|r| r["object_label"] == "Ada Lovelace"));
}

#[test]
fn info_reports_counts() {
    let kb = test_kb();
    kb.submit(&literal("Ada", "Person", "hasName", "x")).unwrap();
    let info = kb.info().unwrap();
    assert_eq!(info.class_count, 6);
    assert_eq!(info.property_count, 10);
    assert_eq!(info.instance_count, 1);
    assert_eq!(info.triple_count, kb.triple_count().unwrap());
}
