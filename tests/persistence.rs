//! Persistence tests: the on-disk store survives a reopen.
//!
//! These tests verify that the ontology is loaded only once per store and
//! that submitted entities are still listed after restart.

use ontoform::config::KbConfig;
use ontoform::kb::{KnowledgeBase, OntologyStatus};
use ontoform::mutation::EntitySubmission;

const NS: &str = "https://example.org/onto/";

fn persistent_kb(dir: &std::path::Path) -> KnowledgeBase {
    KnowledgeBase::open(KbConfig {
        data_dir: Some(dir.to_path_buf()),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn ontology_is_not_reloaded_after_restart() {
    let dir = tempfile::TempDir::new().unwrap();

    let count = {
        let kb = persistent_kb(dir.path());
        let OntologyStatus::Loaded(report) = kb.ensure_ontology() else {
            panic!("first load should succeed");
        };
        assert!(!report.already_loaded);
        kb.triple_count().unwrap()
    };

    {
        let kb = persistent_kb(dir.path());
        let OntologyStatus::Loaded(report) = kb.ensure_ontology() else {
            panic!("second load should succeed");
        };
        assert!(report.already_loaded);
        assert_eq!(report.triples_added, 0);
        assert_eq!(kb.triple_count().unwrap(), count);
    }
}

#[test]
fn submitted_entities_survive_restart() {
    let dir = tempfile::TempDir::new().unwrap();

    let subject = {
        let kb = persistent_kb(dir.path());
        kb.submit(&EntitySubmission {
            subject_name: "Ada".into(),
            subject_class_iri: format!("{NS}Employee"),
            property_iri: format!("{NS}salary"),
            value_kind: "literal".into(),
            literal_value: Some("1000".into()),
            instance_iri: None,
        })
        .unwrap()
        .subject_iri
    };

    {
        let kb = persistent_kb(dir.path());
        let people = kb.list_instances(Some(&format!("{NS}Person"))).into_items();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].iri, subject);
        assert_eq!(people[0].label, "Ada");
        assert_eq!(kb.resolve_label(&subject), "Ada");
    }
}

#[test]
fn config_saved_and_reloaded_opens_same_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    let config = KbConfig {
        data_dir: Some(dir.path().join("store")),
        label_language: "de".into(),
        ..Default::default()
    };
    config.save(&config_path).unwrap();

    let loaded = KbConfig::load(&config_path).unwrap();
    assert_eq!(loaded, config);

    let kb = KnowledgeBase::open(loaded).unwrap();
    kb.ensure_ontology();
    assert!(dir.path().join("store").exists());
    assert!(kb.info().unwrap().persistent);
}
