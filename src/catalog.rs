//! Instance catalog: existing individuals, optionally scoped to a class.
//!
//! Scoping walks the subclass hierarchy downward, so an instance typed
//! `Employee` is listed under `Person` when `Employee ⊂ Person`.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::error::QueryError;
use crate::graph::GraphStore;
use crate::label::LabelPolicy;
use crate::schema::{parse_class_iri, Listing, SchemaIndex};
use crate::vocab;

/// An existing instance offered in a picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceEntry {
    pub iri: String,
    pub label: String,
}

/// Collect instances from an index.
///
/// `base_namespace`, when given, is never listed as an instance, with or
/// without its trailing separator.
pub fn instances(
    index: &SchemaIndex,
    class_iri: Option<&str>,
    base_namespace: Option<&str>,
) -> Vec<InstanceEntry> {
    let scope: Option<HashSet<String>> =
        class_iri.map(|class| index.hierarchy().descendants(class).into_iter().collect());

    let base_trimmed = base_namespace.map(|ns| ns.trim_end_matches(['/', '#']));
    let is_base = |iri: &str| {
        base_namespace.is_some_and(|ns| iri == ns) || base_trimmed.is_some_and(|ns| iri == ns)
    };

    let mut subjects: BTreeSet<&str> = BTreeSet::new();
    for (subject, ty) in &index.typings {
        let subject = subject.as_str();
        if let Some(scope) = &scope {
            if !scope.contains(ty) {
                continue;
            }
        }
        if index.is_class(subject)
            || index.is_property(subject)
            || index.ontology_headers.contains(subject)
            || index.datatypes.contains(subject)
            || vocab::is_reserved(subject)
            || is_base(subject)
        {
            continue;
        }
        subjects.insert(subject);
    }

    let mut entries: Vec<InstanceEntry> = subjects
        .into_iter()
        .map(|iri| InstanceEntry {
            iri: iri.to_string(),
            label: index.label_of(iri),
        })
        .collect();
    entries.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.iri.cmp(&b.iri)));
    entries
}

/// List instances from the store, optionally restricted to a class and its subclasses.
pub fn list_instances(
    store: &GraphStore,
    class_iri: Option<&str>,
    base_namespace: Option<&str>,
    policy: &LabelPolicy,
) -> Listing<InstanceEntry> {
    let result = load_instances(store, class_iri, base_namespace, policy);
    Listing::from_result("list_instances", result)
}

fn load_instances(
    store: &GraphStore,
    class_iri: Option<&str>,
    base_namespace: Option<&str>,
    policy: &LabelPolicy,
) -> Result<Vec<InstanceEntry>, QueryError> {
    let class = class_iri.map(parse_class_iri).transpose()?;
    let index = SchemaIndex::load(store, policy.clone())?;
    Ok(instances(
        &index,
        class.as_ref().map(|c| c.as_str()),
        base_namespace,
    ))
}
