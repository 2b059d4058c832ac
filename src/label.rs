//! Label resolution: human-readable names for graph entities.
//!
//! The fallback chain is: preferred `rdfs:label` → local name fragment of the
//! IRI → the full IRI. Selection and fragment extraction are pure functions;
//! [`resolve_label`] wraps them with a store lookup and never fails.

use oxigraph::model::{Literal, NamedNodeRef, Term};

use crate::graph::{GraphStore, SparqlQuery};

/// Which language tags count as a preferred label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPolicy {
    /// Primary language subtag, e.g. `en`.
    pub language: String,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            language: "en".into(),
        }
    }
}

impl LabelPolicy {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
        }
    }

    /// Rank a candidate label; `None` means the label is not acceptable.
    ///
    /// Exact language match ranks first, then untagged, then regional variants
    /// (`en-GB` for `en`).
    fn rank(&self, literal: &Literal) -> Option<u8> {
        match literal.language() {
            Some(tag) if tag.eq_ignore_ascii_case(&self.language) => Some(0),
            None => Some(1),
            Some(tag) => {
                let tag = tag.to_ascii_lowercase();
                let primary = tag.split('-').next().unwrap_or_default();
                (primary == self.language).then_some(2)
            }
        }
    }

    /// Pick the preferred label among candidates.
    ///
    /// Ties on rank break on the smaller lexical value so the choice does not
    /// depend on store iteration order.
    pub fn select<'a>(&self, candidates: impl IntoIterator<Item = &'a Literal>) -> Option<String> {
        candidates
            .into_iter()
            .filter_map(|lit| self.rank(lit).map(|rank| (rank, lit.value())))
            .filter(|(_, value)| !value.trim().is_empty())
            .min()
            .map(|(_, value)| value.to_string())
    }
}

/// The substring after the last `#` or `/`.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(idx) => &iri[idx + 1..],
        None => "",
    }
}

/// Local name of an IRI, or the full IRI when the fragment is empty.
pub fn fallback_label(iri: &str) -> String {
    let name = local_name(iri);
    if name.is_empty() {
        iri.to_string()
    } else {
        name.to_string()
    }
}

/// Resolve the display label of any term.
pub fn resolve_label(term: &Term, store: &GraphStore, policy: &LabelPolicy) -> String {
    match term {
        Term::Literal(literal) => literal.value().to_string(),
        Term::NamedNode(node) => resolve_iri_label(node.as_ref(), store, policy),
        other => other.to_string(),
    }
}

/// Resolve the display label of an IRI.
pub fn resolve_iri_label(iri: NamedNodeRef<'_>, store: &GraphStore, policy: &LabelPolicy) -> String {
    let query = SparqlQuery::new("SELECT ?label WHERE { $entity rdfs:label ?label }")
        .bind_iri("entity", iri);

    let rows = match store.select(&query) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::debug!(iri = iri.as_str(), "label lookup failed: {e}");
            return iri.as_str().to_string();
        }
    };

    let labels: Vec<Literal> = rows
        .iter()
        .filter_map(|row| match row.get("label") {
            Some(Term::Literal(lit)) => Some(lit.clone()),
            _ => None,
        })
        .collect();

    policy
        .select(&labels)
        .unwrap_or_else(|| fallback_label(iri.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;
    use crate::vocab;
    use oxigraph::model::NamedNode;

    fn tagged(value: &str, lang: &str) -> Literal {
        Literal::new_language_tagged_literal(value, lang).unwrap()
    }

    #[test]
    fn local_name_after_hash_or_slash() {
        assert_eq!(local_name("https://example.org/onto#Person"), "Person");
        assert_eq!(local_name("https://example.org/onto/worksFor"), "worksFor");
        assert_eq!(local_name("https://example.org/onto/"), "");
        assert_eq!(local_name("urn:isbn:0451450523"), "");
    }

    #[test]
    fn fallback_uses_full_iri_without_fragment() {
        assert_eq!(fallback_label("https://example.org/onto/Person"), "Person");
        assert_eq!(fallback_label("https://example.org/onto/"), "https://example.org/onto/");
        assert_eq!(fallback_label("urn:isbn:0451450523"), "urn:isbn:0451450523");
    }

    #[test]
    fn english_preferred_over_untagged_and_others() {
        let policy = LabelPolicy::default();
        let labels = vec![
            tagged("Person", "de"),
            Literal::new_simple_literal("person"),
            tagged("Person (en)", "en"),
        ];
        assert_eq!(policy.select(&labels).as_deref(), Some("Person (en)"));
    }

    #[test]
    fn regional_variant_accepted_foreign_rejected() {
        let policy = LabelPolicy::default();
        assert_eq!(
            policy.select(&[tagged("Colour", "en-GB")]).as_deref(),
            Some("Colour")
        );
        assert_eq!(policy.select(&[tagged("Farbe", "de")]), None);
    }

    #[test]
    fn resolves_literal_directly() {
        let store = GraphStore::in_memory().unwrap();
        let term = Term::from(Literal::new_simple_literal("42"));
        assert_eq!(resolve_label(&term, &store, &LabelPolicy::default()), "42");
    }

    #[test]
    fn resolves_via_store_then_fragment() {
        let store = GraphStore::in_memory().unwrap();
        let ada = NamedNode::new("https://example.org/data/ada").unwrap();
        let bob = NamedNode::new("https://example.org/data/bob").unwrap();
        store
            .insert(&Triple::new(
                ada.clone(),
                vocab::LABEL.into_owned(),
                Literal::new_simple_literal("Ada Lovelace"),
            ))
            .unwrap();

        let policy = LabelPolicy::default();
        assert_eq!(resolve_iri_label(ada.as_ref(), &store, &policy), "Ada Lovelace");
        assert_eq!(resolve_iri_label(bob.as_ref(), &store, &policy), "bob");
    }
}
