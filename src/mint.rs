//! Identifier minting for new instances.
//!
//! Identity is a 128-bit random token; the optional hint only makes the IRI
//! easier to read and carries no uniqueness guarantee of its own.

use oxigraph::model::NamedNode;
use uuid::Uuid;

use crate::error::ValidationError;

/// Longest slug taken from a hint.
const MAX_SLUG_LEN: usize = 32;

/// Mint a fresh instance IRI under `base_namespace`.
///
/// A `/` is appended to the namespace unless it already ends in `/` or `#`.
pub fn mint_instance_iri(
    base_namespace: &str,
    hint: Option<&str>,
) -> Result<NamedNode, ValidationError> {
    let token = Uuid::new_v4().simple().to_string();
    let separator = if base_namespace.ends_with('/') || base_namespace.ends_with('#') {
        ""
    } else {
        "/"
    };

    let local = match hint.map(slugify).filter(|s| !s.is_empty()) {
        Some(slug) => format!("{slug}-{token}"),
        None => token,
    };

    let iri = format!("{base_namespace}{separator}{local}");
    NamedNode::new(iri.as_str()).map_err(|e| ValidationError::InvalidIri {
        field: "base_namespace",
        value: base_namespace.to_string(),
        message: e.to_string(),
    })
}

/// Reduce a human name to an IRI-safe slug.
///
/// ASCII alphanumerics are kept, runs of anything else collapse to a single `_`.
pub fn slugify(hint: &str) -> String {
    let mut slug = String::with_capacity(hint.len().min(MAX_SLUG_LEN));
    let mut pending_sep = false;
    for c in hint.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    slug
}
