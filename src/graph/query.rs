//! Parameterized SPARQL queries.
//!
//! Templates reference parameters as `$name`. Parameters are bound only to
//! already-validated RDF terms and rendered in their canonical N-Triples form,
//! so user input can never change the shape of a query.

use std::collections::HashMap;

use oxigraph::model::NamedNodeRef;

use crate::error::QueryError;
use crate::vocab;

/// A SPARQL query template with `$name` placeholders.
#[derive(Debug, Clone)]
pub struct SparqlQuery {
    template: String,
    bindings: HashMap<String, String>,
}

impl SparqlQuery {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            bindings: HashMap::new(),
        }
    }

    /// Bind `$name` to an IRI.
    pub fn bind_iri(mut self, name: &str, iri: NamedNodeRef<'_>) -> Self {
        self.bindings.insert(name.to_string(), iri.to_string());
        self
    }

    /// Render the final query text with the standard prefixes prepended.
    ///
    /// Fails if the template references a parameter that was never bound.
    pub fn render(&self) -> Result<String, QueryError> {
        let mut out = String::with_capacity(self.template.len() + 256);
        for (prefix, ns) in vocab::standard_prefixes() {
            out.push_str(&format!("PREFIX {prefix}: <{ns}>\n"));
        }

        let mut chars = self.template.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            let mut end = start + 1;
            while let Some(&(i, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    end = i + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let name = &self.template[start + 1..end];
            if name.is_empty() {
                out.push('$');
                continue;
            }
            match self.bindings.get(name) {
                Some(term) => out.push_str(term),
                None => {
                    return Err(QueryError::Unbound {
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(out)
    }
}
