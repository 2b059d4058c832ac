//! Rich diagnostic error types for ontoform.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for ontoform.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum OntoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("triple store unavailable: {message}")]
    #[diagnostic(
        code(ontoform::store::unavailable),
        help(
            "The triple store could not be opened. Check that the data directory \
             exists, is writable, and is not locked by another ontoform process."
        )
    )]
    Unavailable { message: String },

    #[error("I/O error: {source}")]
    #[diagnostic(
        code(ontoform::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("SPARQL query error: {message}")]
    #[diagnostic(
        code(ontoform::store::sparql),
        help(
            "The SPARQL query failed. Check the query syntax and ensure \
             the oxigraph store is initialized."
        )
    )]
    Sparql { message: String },

    #[error("insert failed: {message}")]
    #[diagnostic(
        code(ontoform::store::insert),
        help("The store rejected the write. Check disk space and store permissions.")
    )]
    Insert { message: String },

    #[error("serialization failed: {message}")]
    #[diagnostic(
        code(ontoform::store::dump),
        help("The graph could not be serialized in the requested format.")
    )]
    Dump { message: String },
}

// ---------------------------------------------------------------------------
// Ontology load errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OntologyError {
    #[error("failed to fetch ontology from {url}: {message}")]
    #[diagnostic(
        code(ontoform::ontology::fetch),
        help(
            "The ontology document could not be downloaded. Check the URL, your network \
             connection, and that the URL points at the raw document rather than an HTML page."
        )
    )]
    Fetch { url: String, message: String },

    #[error("failed to read ontology file: {path}")]
    #[diagnostic(
        code(ontoform::ontology::io),
        help("Ensure the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ontology from {origin}: {message}")]
    #[diagnostic(
        code(ontoform::ontology::parse),
        help(
            "The document is not valid in the selected RDF format. Set `ontology_format` \
             explicitly (turtle, rdfxml, ntriples) if format detection guessed wrong."
        )
    )]
    Parse { origin: String, message: String },

    #[error("unknown ontology format: {format}")]
    #[diagnostic(
        code(ontoform::ontology::format),
        help("Supported formats are: turtle, rdfxml, ntriples.")
    )]
    UnknownFormat { format: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("required field is missing: {field}")]
    #[diagnostic(
        code(ontoform::validation::missing),
        help("Fill in every required field of the entry form before submitting.")
    )]
    MissingField { field: &'static str },

    #[error("field {field} is not a valid IRI: {value}")]
    #[diagnostic(
        code(ontoform::validation::iri),
        help("IRIs must be absolute, e.g. `https://example.org/onto/Person`.")
    )]
    InvalidIri {
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("unknown value kind: {value}")]
    #[diagnostic(
        code(ontoform::validation::value_kind),
        help("The value kind must be either `literal` or `instance`.")
    )]
    UnknownValueKind { value: String },
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("invalid class IRI {value}: {message}")]
    #[diagnostic(
        code(ontoform::query::invalid_iri),
        help("Pass the full IRI of a class as returned by the class list.")
    )]
    InvalidIri { value: String, message: String },

    #[error("unbound query parameter: ${name}")]
    #[diagnostic(
        code(ontoform::query::unbound),
        help("Every `${name}` placeholder in a parameterized query must be bound before execution.")
    )]
    Unbound { name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Mutation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum MutationError {
    #[error("write failed for {subject} after {written_before} of 3 triples: {source}")]
    #[diagnostic(
        code(ontoform::mutation::write),
        help(
            "The submission was valid but the store rejected a write. Triples written \
             before the failure are not rolled back; inspect the subject with `ontoform export`."
        )
    )]
    Write {
        subject: String,
        written_before: usize,
        #[source]
        source: StoreError,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(ontoform::config::no_home),
        help("Set the HOME environment variable or pass `--config` explicitly.")
    )]
    NoHome,

    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(ontoform::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(ontoform::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(ontoform::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(ontoform::config::invalid), help("Fix the field in the config file or the matching ONTOFORM_* environment variable."))]
    Invalid { message: String },
}

/// Convenience alias for functions returning ontoform results.
pub type OntoResult<T> = std::result::Result<T, OntoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_to_onto_error() {
        let err = StoreError::Unavailable {
            message: "locked".into(),
        };
        let top: OntoError = err.into();
        assert!(matches!(top, OntoError::Store(StoreError::Unavailable { .. })));
    }

    #[test]
    fn query_error_wraps_store_error() {
        let store_err = StoreError::Sparql {
            message: "boom".into(),
        };
        let query_err: QueryError = store_err.into();
        assert!(matches!(query_err, QueryError::Store(StoreError::Sparql { .. })));
    }

    #[test]
    fn validation_messages_name_the_field() {
        let err = ValidationError::MissingField {
            field: "literal_value",
        };
        assert!(format!("{err}").contains("literal_value"));
    }
}
