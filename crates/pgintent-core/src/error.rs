//! Error types for schema construction and statement compilation.

use thiserror::Error;

/// Errors raised while building a schema or compiling a statement.
///
/// None of these are transient: this layer performs no I/O, so every error
/// points at a predicate, entity or schema the caller has to fix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The schema cannot be constructed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A predicate, entity or ordering references an unmapped property.
    #[error("property '{property}' is not mapped to a column")]
    SchemaResolution {
        /// The unresolved property name.
        property: String,
    },

    /// A property path navigates into a column that is not JSON-typed.
    #[error("cannot navigate path '{path}': column '{column}' is not JSON-typed")]
    UnsupportedPath {
        /// The full dotted property path.
        path: String,
        /// The column the first segment resolved to.
        column: String,
    },

    /// A value cannot be encoded for the column it is bound against.
    #[error("cannot encode value: {0}")]
    Encoding(String),
}

impl Error {
    pub(crate) fn unresolved(property: impl Into<String>) -> Self {
        Self::SchemaResolution {
            property: property.into(),
        }
    }
}

/// Result type alias for schema and statement operations.
pub type Result<T> = std::result::Result<T, Error>;
