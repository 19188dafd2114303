//! Error types for the serializer.

use crate::schema::{CheckError, ErrorNode, SchemaError};

/// Failure of a direct scalar codec call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScalarError {
    /// No codec is registered under the name.
    #[error("No scalar handler for {name}")]
    MissingHandler {
        /// The requested scalar name.
        name: String,
    },

    /// The codec rejected the value.
    #[error("{0}")]
    Rejected(String),
}

/// Failure of a record-shaped deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    /// The input does not conform. `errors` is keyed by field name below
    /// the top-level `path`.
    #[error("could not deserialize {path}: {errors}")]
    Invalid {
        /// Top-level path segment, such as `params` or a definition name.
        path: String,
        /// Per-field error tree.
        errors: ErrorNode,
    },

    /// The schema is inconsistent; never part of an error tree.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DeserializeError {
    pub(crate) fn at(path: &str, error: CheckError) -> Self {
        match error {
            CheckError::Invalid(errors) => Self::Invalid {
                path: path.to_owned(),
                errors,
            },
            CheckError::Schema(schema) => Self::Schema(schema),
        }
    }

    /// Returns the per-field error tree of an input error.
    #[must_use]
    pub const fn errors(&self) -> Option<&ErrorNode> {
        match self {
            Self::Invalid { errors, .. } => Some(errors),
            Self::Schema(_) => None,
        }
    }

    /// Renders the error tree in its canonical JSON shape, or `None` for a
    /// schema error.
    #[must_use]
    pub fn to_json(&self) -> Option<serde_json::Value> {
        self.errors()
            .and_then(|errors| serde_json::to_value(errors).ok())
    }
}
