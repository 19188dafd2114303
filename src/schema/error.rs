//! Error types for schema authoring and value checking.
//!
//! Two disjoint classes exist. [`SchemaError`] means the schema itself is
//! wrong and is raised immediately. [`ErrorNode`] describes why an input value
//! does not conform and is always returned as data, aggregated across sibling
//! fields.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::diagnostic::SchemaDiagnostic;

/// Errors in the schema itself, or in how it is being assembled.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// YAML deserialization of a schema document failed.
    #[error("YAML deserialization failed: {message}")]
    Deserialize {
        /// Parser error message.
        message: String,
        /// Structured diagnostic payload when a source location is known.
        diagnostic: Option<SchemaDiagnostic>,
    },

    /// A definition or member name failed lexical validation.
    #[error("invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// The identifier string that failed validation.
        identifier: String,
        /// A human-readable explanation of why the identifier is invalid.
        reason: String,
    },

    /// A type notation such as `[Post?]` could not be parsed.
    #[error("invalid type notation '{notation}': {reason}")]
    InvalidTypeNotation {
        /// The notation as written.
        notation: String,
        /// A human-readable explanation of the problem.
        reason: String,
    },

    /// Two definitions share a name within one document.
    #[error("duplicate definition for {name}")]
    DuplicateDefinition {
        /// The repeated name.
        name: String,
    },

    /// Two members of one kind share a name within a definition.
    #[error("{definition} declares {member} more than once")]
    DuplicateMember {
        /// The owning definition.
        definition: String,
        /// The repeated member name.
        member: String,
    },

    /// A type reference names neither a built-in nor a definition.
    #[error("type {name} referenced by {definition} not found")]
    UnknownType {
        /// Definition that holds the reference.
        definition: String,
        /// The unresolved type name.
        name: String,
    },

    /// A type name could not be resolved while checking a value. Validating
    /// the document first rules this out.
    #[error("type {name} could not be resolved; the document has not been validated")]
    Unresolved {
        /// The unresolved type name.
        name: String,
    },

    /// A scalar falls back to a type that does not exist.
    #[error("fallback type {fallback} of scalar {definition} not found")]
    UnknownFallback {
        /// The scalar definition.
        definition: String,
        /// The unresolved fallback name.
        fallback: String,
    },

    /// A chain of scalar fallbacks loops back on itself.
    #[error("scalar {definition} has a cyclic fallback chain: {chain}")]
    CyclicFallback {
        /// The scalar definition where the cycle was found.
        definition: String,
        /// The chain rendered as `A -> B -> A`.
        chain: String,
    },

    /// An enum declares no values.
    #[error("enum {definition} has no values")]
    EmptyEnum {
        /// The enum definition.
        definition: String,
    },

    /// An enum declares the same value twice.
    #[error("enum {definition} declares value {value} more than once")]
    DuplicateEnumValue {
        /// The enum definition.
        definition: String,
        /// The repeated value.
        value: String,
    },

    /// A non-static resource declares no identity properties.
    #[error("instanced resource {definition} has no id properties")]
    MissingIdentity {
        /// The resource definition.
        definition: String,
    },

    /// A custom validator was registered for a scalar that does not exist.
    #[error("scalar {name} not found")]
    UnknownScalar {
        /// The requested scalar name.
        name: String,
    },

    /// A codec for the named scalar is already registered.
    #[error("scalar handler for {name} already registered")]
    DuplicateScalarHandler {
        /// The scalar name.
        name: String,
    },

    /// A record-shaped deserialization was requested for a definition that
    /// is neither an interface nor a resource.
    #[error("{name} is not an interface or resource definition")]
    UnknownRecordType {
        /// The requested definition name.
        name: String,
    },

    /// Any of the above, located in schema source text.
    #[error("{error}")]
    Located {
        /// The underlying error.
        error: Box<Self>,
        /// Where in the source the error was found.
        diagnostic: SchemaDiagnostic,
    },
}

impl SchemaError {
    /// Returns the structured diagnostic payload, when the error was raised
    /// while loading schema source text with a known location.
    #[must_use]
    pub const fn diagnostic(&self) -> Option<&SchemaDiagnostic> {
        match self {
            Self::Deserialize { diagnostic, .. } => diagnostic.as_ref(),
            Self::Located { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }

    /// Returns the name of the definition the error is about, if any.
    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        match self {
            Self::DuplicateDefinition { name } => Some(name),
            Self::UnknownType { definition, .. }
            | Self::DuplicateMember { definition, .. }
            | Self::UnknownFallback { definition, .. }
            | Self::CyclicFallback { definition, .. }
            | Self::EmptyEnum { definition }
            | Self::DuplicateEnumValue { definition, .. }
            | Self::MissingIdentity { definition } => Some(definition),
            Self::Located { error, .. } => error.definition(),
            _ => None,
        }
    }
}

/// A structured value error: a message, or a mapping from field path segment
/// to a nested error.
///
/// Serializes to a plain string or a nested object, keys in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorNode {
    /// A terminal message.
    Leaf(String),
    /// Per-field (or per-index) nested errors.
    Branch(IndexMap<String, Self>),
}

impl ErrorNode {
    /// Creates a leaf error from a message.
    pub fn leaf(message: impl Into<String>) -> Self {
        Self::Leaf(message.into())
    }

    /// Returns the message of a leaf node.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Leaf(message) => Some(message),
            Self::Branch(_) => None,
        }
    }

    /// Returns the nested error at `key` of a branch node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch(entries) => entries.get(key),
        }
    }

    /// Follows a path of keys through nested branches.
    #[must_use]
    pub fn at(&self, path: &[&str]) -> Option<&Self> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Returns the keys of a branch node, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let entries = match self {
            Self::Leaf(_) => None,
            Self::Branch(entries) => Some(entries),
        };
        entries
            .into_iter()
            .flat_map(|e| e.keys().map(String::as_str))
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(message) => f.write_str(message),
            Self::Branch(entries) => {
                f.write_str("{")?;
                for (i, (key, node)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {node}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Failure of a structural value check.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The value does not conform; the node says where and why.
    #[error("value does not conform: {0}")]
    Invalid(ErrorNode),

    /// A type name could not be resolved while checking. This only happens
    /// when the document was not validated first.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl CheckError {
    /// Shorthand for an [`CheckError::Invalid`] leaf.
    pub fn leaf(message: impl Into<String>) -> Self {
        Self::Invalid(ErrorNode::leaf(message))
    }

    /// Returns the value error node, if this is a value error.
    #[must_use]
    pub const fn node(&self) -> Option<&ErrorNode> {
        match self {
            Self::Invalid(node) => Some(node),
            Self::Schema(_) => None,
        }
    }
}

/// Result of a structural value check.
pub type CheckResult = Result<(), CheckError>;

/// Collects sibling value errors under their path segments without stopping
/// at the first one. Schema errors are not collected; they abort.
#[derive(Debug, Default)]
pub(crate) struct ErrorCollector {
    entries: IndexMap<String, ErrorNode>,
}

impl ErrorCollector {
    /// Records `node` under `key`.
    pub(crate) fn push(&mut self, key: impl Into<String>, node: ErrorNode) {
        self.entries.insert(key.into(), node);
    }

    /// Records the value error carried by `result`, if any, under `key`.
    ///
    /// Returns the successful value, `None` after recording a value error,
    /// or the schema error unchanged.
    pub(crate) fn record<T>(
        &mut self,
        key: impl Into<String>,
        result: Result<T, CheckError>,
    ) -> Result<Option<T>, SchemaError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(CheckError::Invalid(node)) => {
                self.push(key, node);
                Ok(None)
            }
            Err(CheckError::Schema(error)) => Err(error),
        }
    }

    /// Finishes collection: success when nothing was recorded, otherwise a
    /// branch with every recorded entry.
    pub(crate) fn finish(self) -> CheckResult {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(CheckError::Invalid(ErrorNode::Branch(self.entries)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_without_entries_succeeds() {
        assert!(ErrorCollector::default().finish().is_ok());
    }

    #[test]
    fn collector_keeps_every_sibling() {
        let mut errors = ErrorCollector::default();
        errors.push("b", ErrorNode::leaf("first"));
        let recorded = errors
            .record::<()>("a", Err(CheckError::leaf("second")))
            .expect("value errors are collected");
        assert!(recorded.is_none());
        let Err(CheckError::Invalid(node)) = errors.finish() else {
            panic!("collector with entries should fail");
        };
        assert_eq!(node.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn collector_passes_schema_errors_through() {
        let mut errors = ErrorCollector::default();
        let result = errors.record::<()>(
            "a",
            Err(CheckError::Schema(SchemaError::UnknownScalar {
                name: "Nope".to_owned(),
            })),
        );
        assert!(matches!(result, Err(SchemaError::UnknownScalar { .. })));
        assert!(errors.finish().is_ok());
    }

    #[test]
    fn nested_node_serializes_to_canonical_shape() {
        let mut inner = IndexMap::new();
        inner.insert("1".to_owned(), ErrorNode::leaf("Value must be a string"));
        let mut outer = IndexMap::new();
        outer.insert("tags".to_owned(), ErrorNode::Branch(inner));
        outer.insert("id".to_owned(), ErrorNode::leaf("Value must not be null"));
        let node = ErrorNode::Branch(outer);

        let rendered = serde_json::to_string(&node).expect("should serialize");
        assert_eq!(
            rendered,
            r#"{"tags":{"1":"Value must be a string"},"id":"Value must not be null"}"#
        );
        assert_eq!(
            node.at(&["tags", "1"]).and_then(ErrorNode::message),
            Some("Value must be a string")
        );
    }

    #[test]
    fn located_error_reports_inner_definition() {
        let error = SchemaError::Located {
            error: Box::new(SchemaError::EmptyEnum {
                definition: "Status".to_owned(),
            }),
            diagnostic: SchemaDiagnostic {
                code: crate::schema::SchemaDiagnosticCode::ValidationFailure,
                location: crate::schema::SourceLocation {
                    source: "<inline>".to_owned(),
                    line: 1,
                    column: 1,
                },
                message: "enum Status has no values".to_owned(),
            },
        };
        assert_eq!(error.definition(), Some("Status"));
        assert_eq!(error.to_string(), "enum Status has no values");
        assert!(error.diagnostic().is_some());
    }
}
