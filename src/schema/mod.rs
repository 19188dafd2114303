//! Schema model, validation and loading.
//!
//! A [`Document`] holds named [`Definition`]s: scalars, enums, interfaces and
//! resources. Definitions refer to each other by name only; every reference
//! is resolved through the document, so mutually recursive resources need
//! no back-pointers. [`load_document`] builds a validated document from YAML
//! using `serde-saphyr` with strict unknown-key rejection and source
//! diagnostics.

mod definition;
mod diagnostic;
mod document;
mod error;
mod identifier;
mod loader;
mod newtypes;
mod operation;
mod raw;
mod types;
mod validate;
mod value;

pub use definition::{
    Definition, DefinitionKind, Enum, Interface, Resource, Scalar, ScalarPredicate,
};
pub use diagnostic::{SchemaDiagnostic, SchemaDiagnosticCode, SourceLocation};
pub use document::{Document, ValidationState};
pub use error::{CheckError, CheckResult, ErrorNode, SchemaError};
pub use identifier::{validate_definition_name, validate_identifier};
pub use loader::{load_document, load_document_with_source};
pub use newtypes::{DefinitionName, MemberName};
pub use operation::{Action, Method, Operation, Query};
pub use types::{BuiltinScalar, Field, Parameter, Property, Type};
pub use value::{Record, Value};

pub(crate) use error::ErrorCollector;
