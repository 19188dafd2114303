//! YAML schema loading.
//!
//! Provides [`load_document`], which deserializes a YAML schema into a
//! validated [`Document`]. Definition and member names are checked at
//! deserialization time (via the `DefinitionName` / `MemberName`
//! newtypes); type notations are parsed during conversion; whole-document
//! consistency is checked last.

use tracing::debug;

use super::diagnostic::{SchemaDiagnostic, SchemaDiagnosticCode, SourceLocation};
use super::document::Document;
use super::error::SchemaError;
use super::raw::{RawFailure, RawSchema};

/// Synthetic source identifier used by [`load_document`].
const INLINE_SOURCE: &str = "<inline>";

/// Loads and validates a schema document from a YAML string.
///
/// The document has up to four sections, `Scalars`, `Enums`, `Interfaces`
/// and `Resources` (lowercase aliases accepted), each a list of
/// definitions. Definitions are added in section order, then in source
/// order within a section. Unknown keys are rejected.
///
/// # Errors
///
/// Returns [`SchemaError::Deserialize`] if the YAML is malformed, does not
/// match the schema shape, or contains an invalid name. Returns
/// [`SchemaError::Located`] wrapping the underlying error when a type
/// notation is malformed, a name is repeated, or the document fails
/// validation.
///
/// # Examples
///
///     use dinoql::schema::load_document;
///
///     let yaml = r#"
///     Enums:
///       - name: Status
///         values: [ACTIVE, INACTIVE]
///     Resources:
///       - name: Me
///         properties:
///           - { name: id, type: integer, id: true }
///           - { name: status, type: Status }
///     "#;
///     let doc = load_document(yaml).unwrap();
///     assert_eq!(doc.len(), 2);
///     assert!(doc.is_validated());
pub fn load_document(input: &str) -> Result<Document, SchemaError> {
    load_document_with_source(INLINE_SOURCE, input)
}

/// Loads a schema document from YAML and records diagnostics against an
/// explicit source identifier.
///
/// Behaves like [`load_document`] but associates parser, conversion and
/// validation diagnostics with `source`.
///
/// # Errors
///
/// See [`load_document`].
pub fn load_document_with_source(source: &str, input: &str) -> Result<Document, SchemaError> {
    let raw: RawSchema = serde_saphyr::from_str(input).map_err(|error| {
        let message = error.to_string();
        let diagnostic = error
            .location()
            .map(|location| parse_diagnostic(source, &message, location));
        SchemaError::Deserialize {
            message,
            diagnostic,
        }
    })?;

    let definitions = raw
        .to_definitions()
        .map_err(|RawFailure { error, location }| {
            located(
                *error,
                source,
                location,
                SchemaDiagnosticCode::ConversionFailure,
            )
        })?;

    let mut document = Document::new();
    for (definition, location) in definitions {
        document.add_definition(definition).map_err(|error| {
            located(
                error,
                source,
                location,
                SchemaDiagnosticCode::ConversionFailure,
            )
        })?;
    }

    document
        .validate_schema()
        .map_err(|error| attach_validation_diagnostic(error, source, &raw))?;

    debug!(
        source,
        definitions = document.len(),
        "loaded schema document"
    );
    Ok(document)
}

fn attach_validation_diagnostic(error: SchemaError, source: &str, raw: &RawSchema) -> SchemaError {
    match raw.location_for_error(&error) {
        Some(location) => located(
            error,
            source,
            location,
            SchemaDiagnosticCode::ValidationFailure,
        ),
        None => error,
    }
}

fn located(
    error: SchemaError,
    source: &str,
    location: serde_saphyr::Location,
    code: SchemaDiagnosticCode,
) -> SchemaError {
    let diagnostic = SchemaDiagnostic {
        code,
        location: location_for_source(source, location),
        message: error.to_string(),
    };
    SchemaError::Located {
        error: Box::new(error),
        diagnostic,
    }
}

fn parse_diagnostic(
    source: &str,
    message: &str,
    location: serde_saphyr::Location,
) -> SchemaDiagnostic {
    SchemaDiagnostic {
        code: SchemaDiagnosticCode::ParseFailure,
        location: location_for_source(source, location),
        message: first_line(message),
    }
}

fn location_for_source(source: &str, location: serde_saphyr::Location) -> SourceLocation {
    let line = usize::try_from(location.line()).ok().unwrap_or(usize::MAX);
    let column = usize::try_from(location.column())
        .ok()
        .unwrap_or(usize::MAX);
    SourceLocation {
        source: source.to_owned(),
        line,
        column,
    }
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or(message).to_owned()
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
