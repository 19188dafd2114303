//! Structured diagnostics for schema document loading failures.
//!
//! Parser, conversion and validation failures raised by the YAML loader carry
//! one of these payloads so tools can point at the offending node.

use std::fmt;

/// Stable diagnostic classification codes for schema loading failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDiagnosticCode {
    /// YAML deserialization or parse failure.
    ParseFailure,
    /// A malformed type notation or a definition that could not be added.
    ConversionFailure,
    /// Whole-document schema validation failure.
    ValidationFailure,
}

impl SchemaDiagnosticCode {
    /// Returns the stable, machine-readable code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseFailure => "schema.parse_failure",
            Self::ConversionFailure => "schema.conversion_failure",
            Self::ValidationFailure => "schema.validation_failure",
        }
    }
}

/// Source location attached to a schema diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file or source identifier.
    pub source: String,
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

/// Structured schema diagnostic payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDiagnostic {
    /// Stable diagnostic code for programmatic handling.
    pub code: SchemaDiagnosticCode,
    /// Primary source location.
    pub location: SourceLocation,
    /// Deterministic human-readable fallback message.
    pub message: String,
}

impl fmt::Display for SchemaDiagnostic {
    /// Single-line form: `code | source:line:column | message`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {}:{}:{} | {}",
            self.code.as_str(),
            self.location.source,
            self.location.line,
            self.location.column,
            self.message
        )
    }
}
