//! Lexical rules for definition and member names.
//!
//! Names must match the ASCII pattern `^[A-Za-z_][A-Za-z0-9_]*$`.
//! Definition names additionally must not shadow a built-in primitive,
//! otherwise a type reference such as `string` would be ambiguous.

use super::error::SchemaError;
use super::types::BuiltinScalar;

/// Validates that a string is a legal member (property, parameter, query or
/// action) name.
///
/// # Errors
///
/// Returns `SchemaError::InvalidIdentifier` if the string is empty or does
/// not match the identifier pattern.
///
/// # Examples
///
///     use dinoql::schema::validate_identifier;
///
///     assert!(validate_identifier("createdAt").is_ok());
///     assert!(validate_identifier("_private").is_ok());
///     assert!(validate_identifier("123bad").is_err());
pub fn validate_identifier(s: &str) -> Result<(), SchemaError> {
    if s.is_empty() {
        return Err(SchemaError::InvalidIdentifier {
            identifier: s.to_owned(),
            reason: "identifier must not be empty".to_owned(),
        });
    }

    if !is_valid_identifier_pattern(s) {
        return Err(SchemaError::InvalidIdentifier {
            identifier: s.to_owned(),
            reason: concat!(
                "must match the pattern ",
                "^[A-Za-z_][A-Za-z0-9_]*$ ",
                "(ASCII letters, digits, and underscores; ",
                "must not start with a digit)"
            )
            .to_owned(),
        });
    }

    Ok(())
}

/// Validates that a string is a legal definition name.
///
/// # Errors
///
/// Returns `SchemaError::InvalidIdentifier` if the string fails
/// [`validate_identifier`] or names a built-in primitive.
pub fn validate_definition_name(s: &str) -> Result<(), SchemaError> {
    validate_identifier(s)?;
    if BuiltinScalar::from_name(s).is_some() {
        return Err(SchemaError::InvalidIdentifier {
            identifier: s.to_owned(),
            reason: "this is a built-in primitive type and cannot be redefined".to_owned(),
        });
    }
    Ok(())
}

/// Returns `true` if the string matches `^[A-Za-z_][A-Za-z0-9_]*$`.
#[must_use]
fn is_valid_identifier_pattern(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
