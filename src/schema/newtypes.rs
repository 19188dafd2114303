//! Validated newtypes for names read from schema source.
//!
//! `DefinitionName` and `MemberName` wrap `String` values that have passed
//! identifier validation during deserialization, so the loader never sees a
//! malformed name.

use std::fmt;

use serde::Deserialize;
use serde::de;

use super::identifier::{validate_definition_name, validate_identifier};

// ── DefinitionName ─────────────────────────────────────────────────

/// A validated top-level definition name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefinitionName(String);

impl DefinitionName {
    /// Creates a new `DefinitionName` after validating the input.
    ///
    /// # Errors
    ///
    /// Returns [`super::error::SchemaError::InvalidIdentifier`] if the
    /// string is not a legal definition name.
    pub fn new(s: String) -> Result<Self, super::error::SchemaError> {
        validate_definition_name(&s)?;
        Ok(Self(s))
    }

    /// Returns the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DefinitionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DefinitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DefinitionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        validate_definition_name(&s).map_err(de::Error::custom)?;
        Ok(Self(s))
    }
}

// ── MemberName ─────────────────────────────────────────────────────

/// A validated property, parameter, query or action name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberName(String);

impl MemberName {
    /// Creates a new `MemberName` after validating the input.
    ///
    /// # Errors
    ///
    /// Returns [`super::error::SchemaError::InvalidIdentifier`] if the
    /// string fails identifier validation.
    pub fn new(s: String) -> Result<Self, super::error::SchemaError> {
        validate_identifier(&s)?;
        Ok(Self(s))
    }

    /// Returns the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MemberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MemberName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        validate_identifier(&s).map_err(de::Error::custom)?;
        Ok(Self(s))
    }
}
