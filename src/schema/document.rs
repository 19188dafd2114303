//! The whole-schema symbol table.
//!
//! A [`Document`] owns every definition by unique name and is the only place
//! names are resolved. Whole-document validation runs once and is cached in
//! an explicit [`ValidationState`] until the next mutation.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::definition::{Definition, DefinitionKind, Enum, Interface, Resource, Scalar};
use super::error::SchemaError;
use super::value::Value;

/// Whether the document has passed whole-document validation since its last
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationState {
    /// Not validated, or mutated since the last successful validation.
    #[default]
    Unvalidated,
    /// Every definition passed validation.
    Validated,
}

/// An ordered collection of uniquely named definitions.
///
/// # Examples
///
///     use dinoql::schema::{Document, Enum, ValidationState};
///
///     let mut doc = Document::new();
///     doc.add_definition(Enum::new("Status", ["ACTIVE", "INACTIVE"])).unwrap();
///     assert!(doc.add_definition(Enum::new("Status", ["OTHER"])).is_err());
///
///     doc.validate_schema().unwrap();
///     assert_eq!(doc.state(), ValidationState::Validated);
#[derive(Debug, Clone, Default)]
pub struct Document {
    definitions: IndexMap<String, Definition>,
    state: ValidationState,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from a list of definitions, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateDefinition`] on the first repeated
    /// name.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Definition>,
    {
        let mut document = Self::new();
        for definition in definitions {
            document.add_definition(definition)?;
        }
        Ok(document)
    }

    /// Adds a definition and marks the document unvalidated.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateDefinition`] if the name is taken.
    pub fn add_definition(&mut self, definition: impl Into<Definition>) -> Result<(), SchemaError> {
        let entry: Definition = definition.into();
        let name = entry.name().to_owned();
        if self.definitions.contains_key(&name) {
            return Err(SchemaError::DuplicateDefinition { name });
        }
        self.state = ValidationState::Unvalidated;
        self.definitions.insert(name, entry);
        Ok(())
    }

    /// Validates every definition in insertion order, stopping at the first
    /// failure. Does nothing if already validated.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found; the document stays
    /// unvalidated.
    pub fn validate_schema(&mut self) -> Result<(), SchemaError> {
        if self.state == ValidationState::Validated {
            debug!("schema already validated");
            return Ok(());
        }
        debug!(definitions = self.definitions.len(), "validating schema");
        for definition in self.definitions.values() {
            definition.validate_schema(self)?;
        }
        self.state = ValidationState::Validated;
        Ok(())
    }

    /// Returns the current validation state.
    #[must_use]
    pub const fn state(&self) -> ValidationState {
        self.state
    }

    /// Returns `true` if the document is in [`ValidationState::Validated`].
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.state == ValidationState::Validated
    }

    /// Looks up a definition by exact name.
    ///
    /// Built-in primitive names are never found here.
    #[must_use]
    pub fn get_type_definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    /// Returns the definitions in insertion order, optionally only those of
    /// one kind.
    pub fn definitions(&self, kind: Option<DefinitionKind>) -> impl Iterator<Item = &Definition> {
        self.definitions
            .values()
            .filter(move |d| kind.is_none_or(|k| d.kind() == k))
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the document has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns every scalar, in insertion order.
    pub fn scalars(&self) -> impl Iterator<Item = &Scalar> {
        self.definitions.values().filter_map(Definition::as_scalar)
    }

    /// Returns every enum, in insertion order.
    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.definitions.values().filter_map(Definition::as_enum)
    }

    /// Returns every interface, in insertion order.
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.definitions
            .values()
            .filter_map(Definition::as_interface)
    }

    /// Returns every resource, in insertion order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.definitions
            .values()
            .filter_map(Definition::as_resource)
    }

    /// Replaces the structural check of the scalar `name` with `predicate`.
    ///
    /// This only affects `check_value`; the serializer's codecs are
    /// unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownScalar`] if no scalar of that name
    /// exists.
    pub fn register_custom_scalar_validator<F>(
        &mut self,
        name: &str,
        predicate: F,
    ) -> Result<(), SchemaError>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let Some(Definition::Scalar(scalar)) = self.definitions.get_mut(name) else {
            return Err(SchemaError::UnknownScalar {
                name: name.to_owned(),
            });
        };
        scalar.set_custom_validator(Arc::new(predicate));
        Ok(())
    }
}
