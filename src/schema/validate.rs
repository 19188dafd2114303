//! Schema-consistency checks for individual definitions.
//!
//! The entry point is [`validate_definition`], reached through
//! [`super::Document::validate_schema`]. Each check reports the first
//! violation it meets; the document stops at the first failing definition.

use super::definition::{Definition, Enum, Interface, Resource, Scalar};
use super::document::Document;
use super::error::SchemaError;
use super::operation::Operation;

/// Validates one definition against the document it belongs to.
///
/// Checks applied, per kind:
///
/// - Scalar: the fallback is a built-in or a definition, and a chain of
///   scalar fallbacks never loops.
/// - Enum: at least one value, no value repeated.
/// - Interface: every property type resolves.
/// - Resource: a non-static resource has an identity property; property,
///   query and action types resolve.
///
/// # Errors
///
/// Returns the first [`SchemaError`] found.
pub(crate) fn validate_definition(
    document: &Document,
    definition: &Definition,
) -> Result<(), SchemaError> {
    match definition {
        Definition::Scalar(scalar) => validate_scalar(document, scalar),
        Definition::Enum(e) => validate_enum(e),
        Definition::Interface(interface) => validate_interface(document, interface),
        Definition::Resource(resource) => validate_resource(document, resource),
    }
}

fn validate_scalar(document: &Document, scalar: &Scalar) -> Result<(), SchemaError> {
    let mut chain = vec![scalar.name.as_str()];
    let mut current = scalar;
    loop {
        if current.builtin_fallback().is_some() {
            return Ok(());
        }
        let Some(next) = document.get_type_definition(&current.fallback_type) else {
            return Err(SchemaError::UnknownFallback {
                definition: current.name.clone(),
                fallback: current.fallback_type.clone(),
            });
        };
        let Definition::Scalar(next_scalar) = next else {
            return Ok(());
        };
        let seen = chain.contains(&next_scalar.name.as_str());
        chain.push(&next_scalar.name);
        if seen {
            return Err(SchemaError::CyclicFallback {
                definition: scalar.name.clone(),
                chain: chain.join(" -> "),
            });
        }
        current = next_scalar;
    }
}

fn validate_enum(e: &Enum) -> Result<(), SchemaError> {
    if e.values.is_empty() {
        return Err(SchemaError::EmptyEnum {
            definition: e.name.clone(),
        });
    }
    for (i, value) in e.values.iter().enumerate() {
        if e.values.iter().take(i).any(|earlier| earlier == value) {
            return Err(SchemaError::DuplicateEnumValue {
                definition: e.name.clone(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

fn validate_interface(document: &Document, interface: &Interface) -> Result<(), SchemaError> {
    for property in interface.properties.values() {
        property.ty.validate_schema(document, &interface.name)?;
    }
    Ok(())
}

fn validate_resource(document: &Document, resource: &Resource) -> Result<(), SchemaError> {
    if !resource.is_static && resource.id_properties().next().is_none() {
        return Err(SchemaError::MissingIdentity {
            definition: resource.name.clone(),
        });
    }
    for property in resource.properties.values() {
        property.ty.validate_schema(document, &resource.name)?;
    }
    for query in resource.queries.values() {
        query.validate_schema(document, &resource.name)?;
    }
    for action in resource.actions.values() {
        action.validate_schema(document, &resource.name)?;
    }
    Ok(())
}
