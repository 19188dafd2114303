//! Schema-driven deserialization of untyped input.
//!
//! A [`Serializer`] owns a validated [`Document`] and a registry of scalar
//! codecs seeded with the four built-in primitives. Input records are
//! walked field by field; every failing field at one level is reported
//! together, nested under its path segment, so callers get the complete
//! error tree from one call.
//!
//! In server mode a resource-typed field is reduced to its identity
//! properties: the rest of the input for that field is neither checked nor
//! copied to the output.

mod codec;
mod error;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, trace};

pub use codec::{CodecFn, ScalarHandler};
pub use error::{DeserializeError, ScalarError};

use crate::schema::{
    BuiltinScalar, CheckError, Definition, Document, ErrorCollector, ErrorNode, Field, Operation,
    Record, SchemaError, Type, Value,
};

/// Path segment used for parameter deserialization errors.
const PARAMS_PATH: &str = "params";

/// Serializer construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerOptions {
    /// Reduce nested resources to their identity properties.
    #[serde(alias = "serverMode")]
    pub server_mode: bool,
}

/// Converts untyped input into schema-conformant values.
///
/// # Examples
///
///     use dinoql::schema::{load_document, Value};
///     use dinoql::serializer::Serializer;
///
///     let doc = load_document(r#"
///     Enums:
///       - { name: Status, values: [ACTIVE, INACTIVE] }
///     Resources:
///       - name: Me
///         properties:
///           - { name: id, type: integer, id: true }
///           - { name: status, type: Status }
///     "#).unwrap();
///     let serializer = Serializer::new(doc).unwrap();
///
///     let input: Value = serde_json::from_str(r#"{"id": 1, "status": "PENDING"}"#).unwrap();
///     let err = serializer.deserialize_record("Me", &input).unwrap_err();
///     assert_eq!(
///         err.to_json().unwrap().to_string(),
///         r#"{"status":"Invalid enum value PENDING, expected one of ACTIVE, INACTIVE"}"#
///     );
#[derive(Debug)]
pub struct Serializer {
    document: Document,
    handlers: IndexMap<String, ScalarHandler>,
    options: SerializerOptions,
}

impl Serializer {
    /// Creates a serializer with default options.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found while validating `document`.
    pub fn new(document: Document) -> Result<Self, SchemaError> {
        Self::with_options(document, SerializerOptions::default())
    }

    /// Validates `document` and creates a serializer for it.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found while validating `document`.
    pub fn with_options(
        mut document: Document,
        options: SerializerOptions,
    ) -> Result<Self, SchemaError> {
        document.validate_schema()?;
        let mut serializer = Self {
            document,
            handlers: IndexMap::new(),
            options,
        };
        for scalar in BuiltinScalar::ALL {
            serializer.register_scalar_handler(ScalarHandler::builtin(scalar))?;
        }
        debug!(
            definitions = serializer.document.len(),
            server_mode = options.server_mode,
            "serializer ready"
        );
        Ok(serializer)
    }

    /// Returns the validated document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Returns `true` if nested resources are reduced to their identity.
    #[must_use]
    pub const fn server_mode(&self) -> bool {
        self.options.server_mode
    }

    /// Registers a codec for a built-in primitive or a scalar definition.
    ///
    /// A scalar with a codec is decoded by it; a scalar without one is
    /// decoded as its fallback type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateScalarHandler`] if the name already
    /// has a codec, or [`SchemaError::UnknownScalar`] if it names neither a
    /// primitive nor a scalar definition.
    pub fn register_scalar_handler(&mut self, handler: ScalarHandler) -> Result<(), SchemaError> {
        let name = handler.name().to_owned();
        if self.handlers.contains_key(&name) {
            return Err(SchemaError::DuplicateScalarHandler { name });
        }
        let is_scalar = BuiltinScalar::from_name(&name).is_some()
            || matches!(
                self.document.get_type_definition(&name),
                Some(Definition::Scalar(_))
            );
        if !is_scalar {
            return Err(SchemaError::UnknownScalar { name });
        }
        debug!(scalar = %name, "registered scalar handler");
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Decodes `value` with the codec registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ScalarError::MissingHandler`] if no codec is registered,
    /// or [`ScalarError::Rejected`] with the codec's message.
    pub fn deserialize_scalar(&self, name: &str, value: &Value) -> Result<Value, ScalarError> {
        self.handler(name)?
            .deserialize(value)
            .map_err(ScalarError::Rejected)
    }

    /// Encodes `value` with the codec registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ScalarError::MissingHandler`] if no codec is registered,
    /// or [`ScalarError::Rejected`] with the codec's message.
    pub fn serialize_scalar(&self, name: &str, value: &Value) -> Result<Value, ScalarError> {
        self.handler(name)?
            .serialize(value)
            .map_err(ScalarError::Rejected)
    }

    fn handler(&self, name: &str) -> Result<&ScalarHandler, ScalarError> {
        self.handlers
            .get(name)
            .ok_or_else(|| ScalarError::MissingHandler {
                name: name.to_owned(),
            })
    }

    /// Checks and decodes operation parameters.
    ///
    /// Absent optional parameters are left out of the output; keys that are
    /// not declared parameters are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError::Invalid`] at path `params` with one entry
    /// per failing parameter.
    pub fn deserialize_parameters(
        &self,
        input: &Record,
        operation: &dyn Operation,
    ) -> Result<Record, DeserializeError> {
        trace!(operation = operation.name(), "deserializing parameters");
        self.deserialize_fields(input, operation.parameters())
            .map_err(|error| DeserializeError::at(PARAMS_PATH, error))
    }

    /// Checks and decodes a whole interface or resource value against every
    /// declared property. The error path is the definition name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownRecordType`] (as
    /// [`DeserializeError::Schema`]) if `name` is not an interface or
    /// resource, or [`DeserializeError::Invalid`] if the input does not
    /// conform.
    pub fn deserialize_record(&self, name: &str, input: &Value) -> Result<Value, DeserializeError> {
        let result = match self.document.get_type_definition(name) {
            Some(Definition::Interface(interface)) => {
                self.deserialize_object(input, interface.properties.values())
            }
            Some(Definition::Resource(resource)) => {
                self.deserialize_object(input, resource.properties.values())
            }
            _ => {
                return Err(SchemaError::UnknownRecordType {
                    name: name.to_owned(),
                }
                .into());
            }
        };
        result.map_err(|error| DeserializeError::at(name, error))
    }

    // ── Recursive walk ──────────────────────────────────────────────

    fn deserialize_object<'f, F>(
        &self,
        input: &Value,
        fields: impl IntoIterator<Item = &'f F>,
    ) -> Result<Value, CheckError>
    where
        F: Field + 'f,
    {
        let Some(record) = input.as_mapping() else {
            return Err(CheckError::leaf(format!("Expected object, got {}", input.kind_name())));
        };
        self.deserialize_fields(record, fields).map(Value::Mapping)
    }

    fn deserialize_fields<'f, F>(
        &self,
        record: &Record,
        fields: impl IntoIterator<Item = &'f F>,
    ) -> Result<Record, CheckError>
    where
        F: Field + 'f,
    {
        let mut output = Record::new();
        let mut errors = ErrorCollector::default();
        for field in fields {
            let name = field.name();
            match record.get(name) {
                None if field.is_optional() => {}
                None => errors.push(
                    name,
                    ErrorNode::leaf(format!("Missing required property {name}")),
                ),
                Some(value) => {
                    if let Some(decoded) =
                        errors.record(name, self.deserialize_field(field.ty(), value))?
                    {
                        output.insert(name.to_owned(), decoded);
                    }
                }
            }
        }
        errors.finish()?;
        Ok(output)
    }

    fn deserialize_field(&self, ty: &Type, value: &Value) -> Result<Value, CheckError> {
        if value.is_null() {
            return if ty.nullable {
                Ok(Value::Null)
            } else {
                Err(CheckError::leaf("Value must not be null"))
            };
        }
        match (ty.array, value) {
            (true, Value::Sequence(items)) => {
                let mut output = Vec::with_capacity(items.len());
                let mut errors = ErrorCollector::default();
                for (index, item) in items.iter().enumerate() {
                    let result = self.deserialize_single(&ty.base_type_id, item);
                    if let Some(decoded) = errors.record(index.to_string(), result)? {
                        output.push(decoded);
                    }
                }
                errors.finish()?;
                Ok(Value::Sequence(output))
            }
            (true, other) => Err(CheckError::leaf(format!(
                "Expected array, got {}",
                other.kind_name()
            ))),
            (false, Value::Sequence(_)) => Err(CheckError::leaf(format!(
                "Expected {}, got array",
                ty.base_type_id
            ))),
            (false, other) => self.deserialize_single(&ty.base_type_id, other),
        }
    }

    fn deserialize_single(&self, base: &str, value: &Value) -> Result<Value, CheckError> {
        if let Some(handler) = self.handlers.get(base) {
            return handler.deserialize(value).map_err(CheckError::leaf);
        }
        let Some(definition) = self.document.get_type_definition(base) else {
            return Err(SchemaError::Unresolved {
                name: base.to_owned(),
            }
            .into());
        };
        match definition {
            Definition::Scalar(scalar) => self.deserialize_single(&scalar.fallback_type, value),
            Definition::Enum(e) => match value.as_str() {
                Some(candidate) if e.contains(candidate) => Ok(value.clone()),
                _ => Err(CheckError::leaf(format!(
                    "Invalid enum value {value}, expected one of {}",
                    e.values.join(", ")
                ))),
            },
            Definition::Interface(interface) => {
                self.deserialize_object(value, interface.properties.values())
            }
            Definition::Resource(resource) if self.options.server_mode => {
                self.deserialize_object(value, resource.id_properties())
            }
            Definition::Resource(resource) => {
                self.deserialize_object(value, resource.properties.values())
            }
        }
    }
}

#[cfg(test)]
#[path = "serializer_tests.rs"]
mod tests;
