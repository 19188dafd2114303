//! The four kinds of named schema types.
//!
//! Each definition checks values in its own way: scalars by primitive rule,
//! fallback or custom predicate; enums by membership; interfaces field by
//! field with per-field detail; resources with a pass/fail verdict only.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::document::Document;
use super::error::{CheckError, CheckResult, ErrorCollector, ErrorNode, SchemaError};
use super::operation::{Action, Method, Query};
use super::types::{BuiltinScalar, Parameter, Property, Type};
use super::validate;
use super::value::Value;

/// Discriminant of a [`Definition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    /// A [`Scalar`].
    Scalar,
    /// An [`Enum`].
    Enum,
    /// An [`Interface`].
    Interface,
    /// A [`Resource`].
    Resource,
}

impl DefinitionKind {
    /// Returns the lowercase kind tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::Interface => "interface",
            Self::Resource => "resource",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, top-level schema type.
#[derive(Debug, Clone)]
pub enum Definition {
    /// An alias of a primitive or of another definition.
    Scalar(Scalar),
    /// A closed set of string values.
    Enum(Enum),
    /// A structural record type.
    Interface(Interface),
    /// An addressable entity with identity, queries and actions.
    Resource(Resource),
}

impl Definition {
    /// Returns the definition's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(d) => &d.name,
            Self::Enum(d) => &d.name,
            Self::Interface(d) => &d.name,
            Self::Resource(d) => &d.name,
        }
    }

    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(&self) -> DefinitionKind {
        match self {
            Self::Scalar(_) => DefinitionKind::Scalar,
            Self::Enum(_) => DefinitionKind::Enum,
            Self::Interface(_) => DefinitionKind::Interface,
            Self::Resource(_) => DefinitionKind::Resource,
        }
    }

    /// Returns the documentation comment.
    #[must_use]
    pub fn doc_comment(&self) -> Option<&str> {
        match self {
            Self::Scalar(d) => d.doc_comment.as_deref(),
            Self::Enum(d) => d.doc_comment.as_deref(),
            Self::Interface(d) => d.doc_comment.as_deref(),
            Self::Resource(d) => d.doc_comment.as_deref(),
        }
    }

    /// Checks this definition for consistency with the rest of `document`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found.
    pub fn validate_schema(&self, document: &Document) -> Result<(), SchemaError> {
        validate::validate_definition(document, self)
    }

    /// Checks `value` against this definition.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Invalid`] when the value does not conform.
    pub fn check_value(&self, document: &Document, value: &Value) -> CheckResult {
        match self {
            Self::Scalar(d) => d.check_value(document, value),
            Self::Enum(d) => d.check_value(value),
            Self::Interface(d) => d.check_value(document, value),
            Self::Resource(d) => d.check_value(document, value),
        }
    }

    /// Returns the scalar, if this is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the enum, if this is one.
    #[must_use]
    pub const fn as_enum(&self) -> Option<&Enum> {
        match self {
            Self::Enum(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the interface, if this is one.
    #[must_use]
    pub const fn as_interface(&self) -> Option<&Interface> {
        match self {
            Self::Interface(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the resource, if this is one.
    #[must_use]
    pub const fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(d) => Some(d),
            _ => None,
        }
    }
}

impl From<Scalar> for Definition {
    fn from(d: Scalar) -> Self {
        Self::Scalar(d)
    }
}

impl From<Enum> for Definition {
    fn from(d: Enum) -> Self {
        Self::Enum(d)
    }
}

impl From<Interface> for Definition {
    fn from(d: Interface) -> Self {
        Self::Interface(d)
    }
}

impl From<Resource> for Definition {
    fn from(d: Resource) -> Self {
        Self::Resource(d)
    }
}

// ── Scalar ──────────────────────────────────────────────────────────

/// A user-supplied predicate that replaces a scalar's structural check.
pub type ScalarPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// An alias of a built-in primitive or of another definition.
#[derive(Clone)]
pub struct Scalar {
    /// Definition name.
    pub name: String,
    /// Built-in primitive name or definition name this scalar stands for.
    pub fallback_type: String,
    /// Documentation comment.
    pub doc_comment: Option<String>,
    custom_validator: Option<ScalarPredicate>,
}

impl Scalar {
    /// Creates a scalar falling back to `fallback_type`.
    pub fn new(name: impl Into<String>, fallback_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fallback_type: fallback_type.into(),
            doc_comment: None,
            custom_validator: None,
        }
    }

    /// Attaches a documentation comment.
    #[must_use]
    pub fn with_doc_comment(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    /// Returns the built-in primitive this scalar falls back to, if any.
    #[must_use]
    pub fn builtin_fallback(&self) -> Option<BuiltinScalar> {
        BuiltinScalar::from_name(&self.fallback_type)
    }

    /// Returns `true` once a custom validator has been installed.
    #[must_use]
    pub const fn has_custom_validator(&self) -> bool {
        self.custom_validator.is_some()
    }

    pub(crate) fn set_custom_validator(&mut self, predicate: ScalarPredicate) {
        self.custom_validator = Some(predicate);
    }

    /// Checks `value`: the custom validator wins when installed, then the
    /// built-in fallback rule, then the fallback definition's own check.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Invalid`] when the value does not conform, or
    /// [`CheckError::Schema`] when the fallback does not resolve.
    pub fn check_value(&self, document: &Document, value: &Value) -> CheckResult {
        if let Some(predicate) = &self.custom_validator {
            if predicate(value) {
                return Ok(());
            }
            return Err(CheckError::leaf(format!("Value is not a valid {}", self.name)));
        }
        if let Some(builtin) = self.builtin_fallback() {
            return builtin.check(value).map_err(CheckError::Invalid);
        }
        let Some(fallback) = document.get_type_definition(&self.fallback_type) else {
            return Err(CheckError::Schema(SchemaError::UnknownFallback {
                definition: self.name.clone(),
                fallback: self.fallback_type.clone(),
            }));
        };
        fallback.check_value(document, value)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar")
            .field("name", &self.name)
            .field("fallback_type", &self.fallback_type)
            .field("doc_comment", &self.doc_comment)
            .field("custom_validator", &self.custom_validator.is_some())
            .finish()
    }
}

// ── Enum ────────────────────────────────────────────────────────────

/// A closed, ordered set of string values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    /// Definition name.
    pub name: String,
    /// Permitted values, in declaration order.
    pub values: Vec<String>,
    /// Documentation comment.
    pub doc_comment: Option<String>,
}

impl Enum {
    /// Creates an enum with the given values.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            doc_comment: None,
        }
    }

    /// Attaches a documentation comment.
    #[must_use]
    pub fn with_doc_comment(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    /// Returns `true` if `candidate` is one of the values.
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.values.iter().any(|v| v == candidate)
    }

    /// Checks that `value` is a string and one of the values.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Invalid`] listing the permitted values.
    pub fn check_value(&self, value: &Value) -> CheckResult {
        let Some(candidate) = value.as_str() else {
            return Err(CheckError::leaf("Value must be a string"));
        };
        if self.contains(candidate) {
            return Ok(());
        }
        Err(CheckError::leaf(format!("Value must be one of {}", self.values.join(", "))))
    }
}

// ── Interface ───────────────────────────────────────────────────────

/// A structural record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Definition name.
    pub name: String,
    /// Properties by name, in declaration order.
    pub properties: IndexMap<String, Property>,
    /// Documentation comment.
    pub doc_comment: Option<String>,
}

impl Interface {
    /// Creates an interface. A later property replaces an earlier one of the
    /// same name.
    pub fn new(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            name: name.into(),
            properties: by_name(properties),
            doc_comment: None,
        }
    }

    /// Attaches a documentation comment.
    #[must_use]
    pub fn with_doc_comment(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    /// Checks that `value` is a record whose properties all conform.
    ///
    /// Every property is checked; failures are keyed by property name.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Invalid`] with one entry per failing property.
    pub fn check_value(&self, document: &Document, value: &Value) -> CheckResult {
        let Some(record) = value.as_mapping() else {
            return Err(CheckError::leaf("Value must be an object"));
        };
        let mut errors = ErrorCollector::default();
        for (key, property) in &self.properties {
            match record.get(key) {
                None if property.is_optional => {}
                None => errors.push(
                    key.as_str(),
                    ErrorNode::leaf(format!("Property {key} is required")),
                ),
                Some(item) => {
                    errors.record(key.as_str(), property.ty.check_value(document, item))?;
                }
            }
        }
        errors.finish()
    }
}

// ── Resource ────────────────────────────────────────────────────────

/// An addressable entity with identity properties, queries and actions.
///
/// Every resource carries a static `get` query taking its identity
/// properties and returning the resource itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Definition name.
    pub name: String,
    /// Static resources have a single instance and need no identity.
    pub is_static: bool,
    /// Properties by name, in declaration order.
    pub properties: IndexMap<String, Property>,
    /// Queries by name, starting with the synthesized `get`.
    pub queries: IndexMap<String, Query>,
    /// Actions by name.
    pub actions: IndexMap<String, Action>,
    /// Documentation comment.
    pub doc_comment: Option<String>,
}

impl Resource {
    /// Name of the query every resource gets by default.
    pub const GET_QUERY: &'static str = "get";

    /// Creates a resource and synthesizes its default `get` query.
    ///
    /// An explicit query named `get` in `queries` replaces the synthesized
    /// one.
    pub fn new(
        name: impl Into<String>,
        is_static: bool,
        properties: Vec<Property>,
        queries: Vec<Query>,
        actions: Vec<Action>,
    ) -> Self {
        let mut resource = Self {
            name: name.into(),
            is_static,
            properties: by_name(properties),
            queries: IndexMap::new(),
            actions: IndexMap::new(),
            doc_comment: None,
        };
        let get = resource.default_get_query();
        resource.add_query(get);
        for query in queries {
            resource.add_query(query);
        }
        for action in actions {
            resource.add_action(action);
        }
        resource
    }

    /// Attaches a documentation comment.
    #[must_use]
    pub fn with_doc_comment(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    fn default_get_query(&self) -> Query {
        let parameters = if self.is_static {
            Vec::new()
        } else {
            self.id_properties()
                .map(|p| Parameter::new(p.name.clone(), p.ty.clone()))
                .collect()
        };
        Query::new(
            Self::GET_QUERY,
            true,
            parameters,
            Type::named(self.name.clone()),
        )
    }

    /// Inserts a query, replacing any query of the same name.
    pub fn add_query(&mut self, query: Query) {
        self.queries.insert(query.name.clone(), query);
    }

    /// Inserts an action, replacing any action of the same name.
    pub fn add_action(&mut self, action: Action) {
        self.actions.insert(action.name.clone(), action);
    }

    /// Returns the identity properties, in declaration order.
    pub fn id_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values().filter(|p| p.is_id)
    }

    /// Looks up an action, then a query, by name.
    #[must_use]
    pub fn get_method(&self, name: &str) -> Option<Method<'_>> {
        self.actions
            .get(name)
            .map(Method::Action)
            .or_else(|| self.queries.get(name).map(Method::Query))
    }

    /// Pass/fail check of `value` against every property.
    ///
    /// Unlike [`Interface::check_value`] no per-field detail is produced; the
    /// deserializer is the detailed path for resources. Absent optional
    /// properties are skipped.
    ///
    /// # Errors
    ///
    /// Returns a single [`CheckError::Invalid`] leaf naming the resource.
    pub fn check_value(&self, document: &Document, value: &Value) -> CheckResult {
        let rejected = || CheckError::leaf(format!("Value is not a valid {}", self.name));
        let Some(record) = value.as_mapping() else {
            return Err(rejected());
        };
        for (key, property) in &self.properties {
            let Some(item) = record.get(key) else {
                if property.is_optional {
                    continue;
                }
                return Err(rejected());
            };
            match property.ty.check_value(document, item) {
                Ok(()) => {}
                Err(CheckError::Invalid(_)) => return Err(rejected()),
                Err(schema @ CheckError::Schema(_)) => return Err(schema),
            }
        }
        Ok(())
    }
}

fn by_name(properties: Vec<Property>) -> IndexMap<String, Property> {
    properties
        .into_iter()
        .map(|p| (p.name.clone(), p))
        .collect()
}
