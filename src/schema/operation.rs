//! Queries and actions attached to a resource.

use super::document::Document;
use super::error::{CheckResult, ErrorCollector, ErrorNode, SchemaError};
use super::types::{Parameter, Type};
use super::value::Record;

/// Behaviour shared by [`Query`] and [`Action`].
pub trait Operation {
    /// Operation name, unique within its resource and kind.
    fn name(&self) -> &str;

    /// Declared parameters, in order.
    fn parameters(&self) -> &[Parameter];

    /// Declared return type, if any.
    fn return_type(&self) -> Option<&Type>;

    /// Checks every declared parameter against `input`.
    ///
    /// A missing required parameter and a present parameter of the wrong
    /// shape are both reported; a missing optional parameter is not.
    ///
    /// # Errors
    ///
    /// Returns [`super::CheckError::Invalid`] with one entry per failing
    /// parameter.
    fn validate_parameters(&self, document: &Document, input: &Record) -> CheckResult {
        let mut errors = ErrorCollector::default();
        for parameter in self.parameters() {
            match input.get(&parameter.name) {
                None if parameter.is_optional => {}
                None => errors.push(
                    parameter.name.as_str(),
                    ErrorNode::leaf(format!("Parameter {} is required", parameter.name)),
                ),
                Some(value) => {
                    errors.record(
                        parameter.name.as_str(),
                        parameter.ty.check_value(document, value),
                    )?;
                }
            }
        }
        errors.finish()
    }

    /// Checks that every parameter type and the return type resolve.
    ///
    /// `owner` names the resource, for the error.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] for the first unresolved type.
    fn validate_schema(&self, document: &Document, owner: &str) -> Result<(), SchemaError> {
        for parameter in self.parameters() {
            parameter.ty.validate_schema(document, owner)?;
        }
        if let Some(ty) = self.return_type() {
            ty.validate_schema(document, owner)?;
        }
        Ok(())
    }
}

/// A read-only operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Query name.
    pub name: String,
    /// Static queries are called on the resource type, not an instance.
    pub is_static: bool,
    /// Declared parameters.
    pub parameters: Vec<Parameter>,
    /// Type of the query result.
    pub return_type: Type,
    /// Documentation comment.
    pub doc_comment: Option<String>,
}

impl Query {
    /// Creates a query.
    pub fn new(
        name: impl Into<String>,
        is_static: bool,
        parameters: Vec<Parameter>,
        return_type: Type,
    ) -> Self {
        Self {
            name: name.into(),
            is_static,
            parameters,
            return_type,
            doc_comment: None,
        }
    }

    /// Attaches a documentation comment.
    #[must_use]
    pub fn with_doc_comment(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }
}

impl Operation for Query {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn return_type(&self) -> Option<&Type> {
        Some(&self.return_type)
    }
}

/// A mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Action name.
    pub name: String,
    /// Declared parameters.
    pub parameters: Vec<Parameter>,
    /// Type of the action result, when it returns one.
    pub return_type: Option<Type>,
    /// Documentation comment.
    pub doc_comment: Option<String>,
}

impl Action {
    /// Creates an action.
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: Option<Type>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            doc_comment: None,
        }
    }

    /// Attaches a documentation comment.
    #[must_use]
    pub fn with_doc_comment(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }
}

impl Operation for Action {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn return_type(&self) -> Option<&Type> {
        self.return_type.as_ref()
    }
}

/// A query or action found by [`super::Resource::get_method`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method<'r> {
    /// A read-only query.
    Query(&'r Query),
    /// A mutating action.
    Action(&'r Action),
}

impl<'r> Method<'r> {
    /// Returns the operation behind this method.
    #[must_use]
    pub fn as_operation(self) -> &'r dyn Operation {
        match self {
            Self::Query(query) => query,
            Self::Action(action) => action,
        }
    }

    /// Returns `true` for actions.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        matches!(self, Self::Action(_))
    }
}
