//! Type references and the typed slots that use them.
//!
//! A [`Type`] names its base type instead of pointing at it. The name is
//! resolved against the owning [`Document`] only when a value is checked,
//! which is what lets definitions refer to each other (or themselves) in any
//! order.

use std::fmt;
use std::str::FromStr;

use super::definition::Definition;
use super::document::Document;
use super::error::{CheckError, CheckResult, ErrorCollector, ErrorNode, SchemaError};
use super::value::Value;

// ── Built-in primitives ─────────────────────────────────────────────

/// The four primitive types every document understands without a
/// definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinScalar {
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `integer`: any integer-valued number.
    Integer,
    /// `float`: any number.
    Float,
}

impl BuiltinScalar {
    /// Every built-in, in declaration order.
    pub const ALL: [Self; 4] = [Self::String, Self::Boolean, Self::Integer, Self::Float];

    /// Looks up a built-in by its schema name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == name)
    }

    /// Returns the schema name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }

    /// Returns `true` if `value` has the runtime shape of this primitive.
    ///
    /// Integers accept any integer-valued number; floats accept any number.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => matches!(value, Value::String(_)),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::Integer => value.is_integer_valued(),
            Self::Float => value.is_number(),
        }
    }

    /// Checks the runtime shape of `value` against this primitive.
    ///
    /// # Errors
    ///
    /// Returns a leaf [`ErrorNode`] naming the expected primitive.
    pub fn check(self, value: &Value) -> Result<(), ErrorNode> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(ErrorNode::leaf(format!("Value must be {}", self.with_article())))
        }
    }

    /// The name with its indefinite article, as in `an integer`.
    #[must_use]
    pub const fn with_article(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Boolean => "a boolean",
            Self::Integer => "an integer",
            Self::Float => "a float",
        }
    }
}

impl fmt::Display for BuiltinScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Type ────────────────────────────────────────────────────────────

/// A nullable/array-qualified reference to a base type by name.
///
/// The notation is `T`, `T?`, `[T]` or `[T?]`; in the array forms the `?`
/// makes the array itself nullable, elements are never null.
///
/// # Examples
///
///     use dinoql::schema::Type;
///
///     let ty: Type = "[Post?]".parse().unwrap();
///     assert_eq!(ty.base_type_id, "Post");
///     assert!(ty.array && ty.nullable);
///     assert_eq!(ty.to_string(), "[Post?]");
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    /// Name of a built-in primitive or of a definition.
    pub base_type_id: String,
    /// Whether `null` is accepted in place of the value.
    pub nullable: bool,
    /// Whether the value is a sequence of base-type elements.
    pub array: bool,
}

impl Type {
    /// Creates a type reference.
    pub fn new(base_type_id: impl Into<String>, nullable: bool, array: bool) -> Self {
        Self {
            base_type_id: base_type_id.into(),
            nullable,
            array,
        }
    }

    /// A non-null, non-array reference to `base_type_id`.
    pub fn named(base_type_id: impl Into<String>) -> Self {
        Self::new(base_type_id, false, false)
    }

    /// Returns the built-in primitive this type refers to, if any.
    #[must_use]
    pub fn builtin(&self) -> Option<BuiltinScalar> {
        BuiltinScalar::from_name(&self.base_type_id)
    }

    /// Resolves the base type against `document`.
    ///
    /// Built-in primitives are never found here.
    #[must_use]
    pub fn base_definition<'d>(&self, document: &'d Document) -> Option<&'d Definition> {
        document.get_type_definition(&self.base_type_id)
    }

    /// Checks that the base type resolves.
    ///
    /// `owner` names the definition holding this reference, for the error.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] when the base type is neither a
    /// built-in nor defined in `document`.
    pub fn validate_schema(&self, document: &Document, owner: &str) -> Result<(), SchemaError> {
        if self.builtin().is_some() || self.base_definition(document).is_some() {
            return Ok(());
        }
        Err(SchemaError::UnknownType {
            definition: owner.to_owned(),
            name: self.base_type_id.clone(),
        })
    }

    /// Checks `value` against this type.
    ///
    /// Array elements are all checked; failures are keyed by index.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Invalid`] describing every non-conforming part
    /// of the value, or [`CheckError::Schema`] if the base type does not
    /// resolve (the document was not validated).
    pub fn check_value(&self, document: &Document, value: &Value) -> CheckResult {
        if value.is_null() {
            if self.nullable {
                return Ok(());
            }
            return Err(CheckError::leaf("Value must not be null"));
        }

        if !self.array {
            return self.check_base(document, value);
        }

        let Value::Sequence(items) = value else {
            return Err(CheckError::leaf("Value must be an array"));
        };
        let mut errors = ErrorCollector::default();
        for (index, item) in items.iter().enumerate() {
            errors.record(index.to_string(), self.check_base(document, item))?;
        }
        errors.finish()
    }

    fn check_base(&self, document: &Document, value: &Value) -> CheckResult {
        if let Some(builtin) = self.builtin() {
            return builtin.check(value).map_err(CheckError::Invalid);
        }
        let Some(definition) = self.base_definition(document) else {
            return Err(CheckError::Schema(SchemaError::Unresolved {
                name: self.base_type_id.clone(),
            }));
        };
        definition.check_value(document, value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let question = if self.nullable { "?" } else { "" };
        if self.array {
            write!(f, "[{}{question}]", self.base_type_id)
        } else {
            write!(f, "{}{question}", self.base_type_id)
        }
    }
}

impl FromStr for Type {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| SchemaError::InvalidTypeNotation {
            notation: s.to_owned(),
            reason: reason.to_owned(),
        };
        let trimmed = s.trim();
        let array = trimmed.starts_with('[');
        let bracketed = if array {
            trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| invalid("unterminated array brackets"))?
        } else {
            trimmed
        };
        let inner = bracketed.trim();
        let (base, nullable) = inner
            .strip_suffix('?')
            .map_or((inner, false), |base| (base.trim(), true));
        if base.is_empty() {
            return Err(invalid("missing base type name"));
        }
        if base.contains(['[', ']', '?']) || base.contains(char::is_whitespace) {
            return Err(invalid("base type name must be a single identifier"));
        }
        Ok(Self::new(base, nullable, array))
    }
}

// ── Fields ──────────────────────────────────────────────────────────

/// A named, typed slot in a record: a [`Property`] or a [`Parameter`].
pub trait Field {
    /// Key of the slot in a record.
    fn name(&self) -> &str;
    /// Declared type of the slot.
    fn ty(&self) -> &Type;
    /// Whether the key may be absent.
    fn is_optional(&self) -> bool;
}

/// A typed property of an interface or resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Whether the property is part of its resource's identity.
    pub is_id: bool,
    /// Whether the property may be absent.
    pub is_optional: bool,
    /// Documentation comment.
    pub doc_comment: Option<String>,
}

impl Property {
    /// Creates a required, non-identity property.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_id: false,
            is_optional: false,
            doc_comment: None,
        }
    }

    /// Marks the property as an identity property.
    #[must_use]
    pub const fn id(mut self) -> Self {
        self.is_id = true;
        self
    }

    /// Marks the property as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Attaches a documentation comment.
    #[must_use]
    pub fn with_doc_comment(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }
}

impl Field for Property {
    fn name(&self) -> &str {
        &self.name
    }

    fn ty(&self) -> &Type {
        &self.ty
    }

    fn is_optional(&self) -> bool {
        self.is_optional
    }
}

/// A typed parameter of a query or action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Whether the parameter may be omitted.
    pub is_optional: bool,
    /// Documentation comment.
    pub doc_comment: Option<String>,
}

impl Parameter {
    /// Creates a required parameter.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_optional: false,
            doc_comment: None,
        }
    }

    /// Marks the parameter as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Attaches a documentation comment.
    #[must_use]
    pub fn with_doc_comment(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }
}

impl Field for Parameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn ty(&self) -> &Type {
        &self.ty
    }

    fn is_optional(&self) -> bool {
        self.is_optional
    }
}
