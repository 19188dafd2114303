//! Scalar codecs: named `serialize`/`deserialize` pairs.

use std::fmt;
use std::sync::Arc;

use crate::schema::{BuiltinScalar, Value};

/// One direction of a scalar codec. A rejection carries the message that
/// ends up in the field error.
pub type CodecFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// A named scalar codec.
///
/// # Examples
///
///     use dinoql::schema::Value;
///     use dinoql::serializer::ScalarHandler;
///
///     let upper = ScalarHandler::new(
///         "Code",
///         |v: &Value| Ok(v.clone()),
///         |v: &Value| match v.as_str() {
///             Some(s) => Ok(Value::from(s.to_uppercase())),
///             None => Err(format!("Expected code, but got {v}")),
///         },
///     );
///     assert_eq!(upper.deserialize(&Value::from("ab")), Ok(Value::from("AB")));
#[derive(Clone)]
pub struct ScalarHandler {
    name: String,
    serialize: CodecFn,
    deserialize: CodecFn,
}

impl ScalarHandler {
    /// Creates a codec for the scalar `name`.
    pub fn new<S, D>(name: impl Into<String>, serialize: S, deserialize: D) -> Self
    where
        S: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
        D: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
        }
    }

    /// Scalar name this codec handles.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts a decoded value to its wire form.
    ///
    /// # Errors
    ///
    /// Returns the codec's rejection message.
    pub fn serialize(&self, value: &Value) -> Result<Value, String> {
        (self.serialize)(value)
    }

    /// Converts a wire value to its decoded form.
    ///
    /// # Errors
    ///
    /// Returns the codec's rejection message.
    pub fn deserialize(&self, value: &Value) -> Result<Value, String> {
        (self.deserialize)(value)
    }

    /// The identity codec for a built-in primitive, guarded by the
    /// primitive's type test.
    pub(crate) fn builtin(scalar: BuiltinScalar) -> Self {
        let name = scalar.as_str();
        Self::new(
            name,
            move |value: &Value| {
                if scalar.accepts(value) {
                    Ok(value.clone())
                } else {
                    Err(format!(
                        "Error serializing value. {value} is not {}",
                        scalar.with_article()
                    ))
                }
            },
            move |value: &Value| {
                if scalar.accepts(value) {
                    Ok(value.clone())
                } else {
                    Err(format!("Expected {name}, but got {value}"))
                }
            },
        )
    }
}

impl fmt::Debug for ScalarHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::string(
        BuiltinScalar::String,
        Value::from("x"),
        Value::from(1_i64),
        "Expected string, but got 1"
    )]
    #[case::boolean(
        BuiltinScalar::Boolean,
        Value::from(true),
        Value::from("true"),
        "Expected boolean, but got true"
    )]
    #[case::integer(
        BuiltinScalar::Integer,
        Value::from(3_i64),
        Value::from(3.5),
        "Expected integer, but got 3.5"
    )]
    #[case::float(
        BuiltinScalar::Float,
        Value::from(3_i64),
        Value::Null,
        "Expected float, but got null"
    )]
    fn builtin_codec_guards_its_type(
        #[case] scalar: BuiltinScalar,
        #[case] good: Value,
        #[case] bad: Value,
        #[case] message: &str,
    ) {
        let handler = ScalarHandler::builtin(scalar);
        assert_eq!(handler.deserialize(&good), Ok(good.clone()));
        assert_eq!(handler.deserialize(&bad).err().as_deref(), Some(message));
    }

    #[test]
    fn builtin_serialize_message_uses_article() {
        let integer = ScalarHandler::builtin(BuiltinScalar::Integer);
        assert_eq!(
            integer.serialize(&Value::from("7")).err().as_deref(),
            Some("Error serializing value. 7 is not an integer")
        );
        let string = ScalarHandler::builtin(BuiltinScalar::String);
        assert_eq!(
            string.serialize(&Value::from(false)).err().as_deref(),
            Some("Error serializing value. false is not a string")
        );
    }

    #[test]
    fn debug_omits_closures() {
        let handler = ScalarHandler::builtin(BuiltinScalar::Float);
        assert_eq!(
            format!("{handler:?}"),
            r#"ScalarHandler { name: "float", .. }"#
        );
    }
}
