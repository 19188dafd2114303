//! Unit tests for the serializer.

use rstest::*;

use super::*;
use crate::schema::{Action, Enum, Interface, Parameter, Property, Query, Resource, Scalar};

fn json(input: &str) -> Value {
    serde_json::from_str(input).expect("test JSON should parse")
}

fn record(input: &str) -> Record {
    json(input)
        .into_mapping()
        .expect("test JSON should be an object")
}

#[fixture]
fn document() -> Document {
    Document::from_definitions([
        Scalar::new("Slug", "string").into(),
        Scalar::new("Cents", "integer").into(),
        Enum::new("Status", ["ACTIVE", "INACTIVE"]).into(),
        Interface::new(
            "Point",
            vec![
                Property::new("x", Type::named("float")),
                Property::new("y", Type::named("float")),
                Property::new("label", Type::named("string")).optional(),
            ],
        )
        .into(),
        Resource::new(
            "Me",
            false,
            vec![
                Property::new("id", Type::named("integer")).id(),
                Property::new("status", Type::named("Status")),
                Property::new("friend", Type::new("Me", true, false)).optional(),
            ],
            vec![],
            vec![Action::new(
                "move",
                vec![
                    Parameter::new("to", Type::named("Point")),
                    Parameter::new("path", Type::new("Point", false, true)).optional(),
                    Parameter::new("price", Type::named("Cents")).optional(),
                ],
                None,
            )],
        )
        .into(),
    ])
    .expect("names are unique")
}

#[fixture]
fn serializer(document: Document) -> Serializer {
    Serializer::new(document).expect("schema is consistent")
}

fn move_action(serializer: &Serializer) -> Action {
    let Some(Definition::Resource(me)) = serializer.document().get_type_definition("Me") else {
        panic!("Me is a resource");
    };
    me.actions.get("move").cloned().expect("move is declared")
}

// ── Construction ────────────────────────────────────────────────────

#[test]
fn construction_validates_the_document() {
    let doc = Document::from_definitions([Scalar::new("Broken", "Nowhere").into()])
        .expect("names are unique");
    let err = Serializer::new(doc).expect_err("fallback does not resolve");
    assert!(matches!(err, SchemaError::UnknownFallback { .. }));
}

#[rstest]
fn duplicate_handler_is_rejected(mut serializer: Serializer) {
    let twice = ScalarHandler::new("Slug", |v: &Value| Ok(v.clone()), |v: &Value| Ok(v.clone()));
    serializer
        .register_scalar_handler(twice.clone())
        .expect("first registration");
    let err = serializer
        .register_scalar_handler(twice)
        .expect_err("second registration");
    assert_eq!(
        err.to_string(),
        "scalar handler for Slug already registered"
    );

    let builtin = ScalarHandler::new(
        "string",
        |v: &Value| Ok(v.clone()),
        |v: &Value| Ok(v.clone()),
    );
    assert!(matches!(
        serializer.register_scalar_handler(builtin),
        Err(SchemaError::DuplicateScalarHandler { .. })
    ));
}

#[rstest]
#[case::enum_name("Status")]
#[case::undefined("Color")]
fn handler_needs_a_scalar_name(mut serializer: Serializer, #[case] name: &str) {
    let handler = ScalarHandler::new(name, |v: &Value| Ok(v.clone()), |v: &Value| Ok(v.clone()));
    assert!(matches!(
        serializer.register_scalar_handler(handler),
        Err(SchemaError::UnknownScalar { .. })
    ));
}

#[test]
fn options_accept_both_key_spellings() {
    let snake: SerializerOptions =
        serde_json::from_str(r#"{"server_mode": true}"#).expect("snake case");
    let camel: SerializerOptions =
        serde_json::from_str(r#"{"serverMode": true}"#).expect("camel case");
    assert_eq!(snake, camel);
    assert!(snake.server_mode);
    assert_eq!(
        serde_json::from_str::<SerializerOptions>("{}").expect("all defaulted"),
        SerializerOptions::default()
    );
    assert!(serde_json::from_str::<SerializerOptions>(r#"{"strict": true}"#).is_err());
}

// ── Scalars ─────────────────────────────────────────────────────────

#[rstest]
fn direct_scalar_calls(serializer: Serializer) {
    assert_eq!(
        serializer.deserialize_scalar("integer", &Value::from(4_i64)),
        Ok(Value::from(4_i64))
    );
    assert_eq!(
        serializer.deserialize_scalar("Slug", &Value::from("a")),
        Err(ScalarError::MissingHandler {
            name: "Slug".to_owned()
        })
    );
    assert_eq!(
        serializer
            .serialize_scalar("boolean", &Value::from("yes"))
            .map_err(|e| e.to_string()),
        Err("Error serializing value. yes is not a boolean".to_owned())
    );
}

#[rstest]
fn scalar_without_codec_uses_fallback(serializer: Serializer) {
    let action = move_action(&serializer);
    let err = serializer
        .deserialize_parameters(
            &record(r#"{"to": {"x": 1, "y": 2}, "price": "ten"}"#),
            &action,
        )
        .expect_err("price must be an integer");
    assert_eq!(
        err.to_json(),
        Some(json(r#"{"price": "Expected integer, but got ten"}"#).into_json())
    );
}

#[rstest]
fn scalar_codec_decodes_values(mut serializer: Serializer) {
    serializer
        .register_scalar_handler(ScalarHandler::new(
            "Cents",
            |v: &Value| Ok(v.clone()),
            |v: &Value| match v {
                Value::String(s) => s
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| format!("{s} is not a number of cents")),
                other => Ok(other.clone()),
            },
        ))
        .expect("Cents is a scalar");
    let action = move_action(&serializer);

    let out = serializer
        .deserialize_parameters(
            &record(r#"{"to": {"x": 1, "y": 2}, "price": "250"}"#),
            &action,
        )
        .expect("price decodes");
    assert_eq!(out.get("price"), Some(&Value::Integer(250)));

    let err = serializer
        .deserialize_parameters(
            &record(r#"{"to": {"x": 1, "y": 2}, "price": "lots"}"#),
            &action,
        )
        .expect_err("codec rejects");
    assert_eq!(
        err.errors()
            .and_then(|e| e.get("price"))
            .and_then(ErrorNode::message),
        Some("lots is not a number of cents")
    );
}

// ── Records ─────────────────────────────────────────────────────────

#[rstest]
fn enum_violation_is_the_only_error(serializer: Serializer) {
    let err = serializer
        .deserialize_record("Me", &json(r#"{"id": 1, "status": "PENDING"}"#))
        .expect_err("PENDING is not a status");
    let DeserializeError::Invalid { path, errors } = &err else {
        panic!("value error expected");
    };
    assert_eq!(path, "Me");
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["status"]);
    assert_eq!(
        errors.get("status").and_then(ErrorNode::message),
        Some("Invalid enum value PENDING, expected one of ACTIVE, INACTIVE")
    );
}

#[rstest]
fn output_keeps_declared_fields_only(serializer: Serializer) {
    let out = serializer
        .deserialize_record("Point", &json(r#"{"y": 2, "x": 1.5, "z": 9}"#))
        .expect("valid point");
    assert_eq!(out, json(r#"{"x": 1.5, "y": 2}"#));
}

#[rstest]
fn every_sibling_error_is_reported(serializer: Serializer) {
    let err = serializer
        .deserialize_record("Point", &json(r#"{"x": "left", "label": 3}"#))
        .expect_err("three fields are wrong");
    assert_eq!(
        err.to_json(),
        Some(
            json(
                r#"{
                    "x": "Expected float, but got left",
                    "y": "Missing required property y",
                    "label": "Expected string, but got 3"
                }"#
            )
            .into_json()
        )
    );
}

#[rstest]
#[case::enum_name("Status")]
#[case::scalar_name("Slug")]
#[case::undefined("Ghost")]
fn record_needs_an_interface_or_resource(serializer: Serializer, #[case] name: &str) {
    let err = serializer
        .deserialize_record(name, &json("{}"))
        .expect_err("not a record type");
    assert!(matches!(
        err,
        DeserializeError::Schema(SchemaError::UnknownRecordType { .. })
    ));
    assert!(err.to_json().is_none());
}

#[rstest]
fn non_object_record_is_a_top_level_leaf(serializer: Serializer) {
    let err = serializer
        .deserialize_record("Point", &json("[1, 2]"))
        .expect_err("arrays are not points");
    assert_eq!(
        err.errors().and_then(ErrorNode::message),
        Some("Expected object, got array")
    );
}

// ── Arrays and nulls ────────────────────────────────────────────────

#[rstest]
fn array_element_errors_nest_under_the_field(serializer: Serializer) {
    let action = move_action(&serializer);
    let err = serializer
        .deserialize_parameters(
            &record(r#"{"to": {"x": 0, "y": 0}, "path": [{"x": 1, "y": 1}, 7, {"x": 2}]}"#),
            &action,
        )
        .expect_err("two elements are wrong");
    assert_eq!(
        err.to_json(),
        Some(
            json(
                r#"{"path": {
                    "1": "Expected object, got integer",
                    "2": {"y": "Missing required property y"}
                }}"#
            )
            .into_json()
        )
    );
}

#[rstest]
#[case::scalar_for_array(
    r#"{"to": {"x": 0, "y": 0}, "path": {"x": 1}}"#,
    "path",
    "Expected array, got object"
)]
#[case::array_for_scalar(r#"{"to": [{"x": 0, "y": 0}]}"#, "to", "Expected Point, got array")]
#[case::null_for_required(r#"{"to": null}"#, "to", "Value must not be null")]
#[case::missing(r#"{}"#, "to", "Missing required property to")]
fn shape_mismatches(
    serializer: Serializer,
    #[case] input: &str,
    #[case] field: &str,
    #[case] message: &str,
) {
    let action = move_action(&serializer);
    let err = serializer
        .deserialize_parameters(&record(input), &action)
        .expect_err("shape mismatch");
    let DeserializeError::Invalid { path, errors } = &err else {
        panic!("value error expected");
    };
    assert_eq!(path, "params");
    assert_eq!(
        errors.get(field).and_then(ErrorNode::message),
        Some(message)
    );
}

#[rstest]
fn null_is_kept_for_nullable_fields(serializer: Serializer) {
    let out = serializer
        .deserialize_record(
            "Me",
            &json(r#"{"id": 1, "status": "ACTIVE", "friend": null}"#),
        )
        .expect("friend is nullable");
    assert_eq!(
        out.as_mapping().and_then(|m| m.get("friend")),
        Some(&Value::Null)
    );
}

// ── Server mode ─────────────────────────────────────────────────────

#[rstest]
#[case::client(
    false,
    r#"{"id": 1, "status": "ACTIVE", "friend": {"id": 2, "status": "INACTIVE"}}"#
)]
#[case::server(true, r#"{"id": 1, "status": "ACTIVE", "friend": {"id": 2}}"#)]
fn nested_resources_follow_server_mode(
    document: Document,
    #[case] server_mode: bool,
    #[case] expected: &str,
) {
    let serializer = Serializer::with_options(document, SerializerOptions { server_mode })
        .expect("schema is consistent");
    assert_eq!(serializer.server_mode(), server_mode);
    let out = serializer
        .deserialize_record(
            "Me",
            &json(r#"{"id": 1, "status": "ACTIVE", "friend": {"id": 2, "status": "INACTIVE"}}"#),
        )
        .expect("valid input");
    assert_eq!(out, json(expected));
}

#[rstest]
fn server_mode_ignores_invalid_non_identity_fields(document: Document) {
    let serializer = Serializer::with_options(document, SerializerOptions { server_mode: true })
        .expect("schema is consistent");
    let out = serializer
        .deserialize_record(
            "Me",
            &json(r#"{"id": 1, "status": "ACTIVE", "friend": {"id": 2, "status": 42}}"#),
        )
        .expect("friend status is not inspected");
    assert_eq!(
        out.as_mapping().and_then(|m| m.get("friend")),
        Some(&json(r#"{"id": 2}"#))
    );
}

#[rstest]
fn static_queries_take_declared_parameters(serializer: Serializer) {
    let query = Query::new(
        "find",
        true,
        vec![Parameter::new("slug", Type::named("Slug"))],
        Type::named("Me"),
    );
    let out = serializer
        .deserialize_parameters(&record(r#"{"slug": "hello", "extra": 1}"#), &query)
        .expect("slug is a string");
    assert_eq!(out.keys().collect::<Vec<_>>(), vec!["slug"]);
}

#[test]
fn serializer_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Serializer>();
}

/// Compares through `serde_json` so key order inside mappings is not
/// significant.
trait IntoJson {
    fn into_json(self) -> serde_json::Value;
}

impl IntoJson for Value {
    fn into_json(self) -> serde_json::Value {
        serde_json::to_value(self).expect("values always serialize")
    }
}
