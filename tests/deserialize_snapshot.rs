//! Snapshot tests for the canonical error tree shape.
//!
//! Error trees are rendered with `serde_json::to_string_pretty`, which keeps
//! the declaration order of fields, and compared with checked-in snapshots.

mod common;

use common::{json, load_schema, record};
use dinoql::schema::Method;
use dinoql::serializer::{DeserializeError, Serializer};

fn serializer() -> Serializer {
    Serializer::new(load_schema("blog.yaml")).expect("fixture schema is consistent")
}

fn render(error: &DeserializeError) -> String {
    let Some(errors) = error.errors() else {
        panic!("value error expected, got: {error}");
    };
    serde_json::to_string_pretty(errors).expect("error trees always serialize")
}

#[test]
fn nested_record_error_snapshot() {
    let input = json(
        r#"{
            "id": 5,
            "name": "Ada",
            "profile": {"email": 1, "address": {"city": "X"}, "roles": ["READER", "BOSS"]},
            "posts": [{"id": 1}, "x"]
        }"#,
    );
    let Err(error) = serializer().deserialize_record("Author", &input) else {
        panic!("author should be rejected");
    };
    let expected = include_str!("snapshots/errors/author_record.snap").trim_end();
    assert_eq!(render(&error), expected);
}

#[test]
fn parameter_error_snapshot() {
    let serializer = serializer();
    let post = serializer
        .document()
        .get_type_definition("Post")
        .and_then(|d| d.as_resource())
        .expect("Post is a resource");
    let Some(Method::Query(search)) = post.get_method("search") else {
        panic!("search is a query");
    };
    let Err(error) = serializer.deserialize_parameters(&record(r#"{"limit": "ten"}"#), search)
    else {
        panic!("parameters should be rejected");
    };
    let expected = include_str!("snapshots/errors/search_params.snap").trim_end();
    assert_eq!(render(&error), expected);
    assert!(error.to_string().starts_with("could not deserialize params: {"));
}
