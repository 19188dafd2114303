//! Shared test helpers for integration tests.

#![expect(dead_code, reason = "each test binary uses a different subset")]

use dinoql::schema::{Document, Record, Value, load_document_with_source};

/// Loads a fixture file from the `tests/fixtures/` directory.
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

/// Loads and validates a fixture schema.
///
/// # Panics
///
/// Panics if the fixture cannot be read or does not load.
pub fn load_schema(name: &str) -> Document {
    let yaml = load_fixture(name);
    load_document_with_source(&format!("tests/fixtures/{name}"), &yaml)
        .unwrap_or_else(|e| panic!("fixture {name} should load: {e}"))
}

/// Parses a JSON test input into a [`Value`].
///
/// # Panics
///
/// Panics on malformed JSON.
pub fn json(input: &str) -> Value {
    serde_json::from_str(input).unwrap_or_else(|e| panic!("test JSON should parse: {e}"))
}

/// Parses a JSON object test input into a [`Record`].
///
/// # Panics
///
/// Panics on malformed JSON or a non-object.
pub fn record(input: &str) -> Record {
    json(input)
        .into_mapping()
        .unwrap_or_else(|| panic!("test JSON should be an object: {input}"))
}
