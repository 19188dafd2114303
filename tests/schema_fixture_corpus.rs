//! Regression corpus tests for loader and validator fixtures.

mod common;

use common::{load_fixture, load_schema};
use dinoql::schema::{DefinitionKind, SchemaDiagnosticCode, load_document_with_source};
use rstest::rstest;

fn fixture_source(fixture_name: &str) -> String {
    format!("tests/fixtures/{fixture_name}")
}

#[rstest]
fn valid_fixture_loads_every_kind() {
    let doc = load_schema("blog.yaml");
    assert!(doc.is_validated());
    for (kind, expected) in [
        (DefinitionKind::Scalar, 3),
        (DefinitionKind::Enum, 2),
        (DefinitionKind::Interface, 2),
        (DefinitionKind::Resource, 3),
    ] {
        assert_eq!(doc.definitions(Some(kind)).count(), expected, "{kind}");
    }
}

#[rstest]
#[case::unknown_key("invalid_unknown_key.yaml", SchemaDiagnosticCode::ParseFailure)]
#[case::type_notation("invalid_type_notation.yaml", SchemaDiagnosticCode::ConversionFailure)]
#[case::missing_identity("invalid_missing_identity.yaml", SchemaDiagnosticCode::ValidationFailure)]
#[case::unknown_type("invalid_unknown_type.yaml", SchemaDiagnosticCode::ValidationFailure)]
#[case::cyclic_fallback("invalid_cyclic_fallback.yaml", SchemaDiagnosticCode::ValidationFailure)]
#[case::empty_enum("invalid_empty_enum.yaml", SchemaDiagnosticCode::ValidationFailure)]
fn invalid_fixture_corpus_fails_with_diagnostic_source(
    #[case] fixture_name: &str,
    #[case] code: SchemaDiagnosticCode,
) {
    let source = fixture_source(fixture_name);
    let yaml = load_fixture(fixture_name);
    let result = load_document_with_source(&source, &yaml);
    assert!(result.is_err(), "expected {fixture_name} to fail");

    let Err(error) = result else {
        panic!("error should be present");
    };
    let Some(diagnostic) = error.diagnostic() else {
        panic!("diagnostic should be present for {fixture_name}: {error}");
    };
    assert_eq!(diagnostic.code, code, "{fixture_name}: {error}");
    assert_eq!(diagnostic.location.source, source);
    assert!(diagnostic.location.line > 0);
    assert!(diagnostic.location.column > 0);
}

#[rstest]
fn builtin_primitive_names_cannot_be_redefined() {
    let yaml = load_fixture("invalid_builtin_name.yaml");
    let Err(error) = load_document_with_source(&fixture_source("invalid_builtin_name.yaml"), &yaml)
    else {
        panic!("integer is a built-in primitive");
    };
    let message = error.to_string();
    assert!(
        message.contains("YAML deserialization failed"),
        "got: {message}"
    );
    assert!(message.contains("built-in primitive"), "got: {message}");
}

#[rstest]
#[case::missing_identity(
    "invalid_missing_identity.yaml",
    "instanced resource Comment has no id properties"
)]
#[case::unknown_type("invalid_unknown_type.yaml", "type Suit referenced by Card not found")]
#[case::cyclic_fallback(
    "invalid_cyclic_fallback.yaml",
    "scalar Left has a cyclic fallback chain: Left -> Right -> Left"
)]
#[case::empty_enum("invalid_empty_enum.yaml", "enum Nothing has no values")]
fn validation_messages_are_stable(#[case] fixture_name: &str, #[case] expected: &str) {
    let yaml = load_fixture(fixture_name);
    let Err(error) = load_document_with_source(&fixture_source(fixture_name), &yaml) else {
        panic!("fixture should fail");
    };
    assert_eq!(error.to_string(), expected);
    assert_eq!(
        error.diagnostic().map(|d| d.message.as_str()),
        Some(expected)
    );
}
