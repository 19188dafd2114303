//! `dinoql` — the type system and value codec of a resource-oriented API
//! schema language.
//!
//! The [`schema`] module models a schema document and checks values against
//! it. The [`serializer`] module turns untyped wire input into checked,
//! decoded values and reports failures as nested per-field error trees.

/// Schema definitions, validation and YAML loading.
pub mod schema;

/// Schema-driven value deserialization with scalar codecs.
pub mod serializer;
