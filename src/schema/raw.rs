//! Internal raw schema types with source-location capture.
//!
//! These types mirror the YAML schema shape and use `serde_saphyr::Spanned`
//! for definition names and type notations, so conversion and validation
//! failures can be mapped back to line and column coordinates.

use serde::Deserialize;
use serde_saphyr::{Location, Spanned};

use super::definition::{Definition, Enum, Interface, Resource, Scalar};
use super::error::SchemaError;
use super::newtypes::{DefinitionName, MemberName};
use super::operation::{Action, Query};
use super::types::{Parameter, Property, Type};

/// Raw schema document with location-carrying fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawSchema {
    #[serde(rename = "Scalars", alias = "scalars", default)]
    pub(crate) scalars: Vec<RawScalar>,
    #[serde(rename = "Enums", alias = "enums", default)]
    pub(crate) enums: Vec<RawEnum>,
    #[serde(rename = "Interfaces", alias = "interfaces", default)]
    pub(crate) interfaces: Vec<RawInterface>,
    #[serde(rename = "Resources", alias = "resources", default)]
    pub(crate) resources: Vec<RawResource>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawScalar {
    pub(crate) name: Spanned<DefinitionName>,
    pub(crate) fallback: Spanned<String>,
    #[serde(default)]
    pub(crate) doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawEnum {
    pub(crate) name: Spanned<DefinitionName>,
    pub(crate) values: Vec<String>,
    #[serde(default)]
    pub(crate) doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawInterface {
    pub(crate) name: Spanned<DefinitionName>,
    #[serde(default)]
    pub(crate) properties: Vec<RawProperty>,
    #[serde(default)]
    pub(crate) doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawResource {
    pub(crate) name: Spanned<DefinitionName>,
    #[serde(rename = "static", default)]
    pub(crate) is_static: bool,
    #[serde(default)]
    pub(crate) properties: Vec<RawProperty>,
    #[serde(default)]
    pub(crate) queries: Vec<RawQuery>,
    #[serde(default)]
    pub(crate) actions: Vec<RawAction>,
    #[serde(default)]
    pub(crate) doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawProperty {
    pub(crate) name: MemberName,
    #[serde(rename = "type")]
    pub(crate) ty: Spanned<String>,
    #[serde(default)]
    pub(crate) id: bool,
    #[serde(default)]
    pub(crate) optional: bool,
    #[serde(default)]
    pub(crate) doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawParameter {
    pub(crate) name: MemberName,
    #[serde(rename = "type")]
    pub(crate) ty: Spanned<String>,
    #[serde(default)]
    pub(crate) optional: bool,
    #[serde(default)]
    pub(crate) doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawQuery {
    pub(crate) name: MemberName,
    #[serde(rename = "static", default)]
    pub(crate) is_static: bool,
    #[serde(default)]
    pub(crate) parameters: Vec<RawParameter>,
    pub(crate) returns: Spanned<String>,
    #[serde(default)]
    pub(crate) doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawAction {
    pub(crate) name: MemberName,
    #[serde(default)]
    pub(crate) parameters: Vec<RawParameter>,
    #[serde(default)]
    pub(crate) returns: Option<Spanned<String>>,
    #[serde(default)]
    pub(crate) doc: Option<String>,
}

/// A conversion failure and the node it was raised at.
#[derive(Debug)]
pub(crate) struct RawFailure {
    pub(crate) error: Box<SchemaError>,
    pub(crate) location: Location,
}

type Converted<T> = Result<T, RawFailure>;

/// A converted definition and the location of its name.
pub(crate) type LocatedDefinition = (Definition, Location);

impl RawSchema {
    /// Converts every section into definitions, in section order: scalars,
    /// enums, interfaces, resources.
    pub(crate) fn to_definitions(&self) -> Converted<Vec<LocatedDefinition>> {
        let mut definitions = Vec::new();
        for scalar in &self.scalars {
            definitions.push((scalar.to_definition(), scalar.name.referenced));
        }
        for e in &self.enums {
            definitions.push((e.to_definition(), e.name.referenced));
        }
        for interface in &self.interfaces {
            definitions.push((interface.to_definition()?, interface.name.referenced));
        }
        for resource in &self.resources {
            definitions.push((resource.to_definition()?, resource.name.referenced));
        }
        Ok(definitions)
    }

    /// Returns the best-effort location for a validation error: the type
    /// notation at fault when one can be found, else the definition name.
    #[must_use]
    pub(crate) fn location_for_error(&self, error: &SchemaError) -> Option<Location> {
        match error {
            SchemaError::UnknownType { definition, name } => self
                .type_notations(definition)
                .into_iter()
                .find(|notation| notation_base(&notation.value) == Some(name.as_str()))
                .map(|notation| notation.referenced)
                .or_else(|| self.definition_location(definition)),
            SchemaError::UnknownFallback { definition, .. }
            | SchemaError::CyclicFallback { definition, .. } => self
                .scalars
                .iter()
                .find(|s| s.name.value.as_str() == definition)
                .map(|s| s.fallback.referenced),
            other => other
                .definition()
                .and_then(|name| self.definition_location(name)),
        }
    }

    fn definition_location(&self, name: &str) -> Option<Location> {
        let scalars = self.scalars.iter().map(|s| &s.name);
        let enums = self.enums.iter().map(|e| &e.name);
        let interfaces = self.interfaces.iter().map(|i| &i.name);
        let resources = self.resources.iter().map(|r| &r.name);
        scalars
            .chain(enums)
            .chain(interfaces)
            .chain(resources)
            .find(|spanned| spanned.value.as_str() == name)
            .map(|spanned| spanned.referenced)
    }

    /// Every type notation written inside the named definition, in source
    /// order.
    fn type_notations(&self, definition: &str) -> Vec<&Spanned<String>> {
        if let Some(interface) = self
            .interfaces
            .iter()
            .find(|i| i.name.value.as_str() == definition)
        {
            return interface.properties.iter().map(|p| &p.ty).collect();
        }
        let Some(resource) = self
            .resources
            .iter()
            .find(|r| r.name.value.as_str() == definition)
        else {
            return Vec::new();
        };
        let mut notations: Vec<&Spanned<String>> =
            resource.properties.iter().map(|p| &p.ty).collect();
        for query in &resource.queries {
            notations.extend(query.parameters.iter().map(|p| &p.ty));
            notations.push(&query.returns);
        }
        for action in &resource.actions {
            notations.extend(action.parameters.iter().map(|p| &p.ty));
            notations.extend(action.returns.as_ref());
        }
        notations
    }
}

impl RawScalar {
    fn to_definition(&self) -> Definition {
        let scalar = Scalar::new(self.name.value.as_str(), self.fallback.value.trim());
        with_doc(scalar, self.doc.as_deref(), Scalar::with_doc_comment).into()
    }
}

impl RawEnum {
    fn to_definition(&self) -> Definition {
        let e = Enum::new(self.name.value.as_str(), self.values.iter().cloned());
        with_doc(e, self.doc.as_deref(), Enum::with_doc_comment).into()
    }
}

impl RawInterface {
    fn to_definition(&self) -> Converted<Definition> {
        let owner = &self.name;
        let properties = convert_properties(owner, &self.properties)?;
        let interface = Interface::new(owner.value.as_str(), properties);
        Ok(with_doc(interface, self.doc.as_deref(), Interface::with_doc_comment).into())
    }
}

impl RawResource {
    fn to_definition(&self) -> Converted<Definition> {
        let owner = &self.name;
        let properties = convert_properties(owner, &self.properties)?;

        let mut queries = Vec::with_capacity(self.queries.len());
        for (i, raw) in self.queries.iter().enumerate() {
            ensure_unique(owner, self.queries.iter().take(i), &raw.name, |q| &q.name)?;
            let query = Query::new(
                raw.name.as_str(),
                raw.is_static,
                convert_parameters(owner, &raw.parameters)?,
                parse_type(&raw.returns)?,
            );
            queries.push(with_doc(query, raw.doc.as_deref(), Query::with_doc_comment));
        }

        let mut actions = Vec::with_capacity(self.actions.len());
        for (i, raw) in self.actions.iter().enumerate() {
            ensure_unique(owner, self.actions.iter().take(i), &raw.name, |a| &a.name)?;
            let returns = raw.returns.as_ref().map(parse_type).transpose()?;
            let action = Action::new(
                raw.name.as_str(),
                convert_parameters(owner, &raw.parameters)?,
                returns,
            );
            actions.push(with_doc(action, raw.doc.as_deref(), Action::with_doc_comment));
        }

        let resource = Resource::new(
            owner.value.as_str(),
            self.is_static,
            properties,
            queries,
            actions,
        );
        Ok(with_doc(resource, self.doc.as_deref(), Resource::with_doc_comment).into())
    }
}

fn convert_properties(
    owner: &Spanned<DefinitionName>,
    raw: &[RawProperty],
) -> Converted<Vec<Property>> {
    let mut properties = Vec::with_capacity(raw.len());
    for (i, property) in raw.iter().enumerate() {
        ensure_unique(owner, raw.iter().take(i), &property.name, |p| &p.name)?;
        let mut converted = Property::new(property.name.as_str(), parse_type(&property.ty)?);
        if property.id {
            converted = converted.id();
        }
        if property.optional {
            converted = converted.optional();
        }
        properties.push(with_doc(
            converted,
            property.doc.as_deref(),
            Property::with_doc_comment,
        ));
    }
    Ok(properties)
}

fn convert_parameters(
    owner: &Spanned<DefinitionName>,
    raw: &[RawParameter],
) -> Converted<Vec<Parameter>> {
    let mut parameters = Vec::with_capacity(raw.len());
    for (i, parameter) in raw.iter().enumerate() {
        ensure_unique(owner, raw.iter().take(i), &parameter.name, |p| &p.name)?;
        let mut converted = Parameter::new(parameter.name.as_str(), parse_type(&parameter.ty)?);
        if parameter.optional {
            converted = converted.optional();
        }
        parameters.push(with_doc(
            converted,
            parameter.doc.as_deref(),
            Parameter::with_doc_comment,
        ));
    }
    Ok(parameters)
}

/// Rejects `name` if it already appears among `earlier`.
fn ensure_unique<'a, T: 'a>(
    owner: &Spanned<DefinitionName>,
    earlier: impl IntoIterator<Item = &'a T>,
    name: &MemberName,
    name_of: impl Fn(&T) -> &MemberName,
) -> Converted<()> {
    if earlier.into_iter().any(|item| name_of(item) == name) {
        return Err(RawFailure {
            error: Box::new(SchemaError::DuplicateMember {
                definition: owner.value.to_string(),
                member: name.to_string(),
            }),
            location: owner.referenced,
        });
    }
    Ok(())
}

fn parse_type(notation: &Spanned<String>) -> Converted<Type> {
    notation.value.parse().map_err(|error| RawFailure {
        error: Box::new(error),
        location: notation.referenced,
    })
}

/// Base type name of a notation, or `None` if it does not parse.
fn notation_base(notation: &str) -> Option<&str> {
    let trimmed = notation.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed)
        .trim();
    let base = inner.strip_suffix('?').unwrap_or(inner).trim();
    (!base.is_empty()).then_some(base)
}

fn with_doc<T>(item: T, doc: Option<&str>, attach: impl FnOnce(T, String) -> T) -> T {
    match doc {
        Some(text) => attach(item, text.to_owned()),
        None => item,
    }
}
