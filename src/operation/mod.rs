//! Operation builders.
//!
//! Each builder produces the [`Operation`] documenting one HTTP verb on a resource,
//! following the conventions of a JSON REST API:
//!
//! - [`GetDocs`] - list or detail of a resource, answering `200`
//! - [`PostDocs`] - creation, answering `201` (or `204` for "deleted" responses)
//! - [`PatchDocs`] - partial update, answering `200`
//! - [`DeleteDocs`] - deletion, answering `204`
//!
//! Builders fail at build time on configuration errors, so broken documentation
//! shows up at startup rather than while serving requests.
//!
//! # Example
//!
//! ```
//! use openapi_from_routes::operation::GetDocs;
//! use openapi_from_routes::registry::{Field, SchemaDescriptor};
//!
//! let book = SchemaDescriptor::new("BookSchema").field(Field::integer("id"));
//! let op = GetDocs::new(&book).build().unwrap();
//! assert_eq!(op.operation_id.as_deref(), Some("book_detail"));
//! ```

pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

pub use delete::DeleteDocs;
pub use get::GetDocs;
pub use patch::PatchDocs;
pub use post::PostDocs;

use crate::error::{Error, Result};
use crate::model::{
    HttpMethod, Operation, Parameter, ParameterLocation, Response, Schema, SecurityRequirement,
};
use crate::registry::{canonical_name, SchemaDescriptor, SchemaName};
use std::collections::BTreeMap;

/// Operation id marking a verb that must not appear in the document.
pub const HIDDEN_OPERATION_ID: &str = "hidden";

pub(crate) const DELETED_DESCRIPTION: &str = "Resource was deleted";

/// Token an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    #[default]
    AccessToken,
    RefreshToken,
    /// Public endpoint
    NoToken,
}

impl Security {
    /// Name of the security scheme, `None` for public endpoints
    pub fn scheme_name(&self) -> Option<&'static str> {
        match self {
            Security::AccessToken => Some("access_token"),
            Security::RefreshToken => Some("refresh_token"),
            Security::NoToken => None,
        }
    }

    pub fn requirements(&self) -> Vec<SecurityRequirement> {
        self.scheme_name()
            .map(|name| {
                let mut requirement = SecurityRequirement::new();
                requirement.insert(name.to_string(), Vec::new());
                vec![requirement]
            })
            .unwrap_or_default()
    }
}

/// Descriptor that removes its verb from the generated document.
pub fn hidden() -> Operation {
    Operation::default().with_operation_id(HIDDEN_OPERATION_ID)
}

/// Default operation id: `{resource}_{action}`.
///
/// `resource` is the snake-cased canonical schema name and `action` one of
/// `list`, `detail`, `create`, `update` or `delete`.
pub fn generate_operation_id<S: SchemaName + ?Sized>(
    method: HttpMethod,
    many: bool,
    schema: &S,
) -> Result<String> {
    let action = match method {
        HttpMethod::Get if many => "list",
        HttpMethod::Get => "detail",
        HttpMethod::Post => "create",
        HttpMethod::Patch => "update",
        HttpMethod::Delete => "delete",
        other => return Err(Error::UnsupportedMethod(other)),
    };

    let resource = snake_case(&canonical_name(schema.schema_name()));
    Ok(format!("{}_{}", resource, action))
}

fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Parameters declared by `schema`, plus the identifier path parameter of
/// `id_schema` when the operation addresses a single resource.
pub(crate) fn parameters_from_schema(
    schema: &SchemaDescriptor,
    id_schema: Option<&SchemaDescriptor>,
) -> Vec<Parameter> {
    let url_id_field = id_schema
        .and_then(|s| s.options().url_id_field.as_deref())
        .or(schema.options().url_id_field.as_deref());

    let mut parameters = Vec::new();
    let mut id_parameter = None;

    for param in &schema.options().url_parameters {
        if param.name == "id" || Some(param.name.as_str()) == url_id_field {
            id_parameter = Some(param.clone());
        } else {
            parameters.push(param.clone());
        }
    }

    if let (Some(param), Some(name)) = (id_parameter.as_mut(), url_id_field) {
        param.name = name.to_string();
    }

    if let Some(id_schema) = id_schema {
        match id_parameter {
            Some(param) => parameters.push(param),
            None => {
                if let Some(name) = id_schema.identifier_field() {
                    parameters.push(
                        Parameter::new(name, ParameterLocation::Path)
                            .schema(Schema::typed(id_schema.identifier_type())),
                    );
                }
            }
        }
    }

    parameters.retain(|p| !p.name.is_empty());
    parameters
}

/// Adds one description-only response per error status code.
pub(crate) fn update_errors(operation: &mut Operation, errors: &BTreeMap<u16, String>) {
    for (code, description) in errors {
        operation
            .responses
            .insert(code.to_string(), Response::described(dedent(description)));
    }
}

/// Union of the tags declared by the given schemas, first occurrence wins.
pub(crate) fn schema_tags(schemas: &[&SchemaDescriptor]) -> Vec<String> {
    dedup_tags(schemas.iter().flat_map(|s| s.options().tags.iter().cloned()))
}

pub(crate) fn dedup_tags<I: IntoIterator<Item = String>>(tags: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Removes the run of leading spaces and tabs shared by every non-blank line.
///
/// Only identical prefixes count as common indentation: a tab and a space are
/// different margins. Lines holding nothing but spaces and tabs come out empty.
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.lines() {
        let content = line.trim_start_matches(INDENT_CHARS);
        if content.is_empty() {
            continue;
        }
        let indent = &line[..line.len() - content.len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin = margin.unwrap_or("");

    let mut out = text
        .lines()
        .map(|line| {
            if line.trim_start_matches(INDENT_CHARS).is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}

const INDENT_CHARS: [char; 2] = [' ', '\t'];

// Both inputs are ASCII, so any byte offset is a char boundary.
fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}
