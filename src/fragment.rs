//! Supplementary documentation fragments.
//!
//! A fragment is a partial operation descriptor kept next to a handler, usually as
//! YAML text. Its fields are merged on top of the descriptor produced by the
//! operation builders, field by field, with the fragment winning:
//!
//! ```yaml
//! summary: List books
//! description: |
//!     Books published by {{ api_name }}.
//! ```
//!
//! A fragment that is just a string is taken as the description. Fragments shared
//! by several verbs can key their fields by verb name (`get:`, `patch:`, ...); a
//! verb without its own key gets the remaining fields, minus the other verbs' keys.

use crate::error::Result;
use crate::model::{HttpMethod, Operation};
use crate::operation::dedent;
use log::debug;
use minijinja::Environment;
use serde_json::{Map, Value};

/// Partial operation descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// YAML markup, dedented before parsing
    Yaml(String),
    /// Already structured fields
    Value(Value),
}

impl Fragment {
    pub fn yaml(text: impl Into<String>) -> Self {
        Fragment::Yaml(text.into())
    }

    pub fn value(value: Value) -> Self {
        Fragment::Value(value)
    }

    /// Fields this fragment sets for `method`.
    pub fn fields_for(&self, method: HttpMethod) -> std::result::Result<Map<String, Value>, String> {
        let parsed = match self {
            Fragment::Yaml(text) if text.trim().is_empty() => Value::Null,
            Fragment::Yaml(text) => serde_yaml::from_str::<Value>(&dedent(text))
                .map_err(|e| format!("fragment is not valid YAML: {}", e))?,
            Fragment::Value(value) => value.clone(),
        };

        let parsed = match parsed {
            Value::Object(mut map) => match map.remove(method.as_str()) {
                Some(for_method) => for_method,
                None => {
                    // Fields meant for the other verbs
                    map.retain(|key, _| key.parse::<HttpMethod>().is_err());
                    Value::Object(map)
                }
            },
            other => other,
        };

        match parsed {
            Value::Null => Ok(Map::new()),
            Value::String(description) => {
                let mut map = Map::new();
                map.insert("description".to_string(), Value::String(description));
                Ok(map)
            }
            Value::Object(map) => Ok(map),
            other => Err(format!("expected a mapping or a string, found {}", other)),
        }
    }
}

/// Shallow merge: every field of `fields` replaces the descriptor's own.
pub fn merge_fragment(
    operation: Operation,
    fields: Map<String, Value>,
) -> std::result::Result<Operation, serde_json::Error> {
    if fields.is_empty() {
        return Ok(operation);
    }

    let mut merged = match serde_json::to_value(operation)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in fields {
        debug!("Fragment sets {}", key);
        merged.insert(key, value);
    }
    serde_json::from_value(Value::Object(merged))
}

/// Renders fragment descriptions through the template engine.
pub struct DescriptionRenderer {
    env: Environment<'static>,
    context: Value,
}

impl DescriptionRenderer {
    /// `context` provides the variables descriptions may reference.
    pub fn new(context: Value) -> Self {
        Self {
            env: Environment::new(),
            context,
        }
    }

    pub fn render(&self, text: &str) -> Result<String> {
        Ok(self.env.render_str(text, &self.context)?)
    }
}

impl Default for DescriptionRenderer {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Response, Schema};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_bare_string_is_description() {
        let fields = Fragment::yaml("Returns all books").fields_for(HttpMethod::Get).unwrap();
        assert_eq!(fields.get("description"), Some(&json!("Returns all books")));
    }

    #[test]
    fn test_indented_yaml_is_dedented() {
        let fragment = Fragment::yaml(
            "
            summary: List books
            description: |
                Long description!
            ",
        );
        let fields = fragment.fields_for(HttpMethod::Get).unwrap();
        assert_eq!(fields.get("summary"), Some(&json!("List books")));
        assert_eq!(fields.get("description"), Some(&json!("Long description!\n")));
    }

    #[test]
    fn test_fields_keyed_by_verb() {
        let fragment = Fragment::value(json!({
            "get": {"summary": "Read"},
            "patch": "Write"
        }));

        let get = fragment.fields_for(HttpMethod::Get).unwrap();
        assert_eq!(get.get("summary"), Some(&json!("Read")));

        let patch = fragment.fields_for(HttpMethod::Patch).unwrap();
        assert_eq!(patch.get("description"), Some(&json!("Write")));

        // No key for DELETE: nothing applies
        let delete = fragment.fields_for(HttpMethod::Delete).unwrap();
        assert!(delete.is_empty());
    }

    #[test]
    fn test_shared_fields_apply_to_verbs_without_a_key() {
        let fragment = Fragment::yaml(
            "
            tags: [Books]
            get:
                summary: Read
            PATCH: Write
            ",
        );

        let delete = fragment.fields_for(HttpMethod::Delete).unwrap();
        assert_eq!(delete.keys().collect::<Vec<_>>(), vec!["tags"]);
        assert_eq!(delete.get("tags"), Some(&json!(["Books"])));

        let get = fragment.fields_for(HttpMethod::Get).unwrap();
        assert_eq!(get.get("summary"), Some(&json!("Read")));
        assert!(!get.contains_key("tags"));
    }

    #[test]
    fn test_empty_fragment_sets_nothing() {
        assert!(Fragment::yaml("").fields_for(HttpMethod::Get).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_fragment_is_rejected() {
        assert!(Fragment::yaml("42").fields_for(HttpMethod::Get).is_err());
    }

    #[test]
    fn test_merge_fragment_wins_per_field() {
        let operation = Operation::default()
            .with_operation_id("book_list")
            .with_summary("from builder")
            .with_response(200, Response::json(Schema::reference("#/components/schemas/Book")));

        let mut fields = Map::new();
        fields.insert("summary".to_string(), json!("from fragment"));
        fields.insert("deprecated".to_string(), json!(true));

        let merged = merge_fragment(operation.clone(), fields).unwrap();
        assert_eq!(merged.summary.as_deref(), Some("from fragment"));
        assert_eq!(merged.operation_id, operation.operation_id);
        assert_eq!(merged.responses, operation.responses);
        assert_eq!(merged.extra.get("deprecated"), Some(&json!(true)));
    }

    #[test]
    fn test_merge_rejects_malformed_fields() {
        let mut fields = Map::new();
        fields.insert("parameters".to_string(), json!("not a list"));
        assert!(merge_fragment(Operation::default(), fields).is_err());
    }

    #[test]
    fn test_render_description_with_context() {
        let renderer = DescriptionRenderer::new(json!({"api_name": "Books API"}));
        assert_eq!(
            renderer.render("Served by {{ api_name }}").unwrap(),
            "Served by Books API"
        );
        assert!(renderer.render("{{ broken").is_err());
    }
}
