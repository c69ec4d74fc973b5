//! Settings of the documentation layer.
//!
//! Plain values live in [`OpenApiSettings`] and can be read from YAML; behaviour
//! (seed and changelog loaders, exclusion predicate, overrides, converter hooks)
//! is registered as closures on [`crate::openapi::OpenApi`].

use crate::error::Result;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenApiSettings {
    /// Display name, used as the document title and in viewer pages
    pub api_name: String,
    pub api_version: String,
    /// Prefix under which `/docs` is mounted
    pub mounted_at: String,
    /// Keyword arguments handed to the seed loader
    pub seed_kwargs: Map<String, Value>,
    /// Extra variables available to fragment descriptions
    pub template_context: Map<String, Value>,
    /// Merged over the default Swagger UI configuration
    pub swagger_ui: Map<String, Value>,
}

impl Default for OpenApiSettings {
    fn default() -> Self {
        Self {
            api_name: "API".to_string(),
            api_version: "v1".to_string(),
            mounted_at: "/".to_string(),
            seed_kwargs: Map::new(),
            template_context: Map::new(),
            swagger_ui: Map::new(),
        }
    }
}

impl OpenApiSettings {
    pub fn new(api_name: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            api_version: api_version.into(),
            ..Default::default()
        }
    }

    pub fn mounted_at(mut self, prefix: impl Into<String>) -> Self {
        self.mounted_at = prefix.into();
        self
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(text)?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Mount point of the documentation routes, e.g. `/v1/docs` or `/docs`.
    pub fn docs_prefix(&self) -> String {
        let trimmed = self.mounted_at.trim_matches('/');
        if trimmed.is_empty() {
            "/docs".to_string()
        } else {
            format!("/{}/docs", trimmed)
        }
    }

    /// Variables available to fragment descriptions and viewer pages.
    pub fn template_values(&self) -> Value {
        let mut context = self.template_context.clone();
        context.insert("api_name".to_string(), Value::String(self.api_name.clone()));
        context.insert(
            "api_version".to_string(),
            Value::String(self.api_version.clone()),
        );
        Value::Object(context)
    }
}
