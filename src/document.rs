use crate::error::{Error, Result};
use crate::model::{HttpMethod, Operation, Schema};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// OpenAPI version used when the seed doesn't name one
pub const DEFAULT_OPENAPI_VERSION: &str = "3.0.2";

/// OpenAPI Info object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    #[serde(default)]
    pub title: String,
    /// API version
    #[serde(default)]
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// OPTIONS operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

impl PathItem {
    fn slot(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
        }
    }

    /// Stores the operation for a verb, replacing any previous one.
    pub fn set(&mut self, method: HttpMethod, operation: Operation) {
        *self.slot(method) = Some(operation);
    }

    pub fn get(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
        }
    }

    /// All documented operations, in method order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Options,
            HttpMethod::Head,
        ]
        .into_iter()
        .filter_map(move |method| self.get(method).map(|op| (method, op)))
    }
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, Schema>,
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "Map::is_empty"
    )]
    pub security_schemes: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    /// API paths
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    /// Components (schemas, security schemes, etc.)
    #[serde(default)]
    pub components: Components,
    /// Seed keys such as `servers` or `tags`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bearer JWT security schemes every document carries.
pub fn default_security_schemes() -> Map<String, Value> {
    let mut schemes = Map::new();
    for (name, token) in [("access_token", "access"), ("refresh_token", "refresh")] {
        schemes.insert(
            name.to_string(),
            json!({
                "type": "http",
                "scheme": "bearer",
                "bearerFormat": "JWT",
                "description": format!(
                    "This endpoint requires [JWT](https://jwt.io/) {} token.\n",
                    token
                ),
            }),
        );
    }
    schemes
}

/// The seed used when no loader is configured.
pub fn minimal_seed(title: &str, version: &str) -> Value {
    json!({
        "title": title,
        "version": version,
        "openapi_version": DEFAULT_OPENAPI_VERSION,
    })
}

/// OpenAPI document builder
pub struct DocumentBuilder {
    openapi: String,
    info: Info,
    paths: BTreeMap<String, PathItem>,
    components: Components,
    extra: Map<String, Value>,
}

impl DocumentBuilder {
    /// Starts a document from a seed mapping.
    ///
    /// Both loader-style keys (`title`, `version`, `openapi_version`) and document
    /// keys (`openapi`, `info`) are understood; the loader-style ones win. Anything
    /// else (`servers`, `tags`, ...) is kept as-is.
    pub fn from_seed(seed: Value) -> Result<Self> {
        debug!("Initializing DocumentBuilder from seed");

        let mut seed = match seed {
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidSeed(format!(
                    "expected a mapping, found {}",
                    other
                )))
            }
        };

        let openapi = match (seed.remove("openapi_version"), seed.remove("openapi")) {
            (Some(Value::String(version)), _) | (None, Some(Value::String(version))) => version,
            (None, None) => DEFAULT_OPENAPI_VERSION.to_string(),
            (Some(other), _) | (None, Some(other)) => {
                return Err(Error::InvalidSeed(format!(
                    "OpenAPI version must be a string, found {}",
                    other
                )))
            }
        };

        let mut info: Info = match seed.remove("info") {
            Some(info) => serde_json::from_value(info)
                .map_err(|e| Error::InvalidSeed(format!("invalid info: {}", e)))?,
            None => Info::default(),
        };
        if let Some(title) = seed.remove("title") {
            info.title = value_to_string(title);
        }
        if let Some(version) = seed.remove("version") {
            info.version = value_to_string(version);
        }
        if info.title.is_empty() || info.version.is_empty() {
            return Err(Error::InvalidSeed(
                "seed must provide a title and a version".to_string(),
            ));
        }

        let paths = match seed.remove("paths") {
            Some(paths) => serde_json::from_value(paths)
                .map_err(|e| Error::InvalidSeed(format!("invalid paths: {}", e)))?,
            None => BTreeMap::new(),
        };
        let components = match seed.remove("components") {
            Some(components) => serde_json::from_value(components)
                .map_err(|e| Error::InvalidSeed(format!("invalid components: {}", e)))?,
            None => Components::default(),
        };

        Ok(Self {
            openapi,
            info,
            paths,
            components,
            extra: seed,
        })
    }

    /// Registers a component schema under `name`.
    pub fn register_schema(&mut self, name: impl Into<String>, schema: Schema) -> Result<()> {
        let name = name.into();
        if self.components.schemas.contains_key(&name) {
            return Err(Error::DuplicateComponent(name));
        }
        debug!("Registering component schema: {}", name);
        self.components.schemas.insert(name, schema);
        Ok(())
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.components.schemas.contains_key(name)
    }

    /// Adds operations to a path; verbs already documented on it are replaced.
    pub fn add_path<I>(&mut self, path: impl Into<String>, operations: I)
    where
        I: IntoIterator<Item = (HttpMethod, Operation)>,
    {
        let path = path.into();
        let path_item = self.paths.entry(path.clone()).or_default();

        for (method, operation) in operations {
            debug!("Adding path: {} {}", method, path);
            if path_item.get(method).is_some() {
                warn!("{} {} is documented twice, keeping the last one", method, path);
            }
            path_item.set(method, operation);
        }
    }

    /// Build the final OpenAPI document
    pub fn build(mut self) -> OpenApiDocument {
        debug!("Building final OpenAPI document");

        // Fixed schemes replace whatever the seed declared under the same names
        self.components
            .security_schemes
            .extend(default_security_schemes());

        OpenApiDocument {
            openapi: self.openapi,
            info: self.info,
            paths: self.paths,
            components: self.components,
            extra: self.extra,
        }
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
