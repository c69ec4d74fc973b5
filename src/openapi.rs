//! Document assembly.
//!
//! [`OpenApi`] owns everything needed to document an application: settings, the
//! schema registry, the converter and the endpoint collector. [`OpenApi::init`]
//! turns a route table into [`ApiDocs`], the immutable bundle served by
//! [`crate::server`].

use crate::collector::Collector;
use crate::config::OpenApiSettings;
use crate::converter::SchemaConverter;
use crate::document::{minimal_seed, DocumentBuilder, OpenApiDocument};
use crate::error::{Error, Result};
use crate::fragment::DescriptionRenderer;
use crate::model::{HttpMethod, Operation, Schema};
use crate::registry::{display_name, Field, SchemaDescriptor, SchemaRegistry};
use crate::routes::RouteTable;
use crate::serializer::{serialize_json, serialize_yaml};
use log::{debug, info};
use minijinja::{context, Environment};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Builds the seed document from the configured keyword arguments.
pub type SeedLoader = Box<dyn Fn(&Map<String, Value>) -> Result<Value> + Send + Sync>;

/// Produces the changelog markdown, called on every changelog request.
pub type ChangelogLoader = Arc<dyn Fn() -> String + Send + Sync>;

const SWAGGER_UI_TEMPLATE: &str = "swagger_ui.html.j2";
const RE_DOC_TEMPLATE: &str = "re_doc.html.j2";
const CHANGELOG_TEMPLATE: &str = "changelog.html.j2";

pub const SWAGGER_JSON_PATH: &str = "/static/swagger.json";
pub const SWAGGER_YAML_PATH: &str = "/static/swagger.yaml";
pub const SWAGGER_UI_PATH: &str = "/swagger_ui";
pub const RE_DOC_PATH: &str = "/re_doc";
pub const CHANGELOG_MD_PATH: &str = "/static/changelog.md";
pub const CHANGELOG_PATH: &str = "/changelog";

/// The documentation of an application, ready to be served.
#[derive(Clone)]
pub struct ApiDocs {
    pub document: OpenApiDocument,
    /// Pretty printed JSON of `document`
    pub json: String,
    pub yaml: String,
    pub swagger_ui_html: String,
    pub re_doc_html: String,
    pub changelog_html: Option<String>,
    pub changelog_loader: Option<ChangelogLoader>,
    /// Where the documentation routes are mounted, e.g. `/v1/docs`
    pub docs_prefix: String,
}

impl ApiDocs {
    pub fn changelog_md(&self) -> Option<String> {
        self.changelog_loader.as_ref().map(|load| load())
    }
}

pub struct OpenApi {
    settings: OpenApiSettings,
    registry: SchemaRegistry,
    converter: SchemaConverter,
    collector: Collector,
    seed_loader: Option<SeedLoader>,
    changelog_loader: Option<ChangelogLoader>,
    pages: Environment<'static>,
}

impl OpenApi {
    pub fn new(settings: OpenApiSettings) -> Result<Self> {
        debug!("Initializing OpenApi for {}", settings.api_name);

        let mut pages = Environment::new();
        pages.add_template(
            SWAGGER_UI_TEMPLATE,
            include_str!("../templates/swagger_ui.html.j2"),
        )?;
        pages.add_template(RE_DOC_TEMPLATE, include_str!("../templates/re_doc.html.j2"))?;
        pages.add_template(
            CHANGELOG_TEMPLATE,
            include_str!("../templates/changelog.html.j2"),
        )?;

        let renderer = DescriptionRenderer::new(settings.template_values());
        Ok(Self {
            settings,
            registry: SchemaRegistry::new(),
            converter: SchemaConverter::new(),
            collector: Collector::new(renderer),
            seed_loader: None,
            changelog_loader: None,
            pages,
        })
    }

    pub fn with_seed_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Result<Value> + Send + Sync + 'static,
    {
        self.seed_loader = Some(Box::new(loader));
        self
    }

    pub fn with_changelog_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.changelog_loader = Some(Arc::new(loader));
        self
    }

    /// Leaves (rule, verb) pairs out of the document, unless overridden.
    pub fn with_exclusion<F>(mut self, exclude: F) -> Self
    where
        F: Fn(&str, HttpMethod) -> bool + Send + Sync + 'static,
    {
        self.collector.set_exclusion(exclude);
        self
    }

    /// Replaces the documentation of a verb on the route with the given rule or
    /// endpoint name.
    pub fn with_override(
        mut self,
        key: impl Into<String>,
        method: HttpMethod,
        operation: Operation,
    ) -> Self {
        self.collector.overrides_mut().insert(key, method, operation);
        self
    }

    pub fn add_type_mapping(mut self, kind: impl Into<String>, schema: Schema) -> Self {
        self.converter.add_type_mapping(kind, schema);
        self
    }

    pub fn add_attribute_function<F>(mut self, function: F) -> Self
    where
        F: Fn(&Field) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.converter.add_attribute_function(function);
        self
    }

    /// Registers the application's schemas; later calls are no-ops.
    pub fn register_schemas<I>(&mut self, schemas: I) -> Result<()>
    where
        I: IntoIterator<Item = SchemaDescriptor>,
    {
        self.registry.register(schemas)?;
        Ok(())
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &OpenApiSettings {
        &self.settings
    }

    /// Forgets handed out operation ids so that `init` can run again.
    pub fn reset(&mut self) {
        self.collector.reset();
    }

    /// Assembles the documentation of `routes`.
    pub fn init(&mut self, routes: &RouteTable) -> Result<ApiDocs> {
        info!("Building OpenAPI documentation for {}", self.settings.api_name);

        let seed = match &self.seed_loader {
            Some(load) => load(&self.settings.seed_kwargs)?,
            None => minimal_seed(&self.settings.api_name, &self.settings.api_version),
        };
        let mut builder = DocumentBuilder::from_seed(seed)?;

        for (_, descriptor) in self.registry.iter() {
            self.register_component(&mut builder, descriptor)?;
        }

        for collected in self.collector.collect(routes)? {
            builder.add_path(collected.path, collected.operations);
        }

        let document = builder.build();
        let json = serialize_json(&document)
            .map_err(|e| Error::SerializationError(format!("{:#}", e)))?;
        let yaml = serialize_yaml(&document)
            .map_err(|e| Error::SerializationError(format!("{:#}", e)))?;

        let docs_prefix = self.settings.docs_prefix();
        let swagger_json_url = format!("{}{}", docs_prefix, SWAGGER_JSON_PATH);
        let api_name = &self.settings.api_name;

        let swagger_ui_html = self.pages.get_template(SWAGGER_UI_TEMPLATE)?.render(context! {
            api_name => api_name,
            config_json => self.swagger_ui_config(&swagger_json_url).to_string(),
        })?;
        let re_doc_html = self.pages.get_template(RE_DOC_TEMPLATE)?.render(context! {
            api_name => api_name,
            swagger_json_url => swagger_json_url,
        })?;
        let changelog_html = match self.changelog_loader {
            Some(_) => Some(self.pages.get_template(CHANGELOG_TEMPLATE)?.render(context! {
                api_name => api_name,
                changelog_md_url => format!("{}{}", docs_prefix, CHANGELOG_MD_PATH),
            })?),
            None => None,
        };

        info!(
            "Documented {} paths and {} components",
            document.paths.len(),
            document.components.schemas.len()
        );

        Ok(ApiDocs {
            document,
            json,
            yaml,
            swagger_ui_html,
            re_doc_html,
            changelog_html,
            changelog_loader: self.changelog_loader.clone(),
            docs_prefix,
        })
    }

    /// Swagger UI configuration, with the configured overrides applied.
    pub fn swagger_ui_config(&self, swagger_json_url: &str) -> Value {
        let mut config = json!({
            "dom_id": "#swagger-ui",
            "url": swagger_json_url,
            "layout": "StandaloneLayout",
            "deepLinking": true,
            "docExpansion": "none",
            "validatorUrl": "none",
            "tagSorter": "cmpr",
        });
        if let Value::Object(map) = &mut config {
            map.extend(self.settings.swagger_ui.clone());
        }
        config
    }

    /// Registers a schema and, transitively, the schemas its fields nest.
    fn register_component(
        &self,
        builder: &mut DocumentBuilder,
        descriptor: &SchemaDescriptor,
    ) -> Result<()> {
        let converted = self.converter.convert(descriptor);

        match builder.register_schema(descriptor.display_name(), converted.schema) {
            Err(Error::DuplicateComponent(name)) => {
                debug!("Component {} already registered", name);
                return Ok(());
            }
            other => other?,
        }

        // `$ref`s name the nested schema exactly, so no variant fallback here.
        for nested in &converted.nested {
            let name = display_name(nested.as_str());
            let nested = self
                .registry
                .get(&name)
                .ok_or_else(|| Error::SchemaNotFound(nested.clone()))?;
            if !builder.has_schema(&name) {
                self.register_component(builder, nested)?;
            }
        }
        Ok(())
    }
}
