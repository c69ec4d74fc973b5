//! Schema name registry.
//!
//! Holds the data-validation schemas the application exposes, keyed by their
//! canonical name, and resolves "variant" schemas (`BookCreate`, `BookUpdateSchema`)
//! back to the schema they were derived from.

use crate::error::{Error, Result};
use crate::model::Parameter;
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const SCHEMA_SUFFIX: &str = "Schema";
const VARIANT_SUFFIXES: [&str; 3] = [SCHEMA_SUFFIX, "Create", "Update"];

/// Anything that names a schema: a descriptor or a plain type name.
pub trait SchemaName {
    fn schema_name(&self) -> &str;
}

impl SchemaName for str {
    fn schema_name(&self) -> &str {
        self
    }
}

impl SchemaName for String {
    fn schema_name(&self) -> &str {
        self.as_str()
    }
}

impl SchemaName for SchemaDescriptor {
    fn schema_name(&self) -> &str {
        &self.type_name
    }
}

impl<T: SchemaName + ?Sized> SchemaName for &T {
    fn schema_name(&self) -> &str {
        (**self).schema_name()
    }
}

/// Display name of a schema: its type name without the trailing `Schema`.
pub fn display_name<S: SchemaName + ?Sized>(schema: &S) -> String {
    let name = schema.schema_name();
    name.strip_suffix(SCHEMA_SUFFIX).unwrap_or(name).to_string()
}

/// `$ref` pointing at the component registered for this schema.
pub fn schema_ref<S: SchemaName + ?Sized>(schema: &S) -> String {
    format!("#/components/schemas/{}", display_name(schema))
}

/// Strips `Schema`, `Create` and `Update` suffixes until none is left.
///
/// `BookCreateSchema`, `BookUpdate` and `Book` all yield `Book`.
pub fn canonical_name(name: &str) -> String {
    let mut current = name;
    loop {
        let stripped = VARIANT_SUFFIXES
            .iter()
            .find_map(|suffix| current.strip_suffix(suffix))
            .filter(|rest| !rest.is_empty());
        match stripped {
            Some(rest) => current = rest,
            None => return current.to_string(),
        }
    }
}

/// Value kinds a schema field can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    DateTime,
    /// Another registered schema, by type name
    Nested(String),
    List(Box<FieldKind>),
    /// Application-specific kind, documented through a type mapping
    Custom(String),
}

/// One declared field of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub allow_none: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub description: Option<String>,
    /// Extra OpenAPI attributes copied onto the property as-is
    pub metadata: Map<String, Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            allow_none: false,
            read_only: false,
            write_only: false,
            description: None,
            metadata: Map::new(),
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn nested(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Nested(schema.into()))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow_none(mut self) -> Self {
        self.allow_none = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Per-schema documentation options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaOptions {
    /// Name of the URL path parameter identifying one resource
    pub url_id_field: Option<String>,
    pub tags: Vec<String>,
    /// Static parameters every operation on this schema accepts
    pub url_parameters: Vec<Parameter>,
}

/// A data-validation schema as seen by the documentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    type_name: String,
    fields: Vec<Field>,
    options: SchemaOptions,
    description: Option<String>,
}

impl SchemaDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            options: SchemaOptions::default(),
            description: None,
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn url_id_field(mut self, name: impl Into<String>) -> Self {
        self.options.url_id_field = Some(name.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.options.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn url_parameter(mut self, parameter: Parameter) -> Self {
        self.options.url_parameters.push(parameter);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn display_name(&self) -> String {
        display_name(self)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn declared_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    pub fn schema_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The configured `url_id_field`, or `id` when the schema declares such a field.
    pub fn identifier_field(&self) -> Option<&str> {
        self.options
            .url_id_field
            .as_deref()
            .or_else(|| self.declared_field("id").map(|f| f.name.as_str()))
    }

    /// OpenAPI type of the identifier path parameter.
    pub fn identifier_type(&self) -> &'static str {
        let declared = self
            .identifier_field()
            .and_then(|name| self.declared_field(name))
            .or_else(|| self.declared_field("id"));
        match declared.map(|f| &f.kind) {
            Some(FieldKind::String) => "string",
            _ => "integer",
        }
    }
}

/// Canonical name -> schema. Populated once, read-only afterwards.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, SchemaDescriptor>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every schema under its canonical name.
    ///
    /// Once the registry holds schemas further calls are no-ops and return the
    /// already registered set.
    pub fn register<I>(&mut self, schemas: I) -> Result<&BTreeMap<String, SchemaDescriptor>>
    where
        I: IntoIterator<Item = SchemaDescriptor>,
    {
        if !self.schemas.is_empty() {
            debug!("Schema registry already populated, ignoring registration");
            return Ok(&self.schemas);
        }

        let mut found = BTreeMap::new();
        for schema in schemas {
            let name = schema.display_name();
            debug!("Registering schema {} as {}", schema.type_name(), name);
            if found.insert(name.clone(), schema).is_some() {
                return Err(Error::DuplicateSchema(name));
            }
        }

        if found.is_empty() {
            return Err(Error::NoSchemas);
        }

        info!("Registered {} schemas", found.len());
        self.schemas = found;
        Ok(&self.schemas)
    }

    /// Finds the schema a name or variant refers to.
    pub fn resolve_canonical<S: SchemaName + ?Sized>(&self, schema: &S) -> Result<&SchemaDescriptor> {
        let exact = display_name(schema);
        if let Some(found) = self.schemas.get(&exact) {
            return Ok(found);
        }

        let canonical = canonical_name(schema.schema_name());
        self.schemas
            .get(&canonical)
            .ok_or_else(|| Error::SchemaNotFound(schema.schema_name().to_string()))
    }

    pub fn get(&self, canonical: &str) -> Option<&SchemaDescriptor> {
        self.schemas.get(canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaDescriptor)> {
        self.schemas.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterLocation;

    fn book() -> SchemaDescriptor {
        SchemaDescriptor::new("BookSchema")
            .field(Field::integer("id").read_only())
            .field(Field::string("title").required())
            .tags(["Books"])
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(vec![book(), SchemaDescriptor::new("AuthorSchema")])
            .unwrap();
        registry
    }

    #[test]
    fn test_display_name_and_ref() {
        assert_eq!(display_name("BookSchema"), "Book");
        assert_eq!(display_name("Book"), "Book");
        assert_eq!(schema_ref(&book()), "#/components/schemas/Book");
    }

    #[test]
    fn test_canonical_name_strips_variant_suffixes() {
        assert_eq!(canonical_name("BookCreateSchema"), "Book");
        assert_eq!(canonical_name("BookUpdate"), "Book");
        assert_eq!(canonical_name("BookUpdateCreate"), "Book");
        assert_eq!(canonical_name("Book"), "Book");
        assert_eq!(canonical_name("Schema"), "Schema");
    }

    #[test]
    fn test_resolve_variants_to_same_schema() {
        let registry = registry();
        for name in ["Book", "BookCreate", "BookUpdate", "BookSchema", "BookCreateSchema"] {
            let found = registry.resolve_canonical(name).unwrap();
            assert_eq!(found.type_name(), "BookSchema", "resolving {}", name);
        }
    }

    #[test]
    fn test_resolve_accepts_descriptor() {
        let registry = registry();
        let variant = SchemaDescriptor::new("BookCreateSchema");
        assert_eq!(registry.resolve_canonical(&variant).unwrap().type_name(), "BookSchema");
    }

    #[test]
    fn test_resolve_unknown_schema_fails() {
        let registry = registry();
        let err = registry.resolve_canonical("PublisherCreate").unwrap_err();
        assert!(matches!(err, Error::SchemaNotFound(name) if name == "PublisherCreate"));
    }

    #[test]
    fn test_resolve_prefers_exact_name() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(vec![
                SchemaDescriptor::new("StatusSchema"),
                SchemaDescriptor::new("StatusUpdateSchema"),
            ])
            .unwrap();

        assert_eq!(
            registry.resolve_canonical("StatusUpdate").unwrap().type_name(),
            "StatusUpdateSchema"
        );
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = registry();
        let cached = registry
            .register(vec![SchemaDescriptor::new("PublisherSchema")])
            .unwrap();
        assert_eq!(cached.len(), 2);
        assert!(registry.get("Publisher").is_none());
    }

    #[test]
    fn test_register_nothing_fails() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(registry.register(Vec::new()), Err(Error::NoSchemas)));
    }

    #[test]
    fn test_register_duplicate_canonical_name_fails() {
        let mut registry = SchemaRegistry::new();
        let result = registry.register(vec![
            SchemaDescriptor::new("BookSchema"),
            SchemaDescriptor::new("Book"),
        ]);
        assert!(matches!(result, Err(Error::DuplicateSchema(name)) if name == "Book"));
    }

    #[test]
    fn test_identifier_field_and_type() {
        assert_eq!(book().identifier_field(), Some("id"));
        assert_eq!(book().identifier_type(), "integer");

        let isbn = SchemaDescriptor::new("EditionSchema")
            .field(Field::string("isbn"))
            .url_id_field("isbn");
        assert_eq!(isbn.identifier_field(), Some("isbn"));
        assert_eq!(isbn.identifier_type(), "string");

        let no_id = SchemaDescriptor::new("HealthSchema").field(Field::string("status"));
        assert_eq!(no_id.identifier_field(), None);
    }

    #[test]
    fn test_url_parameters_are_kept_in_order() {
        let schema = SchemaDescriptor::new("BookSchema")
            .url_parameter(Parameter::new("page", ParameterLocation::Query))
            .url_parameter(Parameter::new("X-Tenant", ParameterLocation::Header));
        let names: Vec<_> = schema
            .options()
            .url_parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["page", "X-Tenant"]);
    }
}
