use crate::model::Schema;
use crate::registry::{schema_ref, Field, FieldKind, SchemaDescriptor};
use log::debug;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Hook producing extra OpenAPI attributes for a field.
pub type AttributeFunction = Box<dyn Fn(&Field) -> Map<String, Value> + Send + Sync>;

/// Converts schema descriptors into OpenAPI component schemas.
///
/// Application-specific field kinds are documented through type mappings
/// (`FieldKind::Custom(name)` -> schema), and attribute functions may add
/// arbitrary attributes to any property.
#[derive(Default)]
pub struct SchemaConverter {
    type_mappings: HashMap<String, Schema>,
    attribute_functions: Vec<AttributeFunction>,
}

/// A converted component plus the schemas its fields reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedSchema {
    pub schema: Schema,
    /// Type names of nested schemas, in field order, without duplicates
    pub nested: Vec<String>,
}

impl SchemaConverter {
    pub fn new() -> Self {
        debug!("Initializing SchemaConverter");
        Self::default()
    }

    /// Documents `FieldKind::Custom(kind)` fields with the given schema.
    pub fn add_type_mapping(&mut self, kind: impl Into<String>, schema: Schema) {
        self.type_mappings.insert(kind.into(), schema);
    }

    pub fn add_attribute_function<F>(&mut self, function: F)
    where
        F: Fn(&Field) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.attribute_functions.push(Box::new(function));
    }

    /// Generate the object schema for a descriptor
    pub fn convert(&self, descriptor: &SchemaDescriptor) -> ConvertedSchema {
        debug!("Converting schema: {}", descriptor.type_name());

        let mut nested = Vec::new();
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();

        for field in descriptor.fields() {
            let property = self.property(field, &mut nested);
            properties.insert(field.name.clone(), property);

            if field.required {
                required.push(field.name.clone());
            }
        }

        let schema = Schema {
            properties: Some(properties),
            required: if required.is_empty() {
                None
            } else {
                Some(required)
            },
            description: descriptor.schema_description().map(str::to_string),
            ..Schema::typed("object")
        };

        ConvertedSchema { schema, nested }
    }

    fn property(&self, field: &Field, nested: &mut Vec<String>) -> Schema {
        let mut schema = self.kind_to_schema(&field.kind, nested);

        if field.description.is_some() {
            schema.description = field.description.clone();
        }
        if field.allow_none {
            schema.nullable = Some(true);
        }
        if field.read_only {
            schema.read_only = Some(true);
        }
        if field.write_only {
            schema.write_only = Some(true);
        }
        for (key, value) in &field.metadata {
            schema.extra.insert(key.clone(), value.clone());
        }
        for function in &self.attribute_functions {
            schema.extra.extend(function(field));
        }

        schema
    }

    fn kind_to_schema(&self, kind: &FieldKind, nested: &mut Vec<String>) -> Schema {
        match kind {
            FieldKind::Integer => Schema::typed("integer"),
            FieldKind::Float => Schema::formatted("number", "float"),
            FieldKind::String => Schema::typed("string"),
            FieldKind::Boolean => Schema::typed("boolean"),
            FieldKind::Date => Schema::formatted("string", "date"),
            FieldKind::DateTime => Schema::formatted("string", "date-time"),
            FieldKind::Nested(type_name) => {
                if !nested.contains(type_name) {
                    nested.push(type_name.clone());
                }
                Schema::reference(schema_ref(type_name))
            }
            FieldKind::List(inner) => Schema::array(self.kind_to_schema(inner, nested)),
            FieldKind::Custom(name) => match self.type_mappings.get(name) {
                Some(mapped) => mapped.clone(),
                None => {
                    debug!("No type mapping for field kind {}, using object placeholder", name);
                    Schema::typed("object")
                }
            },
        }
    }
}
