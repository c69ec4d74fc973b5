use super::{
    dedup_tags, generate_operation_id, parameters_from_schema, update_errors, Security,
};
use crate::error::Result;
use crate::model::{HttpMethod, MediaType, Operation, Parameter, Response, Schema};
use crate::registry::{schema_ref, SchemaDescriptor};
use log::debug;
use std::collections::BTreeMap;

/// Builds the documentation of a GET operation.
///
/// A detail operation (the default) addresses one resource and gets the schema's
/// identifier as path parameter; a list operation (`many(true)`) does not. Schemas
/// without an identifier field are fine for both.
pub struct GetDocs<'a> {
    response_schema: &'a SchemaDescriptor,
    operation_id: Option<String>,
    summary: Option<String>,
    many: bool,
    errors: BTreeMap<u16, String>,
    security: Security,
    additional_content: BTreeMap<String, MediaType>,
    additional_parameters: Vec<Parameter>,
    tags_override: Option<Vec<String>>,
}

impl<'a> GetDocs<'a> {
    pub fn new(response_schema: &'a SchemaDescriptor) -> Self {
        Self {
            response_schema,
            operation_id: None,
            summary: None,
            many: false,
            errors: BTreeMap::new(),
            security: Security::default(),
            additional_content: BTreeMap::new(),
            additional_parameters: Vec::new(),
            tags_override: None,
        }
    }

    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn many(mut self, many: bool) -> Self {
        self.many = many;
        self
    }

    pub fn error(mut self, code: u16, description: impl Into<String>) -> Self {
        self.errors.insert(code, description.into());
        self
    }

    pub fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// Extra media type for the `200` response
    pub fn additional_content(mut self, content_type: impl Into<String>, media: MediaType) -> Self {
        self.additional_content.insert(content_type.into(), media);
        self
    }

    pub fn additional_parameter(mut self, parameter: Parameter) -> Self {
        self.additional_parameters.push(parameter);
        self
    }

    pub fn tags_override<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags_override = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<Operation> {
        let schema = self.response_schema;
        let operation_id = match self.operation_id {
            Some(id) => id,
            None => generate_operation_id(HttpMethod::Get, self.many, schema)?,
        };
        debug!("Building GET docs {} for {}", operation_id, schema.type_name());

        let mut operation = Operation::default().with_operation_id(operation_id);

        let id_schema = if self.many { None } else { Some(schema) };
        operation.parameters = parameters_from_schema(schema, id_schema);
        operation.parameters.extend(self.additional_parameters);
        operation.parameters.retain(|p| !p.name.is_empty());

        let mut ok = Response::json(Schema::reference(schema_ref(schema)));
        if let Some(content) = ok.content.as_mut() {
            content.extend(self.additional_content);
        }
        operation.responses.insert("200".to_string(), ok);

        operation.security = self.security.requirements();
        operation.tags = dedup_tags(
            self.tags_override
                .unwrap_or_else(|| schema.options().tags.clone()),
        );
        operation.summary = self.summary;

        update_errors(&mut operation, &self.errors);

        Ok(operation)
    }
}
