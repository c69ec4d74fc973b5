use super::{generate_operation_id, parameters_from_schema, schema_tags, update_errors, Security};
use crate::error::Result;
use crate::model::{
    HttpMethod, MediaType, Operation, RequestBody, Response, Schema, JSON_CONTENT_TYPE,
};
use crate::registry::{schema_ref, SchemaDescriptor};
use log::debug;
use std::collections::BTreeMap;

/// Builds the documentation of a PATCH operation.
///
/// The identifier path parameter comes from the response schema, so that an update
/// form without an `id` field still documents `/books/{id}`. Singleton resources
/// (no identifier at all) are allowed.
///
/// ```
/// use openapi_from_routes::operation::{PatchDocs, Security};
/// use openapi_from_routes::registry::{Field, SchemaDescriptor};
///
/// let book = SchemaDescriptor::new("BookSchema").field(Field::integer("id")).tags(["Books"]);
/// let update = SchemaDescriptor::new("BookUpdateSchema").field(Field::string("title"));
///
/// let op = PatchDocs::new(&update)
///     .response_schema(&book)
///     .security(Security::NoToken)
///     .error(409, "title must be unique!")
///     .build()
///     .unwrap();
/// assert_eq!(op.operation_id.as_deref(), Some("book_update"));
/// assert_eq!(op.parameters[0].name, "id");
/// ```
pub struct PatchDocs<'a> {
    request_schema: &'a SchemaDescriptor,
    response_schema: Option<&'a SchemaDescriptor>,
    operation_id: Option<String>,
    errors: BTreeMap<u16, String>,
    additional_content: BTreeMap<String, MediaType>,
    security: Security,
}

impl<'a> PatchDocs<'a> {
    pub fn new(request_schema: &'a SchemaDescriptor) -> Self {
        Self {
            request_schema,
            response_schema: None,
            operation_id: None,
            errors: BTreeMap::new(),
            additional_content: BTreeMap::new(),
            security: Security::default(),
        }
    }

    pub fn response_schema(mut self, schema: &'a SchemaDescriptor) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn error(mut self, code: u16, description: impl Into<String>) -> Self {
        self.errors.insert(code, description.into());
        self
    }

    /// Extra media type accepted in the request body
    pub fn additional_content(mut self, content_type: impl Into<String>, media: MediaType) -> Self {
        self.additional_content.insert(content_type.into(), media);
        self
    }

    pub fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    pub fn build(self) -> Result<Operation> {
        let request = self.request_schema;
        let response = self.response_schema.unwrap_or(request);

        let operation_id = match self.operation_id {
            Some(id) => id,
            None => generate_operation_id(HttpMethod::Patch, false, response)?,
        };
        debug!("Building PATCH docs {} for {}", operation_id, request.type_name());

        let has_id = response.identifier_field().is_some();
        let id_schema = if has_id { Some(response) } else { None };

        let mut operation = Operation::default().with_operation_id(operation_id);
        operation.parameters = parameters_from_schema(request, id_schema);
        operation.security = self.security.requirements();

        operation.responses.insert(
            "200".to_string(),
            Response::json(Schema::reference(schema_ref(response))),
        );

        let mut content = BTreeMap::new();
        content.insert(
            JSON_CONTENT_TYPE.to_string(),
            MediaType::new(Schema::reference(schema_ref(request))),
        );
        content.extend(self.additional_content);
        operation.request_body = Some(RequestBody {
            content,
            ..Default::default()
        });

        operation.tags = schema_tags(&[request, response]);

        update_errors(&mut operation, &self.errors);

        Ok(operation)
    }
}
