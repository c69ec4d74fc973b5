use super::{
    generate_operation_id, parameters_from_schema, schema_tags, update_errors, Security,
    DELETED_DESCRIPTION,
};
use crate::error::Result;
use crate::model::{
    HttpMethod, MediaType, Operation, Parameter, ParameterLocation, RequestBody, Response, Schema,
    JSON_CONTENT_TYPE,
};
use crate::registry::{display_name, schema_ref, SchemaDescriptor};
use log::debug;
use std::collections::BTreeMap;

/// Builds the documentation of a POST operation.
///
/// The response schema defaults to the request schema. A response schema whose
/// name contains "deleted" turns the `201` answer into a bare `204`.
pub struct PostDocs<'a> {
    request_schema: &'a SchemaDescriptor,
    response_schema: Option<&'a SchemaDescriptor>,
    operation_id: Option<String>,
    summary: Option<String>,
    errors: BTreeMap<u16, String>,
    headers: Vec<Parameter>,
    security: Security,
    additional_parameters: Vec<Parameter>,
    additional_content: BTreeMap<String, MediaType>,
}

impl<'a> PostDocs<'a> {
    pub fn new(request_schema: &'a SchemaDescriptor) -> Self {
        Self {
            request_schema,
            response_schema: None,
            operation_id: None,
            summary: None,
            errors: BTreeMap::new(),
            headers: Vec::new(),
            security: Security::default(),
            additional_parameters: Vec::new(),
            additional_content: BTreeMap::new(),
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

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn error(mut self, code: u16, description: impl Into<String>) -> Self {
        self.errors.insert(code, description.into());
        self
    }

    /// Request header; its location is forced to `header`
    pub fn header(mut self, mut header: Parameter) -> Self {
        header.location = ParameterLocation::Header;
        self.headers.push(header);
        self
    }

    pub fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    pub fn additional_parameter(mut self, parameter: Parameter) -> Self {
        self.additional_parameters.push(parameter);
        self
    }

    /// Extra media type accepted in the request body
    pub fn additional_content(mut self, content_type: impl Into<String>, media: MediaType) -> Self {
        self.additional_content.insert(content_type.into(), media);
        self
    }

    pub fn build(self) -> Result<Operation> {
        let request = self.request_schema;
        let response = self.response_schema.unwrap_or(request);

        let operation_id = match self.operation_id {
            Some(id) => id,
            None => generate_operation_id(HttpMethod::Post, false, response)?,
        };
        debug!("Building POST docs {} for {}", operation_id, request.type_name());

        let mut operation = Operation::default().with_operation_id(operation_id);
        operation.security = self.security.requirements();

        if display_name(response).to_lowercase().contains("deleted") {
            operation
                .responses
                .insert("204".to_string(), Response::described(DELETED_DESCRIPTION));
        } else {
            operation.responses.insert(
                "201".to_string(),
                Response::json(Schema::reference(schema_ref(response))),
            );
        }

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

        operation.summary = self.summary;

        // Creating a resource never addresses an existing one.
        let addresses_resource = request.options().url_id_field.is_some()
            && !display_name(request).to_lowercase().contains("create");
        let id_schema = if addresses_resource { Some(request) } else { None };
        operation.parameters = parameters_from_schema(request, id_schema);
        operation.parameters.extend(self.additional_parameters);
        operation.parameters.extend(self.headers);
        operation.parameters.retain(|p| !p.name.is_empty());

        operation.tags = schema_tags(&[request, response]);

        update_errors(&mut operation, &self.errors);

        Ok(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Field;
    use pretty_assertions::assert_eq;

    fn book() -> SchemaDescriptor {
        SchemaDescriptor::new("BookSchema")
            .field(Field::integer("id"))
            .url_id_field("id")
            .tags(["Books"])
    }

    fn book_create() -> SchemaDescriptor {
        SchemaDescriptor::new("BookCreateSchema")
            .field(Field::string("title"))
            .url_id_field("id")
            .tags(["Books", "Write"])
    }

    #[test]
    fn test_create_operation() {
        let request = book_create();
        let response = book();
        let op = PostDocs::new(&request)
            .response_schema(&response)
            .build()
            .unwrap();

        assert_eq!(op.operation_id.as_deref(), Some("book_create"));
        assert!(op.responses.contains_key("201"));
        assert_eq!(
            op.responses["201"].content.as_ref().unwrap()[JSON_CONTENT_TYPE].schema,
            Some(Schema::reference("#/components/schemas/Book"))
        );

        let body = op.request_body.unwrap();
        assert_eq!(
            body.content[JSON_CONTENT_TYPE].schema,
            Some(Schema::reference("#/components/schemas/BookCreate"))
        );

        // "create" schemas never get an id path parameter
        assert!(op.parameters.is_empty());
        assert_eq!(op.tags, vec!["Books", "Write"]);
    }

    #[test]
    fn test_deleted_response_answers_204() {
        let request = book_create();
        let response = SchemaDescriptor::new("BookDeletedSchema");
        let op = PostDocs::new(&request)
            .response_schema(&response)
            .build()
            .unwrap();

        assert!(op.responses.contains_key("204"));
        assert!(!op.responses.contains_key("201"));
        assert_eq!(op.responses["204"].description, DELETED_DESCRIPTION);
    }

    #[test]
    fn test_action_on_existing_resource_gets_id() {
        let publish = SchemaDescriptor::new("BookPublishSchema").url_id_field("book_id");
        let op = PostDocs::new(&publish).build().unwrap();

        assert_eq!(op.operation_id.as_deref(), Some("book_publish_create"));
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].name, "book_id");
    }

    #[test]
    fn test_headers_and_public_security() {
        let request = book_create();
        let op = PostDocs::new(&request)
            .operation_id("import_books")
            .summary("Bulk import")
            .header(Parameter::new("X-Request-Id", ParameterLocation::Query))
            .additional_content(
                "application/octet-stream",
                MediaType::new(Schema::formatted("string", "binary")),
            )
            .security(Security::NoToken)
            .error(422, "title must be at least 1 character!")
            .build()
            .unwrap();

        assert_eq!(op.operation_id.as_deref(), Some("import_books"));
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].location, ParameterLocation::Header);
        assert!(op.security.is_empty());
        assert!(op
            .request_body
            .as_ref()
            .unwrap()
            .content
            .contains_key("application/octet-stream"));
        assert_eq!(op.responses["422"].description, "title must be at least 1 character!");
    }
}
