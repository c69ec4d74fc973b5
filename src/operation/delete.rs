use super::{
    generate_operation_id, parameters_from_schema, schema_tags, update_errors, Security,
    DELETED_DESCRIPTION,
};
use crate::error::{Error, Result};
use crate::model::{HttpMethod, Operation, Response};
use crate::registry::SchemaDescriptor;
use log::debug;
use std::collections::BTreeMap;

/// Builds the documentation of a DELETE operation.
///
/// Deleting always addresses one resource: a schema without identifier field is a
/// configuration error.
pub struct DeleteDocs<'a> {
    resource_schema: &'a SchemaDescriptor,
    operation_id: Option<String>,
    errors: BTreeMap<u16, String>,
    security: Security,
}

impl<'a> DeleteDocs<'a> {
    pub fn new(resource_schema: &'a SchemaDescriptor) -> Self {
        Self {
            resource_schema,
            operation_id: None,
            errors: BTreeMap::new(),
            security: Security::default(),
        }
    }

    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
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

    pub fn build(self) -> Result<Operation> {
        let schema = self.resource_schema;
        if schema.identifier_field().is_none() {
            return Err(Error::MissingIdentifierField {
                schema: schema.type_name().to_string(),
                method: HttpMethod::Delete,
            });
        }

        let operation_id = match self.operation_id {
            Some(id) => id,
            None => generate_operation_id(HttpMethod::Delete, false, schema)?,
        };
        debug!("Building DELETE docs {} for {}", operation_id, schema.type_name());

        let mut operation = Operation::default().with_operation_id(operation_id);
        operation.parameters = parameters_from_schema(schema, Some(schema));
        operation
            .responses
            .insert("204".to_string(), Response::described(DELETED_DESCRIPTION));
        operation.security = self.security.requirements();
        operation.tags = schema_tags(&[schema]);

        update_errors(&mut operation, &self.errors);

        Ok(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterLocation;
    use crate::registry::Field;

    #[test]
    fn test_delete_operation() {
        let book = SchemaDescriptor::new("BookSchema")
            .field(Field::integer("id"))
            .url_id_field("book_id")
            .tags(["Books"]);

        let op = DeleteDocs::new(&book)
            .security(Security::RefreshToken)
            .error(409, "Book is still on loan")
            .build()
            .unwrap();

        assert_eq!(op.operation_id.as_deref(), Some("book_delete"));
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].name, "book_id");
        assert_eq!(op.parameters[0].location, ParameterLocation::Path);
        assert_eq!(op.responses["204"].description, DELETED_DESCRIPTION);
        assert_eq!(op.responses["409"].description, "Book is still on loan");
        assert!(op.security[0].contains_key("refresh_token"));
        assert_eq!(op.tags, vec!["Books".to_string()]);
    }

    #[test]
    fn test_delete_error_description_with_non_breaking_space() {
        let book = SchemaDescriptor::new("BookSchema").field(Field::integer("id"));
        let op = DeleteDocs::new(&book)
            .error(404, "\u{a0}No such book\n x")
            .build()
            .unwrap();

        assert_eq!(op.responses["404"].description, "\u{a0}No such book\n x");
    }

    #[test]
    fn test_delete_without_identifier_fails_fast() {
        let settings = SchemaDescriptor::new("SettingsSchema").field(Field::string("theme"));
        let err = DeleteDocs::new(&settings).build().unwrap_err();

        assert!(matches!(
            err,
            Error::MissingIdentifierField { ref schema, method: HttpMethod::Delete }
                if schema == "SettingsSchema"
        ));
    }
}
