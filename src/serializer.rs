//! Serialization of OpenAPI documents to JSON or YAML, and export to disk.
//!
//! The same text is served over HTTP by [`crate::server`] and written by the demo
//! binary's `--output` flag.

use crate::document::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Output formats for an OpenAPI document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Guesses the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

/// Serializes an OpenAPI document to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes an OpenAPI document to JSON format with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

pub fn serialize(doc: &OpenApiDocument, format: Format) -> Result<String> {
    match format {
        Format::Json => serialize_json(doc),
        Format::Yaml => serialize_yaml(doc),
    }
}

/// Writes string content to a file.
///
/// Creates the file and its parent directories if they don't exist, or
/// overwrites the file if it does.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{minimal_seed, DocumentBuilder};
    use crate::model::{HttpMethod, Operation, Response};
    use tempfile::TempDir;

    fn create_test_document() -> OpenApiDocument {
        let mut builder = DocumentBuilder::from_seed(minimal_seed("Test API", "1.0.0")).unwrap();
        builder.add_path(
            "/books/{book_id}",
            vec![(
                HttpMethod::Get,
                Operation::default()
                    .with_operation_id("book_detail")
                    .with_response(200, Response::described("A book")),
            )],
        );
        builder.build()
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("openapi: 3.0.2"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("book_id"));
        assert!(yaml.contains("operationId: book_detail"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&create_test_document()).unwrap();

        // Pretty printed
        assert!(json.contains('\n'));
        assert!(json.contains("\"operationId\": \"book_detail\""));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["info"]["title"], "Test API");
        assert_eq!(
            parsed["components"]["securitySchemes"]["access_token"]["scheme"],
            "bearer"
        );
    }

    #[test]
    fn test_yaml_and_json_describe_the_same_document() {
        let doc = create_test_document();
        let from_yaml: serde_json::Value =
            serde_yaml::from_str(&serialize_yaml(&doc).unwrap()).unwrap();
        let from_json: serde_json::Value =
            serde_json::from_str(&serialize_json(&doc).unwrap()).unwrap();
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("api/swagger.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("swagger.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("swagger.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("swagger")), Format::Json);
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docs").join("static").join("swagger.json");

        let content = serialize(&create_test_document(), Format::Json).unwrap();
        write_to_file(&content, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }
}
