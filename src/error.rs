use crate::model::HttpMethod;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// No schema was handed to an empty registry
    NoSchemas,
    /// Two registered schemas share a canonical name
    DuplicateSchema(String),
    /// No registered schema matches the given name or variant
    SchemaNotFound(String),
    /// Operation ids can't be generated for this verb
    UnsupportedMethod(HttpMethod),
    MissingIdentifierField { schema: String, method: HttpMethod },
    /// The document builder already holds a component with this name
    DuplicateComponent(String),
    InvalidSeed(String),
    InvalidFragment { endpoint: String, message: String },
    TemplateError(String),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::NoSchemas => write!(f, "no schemas were registered"),
            Error::DuplicateSchema(name) => {
                write!(f, "schema {} is registered more than once", name)
            }
            Error::SchemaNotFound(name) => {
                write!(f, "couldn't find main schema for {}", name)
            }
            Error::UnsupportedMethod(method) => {
                write!(f, "can't generate operation id for {} operations", method)
            }
            Error::MissingIdentifierField { schema, method } => write!(
                f,
                "{} on {} requires an identifier field but the schema declares none",
                method, schema
            ),
            Error::DuplicateComponent(name) => {
                write!(f, "component schema {} is already registered", name)
            }
            Error::InvalidSeed(msg) => write!(f, "invalid specification seed: {}", msg),
            Error::InvalidFragment { endpoint, message } => {
                write!(f, "invalid documentation fragment for {}: {}", endpoint, message)
            }
            Error::TemplateError(msg) => write!(f, "template error: {}", msg),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML error: {}", err))
    }
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        Error::TemplateError(err.to_string())
    }
}
