//! OpenAPI from routes - OpenAPI documentation for JSON REST applications.
//!
//! The application describes its resources with [`registry::SchemaDescriptor`]s and
//! documents each handler with an operation builder. This library collects that
//! documentation from the route table, assembles an OpenAPI 3 document and serves
//! it together with Swagger UI and ReDoc viewers.
//!
//! # Architecture
//!
//! 1. [`registry`] - Schema name registry and canonical names of schema variants
//! 2. [`converter`] - Converts schema descriptors into OpenAPI component schemas
//! 3. [`operation`] - Per-verb operation builders (GET, POST, PATCH, DELETE)
//! 4. [`routes`] - The route table handed to the collector
//! 5. [`fragment`] - Supplementary documentation merged on top of built operations
//! 6. [`collector`] - Walks the route table into path items with unique operation ids
//! 7. [`document`] - Constructs the complete OpenAPI document
//! 8. [`openapi`] - Assembles schemas and paths into servable [`openapi::ApiDocs`]
//! 9. [`server`] - axum routes serving the document and viewer pages
//! 10. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```
//! use openapi_from_routes::{
//!     config::OpenApiSettings,
//!     openapi::OpenApi,
//!     operation::{GetDocs, PostDocs},
//!     registry::{Field, SchemaDescriptor},
//!     routes::{Route, RouteTable},
//! };
//!
//! let book = SchemaDescriptor::new("BookSchema")
//!     .field(Field::integer("id").read_only())
//!     .field(Field::string("title").required())
//!     .tags(["Books"]);
//! let create = SchemaDescriptor::new("BookCreateSchema").field(Field::string("title"));
//!
//! let routes = RouteTable::new()
//!     .route(
//!         Route::new("/books", "books.list")
//!             .get(GetDocs::new(&book).many(true).build().unwrap())
//!             .post(PostDocs::new(&create).response_schema(&book).build().unwrap()),
//!     )
//!     .route(Route::new("/books/<int:id>", "books.detail").get(GetDocs::new(&book).build().unwrap()));
//!
//! let mut open_api = OpenApi::new(OpenApiSettings::new("Books API", "1.0.0")).unwrap();
//! open_api.register_schemas(vec![book, create]).unwrap();
//! let docs = open_api.init(&routes).unwrap();
//!
//! assert!(docs.document.paths.contains_key("/books/{id}"));
//! assert!(docs.json.contains("book_create"));
//! ```
//!
//! # Command-Line Interface
//!
//! The bundled binary serves the documentation of a demo application, see the
//! [`cli`] and [`demo`] modules.

pub mod cli;
pub mod collector;
pub mod config;
pub mod converter;
pub mod demo;
pub mod document;
pub mod error;
pub mod fragment;
pub mod model;
pub mod openapi;
pub mod operation;
pub mod registry;
pub mod routes;
pub mod serializer;
pub mod server;
