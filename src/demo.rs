//! A small bookstore application documented with this library.
//!
//! Used by the bundled binary and by the integration tests.

use crate::config::OpenApiSettings;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::model::{HttpMethod, MediaType, Operation, Parameter, ParameterLocation, Response, Schema};
use crate::openapi::OpenApi;
use crate::operation::{hidden, DeleteDocs, GetDocs, PatchDocs, PostDocs, Security};
use crate::registry::{Field, FieldKind, SchemaDescriptor, SchemaRegistry};
use crate::routes::{Route, RouteTable};
use axum::{routing::get, Router};
use serde_json::json;

const CHANGELOG: &str = "# Changelog\n\n## 1.0.0\n\n- Books and authors\n";

pub fn schemas() -> Vec<SchemaDescriptor> {
    vec![
        SchemaDescriptor::new("AuthorSchema")
            .field(Field::integer("id").read_only())
            .field(Field::string("name").required())
            .tags(["Authors"])
            .description("Somebody who wrote at least one book"),
        SchemaDescriptor::new("BookSchema")
            .field(Field::integer("id").read_only())
            .field(Field::string("title").required())
            .field(Field::string("isbn").description("ISBN-13"))
            .field(Field::new("published", FieldKind::Date).allow_none())
            .field(Field::nested("author", "AuthorSchema").read_only())
            .field(Field::new("rating", FieldKind::Custom("Stars".to_string())))
            .url_id_field("book_id")
            .tags(["Books"]),
        SchemaDescriptor::new("BookCreateSchema")
            .field(Field::string("title").required())
            .field(Field::string("isbn"))
            .field(Field::integer("author_id").write_only())
            .tags(["Books"]),
        SchemaDescriptor::new("BookUpdateSchema")
            .field(Field::string("title"))
            .field(Field::string("isbn"))
            .tags(["Books"]),
        SchemaDescriptor::new("BookDeletedSchema")
            .field(Field::integer("id"))
            .tags(["Books"]),
    ]
}

/// The bookstore's routes, documented with the registered schemas.
pub fn routes(registry: &SchemaRegistry) -> Result<RouteTable> {
    let author = registry.resolve_canonical("AuthorSchema")?;
    let book = registry.resolve_canonical("BookSchema")?;
    let book_create = registry.resolve_canonical("BookCreateSchema")?;
    let book_update = registry.resolve_canonical("BookUpdateSchema")?;
    let book_deleted = registry.resolve_canonical("BookDeletedSchema")?;

    let search = Parameter::new("q", ParameterLocation::Query)
        .schema(Schema::typed("string"))
        .description("Full text search in titles");

    let table = RouteTable::new()
        .route(
            Route::new("/books", "books.list")
                .get(
                    GetDocs::new(book)
                        .many(true)
                        .security(Security::NoToken)
                        .additional_parameter(search)
                        .build()?,
                )
                .post(
                    PostDocs::new(book_create)
                        .response_schema(book)
                        .error(409, "Book with this ISBN already exists")
                        .build()?,
                )
                .method(HttpMethod::Head)
                .method(HttpMethod::Options)
                .fragment(Fragment::yaml(
                    "
                    get:
                        summary: List books
                        description: |
                            All books sold by {{ api_name }}.
                    post:
                        summary: Add a book
                    ",
                )),
        )
        .route(
            Route::new("/books/<int:book_id>", "books.detail")
                .get(GetDocs::new(book).security(Security::NoToken).error(404, "No such book").build()?)
                .patch(PatchDocs::new(book_update).response_schema(book).build()?)
                .delete(DeleteDocs::new(book).security(Security::RefreshToken).build()?),
        )
        .route(
            Route::new("/books/<int:book_id>/archive", "books.archive")
                .post(
                    PostDocs::new(book)
                        .response_schema(book_deleted)
                        .operation_id("book_archive")
                        .build()?,
                )
                .method_fragment(HttpMethod::Post, Fragment::yaml("Moves a book to the archive")),
        )
        .route(
            Route::new("/books/<int:book_id>/cover", "books.cover")
                .method(HttpMethod::Get),
        )
        .route(
            Route::new("/authors/<int:id>", "authors.detail")
                .get(GetDocs::new(author).build()?),
        )
        .route(Route::new("/internal/reindex", "internal.reindex").post(hidden()))
        .route(Route::new("/health", "health").method(HttpMethod::Get))
        .route(Route::new("/static/<path:filename>", "static").method(HttpMethod::Get));

    Ok(table)
}

/// The documentation layer of the bookstore.
pub fn open_api(settings: OpenApiSettings) -> Result<OpenApi> {
    let cover = Operation::default()
        .with_operation_id("book_cover")
        .with_summary("Cover image of a book")
        .with_response(200, {
            let mut response = Response::described("JPEG image");
            response.content = Some(
                [(
                    "image/jpeg".to_string(),
                    MediaType::new(Schema::formatted("string", "binary")),
                )]
                .into_iter()
                .collect(),
            );
            response
        });

    let mut stars = Schema::typed("integer");
    stars.extra.insert("minimum".to_string(), json!(1));
    stars.extra.insert("maximum".to_string(), json!(5));

    let mut open_api = OpenApi::new(settings)?
        .with_changelog_loader(|| CHANGELOG.to_string())
        .with_exclusion(|rule, _| rule == "/health")
        .with_override("books.cover", HttpMethod::Get, cover)
        .add_type_mapping("Stars", stars);
    open_api.register_schemas(schemas())?;
    Ok(open_api)
}

/// The bookstore's own HTTP routes.
pub fn app() -> Router {
    Router::new().route("/health", get(|| async { axum::Json(json!({"status": "ok"})) }))
}
