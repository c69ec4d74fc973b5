use openapi_from_routes::{
    config::OpenApiSettings,
    demo,
    error::Error,
    model::{HttpMethod, Operation, ParameterLocation, Schema},
    openapi::OpenApi,
    operation::{GetDocs, PostDocs},
    registry::{Field, SchemaDescriptor},
    routes::{Route, RouteTable},
    serializer::{serialize_json, serialize_yaml, write_to_file},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

fn bookstore_docs(settings: OpenApiSettings) -> openapi_from_routes::openapi::ApiDocs {
    let mut open_api = demo::open_api(settings).expect("Failed to set up documentation");
    let routes = demo::routes(open_api.registry()).expect("Failed to document routes");
    open_api.init(&routes).expect("Failed to build document")
}

fn operation_ids(doc: &Value) -> Vec<String> {
    let mut ids: Vec<String> = doc["paths"]
        .as_object()
        .unwrap()
        .values()
        .flat_map(|item| item.as_object().unwrap().values())
        .map(|op| op["operationId"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

#[test]
fn test_bookstore_end_to_end() {
    let docs = bookstore_docs(OpenApiSettings::new("Bookstore API", "1.0.0"));
    let doc: Value = serde_json::from_str(&docs.json).unwrap();

    // Hidden, excluded and plumbing routes are absent
    let mut paths: Vec<_> = doc["paths"].as_object().unwrap().keys().cloned().collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "/authors/{id}",
            "/books",
            "/books/{book_id}",
            "/books/{book_id}/archive",
            "/books/{book_id}/cover",
        ]
    );

    assert_eq!(
        operation_ids(&doc),
        vec![
            "author_detail",
            "book_archive",
            "book_cover",
            "book_create",
            "book_delete",
            "book_detail",
            "book_list",
            "book_update",
        ]
    );

    // HEAD and OPTIONS are never documented
    let books = doc["paths"]["/books"].as_object().unwrap();
    let mut verbs: Vec<_> = books.keys().cloned().collect();
    verbs.sort();
    assert_eq!(verbs, vec!["get", "post"]);
}

#[test]
fn test_book_detail_get() {
    let docs = bookstore_docs(OpenApiSettings::new("Bookstore API", "1.0.0"));
    let get = docs.document.paths["/books/{book_id}"].get.as_ref().unwrap();

    assert_eq!(get.operation_id.as_deref(), Some("book_detail"));
    assert_eq!(get.parameters.len(), 1);
    assert_eq!(get.parameters[0].name, "book_id");
    assert_eq!(get.parameters[0].location, ParameterLocation::Path);
    assert!(get.parameters[0].required);
    assert_eq!(get.parameters[0].schema, Some(Schema::typed("integer")));
    assert_eq!(
        get.responses["200"].content.as_ref().unwrap()["application/json"].schema,
        Some(Schema::reference("#/components/schemas/Book"))
    );
    assert_eq!(get.responses["404"].description, "No such book");
    assert_eq!(get.tags, vec!["Books"]);
    // Public endpoint
    assert!(get.security.is_empty());
}

#[test]
fn test_deleted_response_schema_yields_204() {
    let docs = bookstore_docs(OpenApiSettings::new("Bookstore API", "1.0.0"));
    let archive = docs.document.paths["/books/{book_id}/archive"]
        .post
        .as_ref()
        .unwrap();

    assert!(archive.responses.contains_key("204"));
    assert!(!archive.responses.contains_key("201"));
    assert_eq!(archive.description.as_deref(), Some("Moves a book to the archive"));
    assert_eq!(archive.parameters[0].name, "book_id");
}

#[test]
fn test_fragments_and_overrides_are_applied() {
    let docs = bookstore_docs(OpenApiSettings::new("Bookstore API", "1.0.0"));
    let books = &docs.document.paths["/books"];

    let list = books.get.as_ref().unwrap();
    assert_eq!(list.summary.as_deref(), Some("List books"));
    assert_eq!(
        list.description.as_deref(),
        Some("All books sold by Bookstore API.")
    );
    assert_eq!(list.parameters[0].name, "q");

    let create = books.post.as_ref().unwrap();
    assert_eq!(create.summary.as_deref(), Some("Add a book"));
    assert!(create.responses.contains_key("201"));
    assert_eq!(create.responses["409"].description, "Book with this ISBN already exists");

    let cover = docs.document.paths["/books/{book_id}/cover"].get.as_ref().unwrap();
    assert_eq!(cover.summary.as_deref(), Some("Cover image of a book"));
    assert!(cover.responses["200"].content.as_ref().unwrap().contains_key("image/jpeg"));
}

#[test]
fn test_components_include_nested_and_mapped_schemas() {
    let docs = bookstore_docs(OpenApiSettings::new("Bookstore API", "1.0.0"));
    let schemas = &docs.document.components.schemas;

    let mut names: Vec<_> = schemas.keys().cloned().collect();
    names.sort();
    assert_eq!(
        names,
        vec!["Author", "Book", "BookCreate", "BookDeleted", "BookUpdate"]
    );

    let book = serde_json::to_value(&schemas["Book"]).unwrap();
    assert_eq!(book["properties"]["author"]["$ref"], json!("#/components/schemas/Author"));
    assert_eq!(book["properties"]["rating"], json!({"type": "integer", "minimum": 1, "maximum": 5}));
    assert_eq!(book["properties"]["published"]["format"], json!("date"));
    assert_eq!(book["properties"]["published"]["nullable"], json!(true));
    assert_eq!(book["required"], json!(["title"]));

    let schemes = &docs.document.components.security_schemes;
    assert!(schemes.contains_key("access_token"));
    assert!(schemes.contains_key("refresh_token"));
}

#[test]
fn test_settings_and_seed_from_fixtures() {
    let settings = OpenApiSettings::from_yaml_str(include_str!("fixtures/settings.yaml")).unwrap();
    let context = settings.template_values();

    let mut open_api = demo::open_api(settings)
        .unwrap()
        .with_seed_loader(move |kwargs| {
            let mut values = context.as_object().cloned().unwrap_or_default();
            values.extend(kwargs.clone());
            let rendered = minijinja::Environment::new()
                .render_str(include_str!("fixtures/seed.yaml"), Value::Object(values))?;
            Ok(serde_yaml::from_str(&rendered)?)
        });
    let routes = demo::routes(open_api.registry()).unwrap();
    let docs = open_api.init(&routes).unwrap();
    let doc = &docs.document;

    assert_eq!(doc.openapi, "3.0.3");
    assert_eq!(doc.info.title, "Bookstore API");
    assert_eq!(doc.info.version, "2.0.0");
    assert_eq!(
        doc.info.description.as_deref(),
        Some("Questions go to support@books.example.com.\n")
    );
    assert_eq!(doc.extra["servers"][0]["url"], json!("https://books.example.com"));
    assert_eq!(doc.extra["tags"][0]["name"], json!("Books"));

    // The fixed schemes replace the seed's
    assert_eq!(
        doc.components.security_schemes["access_token"]["type"],
        json!("http")
    );

    assert_eq!(docs.docs_prefix, "/v1/docs");
    assert!(docs.swagger_ui_html.contains("\"docExpansion\":\"list\""));
}

#[test]
fn test_override_wins_over_exclusion() {
    // Intentional policy: explicitly documented operations always reach the document.
    let book = SchemaDescriptor::new("BookSchema").field(Field::integer("id"));
    let routes = RouteTable::new().route(
        Route::new("/books/<int:id>", "books.detail").get(GetDocs::new(&book).build().unwrap()),
    );

    let mut open_api = OpenApi::new(OpenApiSettings::default())
        .unwrap()
        .with_exclusion(|_, _| true)
        .with_override(
            "/books/<int:id>",
            HttpMethod::Get,
            Operation::default().with_operation_id("book_lookup"),
        );
    open_api.register_schemas(vec![book]).unwrap();
    let docs = open_api.init(&routes).unwrap();

    let get = docs.document.paths["/books/{id}"].get.as_ref().unwrap();
    assert_eq!(get.operation_id.as_deref(), Some("book_lookup"));
}

#[test]
fn test_colliding_operation_ids_are_suffixed() {
    let book = SchemaDescriptor::new("BookSchema").field(Field::integer("id"));
    let create = SchemaDescriptor::new("BookCreateSchema").field(Field::string("title"));

    let mut routes = RouteTable::new();
    for version in 1..=3 {
        routes.add(
            Route::new(format!("/v{}/books", version), format!("v{}.books", version))
                .post(PostDocs::new(&create).response_schema(&book).build().unwrap()),
        );
    }

    let mut open_api = OpenApi::new(OpenApiSettings::default()).unwrap();
    open_api.register_schemas(vec![book.clone(), create.clone()]).unwrap();
    let docs = open_api.init(&routes).unwrap();
    let doc: Value = serde_json::from_str(&docs.json).unwrap();

    assert_eq!(
        operation_ids(&doc),
        vec!["book_create", "book_create_1", "book_create_2"]
    );
}

#[test]
fn test_variant_names_resolve_to_main_schema() {
    let mut open_api = OpenApi::new(OpenApiSettings::default()).unwrap();
    open_api
        .register_schemas(vec![SchemaDescriptor::new("FooSchema").field(Field::integer("id"))])
        .unwrap();
    let registry = open_api.registry();

    for name in ["FooCreateSchema", "FooUpdateSchema", "FooSchema", "Foo"] {
        assert_eq!(registry.resolve_canonical(name).unwrap().type_name(), "FooSchema");
    }
    assert!(matches!(
        registry.resolve_canonical("BarSchema"),
        Err(Error::SchemaNotFound(_))
    ));
}

#[test]
fn test_export_to_disk() {
    let docs = bookstore_docs(OpenApiSettings::new("Bookstore API", "1.0.0"));
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let json_path = temp_dir.path().join("docs/static/swagger.json");
    let yaml_path = temp_dir.path().join("docs/static/swagger.yaml");
    write_to_file(&serialize_json(&docs.document).unwrap(), &json_path).unwrap();
    write_to_file(&serialize_yaml(&docs.document).unwrap(), &yaml_path).unwrap();

    let from_json: Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let from_yaml: Value =
        serde_yaml::from_str(&std::fs::read_to_string(&yaml_path).unwrap()).unwrap();
    assert_eq!(from_json, from_yaml);
    assert_eq!(from_json["info"]["title"], json!("Bookstore API"));
}
