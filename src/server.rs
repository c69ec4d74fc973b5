//! HTTP serving of the documentation.
//!
//! | path                          | content                      |
//! |-------------------------------|------------------------------|
//! | `{prefix}/static/swagger.json`| the document as JSON         |
//! | `{prefix}/static/swagger.yaml`| the document as YAML         |
//! | `{prefix}/swagger_ui`         | Swagger UI viewer            |
//! | `{prefix}/re_doc`             | ReDoc viewer                 |
//! | `{prefix}/static/changelog.md`| changelog markdown, optional |
//! | `{prefix}/changelog`          | changelog page, optional     |
//!
//! `prefix` is [`ApiDocs::docs_prefix`], e.g. `/v1/docs`.

use crate::error::Result;
use crate::openapi::{
    ApiDocs, CHANGELOG_MD_PATH, CHANGELOG_PATH, RE_DOC_PATH, SWAGGER_JSON_PATH,
    SWAGGER_UI_PATH, SWAGGER_YAML_PATH,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

type SharedDocs = Arc<ApiDocs>;

/// Router serving the documentation under its prefix.
pub fn router(docs: SharedDocs) -> Router {
    let prefix = docs.docs_prefix.clone();

    let mut routes = Router::new()
        .route(SWAGGER_JSON_PATH, get(swagger_json))
        .route(SWAGGER_YAML_PATH, get(swagger_yaml))
        .route(SWAGGER_UI_PATH, get(swagger_ui))
        .route(RE_DOC_PATH, get(re_doc));

    if docs.changelog_loader.is_some() {
        routes = routes
            .route(CHANGELOG_MD_PATH, get(changelog_md))
            .route(CHANGELOG_PATH, get(changelog));
    }

    Router::new().nest(&prefix, routes.with_state(docs))
}

/// Adds the documentation routes to an application router.
pub fn mount(app: Router, docs: SharedDocs) -> Router {
    app.merge(router(docs))
}

/// Serves `app` until the process is stopped.
pub async fn serve(app: Router, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Serving on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn swagger_json(State(docs): State<SharedDocs>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], docs.json.clone()).into_response()
}

async fn swagger_yaml(State(docs): State<SharedDocs>) -> Response {
    ([(header::CONTENT_TYPE, "application/x-yaml")], docs.yaml.clone()).into_response()
}

async fn swagger_ui(State(docs): State<SharedDocs>) -> Html<String> {
    Html(docs.swagger_ui_html.clone())
}

async fn re_doc(State(docs): State<SharedDocs>) -> Html<String> {
    Html(docs.re_doc_html.clone())
}

async fn changelog_md(State(docs): State<SharedDocs>) -> Response {
    match docs.changelog_md() {
        Some(markdown) => ([(header::CONTENT_TYPE, "text/markdown")], markdown).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn changelog(State(docs): State<SharedDocs>) -> Response {
    match &docs.changelog_html {
        Some(page) => Html(page.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
