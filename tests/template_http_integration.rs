//! Integration tests for template HTTP endpoints.
//!
//! These tests drive the complete application router over a temporary
//! content root:
//! 1. Editing flow (save, read back, list)
//! 2. Rendering and previewing to HTML and PDF
//! 3. Error responses carry the JSON error shape

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mockito::Server;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use letterpress::adapters::http::{app_router, TemplatesAppState};
use letterpress::adapters::{
    Html5everPostProcessor, HttpPdfRenderer, LocalStyleSource, LocalTemplateStore,
    PulldownMarkdownConverter,
};
use letterpress::application::RenderSettings;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn content_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    let css_dir = dir.path().join("assets").join("css");
    std::fs::create_dir_all(&css_dir).unwrap();
    std::fs::write(css_dir.join("main.css"), "body { margin: 2cm; }").unwrap();
    dir
}

fn app(root: &TempDir, pdf_base_url: &str) -> Router {
    let store = Arc::new(LocalTemplateStore::new(root.path()));
    let state = TemplatesAppState {
        template_store: store.clone(),
        test_data_store: store,
        style_source: Arc::new(LocalStyleSource::new(root.path())),
        markdown_converter: Arc::new(PulldownMarkdownConverter),
        html_post_processor: Arc::new(Html5everPostProcessor),
        pdf_renderer: Arc::new(HttpPdfRenderer::new(pdf_base_url)),
        render_settings: RenderSettings::default(),
    };
    app_router(state, &[])
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

const NO_PDF_SERVICE: &str = "http://127.0.0.1:9/api/v1/genpdf/html";

// =============================================================================
// Editing Flow
// =============================================================================

#[tokio::test]
async fn saved_template_is_listed_and_readable() {
    let root = content_root();
    let app = app(&root, NO_PDF_SERVICE);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/templates/innvilgelse",
            json!({"markdownContent": "# Hei, {{name}}", "interleavingFields": {"name": "Peter"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get_request("/api/templates")).await.unwrap();
    assert_eq!(body_json(response).await, json!(["innvilgelse"]));

    let response = app
        .oneshot(get_request("/api/templates/innvilgelse/markdown"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "# Hei, {{name}}");

    let on_disk = root
        .path()
        .join("templates")
        .join("innvilgelse")
        .join("template.hbs");
    assert_eq!(std::fs::read_to_string(on_disk).unwrap(), "# Hei, {{name}}");
}

#[tokio::test]
async fn saving_a_variation_leaves_default_untouched() {
    let root = content_root();
    let app = app(&root, NO_PDF_SERVICE);

    for (uri, markdown) in [
        ("/api/templates/brev", "Standard"),
        ("/api/templates/brev?variation=template_02", "Alternativ"),
    ] {
        let response = app
            .clone()
            .oneshot(post_json(uri, json!({"markdownContent": markdown})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/templates/brev/markdown"))
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "Standard");

    let response = app
        .oneshot(get_request("/api/templates/brev/markdown?variation=template_02"))
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "Alternativ");
}

#[tokio::test]
async fn save_without_markdown_is_rejected() {
    let root = content_root();
    let response = app(&root, NO_PDF_SERVICE)
        .oneshot(post_json("/api/templates/brev", json!({"useTestSet": true})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(!root.path().join("templates").join("brev").exists());
}

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn renders_saved_template_to_html() {
    let root = content_root();
    let app = app(&root, NO_PDF_SERVICE);
    app.clone()
        .oneshot(post_json(
            "/api/templates/vedtak",
            json!({"markdownContent": "# Hei, {{name}}"}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/api/templates/vedtak/render/html", json!({"name": "Peter"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<h1>Hei, Peter</h1>"));
    assert!(html.contains("href=\"/css/main.css\""));
}

#[tokio::test]
async fn renders_pdf_through_service() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/genpdf/html/vedtak")
        .match_header("content-type", "text/html;charset=UTF-8")
        .with_status(200)
        .with_body(b"%PDF-1.7\n%%EOF")
        .create_async()
        .await;

    let root = content_root();
    let app = app(&root, &format!("{}/api/v1/genpdf/html", server.url()));
    app.clone()
        .oneshot(post_json(
            "/api/templates/vedtak",
            json!({"markdownContent": "# Hei, {{name}}"}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/api/templates/vedtak/render/pdf", json!({"name": "Peter"})))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["cache-control"],
        "must-revalidate, post-check=0, pre-check=0"
    );
    let bytes = body_bytes(response).await;
    assert_eq!(&bytes[1..=3], b"PDF");
}

#[tokio::test]
async fn pdf_service_failure_is_500() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/genpdf/html/vedtak")
        .with_status(502)
        .with_body("upstream gateway internals")
        .create_async()
        .await;

    let root = content_root();
    let app = app(&root, &format!("{}/api/v1/genpdf/html", server.url()));
    app.clone()
        .oneshot(post_json("/api/templates/vedtak", json!({"markdownContent": "# Hei"})))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/api/templates/vedtak/render/pdf", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(body["message"], "PDF generation failed");
}

#[tokio::test]
async fn rendering_unknown_template_is_404() {
    let root = content_root();
    let response = app(&root, NO_PDF_SERVICE)
        .oneshot(post_json("/api/templates/ukjent/render/html", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Cannot find template named ukjent");
}

#[tokio::test]
async fn preview_with_test_set_from_disk() {
    let root = content_root();
    let testdata = root.path().join("templates").join("vedtak").join("testdata");
    std::fs::create_dir_all(&testdata).unwrap();
    std::fs::write(testdata.join("default.json"), r#"{"name": "Testbruker"}"#).unwrap();

    let response = app(&root, NO_PDF_SERVICE)
        .oneshot(post_json(
            "/api/templates/vedtak/preview/html",
            json!({"markdownContent": "## Forhåndsvisning for {{name}}", "useTestSet": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("<h2>Forhåndsvisning for Testbruker</h2>"));
}

// =============================================================================
// Assets
// =============================================================================

#[tokio::test]
async fn linked_stylesheet_resolves_from_render_path() {
    let root = content_root();
    let app = app(&root, NO_PDF_SERVICE);
    app.clone()
        .oneshot(post_json("/api/templates/vedtak", json!({"markdownContent": "# Hei"})))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/api/templates/vedtak/render/html", json!({})))
        .await
        .unwrap();
    let html = body_text(response).await;
    let href = html
        .split("rel=\"stylesheet\" href=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap()
        .to_string();

    // Resolve the way a browser would against the document URL.
    let uri = if href.starts_with('/') {
        href
    } else {
        format!("/api/templates/vedtak/render/{}", href)
    };
    let response = app.oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "body { margin: 2cm; }");
}

#[tokio::test]
async fn stylesheet_is_served_fresh_from_disk() {
    let root = content_root();
    let app = app(&root, NO_PDF_SERVICE);

    let response = app.clone().oneshot(get_request("/css/main.css")).await.unwrap();
    assert_eq!(body_text(response).await, "body { margin: 2cm; }");

    std::fs::write(
        root.path().join("assets").join("css").join("main.css"),
        "body { margin: 1cm; }",
    )
    .unwrap();

    let response = app.oneshot(get_request("/css/main.css")).await.unwrap();
    assert_eq!(body_text(response).await, "body { margin: 1cm; }");
}
