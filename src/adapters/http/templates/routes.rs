//! Route configuration for template endpoints.
//!
//! Configures Axum router with template-related routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::adapters::storage::MAX_TEMPLATE_SIZE_BYTES;

use super::handlers::{
    get_schema, get_stylesheet, get_template_markdown, get_test_set, health, list_templates,
    list_test_sets, preview_template, render_template, save_template, TemplatesAppState,
};

/// Request bodies may carry a full template plus its JSON envelope.
const MAX_BODY_BYTES: usize = MAX_TEMPLATE_SIZE_BYTES as usize + 64 * 1024;

/// Creates the template router with all endpoints.
///
/// Routes:
/// - `GET /api/templates` - List template names
/// - `POST /api/templates/:name[?variation=]` - Save a template variation
/// - `GET /api/templates/:name/markdown[?variation=]` - Raw template markdown
/// - `POST /api/templates/:name/render/:format[?variation=]` - Render with the body as data
/// - `POST /api/templates/:name/preview/:format` - Render an editor payload
/// - `GET /api/templates/:name/testdata` - List test sets
/// - `GET /api/templates/:name/testdata/:set` - One test set
/// - `GET /api/templates/:name/schema` - Data schema
/// - `GET /css/main.css` - Stylesheet linked from HTML output
/// - `GET /health` - Liveness probe
///
/// `pdf/a` must be sent percent-encoded (`pdf%2Fa`) or as `pdfa`.
pub fn templates_router() -> Router<TemplatesAppState> {
    Router::new()
        .route("/api/templates", get(list_templates))
        .route("/api/templates/:name", post(save_template))
        .route("/api/templates/:name/markdown", get(get_template_markdown))
        .route("/api/templates/:name/render/:format", post(render_template))
        .route("/api/templates/:name/preview/:format", post(preview_template))
        .route("/api/templates/:name/testdata", get(list_test_sets))
        .route("/api/templates/:name/testdata/:set", get(get_test_set))
        .route("/api/templates/:name/schema", get(get_schema))
        .route("/css/main.css", get(get_stylesheet))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
