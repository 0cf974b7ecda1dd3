//! HTTP handlers for template endpoints.
//!
//! These handlers connect Axum routes to the template command/query handlers
//! and turn rendered documents into responses.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use crate::application::handlers::template::{
    DataSource, GetTemplateHandler, GetTemplateQuery, ListTemplatesHandler, RenderDocumentCommand,
    RenderDocumentHandler, RenderError, RenderSettings, SaveTemplateCommand, SaveTemplateError,
    SaveTemplateHandler, TemplatePayload, TemplateSource, TestDataHandler,
};
use crate::domain::foundation::{TemplateName, ValidationError, Variation};
use crate::domain::rendering::RenderedDocument;
use crate::domain::template::CompileError;
use crate::ports::{
    HtmlPostProcessor, MarkdownConverter, PdfRenderer, StoreError, StyleError, StyleSource,
    TemplateStore, TestDataStore,
};

use super::dto::{ErrorResponse, SaveTemplateResponse, VariationQuery};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct TemplatesAppState {
    pub template_store: Arc<dyn TemplateStore>,
    pub test_data_store: Arc<dyn TestDataStore>,
    pub style_source: Arc<dyn StyleSource>,
    pub markdown_converter: Arc<dyn MarkdownConverter>,
    pub html_post_processor: Arc<dyn HtmlPostProcessor>,
    pub pdf_renderer: Arc<dyn PdfRenderer>,
    pub render_settings: RenderSettings,
}

impl TemplatesAppState {
    pub fn list_templates_handler(&self) -> ListTemplatesHandler {
        ListTemplatesHandler::new(self.template_store.clone())
    }

    pub fn get_template_handler(&self) -> GetTemplateHandler {
        GetTemplateHandler::new(self.template_store.clone())
    }

    pub fn save_template_handler(&self) -> SaveTemplateHandler {
        SaveTemplateHandler::new(self.template_store.clone())
    }

    pub fn render_document_handler(&self) -> RenderDocumentHandler {
        RenderDocumentHandler::new(
            self.template_store.clone(),
            self.test_data_store.clone(),
            self.style_source.clone(),
            self.markdown_converter.clone(),
            self.html_post_processor.clone(),
            self.pdf_renderer.clone(),
            self.render_settings.clone(),
        )
    }

    pub fn test_data_handler(&self) -> TestDataHandler {
        TestDataHandler::new(self.test_data_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/templates - List template names
pub async fn list_templates(
    State(state): State<TemplatesAppState>,
) -> Result<impl IntoResponse, TemplatesApiError> {
    let names = state.list_templates_handler().handle().await?;
    Ok(Json(names))
}

/// GET /api/templates/:name/markdown - Raw markdown of a template variation
pub async fn get_template_markdown(
    State(state): State<TemplatesAppState>,
    Path(name): Path<String>,
    Query(query): Query<VariationQuery>,
) -> Result<impl IntoResponse, TemplatesApiError> {
    let query = GetTemplateQuery {
        name: TemplateName::new(name)?,
        variation: Variation::or_default(query.variation.as_deref())?,
    };

    let result = state.get_template_handler().handle(query).await?;

    Ok(([(CONTENT_TYPE, "text/markdown; charset=utf-8")], result.content))
}

/// GET /api/templates/:name/testdata - Names of the template's test sets
pub async fn list_test_sets(
    State(state): State<TemplatesAppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, TemplatesApiError> {
    let name = TemplateName::new(name)?;
    let sets = state.test_data_handler().list_test_sets(&name).await?;
    Ok(Json(sets))
}

/// GET /api/templates/:name/testdata/:set - One test set as JSON
pub async fn get_test_set(
    State(state): State<TemplatesAppState>,
    Path((name, set)): Path<(String, String)>,
) -> Result<impl IntoResponse, TemplatesApiError> {
    let name = TemplateName::new(name)?;
    let data = state.test_data_handler().test_set(&name, &set).await?;
    Ok(Json(data))
}

/// GET /api/templates/:name/schema - JSON schema describing the template data
pub async fn get_schema(
    State(state): State<TemplatesAppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, TemplatesApiError> {
    let name = TemplateName::new(name)?;
    let schema = state.test_data_handler().schema(&name).await?;
    Ok(Json(schema))
}

/// GET /css/main.css - Stylesheet linked from HTML output
pub async fn get_stylesheet(
    State(state): State<TemplatesAppState>,
) -> Result<impl IntoResponse, TemplatesApiError> {
    let css = state.style_source.stylesheet().await?;
    Ok(([(CONTENT_TYPE, "text/css; charset=utf-8")], css))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/templates/:name - Save a template variation from an editor payload
pub async fn save_template(
    State(state): State<TemplatesAppState>,
    Path(name): Path<String>,
    Query(query): Query<VariationQuery>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, TemplatesApiError> {
    let cmd = SaveTemplateCommand {
        name: TemplateName::new(name)?,
        variation: Variation::or_default(query.variation.as_deref())?,
        payload,
    };

    let result = state.save_template_handler().handle(cmd).await?;

    Ok((StatusCode::OK, Json(SaveTemplateResponse::from(result))))
}

/// POST /api/templates/:name/render/:format - Render a stored template
///
/// The body is the data context. An empty body renders with no data.
pub async fn render_template(
    State(state): State<TemplatesAppState>,
    Path((name, format)): Path<(String, String)>,
    Query(query): Query<VariationQuery>,
    body: Bytes,
) -> Result<Response, TemplatesApiError> {
    let cmd = RenderDocumentCommand {
        source: TemplateSource::stored(
            TemplateName::new(name)?,
            Variation::or_default(query.variation.as_deref())?,
        ),
        data: DataSource::Inline(parse_data(&body)?),
        format,
    };

    let document = state.render_document_handler().handle(cmd).await?;

    document_response(document)
}

/// POST /api/templates/:name/preview/:format - Render unsaved editor content
pub async fn preview_template(
    State(state): State<TemplatesAppState>,
    Path((name, format)): Path<(String, String)>,
    Query(query): Query<VariationQuery>,
    Json(payload): Json<Value>,
) -> Result<Response, TemplatesApiError> {
    let name = TemplateName::new(name)?;
    let variation = Variation::or_default(query.variation.as_deref())?;
    let payload = TemplatePayload::from_value(payload)
        .map_err(|e| TemplatesApiError::BadRequest(format!("Invalid preview payload: {}", e)))?;

    let cmd = payload.into_preview_command(name, variation, format);
    let document = state.render_document_handler().handle(cmd).await?;

    document_response(document)
}

fn parse_data(body: &[u8]) -> Result<Value, TemplatesApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
        .map_err(|e| TemplatesApiError::BadRequest(format!("Invalid JSON data: {}", e)))
}

/// Converts a rendered document into a response with its content type and headers.
pub fn document_response(document: RenderedDocument) -> Result<Response, TemplatesApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(document.content_type));
    for (name, value) in document.headers {
        let value = HeaderValue::from_str(&value).map_err(|_| {
            TemplatesApiError::Internal(format!("Invalid value for header {}", name))
        })?;
        headers.insert(name, value);
    }

    Ok((StatusCode::OK, headers, document.body.into_bytes()).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum TemplatesApiError {
    BadRequest(String),
    Compile(CompileError),
    NotFound(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl From<ValidationError> for TemplatesApiError {
    fn from(err: ValidationError) -> Self {
        TemplatesApiError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for TemplatesApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => TemplatesApiError::NotFound(err.to_string()),
            StoreError::TooLarge { .. } => TemplatesApiError::PayloadTooLarge(err.to_string()),
            StoreError::InvalidContent { .. } | StoreError::Io { .. } => {
                TemplatesApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<StyleError> for TemplatesApiError {
    fn from(err: StyleError) -> Self {
        TemplatesApiError::NotFound(err.to_string())
    }
}

impl From<SaveTemplateError> for TemplatesApiError {
    fn from(err: SaveTemplateError) -> Self {
        match err {
            SaveTemplateError::InvalidPayload(msg) => TemplatesApiError::BadRequest(msg),
            SaveTemplateError::Compile(e) => TemplatesApiError::Compile(e),
            SaveTemplateError::Storage(e) => e.into(),
        }
    }
}

impl From<RenderError> for TemplatesApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::TemplateNotFound(_)
            | RenderError::TestSetNotFound { .. }
            | RenderError::PartialNotFound(_) => TemplatesApiError::NotFound(err.to_string()),
            RenderError::Compile(e) => TemplatesApiError::Compile(e),
            RenderError::Render(_)
            | RenderError::InvalidPayload(_)
            | RenderError::InvalidName(_)
            | RenderError::UnsupportedFormat(_) => TemplatesApiError::BadRequest(err.to_string()),
            RenderError::Upstream(e) => {
                tracing::error!(error = %e, "PDF service call failed");
                TemplatesApiError::Internal("PDF generation failed".to_string())
            }
            RenderError::Html(_) => TemplatesApiError::Internal(err.to_string()),
            RenderError::Storage(e) => e.into(),
        }
    }
}

impl IntoResponse for TemplatesApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            TemplatesApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            TemplatesApiError::Compile(e) => {
                let position = e.position();
                let error = ErrorResponse::bad_request(format!("Template does not compile: {}", e))
                    .with_details(serde_json::json!({
                        "line": position.line,
                        "column": position.column,
                    }));
                (StatusCode::BAD_REQUEST, error)
            }
            TemplatesApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg))
            }
            TemplatesApiError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::payload_too_large(msg),
            ),
            TemplatesApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };

        (status, Json(error)).into_response()
    }
}
