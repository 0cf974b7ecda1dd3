//! RenderDocumentHandler - the rendering pipeline.
//!
//! Loads a template, binds it to JSON data, converts the result to HTML and
//! either returns that HTML or hands it to the PDF service.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::{TemplateName, ValidationError, Variation};
use crate::domain::rendering::{OutputFormat, RenderedDocument, StylesheetMode, UnsupportedFormat};
use crate::domain::template::{
    CompileError, CompiledTemplate, DataContext, Partials, RenderFailure, TemplateEngine,
};
use crate::ports::{
    HtmlError, HtmlPostProcessor, MarkdownConverter, PdfError, PdfRenderer, StoreError,
    StyleSource, TemplateStore, TestDataStore,
};

/// Where the template text comes from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// A saved template variation.
    Stored {
        name: TemplateName,
        variation: Variation,
    },
    /// Unsaved markdown, rendered under `name` (used for previews).
    Inline { name: TemplateName, markdown: String },
}

impl TemplateSource {
    pub fn stored(name: TemplateName, variation: Variation) -> Self {
        Self::Stored { name, variation }
    }

    pub fn name(&self) -> &TemplateName {
        match self {
            TemplateSource::Stored { name, .. } | TemplateSource::Inline { name, .. } => name,
        }
    }
}

/// Where the data context comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Inline(Value),
    /// A test set stored beside the template.
    TestSet(String),
}

/// Command to render a document.
#[derive(Debug, Clone)]
pub struct RenderDocumentCommand {
    pub source: TemplateSource,
    pub data: DataSource,
    /// Requested format as supplied by the caller (`html`, `pdf`, `pdfa`, `pdf/a`).
    pub format: String,
}

/// Rendering settings injected at construction.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// `href` of the linked stylesheet in HTML output.
    pub stylesheet_href: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            stylesheet_href: "/css/main.css".to_string(),
        }
    }
}

/// Error type for document rendering.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("Cannot find template named {0}")]
    TemplateNotFound(String),

    #[error("Cannot find test set named {set} for template {template}")]
    TestSetNotFound { template: String, set: String },

    #[error("Cannot find partial named {0}")]
    PartialNotFound(String),

    #[error("Template does not compile: {0}")]
    Compile(#[from] CompileError),

    #[error("Template cannot be applied: {0}")]
    Render(#[from] RenderFailure),

    #[error("{0}")]
    InvalidPayload(String),

    #[error(transparent)]
    InvalidName(#[from] ValidationError),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    #[error("PDF generation failed: {0}")]
    Upstream(#[from] PdfError),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error("Template storage failed: {0}")]
    Storage(StoreError),
}

/// Handler for rendering documents.
///
/// # Dependencies
///
/// - `TemplateStore`: template and partial text
/// - `TestDataStore`: test sets used as data
/// - `StyleSource`: stylesheet inlined into PDF input
/// - `MarkdownConverter`, `HtmlPostProcessor`: HTML production
/// - `PdfRenderer`: external PDF service
///
/// # Usage
///
/// ```rust,ignore
/// let cmd = RenderDocumentCommand {
///     source: TemplateSource::stored(name, Variation::default()),
///     data: DataSource::Inline(json!({"name": "Peter"})),
///     format: "pdf".to_string(),
/// };
/// let document = handler.handle(cmd).await?;
/// ```
pub struct RenderDocumentHandler {
    templates: Arc<dyn TemplateStore>,
    test_data: Arc<dyn TestDataStore>,
    styles: Arc<dyn StyleSource>,
    markdown: Arc<dyn MarkdownConverter>,
    post_processor: Arc<dyn HtmlPostProcessor>,
    pdf: Arc<dyn PdfRenderer>,
    engine: TemplateEngine,
    settings: RenderSettings,
}

impl RenderDocumentHandler {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        test_data: Arc<dyn TestDataStore>,
        styles: Arc<dyn StyleSource>,
        markdown: Arc<dyn MarkdownConverter>,
        post_processor: Arc<dyn HtmlPostProcessor>,
        pdf: Arc<dyn PdfRenderer>,
        settings: RenderSettings,
    ) -> Self {
        Self {
            templates,
            test_data,
            styles,
            markdown,
            post_processor,
            pdf,
            engine: TemplateEngine::new(),
            settings,
        }
    }

    /// Replaces the template engine, e.g. to use a custom resolver chain.
    pub fn with_engine(mut self, engine: TemplateEngine) -> Self {
        self.engine = engine;
        self
    }

    pub async fn handle(&self, cmd: RenderDocumentCommand) -> Result<RenderedDocument, RenderError> {
        let name = cmd.source.name().clone();
        let format = cmd.format.clone();
        let result = self.render(cmd).await;
        if let Err(err) = &result {
            tracing::error!(template = %name, format = %format, error = %err, "Rendering failed");
        }
        result
    }

    async fn render(&self, cmd: RenderDocumentCommand) -> Result<RenderedDocument, RenderError> {
        let format: OutputFormat = cmd.format.parse()?;
        let name = cmd.source.name().clone();
        tracing::info!(template = %name, format = %format, "Rendering document");

        // 1. Load template
        let source = match cmd.source {
            TemplateSource::Stored { name, variation } => self
                .templates
                .read(&name, &variation)
                .await
                .map_err(|e| match e {
                    StoreError::NotFound { name, .. } => RenderError::TemplateNotFound(name),
                    other => RenderError::Storage(other),
                })?,
            TemplateSource::Inline { markdown, .. } => markdown,
        };

        // 2. Bind data and apply
        let data = self.load_data(&name, cmd.data).await?;
        let compiled = self.engine.compile(&source)?;
        let partials = self.load_partials(&compiled).await?;
        let markdown = self
            .engine
            .apply(&compiled, &DataContext::new(data), &partials)?;

        // 3. Convert to HTML
        let html = self.markdown.convert(&markdown);

        // 4. Branch on format
        if format.is_pdf() {
            let stylesheet = match self.styles.stylesheet().await {
                Ok(css) => StylesheetMode::Inline(css),
                Err(e) => {
                    tracing::warn!(template = %name, format = %format, error = %e, "Rendering without stylesheet");
                    StylesheetMode::None
                }
            };
            let document = self.post_processor.add_metadata(&html, &stylesheet)?;
            let bytes = self.pdf.render(name.as_str(), &document).await?;
            tracing::debug!(template = %name, format = %format, bytes = bytes.len(), "PDF rendered");
            Ok(RenderedDocument::pdf(name.as_str(), bytes))
        } else {
            let linked = StylesheetMode::Linked(self.settings.stylesheet_href.clone());
            let document = self.post_processor.add_metadata(&html, &linked)?;
            // The finished document goes through the converter once more; markdown
            // treats it as a raw HTML block.
            Ok(RenderedDocument::html(self.markdown.convert(&document)))
        }
    }

    async fn load_data(&self, name: &TemplateName, data: DataSource) -> Result<Value, RenderError> {
        match data {
            DataSource::Inline(value) => Ok(value),
            DataSource::TestSet(set) => self
                .test_data
                .read_test_set(name, &set)
                .await
                .map_err(|e| match e {
                    StoreError::NotFound { .. } => RenderError::TestSetNotFound {
                        template: name.to_string(),
                        set,
                    },
                    StoreError::InvalidContent { message, .. } => RenderError::InvalidPayload(
                        format!("Test set {} for template {} is not valid JSON: {}", set, name, message),
                    ),
                    other => RenderError::Storage(other),
                }),
        }
    }

    /// Loads and compiles every partial reachable from `template`.
    async fn load_partials(&self, template: &CompiledTemplate) -> Result<Partials, RenderError> {
        let mut partials = Partials::new();
        let mut pending: Vec<String> = template.partial_names().map(str::to_string).collect();

        while let Some(partial_name) = pending.pop() {
            if partials.contains(&partial_name) {
                continue;
            }
            let name = TemplateName::new(partial_name.as_str())?;
            let source = self.templates.read_partial(&name).await.map_err(|e| match e {
                StoreError::NotFound { .. } => RenderError::PartialNotFound(partial_name.clone()),
                other => RenderError::Storage(other),
            })?;
            let compiled = self.engine.compile(&source).map_err(|e| {
                tracing::warn!(partial = %partial_name, error = %e, "Partial does not compile");
                e
            })?;
            pending.extend(
                compiled
                    .partial_names()
                    .filter(|p| !partials.contains(p))
                    .map(str::to_string),
            );
            partials.insert(partial_name, compiled);
        }

        Ok(partials)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
