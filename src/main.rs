//! Letterpress server entrypoint.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use letterpress::adapters::http::{app_router, TemplatesAppState};
use letterpress::adapters::{
    Html5everPostProcessor, HttpPdfRenderer, LocalStyleSource, LocalTemplateStore,
    PulldownMarkdownConverter,
};
use letterpress::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))?;
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let templates = Arc::new(LocalTemplateStore::new(&config.content.root));
    let state = TemplatesAppState {
        template_store: templates.clone(),
        test_data_store: templates,
        style_source: Arc::new(LocalStyleSource::new(&config.content.root)),
        markdown_converter: Arc::new(PulldownMarkdownConverter),
        html_post_processor: Arc::new(Html5everPostProcessor),
        pdf_renderer: Arc::new(HttpPdfRenderer::new(config.pdfgen.base_url.clone())),
        render_settings: config.content.render_settings(),
    };

    let app = app_router(state, &config.server.cors_origins_list());
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        content_root = %config.content.root.display(),
        pdfgen = %config.pdfgen.base_url,
        "Letterpress listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
