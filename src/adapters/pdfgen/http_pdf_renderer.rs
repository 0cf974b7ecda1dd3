//! HTTP PDF renderer adapter.
//!
//! Posts the finished HTML document to an external PDF generation service
//! and relays the returned bytes.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::ports::{PdfError, PdfRenderer};

const HTML_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// Client for a PDF service answering `POST {base_url}/{name}`.
///
/// One request per render, no retries. The client keeps reqwest's default
/// timeouts.
#[derive(Debug, Clone)]
pub struct HttpPdfRenderer {
    base_url: String,
    client: Client,
}

impl HttpPdfRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Endpoint for the named document.
    fn render_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render(&self, name: &str, html: &str) -> Result<Vec<u8>, PdfError> {
        let url = self.render_url(name);
        tracing::debug!(url = %url, bytes = html.len(), "Requesting PDF");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, HTML_CONTENT_TYPE)
            .body(html.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    PdfError::transport(format!("Connection failed: {}", e))
                } else {
                    PdfError::transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(PdfError::status(status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PdfError::transport(format!("Failed to read PDF body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
