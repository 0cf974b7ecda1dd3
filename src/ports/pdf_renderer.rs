//! PDF Renderer Port - delegation to an external PDF service.
//!
//! The system never rasterizes PDF itself; it posts finished HTML to a
//! service and relays the returned bytes.

use async_trait::async_trait;
use thiserror::Error;

/// Port for converting a complete HTML document to PDF.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Renders `html` as the document `name`.
    ///
    /// # Errors
    ///
    /// Returns `PdfError` when the service is unreachable or answers with
    /// anything other than success.
    async fn render(&self, name: &str, html: &str) -> Result<Vec<u8>, PdfError>;
}

/// Errors from the PDF service.
#[derive(Debug, Clone, Error)]
pub enum PdfError {
    /// The request never produced a response.
    #[error("PDF service unreachable: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("PDF service returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Upstream error bodies are kept for logging up to this many characters.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

impl PdfError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Non-success answer; `body` is cut to [`MAX_ERROR_BODY_CHARS`].
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if let Some((cut, _)) = body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
            body.truncate(cut);
            body.push_str("...");
        }
        Self::Status { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_code() {
        let err = PdfError::status(503, "busy");
        assert_eq!(err.to_string(), "PDF service returned status 503: busy");
    }

    #[test]
    fn status_error_truncates_long_bodies() {
        let long = "ø".repeat(MAX_ERROR_BODY_CHARS + 100);
        let PdfError::Status { body, .. } = PdfError::status(500, long) else {
            panic!("expected status error");
        };
        assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 3);
        assert!(body.ends_with("..."));
    }

    #[test]
    fn pdf_renderer_is_object_safe() {
        fn check<T: PdfRenderer + ?Sized>() {}
        check::<dyn PdfRenderer>();
    }
}
