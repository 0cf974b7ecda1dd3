//! Data Transfer Objects for template endpoints.
//!
//! Request and response shapes for the template API. Render and preview
//! responses are documents, not JSON, and are built from
//! [`RenderedDocument`](crate::domain::rendering::RenderedDocument) directly.

use serde::{Deserialize, Serialize};

use crate::application::SaveTemplateResult;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// `?variation=` query parameter; absent or empty selects the default variation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariationQuery {
    #[serde(default)]
    pub variation: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a saved template variation.
#[derive(Debug, Clone, Serialize)]
pub struct SaveTemplateResponse {
    pub name: String,
    pub variation: String,
    pub size_bytes: usize,
}

impl From<SaveTemplateResult> for SaveTemplateResponse {
    fn from(result: SaveTemplateResult) -> Self {
        Self {
            name: result.name.to_string(),
            variation: result.variation.to_string(),
            size_bytes: result.size_bytes,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            code: "PAYLOAD_TOO_LARGE".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
