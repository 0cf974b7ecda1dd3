//! PDF generation service configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Location of the external HTML-to-PDF service.
///
/// Documents are posted to `<base_url>/<template name>`.
#[derive(Debug, Clone, Deserialize)]
pub struct PdfGenConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl PdfGenConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("pdfgen.base_url"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ValidationError::InvalidPdfGenUrl);
        }
        Ok(())
    }
}

impl Default for PdfGenConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8090/api/v1/genpdf/html".to_string()
}
