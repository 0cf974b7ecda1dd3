//! Content root configuration (templates, test data, stylesheet)

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::application::RenderSettings;

/// Where templates and assets live, and how rendered HTML links the stylesheet.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Directory holding `templates/` and `assets/`
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// `href` of the stylesheet link in HTML output
    #[serde(default = "default_stylesheet_href")]
    pub stylesheet_href: String,
}

impl ContentConfig {
    /// Rendering settings derived from this section.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            stylesheet_href: self.stylesheet_href.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("content.root"));
        }
        let href = self.stylesheet_href.trim();
        if href.is_empty() || href.contains(char::is_whitespace) || href.contains('"') {
            return Err(ValidationError::InvalidStylesheetHref);
        }
        Ok(())
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            stylesheet_href: default_stylesheet_href(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("content")
}

fn default_stylesheet_href() -> String {
    "/css/main.css".to_string()
}
