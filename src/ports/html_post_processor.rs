//! HTML Post-Processor Port - document metadata injection.

use thiserror::Error;

use crate::domain::rendering::StylesheetMode;

/// Port for turning an HTML fragment into a complete document.
///
/// # Contract
///
/// Implementations must:
/// - Parse the input tolerantly (fragments and malformed markup are accepted)
/// - Ensure a `head` element exists
/// - Append `<meta charset="UTF-8">` to `head`
/// - Append the stylesheet according to `StylesheetMode`
pub trait HtmlPostProcessor: Send + Sync {
    fn add_metadata(&self, html: &str, stylesheet: &StylesheetMode) -> Result<String, HtmlError>;
}

/// The processed document could not be serialized.
#[derive(Debug, Clone, Error)]
#[error("Cannot serialize HTML document: {0}")]
pub struct HtmlError(pub String);
