//! Style Source Port - access to the document stylesheet.

use async_trait::async_trait;
use thiserror::Error;

/// Port for loading the stylesheet applied to rendered documents.
///
/// Implementations read the stylesheet fresh on every call so edits take
/// effect on the next render.
#[async_trait]
pub trait StyleSource: Send + Sync {
    /// Full text of `main.css`.
    async fn stylesheet(&self) -> Result<String, StyleError>;
}

/// The stylesheet could not be loaded.
#[derive(Debug, Clone, Error)]
#[error("Cannot load stylesheet {path}: {message}")]
pub struct StyleError {
    pub path: String,
    pub message: String,
}

impl StyleError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
