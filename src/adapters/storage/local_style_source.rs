//! Local Filesystem Style Source - reads `assets/css/main.css` on every call.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{StyleError, StyleSource};

/// Stylesheet read from the content root.
#[derive(Debug, Clone)]
pub struct LocalStyleSource {
    path: PathBuf,
}

impl LocalStyleSource {
    pub fn new(content_root: impl AsRef<Path>) -> Self {
        Self {
            path: content_root.as_ref().join("assets").join("css").join("main.css"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StyleSource for LocalStyleSource {
    async fn stylesheet(&self) -> Result<String, StyleError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|e| StyleError::new(self.path.display().to_string(), e.to_string()))
    }
}
