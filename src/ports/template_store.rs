//! Template Store Port - persistence for templates, partials and test data.
//!
//! The rendering pipeline reads templates through this port; the CRUD use
//! cases write through it. Adapters (like LocalTemplateStore) map names to
//! storage locations.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::{TemplateName, Variation};

/// Port for reading and writing template source text.
///
/// # Contract
///
/// Implementations must:
/// - Replace prior content completely on `write` (no partial content visible to readers)
/// - Serialize concurrent writes; reads take no lock
/// - Report a missing template as `StoreError::NotFound` naming the template
/// - Return names from `list` sorted, excluding partials and temp artifacts
///
/// # Usage
///
/// ```rust,ignore
/// let store: &dyn TemplateStore = get_store();
///
/// store.write(&name, &Variation::default(), "# Hei, {{name}}").await?;
/// let markdown = store.read(&name, &Variation::default()).await?;
/// ```
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Names of all stored templates, sorted.
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Reads one variation of a template.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the template or variation doesn't exist.
    async fn read(&self, name: &TemplateName, variation: &Variation) -> Result<String, StoreError>;

    /// Creates or fully replaces one variation of a template.
    async fn write(
        &self,
        name: &TemplateName,
        variation: &Variation,
        content: &str,
    ) -> Result<(), StoreError>;

    /// Reads a shared partial included with `{{> name}}`.
    async fn read_partial(&self, name: &TemplateName) -> Result<String, StoreError>;
}

/// Port for the sample data and schema stored beside a template.
#[async_trait]
pub trait TestDataStore: Send + Sync {
    /// Names of the test sets stored for a template, sorted.
    async fn list_test_sets(&self, name: &TemplateName) -> Result<Vec<String>, StoreError>;

    /// Reads one test set as JSON.
    async fn read_test_set(&self, name: &TemplateName, set: &str) -> Result<Value, StoreError>;

    /// Reads the JSON schema describing the template's data.
    async fn read_schema(&self, name: &TemplateName) -> Result<Value, StoreError>;
}

/// Errors that can occur during template store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The named resource does not exist.
    #[error("Cannot find {resource} named {name}")]
    NotFound {
        resource: &'static str,
        name: String,
    },

    /// Stored content could not be interpreted.
    #[error("Invalid content in {name}: {message}")]
    InvalidContent { name: String, message: String },

    /// IO error during file operation.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Content exceeds the store's size limit.
    #[error("Template too large: {size_bytes} bytes (max: {max_bytes})")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

impl StoreError {
    pub fn template_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "template",
            name: name.into(),
        }
    }

    pub fn partial_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "partial",
            name: name.into(),
        }
    }

    pub fn test_set_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "test set",
            name: name.into(),
        }
    }

    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "schema for template",
            name: name.into(),
        }
    }

    pub fn invalid_content(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::TooLarge {
            size_bytes,
            max_bytes,
        }
    }

    /// Returns true if the error means the resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::io(err.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
