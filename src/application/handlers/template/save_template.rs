//! SaveTemplateHandler - Command handler for saving template markdown.
//!
//! Extracts the markdown from an editor payload, checks that it compiles and
//! replaces the stored variation with it.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use super::payload::extract_markdown;
use crate::domain::foundation::{TemplateName, Variation};
use crate::domain::template::{CompileError, TemplateEngine};
use crate::ports::{StoreError, TemplateStore};

/// Command to save a template variation.
#[derive(Debug, Clone)]
pub struct SaveTemplateCommand {
    pub name: TemplateName,
    pub variation: Variation,
    /// Raw editor payload; must carry `markdownContent`.
    pub payload: Value,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTemplateResult {
    pub name: TemplateName,
    pub variation: Variation,
    pub size_bytes: usize,
}

/// Error type for saving templates.
#[derive(Debug, Clone, Error)]
pub enum SaveTemplateError {
    #[error("{0}")]
    InvalidPayload(String),

    #[error("Template does not compile: {0}")]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Handler for saving templates.
pub struct SaveTemplateHandler {
    templates: Arc<dyn TemplateStore>,
    engine: TemplateEngine,
}

impl SaveTemplateHandler {
    pub fn new(templates: Arc<dyn TemplateStore>) -> Self {
        Self {
            templates,
            engine: TemplateEngine::new(),
        }
    }

    pub async fn handle(&self, cmd: SaveTemplateCommand) -> Result<SaveTemplateResult, SaveTemplateError> {
        let markdown = extract_markdown(&cmd.payload).ok_or_else(|| {
            SaveTemplateError::InvalidPayload(format!(
                "Cannot extract markdown for payload={}",
                cmd.payload
            ))
        })?;

        self.engine.compile(markdown)?;
        self.templates
            .write(&cmd.name, &cmd.variation, markdown)
            .await?;

        tracing::info!(template = %cmd.name, variation = %cmd.variation, "Template saved");
        Ok(SaveTemplateResult {
            size_bytes: markdown.len(),
            name: cmd.name,
            variation: cmd.variation,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
