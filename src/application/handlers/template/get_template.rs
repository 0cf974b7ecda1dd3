//! GetTemplateHandler - Query handler returning raw template markdown.

use std::sync::Arc;

use crate::domain::foundation::{TemplateName, Variation};
use crate::ports::{StoreError, TemplateStore};

/// Query for one template variation.
#[derive(Debug, Clone)]
pub struct GetTemplateQuery {
    pub name: TemplateName,
    pub variation: Variation,
}

/// Uncompiled template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTemplateResult {
    pub name: TemplateName,
    pub variation: Variation,
    pub content: String,
}

/// Handler reading template markdown for the editor.
pub struct GetTemplateHandler {
    templates: Arc<dyn TemplateStore>,
}

impl GetTemplateHandler {
    pub fn new(templates: Arc<dyn TemplateStore>) -> Self {
        Self { templates }
    }

    pub async fn handle(&self, query: GetTemplateQuery) -> Result<GetTemplateResult, StoreError> {
        let content = self.templates.read(&query.name, &query.variation).await?;
        Ok(GetTemplateResult {
            name: query.name,
            variation: query.variation,
            content,
        })
    }
}
