//! ListTemplatesHandler - Query handler for template discovery.

use std::sync::Arc;

use crate::ports::{StoreError, TemplateStore};

/// Handler listing stored template names.
pub struct ListTemplatesHandler {
    templates: Arc<dyn TemplateStore>,
}

impl ListTemplatesHandler {
    pub fn new(templates: Arc<dyn TemplateStore>) -> Self {
        Self { templates }
    }

    /// Sorted template names; empty when nothing is stored.
    pub async fn handle(&self) -> Result<Vec<String>, StoreError> {
        self.templates.list().await
    }
}
