//! TestDataHandler - Query handler for test sets and schemas.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::foundation::TemplateName;
use crate::ports::{StoreError, TestDataStore};

/// Handler exposing the sample data and schema stored with a template.
pub struct TestDataHandler {
    test_data: Arc<dyn TestDataStore>,
}

impl TestDataHandler {
    pub fn new(test_data: Arc<dyn TestDataStore>) -> Self {
        Self { test_data }
    }

    pub async fn list_test_sets(&self, name: &TemplateName) -> Result<Vec<String>, StoreError> {
        self.test_data.list_test_sets(name).await
    }

    pub async fn test_set(&self, name: &TemplateName, set: &str) -> Result<Value, StoreError> {
        self.test_data.read_test_set(name, set).await
    }

    /// The schema is returned as stored; its contents are not validated.
    pub async fn schema(&self, name: &TemplateName) -> Result<Value, StoreError> {
        self.test_data.read_schema(name).await
    }
}
