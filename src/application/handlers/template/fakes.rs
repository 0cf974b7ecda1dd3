//! In-memory port implementations shared by the handler tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::domain::foundation::{TemplateName, Variation};
use crate::ports::{
    PdfError, PdfRenderer, StoreError, StyleError, StyleSource, TemplateStore, TestDataStore,
};

#[derive(Default)]
pub struct InMemoryTemplateStore {
    templates: Mutex<BTreeMap<String, HashMap<String, String>>>,
    partials: Mutex<HashMap<String, String>>,
    test_sets: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    schemas: Mutex<HashMap<String, Value>>,
    writes: Mutex<usize>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, name: &str, variation: &str, content: &str) {
        self.templates
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .insert(variation.to_string(), content.to_string());
    }

    pub fn put_partial(&self, name: &str, content: &str) {
        self.partials
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_string());
    }

    pub fn put_test_set(&self, name: &str, set: &str, data: Value) {
        self.templates
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default();
        self.test_sets
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .insert(set.to_string(), data);
    }

    pub fn put_schema(&self, name: &str, schema: Value) {
        self.schemas.lock().unwrap().insert(name.to_string(), schema);
    }

    pub fn get(&self, name: &str, variation: &str) -> Option<String> {
        self.templates
            .lock()
            .unwrap()
            .get(name)
            .and_then(|variations| variations.get(variation).cloned())
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.templates.lock().unwrap().keys().cloned().collect())
    }

    async fn read(&self, name: &TemplateName, variation: &Variation) -> Result<String, StoreError> {
        self.get(name.as_str(), variation.as_str())
            .ok_or_else(|| StoreError::template_not_found(name.as_str()))
    }

    async fn write(
        &self,
        name: &TemplateName,
        variation: &Variation,
        content: &str,
    ) -> Result<(), StoreError> {
        *self.writes.lock().unwrap() += 1;
        self.put(name.as_str(), variation.as_str(), content);
        Ok(())
    }

    async fn read_partial(&self, name: &TemplateName) -> Result<String, StoreError> {
        self.partials
            .lock()
            .unwrap()
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| StoreError::partial_not_found(name.as_str()))
    }
}

#[async_trait]
impl TestDataStore for InMemoryTemplateStore {
    async fn list_test_sets(&self, name: &TemplateName) -> Result<Vec<String>, StoreError> {
        if !self.templates.lock().unwrap().contains_key(name.as_str()) {
            return Err(StoreError::template_not_found(name.as_str()));
        }
        Ok(self
            .test_sets
            .lock()
            .unwrap()
            .get(name.as_str())
            .map(|sets| sets.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn read_test_set(&self, name: &TemplateName, set: &str) -> Result<Value, StoreError> {
        self.test_sets
            .lock()
            .unwrap()
            .get(name.as_str())
            .and_then(|sets| sets.get(set).cloned())
            .ok_or_else(|| StoreError::test_set_not_found(format!("{}/{}", name, set)))
    }

    async fn read_schema(&self, name: &TemplateName) -> Result<Value, StoreError> {
        self.schemas
            .lock()
            .unwrap()
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| StoreError::schema_not_found(name.as_str()))
    }
}

pub struct FakeStyleSource(Option<String>);

impl FakeStyleSource {
    pub fn with_css(css: &str) -> Self {
        Self(Some(css.to_string()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl StyleSource for FakeStyleSource {
    async fn stylesheet(&self) -> Result<String, StyleError> {
        self.0
            .clone()
            .ok_or_else(|| StyleError::new("assets/css/main.css", "not found"))
    }
}

/// Records the last request and answers with a fixed PDF or a status error.
pub struct FakePdfRenderer {
    fail_with: Option<u16>,
    last: Mutex<Option<(String, String)>>,
}

impl FakePdfRenderer {
    pub fn succeeding() -> Self {
        Self {
            fail_with: None,
            last: Mutex::new(None),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            last: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<(String, String)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for FakePdfRenderer {
    async fn render(&self, name: &str, html: &str) -> Result<Vec<u8>, PdfError> {
        *self.last.lock().unwrap() = Some((name.to_string(), html.to_string()));
        match self.fail_with {
            Some(status) => Err(PdfError::status(status, "unavailable")),
            None => Ok(b"%PDF-1.4\n%fake".to_vec()),
        }
    }
}
