//! The editor payload shared by save and preview.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::render_document::{DataSource, RenderDocumentCommand, TemplateSource};
use crate::domain::foundation::{TemplateName, Variation};

/// Test set used by previews that ask for one without naming it.
pub const DEFAULT_TEST_SET: &str = "default";

/// Body sent by the template editor.
///
/// ```json
/// {"markdownContent": "# Hei, {{name}}", "interleavingFields": {"name": "Peter"}, "useTestSet": false}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    #[serde(default)]
    pub markdown_content: Option<String>,
    #[serde(default)]
    pub interleaving_fields: Option<Value>,
    #[serde(default)]
    pub use_test_set: bool,
    #[serde(default)]
    pub test_set_name: Option<String>,
}

impl TemplatePayload {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Data source the payload asks for.
    pub fn data_source(&self) -> DataSource {
        if self.use_test_set {
            DataSource::TestSet(
                self.test_set_name
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_TEST_SET.to_string()),
            )
        } else {
            DataSource::Inline(
                self.interleaving_fields
                    .clone()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            )
        }
    }

    /// Render command for a preview: unsaved markdown wins over the stored variation.
    pub fn into_preview_command(
        self,
        name: TemplateName,
        variation: Variation,
        format: impl Into<String>,
    ) -> RenderDocumentCommand {
        let data = self.data_source();
        let source = match self.markdown_content {
            Some(markdown) => TemplateSource::Inline { name, markdown },
            None => TemplateSource::stored(name, variation),
        };
        RenderDocumentCommand {
            source,
            data,
            format: format.into(),
        }
    }
}

/// The markdown in a raw editor payload, if it carries one.
pub fn extract_markdown(payload: &Value) -> Option<&str> {
    payload.get("markdownContent").and_then(Value::as_str)
}
