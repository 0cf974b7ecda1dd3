//! Template handlers - rendering, editing and test data.

mod get_template;
mod list_templates;
mod payload;
mod render_document;
mod save_template;
mod test_data;

#[cfg(test)]
pub(crate) mod fakes;

pub use get_template::{GetTemplateHandler, GetTemplateQuery, GetTemplateResult};
pub use list_templates::ListTemplatesHandler;
pub use payload::{extract_markdown, TemplatePayload, DEFAULT_TEST_SET};
pub use render_document::{
    DataSource, RenderDocumentCommand, RenderDocumentHandler, RenderError, RenderSettings,
    TemplateSource,
};
pub use save_template::{
    SaveTemplateCommand, SaveTemplateError, SaveTemplateHandler, SaveTemplateResult,
};
pub use test_data::TestDataHandler;
