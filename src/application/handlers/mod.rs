//! Application handlers.
//!
//! Command and query handlers that orchestrate the rendering pipeline and
//! template editing through ports.

pub mod template;

pub use template::{
    DataSource, GetTemplateHandler, GetTemplateQuery, GetTemplateResult, ListTemplatesHandler,
    RenderDocumentCommand, RenderDocumentHandler, RenderError, RenderSettings,
    SaveTemplateCommand, SaveTemplateError, SaveTemplateHandler, SaveTemplateResult,
    TemplatePayload, TemplateSource, TestDataHandler,
};
