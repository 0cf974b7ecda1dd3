//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (save) are separated from queries (list, get, test data); rendering
//! is a side-effect-free command producing a document.

pub mod handlers;

pub use handlers::{
    DataSource, GetTemplateHandler, GetTemplateQuery, GetTemplateResult, ListTemplatesHandler,
    RenderDocumentCommand, RenderDocumentHandler, RenderError, RenderSettings,
    SaveTemplateCommand, SaveTemplateError, SaveTemplateHandler, SaveTemplateResult,
    TemplatePayload, TemplateSource, TestDataHandler,
};
