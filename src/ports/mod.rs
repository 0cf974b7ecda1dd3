//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the rendering pipeline and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `TemplateStore` - Template and partial source text
//! - `TestDataStore` - Sample data sets and schemas stored beside templates
//! - `StyleSource` - The document stylesheet
//!
//! ## Conversion Ports
//!
//! - `MarkdownConverter` - Markdown to HTML
//! - `HtmlPostProcessor` - Charset and stylesheet injection
//! - `PdfRenderer` - External PDF service

mod html_post_processor;
mod markdown_converter;
mod pdf_renderer;
mod style_source;
mod template_store;

pub use html_post_processor::{HtmlError, HtmlPostProcessor};
pub use markdown_converter::MarkdownConverter;
pub use pdf_renderer::{PdfError, PdfRenderer};
pub use style_source::{StyleError, StyleSource};
pub use template_store::{StoreError, TemplateStore, TestDataStore};
