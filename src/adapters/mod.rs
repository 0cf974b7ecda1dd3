//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `document` - markdown conversion and HTML post-processing
//! - `http` - REST API (axum)
//! - `pdfgen` - client for the external PDF generation service
//! - `storage` - templates, test data and stylesheet on the local filesystem

pub mod document;
pub mod http;
pub mod pdfgen;
pub mod storage;

pub use document::{Html5everPostProcessor, PulldownMarkdownConverter};
pub use pdfgen::HttpPdfRenderer;
pub use storage::{LocalStyleSource, LocalTemplateStore};
