//! Rendering module - output formats and rendered document values.

mod document;
mod format;

pub use document::{DocumentBody, RenderedDocument, StylesheetMode};
pub use format::{OutputFormat, UnsupportedFormat};
