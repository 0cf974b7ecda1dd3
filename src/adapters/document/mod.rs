//! Document adapters - markdown conversion and HTML post-processing.
//!
//! This module provides adapters for the conversion ports:
//! - `PulldownMarkdownConverter` - Converts rendered markdown to HTML
//! - `Html5everPostProcessor` - Adds charset and stylesheet to the HTML document

mod html_metadata;
mod pulldown_markdown;

pub use html_metadata::Html5everPostProcessor;
pub use pulldown_markdown::PulldownMarkdownConverter;
