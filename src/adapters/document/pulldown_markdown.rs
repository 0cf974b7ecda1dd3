//! Pulldown-cmark based markdown converter adapter.
//!
//! Pure Rust CommonMark conversion with the GitHub-style extensions that
//! letter templates use: tables, footnotes, strikethrough and task lists.

use pulldown_cmark::{html, Options, Parser};

use crate::ports::MarkdownConverter;

/// Markdown converter using pulldown-cmark.
///
/// Smart punctuation stays off so rendered field values keep their quotes
/// and dashes exactly as supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownMarkdownConverter;

impl PulldownMarkdownConverter {
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
    }
}

impl MarkdownConverter for PulldownMarkdownConverter {
    fn convert(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options());
        let mut html_body = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_body, parser);
        html_body
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
