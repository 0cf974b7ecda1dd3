//! Markdown Converter Port - markdown to HTML conversion.

/// Port for converting rendered markdown to an HTML fragment.
///
/// Conversion is pure and stateless; any markdown input produces some HTML.
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, markdown: &str) -> String;
}
