//! Rendered output and stylesheet placement.

use super::OutputFormat;

/// How the stylesheet is attached to the generated HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetMode {
    /// Full stylesheet text in a `<style>` element (PDF output).
    Inline(String),
    /// `<link rel="stylesheet">` pointing at `href` (HTML output).
    Linked(String),
    /// Stylesheet unavailable; only the charset is added.
    None,
}

/// Body of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    Html(String),
    Pdf(Vec<u8>),
}

impl DocumentBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            DocumentBody::Html(html) => html.as_bytes(),
            DocumentBody::Pdf(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            DocumentBody::Html(html) => html.into_bytes(),
            DocumentBody::Pdf(bytes) => bytes,
        }
    }
}

/// A finished document with the headers it should be served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    pub body: DocumentBody,
    pub headers: Vec<(&'static str, String)>,
}

impl RenderedDocument {
    pub fn html(html: String) -> Self {
        Self {
            content_type: OutputFormat::Html.content_type(),
            body: DocumentBody::Html(html),
            headers: Vec::new(),
        }
    }

    /// PDF served inline as `<name>.pdf` and never cached without revalidation.
    pub fn pdf(name: &str, bytes: Vec<u8>) -> Self {
        let file_name = name.rsplit('/').next().unwrap_or(name);
        Self {
            content_type: OutputFormat::Pdf.content_type(),
            body: DocumentBody::Pdf(bytes),
            headers: vec![
                (
                    "Content-Disposition",
                    format!("inline; filename=\"{}.pdf\"", file_name),
                ),
                (
                    "Cache-Control",
                    "must-revalidate, post-check=0, pre-check=0".to_string(),
                ),
            ],
        }
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_document_carries_download_headers() {
        let doc = RenderedDocument::pdf("vedtak", b"%PDF-1.4".to_vec());
        assert_eq!(doc.content_type, "application/pdf");
        assert_eq!(
            doc.header("content-disposition"),
            Some("inline; filename=\"vedtak.pdf\"")
        );
        assert_eq!(
            doc.header("Cache-Control"),
            Some("must-revalidate, post-check=0, pre-check=0")
        );
    }

    #[test]
    fn pdf_filename_uses_last_name_segment() {
        let doc = RenderedDocument::pdf("letters/welcome", Vec::new());
        assert_eq!(
            doc.header("Content-Disposition"),
            Some("inline; filename=\"welcome.pdf\"")
        );
    }

    #[test]
    fn html_document_has_no_extra_headers() {
        let doc = RenderedDocument::html("<p>x</p>".to_string());
        assert_eq!(doc.content_type, "text/html");
        assert!(doc.headers.is_empty());
        assert_eq!(doc.body.as_bytes(), b"<p>x</p>");
    }
}
