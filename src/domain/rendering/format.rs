//! Requested output format of a render.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output format requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Html,
    Pdf,
    /// Archival PDF. The PDF service decides the profile; we only pass HTML along.
    PdfA,
}

/// The format string names nothing we can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported output format '{0}'")]
pub struct UnsupportedFormat(pub String);

impl OutputFormat {
    /// Returns true if the document is produced by the PDF service.
    pub fn is_pdf(&self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::PdfA)
    }

    /// MIME type of the produced document.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Html => "text/html",
            OutputFormat::Pdf | OutputFormat::PdfA => "application/pdf",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            "pdfa" | "pdf/a" | "pdf-a" => Ok(OutputFormat::PdfA),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
            OutputFormat::PdfA => "pdfa",
        };
        write!(f, "{}", s)
    }
}
