//! Output format adaptation for finished documents.
//!
//! Formats form a closed variant type dispatched here, so the merge path
//! stays free of format conditionals and new formats are additive.

mod pdf;

use crate::docx::DocxPackage;
use crate::error::{Error, Result};

/// The caller-requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The native editable format: the filled .docx, unchanged
    Native,
    /// Fixed-layout rendering: a lossy, text-only PDF
    FixedLayout,
}

impl OutputFormat {
    /// Parse a caller-supplied format string.
    ///
    /// Accepts `"native"`, `"docx"` or `"word"` for the native format and
    /// `"fixed-layout"` or `"pdf"` for the rendered one, case-insensitively.
    /// Anything else is [`Error::UnsupportedFormat`], raised before any row
    /// processing starts.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" | "docx" | "word" => Ok(OutputFormat::Native),
            "fixed-layout" | "pdf" => Ok(OutputFormat::FixedLayout),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }

    /// File extension of documents in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Native => "docx",
            OutputFormat::FixedLayout => "pdf",
        }
    }
}

/// Convert a filled document into the requested output format.
///
/// Native output is the document's own bytes. Fixed-layout output extracts
/// the plain text and flows it onto fixed-margin pages; original layout,
/// tables and styling are deliberately not preserved.
pub fn render(document: &DocxPackage, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Native => document.to_bytes(),
        OutputFormat::FixedLayout => Ok(pdf::render_text(&document.text()?)),
    }
}
