//! In-memory .docx package handling (ZIP archive of XML parts).

use crate::error::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;

use super::text;

/// Path of the main document part inside the package.
const DOCUMENT_PART: &str = "word/document.xml";

/// An in-memory Word (.docx) package.
///
/// Holds every part of the archive so that per-row working copies are plain
/// clones with no shared mutable state. Only `word/document.xml` is ever
/// rewritten; all other parts round-trip untouched.
///
/// # Examples
///
/// ```no_run
/// use mulberry::docx::DocxPackage;
///
/// let bytes = std::fs::read("template.docx")?;
/// let doc = DocxPackage::from_bytes(&bytes)?;
/// for token in doc.placeholders()? {
///     println!("found {token}");
/// }
/// # Ok::<(), mulberry::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct DocxPackage {
    /// All archive entries in original order
    parts: Vec<(String, Vec<u8>)>,
    /// Index of `word/document.xml` within `parts`
    document_index: usize,
}

impl DocxPackage {
    /// Open a .docx package from raw bytes.
    ///
    /// Fails with [`Error::TemplateUnreadable`] if the bytes are not a ZIP
    /// archive or the archive has no main document part.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::TemplateUnreadable(format!("not a ZIP archive: {e}")))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::TemplateUnreadable(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)
                .map_err(|e| Error::TemplateUnreadable(e.to_string()))?;
            parts.push((file.name().to_string(), content));
        }

        let document_index = parts
            .iter()
            .position(|(name, _)| name == DOCUMENT_PART)
            .ok_or_else(|| {
                Error::TemplateUnreadable(format!("missing {DOCUMENT_PART} part"))
            })?;

        Ok(Self {
            parts,
            document_index,
        })
    }

    /// Raw XML of the main document part.
    #[inline]
    pub fn document_xml(&self) -> &[u8] {
        &self.parts[self.document_index].1
    }

    /// Discover every distinct `{placeholder}` token in the document.
    ///
    /// Tokens are returned including braces, in order of first occurrence,
    /// duplicates removed. Matching is run-bounded (see module docs).
    pub fn placeholders(&self) -> Result<Vec<String>> {
        text::extract_placeholders(self.document_xml())
    }

    /// Replace every occurrence of each token with its value, in every run.
    pub fn substitute(&mut self, replacements: &[(String, String)]) -> Result<()> {
        if replacements.is_empty() {
            return Ok(());
        }
        let rewritten = text::replace_run_text(self.document_xml(), replacements)?;
        self.parts[self.document_index].1 = rewritten;
        Ok(())
    }

    /// Extract the document's plain text, one line per paragraph.
    pub fn text(&self) -> Result<String> {
        text::extract_text(self.document_xml())
    }

    /// Serialize the package back into .docx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for (name, content) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(content)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}
