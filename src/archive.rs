//! Output packaging: generated documents into one ZIP archive.

use crate::error::{Error, Result};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Build a single compressed archive with one entry per document.
///
/// Entries appear in the order given. The caller receives exactly the raw
/// archive bytes; nothing is written to disk.
pub fn pack(documents: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in documents {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(content)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Request-local staging area for generated documents.
///
/// A workspace is created at request start and removed on every exit path,
/// success or failure: the backing directory is a [`TempDir`] reclaimed on
/// drop, so an error halfway through a batch leaks nothing.
pub(crate) struct Workspace {
    dir: TempDir,
    staged: Vec<(String, PathBuf)>,
}

impl Workspace {
    /// Create a fresh workspace directory.
    pub(crate) fn create() -> Result<Self> {
        let dir = TempDir::with_prefix("mulberry-merge-")
            .map_err(|e| Error::StorageFailure(e.to_string()))?;
        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    /// Stage one finished document under the workspace.
    pub(crate) fn stage(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes)?;
        self.staged.push((name.to_string(), path));
        Ok(())
    }

    /// Package every staged document, in staging order, into archive bytes.
    ///
    /// Consumes the workspace; the staging directory is removed as soon as
    /// the archive bytes have been read.
    pub(crate) fn pack(self) -> Result<Vec<u8>> {
        let mut documents = Vec::with_capacity(self.staged.len());
        for (name, path) in &self.staged {
            let bytes = std::fs::read(path)?;
            documents.push((name.clone(), bytes));
        }
        pack(&documents)
    }
}
