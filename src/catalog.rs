//! The durable registry of named template records.
//!
//! The catalog is a JSON array of [`TemplateRecord`]s, read fully into memory
//! on each operation and overwritten as a whole on save. Template bytes live
//! next to it in the storage area, referenced by path.
//!
//! Registration never rejects duplicate `contract_type` values; lookup
//! returns the first match. That shadowing is a documented quirk of the
//! catalog format, preserved for compatibility.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Catalog mutation is serialized process-wide: the catalog file is a shared
/// durable resource and whole-file rewrite is not transactional across
/// requests. Generation only reads and takes no lock.
static WRITE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// One registered contract/document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Unique logical name, case-sensitive match key
    #[serde(rename = "type")]
    pub contract_type: String,
    /// Path of the stored template document
    pub template_path: PathBuf,
    /// Placeholder token (braces included) to data-source column reference
    pub placeholders: HashMap<String, String>,
}

/// The template catalog: a storage directory holding template documents plus
/// one JSON file listing the records.
pub struct Catalog {
    storage_dir: PathBuf,
    catalog_path: PathBuf,
}

impl Catalog {
    /// Open a catalog rooted at the given storage directory.
    ///
    /// Nothing is created or read until an operation needs it; a missing
    /// catalog file simply means an empty record list.
    pub fn new<P: AsRef<Path>>(storage_dir: P, catalog_file: &str) -> Self {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        let catalog_path = storage_dir.join(catalog_file);
        Self {
            storage_dir,
            catalog_path,
        }
    }

    /// The directory holding stored template documents.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Read and deserialize all records.
    ///
    /// Returns an empty list when no catalog file exists yet. A file that
    /// exists but does not deserialize is [`Error::CatalogCorrupt`].
    pub fn load_all(&self) -> Result<Vec<TemplateRecord>> {
        if !self.catalog_path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&self.catalog_path)?;
        serde_json::from_str(&json).map_err(|e| Error::CatalogCorrupt(e.to_string()))
    }

    /// Serialize and overwrite the whole catalog file.
    pub fn save_all(&self, records: &[TemplateRecord]) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir)
            .map_err(|e| Error::StorageFailure(e.to_string()))?;
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| Error::StorageFailure(e.to_string()))?;
        std::fs::write(&self.catalog_path, json)
            .map_err(|e| Error::StorageFailure(e.to_string()))
    }

    /// Projection of [`Catalog::load_all`] onto `contract_type`.
    ///
    /// Duplicates are reflected as-is.
    pub fn list_types(&self) -> Result<Vec<String>> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|r| r.contract_type)
            .collect())
    }

    /// First record whose `contract_type` matches, `None` if there is none.
    pub fn find(&self, contract_type: &str) -> Result<Option<TemplateRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|r| r.contract_type == contract_type))
    }

    /// Store template bytes and append a new record.
    ///
    /// The template lands under the storage directory named by the final
    /// component of `file_name`; the record is appended (duplicates by type
    /// are not rejected) and the catalog saved. The whole operation holds the
    /// process-wide write lock.
    pub fn register(
        &self,
        contract_type: &str,
        placeholders: HashMap<String, String>,
        template_bytes: &[u8],
        file_name: &str,
    ) -> Result<()> {
        let _guard = WRITE_LOCK.lock();

        std::fs::create_dir_all(&self.storage_dir)
            .map_err(|e| Error::StorageFailure(e.to_string()))?;

        // Only the final path component: uploads must not escape the storage area.
        let file_name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| Error::StorageFailure(format!("invalid template file name: {file_name}")))?;
        let template_path = self.storage_dir.join(file_name);
        std::fs::write(&template_path, template_bytes)
            .map_err(|e| Error::StorageFailure(e.to_string()))?;

        let mut records = self.load_all()?;
        records.push(TemplateRecord {
            contract_type: contract_type.to_string(),
            template_path,
            placeholders,
        });
        self.save_all(&records)
    }
}
