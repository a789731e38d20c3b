//! The operations served to the hosting layer.
//!
//! The hosting layer (HTTP/UI, not part of this crate) calls these with byte
//! slices and receives archive bytes back; transport framing is its concern.
//! Each call is a self-contained request owning its own staging workspace.

use crate::catalog::{Catalog, TemplateRecord};
use crate::config::Config;
use crate::error::Result;
use crate::merge;
use crate::render::OutputFormat;
use log::info;
use std::collections::HashMap;

/// The document-merge service facade.
///
/// # Examples
///
/// ```no_run
/// use mulberry::{Config, MergeService};
///
/// let service = MergeService::new(Config::default());
/// let spreadsheet = std::fs::read("clients.xlsx")?;
/// let archive = service.generate(&spreadsheet, "lease", "native")?;
/// std::fs::write("contracts.zip", archive)?;
/// # Ok::<(), mulberry::Error>(())
/// ```
pub struct MergeService {
    catalog: Catalog,
}

impl MergeService {
    /// Create a service over the configured storage area.
    pub fn new(config: Config) -> Self {
        let catalog = Catalog::new(&config.storage_dir, &config.catalog_file);
        Self { catalog }
    }

    /// The registered contract type names, duplicates included.
    pub fn list_contract_types(&self) -> Result<Vec<String>> {
        self.catalog.list_types()
    }

    /// All catalog records.
    pub fn load_records(&self) -> Result<Vec<TemplateRecord>> {
        self.catalog.load_all()
    }

    /// Overwrite the catalog with the given records.
    pub fn save_records(&self, records: &[TemplateRecord]) -> Result<()> {
        self.catalog.save_all(records)
    }

    /// Catalog-mode generation: one output document per data row, packaged
    /// as a ZIP archive.
    ///
    /// `output_format` is parsed before anything else, so an unknown format
    /// fails the request at entry.
    pub fn generate(
        &self,
        spreadsheet: &[u8],
        contract_type: &str,
        output_format: &str,
    ) -> Result<Vec<u8>> {
        let format = OutputFormat::parse(output_format)?;

        info!("selected contract type: {contract_type}");
        if let Some(record) = self.catalog.find(contract_type)? {
            let keys: Vec<&str> = record.placeholders.keys().map(String::as_str).collect();
            info!("placeholders for {contract_type}: {}", keys.join(", "));
        }

        merge::generate(&self.catalog, spreadsheet, contract_type, format)
    }

    /// Ad-hoc generation from an uploaded template and spreadsheet.
    pub fn generate_from_files(&self, template: &[u8], spreadsheet: &[u8]) -> Result<Vec<u8>> {
        merge::generate_from_files(template, spreadsheet)
    }

    /// Register a new template: store its bytes and append a catalog record.
    pub fn register_template(
        &self,
        contract_type: &str,
        placeholders: HashMap<String, String>,
        template: &[u8],
        file_name: &str,
    ) -> Result<()> {
        self.catalog
            .register(contract_type, placeholders, template, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::DocxPackage;
    use crate::error::Error;
    use crate::testutil::{archive_entries, docx_bytes, xlsx_bytes};
    use tempfile::TempDir;

    fn service_in(dir: &TempDir) -> MergeService {
        MergeService::new(Config {
            storage_dir: dir.path().to_path_buf(),
            catalog_file: "catalog.json".to_string(),
        })
    }

    #[test]
    fn test_register_generate_roundtrip() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        service
            .register_template(
                "offer",
                HashMap::from([("{Name}".to_string(), "Name".to_string())]),
                &docx_bytes(&["Offer for {Name}"]),
                "offer.docx",
            )
            .unwrap();

        let spreadsheet = xlsx_bytes(&[&["Name"], &["Ann"], &["Bob"]]);
        let archive = service.generate(&spreadsheet, "offer", "native").unwrap();
        let entries = archive_entries(&archive);
        assert_eq!(entries.len(), 2);

        let doc = DocxPackage::from_bytes(&entries[0].1).unwrap();
        assert!(doc.text().unwrap().starts_with("Offer for "));
    }

    #[test]
    fn test_unknown_format_fails_at_entry() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        // Spreadsheet and type are never touched: format parsing comes first.
        let err = service.generate(b"irrelevant", "lease", "odt").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_reregistration_lists_duplicate_types() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        for file in ["a.docx", "b.docx"] {
            service
                .register_template("lease", HashMap::new(), &docx_bytes(&["x"]), file)
                .unwrap();
        }
        assert_eq!(
            service.list_contract_types().unwrap(),
            vec!["lease".to_string(), "lease".to_string()]
        );
    }

    #[test]
    fn test_save_records_overwrites_catalog() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service
            .register_template("lease", HashMap::new(), &docx_bytes(&["x"]), "a.docx")
            .unwrap();

        service.save_records(&[]).unwrap();
        assert!(service.load_records().unwrap().is_empty());
    }

    #[test]
    fn test_generate_from_files_end_to_end() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        let template = docx_bytes(&["Hi {Who}"]);
        let spreadsheet = xlsx_bytes(&[&["Who"], &["there"]]);
        let archive = service.generate_from_files(&template, &spreadsheet).unwrap();
        let entries = archive_entries(&archive);
        assert_eq!(entries.len(), 1);
        let doc = DocxPackage::from_bytes(&entries[0].1).unwrap();
        assert_eq!(doc.text().unwrap(), "Hi there");
    }
}
