//! Service configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the catalog and stored templates live.
///
/// Deserializable so the hosting layer can bind it from its own
/// configuration source; defaults match the conventional layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage area for the catalog file and template documents
    pub storage_dir: PathBuf,
    /// Catalog file name inside the storage area
    pub catalog_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("contracts"),
            catalog_file: "catalog.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = Config::default();
        assert_eq!(config.storage_dir, PathBuf::from("contracts"));
        assert_eq!(config.catalog_file, "catalog.json");
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"storage_dir":"/srv/templates"}"#).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/srv/templates"));
        assert_eq!(config.catalog_file, "catalog.json");
    }
}
