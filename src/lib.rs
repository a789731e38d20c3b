//! Mulberry - a batch document-merge engine for OOXML templates
//!
//! Given a reusable `.docx` template containing `{placeholder}` tokens and an
//! `.xlsx` tabular data source, Mulberry produces one finished document per
//! data row with the placeholders substituted by row values, then packages
//! the results into a single ZIP archive.
//!
//! # Features
//!
//! - **Template catalog**: a durable registry of named templates with their
//!   declared placeholder-to-column mappings
//! - **Ad-hoc merging**: placeholders discovered on the fly from a one-off
//!   uploaded template, token text doubling as the column name
//! - **Graceful per-row degradation**: an absent column leaves the token in
//!   place, an empty cell substitutes the empty string; neither aborts the
//!   batch
//! - **Format adaptation**: native `.docx` output, or a lossy fixed-layout
//!   PDF rendering of the document text
//!
//! # Example - Catalog mode
//!
//! ```no_run
//! use mulberry::{Config, MergeService};
//! use std::collections::HashMap;
//!
//! # fn main() -> mulberry::Result<()> {
//! let service = MergeService::new(Config::default());
//!
//! // Register a template once...
//! let template = std::fs::read("lease.docx")?;
//! let placeholders = HashMap::from([
//!     ("{ClientName}".to_string(), "ClientName".to_string()),
//! ]);
//! service.register_template("lease", placeholders, &template, "lease.docx")?;
//!
//! // ...then merge a spreadsheet against it.
//! let spreadsheet = std::fs::read("clients.xlsx")?;
//! let archive = service.generate(&spreadsheet, "lease", "native")?;
//! std::fs::write("contracts.zip", archive)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Ad-hoc mode
//!
//! ```no_run
//! use mulberry::{Config, MergeService};
//!
//! # fn main() -> mulberry::Result<()> {
//! let service = MergeService::new(Config::default());
//! let template = std::fs::read("invoice.docx")?;
//! let spreadsheet = std::fs::read("orders.xlsx")?;
//! let archive = service.generate_from_files(&template, &spreadsheet)?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod catalog;
pub mod config;
pub mod docx;
pub mod error;
pub mod merge;
pub mod render;
pub mod service;
pub mod xlsx;
pub mod xml;

#[cfg(test)]
pub(crate) mod testutil;

pub use catalog::{Catalog, TemplateRecord};
pub use config::Config;
pub use docx::DocxPackage;
pub use error::{Error, Result};
pub use render::OutputFormat;
pub use service::MergeService;
pub use xlsx::TableView;
