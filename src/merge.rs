//! The merge engine: one finished document per data row.
//!
//! Two entry modes share one substitution core. Catalog mode resolves a
//! registered [`TemplateRecord`](crate::catalog::TemplateRecord) by type and
//! uses its declared placeholder map; ad-hoc mode discovers placeholders in
//! an uploaded template and uses each token's inner text as the column name
//! directly.
//!
//! Per-row policy: a placeholder whose column is absent from the header map
//! is skipped with a warning and the literal token stays in the output; a
//! present column with an empty cell substitutes the empty string (warning
//! only). Structural failures abort the request before any document is
//! produced.

use crate::archive::{self, Workspace};
use crate::catalog::Catalog;
use crate::docx::DocxPackage;
use crate::error::{Error, Result};
use crate::render::{self, OutputFormat};
use crate::xlsx::TableView;
use log::{error, warn};
use uuid::Uuid;

/// Placeholder bindings for one merge run: token (braces included) to
/// spreadsheet column name.
type Bindings = Vec<(String, String)>;

/// Catalog mode: merge a spreadsheet against a registered template.
///
/// Looks up the first record matching `contract_type`
/// ([`Error::TypeNotFound`] if none). A record whose stored template is
/// missing is recoverable: the result is a one-entry archive containing a
/// plain-text note naming the missing path, and no documents are attempted.
pub fn generate(
    catalog: &Catalog,
    spreadsheet: &[u8],
    contract_type: &str,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    let record = catalog
        .find(contract_type)?
        .ok_or_else(|| Error::TypeNotFound(contract_type.to_string()))?;

    if !record.template_path.exists() {
        error!(
            "template file not found: {}",
            record.template_path.display()
        );
        let note = format!("Template file not found: {}", record.template_path.display());
        return archive::pack(&[("ERROR.txt".to_string(), note.into_bytes())]);
    }

    let template_bytes = std::fs::read(&record.template_path)?;
    let template = DocxPackage::from_bytes(&template_bytes)?;

    // Declared mapping: key is the token, value names the column (any braces stripped).
    let bindings: Bindings = record
        .placeholders
        .iter()
        .map(|(token, column)| (token.clone(), strip_braces(column)))
        .collect();

    let table = TableView::from_bytes(spreadsheet)?;
    merge_rows(&template, &bindings, &table, format, contract_type)
}

/// Ad-hoc mode: merge a spreadsheet against a one-off uploaded template.
///
/// Placeholders are discovered fresh from the template; each token's inner
/// text is the spreadsheet column name. Output is always the native format.
pub fn generate_from_files(template_bytes: &[u8], spreadsheet: &[u8]) -> Result<Vec<u8>> {
    let template = DocxPackage::from_bytes(template_bytes)?;

    let bindings: Bindings = template
        .placeholders()?
        .into_iter()
        .map(|token| {
            let column = strip_braces(&token);
            (token, column)
        })
        .collect();

    let table = TableView::from_bytes(spreadsheet)?;
    merge_rows(&template, &bindings, &table, OutputFormat::Native, "merged")
}

/// The shared per-row substitution core.
///
/// Clones the template per row (copies are independent), resolves each
/// binding against the header map, substitutes, renders, and stages one
/// uniquely named output per row before packaging.
fn merge_rows(
    template: &DocxPackage,
    bindings: &Bindings,
    table: &TableView,
    format: OutputFormat,
    name_stem: &str,
) -> Result<Vec<u8>> {
    let mut workspace = Workspace::create()?;

    for row in table.rows() {
        let mut document = template.clone();

        let mut replacements: Vec<(String, String)> = Vec::with_capacity(bindings.len());
        for (token, column) in bindings {
            let Some(col) = table.column(column) else {
                warn!("column '{column}' not found in spreadsheet, skipping placeholder {token}");
                continue;
            };
            let value = row.cell(col);
            if value.is_empty() {
                warn!(
                    "value in column '{column}' is empty for this row, \
                     placeholder {token} replaced with empty string"
                );
            }
            replacements.push((token.clone(), value.to_string()));
        }

        document.substitute(&replacements)?;
        let bytes = render::render(&document, format)?;

        let name = format!("{}_{}.{}", name_stem, Uuid::new_v4(), format.extension());
        workspace.stage(&name, &bytes)?;
    }

    workspace.pack()
}

/// Strip every brace from a declared column reference.
fn strip_braces(column: &str) -> String {
    column.replace(['{', '}'], "")
}
