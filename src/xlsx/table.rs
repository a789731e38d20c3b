//! Header-mapped view over the first worksheet of a workbook.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read};

use super::sheet;

const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const WORKSHEET_DIR: &str = "xl/worksheets/";

/// One used data row: 1-based column number to cell text.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: BTreeMap<u32, String>,
}

impl Row {
    /// Cell text at the given 1-based column, empty string if absent.
    pub fn cell(&self, column: u32) -> &str {
        self.cells.get(&column).map(String::as_str).unwrap_or("")
    }

    fn is_empty(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// An in-memory view over a spreadsheet's header mapping and data rows.
///
/// The first used row supplies the header map (cell text trimmed; a later
/// column with a duplicate name silently overwrites the earlier one). The
/// remaining used rows, in top-to-bottom sheet order, are the rows to merge.
///
/// # Examples
///
/// ```no_run
/// use mulberry::xlsx::TableView;
///
/// let bytes = std::fs::read("clients.xlsx")?;
/// let table = TableView::from_bytes(&bytes)?;
/// for row in table.rows() {
///     println!("{}", table.value(row, "ClientName"));
/// }
/// # Ok::<(), mulberry::Error>(())
/// ```
#[derive(Debug)]
pub struct TableView {
    headers: HashMap<String, u32>,
    rows: Vec<Row>,
}

impl TableView {
    /// Open a workbook from raw bytes and view its first worksheet.
    ///
    /// Fails with [`Error::NoDataRange`] when the workbook has no worksheet
    /// part, and [`Error::NoHeaderRow`] when the first worksheet has no
    /// populated first row.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

        let shared = match read_part(&mut archive, SHARED_STRINGS_PART)? {
            Some(xml) => sheet::parse_shared_strings(&xml)?,
            None => Vec::new(),
        };

        let sheet_path = first_sheet_path(&archive).ok_or(Error::NoDataRange)?;
        let sheet_xml = read_part(&mut archive, &sheet_path)?.ok_or(Error::NoDataRange)?;
        let raw = sheet::parse_sheet(&sheet_xml, &shared)?;

        let mut rows: Vec<Row> = raw
            .rows
            .into_iter()
            .map(|cells| Row { cells })
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(Error::NoHeaderRow);
        }

        let header_row = rows.remove(0);
        let mut headers = HashMap::with_capacity(header_row.cells.len());
        for (&col, name) in &header_row.cells {
            let name = name.trim();
            if !name.is_empty() {
                // Duplicate column names: last wins.
                headers.insert(name.to_string(), col);
            }
        }

        Ok(Self { headers, rows })
    }

    /// 1-based column number for a header name, `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<u32> {
        self.headers.get(name).copied()
    }

    /// The used data rows, header excluded, in sheet order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Cell text for a row by column name, empty string if the column is
    /// absent from the header map.
    ///
    /// Callers that must distinguish "column absent" from "cell empty"
    /// consult [`TableView::column`] first.
    pub fn value(&self, row: &Row, column_name: &str) -> String {
        match self.column(column_name) {
            Some(col) => row.cell(col).to_string(),
            None => String::new(),
        }
    }
}

/// Read one part of the archive, `None` if the entry does not exist.
fn read_part<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(f) => f,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut content)?;
    Ok(Some(content))
}

/// Path of the first worksheet part.
///
/// Prefers the conventional `sheet1.xml`; otherwise picks the lowest-numbered
/// worksheet entry (length-then-name ordering keeps `sheet2` before
/// `sheet10`).
fn first_sheet_path<R: Read + std::io::Seek>(archive: &zip::ZipArchive<R>) -> Option<String> {
    let mut candidates: Vec<&str> = archive
        .file_names()
        .filter(|name| name.starts_with(WORKSHEET_DIR) && name.ends_with(".xml"))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    if let Some(first) = candidates.iter().find(|n| **n == "xl/worksheets/sheet1.xml") {
        return Some(first.to_string());
    }
    candidates.sort_by_key(|name| (name.len(), name.to_string()));
    Some(candidates[0].to_string())
}
