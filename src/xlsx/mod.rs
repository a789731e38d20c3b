//! Minimal SpreadsheetML (.xlsx) reading for the merge engine.
//!
//! Only the surface the merge needs: open a workbook from bytes, locate the
//! first worksheet, resolve shared strings, and expose the used rows as a
//! [`TableView`] (header mapping plus data rows in sheet order).

mod sheet;
mod table;

pub use table::{Row, TableView};
