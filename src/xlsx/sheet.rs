//! Worksheet and shared-strings XML parsing.

use crate::error::{Error, Result};
use crate::xml::unescape_xml;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;

/// Cell data of one worksheet, rows in document order.
///
/// Keys are 1-based absolute column numbers taken from cell references.
/// Cells without a value are absent from the map.
pub(crate) struct RawSheet {
    pub rows: Vec<BTreeMap<u32, String>>,
}

/// Parse `xl/sharedStrings.xml` into the string table.
///
/// Rich-text entries (`<si>` with multiple `<r><t>` runs) are concatenated,
/// matching how spreadsheet applications display them.
pub(crate) fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut buf = Vec::with_capacity(512);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                },
                b"t" if in_si => in_t = true,
                _ => {},
            },
            Ok(Event::Text(e)) if in_t => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                current.push_str(&unescape_xml(&raw));
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(strings)
}

/// Parse a worksheet XML part into raw cell data.
///
/// Handles shared strings (`t="s"`), inline strings (`t="inlineStr"`),
/// literal strings (`t="str"`), booleans and raw numeric values. Formatting
/// and formulas are ignored; the cached `<v>` value is what the merge sees.
pub(crate) fn parse_sheet(xml: &[u8], shared: &[String]) -> Result<RawSheet> {
    let mut reader = Reader::from_reader(xml);

    let mut rows: Vec<BTreeMap<u32, String>> = Vec::new();
    let mut current_row: BTreeMap<u32, String> = BTreeMap::new();
    let mut in_row = false;

    // State of the cell being parsed
    let mut cell_col: u32 = 0;
    let mut cell_type: Option<String> = None;
    let mut cell_value = String::new();
    let mut has_value = false;
    let mut in_value = false;
    let mut in_inline_text = false;

    let mut buf = Vec::with_capacity(512);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    in_row = true;
                    current_row.clear();
                },
                b"c" if in_row => {
                    (cell_col, cell_type) = cell_attributes(&e, cell_col.saturating_add(1));
                    cell_value.clear();
                    has_value = false;
                },
                b"v" if in_row => in_value = true,
                b"t" if in_row => in_inline_text = true,
                _ => {},
            },
            // Self-closing cells carry no value but still occupy a column.
            Ok(Event::Empty(e)) if in_row && e.local_name().as_ref() == b"c" => {
                (cell_col, _) = cell_attributes(&e, cell_col.saturating_add(1));
            },
            Ok(Event::Text(e)) if in_value || in_inline_text => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                cell_value.push_str(&unescape_xml(&raw));
                has_value = true;
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" if in_row => {
                    if has_value {
                        let resolved = resolve_cell(cell_type.as_deref(), &cell_value, shared);
                        current_row.insert(cell_col, resolved);
                    }
                },
                b"row" => {
                    in_row = false;
                    cell_col = 0;
                    rows.push(std::mem::take(&mut current_row));
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(RawSheet { rows })
}

/// Column number and type of a `<c>` element.
///
/// The `r` reference wins over the running counter; a missing or
/// unparseable reference falls back to `next_col`.
fn cell_attributes(e: &BytesStart, next_col: u32) -> (u32, Option<String>) {
    let mut col = next_col;
    let mut cell_type = None;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                let reference = String::from_utf8_lossy(&attr.value);
                if let Some(c) = column_of_reference(&reference) {
                    col = c;
                }
            },
            b"t" => {
                cell_type = Some(String::from_utf8_lossy(&attr.value).into_owned());
            },
            _ => {},
        }
    }
    (col, cell_type)
}

/// Resolve a cell's stored value into its display string.
fn resolve_cell(cell_type: Option<&str>, value: &str, shared: &[String]) -> String {
    match cell_type {
        Some("s") => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared.get(idx))
            .cloned()
            .unwrap_or_default(),
        Some("b") => match value.trim() {
            "1" => "TRUE".to_string(),
            "0" => "FALSE".to_string(),
            other => other.to_string(),
        },
        // "str", "inlineStr", numeric and anything else: the raw text
        _ => value.to_string(),
    }
}

/// 1-based column number of a cell reference like `"BC12"`.
///
/// Returns `None` when the reference has no leading column letters, or when
/// they name a column beyond `u32::MAX` (references are untrusted input).
pub(crate) fn column_of_reference(reference: &str) -> Option<u32> {
    let letters: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for c in letters.chars() {
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        col = col.checked_mul(26)?.checked_add(digit)?;
    }
    Some(col)
}
