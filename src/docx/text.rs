//! Run-level text scanning and rewriting for `word/document.xml`.

use crate::error::{Error, Result};
use crate::xml::{escape_xml, unescape_xml};
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesText, Event};
use regex::Regex;

/// The placeholder token pattern: `{` plus one or more non-`}` characters plus `}`.
const PLACEHOLDER_PATTERN: &str = r"\{[^}]+\}";

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("Failed to compile placeholder pattern"));

/// Discover every distinct placeholder token in the document.
///
/// The pattern is applied to each `<w:t>` run's text independently, so a
/// token split across two runs is not discovered. Returns tokens including
/// braces (e.g. `"{ClientName}"`), in order of first occurrence, duplicates
/// removed.
pub(crate) fn extract_placeholders(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);

    let mut tokens: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut buf = Vec::with_capacity(512);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            },
            Ok(Event::Text(e)) if in_text => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                let text = unescape_xml(&raw);
                for m in PLACEHOLDER_RE.find_iter(&text) {
                    if !tokens.iter().any(|t| t == m.as_str()) {
                        tokens.push(m.as_str().to_string());
                    }
                }
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = false;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(tokens)
}

/// Replace literal token substrings in every `<w:t>` run.
///
/// Every occurrence of each token within a run is replaced; matching never
/// spans run boundaries. Runs that contain no token are written back
/// byte-identical.
pub(crate) fn replace_run_text(xml: &[u8], replacements: &[(String, String)]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));

    let mut in_text = false;
    let mut buf = Vec::with_capacity(512);

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(ev) => ev,
            Err(e) => return Err(Error::Xml(e.to_string())),
        };
        match event {
            Event::Eof => break,
            Event::Start(ref e) if e.local_name().as_ref() == b"t" => {
                in_text = true;
                writer.write_event(event)?;
            },
            Event::End(ref e) if e.local_name().as_ref() == b"t" => {
                in_text = false;
                writer.write_event(event)?;
            },
            Event::Text(ref e) if in_text => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                let text = unescape_xml(&raw);
                let mut replaced = text.clone();
                for (token, value) in replacements {
                    if replaced.contains(token.as_str()) {
                        replaced = replaced.replace(token.as_str(), value);
                    }
                }
                if replaced == text {
                    // Untouched runs pass through verbatim, entities included.
                    writer.write_event(event)?;
                } else {
                    let escaped = escape_xml(&replaced);
                    writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
                }
            },
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// Extract the document's plain text, one line per paragraph.
///
/// Formatting is discarded; only `<w:t>` content is kept. Used by the
/// fixed-layout renderer and by tests asserting on merged output.
pub(crate) fn extract_text(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut buf = Vec::with_capacity(512);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            },
            Ok(Event::Text(e)) if in_text => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                current.push_str(&unescape_xml(&raw));
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}
