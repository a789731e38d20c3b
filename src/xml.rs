//! XML entity handling shared by the docx and xlsx readers.
//!
//! Run and cell text comes off the wire escaped; it is unescaped before
//! placeholder matching, and substituted values are re-escaped before they
//! are written back into a run.

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

const CHARS: [&str; 5] = ["&", "<", ">", "\"", "'"];
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

static ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(CHARS)
        .expect("Failed to build XML escaper")
});

// LeftmostLongest so "&amp;lt;" resolves its leading "&amp;" first.
static UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(ENTITIES)
        .expect("Failed to build XML unescaper")
});

/// Escape the five XML special characters in one pass.
///
/// Applied to substituted values on their way into run text.
///
/// # Examples
///
/// ```
/// use mulberry::xml::escape_xml;
/// assert_eq!(escape_xml("Smith & Sons <Ltd>"), "Smith &amp; Sons &lt;Ltd&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    ESCAPER.replace_all(s, &ENTITIES)
}

/// Resolve the five standard XML entities.
///
/// Anything else, numeric character references included, passes through
/// untouched. Runs whose text a merge does not change are therefore written
/// back verbatim rather than round-tripped through these helpers.
///
/// # Examples
///
/// ```
/// use mulberry::xml::unescape_xml;
/// assert_eq!(unescape_xml("Dear Ann &amp; Bob"), "Dear Ann & Bob");
/// assert_eq!(unescape_xml("total &gt; 100"), "total > 100");
/// assert_eq!(unescape_xml("&#169; 2026"), "&#169; 2026");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    UNESCAPER.replace_all(s, &CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_roundtrip() {
        let original = "Smith & Sons <Ltd> \"quoted\"";
        assert_eq!(unescape_xml(&escape_xml(original)), original);
    }

    #[test]
    fn test_unknown_entity_untouched() {
        assert_eq!(unescape_xml("&invalid;"), "&invalid;");
        assert_eq!(unescape_xml("&#8212;"), "&#8212;");
    }

    #[test]
    fn test_escaped_ampersand_not_double_resolved() {
        // "&amp;lt;" is a literal "&lt;" in the text, not a "<".
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
    }
}
