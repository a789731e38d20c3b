//! Fixed-layout rendering: flowed plain text on A4 pages.
//!
//! This is an explicit fidelity trade-off: the document's text is dumped as
//! simple flowed lines at a fixed margin and font size. Nothing of the
//! original layout survives.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

const PAGE_WIDTH: f32 = 595.276; // A4 portrait, points
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 12.0;
const LEADING: f32 = FONT_SIZE * 1.2;

/// Rough per-character advance for Helvetica at `FONT_SIZE`, used for the
/// greedy wrap. Overestimating slightly keeps lines inside the margin.
const CHAR_WIDTH: f32 = FONT_SIZE * 0.52;

const FONT_NAME: Name<'static> = Name(b"F1");

/// Render plain text into a single PDF document.
pub(crate) fn render_text(text: &str) -> Vec<u8> {
    let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / CHAR_WIDTH) as usize;
    let lines_per_page = ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING) as usize;

    let lines = wrap_lines(text, max_chars.max(1));
    let pages: Vec<&[String]> = if lines.is_empty() {
        vec![&[]]
    } else {
        lines.chunks(lines_per_page.max(1)).collect()
    };

    let mut pdf = Pdf::new();
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let font_id = Ref::new(3);
    let mut next_id = 4;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

    let mut page_ids = Vec::with_capacity(pages.len());
    for page_lines in &pages {
        let page_id = alloc();
        let content_id = alloc();
        page_ids.push(page_id);

        let mut content = Content::new();
        content.begin_text();
        content.set_font(FONT_NAME, FONT_SIZE);
        content.set_leading(LEADING);
        content.next_line(MARGIN, PAGE_HEIGHT - MARGIN - FONT_SIZE);
        for line in *page_lines {
            content.show(Str(&latin1(line)));
            content.next_line(0.0, -LEADING);
        }
        content.end_text();
        pdf.stream(content_id, &content.finish());

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    pdf.finish()
}

/// Greedy word wrap at a character budget; hard-splits overlong words.
fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.lines() {
        if source_line.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars
            {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            if word.chars().count() > max_chars {
                for chunk in word
                    .chars()
                    .collect::<Vec<_>>()
                    .chunks(max_chars)
                    .map(|c| c.iter().collect::<String>())
                {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    current = chunk;
                }
            } else {
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Encode text for the built-in Helvetica font; characters outside Latin-1
/// degrade to `?`.
fn latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if (c as u32) < 256 { c as u32 as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_pdf_header_and_text() {
        let bytes = render_text("Dear Ann, total 100.");
        assert!(bytes.starts_with(b"%PDF"));
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(haystack.contains("Helvetica"));
    }

    #[test]
    fn test_empty_text_still_yields_one_page() {
        let bytes = render_text("");
        assert!(bytes.starts_with(b"%PDF"));
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 1"));
    }

    #[test]
    fn test_long_text_spans_multiple_pages() {
        let text = "line\n".repeat(500);
        let bytes = render_text(&text);
        let haystack = String::from_utf8_lossy(&bytes);
        assert!(!haystack.contains("/Count 1 "));
        assert!(haystack.matches("/Contents").count() > 1);
    }

    #[test]
    fn test_wrap_lines_budget() {
        let lines = wrap_lines("aaa bbb ccc", 7);
        assert_eq!(lines, vec!["aaa bbb".to_string(), "ccc".to_string()]);
    }

    #[test]
    fn test_wrap_hard_splits_long_word() {
        let lines = wrap_lines(&"x".repeat(10), 4);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() <= 4));
    }
}
