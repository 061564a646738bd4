// src/core/html.rs
// Markup helpers for turning a listing page into searchable text.
// ASCII case-insensitive on tag names; no DOM.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Next complete `open .. close` block at or after `from`, as byte offsets.
/// `open` is a tag prefix like `"<script"`; attributes are skipped.
pub fn next_tag_block_ci(s: &str, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    find_block(s, &to_lower(s), &to_lower(open), &to_lower(close), from)
}

// `lc` is `to_lower(s)`; ASCII lowering keeps byte offsets aligned.
fn find_block(s: &str, lc: &str, open_lc: &str, close_lc: &str, from: usize) -> Option<(usize, usize)> {
    let start = lc.get(from..)?.find(open_lc)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(close_lc)?;
    let end = open_end + end_rel + close_lc.len();
    Some((start, end))
}

/// Drop every `open .. close` block, e.g. all `<script>` elements.
/// An unterminated block is left in place.
pub fn remove_blocks_ci(s: &str, open: &str, close: &str) -> String {
    let lc = to_lower(s);
    let (open_lc, close_lc) = (to_lower(open), to_lower(close));

    let mut out = String::with_capacity(s.len());
    let mut pos = 0usize;
    while let Some((start, end)) = find_block(s, &lc, &open_lc, &close_lc, pos) {
        out.push_str(&s[pos..start]);
        out.push(' ');
        pos = end;
    }
    out.push_str(&s[pos..]);
    out
}

/// Remove all `<...>` tags, then collapse whitespace. Tags become a space so
/// `<b>12</b>July` still reads as two words.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Visible text of a page: scripts and styles removed, tags stripped,
/// entities decoded, whitespace collapsed.
pub fn visible_text(doc: &str) -> String {
    let doc = remove_blocks_ci(doc, "<script", "</script>");
    let doc = remove_blocks_ci(&doc, "<style", "</style>");
    strip_tags(normalize_entities(&doc))
}
