// src/core/sanitize.rs

/// Decode the handful of entities the listing pages actually use.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&ndash;", "-")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Shorten page content for a log line, on a char boundary.
pub fn excerpt(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_and_whitespace() {
        assert_eq!(normalize_ws(&normalize_entities("  12&nbsp;July \n 2025 ")), "12 July 2025");
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("åäö", 2), "åä…");
        assert_eq!(excerpt("short", 10), "short");
    }
}
