pub mod markdown;

pub use markdown::render_explanation;

use unicode_width::UnicodeWidthChar;

/// Cuts `s` to at most `max_width` terminal columns, ending in "..." when shortened.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let full_width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if full_width <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

/// Marks an option row the way the screens list them: "1. Paris".
pub fn numbered(index: usize, text: &str) -> String {
    format!("{}. {}", index + 1, text)
}
