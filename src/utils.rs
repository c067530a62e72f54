//! Text normalization helpers shared by extractors, loaders, and reports.

use crate::types::Term;

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_inline_whitespace<T: AsRef<str>>(text: T) -> String {
    let mut normalized = String::new();
    let mut seen_space = false;
    for ch in text.as_ref().chars() {
        if ch.is_whitespace() {
            if !seen_space {
                normalized.push(' ');
                seen_space = true;
            }
        } else {
            normalized.push(ch);
            seen_space = false;
        }
    }
    normalized.trim().to_string()
}

/// Trim and lowercase a raw tag name; `None` when nothing is left.
pub fn normalize_term(raw: &str) -> Option<Term> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Shorten `text` to at most `max_chars` characters for tabular display.
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    let normalized = normalize_inline_whitespace(text);
    if normalized.chars().count() <= max_chars {
        return normalized;
    }
    let keep = max_chars.saturating_sub(3);
    let mut shortened: String = normalized.chars().take(keep).collect();
    shortened.push_str("...");
    shortened
}
