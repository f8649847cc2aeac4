//! Pure utility functions for content manipulation
//!
//! These functions contain NO side effects - they take inputs and return outputs
//! without touching session storage or the transport.

/// Shorten a caption for listings.
///
/// Counts characters, not bytes, so CJK text is never split mid-codepoint.
/// Text longer than `max_chars` keeps its first `max_chars` characters and
/// gets "..." appended; shorter text is returned unchanged.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_preview_short_text() {
        assert_eq!(truncate_preview("名称：测试", 100), "名称：测试");
    }

    #[test]
    fn test_truncate_preview_counts_chars_not_bytes() {
        let long = "网".repeat(120);
        let preview = truncate_preview(&long, 100);

        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 103);
    }

    #[test]
    fn test_truncate_preview_exact_length() {
        let exact = "a".repeat(100);
        let preview = truncate_preview(&exact, 100);
        assert_eq!(preview, exact); // Shouldn't truncate if exactly at limit
    }
}
