//! Cleanup of free-text fields returned by the service.

use regex::Regex;
use std::sync::OnceLock;

/// Strip the small set of HTML markup the service embeds in free text.
///
/// Replaces `<br>`, `&nbsp;` and raw newlines with single spaces, then
/// removes remaining tags with a non-greedy `<...>` match and trims. This is
/// deliberately not a general HTML sanitizer: no other entities are decoded
/// and malformed or unterminated tags are left exactly as the pattern
/// leaves them.
pub fn clean_html(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    if text.is_empty() {
        return String::new();
    }

    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_RE.get_or_init(|| Regex::new("<[^<]+?>").unwrap());

    let replaced = text
        .replace("<br>", " ")
        .replace("&nbsp;", " ")
        .replace('\n', " ");
    tag_re.replace_all(&replaced, "").trim().to_string()
}

/// Truncate to at most `max_chars` characters and append an ellipsis.
///
/// The ellipsis is appended unconditionally, matching how the tables have
/// always rendered previews. Char-based, so multi-byte text never splits.
pub fn preview(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

/// Render a loosely typed scalar field for display.
///
/// Strings pass through, numbers and booleans format naturally, absent and
/// null values become empty.
pub fn scalar_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_breaks_and_nbsp_with_spaces() {
        assert_eq!(clean_html(Some("Line1<br>Line2&nbsp;end")), "Line1 Line2 end");
    }

    #[test]
    fn strips_tags() {
        assert_eq!(clean_html(Some("<b>Bold</b> text")), "Bold text");
    }

    #[test]
    fn empty_and_absent_input_yield_empty() {
        assert_eq!(clean_html(Some("")), "");
        assert_eq!(clean_html(None), "");
    }

    #[test]
    fn newlines_become_spaces_and_result_is_trimmed() {
        assert_eq!(clean_html(Some("  a\nb  ")), "a b");
    }

    #[test]
    fn unterminated_tag_is_left_alone() {
        // No closing bracket, so the non-greedy pattern never matches.
        assert_eq!(clean_html(Some("before <unclosed after")), "before <unclosed after");
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(preview("Přírodověda", 4), "Přír...");
        assert_eq!(preview("ab", 10), "ab...");
    }

    #[test]
    fn scalar_text_handles_mixed_types() {
        assert_eq!(scalar_text(Some(&serde_json::json!("5"))), "5");
        assert_eq!(scalar_text(Some(&serde_json::json!(5))), "5");
        assert_eq!(scalar_text(Some(&serde_json::Value::Null)), "");
        assert_eq!(scalar_text(None), "");
    }
}
