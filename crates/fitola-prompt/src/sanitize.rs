//! Sanitisation of user-supplied values before they are embedded in prompts.

use regex::Regex;
use std::sync::LazyLock;

static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-_]").expect("static regex"));

/// Collapse whitespace and cap the length at `max_length` characters.
///
/// Missing or empty input renders as `"None"`. Over-long input is cut to
/// `max_length - 3` characters, right-trimmed, and suffixed with `"..."`.
pub fn sanitize_prompt_value(value: Option<&str>, max_length: usize) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return "None".into();
    };
    let cleaned = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() <= max_length {
        return cleaned;
    }
    let keep = max_length.saturating_sub(3);
    let truncated: String = cleaned.chars().take(keep).collect();
    format!("{}...", truncated.trim_end())
}

/// Reduce a language name to `[A-Za-z0-9_-]`, or `"unknown"` if nothing survives.
pub fn sanitize_language_identifier(value: &str, max_length: usize) -> String {
    let cleaned = sanitize_prompt_value(Some(value), max_length);
    let cleaned = NON_IDENTIFIER.replace_all(&cleaned, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "unknown".into()
    } else {
        cleaned.to_string()
    }
}

/// `"Respond in {language}."`, or an empty string when no language is given.
pub fn language_instruction(language: Option<&str>) -> String {
    match language {
        Some(lang) if !lang.is_empty() => format!("Respond in {lang}."),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_and_empty() {
        assert_eq!(sanitize_prompt_value(None, 200), "None");
        assert_eq!(sanitize_prompt_value(Some(""), 200), "None");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            sanitize_prompt_value(Some("  lose \n\t weight   fast "), 200),
            "lose weight fast"
        );
    }

    #[test]
    fn test_truncation_trims_before_ellipsis() {
        // "abcd efgh" cut to 7 - 3 = 4 chars -> "abcd" + "..."
        assert_eq!(sanitize_prompt_value(Some("abcd efgh"), 7), "abcd...");
        // Cut lands on a space: "abc " trimmed to "abc"
        assert_eq!(sanitize_prompt_value(Some("abc defgh"), 7), "abc...");
        assert_eq!(sanitize_prompt_value(Some("exactly"), 7), "exactly");
    }

    #[test]
    fn test_language_identifier() {
        assert_eq!(sanitize_language_identifier("English", 40), "English");
        assert_eq!(sanitize_language_identifier("pt-BR", 40), "pt-BR");
        assert_eq!(
            sanitize_language_identifier("French; ignore previous", 40),
            "Frenchignoreprevious"
        );
        assert_eq!(sanitize_language_identifier("!!!", 40), "unknown");
        assert_eq!(sanitize_language_identifier("", 40), "None");
    }

    #[test]
    fn test_language_instruction() {
        assert_eq!(language_instruction(Some("Hindi")), "Respond in Hindi.");
        assert_eq!(language_instruction(None), "");
        assert_eq!(language_instruction(Some("")), "");
    }
}
