//! Text helpers shared by the renderer and the resolver.

use once_cell::sync::Lazy;
use regex::Regex;

/// Five or more consecutive newlines
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{5,}").unwrap());

/// Collapse runs of whitespace to a single space
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Clean an attribute value (trim and handle empty)
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Make rendered cell content safe inside a single table row
pub fn escape_table_cell(content: &str) -> String {
    content.replace('|', "\\|").replace('\n', " ")
}

/// Remove every backtick so code block content cannot close its fence
pub fn strip_backticks(content: &str) -> String {
    content.replace('`', "")
}

/// Whether an href is a `javascript:` pseudo-URL
pub fn is_script_url(href: &str) -> bool {
    let href = href.trim_start();
    href.get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

/// Final whitespace pass over a complete document.
///
/// Caps blank lines at two (five or more newlines become four), drops leading
/// whitespace and leaves exactly one trailing newline. Blank input yields an
/// empty string. Running it on its own output changes nothing.
pub fn normalize_markdown(markdown: &str) -> String {
    let capped = EXCESS_NEWLINES.replace_all(markdown, "\n\n\n\n");
    let trimmed = capped.trim();

    if trimmed.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(trimmed.len() + 1);
    result.push_str(trimmed);
    result.push('\n');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("\u{a0}\u{a0}x"), " x");
        assert_eq!(collapse_whitespace("plain"), "plain");
    }

    #[test]
    fn test_escape_table_cell() {
        assert_eq!(escape_table_cell("|a|b|"), "\\|a\\|b\\|");
        assert_eq!(escape_table_cell("one\ntwo"), "one two");
    }

    #[test]
    fn test_strip_backticks() {
        assert_eq!(strip_backticks("a`b``c"), "abc");
    }

    #[test]
    fn test_is_script_url() {
        assert!(is_script_url("javascript:evil()"));
        assert!(is_script_url("  JavaScript:void(0)"));
        assert!(!is_script_url("https://example.com/javascript:"));
        assert!(!is_script_url("java"));
    }

    #[test]
    fn test_normalize_caps_blank_lines() {
        assert_eq!(normalize_markdown("a\n\n\n\n\n\n\nb"), "a\n\n\n\nb\n");
        assert_eq!(normalize_markdown("a\n\n\n\nb"), "a\n\n\n\nb\n");
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_markdown("\n\n  text \n\n\n"), "text\n");
        assert_eq!(normalize_markdown(" \n\t"), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(input in "[a-c #*\n\t]{0,60}") {
            let once = normalize_markdown(&input);
            prop_assert_eq!(normalize_markdown(&once), once.clone());
            prop_assert!(!once.contains("\n\n\n\n\n"));
        }
    }
}
