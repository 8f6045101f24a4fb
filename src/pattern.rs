//! Pattern compilation for annotation matching
//!
//! Keyword rules compile to one matcher per keyword class; a free-form
//! pattern compiles to a single shared matcher. Keyword text is used
//! verbatim as a regex fragment, so a keyword may itself be a small regex.

use regex::{Regex, RegexBuilder};

use crate::error::{HighlightError, Result};

/// Normalize a keyword into its class key.
///
/// Class identity is case-insensitive when the global flag says so,
/// realized by upper-casing the keyword text ("todo" and "TODO" collapse
/// to one class).
pub fn normalize_key(keyword: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        keyword.to_string()
    } else {
        keyword.to_uppercase()
    }
}

/// A compiled annotation matcher
#[derive(Debug)]
pub struct CompiledMatcher {
    /// Pattern text this matcher was compiled from
    pub source: String,
    /// Compiled regex
    pub regex: Regex,
    /// Whether matching is case sensitive
    pub case_sensitive: bool,
    /// Owning style class. None for the shared free-form matcher, whose
    /// class keys are derived from the matched text instead.
    pub class: Option<String>,
}

fn build_regex(pattern: &str, case_sensitive: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|source| HighlightError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Compile the matcher for one keyword class
pub fn compile_keyword(class_key: &str, case_sensitive: bool) -> Result<CompiledMatcher> {
    Ok(CompiledMatcher {
        source: class_key.to_string(),
        regex: build_regex(class_key, case_sensitive)?,
        case_sensitive,
        class: Some(class_key.to_string()),
    })
}

/// Compile the single free-form matcher
pub fn compile_pattern(pattern: &str, case_sensitive: bool) -> Result<CompiledMatcher> {
    Ok(CompiledMatcher {
        source: pattern.to_string(),
        regex: build_regex(pattern, case_sensitive)?,
        case_sensitive,
        class: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("ToDo:", true), "ToDo:");
        assert_eq!(normalize_key("ToDo:", false), "TODO:");
        assert_eq!(normalize_key("FIXME", false), "FIXME");
    }

    #[test]
    fn test_compile_keyword_case_insensitive() {
        let matcher = compile_keyword("TODO:", false).unwrap();
        assert!(matcher.regex.is_match("// todo: fix"));
        assert!(matcher.regex.is_match("// TODO: fix"));
        assert_eq!(matcher.class.as_deref(), Some("TODO:"));
    }

    #[test]
    fn test_compile_keyword_case_sensitive() {
        let matcher = compile_keyword("TODO:", true).unwrap();
        assert!(matcher.regex.is_match("// TODO: fix"));
        assert!(!matcher.regex.is_match("// todo: fix"));
    }

    #[test]
    fn test_compile_keyword_is_regex_fragment() {
        let matcher = compile_keyword(r"HACK\d+", true).unwrap();
        assert!(matcher.regex.is_match("HACK42"));
        assert!(!matcher.regex.is_match("HACK"));
    }

    #[test]
    fn test_compile_multiline_anchor() {
        let matcher = compile_keyword("TODO$", true).unwrap();
        assert!(matcher.regex.is_match("one TODO\ntwo"));
    }

    #[test]
    fn test_compile_pattern_has_no_class() {
        let matcher = compile_pattern("TODO|FIXME", true).unwrap();
        assert!(matcher.class.is_none());
        assert!(matcher.regex.is_match("a FIXME b"));
    }

    #[test]
    fn test_compile_error_names_pattern() {
        let err = compile_pattern("(unclosed", true).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }
}
