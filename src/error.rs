//! Error types for annolight

use thiserror::Error;

/// Result type alias for annolight operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighting error types
#[derive(Error, Debug)]
pub enum HighlightError {
    /// A keyword or free-form pattern failed to compile. The message names
    /// the offending pattern so the user can find it in their settings.
    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("configuration syntax error: {0}")]
    ConfigSyntax(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_names_pattern() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = HighlightError::Pattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().contains("`(`"));
    }
}
