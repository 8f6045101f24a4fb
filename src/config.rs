//! Configuration loading
//!
//! Loads settings from annolight.toml in the working directory, falling
//! back to ~/.annolight.toml (%USERPROFILE%\.annolight.toml on Windows),
//! falling back to builtin defaults.
//!
//! Example:
//! ```text
//! enabled = true
//! case-sensitive = false
//!
//! [default-style]
//! color = "#2196f3"
//! background-color = "#ffeb3b"
//!
//! [[keywords]]
//! text = "TODO:"
//!
//! [[keywords]]
//! text = "REVIEW"
//! background-color = "#98c379"
//! whole-line = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::style::StyleOverrides;

/// A keyword rule: the keyword text (used verbatim as a regex fragment)
/// plus its style overrides
#[derive(Debug, Clone, Default)]
pub struct KeywordRule {
    pub keyword: String,
    pub style: StyleOverrides,
}

impl KeywordRule {
    /// A rule with no style overrides of its own
    pub fn plain(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            style: StyleOverrides::default(),
        }
    }
}

/// The stock keyword list
pub fn default_keywords() -> Vec<KeywordRule> {
    vec![KeywordRule::plain("TODO:"), KeywordRule::plain("FIXME:")]
}

/// Configuration snapshot
///
/// Read once per configuration change; the compiled session is rebuilt
/// from it, never patched in place.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether highlighting is shown (scanning still runs when disabled)
    pub enabled: bool,
    /// Whether keyword matching is case sensitive
    pub case_sensitive: bool,
    /// Global style overrides applied to every class
    pub default_style: StyleOverrides,
    /// Keyword rules (multi-keyword mode)
    pub keywords: Vec<KeywordRule>,
    /// Free-form pattern; non-empty after trimming selects single-pattern
    /// mode, where one shared style applies to every match
    pub keywords_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            case_sensitive: true,
            default_style: StyleOverrides::default(),
            keywords: default_keywords(),
            keywords_pattern: String::new(),
        }
    }
}

impl Config {
    /// Get the home config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".annolight.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".annolight.toml"))
        }
    }

    /// Load configuration, falling back to defaults when no readable
    /// config file exists. An unparseable file is reported and skipped.
    pub fn load() -> Self {
        let mut paths = vec![PathBuf::from("annolight.toml")];
        if let Some(home) = Self::config_path() {
            paths.push(home);
        }

        for path in paths {
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(_) => continue,
            };
            match Self::from_toml(&contents) {
                Ok(config) => return config,
                Err(e) => log::warn!("ignoring {}: {}", path.display(), e),
            }
        }

        Config::default()
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let table: toml::Table = contents.parse()?;
        let mut config = Config::default();
        config.apply(&table);
        Ok(config)
    }

    /// Apply settings from a parsed table onto the defaults
    fn apply(&mut self, table: &toml::Table) {
        if let Some(enabled) = table.get("enabled").and_then(|v| v.as_bool()) {
            self.enabled = enabled;
        }

        if let Some(case_sensitive) = table.get("case-sensitive").and_then(|v| v.as_bool()) {
            self.case_sensitive = case_sensitive;
        }

        if let Some(pattern) = table.get("keywords-pattern").and_then(|v| v.as_str()) {
            self.keywords_pattern = pattern.to_string();
        }

        if let Some(style) = table.get("default-style").and_then(|v| v.as_table()) {
            self.default_style = style_from_table(style);
        }

        if let Some(entries) = table.get("keywords").and_then(|v| v.as_array()) {
            self.keywords = parse_keywords(entries);
        }
    }
}

/// Parse keyword entries; a structurally invalid entry is dropped with a
/// warning rather than failing the whole configuration
fn parse_keywords(entries: &[toml::Value]) -> Vec<KeywordRule> {
    let mut rules = Vec::new();

    for entry in entries {
        match entry {
            toml::Value::String(text) => {
                let text = text.trim();
                if text.is_empty() {
                    log::warn!("dropping keyword rule with empty text");
                    continue;
                }
                rules.push(KeywordRule::plain(text));
            }
            toml::Value::Table(table) => {
                let text = table
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .trim();
                if text.is_empty() {
                    log::warn!("dropping keyword rule without text");
                    continue;
                }
                rules.push(KeywordRule {
                    keyword: text.to_string(),
                    style: style_from_table(table),
                });
            }
            other => {
                log::warn!("dropping keyword rule of type {}", other.type_str());
            }
        }
    }

    rules
}

fn style_from_table(table: &toml::Table) -> StyleOverrides {
    StyleOverrides {
        color: table
            .get("color")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        background_color: table
            .get("background-color")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        overview_ruler_color: table
            .get("overview-ruler-color")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        is_whole_line: table.get("whole-line").and_then(|v| v.as_bool()),
        border: table
            .get("border")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    }
}
