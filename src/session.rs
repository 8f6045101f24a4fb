//! Compiled highlight session
//!
//! A session is the product of one configuration: resolved styles plus
//! compiled matchers. It is built synchronously and replaced wholesale on
//! configuration change, never patched field by field, so a scan can
//! never observe a half-updated matcher set.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::Result;
use crate::pattern::{self, normalize_key, CompiledMatcher};
use crate::scan::{self, ScanResult};
use crate::style::{self, StyleSpec};

#[derive(Debug)]
pub struct HighlightSession {
    /// Presentation toggle. Flipping it is the one permitted in-place
    /// mutation; everything compiled stays immutable.
    pub enabled: bool,
    pub case_sensitive: bool,
    matchers: Vec<CompiledMatcher>,
    /// Resolved style per class, in rule order (empty in single-pattern mode)
    styles: Vec<(String, StyleSpec)>,
    style_index: HashMap<String, usize>,
    /// The one style shared by every class in single-pattern mode
    shared_style: Option<StyleSpec>,
}

impl HighlightSession {
    /// Compile a configuration into a session.
    ///
    /// Fails on the first pattern that does not compile; the caller keeps
    /// its previous session active rather than running with a partially
    /// compiled matcher set.
    pub fn build(config: &Config) -> Result<Self> {
        let case_sensitive = config.case_sensitive;
        let free_form = config.keywords_pattern.trim();

        if !free_form.is_empty() {
            let matcher = pattern::compile_pattern(free_form, case_sensitive)?;
            let shared = style::resolve_shared(&style::builtin_style(), &config.default_style);
            return Ok(Self {
                enabled: config.enabled,
                case_sensitive,
                matchers: vec![matcher],
                styles: Vec::new(),
                style_index: HashMap::new(),
                shared_style: Some(shared),
            });
        }

        let styles = style::resolve_styles(
            &style::builtin_style(),
            &config.default_style,
            &config.keywords,
            case_sensitive,
        );

        let mut matchers = Vec::with_capacity(styles.len());
        for (key, _) in &styles {
            matchers.push(pattern::compile_keyword(key, case_sensitive)?);
        }

        let style_index = styles
            .iter()
            .enumerate()
            .map(|(idx, (key, _))| (key.clone(), idx))
            .collect();

        Ok(Self {
            enabled: config.enabled,
            case_sensitive,
            matchers,
            styles,
            style_index,
            shared_style: None,
        })
    }

    /// Whether this session runs one free-form matcher with a shared style
    pub fn is_single_pattern(&self) -> bool {
        self.shared_style.is_some()
    }

    pub fn matchers(&self) -> &[CompiledMatcher] {
        &self.matchers
    }

    /// Known classes in rule order. Empty in single-pattern mode, where
    /// classes are discovered from matched text instead.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|(key, _)| key.as_str())
    }

    /// Resolved style for a class
    pub fn style_for(&self, class: &str) -> Option<&StyleSpec> {
        if let Some(shared) = &self.shared_style {
            return Some(shared);
        }
        self.style_index.get(class).map(|&idx| &self.styles[idx].1)
    }

    /// Scan document text with this session's matchers. Runs even while
    /// disabled; hiding the result is the caller's presentation decision,
    /// which keeps the enable toggle instant.
    pub fn scan(&self, text: &str) -> ScanResult {
        scan::scan(text, &self.matchers)
    }

    /// Matchers restricted to one class. In single-pattern mode the shared
    /// matcher always runs; the caller filters by matched class key.
    pub fn matchers_for(&self, class: &str) -> Vec<&CompiledMatcher> {
        if self.is_single_pattern() {
            return self.matchers.iter().collect();
        }
        let key = normalize_key(class, self.case_sensitive);
        self.matchers
            .iter()
            .filter(|matcher| matcher.class.as_deref() == Some(key.as_str()))
            .collect()
    }
}
