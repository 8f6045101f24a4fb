//! Style specifications for annotation classes
//!
//! A class's visual style resolves through three layers, right-most wins,
//! shallow merge: builtin base, global user default, per-keyword overrides.
//! The stock keywords (TODO:, FIXME:) carry signature styles that sit
//! between the user default and the per-keyword overrides.

use std::collections::HashMap;

use crate::config::KeywordRule;
use crate::pattern::normalize_key;

/// Partial style: unset fields fall through to the layer beneath
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleOverrides {
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub overview_ruler_color: Option<String>,
    pub is_whole_line: Option<bool>,
    pub border: Option<String>,
}

/// A fully-resolved visual style for one keyword class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpec {
    pub color: String,
    pub background_color: String,
    /// Falls back to the background color when no layer sets it
    pub overview_ruler_color: String,
    pub is_whole_line: bool,
    pub border: Option<String>,
}

impl StyleSpec {
    /// Overlay a layer of overrides; set fields win
    fn apply(&mut self, overrides: &StyleOverrides) {
        if let Some(color) = &overrides.color {
            self.color = color.clone();
        }
        if let Some(background) = &overrides.background_color {
            self.background_color = background.clone();
        }
        if let Some(ruler) = &overrides.overview_ruler_color {
            self.overview_ruler_color = ruler.clone();
        }
        if let Some(whole_line) = overrides.is_whole_line {
            self.is_whole_line = whole_line;
        }
        if let Some(border) = &overrides.border {
            self.border = Some(border.clone());
        }
    }

    fn fill_ruler_color(&mut self) {
        if self.overview_ruler_color.is_empty() {
            self.overview_ruler_color = self.background_color.clone();
        }
    }
}

/// Builtin base style every class starts from
pub fn builtin_style() -> StyleSpec {
    StyleSpec {
        color: "#2196f3".to_string(),
        background_color: "#ffeb3b".to_string(),
        overview_ruler_color: String::new(),
        is_whole_line: false,
        border: None,
    }
}

/// Signature styles for the stock keyword classes
fn stock_keyword_style(class_key: &str) -> Option<StyleOverrides> {
    match class_key {
        "TODO:" => Some(StyleOverrides {
            color: Some("#fff".to_string()),
            background_color: Some("#ffbd2a".to_string()),
            overview_ruler_color: Some("rgba(255,189,42,0.8)".to_string()),
            ..Default::default()
        }),
        "FIXME:" => Some(StyleOverrides {
            color: Some("#fff".to_string()),
            background_color: Some("#f06292".to_string()),
            overview_ruler_color: Some("rgba(240,98,146,0.8)".to_string()),
            ..Default::default()
        }),
        _ => None,
    }
}

/// Resolve one style per keyword class, in rule order.
///
/// Rules with the same normalized key de-duplicate later-wins; the first
/// occurrence keeps its position. Keywords empty after trimming are skipped.
pub fn resolve_styles(
    builtin: &StyleSpec,
    user_default: &StyleOverrides,
    rules: &[KeywordRule],
    case_sensitive: bool,
) -> Vec<(String, StyleSpec)> {
    let mut order: Vec<String> = Vec::new();
    let mut resolved: HashMap<String, StyleSpec> = HashMap::new();

    for rule in rules {
        let keyword = rule.keyword.trim();
        if keyword.is_empty() {
            continue;
        }
        let key = normalize_key(keyword, case_sensitive);

        let mut spec = builtin.clone();
        spec.apply(user_default);
        if let Some(signature) = stock_keyword_style(&key) {
            spec.apply(&signature);
        }
        spec.apply(&rule.style);
        spec.fill_ruler_color();

        if !resolved.contains_key(&key) {
            order.push(key.clone());
        }
        resolved.insert(key, spec);
    }

    order
        .into_iter()
        .map(|key| {
            let spec = resolved.remove(&key).unwrap_or_else(|| builtin.clone());
            (key, spec)
        })
        .collect()
}

/// The one style shared by every match in single-pattern mode
pub fn resolve_shared(builtin: &StyleSpec, user_default: &StyleOverrides) -> StyleSpec {
    let mut spec = builtin.clone();
    spec.apply(user_default);
    spec.fill_ruler_color();
    spec
}
