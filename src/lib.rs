//! annolight - configurable annotation keyword highlighting
//!
//! Scans text buffers for annotation keywords (TODO, FIXME, custom rules
//! or a single free-form pattern) and computes, per keyword class, the
//! styled ranges a renderer should display, re-deriving them on change
//! events through a debounced scheduler.
//!
//! The engine never draws: hosts implement [`Renderer`] and pump
//! [`HighlightManager`] from their event loop. [`find_all`] reuses the
//! same matchers for "list annotations" style reports.

pub mod annotations;
pub mod config;
pub mod error;
pub mod manager;
pub mod pattern;
pub mod render;
pub mod report;
pub mod scan;
pub mod schedule;
pub mod session;
pub mod style;

pub use annotations::{find_all, AnnotationRecord, Document, KeywordFilter};
pub use config::{Config, KeywordRule};
pub use error::{HighlightError, Result};
pub use manager::HighlightManager;
pub use pattern::{normalize_key, CompiledMatcher};
pub use render::{AnsiRenderer, DecorationId, Renderer};
pub use scan::{scan, ClassMatches, LineIndex, LineRange, Position, ScanResult, Span};
pub use schedule::{DebounceScheduler, DEFAULT_DEBOUNCE};
pub use session::HighlightSession;
pub use style::{resolve_styles, StyleOverrides, StyleSpec};
