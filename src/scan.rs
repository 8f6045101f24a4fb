//! Match scanning over buffer text
//!
//! Runs compiled matchers against a document and groups the resulting
//! ranges by style class. Offsets are byte offsets into the scanned text;
//! translation to line/column positions goes through [`LineIndex`].

use std::collections::HashMap;

use crate::pattern::{normalize_key, CompiledMatcher};

/// A matched byte range (start inclusive, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Zero-based line and byte column within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A span translated to start/end positions for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: Position,
    pub end: Position,
}

/// Precomputed line starts for offset -> position translation
///
/// Translation is a pure function of the text: the line is the number of
/// newlines before the offset, the column is the distance from the last
/// line start.
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Translate a byte offset to a position. Offsets past the end clamp
    /// to the end of the text.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position {
            line,
            column: offset - self.line_starts[line],
        }
    }

    pub fn line_range(&self, span: Span) -> LineRange {
        LineRange {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }

    /// Byte span of a line, excluding its terminating newline
    fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line)?;
        let end = match self.line_starts.get(line + 1) {
            Some(&next) => next - 1,
            None => self.len,
        };
        Some((start, end))
    }

    /// The text of a line, with any trailing carriage return trimmed
    pub fn line_text<'a>(&self, text: &'a str, line: usize) -> Option<&'a str> {
        let (start, end) = self.line_span(line)?;
        Some(text[start..end].trim_end_matches('\r'))
    }
}

/// Matches grouped under one style class
#[derive(Debug, Clone)]
pub struct ClassMatches {
    pub key: String,
    pub ranges: Vec<Span>,
}

/// Result of scanning a document: ordered match ranges per style class.
///
/// Classes appear in matcher order, then in discovery order; ranges within
/// a class appear in match order. The same input always yields the same
/// result.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    classes: Vec<ClassMatches>,
    index: HashMap<String, usize>,
}

impl ScanResult {
    fn push(&mut self, key: &str, span: Span) {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.classes.push(ClassMatches {
                    key: key.to_string(),
                    ranges: Vec::new(),
                });
                let idx = self.classes.len() - 1;
                self.index.insert(key.to_string(), idx);
                idx
            }
        };
        self.classes[idx].ranges.push(span);
    }

    pub fn classes(&self) -> &[ClassMatches] {
        &self.classes
    }

    /// Ranges for a class; empty if the class matched nothing
    pub fn ranges(&self, key: &str) -> &[Span] {
        match self.index.get(key) {
            Some(&idx) => &self.classes[idx].ranges,
            None => &[],
        }
    }

    /// Total match count across all classes
    pub fn total(&self) -> usize {
        self.classes.iter().map(|class| class.ranges.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.iter().all(|class| class.ranges.is_empty())
    }
}

/// Scan text with a set of compiled matchers.
///
/// Each matcher finds all non-overlapping occurrences left to right.
/// Zero-length matches are skipped so patterns like `a*` cannot stall the
/// scan or produce empty decorations.
pub fn scan<'a, I>(text: &str, matchers: I) -> ScanResult
where
    I: IntoIterator<Item = &'a CompiledMatcher>,
{
    let mut result = ScanResult::default();
    for matcher in matchers {
        for found in matcher.regex.find_iter(text) {
            if found.start() == found.end() {
                continue;
            }
            let span = Span::new(found.start(), found.end());
            match &matcher.class {
                Some(key) => result.push(key, span),
                None => {
                    let key = normalize_key(found.as_str(), matcher.case_sensitive);
                    result.push(&key, span);
                }
            }
        }
    }
    result
}
