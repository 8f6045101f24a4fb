//! Annotation indexing for reports
//!
//! Reuses the scan engine without styling to turn matches into structured
//! records (source, line, column, keyword, line text) for the report sink.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::pattern::normalize_key;
use crate::scan::{self, LineIndex};
use crate::session::HighlightSession;

/// A named text buffer to index
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a document from disk
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            name: path.display().to_string(),
            text,
        })
    }
}

/// One annotation occurrence, positioned for display (1-based line and
/// byte column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub source: String,
    pub line: usize,
    pub column: usize,
    pub keyword: String,
    /// The full line containing the match, trailing carriage return trimmed
    pub line_text: String,
}

/// Restricts a report to one keyword class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordFilter {
    All,
    Class(String),
}

/// Collect annotation records across documents.
///
/// Ordering: document order, then matcher order, then match order within
/// a matcher. With a class filter, only that class's matcher runs in
/// keyword mode; in single-pattern mode the shared matcher runs and the
/// records are filtered by their derived class key.
pub fn find_all(
    documents: &[Document],
    session: &HighlightSession,
    filter: &KeywordFilter,
) -> Vec<AnnotationRecord> {
    let mut records = Vec::new();

    for document in documents {
        let result = match filter {
            KeywordFilter::All => session.scan(&document.text),
            KeywordFilter::Class(class) => {
                scan::scan(&document.text, session.matchers_for(class))
            }
        };

        let index = LineIndex::new(&document.text);
        for class in result.classes() {
            if let KeywordFilter::Class(wanted) = filter {
                if class.key != normalize_key(wanted, session.case_sensitive) {
                    continue;
                }
            }
            for span in &class.ranges {
                let position = index.position(span.start);
                records.push(AnnotationRecord {
                    source: document.name.clone(),
                    line: position.line + 1,
                    column: position.column + 1,
                    keyword: class.key.clone(),
                    line_text: index
                        .line_text(&document.text, position.line)
                        .unwrap_or("")
                        .to_string(),
                });
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, KeywordRule};

    fn session(keywords: &[&str], case_sensitive: bool) -> HighlightSession {
        let config = Config {
            case_sensitive,
            keywords: keywords.iter().map(|k| KeywordRule::plain(k)).collect(),
            ..Config::default()
        };
        HighlightSession::build(&config).unwrap()
    }

    #[test]
    fn test_end_to_end_report() {
        let session = session(&["TODO", "FIXME"], false);
        let documents = vec![Document::new("demo.rs", "// TODO: x\n// fixme here\n")];
        let records = find_all(&documents, &session, &KeywordFilter::All);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].keyword, "TODO");
        assert_eq!(records[0].line, 1);
        assert_eq!(records[0].column, 4);
        assert_eq!(records[0].line_text, "// TODO: x");
        assert_eq!(records[1].keyword, "FIXME");
        assert_eq!(records[1].line, 2);
        assert_eq!(records[1].line_text, "// fixme here");
    }

    #[test]
    fn test_class_filter() {
        let session = session(&["TODO", "FIXME"], false);
        let documents = vec![Document::new("demo.rs", "TODO fixme TODO")];
        let records = find_all(&documents, &session, &KeywordFilter::Class("fixme".to_string()));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keyword, "FIXME");
    }

    #[test]
    fn test_class_filter_single_pattern_mode() {
        let config = Config {
            case_sensitive: false,
            keywords_pattern: "TODO|FIXME".to_string(),
            ..Config::default()
        };
        let session = HighlightSession::build(&config).unwrap();
        let documents = vec![Document::new("demo.rs", "todo fixme todo")];

        let all = find_all(&documents, &session, &KeywordFilter::All);
        assert_eq!(all.len(), 3);

        let filtered = find_all(&documents, &session, &KeywordFilter::Class("todo".to_string()));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|record| record.keyword == "TODO"));
    }

    #[test]
    fn test_document_order() {
        let session = session(&["TODO"], true);
        let documents = vec![
            Document::new("b.rs", "TODO"),
            Document::new("a.rs", "TODO"),
        ];
        let records = find_all(&documents, &session, &KeywordFilter::All);
        assert_eq!(records[0].source, "b.rs");
        assert_eq!(records[1].source, "a.rs");
    }

    #[test]
    fn test_no_matches() {
        let session = session(&["TODO"], true);
        let documents = vec![Document::new("a.rs", "nothing here")];
        assert!(find_all(&documents, &session, &KeywordFilter::All).is_empty());
    }
}
