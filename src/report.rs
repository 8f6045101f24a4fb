//! Annotation report formatting
//!
//! Writes the "list annotations" report: a count header, then one block
//! per record with the source line and a caret under the match column.
//! Column alignment uses display width so wide characters line up.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::annotations::AnnotationRecord;

/// Tab stops are expanded so the caret lines up with the printed text
const TAB: &str = "    ";

pub fn write_report<W: Write>(out: &mut W, records: &[AnnotationRecord]) -> io::Result<()> {
    writeln!(out, "Found {} annotation(s)", records.len())?;

    for (i, record) in records.iter().enumerate() {
        writeln!(out)?;
        writeln!(
            out,
            "#{}  {}:{}:{}  {}",
            i + 1,
            record.source,
            record.line,
            record.column,
            record.keyword
        )?;

        let line = record.line_text.replace('\t', TAB);
        writeln!(out, "    {}", line)?;

        let prefix_end = record.column.saturating_sub(1).min(record.line_text.len());
        let prefix = record.line_text[..prefix_end].replace('\t', TAB);
        writeln!(out, "    {}^", " ".repeat(prefix.width()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line_text: &str, column: usize) -> AnnotationRecord {
        AnnotationRecord {
            source: "src/demo.rs".to_string(),
            line: 3,
            column,
            keyword: "TODO:".to_string(),
            line_text: line_text.to_string(),
        }
    }

    fn render(records: &[AnnotationRecord]) -> String {
        let mut out = Vec::new();
        write_report(&mut out, records).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_count() {
        assert!(render(&[]).starts_with("Found 0 annotation(s)"));
        let printed = render(&[record("// TODO: x", 4)]);
        assert!(printed.starts_with("Found 1 annotation(s)"));
    }

    #[test]
    fn test_record_block() {
        let printed = render(&[record("// TODO: x", 4)]);
        assert!(printed.contains("#1  src/demo.rs:3:4  TODO:"));
        assert!(printed.contains("    // TODO: x"));
        // caret under column 4
        assert!(printed.contains("    "));
        assert!(printed.contains("   ^"));
    }

    #[test]
    fn test_caret_alignment() {
        let printed = render(&[record("ab TODO: x", 4)]);
        let caret_line = printed.lines().last().unwrap();
        // 4 spaces of report indent, then the 3-column prefix "ab "
        assert_eq!(caret_line, format!("    {}^", " ".repeat(3)));
    }

    #[test]
    fn test_tab_expansion() {
        let printed = render(&[record("\tTODO: x", 2)]);
        let mut lines = printed.lines().rev();
        let caret_line = lines.next().unwrap();
        let text_line = lines.next().unwrap();
        assert_eq!(text_line, format!("    {}TODO: x", TAB));
        assert_eq!(caret_line, format!("    {}^", TAB));
    }

    #[test]
    fn test_numbering() {
        let printed = render(&[record("TODO: a", 1), record("TODO: b", 1)]);
        assert!(printed.contains("#1  "));
        assert!(printed.contains("#2  "));
    }
}
