//! Renderer boundary
//!
//! The engine never draws. It hands the renderer one resolved style per
//! class (to create a rendering handle) and a set of ranges per handle on
//! every scan; an empty range set means "clear this class".
//!
//! [`AnsiRenderer`] is the terminal implementation used by the CLI.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::scan::LineRange;
use crate::style::StyleSpec;

/// Opaque handle to one rendered decoration class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationId(pub u64);

/// Output boundary the engine pushes styled ranges through
pub trait Renderer {
    /// Create a rendering handle for a style class
    fn create_decoration(&mut self, style: &StyleSpec) -> DecorationId;
    /// Apply ranges to a handle, replacing whatever it showed before.
    /// An empty slice clears the class.
    fn apply_decorations(&mut self, id: DecorationId, ranges: &[LineRange]);
    /// Release a handle
    fn remove_decoration(&mut self, id: DecorationId);
}

/// Parse a CSS-style color string: `#rgb`, `#rrggbb`, `rgb(...)`,
/// `rgba(...)` (alpha ignored), or a handful of color names
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        return match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Color::Rgb {
                    r: r * 17,
                    g: g * 17,
                    b: b * 17,
                })
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::Rgb { r, g, b })
            }
            _ => None,
        };
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
    {
        let args = args.strip_suffix(')')?;
        let mut parts = args.split(',').map(str::trim);
        let r = parts.next()?.parse().ok()?;
        let g = parts.next()?.parse().ok()?;
        let b = parts.next()?.parse().ok()?;
        return Some(Color::Rgb { r, g, b });
    }

    match value.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "yellow" => Some(Color::Yellow),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "grey" | "gray" => Some(Color::Grey),
        _ => None,
    }
}

/// Terminal renderer: collects applied ranges and writes the highlighted
/// lines of a document to any writer
pub struct AnsiRenderer {
    next_id: u64,
    styles: HashMap<DecorationId, StyleSpec>,
    applied: BTreeMap<DecorationId, Vec<LineRange>>,
}

impl AnsiRenderer {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            styles: HashMap::new(),
            applied: BTreeMap::new(),
        }
    }

    /// Write every line that carries at least one decoration, match
    /// segments colored per their class style
    pub fn write_highlighted<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        let lines: Vec<&str> = text.split('\n').collect();

        // gather per-line segments, clipping multi-line ranges
        let mut by_line: BTreeMap<usize, Vec<(usize, usize, DecorationId)>> = BTreeMap::new();
        for (&id, ranges) in &self.applied {
            for range in ranges {
                for line in range.start.line..=range.end.line {
                    let line_len = lines
                        .get(line)
                        .map_or(0, |l| l.trim_end_matches('\r').len());
                    let start = if line == range.start.line {
                        range.start.column
                    } else {
                        0
                    };
                    let end = if line == range.end.line {
                        range.end.column
                    } else {
                        line_len
                    };
                    by_line.entry(line).or_default().push((start, end, id));
                }
            }
        }

        for (line_no, mut segments) in by_line {
            let line = lines
                .get(line_no)
                .map_or("", |l| l.trim_end_matches('\r'));
            segments.sort_by_key(|&(start, _, _)| start);

            queue!(out, Print(format!("{:>5} | ", line_no + 1)))?;

            let whole_line = segments.iter().find_map(|(_, _, id)| {
                let style = self.styles.get(id)?;
                style.is_whole_line.then_some(style)
            });
            if let Some(style) = whole_line {
                self.queue_colors(out, style)?;
                queue!(out, Print(line), ResetColor, Print("\n"))?;
                continue;
            }

            let mut cursor = 0;
            for (start, end, id) in segments {
                let start = start.min(line.len());
                let end = end.min(line.len());
                if end <= start || start < cursor {
                    continue;
                }
                let Some(style) = self.styles.get(&id) else {
                    continue;
                };
                queue!(out, Print(&line[cursor..start]))?;
                self.queue_colors(out, style)?;
                queue!(out, Print(&line[start..end]), ResetColor)?;
                cursor = end;
            }
            queue!(out, Print(&line[cursor..]), Print("\n"))?;
        }

        out.flush()
    }

    fn queue_colors<W: Write>(&self, out: &mut W, style: &StyleSpec) -> io::Result<()> {
        if let Some(color) = parse_color(&style.background_color) {
            queue!(out, SetBackgroundColor(color))?;
        }
        if let Some(color) = parse_color(&style.color) {
            queue!(out, SetForegroundColor(color))?;
        }
        Ok(())
    }
}

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AnsiRenderer {
    fn create_decoration(&mut self, style: &StyleSpec) -> DecorationId {
        self.next_id += 1;
        let id = DecorationId(self.next_id);
        self.styles.insert(id, style.clone());
        id
    }

    fn apply_decorations(&mut self, id: DecorationId, ranges: &[LineRange]) {
        self.applied.insert(id, ranges.to_vec());
    }

    fn remove_decoration(&mut self, id: DecorationId) {
        self.styles.remove(&id);
        self.applied.remove(&id);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records every renderer call for assertions
    #[derive(Default)]
    pub(crate) struct RecordingRenderer {
        next_id: u64,
        pub created: Vec<(DecorationId, StyleSpec)>,
        pub applied: Vec<(DecorationId, Vec<LineRange>)>,
        pub removed: Vec<DecorationId>,
    }

    impl RecordingRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// The most recent ranges applied to a handle
        pub fn ranges_for(&self, id: DecorationId) -> Option<&[LineRange]> {
            self.applied
                .iter()
                .rev()
                .find(|(applied_id, _)| *applied_id == id)
                .map(|(_, ranges)| ranges.as_slice())
        }

        pub fn apply_calls(&self) -> usize {
            self.applied.len()
        }
    }

    impl Renderer for RecordingRenderer {
        fn create_decoration(&mut self, style: &StyleSpec) -> DecorationId {
            self.next_id += 1;
            let id = DecorationId(self.next_id);
            self.created.push((id, style.clone()));
            id
        }

        fn apply_decorations(&mut self, id: DecorationId, ranges: &[LineRange]) {
            self.applied.push((id, ranges.to_vec()));
        }

        fn remove_decoration(&mut self, id: DecorationId) {
            self.removed.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Position;

    fn style(color: &str, background: &str) -> StyleSpec {
        StyleSpec {
            color: color.to_string(),
            background_color: background.to_string(),
            overview_ruler_color: background.to_string(),
            is_whole_line: false,
            border: None,
        }
    }

    fn range(line: usize, start: usize, end: usize) -> LineRange {
        LineRange {
            start: Position {
                line,
                column: start,
            },
            end: Position { line, column: end },
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(
            parse_color("#fff"),
            Some(Color::Rgb {
                r: 255,
                g: 255,
                b: 255
            })
        );
        assert_eq!(
            parse_color("#2196f3"),
            Some(Color::Rgb {
                r: 0x21,
                g: 0x96,
                b: 0xf3
            })
        );
        assert_eq!(
            parse_color("rgba(255,189,42,0.8)"),
            Some(Color::Rgb {
                r: 255,
                g: 189,
                b: 42
            })
        );
        assert_eq!(
            parse_color("rgb(1, 2, 3)"),
            Some(Color::Rgb { r: 1, g: 2, b: 3 })
        );
        assert_eq!(parse_color("white"), Some(Color::White));
        assert_eq!(parse_color("not-a-color"), None);
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut renderer = AnsiRenderer::new();
        let a = renderer.create_decoration(&style("#fff", "#000"));
        let b = renderer.create_decoration(&style("#fff", "#000"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_write_highlighted() {
        let mut renderer = AnsiRenderer::new();
        let id = renderer.create_decoration(&style("#fff", "#ffbd2a"));
        renderer.apply_decorations(id, &[range(0, 3, 8)]);

        let mut out = Vec::new();
        renderer
            .write_highlighted(&mut out, "// TODO: x\nplain line\n")
            .unwrap();
        let printed = String::from_utf8(out).unwrap();

        // only the decorated line is shown, with its number
        assert!(printed.contains("1 | "));
        assert!(printed.contains("TODO:"));
        assert!(!printed.contains("plain line"));
        // color escapes made it out
        assert!(printed.contains('\u{1b}'));
    }

    #[test]
    fn test_empty_ranges_clear_line() {
        let mut renderer = AnsiRenderer::new();
        let id = renderer.create_decoration(&style("#fff", "#ffbd2a"));
        renderer.apply_decorations(id, &[range(0, 0, 4)]);
        renderer.apply_decorations(id, &[]);

        let mut out = Vec::new();
        renderer.write_highlighted(&mut out, "TODO x\n").unwrap();
        assert!(String::from_utf8(out).unwrap().is_empty());
    }

    #[test]
    fn test_remove_decoration() {
        let mut renderer = AnsiRenderer::new();
        let id = renderer.create_decoration(&style("#fff", "#ffbd2a"));
        renderer.apply_decorations(id, &[range(0, 0, 4)]);
        renderer.remove_decoration(id);

        let mut out = Vec::new();
        renderer.write_highlighted(&mut out, "TODO x\n").unwrap();
        assert!(String::from_utf8(out).unwrap().is_empty());
    }

    #[test]
    fn test_whole_line_style() {
        let mut renderer = AnsiRenderer::new();
        let whole = StyleSpec {
            is_whole_line: true,
            ..style("#fff", "#f06292")
        };
        let id = renderer.create_decoration(&whole);
        renderer.apply_decorations(id, &[range(0, 0, 5)]);

        let mut out = Vec::new();
        renderer
            .write_highlighted(&mut out, "FIXME the rest of the line\n")
            .unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("the rest of the line"));
    }
}
