//! Line-oriented view of a markdown document.
//!
//! Rules never see raw text: every line is classified once, with fenced code
//! tracked across lines so that rules can leave code untouched.

/// Block-level classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Text,
    Heading,
    ListItem,
    BlockQuote,
    ThematicBreak,
    FenceOpen,
    FenceClose,
    Code,
}

impl LineKind {
    /// Lines owned by a fenced code block, delimiters included.
    pub fn is_code(self) -> bool {
        matches!(self, LineKind::FenceOpen | LineKind::FenceClose | LineKind::Code)
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub kind: LineKind,
    /// True for list items and the lines that continue them.
    pub in_list: bool,
}

/// List marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    /// Byte offset of the marker.
    pub indent: usize,
    /// `-`, `*` or `+` for bullets, `None` for ordered items.
    pub bullet: Option<char>,
}

#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<Line>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        let line_ending = if source.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = source.ends_with('\n');

        let body = source.strip_suffix('\n').unwrap_or(source);
        let raw: Vec<&str> = if source.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .collect()
        };

        let mut lines = Vec::with_capacity(raw.len());
        let mut fence: Option<(char, usize)> = None;
        let mut prev_in_list = false;
        let mut prev_blank = true;

        for text in raw {
            let kind = match fence {
                Some((ch, len)) => {
                    if is_fence_close(text, ch, len) {
                        fence = None;
                        LineKind::FenceClose
                    } else {
                        LineKind::Code
                    }
                }
                None => {
                    if let Some(open) = fence_open(text) {
                        fence = Some(open);
                        LineKind::FenceOpen
                    } else {
                        match classify(text) {
                            // Four spaces start an item only inside an open list.
                            LineKind::ListItem if !prev_in_list && !starts_item(text) => {
                                LineKind::Text
                            }
                            kind => kind,
                        }
                    }
                }
            };

            let indented = text.starts_with(' ') || text.starts_with('\t');
            let in_list = match kind {
                LineKind::ListItem => true,
                LineKind::Blank => prev_in_list,
                LineKind::Text if prev_in_list && (indented || !prev_blank) => true,
                _ => prev_in_list && indented,
            };

            // A blank line only keeps the list open if the next content is indented.
            prev_in_list = in_list;
            prev_blank = kind == LineKind::Blank;
            lines.push(Line {
                text: text.to_string(),
                kind,
                in_list,
            });
        }

        // Blank lines that end a list do not belong to it.
        let mut next_in_list = false;
        for line in lines.iter_mut().rev() {
            if line.kind == LineKind::Blank {
                line.in_list = line.in_list && next_in_list;
            } else {
                next_in_list = line.in_list;
            }
        }

        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// Kind of the line at `index`, `None` when out of range.
    pub fn kind_at(&self, index: usize) -> Option<LineKind> {
        self.lines.get(index).map(|l| l.kind)
    }

    /// Render replacement lines with this document's line ending and final newline.
    pub fn rebuild(&self, lines: Vec<String>) -> String {
        self.rebuild_with(lines, self.trailing_newline)
    }

    pub fn rebuild_with(&self, lines: Vec<String>, trailing_newline: bool) -> String {
        let mut out = lines.join(self.line_ending);
        if trailing_newline && !lines.is_empty() {
            out.push_str(self.line_ending);
        }
        out
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }
}

/// Number of leading spaces, provided there are at most three.
pub fn block_indent(text: &str) -> Option<usize> {
    let n = text.len() - text.trim_start_matches(' ').len();
    (n <= 3).then_some(n)
}

fn fence_open(text: &str) -> Option<(char, usize)> {
    let indent = block_indent(text)?;
    let rest = &text[indent..];
    let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.len() - rest.trim_start_matches(ch).len();
    if len < 3 {
        return None;
    }
    if ch == '`' && rest[len..].contains('`') {
        return None;
    }
    Some((ch, len))
}

fn is_fence_close(text: &str, ch: char, open_len: usize) -> bool {
    let Some(indent) = block_indent(text) else {
        return false;
    };
    let rest = &text[indent..];
    let len = rest.len() - rest.trim_start_matches(ch).len();
    len >= open_len && rest[len..].trim().is_empty()
}

fn classify(text: &str) -> LineKind {
    if text.trim().is_empty() {
        return LineKind::Blank;
    }
    if is_atx_heading(text) {
        return LineKind::Heading;
    }
    if is_thematic_break(text) {
        return LineKind::ThematicBreak;
    }
    if list_marker(text).is_some() {
        return LineKind::ListItem;
    }
    if block_indent(text).is_some_and(|i| text[i..].starts_with('>')) {
        return LineKind::BlockQuote;
    }
    LineKind::Text
}

/// `#` to `######` followed by whitespace or end of line, indented at most three spaces.
pub fn is_atx_heading(text: &str) -> bool {
    let Some(indent) = block_indent(text) else {
        return false;
    };
    let rest = &text[indent..];
    let hashes = rest.len() - rest.trim_start_matches('#').len();
    (1..=6).contains(&hashes)
        && rest[hashes..]
            .chars()
            .next()
            .is_none_or(|c| c == ' ' || c == '\t')
}

pub fn is_thematic_break(text: &str) -> bool {
    let Some(indent) = block_indent(text) else {
        return false;
    };
    let rest: String = text[indent..].chars().filter(|c| !c.is_whitespace()).collect();
    let Some(first) = rest.chars().next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && rest.len() >= 3 && rest.chars().all(|c| c == first)
}

/// A list item that can open a new list, i.e. indented at most three spaces.
fn starts_item(text: &str) -> bool {
    list_marker(text).is_some_and(|m| m.indent <= 3)
}

pub fn list_marker(text: &str) -> Option<ListMarker> {
    let indent = text.len() - text.trim_start_matches(' ').len();
    let rest = &text[indent..];
    let first = rest.chars().next()?;

    let (bullet, marker_len) = if matches!(first, '-' | '*' | '+') {
        (Some(first), 1)
    } else {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if !(1..=9).contains(&digits) {
            return None;
        }
        match rest[digits..].chars().next() {
            Some('.') | Some(')') => (None, digits + 1),
            _ => return None,
        }
    };

    let after = &rest[marker_len..];
    if after.is_empty() || after.starts_with(' ') || after.starts_with('\t') {
        Some(ListMarker { indent, bullet })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<LineKind> {
        Document::parse(src).lines().iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_classifies_blocks() {
        use LineKind::*;
        let src = "# Title\n\ntext\n- item\n> quote\n***\n";
        assert_eq!(kinds(src), vec![Heading, Blank, Text, ListItem, BlockQuote, ThematicBreak]);
    }

    #[test]
    fn test_fenced_code_is_tracked() {
        use LineKind::*;
        let src = "```rust\n# not a heading\n```\n#real\n";
        assert_eq!(kinds(src), vec![FenceOpen, Code, FenceClose, Text]);
    }

    #[test]
    fn test_tilde_fence_not_closed_by_backticks() {
        use LineKind::*;
        assert_eq!(kinds("~~~\n```\n~~~\n"), vec![FenceOpen, Code, FenceClose]);
    }

    #[test]
    fn test_unclosed_fence_swallows_rest() {
        let doc = Document::parse("```\na\nb");
        assert!(doc.lines().iter().skip(1).all(|l| l.kind == LineKind::Code));
        assert!(!doc.has_trailing_newline());
    }

    #[test]
    fn test_list_continuation_and_end() {
        let doc = Document::parse("- a\n  more\nlazy\n\npara\n");
        let flags: Vec<bool> = doc.lines().iter().map(|l| l.in_list).collect();
        assert_eq!(flags, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_deep_marker_needs_open_list() {
        use LineKind::*;
        assert_eq!(kinds("text\n    * code\n"), vec![Text, Text]);
        assert_eq!(kinds("\n    - code\n"), vec![Blank, Text]);
        assert_eq!(kinds("- a\n    * b\n"), vec![ListItem, ListItem]);
        assert_eq!(kinds("- a\n\n    * b\n"), vec![ListItem, Blank, ListItem]);
    }

    #[test]
    fn test_list_marker_requires_space() {
        assert!(list_marker("- item").is_some());
        assert!(list_marker("12. item").is_some());
        assert!(list_marker("-item").is_none());
        assert!(list_marker("**bold**").is_none());
        assert_eq!(list_marker("  * x").map(|m| m.indent), Some(2));
    }

    #[test]
    fn test_rebuild_preserves_crlf() {
        let doc = Document::parse("a\r\nb\r\n");
        assert_eq!(doc.texts(), vec!["a", "b"]);
        assert_eq!(doc.rebuild(doc.texts()), "a\r\nb\r\n");
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::parse("");
        assert!(doc.is_empty());
        assert_eq!(doc.rebuild(vec![]), "");
    }
}
