//! Lint rules with automatic fixes.
//!
//! Rule identifiers and names follow the markdownlint catalogue so that
//! reports read the same as other markdown linters.

use super::document::{block_indent, list_marker, Document, LineKind};
use super::Violation;

/// A single lint rule that can also repair what it reports.
pub trait Rule: Send + Sync {
    /// Stable identifier, e.g. `MD009`.
    fn id(&self) -> &'static str;

    /// Human-readable alias, e.g. `no-trailing-spaces`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn check(&self, doc: &Document) -> Vec<Violation>;

    /// Rewrite the document so that `check` no longer reports anything.
    fn fix(&self, doc: &Document) -> String;

    fn violation(&self, index: usize, message: impl Into<String>) -> Violation
    where
        Self: Sized,
    {
        Violation {
            rule_id: self.id(),
            rule_name: self.name(),
            line: index + 1,
            message: message.into(),
        }
    }
}

/// Every rule, in the order the fixer applies them.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoHardTabs),
        Box::new(NoTrailingSpaces),
        Box::new(NoMissingSpaceAtx),
        Box::new(NoMultipleSpaceAtx),
        Box::new(HeadingStartLeft),
        Box::new(NoMultipleSpaceBlockquote),
        Box::new(UlStyle),
        Box::new(BlanksAroundHeadings),
        Box::new(BlanksAroundFences),
        Box::new(BlanksAroundLists),
        Box::new(NoMultipleBlanks),
        Box::new(SingleTrailingNewline),
    ]
}

fn is_blank_at(doc: &Document, index: usize) -> bool {
    doc.kind_at(index) == Some(LineKind::Blank)
}

/// Insert a blank line before and/or after the lines matched by `needs`.
fn insert_blanks(doc: &Document, needs: impl Fn(usize) -> (bool, bool)) -> String {
    let mut out = Vec::with_capacity(doc.len() + 4);
    for (i, line) in doc.lines().iter().enumerate() {
        let (before, after) = needs(i);
        if before && out.last().is_some_and(|l: &String| !l.trim().is_empty()) {
            out.push(String::new());
        }
        out.push(line.text.clone());
        if after {
            out.push(String::new());
        }
    }
    doc.rebuild(out)
}

fn map_lines(doc: &Document, f: impl Fn(usize, &str) -> Option<String>) -> String {
    let lines = doc
        .lines()
        .iter()
        .enumerate()
        .map(|(i, l)| f(i, &l.text).unwrap_or_else(|| l.text.clone()))
        .collect();
    doc.rebuild(lines)
}

// ============= MD004 =============

/// Bullet markers must be consistent with the first bullet in the document.
pub struct UlStyle;

impl UlStyle {
    fn expected(doc: &Document) -> Option<char> {
        doc.lines()
            .iter()
            .filter(|l| l.kind == LineKind::ListItem)
            .find_map(|l| list_marker(&l.text).and_then(|m| m.bullet))
    }

    fn offender(doc: &Document, index: usize, expected: char) -> Option<(usize, char)> {
        let line = &doc.lines()[index];
        if line.kind != LineKind::ListItem {
            return None;
        }
        let marker = list_marker(&line.text)?;
        marker
            .bullet
            .filter(|b| *b != expected)
            .map(|b| (marker.indent, b))
    }
}

impl Rule for UlStyle {
    fn id(&self) -> &'static str {
        "MD004"
    }

    fn name(&self) -> &'static str {
        "ul-style"
    }

    fn description(&self) -> &'static str {
        "Unordered list style"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        let Some(expected) = Self::expected(doc) else {
            return vec![];
        };
        (0..doc.len())
            .filter_map(|i| {
                Self::offender(doc, i, expected).map(|(_, found)| {
                    self.violation(i, format!("Expected '{}', found '{}'", expected, found))
                })
            })
            .collect()
    }

    fn fix(&self, doc: &Document) -> String {
        let Some(expected) = Self::expected(doc) else {
            return doc.rebuild(doc.texts());
        };
        map_lines(doc, |i, text| {
            Self::offender(doc, i, expected).map(|(indent, _)| {
                let mut fixed = text.to_string();
                fixed.replace_range(indent..indent + 1, expected.encode_utf8(&mut [0; 4]));
                fixed
            })
        })
    }
}

// ============= MD009 =============

const BR_SPACES: usize = 2;

/// Trailing whitespace, except an exact two-space hard break inside a paragraph.
pub struct NoTrailingSpaces;

impl NoTrailingSpaces {
    fn is_offender(doc: &Document, index: usize) -> bool {
        let line = &doc.lines()[index];
        if line.kind.is_code() {
            return false;
        }
        let trimmed = line.text.trim_end_matches([' ', '\t']);
        let trailing = &line.text[trimmed.len()..];
        if trailing.is_empty() {
            return false;
        }
        let hard_break = trailing.len() == BR_SPACES
            && !trailing.contains('\t')
            && line.kind != LineKind::Blank
            && doc
                .kind_at(index + 1)
                .is_some_and(|k| matches!(k, LineKind::Text | LineKind::ListItem | LineKind::BlockQuote));
        !hard_break
    }
}

impl Rule for NoTrailingSpaces {
    fn id(&self) -> &'static str {
        "MD009"
    }

    fn name(&self) -> &'static str {
        "no-trailing-spaces"
    }

    fn description(&self) -> &'static str {
        "Trailing spaces"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        (0..doc.len())
            .filter(|&i| Self::is_offender(doc, i))
            .map(|i| self.violation(i, "Trailing whitespace"))
            .collect()
    }

    fn fix(&self, doc: &Document) -> String {
        map_lines(doc, |i, text| {
            Self::is_offender(doc, i).then(|| text.trim_end_matches([' ', '\t']).to_string())
        })
    }
}

// ============= MD010 =============

const TAB_WIDTH: usize = 4;

/// Hard tabs outside fenced code.
pub struct NoHardTabs;

fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut column = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

impl Rule for NoHardTabs {
    fn id(&self) -> &'static str {
        "MD010"
    }

    fn name(&self) -> &'static str {
        "no-hard-tabs"
    }

    fn description(&self) -> &'static str {
        "Hard tabs"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        doc.lines()
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.kind.is_code() && l.text.contains('\t'))
            .map(|(i, l)| {
                let column = l.text.find('\t').unwrap_or(0) + 1;
                self.violation(i, format!("Hard tab at column {}", column))
            })
            .collect()
    }

    fn fix(&self, doc: &Document) -> String {
        map_lines(doc, |i, text| {
            let kind = doc.lines()[i].kind;
            (!kind.is_code() && text.contains('\t')).then(|| expand_tabs(text))
        })
    }
}

// ============= MD012 =============

/// More than one consecutive blank line outside fenced code.
pub struct NoMultipleBlanks;

impl NoMultipleBlanks {
    fn is_offender(doc: &Document, index: usize) -> bool {
        is_blank_at(doc, index) && index > 0 && is_blank_at(doc, index - 1)
    }
}

impl Rule for NoMultipleBlanks {
    fn id(&self) -> &'static str {
        "MD012"
    }

    fn name(&self) -> &'static str {
        "no-multiple-blanks"
    }

    fn description(&self) -> &'static str {
        "Multiple consecutive blank lines"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        (0..doc.len())
            .filter(|&i| Self::is_offender(doc, i))
            .map(|i| self.violation(i, "Multiple consecutive blank lines"))
            .collect()
    }

    fn fix(&self, doc: &Document) -> String {
        let lines = doc
            .lines()
            .iter()
            .enumerate()
            .filter(|(i, _)| !Self::is_offender(doc, *i))
            .map(|(_, l)| l.text.clone())
            .collect();
        doc.rebuild(lines)
    }
}

// ============= MD018 =============

/// `#Heading` written without the space after the hashes.
pub struct NoMissingSpaceAtx;

impl NoMissingSpaceAtx {
    /// Byte offset just after the hashes, for lines that need a space there.
    fn insertion_point(doc: &Document, index: usize) -> Option<usize> {
        let line = &doc.lines()[index];
        if line.kind != LineKind::Text || line.in_list {
            return None;
        }
        let indent = block_indent(&line.text)?;
        let rest = &line.text[indent..];
        let hashes = rest.len() - rest.trim_start_matches('#').len();
        let next = rest[hashes..].chars().next()?;
        ((1..=6).contains(&hashes) && !next.is_whitespace() && next != '!').then_some(indent + hashes)
    }
}

impl Rule for NoMissingSpaceAtx {
    fn id(&self) -> &'static str {
        "MD018"
    }

    fn name(&self) -> &'static str {
        "no-missing-space-atx"
    }

    fn description(&self) -> &'static str {
        "No space after hash on atx style heading"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        (0..doc.len())
            .filter(|&i| Self::insertion_point(doc, i).is_some())
            .map(|i| self.violation(i, "Missing space after hash"))
            .collect()
    }

    fn fix(&self, doc: &Document) -> String {
        map_lines(doc, |i, text| {
            Self::insertion_point(doc, i).map(|at| format!("{} {}", &text[..at], &text[at..]))
        })
    }
}

// ============= MD019 =============

/// More than one space between the hashes and the heading text.
pub struct NoMultipleSpaceAtx;

impl NoMultipleSpaceAtx {
    fn spacing(text: &str) -> Option<(usize, usize)> {
        let indent = block_indent(text)?;
        let rest = &text[indent..];
        let hashes = rest.len() - rest.trim_start_matches('#').len();
        let after = &rest[hashes..];
        let gap = after.len() - after.trim_start_matches([' ', '\t']).len();
        (gap > 1 && !after.trim().is_empty()).then_some((indent + hashes, gap))
    }
}

impl Rule for NoMultipleSpaceAtx {
    fn id(&self) -> &'static str {
        "MD019"
    }

    fn name(&self) -> &'static str {
        "no-multiple-space-atx"
    }

    fn description(&self) -> &'static str {
        "Multiple spaces after hash on atx style heading"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        doc.lines()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.kind == LineKind::Heading && Self::spacing(&l.text).is_some())
            .map(|(i, _)| self.violation(i, "Multiple spaces after hash"))
            .collect()
    }

    fn fix(&self, doc: &Document) -> String {
        map_lines(doc, |i, text| {
            if doc.lines()[i].kind != LineKind::Heading {
                return None;
            }
            Self::spacing(text).map(|(at, gap)| format!("{} {}", &text[..at], &text[at + gap..]))
        })
    }
}

// ============= MD022 =============

/// ATX headings must be surrounded by blank lines.
pub struct BlanksAroundHeadings;

impl BlanksAroundHeadings {
    fn needs(doc: &Document, index: usize) -> (bool, bool) {
        if doc.kind_at(index) != Some(LineKind::Heading) {
            return (false, false);
        }
        let before = index > 0 && !is_blank_at(doc, index - 1);
        let after = index + 1 < doc.len() && !is_blank_at(doc, index + 1);
        (before, after)
    }
}

impl Rule for BlanksAroundHeadings {
    fn id(&self) -> &'static str {
        "MD022"
    }

    fn name(&self) -> &'static str {
        "blanks-around-headings"
    }

    fn description(&self) -> &'static str {
        "Headings should be surrounded by blank lines"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        let mut found = Vec::new();
        for i in 0..doc.len() {
            let (before, after) = Self::needs(doc, i);
            if before {
                found.push(self.violation(i, "Expected a blank line above"));
            }
            if after {
                found.push(self.violation(i, "Expected a blank line below"));
            }
        }
        found
    }

    fn fix(&self, doc: &Document) -> String {
        insert_blanks(doc, |i| Self::needs(doc, i))
    }
}

// ============= MD023 =============

/// Headings must start at the beginning of the line.
pub struct HeadingStartLeft;

impl HeadingStartLeft {
    fn is_offender(doc: &Document, index: usize) -> bool {
        let line = &doc.lines()[index];
        line.kind == LineKind::Heading && !line.in_list && line.text.starts_with(' ')
    }
}

impl Rule for HeadingStartLeft {
    fn id(&self) -> &'static str {
        "MD023"
    }

    fn name(&self) -> &'static str {
        "heading-start-left"
    }

    fn description(&self) -> &'static str {
        "Headings must start at the beginning of the line"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        (0..doc.len())
            .filter(|&i| Self::is_offender(doc, i))
            .map(|i| self.violation(i, "Heading is indented"))
            .collect()
    }

    fn fix(&self, doc: &Document) -> String {
        map_lines(doc, |i, text| {
            Self::is_offender(doc, i).then(|| text.trim_start_matches(' ').to_string())
        })
    }
}

// ============= MD027 =============

/// Multiple spaces after the blockquote marker; four or more would be code.
pub struct NoMultipleSpaceBlockquote;

impl NoMultipleSpaceBlockquote {
    fn spacing(doc: &Document, index: usize) -> Option<(usize, usize)> {
        let line = &doc.lines()[index];
        if line.kind != LineKind::BlockQuote {
            return None;
        }
        let marker = block_indent(&line.text)? + 1;
        let after = &line.text[marker..];
        let gap = after.len() - after.trim_start_matches(' ').len();
        ((2..=4).contains(&gap) && !after.trim().is_empty()).then_some((marker, gap))
    }
}

impl Rule for NoMultipleSpaceBlockquote {
    fn id(&self) -> &'static str {
        "MD027"
    }

    fn name(&self) -> &'static str {
        "no-multiple-space-blockquote"
    }

    fn description(&self) -> &'static str {
        "Multiple spaces after blockquote symbol"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        (0..doc.len())
            .filter(|&i| Self::spacing(doc, i).is_some())
            .map(|i| self.violation(i, "Multiple spaces after '>'"))
            .collect()
    }

    fn fix(&self, doc: &Document) -> String {
        map_lines(doc, |i, text| {
            Self::spacing(doc, i).map(|(at, gap)| format!("{} {}", &text[..at], &text[at + gap..]))
        })
    }
}

// ============= MD031 =============

/// Fenced code blocks must be surrounded by blank lines.
pub struct BlanksAroundFences;

impl BlanksAroundFences {
    fn needs(doc: &Document, index: usize) -> (bool, bool) {
        match doc.kind_at(index) {
            Some(LineKind::FenceOpen) => (index > 0 && !is_blank_at(doc, index - 1), false),
            Some(LineKind::FenceClose) => (false, index + 1 < doc.len() && !is_blank_at(doc, index + 1)),
            _ => (false, false),
        }
    }
}

impl Rule for BlanksAroundFences {
    fn id(&self) -> &'static str {
        "MD031"
    }

    fn name(&self) -> &'static str {
        "blanks-around-fences"
    }

    fn description(&self) -> &'static str {
        "Fenced code blocks should be surrounded by blank lines"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        let mut found = Vec::new();
        for i in 0..doc.len() {
            let (before, after) = Self::needs(doc, i);
            if before {
                found.push(self.violation(i, "Expected a blank line before the fence"));
            }
            if after {
                found.push(self.violation(i, "Expected a blank line after the fence"));
            }
        }
        found
    }

    fn fix(&self, doc: &Document) -> String {
        insert_blanks(doc, |i| Self::needs(doc, i))
    }
}

// ============= MD032 =============

/// Lists must be surrounded by blank lines.
pub struct BlanksAroundLists;

impl BlanksAroundLists {
    fn needs(doc: &Document, index: usize) -> (bool, bool) {
        let lines = doc.lines();
        let line = &lines[index];
        if !line.in_list || line.kind == LineKind::Blank {
            return (false, false);
        }
        let before = index > 0 && {
            let prev = &lines[index - 1];
            !prev.in_list && prev.kind != LineKind::Blank
        };
        let after = lines
            .get(index + 1)
            .is_some_and(|next| !next.in_list && next.kind != LineKind::Blank);
        (before, after)
    }
}

impl Rule for BlanksAroundLists {
    fn id(&self) -> &'static str {
        "MD032"
    }

    fn name(&self) -> &'static str {
        "blanks-around-lists"
    }

    fn description(&self) -> &'static str {
        "Lists should be surrounded by blank lines"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        let mut found = Vec::new();
        for i in 0..doc.len() {
            let (before, after) = Self::needs(doc, i);
            if before {
                found.push(self.violation(i, "Expected a blank line before the list"));
            }
            if after {
                found.push(self.violation(i, "Expected a blank line after the list"));
            }
        }
        found
    }

    fn fix(&self, doc: &Document) -> String {
        insert_blanks(doc, |i| Self::needs(doc, i))
    }
}

// ============= MD047 =============

/// Files end with exactly one newline and no trailing blank lines.
pub struct SingleTrailingNewline;

impl SingleTrailingNewline {
    fn trailing_blanks(doc: &Document) -> usize {
        doc.lines()
            .iter()
            .rev()
            .take_while(|l| l.kind == LineKind::Blank)
            .count()
    }
}

impl Rule for SingleTrailingNewline {
    fn id(&self) -> &'static str {
        "MD047"
    }

    fn name(&self) -> &'static str {
        "single-trailing-newline"
    }

    fn description(&self) -> &'static str {
        "Files should end with a single newline character"
    }

    fn check(&self, doc: &Document) -> Vec<Violation> {
        if doc.is_empty() {
            return vec![];
        }
        let blanks = Self::trailing_blanks(doc);
        if blanks == doc.len() || (blanks == 0 && doc.has_trailing_newline()) {
            return vec![];
        }
        vec![self.violation(doc.len() - 1, "File should end with a single newline")]
    }

    fn fix(&self, doc: &Document) -> String {
        let keep = doc.len() - Self::trailing_blanks(doc);
        let lines = doc.texts().into_iter().take(keep).collect();
        doc.rebuild_with(lines, true)
    }
}
