//! Markdown Linting and Auto-Fix
//!
//! A small rule-based linter in the style of markdownlint. Each rule can
//! report violations and rewrite the document to remove them; the
//! [`Fixer`] applies the enabled rules until the text stops changing.
//!
//! # Example
//!
//! ```ignore
//! use mdlint_agents::markdown::Fixer;
//!
//! let fixer = Fixer::default();
//! let report = fixer.fix_str("#Title\ntext");
//! assert_eq!(report.content, "# Title\n\ntext\n");
//! ```
//!
//! Files are rewritten through a temporary file in the same directory that
//! is then renamed over the target, so a crash never leaves a half-written
//! document behind.

/// Line classification shared by all rules.
pub mod document;
/// Rule trait and the built-in rule set.
pub mod rules;

pub use document::{Document, LineKind};
pub use rules::{all_rules, Rule};

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound on fix passes; rules settle in two or three.
const MAX_PASSES: usize = 8;

/// A single problem reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule_id: &'static str,
    pub rule_name: &'static str,
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} {}",
            self.line, self.rule_id, self.rule_name, self.message
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FixerError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Result of fixing an in-memory document.
#[derive(Debug, Clone)]
pub struct FixReport {
    pub content: String,
    /// Ids of the rules that changed something, in first-applied order.
    pub fixed_rules: Vec<&'static str>,
    pub passes: usize,
}

impl FixReport {
    pub fn changed(&self) -> bool {
        !self.fixed_rules.is_empty()
    }
}

/// Result of fixing a file on disk.
#[derive(Debug, Clone)]
pub struct FileFix {
    pub path: PathBuf,
    pub changed: bool,
    pub fixed_rules: Vec<&'static str>,
}

/// Applies a set of lint rules to markdown text and files.
pub struct Fixer {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Fixer {
    fn default() -> Self {
        Self {
            rules: all_rules(),
        }
    }
}

impl fmt::Debug for Fixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixer")
            .field("rules", &self.rule_ids())
            .finish()
    }
}

impl Fixer {
    /// All built-in rules except those whose id or name is listed (case-insensitive).
    pub fn with_disabled<S: AsRef<str>>(disabled: &[S]) -> Self {
        let rules = all_rules()
            .into_iter()
            .filter(|rule| {
                !disabled.iter().any(|d| {
                    let d = d.as_ref().trim();
                    d.eq_ignore_ascii_case(rule.id()) || d.eq_ignore_ascii_case(rule.name())
                })
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Report every violation, ordered by line then rule id.
    pub fn scan_str(&self, source: &str) -> Vec<Violation> {
        let doc = Document::parse(source);
        let mut violations: Vec<Violation> =
            self.rules.iter().flat_map(|rule| rule.check(&doc)).collect();
        violations.sort_by(|a, b| a.line.cmp(&b.line).then(a.rule_id.cmp(b.rule_id)));
        violations
    }

    pub fn fix_str(&self, source: &str) -> FixReport {
        let mut content = source.to_string();
        let mut fixed_rules: Vec<&'static str> = Vec::new();
        let mut passes = 0;

        while passes < MAX_PASSES {
            passes += 1;
            let mut changed = false;
            for rule in &self.rules {
                let doc = Document::parse(&content);
                if rule.check(&doc).is_empty() {
                    continue;
                }
                let fixed = rule.fix(&doc);
                if fixed != content {
                    debug!(rule = rule.id(), pass = passes, "Rule rewrote document");
                    content = fixed;
                    changed = true;
                    if !fixed_rules.contains(&rule.id()) {
                        fixed_rules.push(rule.id());
                    }
                }
            }
            if !changed {
                break;
            }
        }

        FixReport {
            content,
            fixed_rules,
            passes,
        }
    }

    pub fn scan_file(&self, path: &Path) -> Result<Vec<Violation>, FixerError> {
        let source = read_markdown(path)?;
        Ok(self.scan_str(&source))
    }

    /// Fix a file in place. The file is only rewritten when its content changes.
    pub fn fix_file(&self, path: &Path) -> Result<FileFix, FixerError> {
        let source = read_markdown(path)?;
        let report = self.fix_str(&source);

        if report.changed() {
            write_atomic(path, &report.content)?;
        }

        Ok(FileFix {
            path: path.to_path_buf(),
            changed: report.changed(),
            fixed_rules: report.fixed_rules,
        })
    }
}

fn read_markdown(path: &Path) -> Result<String, FixerError> {
    let metadata = fs::metadata(path).map_err(|source| FixerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(FixerError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|source| FixerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| FixerError::Encoding {
        path: path.to_path_buf(),
    })
}

fn write_atomic(path: &Path, content: &str) -> Result<(), FixerError> {
    let write_err = |source: io::Error| FixerError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions()).map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
