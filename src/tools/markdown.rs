//! Markdown tools exposed to the model.
//!
//! [`lint_and_fix_markdown`] is the boundary function: it never fails, every
//! problem comes back as [`FixResult::Failure`] so the conversation always
//! receives a textual tool result.

use crate::markdown::{Fixer, Violation};
use crate::tools::registry::{Tool, ToolId, ToolOutput};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Why a fix attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixError {
    #[error("file not found")]
    FileNotFound,

    #[error("{0}")]
    Fixer(String),
}

/// Outcome of a single `lint_and_fix_markdown` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixResult {
    Success {
        /// Path exactly as the caller gave it.
        path: String,
        resolved: PathBuf,
        fixed_rules: Vec<&'static str>,
    },
    Failure {
        path: String,
        error: FixError,
    },
}

impl FixResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FixResult::Success { .. })
    }

    pub fn path(&self) -> &str {
        match self {
            FixResult::Success { path, .. } | FixResult::Failure { path, .. } => path,
        }
    }
}

impl fmt::Display for FixResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixResult::Success { path, .. } => {
                write!(f, "Sucesso: O arquivo '{}' foi corrigido e salvo.", path)
            }
            FixResult::Failure {
                path,
                error: FixError::FileNotFound,
            } => write!(f, "Erro: Arquivo não encontrado em {}", path),
            FixResult::Failure {
                path,
                error: FixError::Fixer(detail),
            } => write!(
                f,
                "Erro: Não foi possível corrigir o arquivo {}. Detalhe: {}",
                path, detail
            ),
        }
    }
}

impl From<FixResult> for ToolOutput {
    fn from(result: FixResult) -> Self {
        ToolOutput {
            success: result.is_success(),
            content: result.to_string(),
        }
    }
}

/// Lint and fix a markdown file in place using the default rule set.
pub fn lint_and_fix_markdown(file_path: &str) -> FixResult {
    lint_and_fix_markdown_with(&Fixer::default(), file_path)
}

/// Lint and fix a markdown file in place with the given fixer.
pub fn lint_and_fix_markdown_with(fixer: &Fixer, file_path: &str) -> FixResult {
    info!(file_path, "[Tool] Starting markdown lint and fix");

    let resolved = match resolve(file_path) {
        Some(path) if path.exists() => path,
        other => {
            let shown = other.unwrap_or_else(|| PathBuf::from(file_path));
            error!(path = %shown.display(), "[Tool] File not found");
            return FixResult::Failure {
                path: file_path.to_string(),
                error: FixError::FileNotFound,
            };
        }
    };

    match fixer.fix_file(&resolved) {
        Ok(fix) => {
            info!(
                path = %resolved.display(),
                changed = fix.changed,
                rules = ?fix.fixed_rules,
                "[Tool] File fixed and saved"
            );
            FixResult::Success {
                path: file_path.to_string(),
                resolved,
                fixed_rules: fix.fixed_rules,
            }
        }
        Err(e) => {
            error!(path = %resolved.display(), error = %e, "[Tool] Failed to fix file");
            FixResult::Failure {
                path: file_path.to_string(),
                error: FixError::Fixer(e.to_string()),
            }
        }
    }
}

/// Absolute form of `file_path`; the file does not need to exist.
fn resolve(file_path: &str) -> Option<PathBuf> {
    std::path::absolute(Path::new(file_path)).ok()
}

/// Render scan results for the model.
fn describe_violations(file_path: &str, violations: &[Violation]) -> String {
    if violations.is_empty() {
        return format!("Nenhum problema encontrado em {}", file_path);
    }
    let mut out = format!(
        "{} problema(s) encontrado(s) em {}:",
        violations.len(),
        file_path
    );
    for v in violations {
        out.push('\n');
        out.push_str(&v.to_string());
    }
    out
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LintAndFixArgs {
    /// O caminho do arquivo .md a ser corrigido (ex: ./input.md)
    pub file_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScanArgs {
    /// O caminho do arquivo .md a ser analisado (ex: ./input.md)
    pub file_path: String,
}

pub struct LintAndFixMarkdown {
    fixer: Arc<Fixer>,
}

impl LintAndFixMarkdown {
    pub fn new(fixer: Arc<Fixer>) -> Self {
        Self { fixer }
    }
}

#[async_trait]
impl Tool for LintAndFixMarkdown {
    type Args = LintAndFixArgs;

    fn id(&self) -> ToolId {
        ToolId::LintAndFixMarkdown
    }

    fn description(&self) -> &'static str {
        "Executa o lint e corrige automaticamente um arquivo markdown específico."
    }

    async fn call(&self, args: LintAndFixArgs) -> ToolOutput {
        let fixer = self.fixer.clone();
        let file_path = args.file_path;
        let task_path = file_path.clone();

        let result = tokio::task::spawn_blocking(move || {
            lint_and_fix_markdown_with(&fixer, &task_path)
        })
        .await
        .unwrap_or_else(|e| FixResult::Failure {
            path: file_path,
            error: FixError::Fixer(e.to_string()),
        });

        result.into()
    }
}

/// Read-only counterpart: reports violations without touching the file.
pub struct ScanMarkdown {
    fixer: Arc<Fixer>,
}

impl ScanMarkdown {
    pub fn new(fixer: Arc<Fixer>) -> Self {
        Self { fixer }
    }
}

#[async_trait]
impl Tool for ScanMarkdown {
    type Args = ScanArgs;

    fn id(&self) -> ToolId {
        ToolId::ScanMarkdown
    }

    fn description(&self) -> &'static str {
        "Analisa um arquivo markdown e lista os problemas de lint sem modificá-lo."
    }

    async fn call(&self, args: ScanArgs) -> ToolOutput {
        let fixer = self.fixer.clone();
        let file_path = args.file_path;
        let task_path = file_path.clone();

        let scanned = tokio::task::spawn_blocking(move || {
            let resolved = resolve(&task_path).filter(|p| p.exists())?;
            Some(fixer.scan_file(&resolved).map_err(|e| e.to_string()))
        })
        .await
        .unwrap_or_else(|e| Some(Err(e.to_string())));

        match scanned {
            None => ToolOutput {
                content: format!("Erro: Arquivo não encontrado em {}", file_path),
                success: false,
            },
            Some(Err(detail)) => ToolOutput {
                content: format!(
                    "Erro: Não foi possível analisar o arquivo {}. Detalhe: {}",
                    file_path, detail
                ),
                success: false,
            },
            Some(Ok(violations)) => ToolOutput {
                content: describe_violations(&file_path, &violations),
                success: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.md");
        let shown = path.to_string_lossy().to_string();

        let result = lint_and_fix_markdown(&shown);

        assert_eq!(
            result,
            FixResult::Failure {
                path: shown.clone(),
                error: FixError::FileNotFound
            }
        );
        let message = result.to_string();
        assert!(message.contains("Erro"));
        assert!(message.contains("missing.md"));
        assert!(!path.exists());
    }

    #[test]
    fn test_fix_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.md");
        fs::write(&path, "#Title\ntext   \n\n\n").unwrap();

        let result = lint_and_fix_markdown(&path.to_string_lossy());

        assert!(result.is_success());
        let message = result.to_string();
        assert!(message.starts_with("Sucesso"));
        assert!(message.contains("input.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Title\n\ntext\n");
    }

    #[test]
    fn test_directory_is_fixer_error() {
        let dir = tempfile::tempdir().unwrap();
        let shown = dir.path().to_string_lossy().to_string();

        let result = lint_and_fix_markdown(&shown);

        match &result {
            FixResult::Failure {
                error: FixError::Fixer(detail),
                ..
            } => assert!(!detail.is_empty()),
            other => panic!("expected fixer failure, got {:?}", other),
        }
        assert!(result.to_string().contains("Detalhe:"));
    }

    #[test]
    fn test_failure_keeps_original_path() {
        let result = lint_and_fix_markdown("./definitely/not/here.md");
        assert_eq!(result.path(), "./definitely/not/here.md");
        assert_eq!(
            result.to_string(),
            "Erro: Arquivo não encontrado em ./definitely/not/here.md"
        );
    }

    #[test]
    fn test_describe_violations() {
        assert_eq!(
            describe_violations("a.md", &[]),
            "Nenhum problema encontrado em a.md"
        );
    }

    #[tokio::test]
    async fn test_tool_output_from_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "text").unwrap();

        let tool = LintAndFixMarkdown::new(Arc::new(Fixer::default()));
        let output = tool
            .call(LintAndFixArgs {
                file_path: path.to_string_lossy().to_string(),
            })
            .await;

        assert!(output.success);
        assert!(output.content.contains("Sucesso"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "text\n");
    }

    #[tokio::test]
    async fn test_scan_does_not_modify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "#Title").unwrap();

        let tool = ScanMarkdown::new(Arc::new(Fixer::default()));
        let output = tool
            .call(ScanArgs {
                file_path: path.to_string_lossy().to_string(),
            })
            .await;

        assert!(output.success);
        assert!(output.content.contains("MD018"));
        assert!(output.content.contains("MD047"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "#Title");
    }
}
