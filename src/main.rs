//! mdlint-agents CLI Entry Point
//!
//! - `mdlint-agents` / `mdlint-agents chat` - LinterAgent and Executor fix a file together
//! - `mdlint-agents fix <path>` - run `lint_and_fix_markdown` directly
//! - `mdlint-agents scan <path>` - report problems, exit 1 if any
//! - `mdlint-agents tools` - print tool schemas
//! - `mdlint-agents rules` - list lint rules

use anyhow::Context;
use mdlint_agents::agents::driver::{self, EXECUTOR_NAME, LINTER_AGENT_NAME};
use mdlint_agents::agents::{StdinInput, TerminationReason};
use mdlint_agents::cli::output::Output;
use mdlint_agents::cli::{Cli, Commands, LogFormat};
use mdlint_agents::markdown::{all_rules, Fixer};
use mdlint_agents::tools::lint_and_fix_markdown_with;
use mdlint_agents::types::ChatMessage;
use mdlint_agents::utils::config::LinterConfig;
use mdlint_agents::{AppConfig, FixResult, ToolRegistry};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    init_tracing(cli.verbose, cli.log_format);

    match run(cli, output).await {
        Ok(code) => code,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the transcript on stdout stays clean.
fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(cli: Cli, output: Output) -> anyhow::Result<ExitCode> {
    match cli.command() {
        Commands::Chat { file } => run_chat(&file, output).await,
        Commands::Fix { path } => run_fix(&path, output).await,
        Commands::Scan { path } => run_scan(&path, output),
        Commands::Tools => run_tools(),
        Commands::Rules => {
            run_rules(output);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn linter_fixer() -> Arc<Fixer> {
    let linter = LinterConfig::from_env();
    Arc::new(Fixer::with_disabled(&linter.disabled_rules))
}

async fn run_chat(file: &str, output: Output) -> anyhow::Result<ExitCode> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let fixer = Arc::new(Fixer::with_disabled(&config.linter.disabled_rules));
    let registry = Arc::new(ToolRegistry::new(fixer));

    let llm = config
        .llm
        .provider
        .create_client(config.llm.generation_options())
        .with_context(|| format!("Failed to create {} client", config.llm.provider.name()))?;

    let conversation = driver::build_conversation(&config, llm, registry, Box::new(StdinInput))
        .on_message(Box::new(move |message: &ChatMessage| {
            let recipient = match message.name.as_deref() {
                Some(LINTER_AGENT_NAME) => EXECUTOR_NAME,
                _ => LINTER_AGENT_NAME,
            };
            output.message(message, recipient);
        }));

    let result = conversation
        .initiate_chat(&driver::initial_message(file))
        .await
        .context("Conversation failed")?;

    output.header("Conversation finished");
    let reason = match result.termination {
        TerminationReason::Terminated => "assistant replied TERMINATE",
        TerminationReason::MaxAutoReplies => "maximum consecutive auto-replies reached",
        TerminationReason::HumanExit => "ended by user",
    };
    output.kv("Reason", reason);
    output.kv("Messages", &result.history.len().to_string());
    for call in &result.tool_calls {
        let line = format!("{} ({} ms): {}", call.name, call.duration_ms, call.result);
        if call.success {
            output.success(&line);
        } else {
            output.warning(&line);
        }
    }
    if !result.summary.is_empty() {
        output.kv("Summary", &result.summary);
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_fix(path: &str, output: Output) -> anyhow::Result<ExitCode> {
    let fixer = linter_fixer();
    let target = path.to_string();
    let result = tokio::task::spawn_blocking(move || lint_and_fix_markdown_with(&fixer, &target))
        .await
        .context("Fix task panicked")?;

    match &result {
        FixResult::Success { fixed_rules, .. } => {
            output.success(&result.to_string());
            for rule in fixed_rules {
                output.list_item(rule);
            }
            Ok(ExitCode::SUCCESS)
        }
        FixResult::Failure { .. } => {
            output.error(&result.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_scan(path: &Path, output: Output) -> anyhow::Result<ExitCode> {
    let violations = linter_fixer()
        .scan_file(path)
        .with_context(|| format!("Failed to scan {}", path.display()))?;

    if violations.is_empty() {
        output.success(&format!("No problems found in {}", path.display()));
        return Ok(ExitCode::SUCCESS);
    }

    output.header(&format!("{} ({} problems)", path.display(), violations.len()));
    for violation in &violations {
        output.violation(violation);
    }
    Ok(ExitCode::FAILURE)
}

fn run_tools() -> anyhow::Result<ExitCode> {
    let registry = ToolRegistry::new(linter_fixer());
    let json = serde_json::to_string_pretty(&registry.get_tool_definitions())
        .context("Failed to serialize tool definitions")?;
    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}

fn run_rules(output: Output) {
    let enabled = linter_fixer().rule_ids();

    output.header("Rules");
    output.table_header(&["Id", "Name", "Status", "Description"]);
    for rule in all_rules() {
        let status = if enabled.contains(&rule.id()) {
            "enabled"
        } else {
            "disabled"
        };
        output.table_row(&[rule.id(), rule.name(), status, rule.description()]);
    }
}
