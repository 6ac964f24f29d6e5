//! CLI module for mdlint-agents
//!
//! Provides command-line interface parsing for the mdlint-agents binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::agents::driver::DEFAULT_TARGET;

/// mdlint-agents - two-agent Markdown linting
///
/// A language model decides which file to fix; a deterministic executor runs
/// the linter and reports back.
#[derive(Parser, Debug)]
#[command(
    name = "mdlint-agents",
    version,
    about = "Two-agent Markdown linting: an LLM decides, an executor fixes",
    long_about = "Runs a short conversation between a LinterAgent (LLM-backed) and an Executor\n\
                  that owns the 'lint_and_fix_markdown' tool.\n\n\
                  Run without arguments to fix ./input.md through the agents, or use 'fix' and\n\
                  'scan' to run the linter directly.",
    after_help = "EXAMPLES:\n    \
                  mdlint-agents                      # Agents fix ./input.md\n    \
                  mdlint-agents chat --file README.md\n    \
                  mdlint-agents fix docs/guide.md     # Fix without an LLM\n    \
                  mdlint-agents scan docs/guide.md    # Report only, exit 1 on problems\n    \
                  mdlint-agents tools                 # Print tool schemas"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Ask the agents to fix a Markdown file (the default)
    Chat {
        /// File named in the instruction sent to the LinterAgent
        #[arg(short, long, default_value = DEFAULT_TARGET)]
        file: String,
    },

    /// Lint and fix a file in place, without the agents
    Fix {
        /// Markdown file to fix
        path: String,
    },

    /// Report lint problems without changing the file
    Scan {
        /// Markdown file to check
        path: PathBuf,
    },

    /// Print the tool schemas offered to the model as JSON
    Tools,

    /// List the lint rules and whether they are enabled
    Rules,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, `chat` on the default file when none was given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat {
            file: DEFAULT_TARGET.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_chat_on_input_md() {
        let cli = Cli::try_parse_from(["mdlint-agents"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Chat {
                file: "./input.md".to_string()
            }
        );
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["mdlint-agents", "scan", "a.md", "--no-color", "--log-format", "json"])
                .unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(
            cli.command(),
            Commands::Scan {
                path: PathBuf::from("a.md")
            }
        );
    }

    #[test]
    fn test_fix_requires_path() {
        assert!(Cli::try_parse_from(["mdlint-agents", "fix"]).is_err());
    }
}
