//! # mdlint-agents
//!
//! Two cooperating agents that lint and fix Markdown files: a `LinterAgent`
//! backed by a language model decides what to do, and a deterministic
//! `Executor` runs the `lint_and_fix_markdown` tool it asks for.
//!
//! ## Overview
//!
//! mdlint-agents can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `mdlint-agents` binary
//! 2. **As a library** - Drive the conversation or the fixer from your own code
//!
//! ### Fixing a file directly
//!
//! ```rust,ignore
//! use mdlint_agents::tools::markdown::lint_and_fix_markdown;
//!
//! let result = lint_and_fix_markdown("./input.md");
//! println!("{}", result); // "Sucesso: O arquivo './input.md' foi corrigido e salvo."
//! ```
//!
//! ### Running the conversation
//!
//! ```rust,ignore
//! use mdlint_agents::agents::{driver, StdinInput};
//! use mdlint_agents::{AppConfig, ToolRegistry};
//! use std::sync::Arc;
//!
//! let config = AppConfig::from_env()?;
//! let llm = config.llm.provider.create_client(config.llm.generation_options())?;
//! let registry = Arc::new(ToolRegistry::default());
//!
//! let chat = driver::build_conversation(&config, llm, registry, Box::new(StdinInput));
//! let result = chat.initiate_chat(&driver::initial_message(driver::DEFAULT_TARGET)).await?;
//! println!("{}", result.summary);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI-compatible chat completions via `async-openai` (default) |
//! | `ollama` | Ollama `/api/chat` (default) |
//!
//! ## Modules
//!
//! - [`agents`] - Assistant, executor and the conversation loop
//! - [`cli`] - Command-line parsing and terminal output
//! - [`llm`] - LLM client implementations
//! - [`markdown`] - Rule-based Markdown linter and fixer
//! - [`tools`] - Tool functions and the static registry
//! - [`types`] - Common types and error handling
//! - [`utils`] - Environment configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// LinterAgent / Executor conversation.
pub mod agents;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Markdown lint rules and the fixer.
pub mod markdown;
/// Tools callable by the model.
pub mod tools;
/// Core types (messages, tool calls, errors).
pub mod types;
/// Configuration from the environment.
pub mod utils;

// Re-export commonly used types
pub use agents::{ChatResult, Conversation, TerminationReason};
pub use llm::{LLMClient, LLMResponse, Provider};
pub use markdown::Fixer;
pub use tools::markdown::{lint_and_fix_markdown, FixError, FixResult};
pub use tools::registry::{ToolId, ToolRegistry};
pub use types::{AppError, Result};
pub use utils::AppConfig;
