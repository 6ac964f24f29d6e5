//! LLM Provider Clients
//!
//! The decision-making agent talks to a model through the [`LLMClient`]
//! trait. Two HTTP backends implement it, each behind a Cargo feature:
//! - `openai` - OpenAI chat completions and compatible endpoints
//! - `ollama` - Local Ollama server
//!
//! # Example
//!
//! ```ignore
//! use mdlint_agents::llm::{GenerationOptions, Provider};
//!
//! let provider = Provider::Ollama {
//!     base_url: "http://localhost:11434".to_string(),
//!     model: "llama3.1".to_string(),
//! };
//! let client = provider.create_client(GenerationOptions::default())?;
//! let reply = client.chat(&messages, &tools).await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{GenerationOptions, LLMClient, LLMResponse, Provider};
