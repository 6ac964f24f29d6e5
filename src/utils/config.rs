//! Environment-backed configuration
//!
//! Settings are read once at startup (after loading `.env` with dotenvy)
//! into an explicit [`AppConfig`] that is then passed to whatever needs it.
//!
//! The model endpoint comes from `OAI_CONFIG_LIST` when present: a JSON list
//! of `{ "model", "api_key", "base_url", "api_type" }` entries, of which the
//! first is used. Otherwise the individual `LLM_*` / `OPENAI_*` / `OLLAMA_*`
//! variables apply.

use crate::agents::{HumanInputMode, DEFAULT_MAX_CONSECUTIVE_AUTO_REPLY};
use crate::llm::{GenerationOptions, Provider};
use crate::types::{AppError, Result};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LLMConfig,
    pub agents: AgentsConfig,
    pub linter: LinterConfig,
}

#[derive(Debug, Clone)]
pub struct LLMConfig {
    pub provider: Provider,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl LLMConfig {
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentsConfig {
    pub max_consecutive_auto_reply: usize,
    pub human_input_mode: HumanInputMode,
}

#[derive(Debug, Clone, Default)]
pub struct LinterConfig {
    /// Rule ids or names to skip.
    pub disabled_rules: Vec<String>,
}

impl LinterConfig {
    /// Linter settings alone; unlike [`AppConfig::from_env`] this needs no model credentials.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let disabled_rules = lookup("MDLINT_DISABLED_RULES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self { disabled_rules }
    }
}

#[derive(Debug, Deserialize)]
struct OaiConfigEntry {
    model: String,
    api_key: Option<String>,
    base_url: Option<String>,
    api_type: Option<String>,
}

impl AppConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("OAI_CONFIG_LIST").filter(|v| !v.trim().is_empty()) {
            Some(raw) => provider_from_config_list(&raw)?,
            None => provider_from_vars(&lookup)?,
        };

        let temperature: f32 = parse_var(&lookup, "LLM_TEMPERATURE", 0.1)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AppError::Configuration(format!(
                "LLM_TEMPERATURE must be between 0 and 2, got {}",
                temperature
            )));
        }

        let human_input_mode = match lookup("HUMAN_INPUT_MODE") {
            Some(raw) => raw.parse()?,
            None => HumanInputMode::Never,
        };

        Ok(Self {
            llm: LLMConfig {
                provider,
                temperature,
                timeout_secs: parse_var(&lookup, "LLM_TIMEOUT_SECS", 120)?,
            },
            agents: AgentsConfig {
                max_consecutive_auto_reply: parse_var(
                    &lookup,
                    "MAX_CONSECUTIVE_AUTO_REPLY",
                    DEFAULT_MAX_CONSECUTIVE_AUTO_REPLY,
                )?,
                human_input_mode,
            },
            linter: LinterConfig::from_lookup(&lookup),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid {}='{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

fn provider_from_config_list(raw: &str) -> Result<Provider> {
    let entries: Vec<OaiConfigEntry> = serde_json::from_str(raw)
        .map_err(|e| AppError::Configuration(format!("Invalid OAI_CONFIG_LIST: {}", e)))?;
    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Configuration("OAI_CONFIG_LIST is empty".to_string()))?;

    match entry.api_type.as_deref() {
        Some("ollama") => Ok(Provider::Ollama {
            base_url: entry
                .base_url
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: entry.model,
        }),
        _ => Ok(Provider::OpenAI {
            api_key: entry.api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
                AppError::Configuration(format!(
                    "OAI_CONFIG_LIST entry for '{}' has no api_key",
                    entry.model
                ))
            })?,
            api_base: entry
                .base_url
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string()),
            model: entry.model,
        }),
    }
}

fn provider_from_vars<F>(lookup: &F) -> Result<Provider>
where
    F: Fn(&str) -> Option<String>,
{
    let kind = lookup("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
    match kind.trim().to_lowercase().as_str() {
        "openai" => Ok(Provider::OpenAI {
            api_key: lookup("OPENAI_API_KEY")
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    AppError::Configuration(
                        "OPENAI_API_KEY is not set (or provide OAI_CONFIG_LIST)".to_string(),
                    )
                })?,
            api_base: lookup("OPENAI_API_BASE").unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string()),
            model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        }),
        "ollama" => Ok(Provider::Ollama {
            base_url: lookup("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        }),
        other => Err(AppError::Configuration(format!(
            "Unknown LLM_PROVIDER '{}' (expected openai or ollama)",
            other
        ))),
    }
}
