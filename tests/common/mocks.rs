//! Mock implementations for testing.
//!
//! This module provides mock LLM clients that can be used across different
//! test files without duplication.

#![allow(dead_code)]

use async_trait::async_trait;
use mdlint_agents::llm::{LLMClient, LLMResponse};
use mdlint_agents::types::{AppError, ChatMessage, Result, ToolCall, ToolDefinition};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock LLM client that plays back a fixed script of replies.
///
/// Every call pops the next reply; once the script is exhausted the last
/// reply repeats. The histories it was called with are kept so tests can
/// check what the assistant saw.
///
/// # Examples
///
/// ```ignore
/// let client = MockLLMClient::scripted(vec![
///     MockLLMClient::tool_call("call_1", "lint_and_fix_markdown", "./input.md"),
///     MockLLMClient::text("TERMINATE"),
/// ]);
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    script: Arc<Mutex<VecDeque<LLMResponse>>>,
    last: Arc<Mutex<Option<LLMResponse>>>,
    calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    should_fail: bool,
}

impl MockLLMClient {
    /// Create a mock client that replies with the given responses in order.
    pub fn scripted(responses: Vec<LLMResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    /// Create a mock client that always returns the same text.
    pub fn new(response: &str) -> Self {
        Self::scripted(vec![Self::text(response)])
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::scripted(vec![])
        }
    }

    /// Plain text reply.
    pub fn text(content: &str) -> LLMResponse {
        LLMResponse {
            content: content.to_string(),
            tool_calls: vec![],
            finish_reason: "stop".to_string(),
        }
    }

    /// Reply requesting one `file_path` tool call.
    pub fn tool_call(id: &str, name: &str, file_path: &str) -> LLMResponse {
        LLMResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: json!({ "file_path": file_path }),
            }],
            finish_reason: "tool_calls".to_string(),
        }
    }

    /// Histories received so far, one per call.
    pub fn received(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, messages: &[ChatMessage], _tools: &[ToolDefinition]) -> Result<LLMResponse> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }

        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(response) => {
                *last = Some(response.clone());
                Ok(response)
            }
            None => last
                .clone()
                .ok_or_else(|| AppError::LLM("Mock script is empty".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Human input that answers from a fixed list, then presses enter.
pub struct ScriptedInput {
    answers: Mutex<VecDeque<String>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedInput {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared view of the prompts shown so far.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl mdlint_agents::agents::HumanInput for ScriptedInput {
    async fn read_line(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or_default())
    }
}
