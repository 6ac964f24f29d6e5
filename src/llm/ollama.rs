use crate::llm::client::{http_client, GenerationOptions, LLMClient, LLMResponse};
use crate::types::{AppError, ChatMessage, MessageRole, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Client for a local Ollama server's `/api/chat` endpoint.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, options: GenerationOptions) -> Result<Self> {
        Ok(Self {
            client: http_client(&options)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature: options.temperature,
        })
    }

    fn encode_message(message: &ChatMessage) -> Value {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        };
        let mut encoded = json!({ "role": role, "content": message.content });
        if message.has_tool_calls() {
            // Ollama takes arguments as an object, not a JSON string.
            let tool_calls: Vec<Value> = message
                .tool_calls
                .iter()
                .map(|tc| {
                    json!({
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments
                        }
                    })
                })
                .collect();
            encoded["tool_calls"] = json!(tool_calls);
        }
        encoded
    }

    fn build_request(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Value {
        let tools: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters
                    }
                })
            })
            .collect();

        json!({
            "model": self.model,
            "messages": messages.iter().map(Self::encode_message).collect::<Vec<_>>(),
            "tools": tools,
            "stream": false,
            "options": {
                "temperature": self.temperature
            }
        })
    }

    /// Parse Ollama response JSON
    fn parse_response(json: &Value) -> Result<LLMResponse> {
        let message = json
            .get("message")
            .ok_or_else(|| AppError::LLM("No message in response".into()))?;

        let content = message
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let mut tool_calls = Vec::new();
        let mut finish_reason = "stop".to_string();

        if let Some(tc_array) = message.get("tool_calls").and_then(|v| v.as_array()) {
            for tc in tc_array {
                if let Some(func) = tc.get("function") {
                    let name = func
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string();
                    let arguments = func.get("arguments").cloned().unwrap_or(json!({}));

                    tool_calls.push(ToolCall {
                        id: uuid::Uuid::new_v4().to_string(),
                        name,
                        arguments,
                    });
                }
            }
            if !tool_calls.is_empty() {
                finish_reason = "tool_calls".to_string();
            }
        }

        if tool_calls.is_empty() {
            if let Some(reason) = json.get("done_reason").and_then(|v| v.as_str()) {
                finish_reason = reason.to_string();
            }
        }

        Ok(LLMResponse {
            content,
            tool_calls,
            finish_reason,
        })
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.build_request(messages, tools);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "Ollama request failed ({}): {}",
                status, text
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Failed to parse response: {}", e)))?;

        Self::parse_response(&response_json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
