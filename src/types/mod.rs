use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============= Conversation Types =============

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A single message exchanged between the two agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    /// Name of the agent that produced the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Set on tool-result messages; points back at the call being answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: MessageRole, name: Option<&str>, content: impl Into<String>) -> Self {
        Self {
            role,
            name: name.map(str::to_string),
            content: content.into(),
            tool_calls: vec![],
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, None, content)
    }

    pub fn user(sender: &str, content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, Some(sender), content)
    }

    pub fn assistant(sender: &str, content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        let mut message = Self::new(MessageRole::Assistant, Some(sender), content);
        message.tool_calls = tool_calls;
        message
    }

    pub fn tool(sender: &str, tool_call_id: &str, content: impl Into<String>) -> Self {
        let mut message = Self::new(MessageRole::Tool, Some(sender), content);
        message.tool_call_id = Some(tool_call_id.to_string());
        message
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

// ============= Tool Types =============

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Outcome of one executed tool call, as recorded by the executor.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    pub result: String,
    pub success: bool,
    pub duration_ms: u64,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_message_points_at_call() {
        let msg = ChatMessage::tool("Executor", "call_1", "Sucesso");
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msg.name.as_deref(), Some("Executor"));
    }

    #[test]
    fn test_message_serialization_skips_empty_fields() {
        let msg = ChatMessage::user("Executor", "Hello");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert!(value.get("tool_calls").is_none());
        assert!(value.get("tool_call_id").is_none());
    }

    #[test]
    fn test_assistant_with_tool_calls() {
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "lint_and_fix_markdown".to_string(),
            arguments: json!({"file_path": "./input.md"}),
        };
        let msg = ChatMessage::assistant("LinterAgent", "", vec![call]);
        assert!(msg.has_tool_calls());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Configuration("missing key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing key");
    }
}
