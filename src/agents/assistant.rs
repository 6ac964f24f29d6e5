use crate::llm::LLMClient;
use crate::types::{ChatMessage, Result, ToolDefinition};
use tracing::debug;

/// Conversation participant backed by a language model.
pub struct AssistantAgent {
    name: String,
    system_message: String,
    llm: Box<dyn LLMClient>,
    /// Schemas the model may call; empty means plain chat.
    tools: Vec<ToolDefinition>,
}

impl AssistantAgent {
    pub fn new(name: &str, system_message: &str, llm: Box<dyn LLMClient>) -> Self {
        Self {
            name: name.to_string(),
            system_message: system_message.to_string(),
            llm,
            tools: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Produce the next assistant message for the given history.
    pub async fn reply(&self, history: &[ChatMessage]) -> Result<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(self.system_message.clone()));
        messages.extend(history.iter().cloned());

        let response = self.llm.chat(&messages, &self.tools).await?;
        debug!(
            agent = %self.name,
            finish_reason = %response.finish_reason,
            tool_calls = response.tool_calls.len(),
            "Assistant replied"
        );

        Ok(ChatMessage::assistant(
            &self.name,
            response.content,
            response.tool_calls,
        ))
    }
}
