use crate::tools::ToolRegistry;
use crate::types::{AppError, ChatMessage, Result, ToolCall, ToolCallRecord};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

/// When the executor stops to ask a human instead of replying on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HumanInputMode {
    /// Never ask; every reply is automatic.
    #[default]
    Never,
    /// Ask only when the conversation would otherwise end.
    Terminate,
    /// Ask before every reply.
    Always,
}

impl FromStr for HumanInputMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(HumanInputMode::Never),
            "terminate" => Ok(HumanInputMode::Terminate),
            "always" => Ok(HumanInputMode::Always),
            other => Err(AppError::Configuration(format!(
                "Unknown human input mode '{}' (expected never, terminate or always)",
                other
            ))),
        }
    }
}

impl fmt::Display for HumanInputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HumanInputMode::Never => "never",
            HumanInputMode::Terminate => "terminate",
            HumanInputMode::Always => "always",
        };
        f.write_str(s)
    }
}

/// What a human typed when asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanReply {
    /// End the conversation.
    Exit,
    /// Send this text instead of the automatic reply.
    Message(String),
}

/// Source of human replies.
#[async_trait]
pub trait HumanInput: Send + Sync {
    /// Show `prompt` and return the raw line entered.
    async fn read_line(&self, prompt: &str) -> Result<String>;
}

/// Reads replies from the terminal.
pub struct StdinInput;

#[async_trait]
impl HumanInput for StdinInput {
    async fn read_line(&self, prompt: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Deterministic participant that executes tool calls and replies automatically.
pub struct ExecutorAgent {
    name: String,
    registry: Arc<ToolRegistry>,
    human_input_mode: HumanInputMode,
    input: Box<dyn HumanInput>,
    default_auto_reply: String,
}

impl ExecutorAgent {
    pub fn new(name: &str, registry: Arc<ToolRegistry>) -> Self {
        Self {
            name: name.to_string(),
            registry,
            human_input_mode: HumanInputMode::Never,
            input: Box::new(StdinInput),
            default_auto_reply: String::new(),
        }
    }

    pub fn with_human_input(mut self, mode: HumanInputMode, input: Box<dyn HumanInput>) -> Self {
        self.human_input_mode = mode;
        self.input = input;
        self
    }

    pub fn with_default_auto_reply(mut self, reply: &str) -> Self {
        self.default_auto_reply = reply.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn human_input_mode(&self) -> HumanInputMode {
        self.human_input_mode
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Automatic reply when the assistant neither calls a tool nor terminates.
    pub fn auto_reply(&self) -> ChatMessage {
        ChatMessage::user(&self.name, self.default_auto_reply.clone())
    }

    /// Ask the human, if the mode calls for it at this point.
    ///
    /// `at_stop_point` is true when the conversation is about to end on its own.
    /// Returns `None` when no one was asked or the answer was empty.
    pub async fn human_reply(&self, sender: &str, at_stop_point: bool) -> Result<Option<HumanReply>> {
        let ask = match self.human_input_mode {
            HumanInputMode::Never => false,
            HumanInputMode::Terminate => at_stop_point,
            HumanInputMode::Always => true,
        };
        if !ask {
            return Ok(None);
        }

        let prompt = format!(
            "Replying as {}. Provide feedback to {}. Press enter to skip and use auto-reply, or type 'exit' to end the conversation: ",
            self.name, sender
        );
        let answer = self.input.read_line(&prompt).await?;
        let answer = answer.trim();
        Ok(match answer {
            "" => None,
            "exit" => Some(HumanReply::Exit),
            text => Some(HumanReply::Message(text.to_string())),
        })
    }

    /// Run every requested call, answering each with one tool message.
    ///
    /// Unknown tools and bad arguments become error text for the model.
    pub async fn execute_tool_calls(
        &self,
        calls: &[ToolCall],
    ) -> (Vec<ChatMessage>, Vec<ToolCallRecord>) {
        let mut messages = Vec::with_capacity(calls.len());
        let mut records = Vec::with_capacity(calls.len());

        for call in calls {
            info!(tool = %call.name, call_id = %call.id, "Executing tool call");
            let start = Instant::now();

            let (content, success) = match self
                .registry
                .execute(&call.name, call.arguments.clone())
                .await
            {
                Ok(output) => (output.content, output.success),
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Tool call rejected");
                    (format!("Error: {}", e), false)
                }
            };

            records.push(ToolCallRecord {
                id: call.id.clone(),
                name: call.name.clone(),
                arguments: call.arguments.clone(),
                result: content.clone(),
                success,
                duration_ms: start.elapsed().as_millis() as u64,
            });
            messages.push(ChatMessage::tool(&self.name, &call.id, content));
        }

        (messages, records)
    }
}
