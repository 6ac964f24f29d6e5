use super::assistant::AssistantAgent;
use super::executor::{ExecutorAgent, HumanReply};
use crate::types::{ChatMessage, MessageRole, Result, ToolCallRecord};
use serde::Serialize;
use tracing::{debug, info};

/// Content marker the assistant uses to signal completion.
pub const TERMINATION_KEYWORD: &str = "TERMINATE";

/// Tool result sent for calls a human skipped by typing feedback instead.
pub const USER_INTERRUPTED: &str = "USER INTERRUPTED";

pub const DEFAULT_MAX_CONSECUTIVE_AUTO_REPLY: usize = 100;

/// Called with every message as it is appended to the history.
pub type MessageCallback = Box<dyn Fn(&ChatMessage) + Send + Sync>;

/// Why a conversation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The assistant sent a termination message.
    Terminated,
    /// The executor ran out of consecutive automatic replies.
    MaxAutoReplies,
    /// A human typed `exit`.
    HumanExit,
}

/// Everything that happened during one conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResult {
    pub history: Vec<ChatMessage>,
    /// Last meaningful text of the conversation.
    pub summary: String,
    pub termination: TerminationReason,
    pub tool_calls: Vec<ToolCallRecord>,
}

/// True when `message` ends the conversation.
pub fn is_termination_msg(message: &ChatMessage) -> bool {
    message.content.trim_end().ends_with(TERMINATION_KEYWORD)
}

/// Executor-initiated chat with a single assistant.
pub struct Conversation {
    executor: ExecutorAgent,
    assistant: AssistantAgent,
    max_consecutive_auto_reply: usize,
    on_message: Option<MessageCallback>,
}

impl Conversation {
    pub fn new(executor: ExecutorAgent, assistant: AssistantAgent) -> Self {
        Self {
            executor,
            assistant,
            max_consecutive_auto_reply: DEFAULT_MAX_CONSECUTIVE_AUTO_REPLY,
            on_message: None,
        }
    }

    pub fn with_max_consecutive_auto_reply(mut self, max: usize) -> Self {
        self.max_consecutive_auto_reply = max;
        self
    }

    pub fn on_message(mut self, callback: MessageCallback) -> Self {
        self.on_message = Some(callback);
        self
    }

    pub fn executor(&self) -> &ExecutorAgent {
        &self.executor
    }

    pub fn assistant(&self) -> &AssistantAgent {
        &self.assistant
    }

    /// Send `message` from the executor and alternate turns until a stop condition.
    ///
    /// Each assistant turn is followed by one executor turn: a human reply when the
    /// input mode asks for one, otherwise the tool results, otherwise the default
    /// auto-reply. Model errors abort the conversation.
    pub async fn initiate_chat(&self, message: &str) -> Result<ChatResult> {
        info!(
            executor = %self.executor.name(),
            assistant = %self.assistant.name(),
            model = %self.assistant.model_name(),
            "Conversation started"
        );

        let mut history = Vec::new();
        let mut tool_calls = Vec::new();
        let mut auto_replies = 0usize;

        self.append(&mut history, ChatMessage::user(self.executor.name(), message));

        let termination = loop {
            let reply = self.assistant.reply(&history).await?;
            self.append(&mut history, reply.clone());

            let terminating = is_termination_msg(&reply);
            let limit_reached = auto_replies >= self.max_consecutive_auto_reply;

            match self
                .executor
                .human_reply(self.assistant.name(), terminating || limit_reached)
                .await?
            {
                Some(HumanReply::Exit) => break TerminationReason::HumanExit,
                Some(HumanReply::Message(text)) => {
                    auto_replies = 0;
                    // Every requested call still needs an answer before the next user turn.
                    for call in &reply.tool_calls {
                        self.append(
                            &mut history,
                            ChatMessage::tool(self.executor.name(), &call.id, USER_INTERRUPTED),
                        );
                    }
                    self.append(&mut history, ChatMessage::user(self.executor.name(), text));
                    continue;
                }
                None => {}
            }

            if terminating {
                break TerminationReason::Terminated;
            }
            if limit_reached {
                break TerminationReason::MaxAutoReplies;
            }
            auto_replies += 1;

            if reply.has_tool_calls() {
                let (results, records) = self.executor.execute_tool_calls(&reply.tool_calls).await;
                for result in results {
                    self.append(&mut history, result);
                }
                tool_calls.extend(records);
            } else {
                debug!("No tool call requested; sending default auto-reply");
                self.append(&mut history, self.executor.auto_reply());
            }
        };

        info!(
            reason = ?termination,
            messages = history.len(),
            tool_calls = tool_calls.len(),
            "Conversation finished"
        );

        Ok(ChatResult {
            summary: summarize(&history),
            history,
            termination,
            tool_calls,
        })
    }

    fn append(&self, history: &mut Vec<ChatMessage>, message: ChatMessage) {
        if let Some(callback) = &self.on_message {
            callback(&message);
        }
        history.push(message);
    }
}

/// Last non-empty assistant text without the termination marker, falling back
/// to the last tool result.
fn summarize(history: &[ChatMessage]) -> String {
    let assistant_text = history
        .iter()
        .rev()
        .filter(|m| m.role == MessageRole::Assistant)
        .map(|m| {
            m.content
                .trim_end()
                .trim_end_matches(TERMINATION_KEYWORD)
                .trim()
        })
        .find(|text| !text.is_empty());

    match assistant_text {
        Some(text) => text.to_string(),
        None => history
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Tool)
            .map(|m| m.content.clone())
            .unwrap_or_default(),
    }
}
