//! Two-agent conversation
//!
//! - [`AssistantAgent`] - LLM-backed; reads the instruction and decides which tool to call
//! - [`ExecutorAgent`] - deterministic; runs the requested tools and replies automatically
//! - [`Conversation`] - alternates between the two until a termination signal
//! - [`driver`] - the fixed LinterAgent/Executor pair and its opening instruction

pub mod assistant;
pub mod conversation;
pub mod driver;
pub mod executor;

pub use assistant::AssistantAgent;
pub use conversation::{
    ChatResult, Conversation, MessageCallback, TerminationReason, DEFAULT_MAX_CONSECUTIVE_AUTO_REPLY,
};
pub use executor::{ExecutorAgent, HumanInput, HumanInputMode, HumanReply, StdinInput};
