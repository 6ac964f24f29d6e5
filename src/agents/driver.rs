//! The scripted linting conversation: a `LinterAgent` that decides and an
//! `Executor` that runs `lint_and_fix_markdown` for it.

use super::assistant::AssistantAgent;
use super::conversation::Conversation;
use super::executor::{ExecutorAgent, HumanInput};
use crate::llm::LLMClient;
use crate::tools::ToolRegistry;
use crate::utils::AppConfig;
use std::sync::Arc;

pub const LINTER_AGENT_NAME: &str = "LinterAgent";
pub const EXECUTOR_NAME: &str = "Executor";

/// File the conversation targets when none is given.
pub const DEFAULT_TARGET: &str = "./input.md";

pub const LINTER_SYSTEM_MESSAGE: &str = "Você é um assistente especialista em formatação de Markdown. \
Seu objetivo é corrigir arquivos .md usando a ferramenta 'lint_and_fix_markdown'. \
Não escreva o código da correção você mesmo. \
Apenas peça para a ferramenta ser executada no arquivo solicitado. \
Responda 'TERMINATE' quando a tarefa estiver concluída com sucesso.";

/// Opening instruction sent by the executor.
pub fn initial_message(target: &str) -> String {
    format!("Por favor, corrija o lint do arquivo '{}'.", target)
}

/// Wire the two agents together around one shared registry.
pub fn build_conversation(
    config: &AppConfig,
    llm: Box<dyn LLMClient>,
    registry: Arc<ToolRegistry>,
    input: Box<dyn HumanInput>,
) -> Conversation {
    let linter = AssistantAgent::new(LINTER_AGENT_NAME, LINTER_SYSTEM_MESSAGE, llm)
        .with_tools(registry.get_tool_definitions());
    let executor = ExecutorAgent::new(EXECUTOR_NAME, registry)
        .with_human_input(config.agents.human_input_mode, input);

    Conversation::new(executor, linter)
        .with_max_consecutive_auto_reply(config.agents.max_consecutive_auto_reply)
}
