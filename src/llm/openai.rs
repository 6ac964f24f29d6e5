use crate::llm::client::{http_client, GenerationOptions, LLMClient, LLMResponse};
use crate::types::{AppError, ChatMessage, MessageRole, Result, ToolCall, ToolDefinition};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessage,
        ChatCompletionTool, ChatCompletionToolChoiceOption, ChatCompletionToolType,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, FunctionCall,
        FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

/// Client for the OpenAI chat completions API and compatible endpoints.
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIClient {
    pub fn new(
        api_key: String,
        api_base: String,
        model: String,
        options: GenerationOptions,
    ) -> Result<Self> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.trim_end_matches('/'));

        Ok(Self {
            client: Client::with_config(config).with_http_client(http_client(&options)?),
            model,
            temperature: options.temperature,
        })
    }

    fn encode_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
        let encoded = match message.role {
            MessageRole::System => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(message.content.clone()),
            ),
            MessageRole::User => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage::from(message.content.clone()),
            ),
            MessageRole::Assistant => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                if !message.content.is_empty() {
                    args.content(message.content.clone());
                }
                if message.has_tool_calls() {
                    args.tool_calls(
                        message
                            .tool_calls
                            .iter()
                            .map(|tc| ChatCompletionMessageToolCall {
                                id: tc.id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: tc.name.clone(),
                                    arguments: encode_arguments(&tc.arguments),
                                },
                            })
                            .collect::<Vec<_>>(),
                    );
                }
                ChatCompletionRequestMessage::Assistant(args.build().map_err(build_error)?)
            }
            MessageRole::Tool => ChatCompletionRequestMessage::Tool(
                ChatCompletionRequestToolMessageArgs::default()
                    .content(message.content.clone())
                    .tool_call_id(message.tool_call_id.clone().unwrap_or_default())
                    .build()
                    .map_err(build_error)?,
            ),
        };
        Ok(encoded)
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<CreateChatCompletionRequest> {
        let messages = messages
            .iter()
            .map(Self::encode_message)
            .collect::<Result<Vec<_>>>()?;

        let mut request = CreateChatCompletionRequestArgs::default();
        request
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature);

        // The API rejects an empty tools array.
        if !tools.is_empty() {
            let openai_tools: Vec<ChatCompletionTool> = tools
                .iter()
                .map(|tool| ChatCompletionTool {
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionObject {
                        name: tool.name.clone(),
                        description: Some(tool.description.clone()),
                        parameters: Some(tool.parameters.clone()),
                        strict: None,
                    },
                })
                .collect();
            request
                .tools(openai_tools)
                .tool_choice(ChatCompletionToolChoiceOption::Auto);
        }

        request.build().map_err(build_error)
    }
}

fn build_error(e: impl std::fmt::Display) -> AppError {
    AppError::LLM(format!("Failed to build request: {}", e))
}

/// Arguments that failed to parse travel as the raw string, see [`decode_arguments`].
fn encode_arguments(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

/// Keep malformed arguments verbatim so the tool layer can report the parse error.
fn decode_arguments(name: &str, raw: String) -> Value {
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(tool = %name, error = %e, "Model sent malformed tool arguments");
            Value::String(raw)
        }
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let request = self.build_request(messages, tools)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))?;

        let finish_reason = choice
            .finish_reason
            .and_then(|reason| serde_json::to_value(reason).ok())
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                arguments: decode_arguments(&call.function.name, call.function.arguments),
                id: call.id,
                name: call.function.name,
            })
            .collect();

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            finish_reason,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
