//! LLM client tests against a mocked HTTP server
//!
//! These tests use wiremock to stand in for the OpenAI and Ollama APIs and
//! validate request shape, tool-call parsing and error handling.

use mdlint_agents::llm::{GenerationOptions, Provider};
use mdlint_agents::types::{AppError, ChatMessage, ToolCall};
use mdlint_agents::ToolRegistry;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("Você é um assistente especialista em formatação de Markdown."),
        ChatMessage::user("Executor", "Por favor, corrija o lint do arquivo './input.md'."),
    ]
}

/// 0.5 survives the f32 round trip exactly, so request bodies can be matched.
fn options() -> GenerationOptions {
    GenerationOptions {
        temperature: 0.5,
        ..Default::default()
    }
}

/// A complete chat completion body with a single choice.
fn completion(message: serde_json::Value, finish_reason: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": message,
            "finish_reason": finish_reason
        }]
    })
}

fn openai_provider(server: &MockServer) -> Provider {
    Provider::OpenAI {
        api_key: "sk-test".to_string(),
        // Trailing slash is tolerated.
        api_base: format!("{}/v1/", server.uri()),
        model: "gpt-4o-mini".to_string(),
    }
}

fn ollama_provider(server: &MockServer) -> Provider {
    Provider::Ollama {
        base_url: server.uri(),
        model: "llama3.1".to_string(),
    }
}

// ============= OpenAI =============

#[cfg(feature = "openai")]
#[tokio::test]
async fn test_openai_tool_call_round() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.5,
            "tool_choice": "auto",
            "tools": [{ "type": "function", "function": { "name": "lint_and_fix_markdown" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": {
                        "name": "lint_and_fix_markdown",
                        "arguments": "{\"file_path\": \"./input.md\"}"
                    }
                }]
            }),
            "tool_calls",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_provider(&server)
        .create_client(options())
        .unwrap();
    let tools = vec![ToolRegistry::default().get_tool_definitions()[0].clone()];

    let response = client.chat(&conversation(), &tools).await.unwrap();

    assert_eq!(response.content, "");
    assert_eq!(response.finish_reason, "tool_calls");
    assert_eq!(
        response.tool_calls,
        vec![ToolCall {
            id: "call_abc".to_string(),
            name: "lint_and_fix_markdown".to_string(),
            arguments: json!({ "file_path": "./input.md" }),
        }]
    );
}

#[cfg(feature = "openai")]
#[tokio::test]
async fn test_openai_sends_tool_results_with_call_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system" },
                { "role": "user" },
                {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": { "name": "lint_and_fix_markdown" }
                    }]
                },
                {
                    "role": "tool",
                    "tool_call_id": "call_abc",
                    "content": "Sucesso: O arquivo './input.md' foi corrigido e salvo."
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({ "role": "assistant", "content": "TERMINATE" }),
            "stop",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut history = conversation();
    history.push(ChatMessage::assistant(
        "LinterAgent",
        "",
        vec![ToolCall {
            id: "call_abc".to_string(),
            name: "lint_and_fix_markdown".to_string(),
            arguments: json!({ "file_path": "./input.md" }),
        }],
    ));
    history.push(ChatMessage::tool(
        "Executor",
        "call_abc",
        "Sucesso: O arquivo './input.md' foi corrigido e salvo.",
    ));

    let client = openai_provider(&server)
        .create_client(options())
        .unwrap();
    let response = client.chat(&history, &[]).await.unwrap();

    assert_eq!(response.content, "TERMINATE");
    assert!(response.tool_calls.is_empty());
}

#[cfg(feature = "openai")]
#[tokio::test]
async fn test_openai_http_error_is_llm_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided: sk-test",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let client = openai_provider(&server)
        .create_client(options())
        .unwrap();
    let err = client.chat(&conversation(), &[]).await.unwrap_err();

    match err {
        AppError::LLM(message) => {
            assert!(message.starts_with("OpenAI API error"));
            assert!(message.contains("Incorrect API key provided"));
        }
        other => panic!("expected LLM error, got {:?}", other),
    }
}

#[cfg(feature = "openai")]
#[tokio::test]
async fn test_openai_malformed_arguments_reach_the_tool_layer() {
    let server = MockServer::start().await;
    let raw = "{\"file_path\": \"./input.md\"";

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_bad",
                    "type": "function",
                    "function": { "name": "lint_and_fix_markdown", "arguments": raw }
                }]
            }),
            "tool_calls",
        )))
        .mount(&server)
        .await;

    let client = openai_provider(&server)
        .create_client(options())
        .unwrap();
    let response = client.chat(&conversation(), &[]).await.unwrap();
    let call = &response.tool_calls[0];
    assert_eq!(call.arguments, json!(raw));

    let err = ToolRegistry::default()
        .execute(&call.name, call.arguments.clone())
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Invalid arguments for lint_and_fix_markdown"));
    assert!(message.contains("EOF"));
    assert!(!message.contains("missing field"));
}

// ============= Ollama =============

#[cfg(feature = "ollama")]
#[tokio::test]
async fn test_ollama_tool_call_gets_generated_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.1",
            "stream": false,
            "options": { "temperature": 0.5 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.1",
            "created_at": "2024-01-01T00:00:00Z",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "function": {
                        "name": "lint_and_fix_markdown",
                        "arguments": { "file_path": "./input.md" }
                    }
                }]
            },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ollama_provider(&server)
        .create_client(options())
        .unwrap();
    let tools = ToolRegistry::default().get_tool_definitions();

    let response = client.chat(&conversation(), &tools).await.unwrap();

    assert_eq!(response.finish_reason, "tool_calls");
    assert_eq!(response.tool_calls.len(), 1);
    let call = &response.tool_calls[0];
    assert_eq!(call.name, "lint_and_fix_markdown");
    assert_eq!(call.arguments, json!({ "file_path": "./input.md" }));
    assert!(!call.id.is_empty());
}

#[cfg(feature = "ollama")]
#[tokio::test]
async fn test_ollama_plain_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.1",
            "message": { "role": "assistant", "content": "Pronto. TERMINATE" },
            "done": true,
            "done_reason": "stop"
        })))
        .mount(&server)
        .await;

    let client = ollama_provider(&server)
        .create_client(options())
        .unwrap();
    let response = client.chat(&conversation(), &[]).await.unwrap();

    assert_eq!(response.content, "Pronto. TERMINATE");
    assert_eq!(response.finish_reason, "stop");
    assert_eq!(client.model_name(), "llama3.1");
}

#[cfg(feature = "ollama")]
#[tokio::test]
async fn test_ollama_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not found"))
        .mount(&server)
        .await;

    let client = ollama_provider(&server)
        .create_client(options())
        .unwrap();
    let err = client.chat(&conversation(), &[]).await.unwrap_err();

    assert!(matches!(err, AppError::LLM(_)));
}

// ============= Provider =============

#[test]
fn test_provider_accessors() {
    let provider = Provider::Ollama {
        base_url: "http://localhost:11434".to_string(),
        model: "llama3.1".to_string(),
    };
    assert_eq!(provider.name(), "Ollama");
    assert_eq!(provider.model(), "llama3.1");
}
