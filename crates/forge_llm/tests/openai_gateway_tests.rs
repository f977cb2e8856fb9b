//! HTTP behaviour of the OpenAI-compatible gateway against a local server.

use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;

use forge_core::{GatewayError, Message, ModelGateway, ModelRequest, ToolDefinition};
use forge_llm::{LlmConfig, OpenAiGateway};

fn gateway(base_url: String, api_key: Option<&str>) -> OpenAiGateway {
    let config = LlmConfig::default()
        .with_base_url(base_url)
        .with_api_key(api_key.map(str::to_string))
        .with_timeout(Duration::from_secs(5));
    OpenAiGateway::new(config).unwrap()
}

fn request() -> ModelRequest {
    ModelRequest::new("You are an Analyst.")
        .message(Message::human("Кратко расскажи какие инструменты созданы"))
        .tools(vec![ToolDefinition::new(
            "list_files",
            "Lists saved tools",
            json!({"type": "object", "properties": {}}),
        )])
}

#[tokio::test]
async fn test_successful_call_sends_bearer_and_parses_tool_calls() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"model": "qwen3-32b", "temperature": 0.0})),
            Matcher::Regex(r#""role":"system","content":"You are an Analyst.""#.to_string()),
            Matcher::Regex(r#""type":"function","function":\{"name":"list_files""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "<think>need the listing</think>",
                        "tool_calls": [{
                            "id": "call_ls",
                            "type": "function",
                            "function": {"name": "list_files", "arguments": "{}"}
                        }]
                    }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let gateway = gateway(format!("{}/v1", server.url()), Some("sk-test"));
    let turn = gateway.invoke(request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(turn.content, "");
    assert_eq!(turn.tool_calls.len(), 1);
    assert_eq!(turn.tool_calls[0].id, "call_ls");
    assert_eq!(turn.tool_calls[0].name, "list_files");
}

#[tokio::test]
async fn test_no_api_key_sends_no_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": [{"message": {"content": "IMPLEMENT"}}]}"#)
        .create_async()
        .await;

    let gateway = gateway(format!("{}/v1/", server.url()), None);
    let turn = gateway.invoke(ModelRequest::new("classify")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(turn.content, "IMPLEMENT");
    assert!(turn.tool_calls.is_empty());
}

#[tokio::test]
async fn test_error_status_maps_to_api_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let gateway = gateway(format!("{}/v1", server.url()), None);
    let err = gateway.invoke(request()).await.unwrap_err();

    match err {
        GatewayError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create_async()
        .await;

    let gateway = gateway(format!("{}/v1", server.url()), None);
    let err = gateway.invoke(request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("<html>proxy login</html>")
        .create_async()
        .await;

    let gateway = gateway(format!("{}/v1", server.url()), None);
    let err = gateway.invoke(request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and never answer
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let config = LlmConfig::default()
        .with_base_url(format!("http://{}/v1", addr))
        .with_timeout(Duration::from_millis(300));
    let gateway = OpenAiGateway::new(config).unwrap();

    let err = gateway.invoke(request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let gateway = gateway(format!("http://{}/v1", addr), None);
    let err = gateway.invoke(request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)), "got {err:?}");
}
