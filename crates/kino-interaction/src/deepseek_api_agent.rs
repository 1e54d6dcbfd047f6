//! DeepSeekApiAgent - Direct REST API implementation for DeepSeek chat completions.
//!
//! One POST per turn, no retries. The API key and timeout arrive with each
//! request, so one agent can serve every session.

use crate::system_prompt::build_system_prompt;
use async_trait::async_trait;
use kino_core::completion::{CompletionClient, CompletionRequest};
use kino_core::error::{KinoError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const PROVIDER_NAME: &str = "deepseek";
const PROVIDER_DISPLAY_NAME: &str = "DeepSeek";
const BASE_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;

/// Completion client that talks to the DeepSeek HTTP API.
#[derive(Clone)]
pub struct DeepSeekApiAgent {
    client: Client,
    endpoint: String,
}

impl DeepSeekApiAgent {
    pub fn new() -> Self {
        Self::with_endpoint(BASE_URL)
    }

    /// Points the agent at another chat-completions URL.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_body(request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: build_system_prompt(request.mode, &request.context),
                },
                ChatMessage {
                    role: "user",
                    content: request.text.clone(),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<String> {
        let body = Self::build_body(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&request.api_key)
            .header("content-type", "application/json")
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error(err, request))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read DeepSeek error body".to_string());
            tracing::warn!("[DeepSeek] Request failed with status {}", status.as_u16());
            return Err(KinoError::Upstream {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|err| map_transport_error(err, request))?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&raw).map_err(|err| {
            KinoError::MalformedResponse(format!("Failed to parse DeepSeek response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

impl Default for DeepSeekApiAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for DeepSeekApiAgent {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        if request.api_key.trim().is_empty() {
            return Err(KinoError::missing_credential(PROVIDER_DISPLAY_NAME));
        }

        tracing::debug!(
            "[DeepSeek] Sending {} message with model {}",
            request.mode,
            request.model
        );
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            KinoError::MalformedResponse("DeepSeek API returned no content in the response".into())
        })
}

fn map_transport_error(err: reqwest::Error, request: &CompletionRequest) -> KinoError {
    if err.is_timeout() {
        KinoError::Timeout {
            timeout_ms: request.timeout.as_millis() as u64,
        }
    } else {
        KinoError::Network(format!("DeepSeek API request failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kino_core::session::{ChatMode, MessageContext};
    use std::time::Duration;

    fn request(api_key: &str, timeout: Duration) -> CompletionRequest {
        CompletionRequest {
            text: "hello".into(),
            mode: ChatMode::Plan,
            context: MessageContext {
                specs: vec!["auth".into()],
                ..Default::default()
            },
            api_key: api_key.into(),
            model: "deepseek-chat".into(),
            timeout,
        }
    }

    fn endpoint(server: &mockito::ServerGuard) -> String {
        format!("{}/v1/chat/completions", server.url())
    }

    #[tokio::test]
    async fn test_success_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "deepseek-chat",
                "max_tokens": 4000,
                "messages": [
                    { "role": "system" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#)
            .create_async()
            .await;

        let agent = DeepSeekApiAgent::with_endpoint(endpoint(&server));
        let reply = agent.complete(request("sk-test", Duration::from_secs(5))).await.unwrap();

        assert_eq!(reply, "hi");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let agent = DeepSeekApiAgent::with_endpoint(endpoint(&server));
        let err = agent
            .complete(request("sk-test", Duration::from_secs(5)))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            KinoError::Upstream {
                status: 500,
                body: "boom".into()
            }
        );
        assert_eq!(err.to_string(), "API Error 500: boom");
    }

    #[tokio::test]
    async fn test_missing_content_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let agent = DeepSeekApiAgent::with_endpoint(endpoint(&server));
        let err = agent
            .complete(request("sk-test", Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, KinoError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_key_fails_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let agent = DeepSeekApiAgent::with_endpoint(endpoint(&server));
        let err = agent.complete(request("  ", Duration::from_secs(5))).await.unwrap_err();

        assert!(err.is_config());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unresponsive_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer
        let stall = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let agent = DeepSeekApiAgent::with_endpoint(format!("http://{addr}/v1/chat/completions"));
        let err = agent
            .complete(request("sk-test", Duration::from_millis(200)))
            .await
            .unwrap_err();

        assert_eq!(err, KinoError::Timeout { timeout_ms: 200 });
        stall.abort();
    }
}
