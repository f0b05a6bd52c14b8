use async_trait::async_trait;
use campaign_models::config::{LlmConfig, OPENAI_API_KEY_ENV};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AgentError;

/// A text-in, text-out language model. Mockable for testing.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a single user prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, AgentError>;
}

/// Chat completion client for the hosted OpenAI API.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: Option<String>,
    config: LlmConfig,
}

impl OpenAiChat {
    pub fn new(api_key: Option<String>, config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatRequestMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AgentError::MissingCredential(OPENAI_API_KEY_ENV))?;

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Requesting completion");

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.config.model,
                messages: [ChatRequestMessage {
                    role: "user",
                    content: prompt,
                }],
                temperature: self.config.temperature,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_string))
                .unwrap_or(body);
            warn!(status, message = %message, "Completion request failed");
            return Err(AgentError::Api { status, message });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AgentError::EmptyCompletion);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn chat(server: &Server) -> OpenAiChat {
        OpenAiChat::new(
            Some("sk-test".to_string()),
            LlmConfig {
                base_url: server.url(),
                ..LlmConfig::default()
            },
        )
    }

    #[test]
    fn model_comes_from_config() {
        let chat = OpenAiChat::new(None, LlmConfig::default());
        assert_eq!(chat.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Hi there"}}]}"#)
            .create_async()
            .await;

        let text = chat(&server).complete("hello").await.unwrap();
        mock.assert_async().await;
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn empty_completion_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": ""}}]}"#)
            .create_async()
            .await;

        let err = chat(&server).complete("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyCompletion));
    }

    #[tokio::test]
    async fn missing_choices_is_an_empty_completion() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let err = chat(&server).complete("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyCompletion));
    }

    #[tokio::test]
    async fn whitespace_completion_is_returned_raw() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "\n"}}]}"#)
            .create_async()
            .await;

        let text = chat(&server).complete("hello").await.unwrap();
        assert_eq!(text, "\n");
    }

    #[tokio::test]
    async fn api_failure_carries_status_and_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#)
            .create_async()
            .await;

        match chat(&server).complete("hello").await.unwrap_err() {
            AgentError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let chat = OpenAiChat::new(None, LlmConfig::default());
        let err = chat.complete("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::MissingCredential(OPENAI_API_KEY_ENV)));
    }
}
