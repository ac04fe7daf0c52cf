use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, GenerativeModel, Message};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

/// OpenAI chat-completions generator
#[derive(Debug)]
pub struct OpenAiGenerator<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiGenerator<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, messages: &[Message]) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "messages": messages,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        Ok(choice
            .message
            .content
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

#[async_trait]
impl<C: HttpClientTrait> GenerativeModel for OpenAiGenerator<C> {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(model, messages);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

// OpenAI API types

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/chat/completions";

    #[tokio::test]
    async fn test_complete_returns_trimmed_content() {
        let mock_response = serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "  Hello! How can I help you?\n"
                },
                "finish_reason": "stop"
            }]
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let generator = OpenAiGenerator::new(client, "test-api-key");

        let messages = vec![Message::user("Hello!")];
        let reply = generator.complete("gpt-3.5-turbo", &messages).await.unwrap();

        assert_eq!(reply, "Hello! How can I help you?");
    }

    #[tokio::test]
    async fn test_complete_no_choices() {
        let client = MockHttpClient::new()
            .with_response(TEST_URL, serde_json::json!({ "choices": [] }));
        let generator = OpenAiGenerator::new(client, "test-api-key");

        let result = generator
            .complete("gpt-3.5-turbo", &[Message::user("hi")])
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_complete_http_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "API key invalid");
        let generator = OpenAiGenerator::new(client, "invalid-key");

        let result = generator
            .complete("gpt-3.5-turbo", &[Message::user("hi")])
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let custom_url = "http://localhost:8080/v1/chat/completions";
        let mock_response = serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Custom response" }
            }]
        });

        let client = MockHttpClient::new().with_response(custom_url, mock_response);
        let generator =
            OpenAiGenerator::with_base_url(client, "test-key", "http://localhost:8080/");

        let reply = generator
            .complete("gpt-3.5-turbo", &[Message::user("Test")])
            .await
            .unwrap();

        assert_eq!(reply, "Custom response");
    }
}
