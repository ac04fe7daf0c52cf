//! Semantic-cache backed conversational core.
//!
//! Cache-first chat orchestration: incoming questions are answered from a
//! semantic cache when a sufficiently similar question was seen before, and
//! fall back to a generative model otherwise. Fresh responses are learned
//! into the cache, conversation history is bounded per conversation, and
//! settings are tunable at runtime.

pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

pub use config::AppConfig;
pub use domain::DomainError;
pub use infrastructure::services::{
    ChatOutcome, ChatService, ResponseSource, StatsService, VoiceChatService,
};
pub use infrastructure::{InMemoryVectorIndex, SettingsRegistry};

/// Wire a [`ChatService`] from configuration: OpenAI generator over reqwest
/// plus the in-memory vector index.
pub fn create_chat_service(config: &AppConfig) -> Result<ChatService, DomainError> {
    let api_key = config
        .openai
        .api_key
        .clone()
        .ok_or_else(|| DomainError::configuration("openai.api_key is not set"))?;

    let http_client =
        infrastructure::HttpClient::with_timeout(config.chat.generator_timeout())?;
    let generator = infrastructure::OpenAiGenerator::with_base_url(
        http_client,
        api_key,
        &config.openai.base_url,
    );

    ChatService::builder()
        .index(Arc::new(InMemoryVectorIndex::new()))
        .generator(Arc::new(generator))
        .settings(Arc::new(SettingsRegistry::new(config.chat.settings())))
        .system_prompt(&config.chat.system_prompt)
        .generator_timeout(config.chat.generator_timeout())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_chat_service_requires_api_key() {
        let config = AppConfig::default();
        let err = create_chat_service(&config).unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_create_chat_service_with_api_key() {
        let mut config = AppConfig::default();
        config.openai.api_key = Some("test-key".to_string());

        assert!(create_chat_service(&config).is_ok());
    }
}
