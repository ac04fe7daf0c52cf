//! Application configuration
//!
//! Layered: `config/default` then `config/local`, both optional, then
//! environment variables with the `APP__` prefix (e.g.
//! `APP__CHAT__SIMILARITY_THRESHOLD=0.9`).

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::domain::{DomainError, Settings};

fn default_similarity_threshold() -> f32 {
    0.8
}

fn default_learning_enabled() -> bool {
    true
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant. Keep responses concise but informative.".to_string()
}

fn default_generator_timeout_secs() -> u64 {
    30
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat orchestration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    #[serde(default = "default_learning_enabled")]
    pub learning_enabled: bool,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Hard deadline applied around each generative call.
    #[serde(default = "default_generator_timeout_secs")]
    pub generator_timeout_secs: u64,
}

impl ChatConfig {
    /// Initial runtime settings derived from configuration.
    pub fn settings(&self) -> Settings {
        Settings {
            similarity_threshold: self.similarity_threshold,
            learning_enabled: self.learning_enabled,
            model: self.model.clone(),
        }
    }

    pub fn generator_timeout(&self) -> Duration {
        Duration::from_secs(self.generator_timeout_secs)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            learning_enabled: default_learning_enabled(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            generator_timeout_secs: default_generator_timeout_secs(),
        }
    }
}

/// OpenAI provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "LoggingConfig::default_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    fn default_format() -> LogFormat {
        LogFormat::Pretty
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: Self::default_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, DomainError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DomainError::configuration(format!("failed to load config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| DomainError::configuration(format!("invalid config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_defaults() {
        let chat = ChatConfig::default();

        assert!((chat.similarity_threshold - 0.8).abs() < f32::EPSILON);
        assert!(chat.learning_enabled);
        assert_eq!(chat.model, "gpt-3.5-turbo");
        assert_eq!(chat.generator_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_settings_derived_from_chat_config() {
        let chat = ChatConfig {
            similarity_threshold: 0.65,
            learning_enabled: false,
            ..ChatConfig::default()
        };
        let settings = chat.settings();

        assert!((settings.similarity_threshold - 0.65).abs() < f32::EPSILON);
        assert!(!settings.learning_enabled);
    }

    #[test]
    fn test_openai_config_defaults() {
        let openai = OpenAiConfig::default();

        assert!(openai.api_key.is_none());
        assert_eq!(openai.base_url, "https://api.openai.com");
    }
}
