//! Chat orchestration
//!
//! Implements the cache-first flow: look up the semantic cache, fall back to
//! the generative model on a miss, learn the fresh response when enabled,
//! and record the exchange in conversation history. Requests for the same
//! conversation id are serialized end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    DomainError, Exchange, GenerativeModel, Message, Settings, VectorIndex,
};
use crate::infrastructure::conversation::ConversationStore;
use crate::infrastructure::services::cache_service::SemanticCacheService;
use crate::infrastructure::settings::SettingsRegistry;

/// Exchanges of prior history included in the generator context.
const CONTEXT_WINDOW: usize = 10;

/// Reply returned when the generator fails or times out. Never learned into
/// the cache.
pub const FALLBACK_TEXT: &str =
    "Sorry, something went wrong while generating a response. Please try again.";

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Keep responses concise but informative.";

const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Generator,
    Error,
}

/// Outcome of one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub text: String,
    pub source: ResponseSource,
    pub conversation_id: String,
    pub latency_ms: u64,
}

#[derive(Debug)]
pub struct ChatService {
    cache: Arc<SemanticCacheService>,
    conversations: Arc<ConversationStore>,
    settings: Arc<SettingsRegistry>,
    generator: Arc<dyn GenerativeModel>,
    system_prompt: String,
    generator_timeout: Duration,
    // One async mutex per live conversation id; the outer lock only guards
    // the registry itself.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ChatService {
    pub fn builder() -> ChatServiceBuilder {
        ChatServiceBuilder::default()
    }

    pub fn cache(&self) -> &Arc<SemanticCacheService> {
        &self.cache
    }

    pub fn conversations(&self) -> &Arc<ConversationStore> {
        &self.conversations
    }

    pub fn settings(&self) -> &Arc<SettingsRegistry> {
        &self.settings
    }

    fn conversation_lock(&self, id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Run one chat turn. A missing conversation id starts a fresh
    /// conversation under a generated id.
    pub async fn chat(
        &self,
        input: &str,
        conversation_id: Option<String>,
    ) -> Result<ChatOutcome, DomainError> {
        let conversation_id =
            conversation_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let lock = self.conversation_lock(&conversation_id);
        let _guard = lock.lock().await;

        let started = Instant::now();
        let settings = self.settings.get();

        let lookup = match self
            .cache
            .search(input, settings.similarity_threshold)
            .await
        {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "Cache lookup failed, falling through to generator"
                );
                None
            }
        };

        let (text, source) = match lookup {
            Some(hit) => {
                info!(
                    conversation_id = %conversation_id,
                    similarity = hit.similarity,
                    "Answering from semantic cache"
                );
                (hit.response, ResponseSource::Cache)
            }
            None => self.generate(input, &conversation_id, &settings).await?,
        };

        self.conversations
            .append(&conversation_id, Exchange::new(input, text.clone()))?;

        Ok(ChatOutcome {
            text,
            source,
            conversation_id,
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn generate(
        &self,
        input: &str,
        conversation_id: &str,
        settings: &Settings,
    ) -> Result<(String, ResponseSource), DomainError> {
        let messages = self.build_context(input, conversation_id)?;

        let completion = tokio::time::timeout(
            self.generator_timeout,
            self.generator.complete(&settings.model, &messages),
        )
        .await;

        match completion {
            Ok(Ok(reply)) => {
                debug!(
                    conversation_id = %conversation_id,
                    model = %settings.model,
                    "Generated fresh response"
                );

                if settings.learning_enabled {
                    // Learning failures never fail the turn.
                    if let Err(e) = self.cache.insert(input, &reply, conversation_id).await {
                        warn!(error = %e, "Failed to learn generated response");
                    }
                }

                Ok((reply, ResponseSource::Generator))
            }
            Ok(Err(e)) => {
                warn!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "Generator failed, returning fallback"
                );
                Ok((FALLBACK_TEXT.to_string(), ResponseSource::Error))
            }
            Err(_) => {
                warn!(
                    conversation_id = %conversation_id,
                    timeout_secs = self.generator_timeout.as_secs(),
                    "Generator timed out, returning fallback"
                );
                Ok((FALLBACK_TEXT.to_string(), ResponseSource::Error))
            }
        }
    }

    /// System prompt, recent history as alternating user/assistant messages,
    /// then the current input.
    fn build_context(
        &self,
        input: &str,
        conversation_id: &str,
    ) -> Result<Vec<Message>, DomainError> {
        let window = self.conversations.window(conversation_id, CONTEXT_WINDOW)?;

        let mut messages = Vec::with_capacity(window.len() * 2 + 2);
        messages.push(Message::system(&self.system_prompt));

        for exchange in &window {
            messages.push(Message::user(exchange.user_text()));
            messages.push(Message::assistant(exchange.assistant_text()));
        }

        messages.push(Message::user(input));

        Ok(messages)
    }

    /// Remove a conversation and its lock entry. Returns whether the
    /// conversation existed.
    pub fn delete_conversation(&self, id: &str) -> Result<bool, DomainError> {
        let removed = self.conversations.delete(id)?;

        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // Only drop the mutex when no in-flight turn still holds it, so a
        // turn arriving after the delete keeps serializing against the
        // in-flight one instead of minting a fresh mutex.
        if locks.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(id);
        }

        Ok(removed)
    }

    pub fn clear_conversations(&self) -> Result<(), DomainError> {
        self.conversations.clear_all()?;

        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ChatServiceBuilder {
    index: Option<Arc<dyn VectorIndex>>,
    generator: Option<Arc<dyn GenerativeModel>>,
    settings: Option<Arc<SettingsRegistry>>,
    conversations: Option<Arc<ConversationStore>>,
    system_prompt: Option<String>,
    generator_timeout: Option<Duration>,
}

impl ChatServiceBuilder {
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn GenerativeModel>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn settings(mut self, settings: Arc<SettingsRegistry>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn conversations(mut self, conversations: Arc<ConversationStore>) -> Self {
        self.conversations = Some(conversations);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn generator_timeout(mut self, timeout: Duration) -> Self {
        self.generator_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ChatService, DomainError> {
        let index = self
            .index
            .ok_or_else(|| DomainError::not_initialized("vector index"))?;
        let generator = self
            .generator
            .ok_or_else(|| DomainError::not_initialized("generative model"))?;

        Ok(ChatService {
            cache: Arc::new(SemanticCacheService::new(index)),
            conversations: self.conversations.unwrap_or_default(),
            settings: self.settings.unwrap_or_default(),
            generator,
            system_prompt: self
                .system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            generator_timeout: self.generator_timeout.unwrap_or(DEFAULT_GENERATOR_TIMEOUT),
            locks: Mutex::new(HashMap::new()),
        })
    }
}
