//! Runtime statistics

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{DomainError, Settings};
use crate::infrastructure::conversation::ConversationStore;
use crate::infrastructure::services::cache_service::SemanticCacheService;
use crate::infrastructure::settings::SettingsRegistry;

/// Point-in-time view of the system. Recomputed on every call, never cached.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub cached_entries: usize,
    pub active_conversations: usize,
    pub settings: Settings,
}

#[derive(Debug)]
pub struct StatsService {
    cache: Arc<SemanticCacheService>,
    conversations: Arc<ConversationStore>,
    settings: Arc<SettingsRegistry>,
}

impl StatsService {
    pub fn new(
        cache: Arc<SemanticCacheService>,
        conversations: Arc<ConversationStore>,
        settings: Arc<SettingsRegistry>,
    ) -> Self {
        Self {
            cache,
            conversations,
            settings,
        }
    }

    pub async fn snapshot(&self) -> Result<StatsSnapshot, DomainError> {
        Ok(StatsSnapshot {
            cached_entries: self.cache.count().await?,
            active_conversations: self.conversations.active_count()?,
            settings: self.settings.get(),
        })
    }
}
