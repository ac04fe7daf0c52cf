//! Application services

pub mod cache_service;
pub mod chat_service;
pub mod stats_service;
pub mod voice_service;

pub use cache_service::SemanticCacheService;
pub use chat_service::{ChatOutcome, ChatService, ChatServiceBuilder, ResponseSource, FALLBACK_TEXT};
pub use stats_service::{StatsService, StatsSnapshot};
pub use voice_service::{VoiceChatOutcome, VoiceChatService};
