//! Semantic cache entries and the vector index trait

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A learned (question, response) pair. Immutable once inserted; the cache
/// supports insert and full reset only, never in-place update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    question: String,
    response: String,
    conversation_id: String,
    created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(
        question: impl Into<String>,
        response: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
            conversation_id: conversation_id.into(),
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp, e.g. when re-loading exported
    /// entries.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// An index match with its similarity score (0.0 to 1.0).
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    pub entry: CacheEntry,
    pub similarity: f32,
}

impl ScoredEntry {
    pub fn new(entry: CacheEntry, similarity: f32) -> Self {
        Self { entry, similarity }
    }
}

/// A cache hit as returned by the semantic cache adapter.
#[derive(Debug, Clone, Serialize)]
pub struct CacheHit {
    pub question: String,
    pub response: String,
    pub similarity: f32,
}

/// One row of a similar-questions listing. Unlike [`CacheHit`] this is not
/// filtered by the similarity threshold.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarQuestion {
    pub question: String,
    pub response: String,
    pub similarity: f32,
    pub created_at: DateTime<Utc>,
}

/// Trait over the opaque vector-similarity index backing the semantic cache.
///
/// Embedding computation and nearest-neighbor search live behind this
/// boundary; the adapter only sees ranked, scored entries.
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Return up to `k` entries ranked by similarity to `text`, best first.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredEntry>, DomainError>;

    /// Store a new entry.
    async fn insert(&self, entry: CacheEntry) -> Result<(), DomainError>;

    /// Clear all entries.
    async fn reset(&self) -> Result<(), DomainError>;

    /// Get the number of entries.
    async fn count(&self) -> Result<usize, DomainError>;

    /// Snapshot of all stored entries, for export.
    async fn entries(&self) -> Result<Vec<CacheEntry>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Index that fails every call with a transient error, for exercising
    /// the degrade-to-miss paths.
    #[derive(Debug)]
    pub struct FailingVectorIndex;

    #[async_trait]
    impl VectorIndex for FailingVectorIndex {
        async fn query(&self, _text: &str, _k: usize) -> Result<Vec<ScoredEntry>, DomainError> {
            Err(DomainError::transient("index unreachable"))
        }

        async fn insert(&self, _entry: CacheEntry) -> Result<(), DomainError> {
            Err(DomainError::transient("index unreachable"))
        }

        async fn reset(&self) -> Result<(), DomainError> {
            Err(DomainError::transient("index unreachable"))
        }

        async fn count(&self) -> Result<usize, DomainError> {
            Err(DomainError::transient("index unreachable"))
        }

        async fn entries(&self) -> Result<Vec<CacheEntry>, DomainError> {
            Err(DomainError::transient("index unreachable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_creation() {
        let entry = CacheEntry::new("hello", "hi there", "conv-1");

        assert_eq!(entry.question(), "hello");
        assert_eq!(entry.response(), "hi there");
        assert_eq!(entry.conversation_id(), "conv-1");
    }

    #[test]
    fn test_cache_entry_round_trips_through_json() {
        let entry = CacheEntry::new("q", "r", "conv-1");
        let json = serde_json::to_string(&entry).unwrap();
        let back: CacheEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(back.question(), "q");
        assert_eq!(back.created_at(), entry.created_at());
    }
}
