//! Semantic cache adapter
//!
//! Sits between the chat orchestrator and the vector index: applies the
//! similarity threshold, breaks ties, and degrades transient index failures
//! to cache misses so the generator path still runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::{CacheEntry, CacheHit, DomainError, SimilarQuestion, VectorIndex};

/// How many candidates to pull from the index per lookup.
const SEARCH_CANDIDATES: usize = 5;

#[derive(Debug)]
pub struct SemanticCacheService {
    index: Arc<dyn VectorIndex>,
}

impl SemanticCacheService {
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }

    /// Look up the best entry at or above `threshold`. Transient index
    /// failures degrade to a miss.
    pub async fn search(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Option<CacheHit>, DomainError> {
        let candidates = match self.index.query(query, SEARCH_CANDIDATES).await {
            Ok(candidates) => candidates,
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Cache lookup failed, treating as miss");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let best = candidates
            .into_iter()
            .filter(|scored| scored.similarity >= threshold)
            .max_by(|a, b| {
                a.similarity
                    .partial_cmp(&b.similarity)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.entry.created_at().cmp(&b.entry.created_at()))
            });

        Ok(best.map(|scored| {
            debug!(
                similarity = scored.similarity,
                threshold, "Semantic cache hit"
            );

            CacheHit {
                question: scored.entry.question().to_string(),
                response: scored.entry.response().to_string(),
                similarity: scored.similarity,
            }
        }))
    }

    /// List the `limit` closest stored questions regardless of threshold,
    /// best first. Transient index failures degrade to an empty listing.
    pub async fn similar(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SimilarQuestion>, DomainError> {
        let candidates = match self.index.query(query, limit).await {
            Ok(candidates) => candidates,
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Similar-questions lookup failed, returning empty listing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(candidates
            .into_iter()
            .map(|scored| SimilarQuestion {
                question: scored.entry.question().to_string(),
                response: scored.entry.response().to_string(),
                similarity: scored.similarity,
                created_at: scored.entry.created_at(),
            })
            .collect())
    }

    /// Learn a new (question, response) pair. Returns whether the entry was
    /// stored; transient index failures degrade to `false`.
    pub async fn insert(
        &self,
        question: &str,
        response: &str,
        conversation_id: &str,
    ) -> Result<bool, DomainError> {
        let entry = CacheEntry::new(question, response, conversation_id);

        match self.index.insert(entry).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Failed to learn response, continuing without caching");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn reset(&self) -> Result<(), DomainError> {
        self.index.reset().await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.index.count().await
    }

    pub async fn export(&self) -> Result<Vec<CacheEntry>, DomainError> {
        self.index.entries().await
    }

    /// Write all cache entries to `path` as pretty-printed JSON. Returns the
    /// number of entries exported.
    pub async fn export_to_file(&self, path: impl AsRef<Path>) -> Result<usize, DomainError> {
        let entries = self.index.entries().await?;
        let json = serde_json::to_vec_pretty(&entries)
            .map_err(|e| DomainError::internal(format!("failed to serialize cache: {e}")))?;

        tokio::fs::write(path.as_ref(), json)
            .await
            .map_err(|e| DomainError::internal(format!("failed to write cache export: {e}")))?;

        Ok(entries.len())
    }

    /// Export under a timestamped `chat_backup_YYYYmmdd_HHMMSS.json` name in
    /// `dir`. Returns the path written and the number of entries.
    pub async fn export_default(
        &self,
        dir: impl AsRef<Path>,
    ) -> Result<(PathBuf, usize), DomainError> {
        let name = format!("chat_backup_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
        let path = dir.as_ref().join(name);
        let exported = self.export_to_file(&path).await?;

        Ok((path, exported))
    }
}
