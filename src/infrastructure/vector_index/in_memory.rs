//! In-memory vector index with deterministic text embeddings
//!
//! Embeds text as a hashed bag of byte bigrams and ranks entries by cosine
//! similarity. Identical text always scores 1.0; unrelated text scores low.
//! Linear scan, suitable for development and testing.

use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{CacheEntry, DomainError, ScoredEntry, VectorIndex};

const EMBEDDING_DIMENSIONS: usize = 256;

#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    entries: RwLock<Vec<(Vec<f32>, CacheEntry)>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Hash each byte bigram of the lowercased text into a fixed-size bucket
/// vector. Whitespace-only text embeds to the zero vector.
fn embed(text: &str) -> Vec<f32> {
    let normalized = text.trim().to_lowercase();
    let bytes = normalized.as_bytes();
    let mut vector = vec![0.0_f32; EMBEDDING_DIMENSIONS];

    for pair in bytes.windows(2) {
        let bucket = (fnv1a(pair) as usize) % EMBEDDING_DIMENSIONS;
        vector[bucket] += 1.0;
    }

    // Single-byte inputs have no bigrams but should still embed.
    if bytes.len() == 1 {
        let bucket = (fnv1a(bytes) as usize) % EMBEDDING_DIMENSIONS;
        vector[bucket] += 1.0;
    }

    vector
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredEntry>, DomainError> {
        let query_vector = embed(text);

        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(format!("index lock poisoned: {e}")))?;

        let mut scored: Vec<ScoredEntry> = entries
            .iter()
            .map(|(vector, entry)| {
                ScoredEntry::new(entry.clone(), cosine_similarity(&query_vector, vector))
            })
            .collect();

        // Best similarity first; ties broken by most recent entry.
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.entry.created_at().cmp(&a.entry.created_at()))
        });
        scored.truncate(k);

        debug!(
            candidates = scored.len(),
            "Vector index query scored {} entries",
            entries.len()
        );

        Ok(scored)
    }

    async fn insert(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let vector = embed(entry.question());

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(format!("index lock poisoned: {e}")))?;

        entries.push((vector, entry));

        Ok(())
    }

    async fn reset(&self) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(format!("index lock poisoned: {e}")))?;

        entries.clear();

        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(format!("index lock poisoned: {e}")))?;

        Ok(entries.len())
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(format!("index lock poisoned: {e}")))?;

        Ok(entries.iter().map(|(_, entry)| entry.clone()).collect())
    }
}
