use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{Conversation, DomainError, Exchange};

/// In-memory conversation store keyed by conversation id.
///
/// The trim policy lives in [`Conversation::push`]; this store only manages
/// the map of conversations and hands out cloned snapshots.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the conversation, creating an empty one if absent.
    pub fn get_or_create(&self, id: &str) -> Result<Conversation, DomainError> {
        let mut conversations = self
            .conversations
            .write()
            .map_err(|e| DomainError::internal(format!("conversation lock poisoned: {e}")))?;

        Ok(conversations
            .entry(id.to_string())
            .or_insert_with(|| Conversation::new(id))
            .clone())
    }

    pub fn get(&self, id: &str) -> Result<Option<Conversation>, DomainError> {
        let conversations = self
            .conversations
            .read()
            .map_err(|e| DomainError::internal(format!("conversation lock poisoned: {e}")))?;

        Ok(conversations.get(id).cloned())
    }

    /// Append an exchange, creating the conversation if needed.
    pub fn append(&self, id: &str, exchange: Exchange) -> Result<(), DomainError> {
        let mut conversations = self
            .conversations
            .write()
            .map_err(|e| DomainError::internal(format!("conversation lock poisoned: {e}")))?;

        conversations
            .entry(id.to_string())
            .or_insert_with(|| Conversation::new(id))
            .push(exchange);

        Ok(())
    }

    /// The last `n` exchanges of a conversation, oldest first. Unknown ids
    /// yield an empty window.
    pub fn window(&self, id: &str, n: usize) -> Result<Vec<Exchange>, DomainError> {
        let conversations = self
            .conversations
            .read()
            .map_err(|e| DomainError::internal(format!("conversation lock poisoned: {e}")))?;

        Ok(conversations
            .get(id)
            .map(|conversation| conversation.window(n).to_vec())
            .unwrap_or_default())
    }

    /// Remove a conversation. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut conversations = self
            .conversations
            .write()
            .map_err(|e| DomainError::internal(format!("conversation lock poisoned: {e}")))?;

        Ok(conversations.remove(id).is_some())
    }

    pub fn clear_all(&self) -> Result<(), DomainError> {
        let mut conversations = self
            .conversations
            .write()
            .map_err(|e| DomainError::internal(format!("conversation lock poisoned: {e}")))?;

        conversations.clear();

        Ok(())
    }

    pub fn active_count(&self) -> Result<usize, DomainError> {
        let conversations = self
            .conversations
            .read()
            .map_err(|e| DomainError::internal(format!("conversation lock poisoned: {e}")))?;

        Ok(conversations.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_starts_empty() {
        let store = ConversationStore::new();
        let conversation = store.get_or_create("conv-1").unwrap();

        assert!(conversation.is_empty());
        assert_eq!(store.active_count().unwrap(), 1);
    }

    #[test]
    fn test_append_creates_and_accumulates() {
        let store = ConversationStore::new();
        store.append("conv-1", Exchange::new("hi", "hello")).unwrap();
        store
            .append("conv-1", Exchange::new("how are you?", "fine"))
            .unwrap();

        let conversation = store.get("conv-1").unwrap().unwrap();
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.exchanges()[0].user_text(), "hi");
    }

    #[test]
    fn test_window_unknown_id_is_empty() {
        let store = ConversationStore::new();
        assert!(store.window("missing", 10).unwrap().is_empty());
    }

    #[test]
    fn test_trim_applies_through_store() {
        let store = ConversationStore::new();
        for i in 0..51 {
            store
                .append("conv-1", Exchange::new(format!("q{}", i), "a"))
                .unwrap();
        }

        let conversation = store.get("conv-1").unwrap().unwrap();
        assert_eq!(conversation.len(), 30);
        assert_eq!(conversation.exchanges()[0].user_text(), "q21");
    }

    #[test]
    fn test_delete_and_clear() {
        let store = ConversationStore::new();
        store.append("a", Exchange::new("q", "r")).unwrap();
        store.append("b", Exchange::new("q", "r")).unwrap();

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.active_count().unwrap(), 1);

        store.clear_all().unwrap();
        assert_eq!(store.active_count().unwrap(), 0);
    }
}
