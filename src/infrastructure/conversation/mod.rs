//! Conversation persistence

mod store;

pub use store::ConversationStore;
