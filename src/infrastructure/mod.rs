//! Infrastructure layer: concrete implementations of the domain traits and
//! the services that orchestrate them.

pub mod conversation;
pub mod llm;
pub mod logging;
pub mod services;
pub mod settings;
pub mod vector_index;

pub use conversation::ConversationStore;
pub use llm::{HttpClient, OpenAiGenerator};
pub use settings::SettingsRegistry;
pub use vector_index::InMemoryVectorIndex;
