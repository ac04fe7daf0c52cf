//! Domain layer: core types, collaborator traits, and errors
//!
//! Nothing in this module performs I/O; implementations live in
//! [`crate::infrastructure`].

pub mod conversation;
pub mod error;
pub mod llm;
pub mod semantic_cache;
pub mod settings;
pub mod speech;

pub use conversation::{Conversation, Exchange};
pub use error::DomainError;
pub use llm::{GenerativeModel, Message, MessageRole};
pub use semantic_cache::{CacheEntry, CacheHit, ScoredEntry, SimilarQuestion, VectorIndex};
pub use settings::{RejectedField, Settings, SettingsUpdate, SettingsUpdateOutcome};
pub use speech::{SpeechSynthesizer, SynthesizedAudio, Transcriber, Transcript};
