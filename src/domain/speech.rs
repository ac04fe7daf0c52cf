//! Transcription and speech synthesis collaborator traits
//!
//! Implementations live outside this crate; the voice pipeline only
//! depends on these interfaces.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Result of transcribing an audio clip.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    /// Language the transcriber settled on, if reported.
    pub language: Option<String>,
}

/// Synthesized speech audio.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub audio: Vec<u8>,
    pub sample_rate: u32,
}

/// Trait for speech-to-text services (Whisper, etc.)
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    async fn transcribe(
        &self,
        audio: &[u8],
        language_hint: Option<&str>,
    ) -> Result<Transcript, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

/// Trait for text-to-speech services
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
