//! Voice chat pipeline: transcribe, chat, synthesize
//!
//! Unlike the cache and generator paths, speech failures are not degraded;
//! without a transcript there is nothing to answer, and without audio there
//! is nothing to play.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, SpeechSynthesizer, SynthesizedAudio, Transcriber};
use crate::infrastructure::services::chat_service::{ChatOutcome, ChatService};

#[derive(Debug)]
pub struct VoiceChatService {
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    chat: Arc<ChatService>,
}

/// Outcome of one voice turn.
#[derive(Debug)]
pub struct VoiceChatOutcome {
    pub user_text: String,
    pub reply: ChatOutcome,
    pub audio: SynthesizedAudio,
}

impl VoiceChatService {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        chat: Arc<ChatService>,
    ) -> Self {
        Self {
            transcriber,
            synthesizer,
            chat,
        }
    }

    pub async fn voice_chat(
        &self,
        audio: &[u8],
        language_hint: Option<&str>,
        conversation_id: Option<String>,
    ) -> Result<VoiceChatOutcome, DomainError> {
        let transcript = self.transcriber.transcribe(audio, language_hint).await?;

        info!(
            provider = self.transcriber.provider_name(),
            language = ?transcript.language,
            "Transcribed voice input"
        );

        let reply = self.chat.chat(&transcript.text, conversation_id).await?;
        let audio = self.synthesizer.synthesize(&reply.text).await?;

        Ok(VoiceChatOutcome {
            user_text: transcript.text,
            reply,
            audio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockGenerativeModel;
    use crate::domain::speech::mock::{MockSpeechSynthesizer, MockTranscriber};
    use crate::infrastructure::services::chat_service::ResponseSource;
    use crate::infrastructure::vector_index::InMemoryVectorIndex;

    fn chat_service(reply: &str) -> Arc<ChatService> {
        Arc::new(
            ChatService::builder()
                .index(Arc::new(InMemoryVectorIndex::new()))
                .generator(Arc::new(MockGenerativeModel::new("mock").with_reply(reply)))
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_voice_chat_full_pipeline() {
        let service = VoiceChatService::new(
            Arc::new(MockTranscriber::new("what time is it?")),
            Arc::new(MockSpeechSynthesizer::new(24_000)),
            chat_service("half past nine"),
        );

        let outcome = service
            .voice_chat(b"fake-audio", Some("en"), Some("c1".to_string()))
            .await
            .unwrap();

        assert_eq!(outcome.user_text, "what time is it?");
        assert_eq!(outcome.reply.text, "half past nine");
        assert_eq!(outcome.reply.source, ResponseSource::Generator);
        assert_eq!(outcome.audio.audio, b"half past nine");
        assert_eq!(outcome.audio.sample_rate, 24_000);
    }

    #[tokio::test]
    async fn test_transcription_failure_propagates() {
        let service = VoiceChatService::new(
            Arc::new(MockTranscriber::new("").with_error("unintelligible audio")),
            Arc::new(MockSpeechSynthesizer::new(24_000)),
            chat_service("unused"),
        );

        let result = service.voice_chat(b"noise", None, None).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_synthesis_failure_propagates() {
        let service = VoiceChatService::new(
            Arc::new(MockTranscriber::new("hello")),
            Arc::new(MockSpeechSynthesizer::new(24_000).with_error("voice unavailable")),
            chat_service("hi"),
        );

        let result = service.voice_chat(b"fake-audio", None, None).await;

        assert!(result.is_err());
    }
}
