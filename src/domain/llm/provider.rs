use async_trait::async_trait;
use std::fmt::Debug;

use super::Message;
use crate::domain::DomainError;

/// Trait for the external generative model (OpenAI, etc.)
///
/// The orchestrator applies its own timeout around `complete`; providers
/// are free to carry a transport-level timeout as well.
#[async_trait]
pub trait GenerativeModel: Send + Sync + Debug {
    /// Produce a completion for the given message context.
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    pub struct MockGenerativeModel {
        name: &'static str,
        reply: String,
        error: Option<String>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockGenerativeModel {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                reply: "mock-response".to_string(),
                error: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
            self.reply = reply.into();
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerativeModel for MockGenerativeModel {
        async fn complete(
            &self,
            _model: &str,
            _messages: &[Message],
        ) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            Ok(self.reply.clone())
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
