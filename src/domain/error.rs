use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// The cache index or the generator was unreachable or timed out.
    /// Never fatal: cache errors degrade to a miss, generator errors
    /// degrade to the fixed fallback response.
    #[error("Transient I/O error: {message}")]
    Transient { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A required collaborator was absent at call time.
    #[error("Not initialized: {message}")]
    NotInitialized { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_initialized(message: impl Into<String>) -> Self {
        Self::NotInitialized {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this failure may be degraded (miss / fallback) rather than
    /// surfaced. Provider failures count: from this layer's point of view a
    /// misbehaving collaborator is indistinguishable from an unreachable one.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Provider { .. })
    }
}
