//! Voice engine port - speech to text for the voice assistant.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::domain::foundation::DomainError;

/// Raw audio frames from the microphone, in capture order.
pub type AudioStream = Pin<Box<dyn Stream<Item = Vec<u8>> + Send>>;

/// Speech recognition backend.
#[async_trait]
pub trait VoiceEngine: Send + Sync {
    /// Consumes the stream and returns the recognized text.
    async fn transcribe(&self, audio: AudioStream) -> Result<String, SpeechError>;
}

/// Speech errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("microphone permission denied")]
    PermissionDenied,

    /// Audio contained no recognizable speech.
    #[error("no speech detected")]
    NoSpeech,

    #[error("speech service unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("parse error: {0}")]
    Parse(String),
}

impl SpeechError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SpeechError::Unavailable(_) | SpeechError::Network(_) | SpeechError::Timeout { .. }
        )
    }
}

impl From<SpeechError> for DomainError {
    fn from(err: SpeechError) -> Self {
        match &err {
            SpeechError::PermissionDenied => DomainError::permission_denied("microphone"),
            SpeechError::NoSpeech => DomainError::validation("audio", err.to_string()),
            _ => DomainError::collaborator_unavailable("voice", err.to_string()),
        }
    }
}
