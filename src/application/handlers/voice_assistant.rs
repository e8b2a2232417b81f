//! VoiceAssistantHandler - transcribes a recording and maps the words to a
//! dashboard destination.

use std::collections::HashMap;
use std::sync::Arc;

use futures::{stream, StreamExt};
use once_cell::sync::Lazy;
use tracing::{debug, info, instrument};

use crate::application::in_flight::InFlight;
use crate::application::retry::{retry_transient, RetryConfig};
use crate::domain::foundation::DomainError;
use crate::domain::navigation::ScreenKey;
use crate::ports::{AudioStream, SpeechError, VoiceEngine};

/// Spoken keyword to destination screen.
static VOICE_ROUTES: Lazy<HashMap<&'static str, ScreenKey>> = Lazy::new(|| {
    HashMap::from([
        ("report", ScreenKey::Reports),
        ("reports", ScreenKey::Reports),
        ("progress", ScreenKey::Reports),
        ("settings", ScreenKey::Settings),
        ("setting", ScreenKey::Settings),
        ("notifications", ScreenKey::Notifications),
        ("notification", ScreenKey::Notifications),
        ("alerts", ScreenKey::Notifications),
        ("device", ScreenKey::DeviceConnection),
        ("connect", ScreenKey::DeviceConnection),
        ("bluetooth", ScreenKey::DeviceConnection),
        ("features", ScreenKey::Features),
        ("analyze", ScreenKey::AiHome),
        ("analysis", ScreenKey::AiHome),
        ("scan", ScreenKey::AiHome),
        ("camera", ScreenKey::AiHome),
        ("home", ScreenKey::Dashboard),
        ("dashboard", ScreenKey::Dashboard),
    ])
});

/// Recognized utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCommand {
    pub transcript: String,
    /// Screen the words point at, if any keyword matched.
    pub target: Option<ScreenKey>,
}

/// First keyword in `transcript` that names a screen.
pub fn route_transcript(transcript: &str) -> Option<ScreenKey> {
    transcript
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .find_map(|word| VOICE_ROUTES.get(word.to_lowercase().as_str()).copied())
}

pub struct VoiceAssistantHandler {
    engine: Arc<dyn VoiceEngine>,
    retry: RetryConfig,
    listening: InFlight,
}

impl VoiceAssistantHandler {
    pub fn new(engine: Arc<dyn VoiceEngine>, retry: RetryConfig) -> Self {
        Self {
            engine,
            retry,
            listening: InFlight::new("voice transcription"),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_pending()
    }

    /// Transcribes a finished recording.
    ///
    /// The frames are buffered first so a failed attempt can be replayed.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the recording holds no speech
    /// - `PermissionDenied` if the microphone was refused
    /// - `CollaboratorUnavailable` once retries are exhausted
    #[instrument(skip_all)]
    pub async fn listen(&self, audio: AudioStream) -> Result<VoiceCommand, DomainError> {
        let _token = self.listening.begin()?;
        let frames: Vec<Vec<u8>> = audio.collect().await;
        let bytes: usize = frames.iter().map(Vec::len).sum();
        debug!(frames = frames.len(), bytes, "recording captured");
        if bytes == 0 {
            return Err(SpeechError::NoSpeech.into());
        }

        let transcript = retry_transient(&self.retry, "transcribe", || {
            let replay: AudioStream = Box::pin(stream::iter(frames.clone()));
            self.engine.transcribe(replay)
        })
        .await?;

        let target = route_transcript(&transcript);
        info!(target = ?target, "voice command recognized");
        Ok(VoiceCommand { transcript, target })
    }
}
