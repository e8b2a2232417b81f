//! HTTP voice engine: `POST /voice/transcribe` with the concatenated audio
//! frames; the response is `{"transcript": "..."}`.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::ports::{AudioStream, SpeechError, VoiceEngine};

use super::{BackendClient, HttpFailure};

#[derive(Debug, Deserialize)]
struct TranscriptBody {
    transcript: String,
}

#[derive(Debug, Clone)]
pub struct HttpVoiceEngine {
    client: BackendClient,
}

impl HttpVoiceEngine {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

fn speech_error(failure: HttpFailure) -> SpeechError {
    match failure {
        HttpFailure::Timeout { timeout_secs } => SpeechError::Timeout { timeout_secs },
        HttpFailure::Connect(message) => SpeechError::Network(message),
        HttpFailure::Decode(message) => SpeechError::Parse(message),
        HttpFailure::Status { status, body, .. } => match status {
            422 => SpeechError::NoSpeech,
            429 | 500..=599 => {
                SpeechError::Unavailable(format!("Server error {}: {}", status, body))
            }
            _ => SpeechError::Parse(format!("Unexpected status {}: {}", status, body)),
        },
    }
}

#[async_trait]
impl VoiceEngine for HttpVoiceEngine {
    async fn transcribe(&self, audio: AudioStream) -> Result<String, SpeechError> {
        let bytes: Vec<u8> = audio.concat().await;
        if bytes.is_empty() {
            return Err(SpeechError::NoSpeech);
        }
        let request = self
            .client
            .post("voice/transcribe")
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        let body: TranscriptBody = self
            .client
            .send_json(request)
            .await
            .map_err(speech_error)?;

        let transcript = body.transcript.trim().to_string();
        if transcript.is_empty() {
            return Err(SpeechError::NoSpeech);
        }
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::BackendConfig;
    use futures::stream;

    #[test]
    fn status_mapping() {
        let status = |s| HttpFailure::Status {
            status: s,
            body: String::new(),
            retry_after_secs: None,
        };
        assert_eq!(speech_error(status(422)), SpeechError::NoSpeech);
        assert!(speech_error(status(502)).is_transient());
        assert!(!speech_error(status(400)).is_transient());
    }

    #[tokio::test]
    async fn empty_audio_never_hits_the_network() {
        let client = BackendClient::new(BackendConfig::new("http://127.0.0.1:9", "k")).unwrap();
        let engine = HttpVoiceEngine::new(client);
        let audio: AudioStream = Box::pin(stream::iter(Vec::<Vec<u8>>::new()));
        assert_eq!(engine.transcribe(audio).await, Err(SpeechError::NoSpeech));
    }
}
