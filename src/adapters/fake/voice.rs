use std::sync::RwLock;

use async_trait::async_trait;
use futures::StreamExt;

use crate::ports::{AudioStream, SpeechError, VoiceEngine};

use super::FailureQueue;

/// Returns a scripted transcript for any non-empty audio.
#[derive(Debug)]
pub struct FakeVoiceEngine {
    transcript: RwLock<String>,
    failures: FailureQueue<SpeechError>,
}

impl Default for FakeVoiceEngine {
    fn default() -> Self {
        Self::new("show my therapy report")
    }
}

impl FakeVoiceEngine {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: RwLock::new(transcript.into()),
            failures: FailureQueue::default(),
        }
    }

    pub fn set_transcript(&self, transcript: impl Into<String>) {
        *self.transcript.write().unwrap() = transcript.into();
    }

    pub fn with_failures(self, error: SpeechError, times: usize) -> Self {
        self.failures.push(error, times);
        self
    }
}

#[async_trait]
impl VoiceEngine for FakeVoiceEngine {
    async fn transcribe(&self, audio: AudioStream) -> Result<String, SpeechError> {
        let bytes = audio.map(|frame| frame.len()).fold(0, |acc, n| async move { acc + n }).await;
        if let Some(error) = self.failures.next() {
            return Err(error);
        }
        if bytes == 0 {
            return Err(SpeechError::NoSpeech);
        }
        Ok(self.transcript.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn audio(frames: Vec<Vec<u8>>) -> AudioStream {
        Box::pin(stream::iter(frames))
    }

    #[tokio::test]
    async fn transcribes_non_empty_audio() {
        let engine = FakeVoiceEngine::new("open settings");
        let text = engine.transcribe(audio(vec![vec![1, 2], vec![3]])).await.unwrap();
        assert_eq!(text, "open settings");
    }

    #[tokio::test]
    async fn silence_is_no_speech() {
        let engine = FakeVoiceEngine::default();
        assert_eq!(
            engine.transcribe(audio(vec![])).await,
            Err(SpeechError::NoSpeech)
        );
    }
}
