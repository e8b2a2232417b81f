//! HTTP inference service: `POST /inference/analyze` with the raw image as
//! the body; the response is a `TherapyRecommendation` as JSON.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::domain::therapy::TherapyRecommendation;
use crate::ports::{ImageBlob, InferenceError, InferenceService};

use super::{BackendClient, HttpFailure};

#[derive(Debug, Clone)]
pub struct HttpInferenceService {
    client: BackendClient,
}

impl HttpInferenceService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

fn inference_error(failure: HttpFailure) -> InferenceError {
    match failure {
        HttpFailure::Timeout { timeout_secs } => InferenceError::Timeout { timeout_secs },
        HttpFailure::Connect(message) => InferenceError::Network(message),
        HttpFailure::Decode(message) => InferenceError::Parse(message),
        HttpFailure::Status {
            status,
            body,
            retry_after_secs,
        } => match status {
            422 => InferenceError::NothingDetected,
            400 | 413 | 415 => InferenceError::ImageRejected(body),
            429 => InferenceError::RateLimited {
                retry_after_secs: retry_after_secs.unwrap_or(30),
            },
            500..=599 => {
                InferenceError::Unavailable(format!("Server error {}: {}", status, body))
            }
            _ => InferenceError::Parse(format!("Unexpected status {}: {}", status, body)),
        },
    }
}

#[async_trait]
impl InferenceService for HttpInferenceService {
    async fn analyze(&self, image: &ImageBlob) -> Result<TherapyRecommendation, InferenceError> {
        let request = self
            .client
            .post("inference/analyze")
            .header(CONTENT_TYPE, image.mime_type())
            .body(image.bytes().to_vec());
        self.client
            .send_json(request)
            .await
            .map_err(inference_error)
    }
}
