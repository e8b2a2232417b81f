//! ImageAnalysisHandler - camera/upload, preview and inference for the
//! image-analysis sub-flow.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, instrument, warn};

use crate::application::in_flight::InFlight;
use crate::application::retry::{retry_transient, RetryConfig};
use crate::domain::foundation::DomainError;
use crate::domain::therapy::TherapyRecommendation;
use crate::ports::{ImageBlob, ImageCapture, ImageSource, InferenceService};

#[derive(Debug, Default)]
struct AnalysisState {
    preview: Option<ImageBlob>,
    result: Option<TherapyRecommendation>,
}

/// Holds the previewed image and the last recommendation.
pub struct ImageAnalysisHandler {
    capture: Arc<dyn ImageCapture>,
    inference: Arc<dyn InferenceService>,
    retry: RetryConfig,
    state: Mutex<AnalysisState>,
    analyzing: InFlight,
}

impl ImageAnalysisHandler {
    pub fn new(
        capture: Arc<dyn ImageCapture>,
        inference: Arc<dyn InferenceService>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            capture,
            inference,
            retry,
            state: Mutex::new(AnalysisState::default()),
            analyzing: InFlight::new("image analysis"),
        }
    }

    /// Takes a photo (camera screen) and holds it for preview.
    pub async fn take_photo(&self) -> Result<ImageBlob, DomainError> {
        self.acquire(ImageSource::Camera).await
    }

    /// Picks an image from the library (upload screen).
    pub async fn pick_image(&self) -> Result<ImageBlob, DomainError> {
        self.acquire(ImageSource::Library).await
    }

    pub fn preview(&self) -> Option<ImageBlob> {
        self.lock().preview.clone()
    }

    pub fn result(&self) -> Option<TherapyRecommendation> {
        self.lock().result.clone()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.is_pending()
    }

    /// Runs inference on the previewed image.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if nothing is being previewed, or the service
    ///   found nothing to treat
    /// - `OperationPending` if an analysis is already running
    /// - `CollaboratorUnavailable` once retries are exhausted
    #[instrument(skip_all)]
    pub async fn analyze(&self) -> Result<TherapyRecommendation, DomainError> {
        let image = self
            .preview()
            .ok_or_else(|| DomainError::validation("image", "No image selected"))?;
        let _token = self.analyzing.begin()?;

        info!(bytes = image.len(), source = ?image.source(), "analysis started");
        let recommendation = retry_transient(&self.retry, "analyze", || {
            self.inference.analyze(&image)
        })
        .await
        .map_err(|err| {
            warn!(error = %err, "analysis failed");
            DomainError::from(err)
        })?;

        info!(
            area = %recommendation.area,
            mode = %recommendation.mode,
            confidence = recommendation.confidence.value(),
            "analysis completed"
        );
        self.lock().result = Some(recommendation.clone());
        Ok(recommendation)
    }

    /// Drops the preview and any result (`cancel` back to `ai-home`).
    pub fn discard(&self) {
        *self.lock() = AnalysisState::default();
    }

    async fn acquire(&self, source: ImageSource) -> Result<ImageBlob, DomainError> {
        let image = retry_transient(&self.retry, "capture", || match source {
            ImageSource::Camera => self.capture.capture(),
            ImageSource::Library => self.capture.pick_from_library(),
        })
        .await?;

        let mut state = self.lock();
        state.preview = Some(image.clone());
        state.result = None;
        Ok(image)
    }

    fn lock(&self) -> MutexGuard<'_, AnalysisState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fake::{FakeImageCapture, FakeInferenceService};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::therapy::TherapyMode;
    use crate::ports::{CaptureError, InferenceError};
    use std::time::Duration;

    fn handler(
        capture: FakeImageCapture,
        inference: FakeInferenceService,
    ) -> ImageAnalysisHandler {
        ImageAnalysisHandler::new(Arc::new(capture), Arc::new(inference), RetryConfig::none())
    }

    #[tokio::test]
    async fn photo_then_analyze_yields_recommendation() {
        let h = handler(FakeImageCapture::new(), FakeInferenceService::new());
        let image = h.take_photo().await.unwrap();
        assert_eq!(image.source(), ImageSource::Camera);

        let rec = h.analyze().await.unwrap();
        assert_eq!(rec.mode, TherapyMode::Heat);
        assert_eq!(h.result(), Some(rec));
    }

    #[tokio::test]
    async fn analyze_without_preview_is_a_validation_error() {
        let h = handler(FakeImageCapture::new(), FakeInferenceService::new());
        let err = h.analyze().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn camera_refusal_maps_to_permission_denied() {
        let capture =
            FakeImageCapture::new().with_failures(CaptureError::permission_denied("camera"), 1);
        let h = handler(capture, FakeInferenceService::new());
        let err = h.take_photo().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(h.preview().is_none());
    }

    #[tokio::test]
    async fn library_pick_is_tagged_as_library() {
        let h = handler(FakeImageCapture::new(), FakeInferenceService::new());
        assert_eq!(h.pick_image().await.unwrap().source(), ImageSource::Library);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_inference_failure_is_retried() {
        let inference =
            FakeInferenceService::new().with_failures(InferenceError::Timeout { timeout_secs: 30 }, 2);
        let h = ImageAnalysisHandler::new(
            Arc::new(FakeImageCapture::new()),
            Arc::new(inference),
            RetryConfig::default(),
        );
        h.take_photo().await.unwrap();
        assert!(h.analyze().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_analyze_is_refused() {
        let inference = FakeInferenceService::new().with_delay(Duration::from_secs(1));
        let h = handler(FakeImageCapture::new(), inference);
        h.take_photo().await.unwrap();

        let (first, second) = tokio::join!(h.analyze(), h.analyze());
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err().code, ErrorCode::OperationPending);
    }

    #[tokio::test]
    async fn discard_clears_preview_and_result() {
        let h = handler(FakeImageCapture::new(), FakeInferenceService::new());
        h.take_photo().await.unwrap();
        h.analyze().await.unwrap();
        h.discard();
        assert!(h.preview().is_none());
        assert!(h.result().is_none());
    }
}
