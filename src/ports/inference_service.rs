//! Inference service port - turns an image into a therapy recommendation.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::therapy::TherapyRecommendation;

use super::ImageBlob;

/// Image analysis backend.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Analyzes the image and suggests a therapy.
    async fn analyze(&self, image: &ImageBlob) -> Result<TherapyRecommendation, InferenceError>;
}

/// Inference errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// Model could not find a treatable area in the image.
    #[error("no treatable area detected")]
    NothingDetected,

    /// Image rejected by the service (size, format).
    #[error("image rejected: {0}")]
    ImageRejected(String),

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("inference service unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Failed to parse the service response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl InferenceError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            InferenceError::RateLimited { .. }
                | InferenceError::Unavailable(_)
                | InferenceError::Network(_)
                | InferenceError::Timeout { .. }
        )
    }
}

impl From<InferenceError> for DomainError {
    fn from(err: InferenceError) -> Self {
        match &err {
            InferenceError::NothingDetected | InferenceError::ImageRejected(_) => {
                DomainError::validation("image", err.to_string())
            }
            _ => DomainError::collaborator_unavailable("inference", err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn inference_service_is_object_safe() {
        fn _accepts_dyn(_: &dyn InferenceService) {}
    }

    #[test]
    fn timeouts_are_transient_rejections_are_not() {
        assert!(InferenceError::Timeout { timeout_secs: 30 }.is_transient());
        assert!(!InferenceError::NothingDetected.is_transient());
        assert!(!InferenceError::Parse("eof".into()).is_transient());
    }

    #[test]
    fn parse_failure_still_offers_retry() {
        let err: DomainError = InferenceError::Parse("eof".into()).into();
        assert_eq!(err.code, ErrorCode::CollaboratorUnavailable);
    }
}
