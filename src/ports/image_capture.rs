//! Image capture port - camera and photo library access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ValidationError};

/// Where an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Camera,
    Library,
}

/// Encoded image bytes ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    bytes: Vec<u8>,
    mime_type: String,
    source: ImageSource,
}

impl ImageBlob {
    /// Wraps image bytes, rejecting empty payloads and non-image MIME types.
    pub fn new(
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
        source: ImageSource,
    ) -> Result<Self, ValidationError> {
        let mime_type = mime_type.into();
        if bytes.is_empty() {
            return Err(ValidationError::empty_field("image"));
        }
        if !mime_type.starts_with("image/") {
            return Err(ValidationError::invalid_format(
                "mime_type",
                format!("expected image/*, got {}", mime_type),
            ));
        }
        Ok(Self {
            bytes,
            mime_type,
            source,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Platform camera and photo picker.
#[async_trait]
pub trait ImageCapture: Send + Sync {
    /// Takes a photo with the camera.
    async fn capture(&self) -> Result<ImageBlob, CaptureError>;

    /// Lets the user pick an existing photo.
    async fn pick_from_library(&self) -> Result<ImageBlob, CaptureError>;
}

/// Capture errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// The platform refused camera or library access.
    #[error("{capability} permission denied")]
    PermissionDenied { capability: String },

    /// User backed out of the camera or picker.
    #[error("capture cancelled")]
    Cancelled,

    /// Camera hardware is busy or missing.
    #[error("camera unavailable: {0}")]
    Unavailable(String),
}

impl CaptureError {
    pub fn permission_denied(capability: impl Into<String>) -> Self {
        Self::PermissionDenied {
            capability: capability.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, CaptureError::Unavailable(_))
    }
}

impl From<CaptureError> for DomainError {
    fn from(err: CaptureError) -> Self {
        match &err {
            CaptureError::PermissionDenied { capability } => {
                DomainError::permission_denied(capability)
            }
            CaptureError::Cancelled => DomainError::validation("image", err.to_string()),
            CaptureError::Unavailable(_) => {
                DomainError::collaborator_unavailable("image_capture", err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn image_capture_is_object_safe() {
        fn _accepts_dyn(_: &dyn ImageCapture) {}
    }

    #[test]
    fn blob_rejects_empty_and_non_images() {
        assert!(ImageBlob::new(vec![], "image/jpeg", ImageSource::Camera).is_err());
        assert!(ImageBlob::new(vec![1], "text/plain", ImageSource::Library).is_err());
        let blob = ImageBlob::new(vec![0xff, 0xd8], "image/jpeg", ImageSource::Camera).unwrap();
        assert_eq!(blob.len(), 2);
    }

    #[test]
    fn permission_refusal_maps_to_dedicated_state() {
        let err: DomainError = CaptureError::permission_denied("camera").into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.detail("capability"), Some("camera"));
    }
}
