use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::ports::{CaptureError, ImageBlob, ImageCapture, ImageSource};

use super::FailureQueue;

/// JPEG start-of-image marker followed by a few filler bytes.
const PLACEHOLDER_JPEG: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46, 0x49, 0x46];

/// Returns a fixed placeholder image from both camera and library.
#[derive(Debug, Default)]
pub struct FakeImageCapture {
    failures: FailureQueue<CaptureError>,
    captures: AtomicUsize,
}

impl FakeImageCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next `times` calls with `error`.
    pub fn with_failures(self, error: CaptureError, times: usize) -> Self {
        self.failures.push(error, times);
        self
    }

    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    fn produce(&self, source: ImageSource) -> Result<ImageBlob, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.next() {
            return Err(error);
        }
        ImageBlob::new(PLACEHOLDER_JPEG.to_vec(), "image/jpeg", source)
            .map_err(|e| CaptureError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ImageCapture for FakeImageCapture {
    async fn capture(&self) -> Result<ImageBlob, CaptureError> {
        self.produce(ImageSource::Camera)
    }

    async fn pick_from_library(&self) -> Result<ImageBlob, CaptureError> {
        self.produce(ImageSource::Library)
    }
}
