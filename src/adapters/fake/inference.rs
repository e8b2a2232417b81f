use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::Percentage;
use crate::domain::therapy::{TherapyMode, TherapyRecommendation, TherapySettings};
use crate::ports::{ImageBlob, InferenceError, InferenceService};

use super::{simulate_latency, FailureQueue};

/// Returns the same recommendation for every image.
#[derive(Debug)]
pub struct FakeInferenceService {
    recommendation: RwLock<Option<TherapyRecommendation>>,
    failures: FailureQueue<InferenceError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl Default for FakeInferenceService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeInferenceService {
    /// Recommends heat on the lower back: 87% confidence, intensity 6,
    /// 15 minutes at 42°C.
    pub fn new() -> Self {
        let recommendation = TherapySettings::new(6, 15, 42)
            .and_then(|settings| {
                TherapyRecommendation::new(
                    "lower-back",
                    Percentage::new(87),
                    TherapyMode::Heat,
                    settings,
                )
            })
            .ok();
        Self {
            recommendation: RwLock::new(recommendation),
            failures: FailureQueue::default(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_recommendation(self, recommendation: TherapyRecommendation) -> Self {
        *self.recommendation.write().unwrap() = Some(recommendation);
        self
    }

    pub fn with_failures(self, error: InferenceError, times: usize) -> Self {
        self.failures.push(error, times);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceService for FakeInferenceService {
    async fn analyze(&self, _image: &ImageBlob) -> Result<TherapyRecommendation, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        simulate_latency(self.delay).await;
        if let Some(error) = self.failures.next() {
            return Err(error);
        }
        self.recommendation
            .read()
            .unwrap()
            .clone()
            .ok_or(InferenceError::NothingDetected)
    }
}
