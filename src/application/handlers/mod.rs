//! Application handlers.
//!
//! Screen-level services that combine domain state machines with the
//! collaborator ports.

mod device_connection;
mod image_analysis;
mod notification_center;
mod onboarding;
mod otp_session;
mod voice_assistant;

pub use device_connection::{DeviceConnectionHandler, DEFAULT_SCAN_TIMEOUT};
pub use image_analysis::ImageAnalysisHandler;
pub use notification_center::NotificationCenter;
pub use onboarding::{OnboardingCompleted, OnboardingOptions, OnboardingService};
pub use otp_session::{OtpProgress, OtpSession};
pub use voice_assistant::{route_transcript, VoiceAssistantHandler, VoiceCommand};
