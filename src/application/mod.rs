//! Application layer - handlers and the helpers they share.
//!
//! Handlers orchestrate domain operations and coordinate between ports.
//! Collaborator calls go through [`retry::retry_transient`]; user triggers
//! are guarded by [`in_flight::InFlight`].

pub mod handlers;
pub mod in_flight;
pub mod retry;
pub mod scope;

pub use handlers::{
    // Onboarding
    OnboardingCompleted, OnboardingOptions, OnboardingService,
    OtpProgress, OtpSession,
    // Main app
    DeviceConnectionHandler, ImageAnalysisHandler, NotificationCenter,
    VoiceAssistantHandler, VoiceCommand,
};
pub use in_flight::{InFlight, InFlightToken};
pub use retry::{retry_transient, retry_when, RetryConfig, Transient};
pub use scope::ScopedTask;
