//! Network-backed collaborators talking to the companion backend over HTTPS.

mod auth;
mod client;
mod inference;
mod voice;

pub use auth::HttpAuthProvider;
pub use client::{BackendClient, BackendConfig, HttpFailure};
pub use inference::HttpInferenceService;
pub use voice::HttpVoiceEngine;
