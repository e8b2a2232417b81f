//! Adapters - Implementations of port interfaces.
//!
//! - `fake` - Deterministic in-memory collaborators for tests and demos
//! - `http` - reqwest clients for the companion backend

pub mod fake;
pub mod http;

pub use fake::{
    FakeAuthProvider, FakeDevicePairing, FakeImageCapture, FakeInferenceService,
    FakeVoiceEngine, InMemoryNotificationStore, InMemorySessionStore,
};
pub use http::{BackendClient, BackendConfig, HttpAuthProvider, HttpInferenceService, HttpVoiceEngine};
