//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the platform or network. Adapters implement these ports.
//!
//! ## Collaborators
//!
//! - `AuthProvider` - sign-in, sign-up, one-time code delivery and checks
//! - `ImageCapture` - camera and photo library
//! - `InferenceService` - image analysis into a therapy recommendation
//! - `DevicePairing` - Bluetooth scan and connect
//! - `VoiceEngine` - speech to text
//! - `NotificationStore` - in-app notification CRUD
//! - `SessionStore` - authenticated session handed over after onboarding
//!
//! Every error type exposes `is_transient()` (retry candidates) and converts
//! into `DomainError`.

mod auth_provider;
mod device_pairing;
mod image_capture;
mod inference_service;
mod notification_store;
mod session_store;
mod voice_engine;

pub use auth_provider::{AuthError, AuthProvider, AuthenticatedUser};
pub use device_pairing::{DevicePairing, DeviceStream, PairingError, PairingSession};
pub use image_capture::{CaptureError, ImageBlob, ImageCapture, ImageSource};
pub use inference_service::{InferenceError, InferenceService};
pub use notification_store::{NotificationError, NotificationStore};
pub use session_store::{SessionStore, SessionStoreError};
pub use voice_engine::{AudioStream, SpeechError, VoiceEngine};
