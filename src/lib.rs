//! Therapy Companion - headless core of a therapy-device companion app
//!
//! This crate implements onboarding navigation, the OTP verification gate,
//! device connection status and the capability ports (auth, image capture,
//! inference, pairing, speech, notifications) a UI shell drives.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
