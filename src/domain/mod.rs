//! Domain layer containing the companion app's types and state machines.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, state machine trait)
//! - `profile` - Registration record, option catalogs, step validation
//! - `navigation` - Screen keys, transition table, navigator
//! - `otp` - One-time code entry gate
//! - `device` - Therapy device connection status
//! - `therapy` - Image analysis recommendations
//! - `notification` - In-app notifications

pub mod device;
pub mod foundation;
pub mod navigation;
pub mod notification;
pub mod otp;
pub mod profile;
pub mod therapy;
