//! Therapy module - recommendations produced by image analysis.

mod mode;
mod recommendation;

pub use mode::{ModePresentation, TherapyMode};
pub use recommendation::{TherapyRecommendation, TherapySettings};
