//! Option catalogs offered by the profile-details and interests screens.
//!
//! The details screen shows a different option set per [`ProfileType`]; the
//! interests screen shows the same feature tags and focus areas to everyone.

use super::ProfileType;

const ATHLETE_LEVELS: &[&str] = &["beginner", "intermediate", "advanced", "professional"];

const COACH_SPECIALIZATIONS: &[&str] = &[
    "strength-conditioning",
    "physiotherapy",
    "sports-medicine",
    "personal-training",
];

const HEALTH_AGE_BRACKETS: &[&str] = &["18-29", "30-44", "45-59", "60+"];

const HEALTH_GOALS: &[&str] = &["pain-relief", "recovery", "relaxation", "mobility"];

/// Feature-interest tags selectable on the interests screen.
pub const FEATURE_TAGS: &[&str] = &[
    "performance",
    "analytics",
    "recovery",
    "ai-recommendations",
    "voice-assistant",
    "device-control",
];

/// Focus areas; exactly one is appended after the feature tags.
pub const FOCUS_AREAS: &[&str] = &["performance", "recovery", "wellness", "pain-management"];

/// Returns the `level` options for a profile type.
pub fn level_options(profile_type: ProfileType) -> &'static [&'static str] {
    match profile_type {
        ProfileType::Athlete => ATHLETE_LEVELS,
        ProfileType::Coach => COACH_SPECIALIZATIONS,
        ProfileType::Health => HEALTH_AGE_BRACKETS,
    }
}

/// Returns the `goal` options for a profile type (empty when no goal applies).
pub fn goal_options(profile_type: ProfileType) -> &'static [&'static str] {
    match profile_type {
        ProfileType::Health => HEALTH_GOALS,
        ProfileType::Athlete | ProfileType::Coach => &[],
    }
}
