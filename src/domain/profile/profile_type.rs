//! ProfileType enum - the top-level persona chosen during onboarding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Persona classification that decides which option sets later screens show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    Athlete,
    Coach,
    Health,
}

impl ProfileType {
    /// Returns all profile types in display order.
    pub fn all() -> &'static [ProfileType] {
        &[ProfileType::Athlete, ProfileType::Coach, ProfileType::Health]
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Athlete => "athlete",
            ProfileType::Coach => "coach",
            ProfileType::Health => "health",
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileType::Athlete => "Athlete",
            ProfileType::Coach => "Coach",
            ProfileType::Health => "Health & Wellness",
        }
    }

    /// Returns true if this profile type must also pick a goal.
    pub fn requires_goal(&self) -> bool {
        matches!(self, ProfileType::Health)
    }

    /// Label for the `level` field on the details screen.
    pub fn level_label(&self) -> &'static str {
        match self {
            ProfileType::Athlete => "Experience level",
            ProfileType::Coach => "Specialization",
            ProfileType::Health => "Age range",
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "athlete" => Ok(ProfileType::Athlete),
            "coach" => Ok(ProfileType::Coach),
            "health" => Ok(ProfileType::Health),
            other => Err(ValidationError::not_allowed(
                "profile_type",
                &["athlete", "coach", "health"],
                other,
            )),
        }
    }
}
