//! What the navigator does when a screen needs a profile type that is unset.

use serde::{Deserialize, Serialize};

use crate::domain::profile::ProfileType;

/// Policy for a missing `profile_type` precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPreconditionPolicy {
    /// Substitute the configured default profile type and carry on.
    #[default]
    Default,
    /// Refuse the transition with `InvalidTransition`.
    Reject,
}

/// Navigation policy knobs, built from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPolicy {
    pub on_missing_precondition: MissingPreconditionPolicy,
    pub default_profile_type: ProfileType,
}

impl NavigationPolicy {
    /// Policy that rejects instead of defaulting.
    pub fn strict() -> Self {
        Self {
            on_missing_precondition: MissingPreconditionPolicy::Reject,
            ..Self::default()
        }
    }

    /// Resolves the effective profile type.
    ///
    /// Returns `Some((type, defaulted))`, or `None` when the policy rejects.
    pub fn effective_profile_type(
        &self,
        current: Option<ProfileType>,
    ) -> Option<(ProfileType, bool)> {
        match (current, self.on_missing_precondition) {
            (Some(pt), _) => Some((pt, false)),
            (None, MissingPreconditionPolicy::Default) => Some((self.default_profile_type, true)),
            (None, MissingPreconditionPolicy::Reject) => None,
        }
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self {
            on_missing_precondition: MissingPreconditionPolicy::Default,
            default_profile_type: ProfileType::Athlete,
        }
    }
}
