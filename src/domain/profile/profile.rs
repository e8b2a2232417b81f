//! UserProfile - the registration record accumulated across onboarding.
//!
//! # Lifecycle
//!
//! 1. Created empty when the user leaves the start screen.
//! 2. Merged incrementally, one [`ProfilePatch`] per screen. A patch never
//!    replaces the profile wholesale.
//! 3. Frozen into a [`CompletedProfile`] once the last onboarding screen
//!    confirms, then handed to the session store.
//! 4. Reset to empty if the user abandons onboarding.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp, UserId};

use super::ProfileType;

/// Contact details collected at signup or returned by sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Identity {
    /// Creates an identity from its three contact fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Returns true if a phone number is present (required for the OTP step).
    pub fn has_phone(&self) -> bool {
        !self.phone.trim().is_empty()
    }
}

/// Mutable, partially-filled registration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    identity: Identity,
    profile_type: Option<ProfileType>,
    level: String,
    goal: Option<String>,
    interests: Vec<String>,
    otp_verified: bool,
}

impl UserProfile {
    /// Creates an empty profile.
    pub fn empty() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn profile_type(&self) -> Option<ProfileType> {
        self.profile_type
    }

    /// Profile-type specific tier. Empty when unset.
    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    /// Feature tags followed by the focus-area tag.
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn otp_verified(&self) -> bool {
        self.otp_verified
    }

    /// Returns true if nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Shallow merge: every field present in `patch` replaces the current
    /// value, everything else is kept.
    ///
    /// `interests` is replaced, never appended; the caller composes the full
    /// array before sending it.
    ///
    /// Two fields are derived from others and reset when those change:
    /// switching an already chosen profile type clears `level` and `goal`,
    /// and replacing a known phone number clears `otp_verified`. Values set
    /// by the same patch win over the reset.
    pub fn merged(mut self, patch: ProfilePatch) -> Self {
        self.apply(patch);
        self
    }

    /// In-place form of [`merged`](Self::merged).
    pub fn apply(&mut self, patch: ProfilePatch) {
        let ProfilePatch {
            identity,
            profile_type,
            level,
            goal,
            interests,
            otp_verified,
        } = patch;

        if let Some(identity) = identity {
            if self.identity.has_phone() && self.identity.phone != identity.phone {
                self.otp_verified = false;
            }
            self.identity = identity;
        }
        if let Some(profile_type) = profile_type {
            if self.profile_type.is_some_and(|current| current != profile_type) {
                self.level.clear();
                self.goal = None;
            }
            self.profile_type = Some(profile_type);
        }
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(goal) = goal {
            self.goal = Some(goal);
        }
        if let Some(interests) = interests {
            self.interests = interests;
        }
        if let Some(otp_verified) = otp_verified {
            self.otp_verified = otp_verified;
        }
    }
}

/// Partial update emitted by a screen.
///
/// Each onboarding screen owns a disjoint set of fields, so patches from
/// different screens commute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<ProfileType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_verified: Option<bool>,
}

impl ProfilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_profile_type(mut self, profile_type: ProfileType) -> Self {
        self.profile_type = Some(profile_type);
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = Some(interests);
        self
    }

    pub fn with_otp_verified(mut self, verified: bool) -> Self {
        self.otp_verified = Some(verified);
        self
    }

    /// Returns true if the patch edits a field whose meaning depends on the
    /// profile type (`level`, `goal`, `interests`).
    pub fn touches_type_dependent_fields(&self) -> bool {
        self.level.is_some() || self.goal.is_some() || self.interests.is_some()
    }

    /// Returns true if the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Frozen profile handed to the main app once onboarding completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedProfile {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub profile: UserProfile,
    pub completed_at: Timestamp,
}

impl CompletedProfile {
    pub fn new(user_id: UserId, profile: UserProfile) -> Self {
        Self {
            session_id: SessionId::new(),
            user_id,
            profile,
            completed_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_is_empty() {
        let profile = UserProfile::empty();
        assert!(profile.is_empty());
        assert_eq!(profile.profile_type(), None);
        assert_eq!(profile.level(), "");
        assert!(!profile.otp_verified());
    }

    #[test]
    fn merge_keeps_fields_not_in_patch() {
        let profile = UserProfile::empty()
            .merged(ProfilePatch::new().with_identity(Identity::new("Jane", "j@x.com", "+1555")))
            .merged(ProfilePatch::new().with_profile_type(ProfileType::Coach));

        assert_eq!(profile.identity().name, "Jane");
        assert_eq!(profile.profile_type(), Some(ProfileType::Coach));
    }

    #[test]
    fn interests_are_replaced_not_appended() {
        let profile = UserProfile::empty()
            .merged(ProfilePatch::new().with_interests(vec!["a".into()]))
            .merged(ProfilePatch::new().with_interests(vec!["b".into()]));

        assert_eq!(profile.interests(), &["b".to_string()]);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let profile = UserProfile::empty().merged(ProfilePatch::new().with_level("advanced"));
        assert_eq!(profile.clone().merged(ProfilePatch::new()), profile);
        assert!(ProfilePatch::new().is_empty());
    }

    #[test]
    fn type_dependent_detection() {
        assert!(ProfilePatch::new().with_goal("recovery").touches_type_dependent_fields());
        assert!(!ProfilePatch::new()
            .with_profile_type(ProfileType::Athlete)
            .touches_type_dependent_fields());
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: ProfilePatch =
            serde_json::from_str(r#"{"profile_type":"health","level":"30-44"}"#).unwrap();
        assert_eq!(patch.profile_type, Some(ProfileType::Health));
        assert_eq!(patch.level.as_deref(), Some("30-44"));
        assert_eq!(patch.goal, None);
    }

    #[test]
    fn switching_profile_type_clears_level_and_goal() {
        let profile = UserProfile::empty()
            .merged(
                ProfilePatch::new()
                    .with_profile_type(ProfileType::Health)
                    .with_level("30-44")
                    .with_goal("recovery"),
            )
            .merged(ProfilePatch::new().with_profile_type(ProfileType::Athlete));

        assert_eq!(profile.profile_type(), Some(ProfileType::Athlete));
        assert_eq!(profile.level(), "");
        assert_eq!(profile.goal(), None);
    }

    #[test]
    fn reselecting_same_profile_type_keeps_details() {
        let profile = UserProfile::empty()
            .merged(ProfilePatch::new().with_profile_type(ProfileType::Health))
            .merged(ProfilePatch::new().with_level("30-44").with_goal("recovery"))
            .merged(ProfilePatch::new().with_profile_type(ProfileType::Health));

        assert_eq!(profile.level(), "30-44");
        assert_eq!(profile.goal(), Some("recovery"));
    }

    #[test]
    fn type_switch_keeps_details_set_in_same_patch() {
        let profile = UserProfile::empty()
            .merged(ProfilePatch::new().with_profile_type(ProfileType::Health).with_goal("sleep"))
            .merged(
                ProfilePatch::new()
                    .with_profile_type(ProfileType::Athlete)
                    .with_level("intermediate"),
            );

        assert_eq!(profile.level(), "intermediate");
        assert_eq!(profile.goal(), None);
    }

    #[test]
    fn changing_phone_clears_verification() {
        let profile = UserProfile::empty()
            .merged(ProfilePatch::new().with_identity(Identity::new("Jane", "j@x.com", "+1555")))
            .merged(ProfilePatch::new().with_otp_verified(true))
            .merged(ProfilePatch::new().with_identity(Identity::new("Jane", "j@x.com", "+1666")));

        assert!(!profile.otp_verified());
    }

    #[test]
    fn renaming_with_same_phone_keeps_verification() {
        let profile = UserProfile::empty()
            .merged(ProfilePatch::new().with_identity(Identity::new("Jane", "j@x.com", "+1555")))
            .merged(ProfilePatch::new().with_otp_verified(true))
            .merged(ProfilePatch::new().with_identity(Identity::new("Jane Doe", "j@x.com", "+1555")));

        assert!(profile.otp_verified());
    }

    #[test]
    fn identity_phone_presence() {
        assert!(!Identity::default().has_phone());
        assert!(Identity::new("", "", "+15551234567").has_phone());
    }
}
