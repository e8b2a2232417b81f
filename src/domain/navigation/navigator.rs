//! Navigator - resolves navigation intents into screen changes.
//!
//! Screens never mutate the profile or pick the next screen themselves. They
//! emit a [`NavigationIntent`]; the navigator checks it against the
//! [`ScreenRegistry`], merges profile updates, and reports the resulting
//! screen in a [`NavigationOutcome`].
//!
//! # Phases
//!
//! The navigator starts in [`NavigatorPhase::Onboarding`]. The first
//! transition into a main-app screen freezes the profile (it is returned once
//! in `NavigationOutcome::completed`) and switches to
//! [`NavigatorPhase::MainApp`]; further profile updates are refused.
//! `Reset` discards everything and returns to `start`.
//!
//! `otp_verified` is not writable through `UpdateUser`; it is recorded only
//! by [`Navigator::mark_otp_verified`] with a gate that accepted a code.

use serde::{Deserialize, Serialize};

use crate::domain::otp::{OtpGate, OtpState};
use crate::domain::profile::{
    can_continue_details, validate_interests, ProfilePatch, ProfileType, UserProfile,
};

use super::{NavigationError, NavigationPolicy, ScreenKey, ScreenRegistry};

/// Intent emitted by a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "payload", rename_all = "snake_case")]
pub enum NavigationIntent {
    /// Go to a screen along a forward edge.
    Navigate(ScreenKey),
    /// Return to the predecessor screen.
    Back,
    /// Abandon the image-analysis sub-flow, back to `ai-home`.
    Cancel,
    /// Merge a partial profile update.
    UpdateUser(ProfilePatch),
    /// Confirm the last onboarding screen and enter the main app.
    Complete,
    /// Abandon onboarding and restart from `start` with an empty profile.
    Reset,
}

/// Lifecycle phase of the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigatorPhase {
    Onboarding,
    MainApp,
}

/// What the UI needs to render after an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub screen: ScreenKey,
    pub allowed_transitions: Vec<ScreenKey>,
    /// Set when the missing-precondition policy filled in a profile type.
    pub defaulted_profile_type: Option<ProfileType>,
    /// The frozen profile, present exactly once: on the transition that
    /// completed onboarding.
    pub completed: Option<UserProfile>,
}

/// Onboarding/session navigator. Owns the profile for the whole flow.
#[derive(Debug, Clone)]
pub struct Navigator {
    registry: ScreenRegistry,
    policy: NavigationPolicy,
    profile: UserProfile,
    current: ScreenKey,
    history: Vec<ScreenKey>,
    phase: NavigatorPhase,
}

impl Navigator {
    /// Creates a navigator on the start screen with an empty profile.
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            registry: ScreenRegistry::new(),
            policy,
            profile: UserProfile::empty(),
            current: ScreenKey::Start,
            history: Vec::new(),
            phase: NavigatorPhase::Onboarding,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn current(&self) -> ScreenKey {
        self.current
    }

    /// Immutable snapshot of the profile for rendering.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn phase(&self) -> NavigatorPhase {
        self.phase
    }

    pub fn policy(&self) -> &NavigationPolicy {
        &self.policy
    }

    pub fn history(&self) -> &[ScreenKey] {
        &self.history
    }

    /// `canContinue` for the current screen.
    pub fn can_continue(&self) -> bool {
        match self.current {
            ScreenKey::Login | ScreenKey::Signup => self.profile.identity().has_phone(),
            ScreenKey::Otp => self.profile.otp_verified(),
            ScreenKey::ProfileType => self.profile.profile_type().is_some(),
            ScreenKey::ProfileDetails => can_continue_details(&self.profile),
            ScreenKey::Interests => validate_interests(self.profile.interests()).is_ok(),
            _ => true,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies an intent.
    ///
    /// On error the navigator state is unchanged.
    pub fn dispatch(&mut self, intent: NavigationIntent) -> Result<NavigationOutcome, NavigationError> {
        match intent {
            NavigationIntent::Navigate(target) => self.navigate(target),
            NavigationIntent::Back => self.back(),
            NavigationIntent::Cancel => self.cancel(),
            NavigationIntent::UpdateUser(patch) => self.update_user(patch),
            NavigationIntent::Complete => self.complete(),
            NavigationIntent::Reset => Ok(self.reset()),
        }
    }

    fn navigate(&mut self, target: ScreenKey) -> Result<NavigationOutcome, NavigationError> {
        if !self.registry.has_edge(self.current, target) {
            return Err(NavigationError::invalid_transition(self.current, target));
        }

        let resolved = self
            .registry
            .resolve_screen(target, &self.profile, &self.policy)?;

        if let Some(default_type) = resolved.defaulted_profile_type {
            self.profile
                .apply(ProfilePatch::new().with_profile_type(default_type));
        }

        let completed = if target.is_main_app() && self.phase == NavigatorPhase::Onboarding {
            self.phase = NavigatorPhase::MainApp;
            self.history.clear();
            Some(self.profile.clone())
        } else {
            self.history.push(self.current);
            None
        };
        self.current = target;

        Ok(NavigationOutcome {
            screen: target,
            allowed_transitions: resolved.allowed_transitions,
            defaulted_profile_type: resolved.defaulted_profile_type,
            completed,
        })
    }

    fn back(&mut self) -> Result<NavigationOutcome, NavigationError> {
        let edges = self.registry.back_edges(self.current);
        let target = match self.history.last() {
            Some(prev) if edges.contains(prev) => *prev,
            _ => *edges
                .first()
                .ok_or(NavigationError::NoReturnEdge { from: self.current })?,
        };
        Ok(self.return_to(target))
    }

    fn cancel(&mut self) -> Result<NavigationOutcome, NavigationError> {
        let target = self
            .registry
            .cancel_target(self.current)
            .ok_or(NavigationError::NoReturnEdge { from: self.current })?;
        Ok(self.return_to(target))
    }

    fn return_to(&mut self, target: ScreenKey) -> NavigationOutcome {
        if let Some(pos) = self.history.iter().rposition(|k| *k == target) {
            self.history.truncate(pos);
        }
        self.current = target;
        self.outcome(None)
    }

    fn update_user(&mut self, mut patch: ProfilePatch) -> Result<NavigationOutcome, NavigationError> {
        if self.phase == NavigatorPhase::MainApp {
            return Err(NavigationError::ProfileFrozen);
        }
        if patch.otp_verified.is_some() {
            return Err(NavigationError::VerificationRequired);
        }

        let mut defaulted = None;
        if patch.touches_type_dependent_fields() && patch.profile_type.is_none() {
            let (profile_type, was_defaulted) = self
                .policy
                .effective_profile_type(self.profile.profile_type())
                .ok_or_else(|| {
                    NavigationError::precondition_unmet(self.current, "profile type required")
                })?;
            if was_defaulted {
                patch.profile_type = Some(profile_type);
                defaulted = Some(profile_type);
            }
        }

        self.profile.apply(patch);
        let mut outcome = self.outcome(None);
        outcome.defaulted_profile_type = defaulted;
        Ok(outcome)
    }

    /// Records the phone as verified.
    ///
    /// Only valid on the `otp` screen while onboarding, and only with a gate
    /// whose submitted code was accepted.
    pub fn mark_otp_verified(&mut self, gate: &OtpGate) -> Result<NavigationOutcome, NavigationError> {
        if self.phase == NavigatorPhase::MainApp {
            return Err(NavigationError::ProfileFrozen);
        }
        if self.current != ScreenKey::Otp || gate.state() != OtpState::Verified {
            return Err(NavigationError::VerificationRequired);
        }
        self.profile
            .apply(ProfilePatch::new().with_otp_verified(true));
        Ok(self.outcome(None))
    }

    fn complete(&mut self) -> Result<NavigationOutcome, NavigationError> {
        if self.current != ScreenKey::Interests {
            return Err(NavigationError::invalid_transition(
                self.current,
                ScreenKey::DeviceConnection,
            ));
        }
        self.navigate(ScreenKey::DeviceConnection)
    }

    /// Discards the profile and returns to `start`. Infallible.
    pub fn reset(&mut self) -> NavigationOutcome {
        self.profile = UserProfile::empty();
        self.history.clear();
        self.phase = NavigatorPhase::Onboarding;
        self.current = ScreenKey::Start;
        self.outcome(None)
    }

    fn outcome(&self, completed: Option<UserProfile>) -> NavigationOutcome {
        NavigationOutcome {
            screen: self.current,
            allowed_transitions: self.registry.allowed_transitions(self.current),
            defaulted_profile_type: None,
            completed,
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavigationPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::navigation::NavigationError;
    use crate::domain::profile::Identity;

    fn go(nav: &mut Navigator, key: ScreenKey) -> NavigationOutcome {
        nav.dispatch(NavigationIntent::Navigate(key)).unwrap()
    }

    fn update(nav: &mut Navigator, patch: ProfilePatch) -> NavigationOutcome {
        nav.dispatch(NavigationIntent::UpdateUser(patch)).unwrap()
    }

    fn accepted_gate() -> OtpGate {
        let mut gate = OtpGate::new(0);
        gate.paste("123456").unwrap();
        gate.resolve(true).unwrap();
        gate
    }

    /// Navigator parked on the otp screen for Jane's phone.
    fn otp_navigator(policy: NavigationPolicy) -> Navigator {
        let mut nav = Navigator::new(policy);
        go(&mut nav, ScreenKey::Signup);
        update(
            &mut nav,
            ProfilePatch::new().with_identity(Identity::new("Jane Doe", "j@x.com", "+15551234567")),
        );
        go(&mut nav, ScreenKey::Otp);
        nav
    }

    /// Navigator parked on the profile-type screen with a verified phone.
    fn verified_navigator(policy: NavigationPolicy) -> Navigator {
        let mut nav = otp_navigator(policy);
        nav.mark_otp_verified(&accepted_gate()).unwrap();
        go(&mut nav, ScreenKey::ProfileType);
        nav
    }

    #[test]
    fn starts_on_start_screen() {
        let nav = Navigator::default();
        assert_eq!(nav.current(), ScreenKey::Start);
        assert_eq!(nav.phase(), NavigatorPhase::Onboarding);
        assert!(nav.profile().is_empty());
    }

    #[test]
    fn rejects_unknown_edge_without_changing_state() {
        let mut nav = Navigator::default();
        let err = nav
            .dispatch(NavigationIntent::Navigate(ScreenKey::Dashboard))
            .unwrap_err();
        assert_eq!(
            err,
            NavigationError::invalid_transition(ScreenKey::Start, ScreenKey::Dashboard)
        );
        assert_eq!(nav.current(), ScreenKey::Start);
    }

    #[test]
    fn otp_needs_phone_first() {
        let mut nav = Navigator::default();
        go(&mut nav, ScreenKey::Login);
        assert!(!nav.can_continue());
        let err = nav.dispatch(NavigationIntent::Navigate(ScreenKey::Otp)).unwrap_err();
        assert!(matches!(err, NavigationError::PreconditionUnmet { .. }));
    }

    #[test]
    fn back_from_otp_returns_to_the_screen_it_came_from() {
        let mut nav = Navigator::default();
        go(&mut nav, ScreenKey::Login);
        update(
            &mut nav,
            ProfilePatch::new().with_identity(Identity::new("", "j@x.com", "+15551234567")),
        );
        go(&mut nav, ScreenKey::Otp);

        let outcome = nav.dispatch(NavigationIntent::Back).unwrap();
        assert_eq!(outcome.screen, ScreenKey::Login);
        assert_eq!(nav.history(), &[ScreenKey::Start]);

        let outcome = nav.dispatch(NavigationIntent::Back).unwrap();
        assert_eq!(outcome.screen, ScreenKey::Start);
        assert!(nav.dispatch(NavigationIntent::Back).is_err());
    }

    #[test]
    fn update_cannot_set_otp_verified() {
        let mut nav = otp_navigator(NavigationPolicy::default());
        let err = nav
            .dispatch(NavigationIntent::UpdateUser(
                ProfilePatch::new().with_otp_verified(true),
            ))
            .unwrap_err();

        assert_eq!(err, NavigationError::VerificationRequired);
        assert!(!nav.profile().otp_verified());
        assert!(nav
            .dispatch(NavigationIntent::Navigate(ScreenKey::ProfileType))
            .is_err());
        assert_eq!(nav.current(), ScreenKey::Otp);
    }

    #[test]
    fn mark_otp_verified_needs_accepted_gate_on_otp_screen() {
        let mut nav = otp_navigator(NavigationPolicy::default());
        let mut pending = OtpGate::new(0);
        pending.paste("123456").unwrap();
        assert_eq!(
            nav.mark_otp_verified(&pending).unwrap_err(),
            NavigationError::VerificationRequired
        );
        assert!(!nav.profile().otp_verified());

        nav.dispatch(NavigationIntent::Back).unwrap();
        assert!(nav.mark_otp_verified(&accepted_gate()).is_err());
    }

    #[test]
    fn new_phone_after_verification_needs_new_code() {
        let mut nav = verified_navigator(NavigationPolicy::default());
        update(
            &mut nav,
            ProfilePatch::new().with_identity(Identity::new("Jane Doe", "j@x.com", "+15550000000")),
        );
        assert!(!nav.profile().otp_verified());
    }

    #[test]
    fn switching_profile_type_after_back_drops_goal() {
        let mut nav = verified_navigator(NavigationPolicy::default());
        update(&mut nav, ProfilePatch::new().with_profile_type(ProfileType::Health));
        go(&mut nav, ScreenKey::ProfileDetails);
        update(&mut nav, ProfilePatch::new().with_level("30-44").with_goal("recovery"));
        nav.dispatch(NavigationIntent::Back).unwrap();

        update(&mut nav, ProfilePatch::new().with_profile_type(ProfileType::Athlete));
        assert_eq!(nav.profile().goal(), None);
        assert_eq!(nav.profile().level(), "");
    }

    #[test]
    fn type_dependent_update_defaults_profile_type() {
        let mut nav = verified_navigator(NavigationPolicy::default());
        let outcome = update(&mut nav, ProfilePatch::new().with_level("advanced"));
        assert_eq!(outcome.defaulted_profile_type, Some(ProfileType::Athlete));
        assert_eq!(nav.profile().profile_type(), Some(ProfileType::Athlete));
    }

    #[test]
    fn type_dependent_update_rejected_under_strict_policy() {
        let mut nav = verified_navigator(NavigationPolicy::strict());
        let result = nav.dispatch(NavigationIntent::UpdateUser(
            ProfilePatch::new().with_level("advanced"),
        ));
        assert!(result.is_err());
        assert_eq!(nav.profile().level(), "");
    }

    #[test]
    fn entering_details_without_type_defaults_under_default_policy() {
        let mut nav = verified_navigator(NavigationPolicy::default());
        let outcome = go(&mut nav, ScreenKey::ProfileDetails);
        assert_eq!(outcome.defaulted_profile_type, Some(ProfileType::Athlete));
        assert_eq!(nav.profile().profile_type(), Some(ProfileType::Athlete));
    }

    #[test]
    fn health_without_goal_blocks_interests() {
        let mut nav = verified_navigator(NavigationPolicy::default());
        update(&mut nav, ProfilePatch::new().with_profile_type(ProfileType::Health));
        go(&mut nav, ScreenKey::ProfileDetails);
        update(&mut nav, ProfilePatch::new().with_level("30-44"));

        assert!(!nav.can_continue());
        assert!(nav
            .dispatch(NavigationIntent::Navigate(ScreenKey::Interests))
            .is_err());
        assert_eq!(nav.current(), ScreenKey::ProfileDetails);
    }

    #[test]
    fn complete_freezes_profile_once() {
        let mut nav = verified_navigator(NavigationPolicy::default());
        update(&mut nav, ProfilePatch::new().with_profile_type(ProfileType::Coach));
        go(&mut nav, ScreenKey::ProfileDetails);
        update(&mut nav, ProfilePatch::new().with_level("physiotherapy"));
        go(&mut nav, ScreenKey::Interests);
        update(
            &mut nav,
            ProfilePatch::new().with_interests(vec!["analytics".into(), "wellness".into()]),
        );

        let outcome = nav.dispatch(NavigationIntent::Complete).unwrap();
        assert_eq!(outcome.screen, ScreenKey::DeviceConnection);
        assert_eq!(outcome.completed.as_ref(), Some(nav.profile()));
        assert_eq!(nav.phase(), NavigatorPhase::MainApp);

        let outcome = go(&mut nav, ScreenKey::Dashboard);
        assert!(outcome.completed.is_none());

        let err = nav
            .dispatch(NavigationIntent::UpdateUser(ProfilePatch::new().with_level("x")))
            .unwrap_err();
        assert_eq!(err, NavigationError::ProfileFrozen);
    }

    #[test]
    fn complete_only_from_interests() {
        let mut nav = Navigator::default();
        assert!(nav.dispatch(NavigationIntent::Complete).is_err());
    }

    #[test]
    fn reset_discards_profile() {
        let mut nav = verified_navigator(NavigationPolicy::default());
        let outcome = nav.dispatch(NavigationIntent::Reset).unwrap();
        assert_eq!(outcome.screen, ScreenKey::Start);
        assert!(nav.profile().is_empty());
        assert!(nav.history().is_empty());
    }

    #[test]
    fn intents_deserialize_from_tagged_json() {
        let intent: NavigationIntent =
            serde_json::from_str(r#"{"intent":"navigate","payload":"profile-type"}"#).unwrap();
        assert_eq!(intent, NavigationIntent::Navigate(ScreenKey::ProfileType));

        let intent: NavigationIntent = serde_json::from_str(r#"{"intent":"back"}"#).unwrap();
        assert_eq!(intent, NavigationIntent::Back);
    }
}
