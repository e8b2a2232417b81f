//! OnboardingService - drives the auth and onboarding screens.
//!
//! Wraps the [`Navigator`] and calls the auth provider on the screens that
//! need it. Collaborator calls go through [`retry_transient`], except
//! sign-up, which creates an account and is only replayed when the provider
//! cannot have received it. Each trigger that starts a call is guarded
//! against double submission.
//!
//! ```text
//! sign_up / sign_in ─► open_otp ─► confirm_otp ─► choose_profile_type
//!                   ─► submit_details ─► submit_interests (session saved)
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument};

use crate::application::in_flight::InFlight;
use crate::application::retry::{retry_transient, retry_when, RetryConfig};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::navigation::{
    NavigationIntent, NavigationOutcome, NavigationPolicy, Navigator, NavigatorPhase, ScreenKey,
};
use crate::domain::otp::{OtpState, DEFAULT_RESEND_COOLDOWN_SECS};
use crate::domain::profile::{
    validate_completion, validate_details, CompletedProfile, InterestSelection, ProfilePatch,
    ProfileType, SignInForm, SignUpForm, UserProfile,
};
use crate::ports::{AuthError, AuthProvider, AuthenticatedUser, SessionStore};

use super::OtpSession;

/// Tunables for the onboarding flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingOptions {
    pub policy: NavigationPolicy,
    pub retry: RetryConfig,
    pub resend_cooldown_secs: u32,
}

impl Default for OnboardingOptions {
    fn default() -> Self {
        Self {
            policy: NavigationPolicy::default(),
            retry: RetryConfig::default(),
            resend_cooldown_secs: DEFAULT_RESEND_COOLDOWN_SECS,
        }
    }
}

/// Result of confirming the interests screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingCompleted {
    pub outcome: NavigationOutcome,
    pub session: CompletedProfile,
}

pub struct OnboardingService {
    auth: Arc<dyn AuthProvider>,
    sessions: Arc<dyn SessionStore>,
    navigator: Mutex<Navigator>,
    user: Mutex<Option<AuthenticatedUser>>,
    options: OnboardingOptions,
    credentials: InFlight,
    completion: InFlight,
}

impl OnboardingService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        sessions: Arc<dyn SessionStore>,
        options: OnboardingOptions,
    ) -> Self {
        Self {
            auth,
            sessions,
            navigator: Mutex::new(Navigator::new(options.policy)),
            user: Mutex::new(None),
            options,
            credentials: InFlight::new("sign-in"),
            completion: InFlight::new("onboarding completion"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshots
    // ─────────────────────────────────────────────────────────────────────────

    pub fn current_screen(&self) -> ScreenKey {
        self.navigator().current()
    }

    pub fn phase(&self) -> NavigatorPhase {
        self.navigator().phase()
    }

    /// Copy of the profile as it stands.
    pub fn profile(&self) -> UserProfile {
        self.navigator().profile().clone()
    }

    pub fn can_continue(&self) -> bool {
        self.navigator().can_continue()
    }

    /// The authenticated user, once sign-up or sign-in succeeded.
    pub fn user(&self) -> Option<AuthenticatedUser> {
        self.user_slot().clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Forwards a raw intent to the navigator.
    pub fn dispatch(&self, intent: NavigationIntent) -> Result<NavigationOutcome, DomainError> {
        let mut navigator = self.navigator();
        let from = navigator.current();
        let outcome = navigator.dispatch(intent)?;
        if outcome.screen != from {
            info!(from = %from, to = %outcome.screen, "screen changed");
        }
        if let Some(default_type) = outcome.defaulted_profile_type {
            debug!(profile_type = %default_type, "profile type defaulted");
        }
        Ok(outcome)
    }

    /// Abandons onboarding: empty profile, back to `start`.
    pub fn reset(&self) -> NavigationOutcome {
        *self.user_slot() = None;
        let mut navigator = self.navigator();
        info!(from = %navigator.current(), "onboarding reset");
        navigator.reset()
    }

    /// Ends the session: clears the stored profile and returns to `start`.
    pub async fn sign_out(&self) -> Result<NavigationOutcome, DomainError> {
        self.sessions.clear().await?;
        info!("signed out");
        Ok(self.reset())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth screens
    // ─────────────────────────────────────────────────────────────────────────

    /// Signup screen submit: registers the account, sends a code and moves
    /// to the OTP screen.
    #[instrument(skip_all)]
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<NavigationOutcome, DomainError> {
        self.require_screen(ScreenKey::Signup)?;
        form.validate()?;
        let _token = self.credentials.begin()?;

        let user = retry_when(
            &self.options.retry,
            "sign_up",
            AuthError::is_safe_to_replay,
            || self.auth.sign_up(form),
        )
        .await?;
        info!(user_id = %user.user_id, "account created");
        self.enter_otp(user).await
    }

    /// Login screen submit.
    #[instrument(skip_all)]
    pub async fn sign_in(&self, form: &SignInForm) -> Result<NavigationOutcome, DomainError> {
        self.require_screen(ScreenKey::Login)?;
        form.validate()?;
        let _token = self.credentials.begin()?;

        let user = retry_transient(&self.options.retry, "sign_in", || self.auth.sign_in(form))
            .await?;
        info!(user_id = %user.user_id, "signed in");
        self.enter_otp(user).await
    }

    /// Opens the OTP screen for the profile's phone number.
    pub fn open_otp(&self) -> Result<OtpSession, DomainError> {
        self.require_screen(ScreenKey::Otp)?;
        let phone = self.navigator().profile().identity().phone.clone();
        Ok(OtpSession::start(
            Arc::clone(&self.auth),
            phone,
            self.options.resend_cooldown_secs,
            self.options.retry,
        ))
    }

    /// Records a verified code and moves to the profile-type screen.
    pub fn confirm_otp(&self, session: &OtpSession) -> Result<NavigationOutcome, DomainError> {
        self.require_screen(ScreenKey::Otp)?;
        match session.state() {
            OtpState::Verified => {}
            OtpState::Rejected => {
                return Err(DomainError::new(
                    ErrorCode::OtpRejected,
                    "The code was not accepted",
                ))
            }
            _ => {
                return Err(DomainError::validation("otp", "Enter all six digits"));
            }
        }
        {
            let mut navigator = self.navigator();
            if navigator.profile().identity().phone != session.phone() {
                return Err(DomainError::validation(
                    "otp",
                    "The code was sent to a different phone number",
                ));
            }
            navigator.mark_otp_verified(&session.snapshot())?;
        }
        info!("phone verified");
        self.dispatch(NavigationIntent::Navigate(ScreenKey::ProfileType))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Onboarding screens
    // ─────────────────────────────────────────────────────────────────────────

    pub fn choose_profile_type(
        &self,
        profile_type: ProfileType,
    ) -> Result<NavigationOutcome, DomainError> {
        self.require_screen(ScreenKey::ProfileType)?;
        self.dispatch(NavigationIntent::UpdateUser(
            ProfilePatch::new().with_profile_type(profile_type),
        ))?;
        self.dispatch(NavigationIntent::Navigate(ScreenKey::ProfileDetails))
    }

    /// Profile-details continue. `goal` is only read for `health`.
    pub fn submit_details(
        &self,
        level: &str,
        goal: Option<&str>,
    ) -> Result<NavigationOutcome, DomainError> {
        self.require_screen(ScreenKey::ProfileDetails)?;
        let mut patch = ProfilePatch::new().with_level(level.trim());
        if let Some(goal) = goal {
            patch = patch.with_goal(goal.trim());
        }
        let updated = self.dispatch(NavigationIntent::UpdateUser(patch))?;

        let profile = self.profile();
        let profile_type = profile
            .profile_type()
            .ok_or_else(|| DomainError::validation("profile_type", "Choose a profile type"))?;
        validate_details(profile_type, profile.level(), profile.goal())?;

        let mut outcome = self.dispatch(NavigationIntent::Navigate(ScreenKey::Interests))?;
        outcome.defaulted_profile_type = outcome
            .defaulted_profile_type
            .or(updated.defaulted_profile_type);
        Ok(outcome)
    }

    /// Interests continue: stores the interests, hands the frozen profile to
    /// the session store and enters the main app.
    #[instrument(skip_all)]
    pub async fn submit_interests(
        &self,
        selection: InterestSelection,
    ) -> Result<OnboardingCompleted, DomainError> {
        self.require_screen(ScreenKey::Interests)?;
        let interests = selection.into_interests()?;
        let _token = self.completion.begin()?;

        self.dispatch(NavigationIntent::UpdateUser(
            ProfilePatch::new().with_interests(interests),
        ))?;
        let profile = self.profile();
        validate_completion(&profile)?;

        let user_id = self
            .user()
            .map(|u| u.user_id)
            .ok_or_else(|| DomainError::new(ErrorCode::InvalidTransition, "Not signed in"))?;
        let session = CompletedProfile::new(user_id, profile);
        self.sessions.save(&session).await?;
        info!(session_id = %session.session_id, "onboarding completed");

        let outcome = self.dispatch(NavigationIntent::Complete)?;
        Ok(OnboardingCompleted { outcome, session })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn navigator(&self) -> MutexGuard<'_, Navigator> {
        self.navigator.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn user_slot(&self) -> MutexGuard<'_, Option<AuthenticatedUser>> {
        self.user.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_screen(&self, expected: ScreenKey) -> Result<(), DomainError> {
        let current = self.current_screen();
        if current != expected {
            return Err(DomainError::new(
                ErrorCode::InvalidTransition,
                format!("Expected screen '{}', currently on '{}'", expected, current),
            )
            .with_detail("screen", current.as_str()));
        }
        Ok(())
    }

    async fn enter_otp(&self, user: AuthenticatedUser) -> Result<NavigationOutcome, DomainError> {
        let identity = user.identity.clone();
        let phone = identity.phone.clone();
        *self.user_slot() = Some(user);
        self.dispatch(NavigationIntent::UpdateUser(
            ProfilePatch::new().with_identity(identity),
        ))?;

        retry_transient(&self.options.retry, "send_otp", || self.auth.send_otp(&phone)).await?;
        self.dispatch(NavigationIntent::Navigate(ScreenKey::Otp))
    }
}
