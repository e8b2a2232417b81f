//! ScreenRegistry - transition table and entry preconditions.
//!
//! # Forward edges
//!
//! ```text
//! start → login | signup → otp → profile-type → profile-details → interests
//! interests → device-connection | dashboard
//! device-connection → dashboard
//! dashboard → settings | reports | features | notifications
//!           | device-connection | ai-home | voice-assistant
//! ai-home → camera | upload → preview → analysis-result → dashboard
//! ```
//!
//! # Return edges
//!
//! Every auth and onboarding screen has a `back` edge to its immediate
//! predecessor, every dashboard child returns to `dashboard`, and every node
//! of the image-analysis sub-flow can `cancel` to `ai-home`.

use crate::domain::profile::{validate_completion, validate_details, ProfileType, UserProfile};

use super::{NavigationError, NavigationPolicy, ScreenFlow, ScreenKey};

/// What must hold on the profile before a screen can be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    None,
    /// Identity carries a phone number to send the code to.
    PhoneEntered,
    /// The OTP step accepted a code.
    OtpVerified,
    /// A profile type is set (subject to [`NavigationPolicy`]).
    ProfileTypeSet,
    /// Profile type set and the details step passes `canContinue`.
    DetailsComplete,
    /// The whole profile passes completion validation.
    OnboardingComplete,
}

/// Result of resolving a screen against the current profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScreen {
    pub screen: ScreenKey,
    /// Forward, back and cancel targets, without duplicates.
    pub allowed_transitions: Vec<ScreenKey>,
    /// Set when the policy substituted a default profile type on entry.
    pub defaulted_profile_type: Option<ProfileType>,
}

/// Static screen table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenRegistry;

impl ScreenRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Outbound forward edges.
    pub fn forward_edges(&self, key: ScreenKey) -> &'static [ScreenKey] {
        use ScreenKey::*;
        match key {
            Start => &[Login, Signup],
            Login | Signup => &[Otp],
            Otp => &[ProfileType],
            ProfileType => &[ProfileDetails],
            ProfileDetails => &[Interests],
            Interests => &[DeviceConnection, Dashboard],
            DeviceConnection => &[Dashboard],
            Dashboard => &[
                Settings,
                Reports,
                Features,
                Notifications,
                DeviceConnection,
                AiHome,
                VoiceAssistant,
            ],
            AiHome => &[Camera, Upload],
            Camera | Upload => &[Preview],
            Preview => &[AnalysisResult],
            AnalysisResult => &[Dashboard],
            Settings | Reports | Features | Notifications | VoiceAssistant => &[],
        }
    }

    /// `back` targets, most specific first. Where a screen has more than one
    /// predecessor the navigator picks the one it came from.
    pub fn back_edges(&self, key: ScreenKey) -> &'static [ScreenKey] {
        use ScreenKey::*;
        match key {
            Start | Dashboard => &[],
            Login | Signup => &[Start],
            Otp => &[Signup, Login],
            ProfileType => &[Otp],
            ProfileDetails => &[ProfileType],
            Interests => &[ProfileDetails],
            DeviceConnection | Settings | Reports | Features | Notifications | VoiceAssistant
            | AiHome => &[Dashboard],
            Camera | Upload => &[AiHome],
            Preview => &[Camera, Upload],
            AnalysisResult => &[Preview],
        }
    }

    /// `cancel` target: every image-analysis node below `ai-home` returns there.
    pub fn cancel_target(&self, key: ScreenKey) -> Option<ScreenKey> {
        (key.flow() == ScreenFlow::ImageAnalysis && key != ScreenKey::AiHome)
            .then_some(ScreenKey::AiHome)
    }

    /// Returns true if `to` is a forward edge of `from`.
    pub fn has_edge(&self, from: ScreenKey, to: ScreenKey) -> bool {
        self.forward_edges(from).contains(&to)
    }

    /// Entry precondition of a screen.
    pub fn precondition(&self, key: ScreenKey) -> Precondition {
        use ScreenKey::*;
        match key {
            Start | Login | Signup => Precondition::None,
            Otp => Precondition::PhoneEntered,
            ProfileType => Precondition::OtpVerified,
            ProfileDetails => Precondition::ProfileTypeSet,
            Interests => Precondition::DetailsComplete,
            _ => Precondition::OnboardingComplete,
        }
    }

    /// All transitions available from a screen.
    pub fn allowed_transitions(&self, key: ScreenKey) -> Vec<ScreenKey> {
        let mut all: Vec<ScreenKey> = Vec::new();
        let candidates = self
            .forward_edges(key)
            .iter()
            .chain(self.back_edges(key))
            .copied()
            .chain(self.cancel_target(key));
        for target in candidates {
            if !all.contains(&target) {
                all.push(target);
            }
        }
        all
    }

    /// Checks the entry precondition of `key` against `profile`.
    ///
    /// # Errors
    ///
    /// - `PreconditionUnmet` if the profile does not satisfy the screen, or if
    ///   the profile type is missing and the policy is `Reject`.
    pub fn resolve_screen(
        &self,
        key: ScreenKey,
        profile: &UserProfile,
        policy: &NavigationPolicy,
    ) -> Result<ResolvedScreen, NavigationError> {
        let defaulted_profile_type = match self.precondition(key) {
            Precondition::None => None,
            Precondition::PhoneEntered => {
                if !profile.identity().has_phone() {
                    return Err(NavigationError::precondition_unmet(key, "phone number required"));
                }
                None
            }
            Precondition::OtpVerified => {
                if !profile.otp_verified() {
                    return Err(NavigationError::precondition_unmet(key, "phone number not verified"));
                }
                None
            }
            Precondition::ProfileTypeSet => {
                let (_, defaulted) = Self::profile_type_for(key, profile, policy)?;
                defaulted
            }
            Precondition::DetailsComplete => {
                let (profile_type, defaulted) = Self::profile_type_for(key, profile, policy)?;
                validate_details(profile_type, profile.level(), profile.goal())
                    .map_err(|e| NavigationError::precondition_unmet(key, e.to_string()))?;
                defaulted
            }
            Precondition::OnboardingComplete => {
                validate_completion(profile)
                    .map_err(|e| NavigationError::precondition_unmet(key, e.to_string()))?;
                None
            }
        };

        Ok(ResolvedScreen {
            screen: key,
            allowed_transitions: self.allowed_transitions(key),
            defaulted_profile_type,
        })
    }

    fn profile_type_for(
        key: ScreenKey,
        profile: &UserProfile,
        policy: &NavigationPolicy,
    ) -> Result<(ProfileType, Option<ProfileType>), NavigationError> {
        let (profile_type, defaulted) = policy
            .effective_profile_type(profile.profile_type())
            .ok_or_else(|| NavigationError::precondition_unmet(key, "profile type required"))?;
        Ok((profile_type, defaulted.then_some(profile_type)))
    }
}
