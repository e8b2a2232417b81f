//! Step validation for the profile-details and interests screens.
//!
//! These functions back each screen's `canContinue` flag and the final
//! completion check.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::catalog::{goal_options, level_options, FEATURE_TAGS, FOCUS_AREAS};
use super::{ProfileType, UserProfile};

/// Validates the profile-details step for a given profile type.
///
/// `health` needs both an age bracket and a goal; the other types only need a
/// level. Values must come from the type's option catalog.
pub fn validate_details(
    profile_type: ProfileType,
    level: &str,
    goal: Option<&str>,
) -> Result<(), ValidationError> {
    let levels = level_options(profile_type);
    if level.trim().is_empty() {
        return Err(ValidationError::empty_field("level"));
    }
    if !levels.contains(&level) {
        return Err(ValidationError::not_allowed("level", levels, level));
    }

    if profile_type.requires_goal() {
        let goals = goal_options(profile_type);
        match goal.map(str::trim) {
            None | Some("") => return Err(ValidationError::empty_field("goal")),
            Some(g) if !goals.contains(&g) => {
                return Err(ValidationError::not_allowed("goal", goals, g))
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// `canContinue` for the profile-details screen.
pub fn can_continue_details(profile: &UserProfile) -> bool {
    profile
        .profile_type()
        .map(|pt| validate_details(pt, profile.level(), profile.goal()).is_ok())
        .unwrap_or(false)
}

/// Validates a full interests array: one or more feature tags followed by
/// exactly one focus-area tag.
pub fn validate_interests(interests: &[String]) -> Result<(), ValidationError> {
    let Some((focus, features)) = interests.split_last() else {
        return Err(ValidationError::empty_field("interests"));
    };
    if features.is_empty() {
        return Err(ValidationError::invalid_format(
            "interests",
            "at least one feature tag is required before the focus area",
        ));
    }
    if let Some(unknown) = features.iter().find(|f| !FEATURE_TAGS.contains(&f.as_str())) {
        return Err(ValidationError::not_allowed("interests", FEATURE_TAGS, unknown.as_str()));
    }
    if !FOCUS_AREAS.contains(&focus.as_str()) {
        return Err(ValidationError::not_allowed("focus_area", FOCUS_AREAS, focus.as_str()));
    }
    Ok(())
}

/// Validates everything onboarding requires before the profile can be frozen.
pub fn validate_completion(profile: &UserProfile) -> Result<(), ValidationError> {
    if !profile.otp_verified() {
        return Err(ValidationError::invalid_format("otp_verified", "phone number not verified"));
    }
    let profile_type = profile
        .profile_type()
        .ok_or_else(|| ValidationError::empty_field("profile_type"))?;
    validate_details(profile_type, profile.level(), profile.goal())?;
    validate_interests(profile.interests())
}

/// Working state of the interests screen.
///
/// Feature tags are toggled on and off; the focus area is a single choice.
/// The screen sends [`into_interests`](Self::into_interests) as one full
/// replacement array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestSelection {
    features: Vec<String>,
    focus: Option<String>,
}

impl InterestSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from feature tags and a focus area.
    pub fn from_parts<I, S>(features: I, focus: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for feature in features {
            selection.toggle_feature(feature);
        }
        selection.set_focus(focus);
        selection
    }

    /// Selects the tag if absent, deselects it otherwise. Selection order is kept.
    pub fn toggle_feature(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if let Some(pos) = self.features.iter().position(|f| f == &tag) {
            self.features.remove(pos);
        } else {
            self.features.push(tag);
        }
    }

    pub fn set_focus(&mut self, focus: impl Into<String>) {
        self.focus = Some(focus.into());
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// `canContinue` for the interests screen.
    pub fn can_continue(&self) -> bool {
        self.compose().map(|i| validate_interests(&i).is_ok()).unwrap_or(false)
    }

    /// Composes the full interests array (`features ++ [focus]`) after
    /// validating it.
    pub fn into_interests(self) -> Result<Vec<String>, ValidationError> {
        let interests = self
            .compose()
            .ok_or_else(|| ValidationError::empty_field("focus_area"))?;
        validate_interests(&interests)?;
        Ok(interests)
    }

    fn compose(&self) -> Option<Vec<String>> {
        let focus = self.focus.clone()?;
        let mut all = self.features.clone();
        all.push(focus);
        Some(all)
    }
}
