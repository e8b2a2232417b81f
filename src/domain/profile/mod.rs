//! Profile module - the registration record built up during onboarding.
//!
//! - `profile` - `UserProfile`, `ProfilePatch` merge, `CompletedProfile`
//! - `profile_type` - athlete / coach / health persona
//! - `catalog` - option sets offered per profile type
//! - `steps` - `canContinue` rules for the details and interests screens
//! - `forms` - signup/login form validation

pub mod catalog;
mod forms;
#[allow(clippy::module_inception)]
mod profile;
mod profile_type;
mod steps;

pub use forms::{SignInForm, SignUpForm, MIN_PASSWORD_LENGTH};
pub use profile::{CompletedProfile, Identity, ProfilePatch, UserProfile};
pub use profile_type::ProfileType;
pub use steps::{
    can_continue_details, validate_completion, validate_details, validate_interests,
    InterestSelection,
};
