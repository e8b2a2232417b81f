//! ScreenKey - every screen the navigator can show.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Which part of the app a screen belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenFlow {
    /// Start, login, signup, OTP.
    Auth,
    /// Profile type, details, interests.
    Onboarding,
    /// Dashboard and its children.
    MainApp,
    /// Capture → preview → analysis sub-flow, rooted at `ai-home`.
    ImageAnalysis,
}

/// Named screen identifier. Serialized in kebab-case (`profile-details`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenKey {
    Start,
    Login,
    Signup,
    Otp,
    ProfileType,
    ProfileDetails,
    Interests,
    DeviceConnection,
    Dashboard,
    Settings,
    Reports,
    Features,
    Notifications,
    VoiceAssistant,
    AiHome,
    Camera,
    Upload,
    Preview,
    AnalysisResult,
}

impl ScreenKey {
    /// Returns every screen key.
    pub fn all() -> &'static [ScreenKey] {
        use ScreenKey::*;
        &[
            Start,
            Login,
            Signup,
            Otp,
            ProfileType,
            ProfileDetails,
            Interests,
            DeviceConnection,
            Dashboard,
            Settings,
            Reports,
            Features,
            Notifications,
            VoiceAssistant,
            AiHome,
            Camera,
            Upload,
            Preview,
            AnalysisResult,
        ]
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenKey::Start => "start",
            ScreenKey::Login => "login",
            ScreenKey::Signup => "signup",
            ScreenKey::Otp => "otp",
            ScreenKey::ProfileType => "profile-type",
            ScreenKey::ProfileDetails => "profile-details",
            ScreenKey::Interests => "interests",
            ScreenKey::DeviceConnection => "device-connection",
            ScreenKey::Dashboard => "dashboard",
            ScreenKey::Settings => "settings",
            ScreenKey::Reports => "reports",
            ScreenKey::Features => "features",
            ScreenKey::Notifications => "notifications",
            ScreenKey::VoiceAssistant => "voice-assistant",
            ScreenKey::AiHome => "ai-home",
            ScreenKey::Camera => "camera",
            ScreenKey::Upload => "upload",
            ScreenKey::Preview => "preview",
            ScreenKey::AnalysisResult => "analysis-result",
        }
    }

    /// Returns the flow this screen belongs to.
    pub fn flow(&self) -> ScreenFlow {
        use ScreenKey::*;
        match self {
            Start | Login | Signup | Otp => ScreenFlow::Auth,
            ProfileType | ProfileDetails | Interests => ScreenFlow::Onboarding,
            AiHome | Camera | Upload | Preview | AnalysisResult => ScreenFlow::ImageAnalysis,
            DeviceConnection | Dashboard | Settings | Reports | Features | Notifications
            | VoiceAssistant => ScreenFlow::MainApp,
        }
    }

    /// Returns true for screens only reachable once onboarding has completed.
    pub fn is_main_app(&self) -> bool {
        matches!(self.flow(), ScreenFlow::MainApp | ScreenFlow::ImageAnalysis)
    }
}

impl fmt::Display for ScreenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScreenKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScreenKey::all()
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::invalid_format("screen", format!("unknown screen '{}'", s)))
    }
}
