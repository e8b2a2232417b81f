//! Scripted companion session.
//!
//! Loads configuration, installs tracing, wires fake or HTTP collaborators
//! and walks one user through onboarding and the main app.

use std::error::Error;
use std::sync::Arc;

use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use therapy_companion::adapters::fake::{
    FakeAuthProvider, FakeDevicePairing, FakeImageCapture, FakeInferenceService, FakeVoiceEngine,
    InMemoryNotificationStore, InMemorySessionStore, DEFAULT_VALID_CODE,
};
use therapy_companion::adapters::http::{
    BackendClient, HttpAuthProvider, HttpInferenceService, HttpVoiceEngine,
};
use therapy_companion::application::{
    DeviceConnectionHandler, ImageAnalysisHandler, NotificationCenter, OnboardingService,
    VoiceAssistantHandler,
};
use therapy_companion::config::{AppConfig, TelemetryConfig, ValidationError};
use therapy_companion::domain::device::DeviceHandle;
use therapy_companion::domain::foundation::DeviceId;
use therapy_companion::domain::navigation::{NavigationIntent, ScreenKey};
use therapy_companion::domain::notification::NotificationType;
use therapy_companion::domain::otp::OtpState;
use therapy_companion::domain::profile::{InterestSelection, ProfileType, SignUpForm};
use therapy_companion::ports::{AuthProvider, InferenceService, VoiceEngine};

/// Collaborators selected by `backend.mode`.
struct Collaborators {
    auth: Arc<dyn AuthProvider>,
    inference: Arc<dyn InferenceService>,
    voice: Arc<dyn VoiceEngine>,
}

impl Collaborators {
    fn from_config(config: &AppConfig) -> Result<Self, Box<dyn Error>> {
        let Some(client_config) = config.backend.client_config() else {
            return Ok(Self {
                auth: Arc::new(FakeAuthProvider::new()),
                inference: Arc::new(FakeInferenceService::new()),
                voice: Arc::new(FakeVoiceEngine::default()),
            });
        };
        info!(base_url = %client_config.base_url, "using http backend");
        let client = BackendClient::new(client_config)?;
        Ok(Self {
            auth: Arc::new(HttpAuthProvider::new(client.clone())),
            inference: Arc::new(HttpInferenceService::new(client.clone())),
            voice: Arc::new(HttpVoiceEngine::new(client)),
        })
    }
}

fn init_tracing(telemetry: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&telemetry.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if telemetry.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Reads the OTP from stdin when a real backend sent it by SMS.
async fn read_code(prompt_needed: bool) -> Result<String, Box<dyn Error>> {
    if !prompt_needed {
        return Ok(DEFAULT_VALID_CODE.to_string());
    }
    println!("Enter the 6-digit code sent to your phone:");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let line = lines
        .next_line()
        .await?
        .ok_or(ValidationError::MissingRequired("otp code"))?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.telemetry);

    let collaborators = Collaborators::from_config(&config)?;
    let retry = config.retry.to_retry_config();
    let sessions = Arc::new(InMemorySessionStore::new());
    let onboarding = OnboardingService::new(
        Arc::clone(&collaborators.auth),
        sessions,
        config.onboarding_options(),
    );

    // ── Onboarding ──────────────────────────────────────────────────────────
    onboarding.dispatch(NavigationIntent::Navigate(ScreenKey::Signup))?;
    onboarding
        .sign_up(&SignUpForm {
            name: "Jane Doe".into(),
            email: "j@x.com".into(),
            phone: "+15551234567".into(),
            password: "secret123".into(),
            confirm_password: "secret123".into(),
            agree_to_terms: true,
        })
        .await?;

    let otp = onboarding.open_otp()?;
    let code = read_code(config.backend.is_http()).await?;
    otp.paste(&code).await?;
    if otp.state() != OtpState::Verified {
        warn!(state = ?otp.state(), "code not accepted");
        return Ok(());
    }
    onboarding.confirm_otp(&otp)?;
    drop(otp);

    onboarding.choose_profile_type(ProfileType::Athlete)?;
    onboarding.submit_details("intermediate", None)?;
    let completed = onboarding
        .submit_interests(InterestSelection::from_parts(
            ["performance", "analytics"],
            "performance",
        ))
        .await?;
    println!("{}", serde_json::to_string_pretty(&completed.session)?);

    // ── Main app ────────────────────────────────────────────────────────────
    let notifications = NotificationCenter::new(Arc::new(InMemoryNotificationStore::new()), retry);

    let pad = DeviceHandle::new(DeviceId::new("AA:BB:CC:01")?, "Therapy Pad").with_rssi(-58);
    let devices = DeviceConnectionHandler::new(
        Arc::new(FakeDevicePairing::new().with_device(pad)),
        config.pairing.scan_timeout(),
        retry,
    );
    let session = devices.connect_nearest().await?;
    notifications
        .push(NotificationType::Device, "Device connected", &session.device.name)
        .await?;
    onboarding.dispatch(NavigationIntent::Navigate(ScreenKey::Dashboard))?;

    let analysis = ImageAnalysisHandler::new(
        Arc::new(FakeImageCapture::new()),
        Arc::clone(&collaborators.inference),
        retry,
    );
    onboarding.dispatch(NavigationIntent::Navigate(ScreenKey::AiHome))?;
    onboarding.dispatch(NavigationIntent::Navigate(ScreenKey::Camera))?;
    analysis.take_photo().await?;
    onboarding.dispatch(NavigationIntent::Navigate(ScreenKey::Preview))?;
    let recommendation = analysis.analyze().await?;
    onboarding.dispatch(NavigationIntent::Navigate(ScreenKey::AnalysisResult))?;
    let presentation = recommendation.mode.presentation();
    println!(
        "{} for {} ({}% confidence): intensity {}, {} min",
        presentation.label,
        recommendation.area,
        recommendation.confidence.value(),
        recommendation.settings.intensity(),
        recommendation.settings.duration_minutes(),
    );
    onboarding.dispatch(NavigationIntent::Navigate(ScreenKey::Dashboard))?;

    let assistant = VoiceAssistantHandler::new(Arc::clone(&collaborators.voice), retry);
    onboarding.dispatch(NavigationIntent::Navigate(ScreenKey::VoiceAssistant))?;
    let command = assistant
        .listen(Box::pin(stream::iter(vec![vec![0u8; 320]])))
        .await?;
    onboarding.dispatch(NavigationIntent::Back)?;
    if let Some(target) = command.target.filter(|t| *t != ScreenKey::Dashboard) {
        onboarding.dispatch(NavigationIntent::Navigate(target))?;
    }

    info!(
        screen = %onboarding.current_screen(),
        unread = notifications.unread_count().await?,
        "session finished"
    );
    devices.disconnect().await?;
    Ok(())
}
