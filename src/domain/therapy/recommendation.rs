//! TherapyRecommendation - the inference result shown on the analysis screen.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, ValidationError};

use super::TherapyMode;

/// Device settings for one therapy session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings")]
pub struct TherapySettings {
    intensity: u8,
    duration_minutes: u8,
    temperature_celsius: u8,
}

impl TherapySettings {
    pub const INTENSITY_RANGE: (u8, u8) = (1, 10);
    pub const DURATION_RANGE: (u8, u8) = (1, 60);
    pub const TEMPERATURE_RANGE: (u8, u8) = (5, 50);

    /// Creates settings, rejecting any value outside the device's limits.
    pub fn new(
        intensity: u8,
        duration_minutes: u8,
        temperature_celsius: u8,
    ) -> Result<Self, ValidationError> {
        check_range("intensity", intensity, Self::INTENSITY_RANGE)?;
        check_range("duration_minutes", duration_minutes, Self::DURATION_RANGE)?;
        check_range(
            "temperature_celsius",
            temperature_celsius,
            Self::TEMPERATURE_RANGE,
        )?;
        Ok(Self {
            intensity,
            duration_minutes,
            temperature_celsius,
        })
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn duration_minutes(&self) -> u8 {
        self.duration_minutes
    }

    pub fn temperature_celsius(&self) -> u8 {
        self.temperature_celsius
    }
}

#[derive(Deserialize)]
struct RawSettings {
    intensity: u8,
    duration_minutes: u8,
    temperature_celsius: u8,
}

impl TryFrom<RawSettings> for TherapySettings {
    type Error = ValidationError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        Self::new(raw.intensity, raw.duration_minutes, raw.temperature_celsius)
    }
}

fn check_range(field: &str, value: u8, (min, max): (u8, u8)) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::out_of_range(
            field,
            min as i32,
            max as i32,
            value as i32,
        ));
    }
    Ok(())
}

/// What the inference service suggests for a captured image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapyRecommendation {
    /// Body area the model detected, e.g. `lower-back`.
    pub area: String,
    pub confidence: Percentage,
    pub mode: TherapyMode,
    pub settings: TherapySettings,
}

impl TherapyRecommendation {
    pub fn new(
        area: impl Into<String>,
        confidence: Percentage,
        mode: TherapyMode,
        settings: TherapySettings,
    ) -> Result<Self, ValidationError> {
        let area = area.into();
        if area.trim().is_empty() {
            return Err(ValidationError::empty_field("area"));
        }
        Ok(Self {
            area,
            confidence,
            mode,
            settings,
        })
    }
}
