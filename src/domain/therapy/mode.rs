//! Therapy modes and their presentation metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Stimulus the device applies.
///
/// Variant order is the row order of the presentation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TherapyMode {
    Heat,
    Cold,
    Vibration,
    Contrast,
}

/// How a mode is shown on the dashboard and result screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePresentation {
    pub label: &'static str,
    pub icon: &'static str,
    /// Accent colour as `#rrggbb`.
    pub accent: &'static str,
}

static PRESENTATIONS: [(TherapyMode, ModePresentation); 4] = [
    (
        TherapyMode::Heat,
        ModePresentation {
            label: "Heat Therapy",
            icon: "flame",
            accent: "#f97316",
        },
    ),
    (
        TherapyMode::Cold,
        ModePresentation {
            label: "Cold Therapy",
            icon: "snowflake",
            accent: "#0ea5e9",
        },
    ),
    (
        TherapyMode::Vibration,
        ModePresentation {
            label: "Vibration",
            icon: "activity",
            accent: "#8b5cf6",
        },
    ),
    (
        TherapyMode::Contrast,
        ModePresentation {
            label: "Contrast Therapy",
            icon: "thermometer",
            accent: "#14b8a6",
        },
    ),
];

impl TherapyMode {
    pub fn all() -> &'static [TherapyMode] {
        &[
            TherapyMode::Heat,
            TherapyMode::Cold,
            TherapyMode::Vibration,
            TherapyMode::Contrast,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TherapyMode::Heat => "heat",
            TherapyMode::Cold => "cold",
            TherapyMode::Vibration => "vibration",
            TherapyMode::Contrast => "contrast",
        }
    }

    /// Looks up the presentation row for this mode.
    pub fn presentation(&self) -> &'static ModePresentation {
        &PRESENTATIONS[*self as usize].1
    }

    /// Returns true if the mode drives the thermal element.
    pub fn uses_temperature(&self) -> bool {
        !matches!(self, TherapyMode::Vibration)
    }
}

impl fmt::Display for TherapyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TherapyMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TherapyMode::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let options: Vec<&str> = TherapyMode::all().iter().map(|m| m.as_str()).collect();
                ValidationError::not_allowed("mode", &options, s)
            })
    }
}
