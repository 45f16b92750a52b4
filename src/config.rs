//! Tunable thresholds for every stage.
//!
//! Defaults are the calibrated heuristics; each can be overridden from the
//! environment via [`ValidationConfig::from_env`] or loaded from JSON.

use crate::mrz::score::ScorePolicy;
use serde::Deserialize;
use std::time::Duration;

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_duration_ms(name: &str, default: Option<Duration>) -> Option<Duration> {
    match std::env::var(name) {
        Ok(v) => match v.trim().parse::<u64>() {
            Ok(0) => None,
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => default,
        },
        Err(_) => default,
    }
}

/// Image quality thresholds
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Minimum width in pixels
    pub min_width: u32,
    /// Minimum height in pixels
    pub min_height: u32,
    /// Minimum Laplacian variance
    pub min_sharpness: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
            min_sharpness: 50.0,
        }
    }
}

/// MRZ acceptance policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct MrzConfig {
    /// Per-check deductions and acceptance threshold
    pub score: ScorePolicy,
}

/// Layout thresholds
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Largest allowed face x-origin, as a fraction of image width
    pub max_face_x_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_face_x_ratio: 0.4,
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Quality gate
    pub quality: QualityConfig,
    /// MRZ scoring
    pub mrz: MrzConfig,
    /// Layout check
    pub layout: LayoutConfig,
    /// Deadline applied to each provider call; `None` waits indefinitely
    #[serde(with = "timeout_ms")]
    pub provider_timeout: Option<Duration>,
}

impl ValidationConfig {
    /// Defaults overridden by `PASSPORT_*` environment variables
    ///
    /// Unset or unparsable variables keep the default value.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `PASSPORT_*` environment overrides on top of `self`
    pub fn with_env_overrides(self) -> Self {
        let q = self.quality;
        let s = self.mrz.score;
        Self {
            quality: QualityConfig {
                min_width: parse_env_u32("PASSPORT_MIN_WIDTH", q.min_width),
                min_height: parse_env_u32("PASSPORT_MIN_HEIGHT", q.min_height),
                min_sharpness: parse_env_f64("PASSPORT_MIN_SHARPNESS", q.min_sharpness),
            },
            mrz: MrzConfig {
                score: ScorePolicy {
                    passport_number_weight: parse_env_u8(
                        "PASSPORT_WEIGHT_NUMBER",
                        s.passport_number_weight,
                    ),
                    birth_date_weight: parse_env_u8("PASSPORT_WEIGHT_BIRTH", s.birth_date_weight),
                    expiry_date_weight: parse_env_u8(
                        "PASSPORT_WEIGHT_EXPIRY",
                        s.expiry_date_weight,
                    ),
                    composite_weight: parse_env_u8("PASSPORT_WEIGHT_COMPOSITE", s.composite_weight),
                    min_score: parse_env_u8("PASSPORT_MIN_SCORE", s.min_score),
                },
            },
            layout: LayoutConfig {
                max_face_x_ratio: parse_env_f64(
                    "PASSPORT_FACE_MAX_X_RATIO",
                    self.layout.max_face_x_ratio,
                ),
            },
            provider_timeout: parse_env_duration_ms(
                "PASSPORT_PROVIDER_TIMEOUT_MS",
                self.provider_timeout,
            ),
        }
    }

    /// Parse a JSON document; missing keys take their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

mod timeout_ms {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = Option::<u64>::deserialize(deserializer)?;
        Ok(ms.filter(|&ms| ms > 0).map(Duration::from_millis))
    }
}
