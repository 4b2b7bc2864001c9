use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::camera::CameraConfig;
use self::gemini::GeminiConfig;
use self::vitals::VitalsConfig;

pub mod camera;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod vitals;

pub use error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub vitals: VitalsConfig,
    pub camera: CameraConfig,

    /// HTTP timeout for model requests
    pub timeout_seconds: u64,
    /// Capacity of the app -> ui channel
    pub ui_channel_capacity: usize,
}

impl Config {
    /// Read the process environment. Fails if no API key is configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key -> value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini = GeminiConfig::from_lookup(&lookup)?;

        let timeout_seconds = positive(&lookup, "TIMEOUT_SECONDS").unwrap_or(30); // 30 seconds default

        let ui_channel_capacity = positive(&lookup, "UI_CHANNEL_CAPACITY").unwrap_or(256);

        Ok(Config {
            gemini,
            vitals: VitalsConfig::from_lookup(&lookup),
            camera: CameraConfig::from_lookup(&lookup),

            timeout_seconds,
            ui_channel_capacity,
        })
    }
}

/// Parse a strictly positive number, `None` if missing, unparsable or zero
pub(crate) fn positive<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}

/// Non-blank string value
pub(crate) fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
