use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::positive;

fn default_scan_dwell_ms() -> u64 {
    3500
}

fn default_tick_interval_ms() -> u64 {
    2000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct VitalsConfig {
    /// Time spent "scanning" before a subject is detected
    #[serde(default = "default_scan_dwell_ms")]
    pub scan_dwell_ms: u64,
    /// Period of the vitals update tick
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl VitalsConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            scan_dwell_ms: positive(lookup, "SCAN_DWELL_MS").unwrap_or_else(default_scan_dwell_ms),
            tick_interval_ms: positive(lookup, "VITALS_TICK_MS")
                .unwrap_or_else(default_tick_interval_ms),
        }
    }

    pub fn scan_dwell(&self) -> Duration {
        Duration::from_millis(self.scan_dwell_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            scan_dwell_ms: default_scan_dwell_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}
