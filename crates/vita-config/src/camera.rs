use serde::{Deserialize, Serialize};

use crate::non_blank;

fn default_device_path() -> String {
    "/dev/video0".to_string()
}

fn default_start_on() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CameraConfig {
    /// Video capture device node
    #[serde(default = "default_device_path")]
    pub device_path: String,
    /// Camera is switched on when the AR view mounts
    #[serde(default = "default_start_on")]
    pub start_on: bool,
}

impl CameraConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let start_on = lookup("CAMERA_START_ON")
            .map(|v| !matches!(v.trim(), "0" | "false" | "off"))
            .unwrap_or_else(default_start_on);

        Self {
            device_path: non_blank(lookup, "CAMERA_DEVICE").unwrap_or_else(default_device_path),
            start_on,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_path: default_device_path(),
            start_on: default_start_on(),
        }
    }
}
