use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::non_blank;

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_chat_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_quick_model() -> String {
    "gemini-flash-lite-latest".to_string()
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Multimodal model for chat and image analysis
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Lightweight model for quick queries
    #[serde(default = "default_quick_model")]
    pub quick_model: String,
}

impl GeminiConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_blank(lookup, "GEMINI_API_KEY")
            .or_else(|| non_blank(lookup, "API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            api_url: non_blank(lookup, "GEMINI_ENDPOINT").unwrap_or_else(default_api_url),
            chat_model: non_blank(lookup, "CHAT_MODEL").unwrap_or_else(default_chat_model),
            quick_model: non_blank(lookup, "QUICK_MODEL").unwrap_or_else(default_quick_model),
        })
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            chat_model: default_chat_model(),
            quick_model: default_quick_model(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("chat_model", &self.chat_model)
            .field("quick_model", &self.quick_model)
            .finish()
    }
}
