use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    UiEvent(UiEvent),
    ViewChanged(View),
    ToolChanged(ToolSelection),
    CameraStatus(CameraState),
    CameraPreview {
        stream_id: Option<String>,
    },
    ScanStatusChanged {
        status: ScanStatus,
        error: Option<String>,
    },
    VitalsUpdate(VitalsReading),
    ChatMessage(ChatMessage),
    ChatPending(bool),
    ImageLoaded {
        mime_type: String,
        bytes: usize,
    },
    ImageAnalysis(String),
    QuickResponse(String),
    PanelBusy {
        tool: ToolSelection,
        busy: bool,
    },
    Notice(String),
    BackendReady,
}

/// Input coming from the front-end
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SelectView(View),
    SelectTool(ToolSelection),
    ToggleCamera,
    /// Free text for whichever AI tool is active
    TextInput(String),
    LoadImage(PathBuf),
    SetImagePrompt(String),
    AnalyzeImage,
    Close,
}

/// One set of simulated vital signs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsReading {
    pub systolic: f64,
    pub diastolic: f64,
    pub heart_rate: f64,
    pub sugar_level: f64,
}

impl VitalsReading {
    pub const INITIAL: VitalsReading = VitalsReading {
        systolic: 120.0,
        diastolic: 80.0,
        heart_rate: 75.0,
        sugar_level: 95.0,
    };

    pub fn blood_pressure(&self) -> String {
        format!("{:.0}/{:.0} mmHg", self.systolic.round(), self.diastolic.round())
    }

    pub fn pulse(&self) -> String {
        format!("{:.0} BPM", self.heart_rate.round())
    }

    pub fn blood_sugar(&self) -> String {
        format!("{:.1} mg/dL", self.sugar_level)
    }
}

impl Default for VitalsReading {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for VitalsReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BP {} | HR {} | Sugar {}",
            self.blood_pressure(),
            self.pulse(),
            self.blood_sugar()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    #[default]
    Scanning,
    Detected,
    Error,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScanStatus::Scanning => "scanning",
            ScanStatus::Detected => "detected",
            ScanStatus::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub is_on: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolSelection {
    #[default]
    Chat,
    Image,
    Quick,
}

impl ToolSelection {
    pub fn label(&self) -> &'static str {
        match self {
            ToolSelection::Chat => "Health Chatbot",
            ToolSelection::Image => "Meal Analyzer",
            ToolSelection::Quick => "Quick Query",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Ar,
    Ai,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::Ar => "AR Monitor",
            View::Ai => "Gemini Tools",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_reading_display() {
        let reading = VitalsReading::default();
        assert_eq!(reading.blood_pressure(), "120/80 mmHg");
        assert_eq!(reading.pulse(), "75 BPM");
        assert_eq!(reading.blood_sugar(), "95.0 mg/dL");
    }

    #[test]
    fn test_display_rounds_fractional_readings() {
        let reading = VitalsReading {
            systolic: 121.6,
            diastolic: 79.4,
            heart_rate: 74.5,
            sugar_level: 96.349,
        };
        assert_eq!(reading.blood_pressure(), "122/79 mmHg");
        assert_eq!(reading.pulse(), "75 BPM");
        assert_eq!(reading.blood_sugar(), "96.3 mg/dL");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::model("hi")).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"hi"}"#);
    }
}
