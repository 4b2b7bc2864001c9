use std::sync::Arc;
use std::time::Duration;

use vita_config::gemini::GeminiConfig;

use crate::chat::ChatContext;
use crate::error::{AiError, FailureKind};
use crate::gemini::GeminiClient;
use crate::types::{Content, GenerateRequest, InlineData, Part};
use crate::GenerativeBackend;

pub const SYSTEM_INSTRUCTION: &str = "You are a friendly and knowledgeable health assistant. Provide helpful and safe information regarding general health, nutrition, and wellness based on the user's queries. Do not provide medical advice, diagnoses, or prescriptions. Always advise users to consult a healthcare professional for personal health concerns.";

pub const CHAT_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";
pub const IMAGE_FALLBACK: &str = "Sorry, I couldn't analyze the image. Please try another one.";
pub const QUICK_FALLBACK: &str = "Sorry, I couldn't get a quick analysis. Please try again.";

/// Model output, or the fallback text that replaced it.
///
/// `text` is always fit for display; `failure` says why it is a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiReply {
    pub text: String,
    pub failure: Option<FailureKind>,
}

impl AiReply {
    pub fn answered(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failure: None,
        }
    }

    pub fn fallback(text: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            text: text.into(),
            failure: Some(kind),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

/// Entry point for the three AI tools. Never returns an error: failures are
/// logged and turned into a fixed fallback reply.
#[derive(Clone)]
pub struct AiOrchestrator {
    backend: Arc<dyn GenerativeBackend>,
    chat_model: String,
    quick_model: String,
}

impl AiOrchestrator {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        chat_model: impl Into<String>,
        quick_model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            chat_model: chat_model.into(),
            quick_model: quick_model.into(),
        }
    }

    pub fn from_config(config: &GeminiConfig, timeout: Duration) -> Result<Self, AiError> {
        let client = GeminiClient::new(config, timeout)?;
        Ok(Self::new(
            Arc::new(client),
            config.chat_model.clone(),
            config.quick_model.clone(),
        ))
    }

    /// New conversation with the health-assistant instruction
    pub fn open_chat(&self) -> ChatContext {
        ChatContext::new(self.chat_model.clone(), SYSTEM_INSTRUCTION)
    }

    pub async fn chat_turn(&self, context: &mut ChatContext, message: &str) -> AiReply {
        match context.send(self.backend.as_ref(), message).await {
            Ok(text) => AiReply::answered(text),
            Err(e) => {
                tracing::error!(
                    backend = self.backend.name(),
                    model = context.model(),
                    "Error getting chat response: {}",
                    e
                );
                AiReply::fallback(CHAT_FALLBACK, e.kind())
            }
        }
    }

    /// One-shot multimodal request: the image part, then the instruction
    pub async fn analyze_image(&self, prompt: &str, image_data: &str, mime_type: &str) -> AiReply {
        let request = GenerateRequest {
            contents: vec![Content {
                role: vita_types::Role::User,
                parts: vec![
                    Part::InlineData(InlineData {
                        mime_type: mime_type.to_string(),
                        data: image_data.to_string(),
                    }),
                    Part::Text(prompt.to_string()),
                ],
            }],
            system_instruction: None,
        };

        match self.backend.generate(&self.chat_model, &request).await {
            Ok(response) => AiReply::answered(response.text),
            Err(e) => {
                tracing::error!(backend = self.backend.name(), "Error analyzing image: {}", e);
                AiReply::fallback(IMAGE_FALLBACK, e.kind())
            }
        }
    }

    pub async fn quick_query(&self, prompt: &str) -> AiReply {
        let request = GenerateRequest::text(prompt);

        match self.backend.generate(&self.quick_model, &request).await {
            Ok(response) => AiReply::answered(response.text),
            Err(e) => {
                tracing::error!(backend = self.backend.name(), "Error getting quick analysis: {}", e);
                AiReply::fallback(QUICK_FALLBACK, e.kind())
            }
        }
    }
}
