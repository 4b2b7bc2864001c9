pub mod chat;
pub mod error;
pub mod gemini;
pub mod orchestrator;
pub mod types;
pub mod upload;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use chat::ChatContext;
pub use error::{AiError, FailureKind};
pub use gemini::GeminiClient;
pub use orchestrator::{
    AiOrchestrator, AiReply, CHAT_FALLBACK, IMAGE_FALLBACK, QUICK_FALLBACK, SYSTEM_INSTRUCTION,
};
pub use types::{Content, GenerateRequest, GenerateResponse, InlineData, Part};
pub use upload::{ImageError, ImagePayload, MAX_IMAGE_BYTES};

/// Generative model provider interface
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Run one generation request against `model`
    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AiError>;

    /// Provider name, for logs
    fn name(&self) -> &str;
}
