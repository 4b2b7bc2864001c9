use crate::error::AiError;
use crate::types::{Content, GenerateRequest};
use crate::GenerativeBackend;

/// A conversation with one model under one system instruction.
///
/// History is kept client side and sent with every turn. A turn is only
/// recorded once the model has answered, so a failed request leaves the
/// history exactly as it was.
#[derive(Debug, Clone)]
pub struct ChatContext {
    model: String,
    system_instruction: String,
    history: Vec<Content>,
}

impl ChatContext {
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
            history: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Completed user/model exchanges
    pub fn turns(&self) -> usize {
        self.history.len() / 2
    }

    pub async fn send(
        &mut self,
        backend: &dyn GenerativeBackend,
        message: &str,
    ) -> Result<String, AiError> {
        let user = Content::user_text(message);

        let mut contents = Vec::with_capacity(self.history.len() + 1);
        contents.extend_from_slice(&self.history);
        contents.push(user.clone());

        let request = GenerateRequest {
            contents,
            system_instruction: Some(self.system_instruction.clone()),
        };

        let response = backend.generate(&self.model, &request).await?;

        self.history.push(user);
        self.history.push(Content::model_text(response.text.clone()));

        Ok(response.text)
    }
}
