use std::path::Path;

use vita_ai::{AiOrchestrator, AiReply, ImageError, ImagePayload};

use crate::error::SubmitRejection;

pub const DEFAULT_IMAGE_PROMPT: &str =
    "Estimate the nutritional value of this meal. Include calories, protein, carbs, and fats.";

/// Meal analyzer state
#[derive(Debug, Clone)]
pub struct ImagePanel {
    image: Option<ImagePayload>,
    prompt: String,
    analysis: Option<String>,
    error: Option<String>,
    pending: bool,
}

/// Inputs captured when an analysis starts
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    prompt: String,
    image: ImagePayload,
}

impl ImagePanel {
    pub fn new() -> Self {
        Self {
            image: None,
            prompt: DEFAULT_IMAGE_PROMPT.to_string(),
            analysis: None,
            error: None,
            pending: false,
        }
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// New image replaces the old one and clears the last analysis
    pub fn set_image(&mut self, image: ImagePayload) {
        self.image = Some(image);
        self.analysis = None;
        self.error = None;
    }

    /// Rejected file; the previous image, if any, stays loaded
    pub fn load_failed(&mut self, error: &ImageError) {
        self.error = Some(error.to_string());
    }

    pub async fn load(&mut self, path: &Path) -> Result<&ImagePayload, ImageError> {
        match ImagePayload::load(path).await {
            Ok(image) => {
                self.analysis = None;
                self.error = None;
                Ok(self.image.insert(image))
            }
            Err(e) => {
                self.load_failed(&e);
                Err(e)
            }
        }
    }

    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, SubmitRejection> {
        if self.pending {
            return Err(SubmitRejection::RequestPending);
        }
        let image = self.image.clone().ok_or(SubmitRejection::MissingImage)?;
        if self.prompt.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }

        self.pending = true;
        self.analysis = None;
        self.error = None;

        Ok(AnalysisRequest {
            prompt: self.prompt.clone(),
            image,
        })
    }

    pub fn finish_analysis(&mut self, reply: AiReply) -> &str {
        self.pending = false;
        self.analysis.insert(reply.text)
    }
}

impl Default for ImagePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisRequest {
    pub async fn run(self, ai: &AiOrchestrator) -> AiReply {
        ai.analyze_image(&self.prompt, &self.image.data_base64, &self.image.mime_type)
            .await
    }
}

/// Quick query state
#[derive(Debug, Clone, Default)]
pub struct QuickPanel {
    result: Option<String>,
    pending: bool,
}

#[derive(Debug, Clone)]
pub struct QuickRequest {
    prompt: String,
}

impl QuickPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn begin(&mut self, prompt: &str) -> Result<QuickRequest, SubmitRejection> {
        if prompt.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }
        if self.pending {
            return Err(SubmitRejection::RequestPending);
        }

        self.pending = true;
        self.result = None;

        Ok(QuickRequest {
            prompt: prompt.to_string(),
        })
    }

    pub fn finish(&mut self, reply: AiReply) -> &str {
        self.pending = false;
        self.result.insert(reply.text)
    }
}

impl QuickRequest {
    pub async fn run(self, ai: &AiOrchestrator) -> AiReply {
        ai.quick_query(&self.prompt).await
    }
}
