use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vita_config::gemini::GeminiConfig;

use crate::error::AiError;
use crate::types::{Content, GenerateRequest, GenerateResponse};
use crate::GenerativeBackend;

/// Finish reasons that mean the model refused to answer
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
];

/// Gemini `generateContent` over HTTPS
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, timeout: Duration) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::Authentication("missing API key".to_string()));
        }

        let url = self.generate_url(model);
        tracing::debug!("Gemini request to {} ({} contents)", url, request.contents.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&WireRequest::from(request))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_response(status, &body)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireSystemInstruction<'a>>,
}

#[derive(Debug, Serialize)]
struct WireSystemInstruction<'a> {
    parts: [WireTextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct WireTextPart<'a> {
    text: &'a str,
}

impl<'a> From<&'a GenerateRequest> for WireRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        Self {
            contents: &request.contents,
            system_instruction: request.system_instruction.as_deref().map(|text| {
                WireSystemInstruction {
                    parts: [WireTextPart { text }],
                }
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    candidates: Option<Vec<WireCandidate>>,
    prompt_feedback: Option<WirePromptFeedback>,
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

/// Response parts may carry extra keys (thought signatures etc), only text matters
#[derive(Debug, Deserialize)]
struct WireResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireErrorEnvelope {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    code: Option<u16>,
    message: String,
    status: Option<String>,
}

fn error_from_status(status: u16, body: &str) -> AiError {
    let (message, api_status) = match serde_json::from_str::<WireErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (format!("HTTP {}", status), None),
    };

    match (status, api_status.as_deref()) {
        (401 | 403, _) | (_, Some("UNAUTHENTICATED" | "PERMISSION_DENIED")) => {
            AiError::Authentication(message)
        }
        (429, _) | (_, Some("RESOURCE_EXHAUSTED")) => AiError::RateLimitExceeded,
        _ => AiError::Api { status, message },
    }
}

/// Turn an HTTP status and body into the model's text
pub(crate) fn parse_response(status: u16, body: &str) -> Result<GenerateResponse, AiError> {
    if !(200..300).contains(&status) {
        return Err(error_from_status(status, body));
    }

    let response: WireResponse =
        serde_json::from_str(body).map_err(|e| AiError::Parse(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(AiError::Api {
            status: error.code.unwrap_or(status),
            message: error.message,
        });
    }

    let candidate = response.candidates.and_then(|c| c.into_iter().next());

    let text: String = candidate
        .as_ref()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(GenerateResponse { text });
    }

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AiError::Blocked(reason));
    }

    match candidate.and_then(|c| c.finish_reason) {
        Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => {
            Err(AiError::Blocked(reason))
        }
        _ => Err(AiError::EmptyResponse),
    }
}
