//! Scripted backend for tests in this and dependent crates

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::AiError;
use crate::types::{GenerateRequest, GenerateResponse};
use crate::GenerativeBackend;

#[derive(Debug, Clone)]
pub enum Scripted {
    Text(String),
    Transport,
    ApiError,
    Blocked,
}

impl Scripted {
    pub fn text(text: impl Into<String>) -> Self {
        Scripted::Text(text.into())
    }

    fn into_result(self) -> Result<GenerateResponse, AiError> {
        match self {
            Scripted::Text(text) => Ok(GenerateResponse { text }),
            Scripted::Transport => Err(AiError::Client("connection refused".to_string())),
            Scripted::ApiError => Err(AiError::Api {
                status: 500,
                message: "internal".to_string(),
            }),
            Scripted::Blocked => Err(AiError::Blocked("SAFETY".to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub request: GenerateRequest,
}

/// Answers from a script, records every request. When the script runs out
/// it answers "ok". A gated backend holds each request until `release`.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Semaphore>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn gated(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(script)
        }
    }

    /// Let `n` held requests complete
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            request: request.clone(),
        });

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| AiError::Client(e.to_string()))?
                .forget();
        }

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Scripted::text("ok")).into_result()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
