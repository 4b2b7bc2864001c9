/// What went wrong, as far as a caller needs to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request never got a usable HTTP answer
    Transport,
    /// Endpoint answered with an error
    Api,
    /// Model answered but declined or produced no text
    Declined,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Response blocked: {0}")]
    Blocked(String),

    #[error("No text in response")]
    EmptyResponse,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Client error: {0}")]
    Client(String),
}

impl AiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AiError::Network(_) | AiError::Client(_) => FailureKind::Transport,
            AiError::Api { .. }
            | AiError::Authentication(_)
            | AiError::RateLimitExceeded
            | AiError::Parse(_) => FailureKind::Api,
            AiError::Blocked(_) | AiError::EmptyResponse => FailureKind::Declined,
        }
    }
}
