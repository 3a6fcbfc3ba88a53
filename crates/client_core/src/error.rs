use thiserror::Error;

/// Client-side error taxonomy: transport failures, backend-reported errors,
/// and local validation failures that block a request before any network
/// call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the backend's `msg` field when it
    /// sent one, else a generic fallback.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("session storage failed: {0}")]
    Session(#[from] std::io::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors raised locally, with no request on the wire.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
