use serde::{Deserialize, Serialize};

/// Error body returned by the backend on 4xx/5xx responses. The message is
/// optional; callers fall back to a generic text when it is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ErrorBody {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: Some(msg.into()),
        }
    }
}
