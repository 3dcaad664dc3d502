use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the backend. All of them are recoverable: a failed
/// status poll skips one cycle, a failed settings call is reported and left
/// for the user to retry.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend answered {0}")]
    Status(StatusCode),

    #[error("malformed JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status(code) => Some(*code),
            ClientError::Transport(e) => e.status(),
            ClientError::Decode(_) => None,
        }
    }
}
