use thiserror::Error;

/// Why a backend call failed. Only the client layer sees these; callers of
/// [`crate::ApiClient`] receive fallback values instead.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{endpoint}: connection failed: {message}")]
    Connect {
        endpoint: &'static str,
        message: String,
    },

    #[error("{endpoint}: request timed out")]
    Timeout { endpoint: &'static str },

    #[error("{endpoint}: HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("{endpoint}: invalid response body: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },

    #[error("{endpoint}: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },
}

impl ClientError {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Connect { .. } => "connect",
            ClientError::Timeout { .. } => "timeout",
            ClientError::Status { .. } => "status",
            ClientError::Decode { .. } => "decode",
            ClientError::Transport { .. } => "transport",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ClientError::Connect { endpoint, .. }
            | ClientError::Timeout { endpoint }
            | ClientError::Status { endpoint, .. }
            | ClientError::Decode { endpoint, .. }
            | ClientError::Transport { endpoint, .. } => *endpoint,
        }
    }

    pub(crate) fn from_reqwest(endpoint: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout { endpoint }
        } else if err.is_connect() {
            ClientError::Connect {
                endpoint,
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ClientError::Decode {
                endpoint,
                reason: err.to_string(),
            }
        } else {
            ClientError::Transport {
                endpoint,
                message: err.to_string(),
            }
        }
    }
}
