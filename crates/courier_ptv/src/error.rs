use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PtvError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request rejected: {status} - {body}")]
    Validation {
        status: u16,
        body: serde_json::Value,
    },

    #[error("API error: {status} - {body}")]
    Service {
        status: u16,
        body: serde_json::Value,
    },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl PtvError {
    /// Classifies a non-success response. `body` is the raw response text,
    /// kept as a JSON string when the service did not answer with JSON.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_owned()));
        let status = status.as_u16();

        match status {
            400 | 422 => PtvError::Validation { status, body },
            _ => PtvError::Service { status, body },
        }
    }

    /// The structured error body returned by the service, if any.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            PtvError::Validation { body, .. } | PtvError::Service { body, .. } => Some(body),
            PtvError::Transport(_) | PtvError::Deserialize(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            PtvError::Validation { status, .. } | PtvError::Service { status, .. } => Some(*status),
            PtvError::Transport(error) => error.status().map(|status| status.as_u16()),
            PtvError::Deserialize(_) => None,
        }
    }
}
