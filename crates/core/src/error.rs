use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeetingBotError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response from {endpoint} (status {status}): {reason}")]
    MalformedResponse {
        endpoint: String,
        status: u16,
        reason: String,
    },

    #[error("Stored report for meeting #{id} is not valid JSON: {source}")]
    MalformedStoredPayload {
        id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Invalid API base URL: {value}")]
    InvalidBaseUrl { value: String },

    #[error("Invalid meeting draft: {reason}")]
    InvalidDraft { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl MeetingBotError {
    /// True for transport-level failures (connection refused, DNS, reset).
    pub fn is_network(&self) -> bool {
        matches!(self, MeetingBotError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, MeetingBotError>;
