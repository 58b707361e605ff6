use std::time::Duration;

/// Result type for issue search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced by the issue search core. Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Filter language is not in the configured registry
    #[error("Unsupported language: '{language}'")]
    Validation { language: String },

    /// GitHub answered with a non-success status
    #[error("GitHub API error ({status}): {message}")]
    RemoteApi { status: u16, message: String },

    /// Successful response without the expected shape
    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    /// Request did not complete within the configured bound
    #[error("Search request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, TLS or body decoding failure
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SearchError {
    /// HTTP status of a remote failure, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}
