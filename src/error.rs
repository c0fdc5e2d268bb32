use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Scan service returned {status}: {message}")]
    Service {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("Malformed scan result: {0}")]
    MalformedResult(String),

    #[error("Scan request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ScanError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ScanError::Validation(_))
    }

    /// Everything reported after a request was dispatched. Malformed results
    /// are presented the same way as transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScanError::Transport(_)
                | ScanError::Service { .. }
                | ScanError::MalformedResult(_)
                | ScanError::Timeout { .. }
                | ScanError::NetworkError(_)
                | ScanError::SerializationError(_)
        )
    }

    /// Short message suitable for the view's error indication.
    pub fn user_message(&self) -> String {
        match self {
            ScanError::Validation(msg) => msg.clone(),
            ScanError::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
