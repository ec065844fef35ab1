//! Error types for the backoffice-link client library.

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, BackofficeLinkError>;

/// Errors produced by the backoffice-link client.
#[derive(Debug, thiserror::Error)]
pub enum BackofficeLinkError {
    /// Transport-level failure (DNS, connect, dropped connection).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The request exceeded its client-side timeout.
    #[error("Request timed out: {0}")]
    TimeoutError(String),

    /// Login was rejected or session recovery failed terminally.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Client was constructed with invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The durable session storage backend failed to load or save.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Request or response body could not be (de)serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The server answered with a non-success status.
    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },
}

impl BackofficeLinkError {
    /// Status code of a `ServerError`, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BackofficeLinkError::ServerError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Whether this error represents an HTTP 401 from the server.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

impl From<reqwest::Error> for BackofficeLinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackofficeLinkError::TimeoutError(err.to_string())
        } else if err.is_decode() {
            BackofficeLinkError::SerializationError(err.to_string())
        } else {
            BackofficeLinkError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackofficeLinkError {
    fn from(err: serde_json::Error) -> Self {
        BackofficeLinkError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for BackofficeLinkError {
    fn from(err: std::io::Error) -> Self {
        BackofficeLinkError::StorageError(err.to_string())
    }
}
