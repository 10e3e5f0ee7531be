//! Error types for lycee-core.

use thiserror::Error;

/// Result type alias using lycee-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for lycee operations
#[derive(Error, Debug)]
pub enum Error {
    // Dataset errors
    #[error("Institution not found: {0}")]
    InstitutionNotFound(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    // Text-completion collaborator errors
    #[error("Completion endpoint returned {status}: {body}")]
    Completion { status: u16, body: String },

    #[error("Completion transport error: {0}")]
    Transport(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an error from a non-success upstream response
    pub fn completion(status: u16, body: impl Into<String>) -> Self {
        Self::Completion {
            status,
            body: body.into(),
        }
    }

    /// Check if this error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InstitutionNotFound(_))
    }

    /// Check if this error came from the text-completion collaborator
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Completion { .. } | Self::Transport(_))
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
