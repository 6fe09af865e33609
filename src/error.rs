use thiserror::Error;

/// Errors that can occur during polygon state transitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    /// Attempted to transition between incompatible states
    #[error("Cannot transition from {from} to {to}")]
    InvalidStateTransition {
        from: &'static str,
        to: &'static str,
    },
    /// The referenced vertex does not exist in the current polygon
    #[error("No vertex with id {0}")]
    UnknownVertex(uuid::Uuid),
}

/// Errors raised while talking to the camera server
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Request to {url} returned HTTP {status} {status_text}")]
    Status {
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("Malformed JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Could not decode camera frame: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid server address {0}")]
    Url(#[from] url::ParseError),
}

/// Result type for server operations
pub type SyncResult<T> = Result<T, SyncError>;
