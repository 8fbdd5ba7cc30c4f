//! Error types for studio transformations.

use std::fmt;

/// Message shown when the remote service rejects the API key.
pub const INVALID_KEY_MESSAGE: &str = "The API key is invalid. Check it and try again.";

/// Message shown when the model answered without an image.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Image generation failed. The photo or style may violate the content policy.";

/// Why a state transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    /// No source image has been loaded.
    NoImage,
    /// No credential has passed validation.
    NotValidated,
    /// An attempt is already in flight.
    InFlight,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImage => write!(f, "no image loaded"),
            Self::NotValidated => write!(f, "API key not validated"),
            Self::InFlight => write!(f, "a transformation is already running"),
        }
    }
}

/// Errors that can occur while validating keys or transforming images.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// The remote service flagged the API key as invalid.
    #[error("invalid API key")]
    InvalidKey,

    /// Authentication rejected for another reason (401/403).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The key could not be validated (network failure, service error).
    #[error("could not validate API key: {0}")]
    ValidationFailed(String),

    /// The response contained no image.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Source image missing or not decodable.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A state transition was refused.
    #[error("transition rejected: {0}")]
    Rejected(Blocker),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Key-value storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A background task could not be started.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl StudioError {
    /// Returns true if the remote service rejected the credential itself.
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey | Self::Auth(_))
    }

    /// Returns the message to display inline after a failed attempt.
    ///
    /// Service messages pass through unchanged; only the invalid-key and
    /// no-image cases are replaced by fixed wording.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidKey => INVALID_KEY_MESSAGE.to_string(),
            Self::GenerationFailed(_) => GENERATION_FAILED_MESSAGE.to_string(),
            Self::Api { message, .. } | Self::Auth(message) => message.clone(),
            Self::Network(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;
