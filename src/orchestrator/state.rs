//! States of a transformation attempt.

use crate::image::GeneratedImage;
use serde::{Deserialize, Serialize};

/// Coarse status tag, suitable for display or JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Waiting for input.
    Idle,
    /// A request is in flight.
    Loading,
    /// The last attempt produced an image.
    Success,
    /// The last attempt failed.
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// State of the orchestrator, carrying the outcome once resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransformState {
    /// Waiting for input.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The model returned this image.
    Success(GeneratedImage),
    /// The attempt failed with this user-facing message.
    Error(String),
}

impl TransformState {
    /// Status tag for this state.
    pub fn status(&self) -> Status {
        match self {
            Self::Idle => Status::Idle,
            Self::Loading => Status::Loading,
            Self::Success(_) => Status::Success,
            Self::Error(_) => Status::Error,
        }
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True once an attempt has resolved either way.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }

    /// The produced image, on success.
    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            Self::Success(image) => Some(image),
            _ => None,
        }
    }

    /// The error message, on failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}
