//! Error types for the publishing pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PressroomError>;

/// Errors surfaced by provider and publisher collaborators.
///
/// The assembly pipeline itself absorbs these (a failed image step degrades
/// to "no image at this boundary"); they reach callers only through the
/// collaborator APIs directly.
#[derive(Debug, Error)]
pub enum PressroomError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("image provider error: {0}")]
    Provider(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("media upload failed: {0}")]
    Upload(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}
