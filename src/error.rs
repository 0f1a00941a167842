//! Error types for little-story

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoryError {
    /// Missing story, episode or manifest. The message is shown to the client.
    #[error("{0}")]
    NotFound(String),

    #[error("No hearts")]
    NoHearts,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        StoryError::NotFound(message.into())
    }
}

pub type Result<T> = std::result::Result<T, StoryError>;
