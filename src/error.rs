/// Error types for story storage and ingestion.

use thiserror::Error;

/// Main error type for story operations.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Corrupt story archive: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Failed to encode image: {0}")]
    ImageEncode(String),

    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task join error: {0}")]
    Task(String),
}

/// Result type for story operations.
pub type Result<T> = std::result::Result<T, StoryError>;
