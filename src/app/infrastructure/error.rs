use thiserror::Error;

/// A required field that blocks export when strict validation is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Title,
    Content,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0:?} is required")]
    Required(MissingField),

    #[error("invalid color \"{0}\"")]
    InvalidColor(String),

    #[error("no page at index {0}")]
    UnknownPage(usize),

    #[error("no image with id {0}")]
    UnknownImage(u64),

    #[error("no history entry at index {0}")]
    UnknownVersion(usize),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
