use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocsyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Translation provider error: {0}")]
    Provider(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, LocsyncError>;
