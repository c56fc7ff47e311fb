use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl ForgeError {
    /// Validation failure with a formatted, author-facing message.
    pub fn validation(msg: impl Into<String>) -> Self {
        ForgeError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
