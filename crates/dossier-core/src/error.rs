use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid field schema: {0}")]
    InvalidSchema(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
