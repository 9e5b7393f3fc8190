use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Identification error: {0}")]
    Identification(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
