use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Client creation
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("endpoint url must use http or https, got {0}")]
    UnsupportedScheme(String),
    #[error("invalid credential: {0}")]
    InvalidCredential(&'static str),

    // Payload
    #[error("failed to decode response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
