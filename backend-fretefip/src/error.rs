use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid host url: {0}")]
    InvalidHost(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error(transparent)]
    Core(#[from] fretefip_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
