use thiserror::Error;

#[derive(Debug, Error)]
pub enum DarkMatterError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Security policy violation: {0}")]
    Security(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, DarkMatterError>;
