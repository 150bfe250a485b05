use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Catalog API unexpected response: {0}")]
    CatalogUnexpectedResponse(String),

    #[error("Stream extraction failed: {0}")]
    StreamExtractionError(String),

    #[error("Missing track identifier for {0}")]
    MissingTrackId(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
