use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackingError>;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("tracking request failed")]
    Transport(#[from] reqwest::Error),
    #[error("tracking server rejected the request: {code}: {message}")]
    Api { code: String, message: String },
}
