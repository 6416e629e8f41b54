use thiserror::Error;

/// Errors raised by the trend engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The platform identifier is not in the calibration registry.
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
    /// The velocity history store could not be read or written.
    #[error("velocity history unavailable: {0}")]
    HistoryUnavailable(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
