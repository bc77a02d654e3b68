use thiserror::Error;

/// Errors raised while loading or applying persisted tracker state
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Unknown body designation: {0}")]
    UnknownDesignation(String),

    #[error("Invalid stored rotation: {0}")]
    InvalidRotation(String),

    #[error("Unknown skeleton config value: {0}")]
    UnknownConfigValue(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
