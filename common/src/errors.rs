use thiserror::Error;

/// Structured error types for the alert service
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Lookup error: {0}")]
    LookupError(String),

    #[error("Compose error: {0}")]
    ComposeError(String),

    #[error("Send error: {0}")]
    SendError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::HttpError {
            status,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TimeoutError(message.into())
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self::LookupError(message.into())
    }

    pub fn compose(message: impl Into<String>) -> Self {
        Self::ComposeError(message.into())
    }

    pub fn send(message: impl Into<String>) -> Self {
        Self::SendError(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}
