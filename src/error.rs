//! Error types for colloquy

use thiserror::Error;

/// Result type alias for colloquy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a session
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Translation error: {message}")]
    Translation {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("HTTP error: status {status}\nResponse body: {body}")]
    Http { status: u16, body: String },

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Translation failure without an underlying parse error.
    pub fn translation(message: impl Into<String>) -> Self {
        Error::Translation {
            message: message.into(),
            source: None,
        }
    }

    /// Translation failure caused by a malformed payload.
    pub fn malformed(source: serde_json::Error) -> Self {
        Error::Translation {
            message: format!("malformed response: {source}"),
            source: Some(source),
        }
    }
}
