use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RelinkError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Manifest Error: {0}")]
    Manifest(String),

    #[error("Failed to execute command: {0}")]
    CommandExec(String),
}

impl From<std::io::Error> for RelinkError {
    fn from(err: std::io::Error) -> Self {
        RelinkError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for RelinkError {
    fn from(err: serde_json::Error) -> Self {
        RelinkError::Json(Arc::new(err))
    }
}

impl RelinkError {
    /// The underlying I/O error kind, if this error wraps one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            RelinkError::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelinkError>;
