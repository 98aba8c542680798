//! Custom error types for episode-browser.
//!
//! Loading from the catalog has exactly one failure kind, [`LoadError`]:
//! every call site reacts to a transport failure, a bad status and a
//! malformed payload the same way. [`AppError`] covers everything else.

use std::error::Error;
use std::fmt;
use std::io;

/// A failed load from the catalog source.
///
/// Always recoverable: the caller reports it and keeps the prior state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    context: String,
    reason: String,
}

impl LoadError {
    /// Create a load error for `context` (e.g. "shows") with a reason.
    pub fn new(context: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// What was being loaded.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Why it failed.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load {}: {}", self.context, self.reason)
    }
}

impl Error for LoadError {}

/// Application error types.
#[derive(Debug)]
pub enum AppError {
    /// Network/HTTP client setup errors
    Network(String),
    /// Response or input parsing errors
    Parse(String),
    /// Configuration errors
    Config(String),
    /// File and terminal I/O errors
    Io(io::Error),
    /// Catalog load failures
    Load(LoadError),
    /// Invalid input from the user or an input collaborator
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Load(err) => write!(f, "{}", err),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Load(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::Load(err)
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
