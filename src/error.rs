use std::path::PathBuf;
use thiserror::Error;

/// Apiwalk error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(String),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Unsupported manifest format: {0}")]
    UnsupportedManifest(PathBuf),

    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("Not a namespace: {0}")]
    NotANamespace(String),

    #[error("No root namespace given (use --root or [crawl] root in the config)")]
    MissingRoot,

    #[error("{0}")]
    Other(String),
}

/// Result type alias for apiwalk operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a namespace-not-found error
    pub fn namespace_not_found(path: impl Into<String>) -> Self {
        Error::NamespaceNotFound(path.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
