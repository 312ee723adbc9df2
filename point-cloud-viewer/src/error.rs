use thiserror::Error;

/// Failures reported by the streaming and model loaders.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("content not found: {0}")]
    NotFound(String),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("loader rejected {0}")]
    Rejected(String),

    #[error("load was cancelled before it completed")]
    Cancelled,
}

/// Failures while reading a `ViewerConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
