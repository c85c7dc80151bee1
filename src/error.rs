//! Error types for the tracetally library

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while scanning logs, reading summaries, or rendering charts
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid summary JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid trace prefix: {0}")]
    InvalidPrefix(String),

    #[error("Invalid trace pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl TallyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
