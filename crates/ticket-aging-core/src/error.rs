//! Error types for snapshot loading, configuration and key parsing.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::Variant;

#[derive(Debug, Error)]
pub enum AgingError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown status: {0:?}")]
    UnknownStatus(String),

    #[error("unknown age bucket: {0:?}")]
    UnknownAgeBucket(String),

    #[error("unknown variant: {0:?}")]
    UnknownVariant(String),

    #[error("department view is not available in the {0} variant")]
    UnsupportedDepartmentView(Variant),
}

impl AgingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
