//! CLI error types.

use syllabus_config::ConfigError;
use syllabus_index::IndexError;
use syllabus_source::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
