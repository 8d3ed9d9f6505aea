//! Source loading errors.

use std::path::PathBuf;

/// Error reading sidebar declarations or discovering pages.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Docs source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    SourceDirNotFound(PathBuf),
    /// I/O error on a specific path.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Sidebar file could not be turned into declarations.
    #[error("{}:{line}: {message}", path.display())]
    Sidebar {
        /// Sidebar file.
        path: PathBuf,
        /// 1-based line of the offending item.
        line: usize,
        /// Description of the problem.
        message: String,
    },
}
