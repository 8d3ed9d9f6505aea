//! Page discovery by filesystem walking.
//!
//! Every `.md` file under the docs source directory becomes a page whose id
//! is its `/`-separated path relative to that directory. Hidden files and
//! directories are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use syllabus_index::{PageId, PageRegistry};

use crate::error::SourceError;

/// Walks a docs directory and registers the pages it finds.
pub struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    /// Create a scanner rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Collect page ids in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::SourceDirNotFound`] if the root does not exist
    /// and [`SourceError::Io`] if a directory cannot be read.
    pub fn scan(&self) -> Result<Vec<PageId>, SourceError> {
        if !self.source_dir.is_dir() {
            return Err(SourceError::SourceDirNotFound(self.source_dir.clone()));
        }
        let mut pages = Vec::new();
        self.scan_directory(&self.source_dir, "", &mut pages)?;
        pages.sort();
        tracing::debug!(
            dir = %self.source_dir.display(),
            pages = pages.len(),
            "Scanned docs directory"
        );
        Ok(pages)
    }

    /// Scan and register every page, classifying against the sentinel.
    ///
    /// # Errors
    ///
    /// See [`scan`](Self::scan).
    pub fn register_into(&self, registry: &mut PageRegistry) -> Result<usize, SourceError> {
        let pages = self.scan()?;
        let count = pages.len();
        for page in pages {
            registry.register_page(page);
        }
        Ok(count)
    }

    fn scan_directory(
        &self,
        dir: &Path,
        prefix: &str,
        pages: &mut Vec<PageId>,
    ) -> Result<(), SourceError> {
        let io_err = |source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            let path = entry.path();

            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                self.scan_directory(&path, &relative, pages)?;
            } else if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("md")) {
                // Names are non-empty, so the id is always valid.
                if let Ok(id) = PageId::new(relative) {
                    pages.push(id);
                }
            }
        }
        Ok(())
    }
}
