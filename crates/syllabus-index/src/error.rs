//! Error types for course index construction.

use std::fmt;

use crate::page::PageId;

/// Error raised while constructing or resolving course index values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Page identifier is empty.
    #[error("Page identifier cannot be empty")]
    InvalidPageId,
    /// Navigation entry is malformed (empty title or target).
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
    /// Section heading is empty.
    #[error("Section heading cannot be empty")]
    InvalidSection,
    /// Section was declared without any entries.
    #[error("Section `{0}` has no entries")]
    EmptySection(String),
    /// Entry points to a page the registry does not know.
    #[error("Unknown target: {0}")]
    UnknownTarget(PageId),
    /// Declaration list contained no sections.
    #[error("Course index has no sections")]
    EmptyIndex,
    /// Page was never registered.
    #[error("Page not found: {0}")]
    NotFound(PageId),
}

/// A single problem found while building a course index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildProblem {
    /// Heading of the section declaration the problem belongs to.
    pub section: String,
    /// Title of the offending entry, if the problem is entry-level.
    pub entry: Option<String>,
    /// Underlying error.
    pub error: IndexError,
}

impl fmt::Display for BuildProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let section = if self.section.is_empty() {
            "<unnamed>"
        } else {
            &self.section
        };
        match &self.entry {
            Some(entry) => write!(f, "[{section}] \"{entry}\": {}", self.error),
            None => write!(f, "[{section}]: {}", self.error),
        }
    }
}

/// Batch failure returned by [`IndexBuilder::build`](crate::IndexBuilder::build).
///
/// Holds every problem found across the whole declaration list, in
/// declaration order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Course index build failed with {} problem(s)", .problems.len())]
pub struct BuildError {
    /// Problems in declaration order.
    pub problems: Vec<BuildProblem>,
}

impl BuildError {
    /// Iterate over the unresolved targets only.
    pub fn unknown_targets(&self) -> impl Iterator<Item = &PageId> {
        self.problems.iter().filter_map(|p| match &p.error {
            IndexError::UnknownTarget(id) => Some(id),
            _ => None,
        })
    }
}
