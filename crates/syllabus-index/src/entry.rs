//! Navigation entries, sections and their source declarations.

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::page::PageId;

/// One link in a course index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    title: String,
    target: PageId,
}

impl NavigationEntry {
    /// Create a navigation entry.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidEntry`] if the title or target is empty.
    pub fn new(title: impl Into<String>, target: impl Into<String>) -> Result<Self, IndexError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(IndexError::InvalidEntry("title cannot be empty".to_owned()));
        }
        let target = PageId::new(target).map_err(|_| {
            IndexError::InvalidEntry(format!("\"{title}\" has an empty target"))
        })?;
        Ok(Self { title, target })
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Target page.
    #[must_use]
    pub fn target(&self) -> &PageId {
        &self.target
    }
}

/// Named, ordered group of navigation entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    heading: String,
    entries: Vec<NavigationEntry>,
}

impl Section {
    /// Create a section.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidSection`] for an empty heading and
    /// [`IndexError::EmptySection`] when `entries` is empty.
    pub fn new(
        heading: impl Into<String>,
        entries: Vec<NavigationEntry>,
    ) -> Result<Self, IndexError> {
        let heading = heading.into();
        if heading.trim().is_empty() {
            return Err(IndexError::InvalidSection);
        }
        if entries.is_empty() {
            return Err(IndexError::EmptySection(heading));
        }
        Ok(Self { heading, entries })
    }

    /// Section heading.
    #[must_use]
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Entries in authoring order.
    #[must_use]
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }
}

/// Declared `(title, target)` pair, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDecl {
    /// Display title.
    pub title: String,
    /// Raw target identifier.
    pub target: String,
}

impl EntryDecl {
    /// Create an entry declaration.
    #[must_use]
    pub fn new(title: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            target: target.into(),
        }
    }
}

/// Declared section, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDecl {
    /// Section heading.
    pub heading: String,
    /// Entry declarations in authoring order.
    pub entries: Vec<EntryDecl>,
}

impl SectionDecl {
    /// Create a section declaration.
    #[must_use]
    pub fn new(heading: impl Into<String>, entries: Vec<EntryDecl>) -> Self {
        Self {
            heading: heading.into(),
            entries,
        }
    }
}
