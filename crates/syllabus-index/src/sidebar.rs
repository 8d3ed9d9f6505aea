//! Serializable sidebar view of a course index.
//!
//! This is the read-only shape handed to sidebar renderers (emitted as JSON
//! by the CLI).

use serde::Serialize;

use crate::index::CourseIndex;
use crate::page::PageStatus;

/// Sidebar ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    /// Sections in rendering order.
    pub sections: Vec<SidebarSection>,
}

/// One sidebar group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarSection {
    /// Group heading.
    pub heading: String,
    /// Links in authoring order.
    pub items: Vec<SidebarItem>,
}

/// One sidebar link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    /// Display title.
    pub title: String,
    /// Target page id.
    pub target: String,
    /// Resolved page status.
    pub status: PageStatus,
}

impl From<&CourseIndex> for Sidebar {
    fn from(index: &CourseIndex) -> Self {
        let sections = index
            .resolved_sections()
            .map(|(section, statuses)| SidebarSection {
                heading: section.heading().to_owned(),
                items: section
                    .entries()
                    .iter()
                    .zip(statuses)
                    .map(|(entry, &status)| SidebarItem {
                        title: entry.title().to_owned(),
                        target: entry.target().to_string(),
                        status,
                    })
                    .collect(),
            })
            .collect();
        Self { sections }
    }
}
