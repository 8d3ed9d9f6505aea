//! Page identifiers and the page registry.
//!
//! The [`PageRegistry`] is the universe of pages a course index may link to.
//! Each page is either [`PageStatus::Real`] (authored content) or
//! [`PageStatus::Placeholder`] (a stand-in such as the generic `start.md`
//! page that unwritten lessons point at).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Opaque, non-empty document identifier (usually a relative file path).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageId(String);

impl PageId {
    /// Create a page identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidPageId`] if `id` is empty or whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, IndexError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IndexError::InvalidPageId);
        }
        Ok(Self(id))
    }

    /// Identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PageId {
    type Error = IndexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageId> for String {
    fn from(id: PageId) -> Self {
        id.0
    }
}

/// Whether a page has dedicated content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Content has been authored.
    Real,
    /// Link routes to a generic stand-in page.
    Placeholder,
}

/// Registry of known pages and their status.
///
/// Populated once per build and discarded afterwards. Iteration is ordered
/// by page id so reports are stable between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRegistry {
    pages: BTreeMap<PageId, PageStatus>,
    placeholder: Option<PageId>,
}

impl PageRegistry {
    /// Create an empty registry without a placeholder sentinel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `sentinel` pre-registered as a placeholder.
    ///
    /// Pages added through [`register_page`](Self::register_page) are
    /// classified against this sentinel.
    #[must_use]
    pub fn with_placeholder(sentinel: PageId) -> Self {
        let mut pages = BTreeMap::new();
        pages.insert(sentinel.clone(), PageStatus::Placeholder);
        Self {
            pages,
            placeholder: Some(sentinel),
        }
    }

    /// The placeholder sentinel, if one was configured.
    #[must_use]
    pub fn placeholder(&self) -> Option<&PageId> {
        self.placeholder.as_ref()
    }

    /// Add or update a page. Last write wins.
    pub fn register(&mut self, id: PageId, status: PageStatus) {
        match self.pages.insert(id, status) {
            Some(previous) if previous != status => {
                tracing::debug!(?previous, ?status, "Page status changed");
            }
            _ => {}
        }
    }

    /// Register a page, deriving its status from the placeholder sentinel.
    pub fn register_page(&mut self, id: PageId) -> PageStatus {
        let status = self.classify(&id);
        self.register(id, status);
        status
    }

    /// Status a page would get from the sentinel rule.
    #[must_use]
    pub fn classify(&self, id: &PageId) -> PageStatus {
        if self.placeholder.as_ref() == Some(id) {
            PageStatus::Placeholder
        } else {
            PageStatus::Real
        }
    }

    /// Look up the status of a page.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NotFound`] if the page was never registered.
    pub fn status_of(&self, id: &PageId) -> Result<PageStatus, IndexError> {
        self.pages
            .get(id)
            .copied()
            .ok_or_else(|| IndexError::NotFound(id.clone()))
    }

    /// Whether the page is registered.
    #[must_use]
    pub fn contains(&self, id: &PageId) -> bool {
        self.pages.contains_key(id)
    }

    /// Iterate over all pages in id order.
    pub fn pages(&self) -> impl Iterator<Item = (&PageId, PageStatus)> {
        self.pages.iter().map(|(id, status)| (id, *status))
    }

    /// Number of registered pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PageId {
        PageId::new(s).unwrap()
    }

    #[test]
    fn test_page_id_rejects_empty() {
        assert_eq!(PageId::new(""), Err(IndexError::InvalidPageId));
        assert_eq!(PageId::new("  "), Err(IndexError::InvalidPageId));
    }

    #[test]
    fn test_status_of_unregistered_is_not_found() {
        let registry = PageRegistry::new();
        assert_eq!(
            registry.status_of(&id("intro.md")),
            Err(IndexError::NotFound(id("intro.md")))
        );
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = PageRegistry::new();
        registry.register(id("intro.md"), PageStatus::Real);
        assert_eq!(registry.status_of(&id("intro.md")), Ok(PageStatus::Real));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_identical_is_idempotent() {
        let mut registry = PageRegistry::new();
        registry.register(id("intro.md"), PageStatus::Real);
        let before = registry.clone();
        registry.register(id("intro.md"), PageStatus::Real);
        assert_eq!(registry, before);
    }

    #[test]
    fn test_register_different_status_last_write_wins() {
        let mut registry = PageRegistry::new();
        registry.register(id("lists.md"), PageStatus::Placeholder);
        registry.register(id("lists.md"), PageStatus::Real);
        assert_eq!(registry.status_of(&id("lists.md")), Ok(PageStatus::Real));
    }

    #[test]
    fn test_with_placeholder_preregisters_sentinel() {
        let registry = PageRegistry::with_placeholder(id("start.md"));
        assert_eq!(
            registry.status_of(&id("start.md")),
            Ok(PageStatus::Placeholder)
        );
        assert_eq!(registry.placeholder(), Some(&id("start.md")));
    }

    #[test]
    fn test_register_page_classifies_against_sentinel() {
        let mut registry = PageRegistry::with_placeholder(id("start.md"));
        assert_eq!(registry.register_page(id("start.md")), PageStatus::Placeholder);
        assert_eq!(registry.register_page(id("generics.md")), PageStatus::Real);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_pages_iterates_in_id_order() {
        let mut registry = PageRegistry::new();
        registry.register(id("b.md"), PageStatus::Real);
        registry.register(id("a.md"), PageStatus::Placeholder);
        let ids: Vec<_> = registry.pages().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_page_id_deserialize_rejects_empty() {
        let result: Result<PageId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
        let ok: PageId = serde_json::from_str("\"vars.md\"").unwrap();
        assert_eq!(ok, id("vars.md"));
    }
}
