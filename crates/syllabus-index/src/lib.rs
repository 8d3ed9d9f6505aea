//! Course index model for syllabus.
//!
//! This crate provides:
//! - [`PageRegistry`]: known pages, classified real or placeholder
//! - [`NavigationEntry`] and [`Section`]: validated sidebar values
//! - [`IndexBuilder`]: builds a [`CourseIndex`] from declarations, reporting
//!   every broken link in one pass
//! - [`validate`]: advisory checks (duplicate titles, placeholder
//!   saturation, orphan pages)
//! - [`reconcile`]: merges several course indexes into one
//! - [`Sidebar`]: serializable view for renderers
//!
//! # Quick Start
//!
//! ```
//! use syllabus_index::{
//!     EntryDecl, IndexBuilder, PageId, PageRegistry, SectionDecl, ValidationOptions, validate,
//! };
//!
//! let mut registry = PageRegistry::with_placeholder(PageId::new("start.md")?);
//! registry.register_page(PageId::new("generics.md")?);
//!
//! let decls = vec![SectionDecl::new(
//!     "Advanced",
//!     vec![
//!         EntryDecl::new("Generics", "generics.md"),
//!         EntryDecl::new("Reflection", "start.md"),
//!     ],
//! )];
//! let index = IndexBuilder::new(&registry).build(&decls)?;
//! let report = validate(&index, &registry, &ValidationOptions::default());
//!
//! assert_eq!(report.saturation.placeholders, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod entry;
mod error;
mod index;
mod page;
mod reconcile;
mod sidebar;
mod validate;

pub use entry::{EntryDecl, NavigationEntry, Section, SectionDecl};
pub use error::{BuildError, BuildProblem, IndexError};
pub use index::{CourseIndex, IndexBuilder, ResolvedEntry};
pub use page::{PageId, PageRegistry, PageStatus};
pub use reconcile::{Conflict, Reconciled, reconcile};
pub use sidebar::{Sidebar, SidebarItem, SidebarSection};
pub use validate::{
    DuplicateTitle, PlaceholderSaturation, ValidationOptions, ValidationReport, duplicate_titles,
    orphan_pages, placeholder_saturation, validate,
};
