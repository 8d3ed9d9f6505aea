//! Course index and its builder.
//!
//! [`IndexBuilder`] turns an ordered list of [`SectionDecl`]s into a
//! [`CourseIndex`], resolving every target against a [`PageRegistry`].
//! Problems are collected across the whole declaration list so a single run
//! reports every broken link.
//!
//! # Example
//!
//! ```
//! use syllabus_index::{EntryDecl, IndexBuilder, PageId, PageRegistry, PageStatus, SectionDecl};
//!
//! let mut registry = PageRegistry::new();
//! registry.register(PageId::new("intro.md")?, PageStatus::Real);
//!
//! let decls = vec![SectionDecl::new("Basics", vec![EntryDecl::new("Intro", "intro.md")])];
//! let index = IndexBuilder::new(&registry).build(&decls)?;
//!
//! assert_eq!(index.sections().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::entry::{NavigationEntry, Section, SectionDecl};
use crate::error::{BuildError, BuildProblem, IndexError};
use crate::page::{PageId, PageRegistry, PageStatus};

/// Immutable, validated course index.
///
/// Every entry carries the status its target resolved to at build time, so
/// consumers never need the registry to render it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseIndex {
    sections: Vec<Section>,
    /// Resolved status per entry, parallel to `sections[i].entries()`.
    statuses: Vec<Vec<PageStatus>>,
}

/// Entry together with its section and resolved status.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedEntry<'a> {
    /// Section containing the entry.
    pub section: &'a Section,
    /// The entry itself.
    pub entry: &'a NavigationEntry,
    /// Status of the entry's target.
    pub status: PageStatus,
}

impl CourseIndex {
    pub(crate) fn from_parts(sections: Vec<Section>, statuses: Vec<Vec<PageStatus>>) -> Self {
        debug_assert_eq!(sections.len(), statuses.len());
        debug_assert!(
            sections
                .iter()
                .zip(&statuses)
                .all(|(s, st)| s.entries().len() == st.len())
        );
        Self { sections, statuses }
    }

    /// Sections in rendering order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Iterate over sections together with the statuses of their entries.
    pub fn resolved_sections(&self) -> impl Iterator<Item = (&Section, &[PageStatus])> {
        self.sections
            .iter()
            .zip(&self.statuses)
            .map(|(section, statuses)| (section, statuses.as_slice()))
    }

    /// Iterate over every entry in order, with its resolved status.
    pub fn entries(&self) -> impl Iterator<Item = ResolvedEntry<'_>> {
        self.resolved_sections()
            .flat_map(|(section, statuses)| {
                section
                    .entries()
                    .iter()
                    .zip(statuses)
                    .map(move |(entry, &status)| ResolvedEntry {
                        section,
                        entry,
                        status,
                    })
            })
    }

    /// Total number of entries across all sections.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries().len()).sum()
    }

    /// Status a referenced target resolved to, `None` if not referenced.
    #[must_use]
    pub fn status_of(&self, target: &PageId) -> Option<PageStatus> {
        self.entries()
            .find(|e| e.entry.target() == target)
            .map(|e| e.status)
    }
}

/// Builds [`CourseIndex`] values against a page registry.
pub struct IndexBuilder<'a> {
    registry: &'a PageRegistry,
}

impl<'a> IndexBuilder<'a> {
    /// Create a builder resolving targets against `registry`.
    #[must_use]
    pub fn new(registry: &'a PageRegistry) -> Self {
        Self { registry }
    }

    /// Build a course index from ordered section declarations.
    ///
    /// Sections and entries keep their declaration order. A malformed
    /// declaration (empty heading, no entries, invalid entry) fails only that
    /// section. The remaining entries of a section with an invalid entry are
    /// still resolved, so unknown targets are reported for every offending
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] listing every problem found.
    pub fn build(&self, decls: &[SectionDecl]) -> Result<CourseIndex, BuildError> {
        if decls.is_empty() {
            return Err(BuildError {
                problems: vec![BuildProblem {
                    section: String::new(),
                    entry: None,
                    error: IndexError::EmptyIndex,
                }],
            });
        }

        let mut sections = Vec::with_capacity(decls.len());
        let mut statuses = Vec::with_capacity(decls.len());
        let mut problems = Vec::new();

        for decl in decls {
            if let Some((section, resolved)) = self.build_section(decl, &mut problems) {
                sections.push(section);
                statuses.push(resolved);
            }
        }

        if !problems.is_empty() {
            tracing::warn!(problems = problems.len(), "Course index build failed");
            return Err(BuildError { problems });
        }

        let index = CourseIndex::from_parts(sections, statuses);
        tracing::info!(
            sections = index.sections().len(),
            entries = index.entry_count(),
            "Built course index"
        );
        Ok(index)
    }

    /// Validate and resolve one section declaration.
    ///
    /// Returns `None` if any problem was recorded for the section.
    fn build_section(
        &self,
        decl: &SectionDecl,
        problems: &mut Vec<BuildProblem>,
    ) -> Option<(Section, Vec<PageStatus>)> {
        let section_problem = |error| BuildProblem {
            section: decl.heading.clone(),
            entry: None,
            error,
        };

        if decl.heading.trim().is_empty() {
            problems.push(section_problem(IndexError::InvalidSection));
            return None;
        }
        if decl.entries.is_empty() {
            problems.push(section_problem(IndexError::EmptySection(
                decl.heading.clone(),
            )));
            return None;
        }

        tracing::debug!(section = %decl.heading, entries = decl.entries.len(), "Resolving section");

        let mut entries = Vec::with_capacity(decl.entries.len());
        let mut resolved = Vec::with_capacity(decl.entries.len());
        let mut failed = false;

        // Keep going after a bad entry so every unknown target is reported.
        for entry_decl in &decl.entries {
            let entry = match NavigationEntry::new(&entry_decl.title, &entry_decl.target) {
                Ok(entry) => entry,
                Err(error) => {
                    problems.push(BuildProblem {
                        section: decl.heading.clone(),
                        entry: (!entry_decl.title.trim().is_empty())
                            .then(|| entry_decl.title.clone()),
                        error,
                    });
                    failed = true;
                    continue;
                }
            };

            match self.registry.status_of(entry.target()) {
                Ok(status) => resolved.push(status),
                Err(_) => {
                    problems.push(BuildProblem {
                        section: decl.heading.clone(),
                        entry: Some(entry.title().to_owned()),
                        error: IndexError::UnknownTarget(entry.target().clone()),
                    });
                    failed = true;
                }
            }
            entries.push(entry);
        }

        if failed {
            return None;
        }

        match Section::new(decl.heading.clone(), entries) {
            Ok(section) => Some((section, resolved)),
            Err(error) => {
                problems.push(section_problem(error));
                None
            }
        }
    }
}
