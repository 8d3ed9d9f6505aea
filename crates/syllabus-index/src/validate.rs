//! Advisory consistency checks over a built course index.
//!
//! Nothing here can fail a build. Findings are collected into a
//! [`ValidationReport`] and logged at `warn` level.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::index::CourseIndex;
use crate::page::{PageId, PageRegistry, PageStatus};

/// Knobs for the advisory checks.
#[derive(Clone, Debug)]
pub struct ValidationOptions {
    /// Report real pages nobody links to.
    pub orphans: bool,
    /// Pages excluded from the orphan check.
    pub ignore: Vec<PageId>,
    /// Placeholder ratio above which saturation becomes a warning.
    pub max_placeholder_ratio: Option<f64>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            orphans: true,
            ignore: Vec::new(),
            max_placeholder_ratio: None,
        }
    }
}

/// Two or more entries in one section sharing a title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateTitle {
    /// Section heading.
    pub section: String,
    /// Shared title.
    pub title: String,
    /// Number of entries with that title.
    pub count: usize,
}

/// Share of entries pointing at placeholder pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaceholderSaturation {
    /// Entries whose target is a placeholder.
    pub placeholders: usize,
    /// All entries.
    pub total: usize,
}

impl PlaceholderSaturation {
    /// Placeholder fraction in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.placeholders as f64 / self.total as f64
        }
    }
}

impl fmt::Display for PlaceholderSaturation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} entries point to placeholders ({:.0}%)",
            self.placeholders,
            self.total,
            self.ratio() * 100.0
        )
    }
}

/// Results of the advisory checks.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    /// Duplicate titles, in section order.
    pub duplicate_titles: Vec<DuplicateTitle>,
    /// Placeholder saturation metric.
    pub saturation: PlaceholderSaturation,
    /// Whether saturation exceeded the configured ceiling.
    pub saturation_exceeded: bool,
    /// Real pages not referenced by any entry, in id order.
    pub orphans: Vec<PageId>,
}

impl ValidationReport {
    /// Whether any finding deserves a warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.duplicate_titles.is_empty() || self.saturation_exceeded || !self.orphans.is_empty()
    }

    /// Human-readable findings, one line each.
    #[must_use]
    pub fn findings(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .duplicate_titles
            .iter()
            .map(|d| {
                format!(
                    "Duplicate title \"{}\" appears {} times in section \"{}\"",
                    d.title, d.count, d.section
                )
            })
            .collect();
        if self.saturation_exceeded {
            lines.push(format!("Placeholder saturation high: {}", self.saturation));
        }
        lines.extend(
            self.orphans
                .iter()
                .map(|id| format!("Orphan page: {id} is not linked from the index")),
        );
        lines
    }
}

/// Run every advisory check against `index`.
#[must_use]
pub fn validate(
    index: &CourseIndex,
    registry: &PageRegistry,
    options: &ValidationOptions,
) -> ValidationReport {
    let duplicate_titles = duplicate_titles(index);
    let saturation = placeholder_saturation(index);
    let saturation_exceeded = options
        .max_placeholder_ratio
        .is_some_and(|max| saturation.ratio() > max);
    let orphans = if options.orphans {
        orphan_pages(index, registry, &options.ignore)
    } else {
        Vec::new()
    };

    for dup in &duplicate_titles {
        tracing::warn!(
            section = %dup.section,
            title = %dup.title,
            count = dup.count,
            "Duplicate entry title"
        );
    }
    if saturation_exceeded {
        tracing::warn!(
            placeholders = saturation.placeholders,
            total = saturation.total,
            "Placeholder saturation above threshold"
        );
    } else {
        tracing::info!(
            placeholders = saturation.placeholders,
            total = saturation.total,
            "Placeholder saturation"
        );
    }
    for orphan in &orphans {
        tracing::warn!(page = %orphan, "Orphan page");
    }

    ValidationReport {
        duplicate_titles,
        saturation,
        saturation_exceeded,
        orphans,
    }
}

/// Titles repeated within a single section.
#[must_use]
pub fn duplicate_titles(index: &CourseIndex) -> Vec<DuplicateTitle> {
    let mut duplicates = Vec::new();
    for section in index.sections() {
        // First-appearance order keeps the report stable.
        let mut order: Vec<&str> = Vec::new();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in section.entries() {
            let count = counts.entry(entry.title()).or_insert(0);
            if *count == 0 {
                order.push(entry.title());
            }
            *count += 1;
        }
        duplicates.extend(order.into_iter().filter_map(|title| {
            let count = counts[title];
            (count > 1).then(|| DuplicateTitle {
                section: section.heading().to_owned(),
                title: title.to_owned(),
                count,
            })
        }));
    }
    duplicates
}

/// Count entries resolving to placeholder pages.
#[must_use]
pub fn placeholder_saturation(index: &CourseIndex) -> PlaceholderSaturation {
    let placeholders = index
        .entries()
        .filter(|e| e.status == PageStatus::Placeholder)
        .count();
    PlaceholderSaturation {
        placeholders,
        total: index.entry_count(),
    }
}

/// Real registry pages that no entry references.
#[must_use]
pub fn orphan_pages(
    index: &CourseIndex,
    registry: &PageRegistry,
    ignore: &[PageId],
) -> Vec<PageId> {
    let linked: HashSet<&PageId> = index.entries().map(|e| e.entry.target()).collect();
    registry
        .pages()
        .filter(|(id, status)| {
            *status == PageStatus::Real && !linked.contains(id) && !ignore.contains(*id)
        })
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entry::{EntryDecl, SectionDecl};
    use crate::index::IndexBuilder;

    fn id(s: &str) -> PageId {
        PageId::new(s).unwrap()
    }

    fn setup(real: &[&str], decls: &[SectionDecl]) -> (CourseIndex, PageRegistry) {
        let mut registry = PageRegistry::with_placeholder(id("start.md"));
        for page in real {
            registry.register_page(id(page));
        }
        let index = IndexBuilder::new(&registry).build(decls).unwrap();
        (index, registry)
    }

    #[test]
    fn test_duplicate_title_reported() {
        let decls = vec![SectionDecl::new(
            "Fundamentals",
            vec![
                EntryDecl::new("Null Safety", "null-safety.md"),
                EntryDecl::new("Null Safety", "nullability.md"),
            ],
        )];
        let (index, registry) = setup(&["null-safety.md", "nullability.md"], &decls);

        let report = validate(&index, &registry, &ValidationOptions::default());

        assert_eq!(
            report.duplicate_titles,
            vec![DuplicateTitle {
                section: "Fundamentals".to_owned(),
                title: "Null Safety".to_owned(),
                count: 2,
            }]
        );
        assert!(report.findings()[0].contains("Null Safety"));
    }

    #[test]
    fn test_same_title_in_different_sections_is_not_duplicate() {
        let decls = vec![
            SectionDecl::new("A", vec![EntryDecl::new("Intro", "a.md")]),
            SectionDecl::new("B", vec![EntryDecl::new("Intro", "b.md")]),
        ];
        let (index, _) = setup(&["a.md", "b.md"], &decls);

        assert!(duplicate_titles(&index).is_empty());
    }

    #[test]
    fn test_placeholder_saturation_counts() {
        let decls = vec![SectionDecl::new(
            "Collections",
            vec![
                EntryDecl::new("Lists", "start.md"),
                EntryDecl::new("Maps", "maps.md"),
            ],
        )];
        let (index, registry) = setup(&["maps.md"], &decls);

        let report = validate(&index, &registry, &ValidationOptions::default());

        assert_eq!(
            report.saturation,
            PlaceholderSaturation {
                placeholders: 1,
                total: 2
            }
        );
        assert!((report.saturation.ratio() - 0.5).abs() < f64::EPSILON);
        assert!(!report.saturation_exceeded);
    }

    #[test]
    fn test_saturation_threshold_raises_warning() {
        let decls = vec![SectionDecl::new(
            "Collections",
            vec![EntryDecl::new("Lists", "start.md")],
        )];
        let (index, registry) = setup(&[], &decls);
        let options = ValidationOptions {
            max_placeholder_ratio: Some(0.5),
            ..Default::default()
        };

        let report = validate(&index, &registry, &options);

        assert!(report.saturation_exceeded);
        assert!(report.has_warnings());
        assert!(report.findings()[0].contains("1 of 1"));
    }

    #[test]
    fn test_orphan_pages_reported_in_id_order() {
        let decls = vec![SectionDecl::new(
            "Basics",
            vec![EntryDecl::new("Intro", "intro.md")],
        )];
        let (index, registry) = setup(&["intro.md", "zoo.md", "casting.md"], &decls);

        let report = validate(&index, &registry, &ValidationOptions::default());

        assert_eq!(report.orphans, vec![id("casting.md"), id("zoo.md")]);
    }

    #[test]
    fn test_orphan_check_skips_placeholder_and_ignored() {
        let decls = vec![SectionDecl::new(
            "Basics",
            vec![EntryDecl::new("Intro", "intro.md")],
        )];
        let (index, registry) = setup(&["intro.md", "README.md"], &decls);
        let options = ValidationOptions {
            ignore: vec![id("README.md")],
            ..Default::default()
        };

        let report = validate(&index, &registry, &options);

        assert!(report.orphans.is_empty());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_orphan_check_can_be_disabled() {
        let decls = vec![SectionDecl::new(
            "Basics",
            vec![EntryDecl::new("Intro", "intro.md")],
        )];
        let (index, registry) = setup(&["intro.md", "extra.md"], &decls);
        let options = ValidationOptions {
            orphans: false,
            ..Default::default()
        };

        assert!(validate(&index, &registry, &options).orphans.is_empty());
    }

    #[test]
    fn test_validation_does_not_mutate_index() {
        let decls = vec![SectionDecl::new(
            "Basics",
            vec![EntryDecl::new("Intro", "intro.md")],
        )];
        let (index, registry) = setup(&["intro.md"], &decls);
        let before = index.clone();

        let _ = validate(&index, &registry, &ValidationOptions::default());

        assert_eq!(index, before);
    }
}
