//! Merge several course indexes into one canonical index.
//!
//! Sections are matched by heading and entries by title, both in
//! first-appearance order. Entries coming from the same source index are
//! never merged together, so a sidebar that repeats a title keeps both links.
//! A same-titled entry with an identical target is preferred as the match.
//! When two sources disagree on a target, a real page beats a placeholder and
//! otherwise the first source wins. Every disagreement is reported as a
//! [`Conflict`].

use crate::entry::{NavigationEntry, Section};
use crate::error::IndexError;
use crate::index::{CourseIndex, ResolvedEntry};
use crate::page::{PageId, PageStatus};

/// Two sources pointing one title at different targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// Section heading.
    pub section: String,
    /// Entry title.
    pub title: String,
    /// Target kept in the merged index.
    pub kept: PageId,
    /// Target discarded.
    pub dropped: PageId,
}

/// Outcome of [`reconcile`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciled {
    /// Merged index.
    pub index: CourseIndex,
    /// Target disagreements, in merge order.
    pub conflicts: Vec<Conflict>,
}

struct MergedEntry {
    entry: NavigationEntry,
    status: PageStatus,
    /// Sources already matched to this slot.
    origins: Vec<usize>,
}

struct MergedSection {
    heading: String,
    entries: Vec<MergedEntry>,
}

/// Merge `indexes` into a single course index.
///
/// # Errors
///
/// Returns [`IndexError::EmptyIndex`] if `indexes` is empty.
pub fn reconcile(indexes: &[CourseIndex]) -> Result<Reconciled, IndexError> {
    if indexes.is_empty() {
        return Err(IndexError::EmptyIndex);
    }

    let mut merged: Vec<MergedSection> = Vec::new();
    let mut conflicts = Vec::new();

    for (origin, index) in indexes.iter().enumerate() {
        for resolved in index.entries() {
            let heading = resolved.section.heading();
            let pos = match merged.iter().position(|s| s.heading == heading) {
                Some(pos) => pos,
                None => {
                    merged.push(MergedSection {
                        heading: heading.to_owned(),
                        entries: Vec::new(),
                    });
                    merged.len() - 1
                }
            };
            merge_entry(&mut merged[pos], resolved, origin, &mut conflicts);
        }
    }

    let mut sections = Vec::with_capacity(merged.len());
    let mut statuses = Vec::with_capacity(merged.len());
    for section in merged {
        let (entries, resolved): (Vec<_>, Vec<_>) = section
            .entries
            .into_iter()
            .map(|m| (m.entry, m.status))
            .unzip();
        sections.push(Section::new(section.heading, entries)?);
        statuses.push(resolved);
    }

    if !conflicts.is_empty() {
        tracing::warn!(conflicts = conflicts.len(), "Course indexes disagree on targets");
    }
    tracing::info!(
        sources = indexes.len(),
        sections = sections.len(),
        "Reconciled course indexes"
    );

    Ok(Reconciled {
        index: CourseIndex::from_parts(sections, statuses),
        conflicts,
    })
}

fn merge_entry(
    section: &mut MergedSection,
    resolved: ResolvedEntry<'_>,
    origin: usize,
    conflicts: &mut Vec<Conflict>,
) {
    let title = resolved.entry.title();
    // A source claims each slot at most once, so its own repeated titles
    // always land in separate slots.
    let mut candidates = section
        .entries
        .iter_mut()
        .filter(|m| !m.origins.contains(&origin) && m.entry.title() == title)
        .peekable();

    if candidates.peek().is_none() {
        section.entries.push(MergedEntry {
            entry: resolved.entry.clone(),
            status: resolved.status,
            origins: vec![origin],
        });
        return;
    }

    let mut first = None;
    for candidate in candidates {
        if candidate.entry.target() == resolved.entry.target() {
            candidate.origins.push(origin);
            return;
        }
        first.get_or_insert(candidate);
    }
    let Some(existing) = first else {
        return;
    };
    existing.origins.push(origin);

    let replace =
        existing.status == PageStatus::Placeholder && resolved.status == PageStatus::Real;
    let (kept, dropped) = if replace {
        (resolved.entry.target(), existing.entry.target())
    } else {
        (existing.entry.target(), resolved.entry.target())
    };
    tracing::debug!(section = %section.heading, title, %kept, %dropped, "Target conflict");
    conflicts.push(Conflict {
        section: section.heading.clone(),
        title: title.to_owned(),
        kept: kept.clone(),
        dropped: dropped.clone(),
    });

    if replace {
        existing.entry = resolved.entry.clone();
        existing.status = resolved.status;
    }
}
