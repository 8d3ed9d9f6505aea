//! Docsify-style sidebar parsing.
//!
//! Turns a Markdown sidebar into section declarations:
//!
//! ```markdown
//! * **Kotlin Fundamentals**
//!   * [Variables](variables.md)
//!   * [Null Safety](null-safety.md)
//! * **Advanced Topics**
//!   * [Generics](start.md)
//! ```
//!
//! Top-level items without a link open a section. Linked items nested under
//! them (at any depth) become entries of that section. A top-level link has
//! no section to belong to and is rejected.

use std::path::Path;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use syllabus_index::{EntryDecl, SectionDecl};

use crate::error::SourceError;

/// Problem found while parsing a sidebar.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct SidebarError {
    /// 1-based line of the offending item.
    pub line: usize,
    /// Description of the problem.
    pub message: String,
}

/// Read and parse a sidebar file.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read and
/// [`SourceError::Sidebar`] if its structure is invalid.
pub fn load_sidebar(path: &Path) -> Result<Vec<SectionDecl>, SourceError> {
    let markdown = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sections = parse_sidebar(&markdown).map_err(|e| SourceError::Sidebar {
        path: path.to_path_buf(),
        line: e.line,
        message: e.message,
    })?;
    tracing::debug!(path = %path.display(), sections = sections.len(), "Loaded sidebar");
    Ok(sections)
}

/// Parse sidebar Markdown into section declarations.
///
/// # Errors
///
/// Returns [`SidebarError`] for a link that is not nested under a section.
pub fn parse_sidebar(markdown: &str) -> Result<Vec<SectionDecl>, SidebarError> {
    let mut parser = SidebarParser::new(markdown);
    for (event, range) in Parser::new(markdown).into_offset_iter() {
        parser.handle(event, range.start)?;
    }
    Ok(parser.sections)
}

/// Normalize a link destination into a page id.
///
/// Strips `#fragment`/`?query` and leading `./` or `/`, then applies docsify
/// resolution: a directory link maps to its `README.md` and an
/// extensionless link gets `.md` appended. Returns `None` for external
/// links, which are not course pages.
#[must_use]
pub fn normalize_target(dest: &str) -> Option<String> {
    let dest = dest.trim();
    if dest.contains("://") || dest.starts_with("mailto:") {
        return None;
    }

    let path = dest.split(['#', '?']).next().unwrap_or_default();
    if path.is_empty() {
        // Pure fragment: nothing to resolve, let the builder reject it.
        return Some(String::new());
    }

    let mut path = path;
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            break;
        }
    }

    if path.is_empty() || path.ends_with('/') {
        return Some(format!("{path}README.md"));
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    if file_name.contains('.') {
        Some(path.to_owned())
    } else {
        Some(format!("{path}.md"))
    }
}

struct PendingLink {
    dest: String,
    text: String,
}

struct OpenItem {
    depth: usize,
    line: usize,
    text: String,
    link: Option<PendingLink>,
    in_link: bool,
    emitted: bool,
}

struct SidebarParser<'a> {
    source: &'a str,
    depth: usize,
    items: Vec<OpenItem>,
    sections: Vec<SectionDecl>,
}

impl<'a> SidebarParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            depth: 0,
            items: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>, offset: usize) -> Result<(), SidebarError> {
        match event {
            Event::Start(Tag::List(_)) => {
                // Nested list: the parent item's own text is complete.
                self.emit_top()?;
                self.depth += 1;
            }
            Event::End(TagEnd::List(_)) => self.depth = self.depth.saturating_sub(1),
            Event::Start(Tag::Item) => self.items.push(OpenItem {
                depth: self.depth,
                line: self.line_of(offset),
                text: String::new(),
                link: None,
                in_link: false,
                emitted: false,
            }),
            Event::End(TagEnd::Item) => {
                self.emit_top()?;
                self.items.pop();
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                if let Some(item) = self.items.last_mut()
                    && !item.emitted
                    && item.link.is_none()
                {
                    item.link = Some(PendingLink {
                        dest: dest_url.into_string(),
                        text: String::new(),
                    });
                    item.in_link = true;
                }
            }
            Event::End(TagEnd::Link) => {
                if let Some(item) = self.items.last_mut() {
                    item.in_link = false;
                }
            }
            Event::Text(text) | Event::Code(text) => self.push_text(&text),
            Event::SoftBreak | Event::HardBreak => self.push_text(" "),
            _ => {}
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        let Some(item) = self.items.last_mut() else {
            return;
        };
        if item.emitted {
            return;
        }
        match (&mut item.link, item.in_link) {
            (Some(link), true) => link.text.push_str(text),
            _ => item.text.push_str(text),
        }
    }

    /// Turn the innermost open item into a section or entry, once.
    fn emit_top(&mut self) -> Result<(), SidebarError> {
        let Some(item) = self.items.last_mut() else {
            return Ok(());
        };
        if item.emitted {
            return Ok(());
        }
        item.emitted = true;
        let depth = item.depth;
        let line = item.line;
        let text = std::mem::take(&mut item.text);
        let link = item.link.take();

        match link {
            Some(link) => {
                let title = link.text.trim();
                let section = match self.sections.last_mut() {
                    Some(section) if depth > 1 => section,
                    _ => {
                        return Err(SidebarError {
                            line,
                            message: format!("link \"{title}\" is not inside a section"),
                        });
                    }
                };
                if let Some(target) = normalize_target(&link.dest) {
                    section.entries.push(EntryDecl::new(title, target));
                } else {
                    tracing::warn!(line, dest = %link.dest, "Skipping external link in sidebar");
                }
            }
            None if depth <= 1 => {
                self.sections.push(SectionDecl::new(text.trim(), Vec::new()));
            }
            None => {
                tracing::debug!(line, text = %text.trim(), "Ignoring nested item without link");
            }
        }
        Ok(())
    }

    fn line_of(&self, offset: usize) -> usize {
        self.source.as_bytes()[..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_docsify_sidebar() {
        let markdown = "\
* **Kotlin Fundamentals**
  * [Variables](variables.md)
  * [Null Safety](null-safety.md)
* **Advanced Topics**
  * [Generics](start.md)
";
        let sections = parse_sidebar(markdown).unwrap();

        assert_eq!(
            sections,
            vec![
                SectionDecl::new(
                    "Kotlin Fundamentals",
                    vec![
                        EntryDecl::new("Variables", "variables.md"),
                        EntryDecl::new("Null Safety", "null-safety.md"),
                    ]
                ),
                SectionDecl::new("Advanced Topics", vec![EntryDecl::new("Generics", "start.md")]),
            ]
        );
    }

    #[test]
    fn test_parse_plain_heading_and_dash_bullets() {
        let markdown = "\
- Basics
  - [Loops](loops.md)
";
        let sections = parse_sidebar(markdown).unwrap();

        assert_eq!(
            sections,
            vec![SectionDecl::new("Basics", vec![EntryDecl::new("Loops", "loops.md")])]
        );
    }

    #[test]
    fn test_parse_loose_list() {
        let markdown = "\
* **Basics**

  * [Intro](intro.md)

  * [Vars](vars.md)
";
        let sections = parse_sidebar(markdown).unwrap();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].entries.len(), 2);
        assert_eq!(sections[0].entries[1], EntryDecl::new("Vars", "vars.md"));
    }

    #[test]
    fn test_parse_heading_without_entries_yields_empty_section() {
        let markdown = "\
* **Basics**
  * [Intro](intro.md)
* **Coming Soon**
";
        let sections = parse_sidebar(markdown).unwrap();

        assert_eq!(sections.len(), 2);
        assert!(sections[1].entries.is_empty());
    }

    #[test]
    fn test_parse_deeper_nesting_flattens_into_section() {
        let markdown = "\
* **Collections**
  * Lists
    * [ArrayList](array-list.md)
  * [Maps](maps.md)
";
        let sections = parse_sidebar(markdown).unwrap();

        let titles: Vec<_> = sections[0].entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["ArrayList", "Maps"]);
    }

    #[test]
    fn test_parse_top_level_link_is_rejected() {
        let markdown = "\
# Course

* [Home](README.md)
";
        let err = parse_sidebar(markdown).unwrap_err();

        assert_eq!(err.line, 3);
        assert!(err.message.contains("Home"));
    }

    #[test]
    fn test_parse_skips_external_links() {
        let markdown = "\
* **Resources**
  * [Kotlin docs](https://kotlinlang.org/docs/home.html)
  * [Glossary](glossary.md)
";
        let sections = parse_sidebar(markdown).unwrap();

        assert_eq!(
            sections[0].entries,
            vec![EntryDecl::new("Glossary", "glossary.md")]
        );
    }

    #[test]
    fn test_parse_inline_code_in_title() {
        let markdown = "\
* **Basics**
  * [The `when` expression](when.md)
";
        let sections = parse_sidebar(markdown).unwrap();

        assert_eq!(sections[0].entries[0].title, "The when expression");
    }

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("generics.md"), Some("generics.md".to_owned()));
        assert_eq!(normalize_target("./generics.md#intro"), Some("generics.md".to_owned()));
        assert_eq!(normalize_target("/casting"), Some("casting.md".to_owned()));
        assert_eq!(normalize_target("lessons/sealed?x=1"), Some("lessons/sealed.md".to_owned()));
        assert_eq!(normalize_target("advanced/"), Some("advanced/README.md".to_owned()));
        assert_eq!(normalize_target("/"), Some("README.md".to_owned()));
        assert_eq!(normalize_target("#top"), Some(String::new()));
        assert_eq!(normalize_target("https://kotlinlang.org"), None);
    }

    #[test]
    fn test_load_sidebar_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_sidebar.md");
        std::fs::write(&path, "* [Orphan](orphan.md)\n").unwrap();

        let err = load_sidebar(&path).unwrap_err();

        assert!(matches!(err, SourceError::Sidebar { line: 1, .. }));
        assert!(err.to_string().contains("_sidebar.md"));
    }

    #[test]
    fn test_load_sidebar_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sidebar(&dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
