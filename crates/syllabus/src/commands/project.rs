//! Shared project loading for all commands.

use std::path::{Component, Path, PathBuf};

use clap::Args;
use syllabus_config::{CliSettings, Config};
use syllabus_index::{
    BuildError, CourseIndex, IndexBuilder, PageId, PageRegistry, ValidationOptions,
};
use syllabus_source::{Scanner, load_sidebar};

use crate::error::CliError;
use crate::output::Output;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Path to configuration file (default: auto-discover syllabus.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Docs source directory (overrides config).
    #[arg(short, long)]
    pub(crate) source_dir: Option<PathBuf>,

    /// Sidebar file to use; repeatable (overrides config).
    #[arg(long = "sidebar")]
    pub(crate) sidebars: Vec<PathBuf>,

    /// Placeholder sentinel page id (overrides config).
    #[arg(long)]
    pub(crate) placeholder: Option<String>,
}

/// Loaded configuration plus the page registry built from the docs directory.
pub(crate) struct Project {
    pub config: Config,
    pub registry: PageRegistry,
}

impl Project {
    /// Load config and scan the docs directory.
    pub(crate) fn load(args: &ProjectArgs) -> Result<Self, CliError> {
        let sidebars = if args.sidebars.is_empty() {
            None
        } else {
            let cwd = std::env::current_dir()?;
            Some(args.sidebars.iter().map(|p| cwd.join(p)).collect())
        };
        let cli_settings = CliSettings {
            source_dir: args.source_dir.clone(),
            sidebars,
            placeholder: args.placeholder.clone(),
        };

        let config = Config::load(args.config.as_deref(), Some(&cli_settings))?;

        let placeholder = PageId::new(config.placeholder.page.clone())?;
        let mut registry = PageRegistry::with_placeholder(placeholder);
        let pages = Scanner::new(config.docs_resolved.source_dir.clone())
            .register_into(&mut registry)?;
        tracing::info!(
            pages,
            dir = %config.docs_resolved.source_dir.display(),
            "Registered pages"
        );

        Ok(Self { config, registry })
    }

    /// Configured sidebar files.
    pub(crate) fn sidebars(&self) -> Vec<PathBuf> {
        self.config.docs_resolved.sidebar_paths()
    }

    /// Parse and build one sidebar.
    ///
    /// The outer error covers reading/parsing; the inner result is the build.
    pub(crate) fn build(
        &self,
        sidebar: &Path,
    ) -> Result<Result<CourseIndex, BuildError>, CliError> {
        let decls = load_sidebar(sidebar)?;
        Ok(IndexBuilder::new(&self.registry).build(&decls))
    }

    /// Build every sidebar, failing if any of them is broken.
    pub(crate) fn build_all(&self, output: &Output) -> Result<Vec<CourseIndex>, CliError> {
        let mut indexes = Vec::new();
        let mut failed = 0;
        for sidebar in self.sidebars() {
            match self.build(&sidebar)? {
                Ok(index) => indexes.push(index),
                Err(err) => {
                    report_build_error(output, &self.display_name(&sidebar), &err);
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} sidebar(s) failed to build"
            )));
        }
        Ok(indexes)
    }

    /// Advisory check options from config.
    ///
    /// Sidebar files living inside the docs directory are excluded from the
    /// orphan check.
    pub(crate) fn validation_options(&self) -> ValidationOptions {
        let source_dir = &self.config.docs_resolved.source_dir;
        let mut ignore: Vec<PageId> = self
            .config
            .check
            .ignore
            .iter()
            .filter_map(|id| PageId::new(id.as_str()).ok())
            .collect();
        ignore.extend(
            self.sidebars()
                .iter()
                .filter_map(|path| relative_page_id(source_dir, path)),
        );
        ValidationOptions {
            orphans: self.config.check.orphans,
            ignore,
            max_placeholder_ratio: self.config.check.max_placeholder_ratio,
        }
    }

    /// Short name for a sidebar in messages.
    pub(crate) fn display_name(&self, path: &Path) -> String {
        relative_page_id(&self.config.docs_resolved.source_dir, path)
            .map_or_else(|| path.display().to_string(), |id| id.to_string())
    }
}

/// Print every problem of a failed build.
pub(crate) fn report_build_error(output: &Output, sidebar: &str, err: &BuildError) {
    output.error(&format!("✗ {sidebar}: {err}"));
    for problem in &err.problems {
        output.error(&format!("    {problem}"));
    }
}

/// Page id of `path` relative to `root`, with `/` separators.
fn relative_page_id(root: &Path, path: &Path) -> Option<PageId> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    PageId::new(parts.join("/")).ok()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    /// Lay out a small course with a config file, returning its path.
    fn course(dir: &Path, sidebar: &str) -> PathBuf {
        let docs = dir.join("docs");
        fs::create_dir_all(&docs).unwrap();
        for page in ["README.md", "start.md", "variables.md", "generics.md", "extra.md"] {
            fs::write(docs.join(page), "# Page\n").unwrap();
        }
        fs::write(docs.join("_sidebar.md"), sidebar).unwrap();
        let config = dir.join("syllabus.toml");
        fs::write(&config, "[docs]\nsource_dir = \"docs\"\n").unwrap();
        config
    }

    fn args(config: PathBuf) -> ProjectArgs {
        ProjectArgs {
            config: Some(config),
            source_dir: None,
            sidebars: Vec::new(),
            placeholder: None,
        }
    }

    #[test]
    fn test_load_and_build_project() {
        let dir = tempfile::tempdir().unwrap();
        let config = course(
            dir.path(),
            "* **Basics**\n  * [Variables](variables.md)\n  * [Generics](start.md)\n",
        );

        let project = Project::load(&args(config)).unwrap();
        let sidebar = &project.sidebars()[0];
        let index = project.build(sidebar).unwrap().unwrap();

        assert_eq!(index.entry_count(), 2);
        assert_eq!(project.display_name(sidebar), "_sidebar.md");
    }

    #[test]
    fn test_validation_options_ignore_sidebar_and_readme() {
        let dir = tempfile::tempdir().unwrap();
        let config = course(dir.path(), "* **Basics**\n  * [Variables](variables.md)\n");

        let project = Project::load(&args(config)).unwrap();
        let options = project.validation_options();

        let ignored: Vec<_> = options.ignore.iter().map(PageId::as_str).collect();
        assert_eq!(ignored, vec!["README.md", "_sidebar.md"]);

        let index = project.build(&project.sidebars()[0]).unwrap().unwrap();
        let report = syllabus_index::validate(&index, &project.registry, &options);
        let orphans: Vec<_> = report.orphans.iter().map(PageId::as_str).collect();
        assert_eq!(orphans, vec!["extra.md", "generics.md"]);
    }

    #[test]
    fn test_build_all_fails_on_unknown_target() {
        let dir = tempfile::tempdir().unwrap();
        let config = course(dir.path(), "* **Basics**\n  * [Loops](loops.md)\n");

        let project = Project::load(&args(config)).unwrap();
        let err = project.build_all(&Output::new()).unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_relative_page_id_inside_root() {
        let id = relative_page_id(
            Path::new("/course/docs"),
            Path::new("/course/docs/de/_sidebar.md"),
        );
        assert_eq!(id, Some(PageId::new("de/_sidebar.md").unwrap()));
    }

    #[test]
    fn test_relative_page_id_outside_root() {
        assert_eq!(
            relative_page_id(Path::new("/course/docs"), Path::new("/tmp/_sidebar.md")),
            None
        );
    }

    #[test]
    fn test_relative_page_id_rejects_parent_components() {
        assert_eq!(
            relative_page_id(Path::new("/course/docs"), Path::new("/course/docs/../x.md")),
            None
        );
    }
}
