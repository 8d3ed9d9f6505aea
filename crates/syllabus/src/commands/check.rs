//! `syllabus check` command implementation.

use clap::Args;
use syllabus_index::validate;

use super::project::{Project, ProjectArgs, report_build_error};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    project: ProjectArgs,
}

impl CheckArgs {
    /// Build and validate every configured sidebar independently.
    ///
    /// Advisory findings are printed as warnings; only broken sidebars fail.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or any sidebar fails to build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let project = Project::load(&self.project)?;

        if let Some(path) = &project.config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!(
            "Source directory: {} ({} pages)",
            project.config.docs_resolved.source_dir.display(),
            project.registry.len()
        ));

        check_sidebars(&project, &output).into_result()?;
        output.highlight("All sidebars resolved");
        Ok(())
    }
}

/// Names of sidebars that built and that failed, in check order.
#[derive(Debug, Default)]
struct CheckOutcome {
    passed: Vec<String>,
    failed: Vec<String>,
}

impl CheckOutcome {
    fn into_result(self) -> Result<(), CliError> {
        if self.failed.is_empty() {
            return Ok(());
        }
        Err(CliError::Validation(format!(
            "{} sidebar(s) failed to build: {}",
            self.failed.len(),
            self.failed.join(", ")
        )))
    }
}

/// Check each sidebar, carrying on past broken ones.
fn check_sidebars(project: &Project, output: &Output) -> CheckOutcome {
    let options = project.validation_options();
    let mut outcome = CheckOutcome::default();

    for sidebar in project.sidebars() {
        let name = project.display_name(&sidebar);
        let index = match project.build(&sidebar) {
            Ok(Ok(index)) => index,
            Ok(Err(err)) => {
                report_build_error(output, &name, &err);
                outcome.failed.push(name);
                continue;
            }
            Err(err) => {
                output.error(&format!("✗ {err}"));
                outcome.failed.push(name);
                continue;
            }
        };

        let report = validate(&index, &project.registry, &options);
        output.success(&format!(
            "✓ {name}: {} sections, {} entries",
            index.sections().len(),
            index.entry_count()
        ));
        output.info(&format!("    {}", report.saturation));
        for finding in report.findings() {
            output.warning(&format!("    ⚠ {finding}"));
        }
        outcome.passed.push(name);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;

    use super::*;

    /// Course with a broken default sidebar listed before a good one.
    fn course(dir: &Path) -> PathBuf {
        let docs = dir.join("docs");
        fs::create_dir_all(&docs).unwrap();
        for page in ["start.md", "variables.md"] {
            fs::write(docs.join(page), "# Page\n").unwrap();
        }
        fs::write(docs.join("_sidebar.md"), "* **Basics**\n  * [Loops](loops.md)\n").unwrap();
        fs::write(
            docs.join("good.md"),
            "* **Basics**\n  * [Variables](variables.md)\n",
        )
        .unwrap();
        let config = dir.join("syllabus.toml");
        fs::write(
            &config,
            "[docs]\nsource_dir = \"docs\"\nsidebars = [\"_sidebar.md\", \"good.md\"]\n",
        )
        .unwrap();
        config
    }

    fn load(config: PathBuf) -> Project {
        Project::load(&ProjectArgs {
            config: Some(config),
            source_dir: None,
            sidebars: Vec::new(),
            placeholder: None,
        })
        .unwrap()
    }

    #[test]
    fn test_check_continues_past_broken_sidebar() {
        let dir = tempfile::tempdir().unwrap();
        let project = load(course(dir.path()));

        let outcome = check_sidebars(&project, &Output::new());

        assert_eq!(outcome.failed, vec!["_sidebar.md"]);
        assert_eq!(outcome.passed, vec!["good.md"]);
    }

    #[test]
    fn test_check_fails_when_any_sidebar_fails() {
        let dir = tempfile::tempdir().unwrap();
        let project = load(course(dir.path()));

        let err = check_sidebars(&project, &Output::new())
            .into_result()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            CliError::Validation("1 sidebar(s) failed to build: _sidebar.md".to_owned()).to_string()
        );
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_check_passes_when_all_sidebars_build() {
        let outcome = CheckOutcome {
            passed: vec!["_sidebar.md".to_owned()],
            failed: Vec::new(),
        };

        assert!(outcome.into_result().is_ok());
    }
}
