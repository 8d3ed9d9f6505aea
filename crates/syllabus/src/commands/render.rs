//! `syllabus render` command implementation.

use std::path::PathBuf;

use clap::Args;
use syllabus_index::Sidebar;

use super::project::{Project, ProjectArgs, report_build_error};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Build the first configured sidebar and emit its JSON view.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or building fails, or output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let project = Project::load(&self.project)?;

        let sidebar = project
            .sidebars()
            .into_iter()
            .next()
            .ok_or_else(|| CliError::Validation("No sidebar configured".to_owned()))?;
        let name = project.display_name(&sidebar);

        let index = project.build(&sidebar)?.map_err(|err| {
            report_build_error(&output, &name, &err);
            CliError::Validation(format!("{name} failed to build"))
        })?;

        let json = serde_json::to_string_pretty(&Sidebar::from(&index))?;
        write_json(&output, self.output.as_deref(), &json)?;
        output.success(&format!(
            "✓ Rendered {name}: {} sections, {} entries",
            index.sections().len(),
            index.entry_count()
        ));
        Ok(())
    }
}

/// Write JSON to a file or stdout.
pub(crate) fn write_json(
    output: &Output,
    path: Option<&std::path::Path>,
    json: &str,
) -> Result<(), CliError> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            output.info(&format!("Wrote {}", path.display()));
        }
        None => output.data(json)?,
    }
    Ok(())
}
