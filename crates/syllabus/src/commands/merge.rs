//! `syllabus merge` command implementation.

use std::path::PathBuf;

use clap::Args;
use syllabus_index::{Sidebar, reconcile};

use super::project::{Project, ProjectArgs};
use super::render::write_json;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the merge command.
#[derive(Args)]
pub(crate) struct MergeArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl MergeArgs {
    /// Build every sidebar, reconcile them into one and emit its JSON view.
    ///
    /// # Errors
    ///
    /// Returns an error if any sidebar fails to build or output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let project = Project::load(&self.project)?;

        let indexes = project.build_all(&output)?;
        let reconciled = reconcile(&indexes)?;

        for conflict in &reconciled.conflicts {
            output.warning(&format!(
                "⚠ [{}] \"{}\": kept {}, dropped {}",
                conflict.section, conflict.title, conflict.kept, conflict.dropped
            ));
        }

        let json = serde_json::to_string_pretty(&Sidebar::from(&reconciled.index))?;
        write_json(&output, self.output.as_deref(), &json)?;
        output.success(&format!(
            "✓ Merged {} sidebar(s): {} sections, {} entries, {} conflict(s)",
            indexes.len(),
            reconciled.index.sections().len(),
            reconciled.index.entry_count(),
            reconciled.conflicts.len()
        ));
        Ok(())
    }
}
