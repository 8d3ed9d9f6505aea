//! syllabus CLI - course index builder and validator.
//!
//! Provides commands for:
//! - `check`: Build and validate every configured sidebar
//! - `render`: Emit the JSON sidebar view of one sidebar
//! - `merge`: Reconcile all sidebars into one and emit its JSON view

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, MergeArgs, RenderArgs};
use output::Output;

/// syllabus - course index builder and validator.
#[derive(Parser)]
#[command(name = "syllabus", version, about)]
struct Cli {
    /// Enable verbose output (build and validation logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and validate sidebars; fails on broken links.
    Check(CheckArgs),
    /// Build one sidebar and print its JSON view.
    Render(RenderArgs),
    /// Reconcile all sidebars into one and print its JSON view.
    Merge(MergeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Merge(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_repeated_sidebars() {
        let cli = Cli::try_parse_from([
            "syllabus",
            "check",
            "--sidebar",
            "_sidebar.md",
            "--sidebar",
            "de/_sidebar.md",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_parse_render_output() {
        let cli = Cli::try_parse_from(["syllabus", "render", "-o", "sidebar.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Render(_)));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["syllabus", "serve"]).is_err());
    }
}
