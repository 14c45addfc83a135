//! Command-line interface orchestration for the enoki clustering engine.
//!
//! Offers a `run` command that reads a whitespace-separated points file,
//! executes the G-DBSCAN pipeline, and renders per-point cluster assignments
//! to stdout.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, KernelChoice, RunCommand, StoreChoice,
    render_summary, run_cli,
};
