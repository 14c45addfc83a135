//! Command implementations and argument parsing for the enoki CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{info, instrument};

use enoki_core::{
    ClusteringResult, DistanceKernel, Enoki, EnokiBuilder, EnokiError, NeighbourStore,
};
use enoki_providers_points::{PointsFileError, read_points_path};

const DEFAULT_MIN_PTS: usize = 4;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "enoki", about = "Run G-DBSCAN clustering over 2D point sets.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Execute the clustering pipeline over a points file.
    Run(RunCommand),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Run(_) => "run",
        }
    }
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to a whitespace-separated points file: a count `N`, then `N`
    /// records of `index x y`.
    pub path: PathBuf,

    /// Neighbourhood search radius.
    #[arg(long, allow_hyphen_values = true)]
    pub radius: f32,

    /// Neighbour count (excluding the point itself) required for a Core
    /// point.
    #[arg(long = "min-pts", default_value_t = DEFAULT_MIN_PTS)]
    pub min_pts: usize,

    /// Worker thread count; defaults to the host's available parallelism.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Temporary adjacency shape used during neighbour discovery.
    #[arg(long, value_enum, default_value_t = StoreChoice::Auto)]
    pub store: StoreChoice,

    /// Range-test kernel implementation.
    #[arg(long, value_enum, default_value_t = KernelChoice::Auto)]
    pub kernel: KernelChoice,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Adjacency shapes selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreChoice {
    /// Let the engine pick a shape.
    Auto,
    /// Dense bitset rows.
    Bitset,
    /// Sparse neighbour lists.
    Sparse,
}

impl From<StoreChoice> for NeighbourStore {
    fn from(choice: StoreChoice) -> Self {
        match choice {
            StoreChoice::Auto => NeighbourStore::Auto,
            StoreChoice::Bitset => NeighbourStore::Bitset,
            StoreChoice::Sparse => NeighbourStore::Sparse,
        }
    }
}

/// Kernel implementations selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KernelChoice {
    /// Probe the host and pick a kernel.
    Auto,
    /// Portable scalar implementation.
    Scalar,
    /// 8-lane vector implementation; fails on unsupported hosts.
    Wide,
}

impl From<KernelChoice> for DistanceKernel {
    fn from(choice: KernelChoice) -> Self {
        match choice {
            KernelChoice::Auto => DistanceKernel::Auto,
            KernelChoice::Scalar => DistanceKernel::Scalar,
            KernelChoice::Wide => DistanceKernel::Wide,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or parsing the points file failed.
    #[error(transparent)]
    Points(#[from] PointsFileError),
    /// Core configuration or execution failed.
    #[error(transparent)]
    Core(#[from] EnokiError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name derived from the input path or supplied by the user.
    pub data_source: String,
    /// Number of points read from the input.
    pub points: usize,
    /// Cluster assignments produced by the pipeline.
    pub result: ClusteringResult,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when ingestion, configuration, or execution fails.
#[instrument(name = "cli.run", err, skip(cli), fields(command = %cli.command.name()))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => run_command(run),
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        path = %path_label(&command.path),
        radius = command.radius,
        min_pts = command.min_pts,
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let enoki = build_engine(&command)?;
    let data_source = derive_data_source_name(&command.path, command.name.as_deref());

    let points = read_points_path(&command.path)?;
    let result = enoki.run(&points)?;

    info!(
        data_source = data_source.as_str(),
        points = points.len(),
        clusters = result.cluster_count(),
        "command completed"
    );
    Ok(ExecutionSummary {
        data_source,
        points: points.len(),
        result,
    })
}

fn build_engine(command: &RunCommand) -> Result<Enoki, CliError> {
    let mut builder = EnokiBuilder::new()
        .with_min_pts(command.min_pts)
        .with_radius(command.radius)
        .with_neighbour_store(command.store.into())
        .with_distance_kernel(command.kernel.into());
    if let Some(threads) = command.threads {
        builder = builder.with_threads(threads);
    }
    Ok(builder.build()?)
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "points".to_owned())
}

/// Produce a label for a path that avoids leaking absolute directories.
fn path_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<unknown>".to_owned())
}

/// Renders `summary` to `writer` as a short header followed by one
/// `index<TAB>cluster<TAB>membership` line per point. Noise points carry
/// cluster `-1`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "points: {}", summary.points)?;
    writeln!(writer, "clusters: {}", summary.result.cluster_count())?;
    let ids = summary.result.cluster_ids();
    let memberships = summary.result.memberships();
    for (index, (id, membership)) in ids.iter().zip(memberships).enumerate() {
        writeln!(writer, "{index}\t{id}\t{membership}")?;
    }
    Ok(())
}
