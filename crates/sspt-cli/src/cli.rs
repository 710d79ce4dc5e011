use clap::{Args, Parser, Subcommand};
use sspt::engine::config::{PermutationScheme, SolverBackend};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "SSPT developers",
    version,
    about = "SSPT CLI - Single-sample pathway perturbation scoring from gene fold-changes and pathway interaction matrices.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to score pathways in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every pathway in a directory against every sample of a fold-change matrix.
    Score(ScoreArgs),
    /// Write a permuted copy of an expression matrix, e.g. to build a null distribution.
    Permute(PermuteArgs),
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Tab-separated genes × samples fold-change matrix.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub fold_changes: PathBuf,

    /// Directory holding one tab-separated interaction matrix per pathway.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub pathways: PathBuf,

    /// Path for the output pathway × sample score table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the linear solver backend.
    #[arg(long, value_name = "BACKEND")]
    pub solver: Option<SolverBackend>,

    /// Override the relative pivot tolerance used to detect singular systems.
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Fail on the first singular pathway instead of writing NA scores for it.
    #[arg(long)]
    pub strict: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S solver.backend=lu
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `permute` subcommand.
#[derive(Args, Debug)]
pub struct PermuteArgs {
    /// Tab-separated genes × samples expression or fold-change matrix.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the permuted matrix.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the permutation scheme.
    #[arg(long, value_name = "SCHEME")]
    pub scheme: Option<PermutationScheme>,

    /// Seed for a reproducible permutation.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}
