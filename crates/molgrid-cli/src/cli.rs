use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "MolGrid CLI - voxelize receptor-ligand complexes into multi-channel density grids for structure-based affinity models.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to voxelize examples in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw batches from the loader and print a summary of each one.
    Batches(BatchesArgs),
    /// Voxelize one example and write OpenDX maps plus a PyMOL script.
    Export(ExportArgs),
    /// Precompute a molcache of receptor or ligand grids.
    Cache(CacheArgs),
}

/// Which loader section of the configuration file to use.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Train,
    Test,
}

impl Phase {
    pub fn section(self) -> &'static str {
        match self {
            Phase::Train => "train",
            Phase::Test => "test",
        }
    }
}

/// Options shared by every command that builds a loader.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the loader configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Loader section of the configuration file to use.
    #[arg(long, value_enum, default_value_t = Phase::Train)]
    pub phase: Phase,

    /// Seed the loader's random generator, overriding the config file.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S train.batch-size=32
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `batches` subcommand.
#[derive(Args, Debug)]
pub struct BatchesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of batches to draw.
    #[arg(short = 'n', long, default_value_t = 1, value_name = "INT")]
    pub batches: usize,

    /// Override the channel index where ligand channels start.
    #[arg(long, value_name = "INT")]
    pub slice_point: Option<usize>,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Zero-based index of the example in the index file.
    #[arg(short, long, required = true, value_name = "INT")]
    pub line: usize,

    /// Output prefix; maps are written as <PREFIX>_<channel>.dx.
    #[arg(short, long, required = true, value_name = "PREFIX")]
    pub output: PathBuf,
}

/// Which structures a molcache holds.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Rec,
    Lig,
}

/// Arguments for the `cache` subcommand.
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Cache receptor or ligand grids.
    #[arg(short, long, value_enum, required = true)]
    pub kind: CacheKind,

    /// Path of the molcache file to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_arguments_parse() {
        let cli = Cli::parse_from([
            "molgrid", "-vv", "batches", "-c", "grid.toml", "--phase", "test", "-n", "4",
            "-S", "test.shuffle=true", "--seed", "3",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Batches(args) = cli.command else {
            panic!("expected batches command");
        };
        assert_eq!(args.batches, 4);
        assert_eq!(args.config.phase, Phase::Test);
        assert_eq!(args.config.seed, Some(3));
        assert_eq!(args.config.set_values, vec!["test.shuffle=true".to_string()]);
        assert_eq!(args.slice_point, None);
    }

    #[test]
    fn phase_defaults_to_train() {
        let cli = Cli::parse_from(["molgrid", "cache", "-c", "g.toml", "-k", "lig", "-o", "l.mc"]);
        let Commands::Cache(args) = cli.command else {
            panic!("expected cache command");
        };
        assert_eq!(args.config.phase, Phase::Train);
        assert_eq!(args.kind, CacheKind::Lig);
    }

    #[test]
    fn export_requires_a_line() {
        let result = Cli::try_parse_from(["molgrid", "export", "-c", "g.toml", "-o", "out"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["molgrid", "-q", "-v", "batches", "-c", "g.toml"]);
        assert!(result.is_err());
    }
}
