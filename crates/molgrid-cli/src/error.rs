use molgrid::engine::error::LoaderError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Failures surfaced by the `molgrid` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The loader or one of its workflows failed.
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// The merged configuration file, `--set` values and flags were rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not read config '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
