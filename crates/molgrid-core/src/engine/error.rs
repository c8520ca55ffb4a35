use super::config::ConfigError;
use crate::core::io::gninatypes::GninatypesError;
use crate::core::io::index::IndexError;
use crate::core::io::molcache::MolCacheError;
use crate::core::models::tensor::ShapeError;
use crate::core::typing::typemap::TypeMapError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The part a file plays in a loader run, used to say which input is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Source,
    ReceptorMap,
    LigandMap,
    Receptor,
    Ligand,
    ReceptorMolCache,
    LigandMolCache,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileRole::Source => "index file",
            FileRole::ReceptorMap => "receptor type map",
            FileRole::LigandMap => "ligand type map",
            FileRole::Receptor => "receptor structure",
            FileRole::Ligand => "ligand structure",
            FileRole::ReceptorMolCache => "receptor molcache",
            FileRole::LigandMolCache => "ligand molcache",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing {role}: {path}")]
    MissingFile { role: FileRole, path: PathBuf },

    #[error("Molcache {path} stores grids of shape {found:?}, loader produces {expected:?}")]
    CacheMismatch {
        path: PathBuf,
        expected: [usize; 4],
        found: [usize; 4],
    },

    #[error("Molcache {path} was computed at {found} A resolution, loader uses {expected} A")]
    CacheResolutionMismatch {
        path: PathBuf,
        expected: f64,
        found: f64,
    },

    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Example index {index} is out of range ({count} examples)")]
    ExampleOutOfRange { index: usize, count: usize },
}

/// Format-level errors that either wrap an I/O failure or describe malformed content.
pub(crate) trait FileFormatError: std::error::Error + Sized {
    fn into_io(self) -> Result<io::Error, Self>;
}

macro_rules! impl_file_format_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl FileFormatError for $error {
                fn into_io(self) -> Result<io::Error, Self> {
                    match self {
                        Self::Io(source) => Ok(source),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_file_format_error!(GninatypesError, IndexError, MolCacheError, TypeMapError);

impl LoaderError {
    /// Attaches `path` to a format error. I/O failures stay I/O errors, a file that does not
    /// exist becomes [`LoaderError::MissingFile`], everything else is a parse error.
    pub(crate) fn from_file<E: FileFormatError>(role: FileRole, path: &Path, error: E) -> Self {
        match error.into_io() {
            Ok(source) if source.kind() == io::ErrorKind::NotFound => LoaderError::MissingFile {
                role,
                path: path.to_path_buf(),
            },
            Ok(source) => LoaderError::Io {
                path: path.to_path_buf(),
                source,
            },
            Err(other) => LoaderError::Parse {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        LoaderError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
