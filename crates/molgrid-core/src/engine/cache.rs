use super::error::{FileRole, LoaderError};
use crate::core::io::gninatypes::GninatypesFile;
use crate::core::io::molcache::MolCache;
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parsed structures keyed by resolved path.
///
/// When disabled every lookup reads the file again; results are identical either way.
#[derive(Debug, Default)]
pub struct StructureCache {
    enabled: bool,
    structures: HashMap<PathBuf, Arc<Structure>>,
}

impl StructureCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            structures: HashMap::new(),
        }
    }

    pub fn load(&mut self, role: FileRole, path: &Path) -> Result<Arc<Structure>, LoaderError> {
        if let Some(structure) = self.structures.get(path) {
            return Ok(Arc::clone(structure));
        }

        let structure = GninatypesFile::read_from_path(path)
            .map(Arc::new)
            .map_err(|e| LoaderError::from_file(role, path, e))?;
        debug!(path = %path.display(), atoms = structure.len(), "Read structure.");

        if self.enabled {
            self.structures
                .insert(path.to_path_buf(), Arc::clone(&structure));
        }
        Ok(structure)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

/// Resolutions closer than this are treated as equal; headers store them as `f32`.
const RESOLUTION_TOLERANCE: f64 = 1e-6;

/// Opens a molcache and checks that its grids have the loader's `expected` shape and
/// `resolution`.
///
/// A mismatch is fatal unless `fallback` is set, in which case it is logged and the cache is
/// dropped (`Ok(None)`).
pub fn open_molcache(
    role: FileRole,
    path: &Path,
    expected: [usize; 4],
    resolution: f64,
    fallback: bool,
) -> Result<Option<MolCache>, LoaderError> {
    let cache = MolCache::read_from_path(path).map_err(|e| LoaderError::from_file(role, path, e))?;

    let found = cache.grid_shape();
    let found_resolution = f64::from(cache.resolution());
    let mismatch = if found != expected {
        Some(LoaderError::CacheMismatch {
            path: path.to_path_buf(),
            expected,
            found,
        })
    } else if (found_resolution - resolution).abs() > RESOLUTION_TOLERANCE {
        Some(LoaderError::CacheResolutionMismatch {
            path: path.to_path_buf(),
            expected: resolution,
            found: found_resolution,
        })
    } else {
        None
    };

    if let Some(error) = mismatch {
        if fallback {
            warn!(
                path = %path.display(),
                reason = %error,
                "Molcache does not match the loader grid; ignoring it and computing grids from structures."
            );
            return Ok(None);
        }
        return Err(error);
    }

    info!(
        path = %path.display(),
        entries = cache.len(),
        "Opened {}.",
        role
    );
    Ok(Some(cache))
}
