use crate::core::io::molcache::MolCache;
use crate::engine::config::MolGridConfig;
use crate::engine::error::{FileRole, LoaderError};
use crate::engine::loader::{MolGridLoader, Part};
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSummary {
    pub entries: usize,
    pub grid_shape: [usize; 4],
}

/// Precomputes unaugmented grids for every distinct receptor (or ligand) of the index and
/// writes them to a molcache at `output`.
///
/// Grids are centered on the ligand of the first example that references each structure, and
/// each entry records that center. Loaders only reuse a receptor grid for examples whose ligand
/// has the same center.
#[instrument(skip_all, name = "cache_workflow", fields(part = ?part))]
pub fn run(
    config: MolGridConfig,
    part: Part,
    output: &Path,
    reporter: &ProgressReporter,
) -> Result<CacheSummary, LoaderError> {
    let mut loader = MolGridLoader::new(config, reporter)?;

    let mut seen = HashSet::new();
    let work: Vec<(usize, String)> = loader
        .examples()
        .iter()
        .enumerate()
        .filter_map(|(index, example)| {
            let key = match part {
                Part::Receptor => &example.receptor,
                Part::Ligand => &example.ligand,
            };
            seen.insert(key.clone()).then(|| (index, key.clone()))
        })
        .collect();

    let channels = match part {
        Part::Receptor => loader.receptor_channels(),
        Part::Ligand => loader.num_channels() - loader.receptor_channels(),
    };
    let spec = loader.grid_spec();
    let role = match part {
        Part::Receptor => FileRole::ReceptorMolCache,
        Part::Ligand => FileRole::LigandMolCache,
    };
    let mut cache = MolCache::new(channels, spec.points, spec.resolution as f32);

    reporter.report(Progress::PhaseStart {
        name: "Computing Grids",
    });
    reporter.task(work.len(), |i| {
        let (index, key) = &work[i];
        let center = loader.ligand_center(*index)?;
        let grid = loader.voxelize_part(*index, part)?;
        cache
            .insert(key.clone(), center, grid)
            .map_err(|e| LoaderError::from_file(role, output, e))
    })?;
    reporter.report(Progress::PhaseFinish);

    cache
        .write_to_path(output)
        .map_err(|e| LoaderError::from_file(role, output, e))?;

    info!(
        entries = cache.len(),
        output = %output.display(),
        "Molcache written."
    );
    Ok(CacheSummary {
        entries: cache.len(),
        grid_shape: cache.grid_shape(),
    })
}
