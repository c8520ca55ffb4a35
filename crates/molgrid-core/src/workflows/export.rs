use crate::core::io::dx::write_dx_to_path;
use crate::core::io::pymol::write_pymol_script_to_path;
use crate::engine::config::MolGridConfig;
use crate::engine::error::LoaderError;
use crate::engine::loader::MolGridLoader;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    pub dx_files: Vec<PathBuf>,
    pub pymol_file: PathBuf,
    pub center: Point3<f64>,
}

/// Voxelizes example `line` of the index without augmentation and writes one
/// `<prefix>_<channel>.dx` map per channel plus a `<prefix>.pymol` script that loads them
/// next to the receptor and ligand files.
#[instrument(skip_all, name = "export_workflow", fields(line = line))]
pub fn run(
    config: MolGridConfig,
    line: usize,
    out_prefix: &Path,
    reporter: &ProgressReporter,
) -> Result<ExportResult, LoaderError> {
    let mut loader = MolGridLoader::new(config, reporter)?;

    reporter.report(Progress::PhaseStart {
        name: "Voxelizing Example",
    });
    let grid = loader.voxelize_example(line, false)?;
    let center = loader.ligand_center(line)?;
    reporter.report(Progress::PhaseFinish);

    let spec = loader.grid_spec();
    let origin = spec.origin(&center);
    let prefix = out_prefix.display().to_string();
    let channel_names = loader.channel_names();

    reporter.report(Progress::PhaseStart {
        name: "Writing Maps",
    });
    let dx_files = reporter.task(grid.channels(), |channel| {
        let path = PathBuf::from(format!("{}_{}.dx", prefix, channel_names[channel]));
        write_dx_to_path(
            &path,
            grid.channel(channel),
            spec.points,
            &origin,
            spec.resolution,
        )
        .map_err(|e| LoaderError::io(&path, e))?;
        Ok::<PathBuf, LoaderError>(path)
    })?;

    let example = &loader.examples()[line];
    let root = &loader.config().source.root_folder;
    let pymol_file = PathBuf::from(format!("{}.pymol", prefix));
    let map_names: Vec<String> = dx_files.iter().map(|p| p.display().to_string()).collect();
    write_pymol_script_to_path(
        &pymol_file,
        &format!("{}_grids", prefix),
        &map_names,
        &example.receptor_path(root).display().to_string(),
        &example.ligand_path(root).display().to_string(),
    )
    .map_err(|e| LoaderError::io(&pymol_file, e))?;
    reporter.report(Progress::PhaseFinish);

    info!(
        maps = dx_files.len(),
        pymol = %pymol_file.display(),
        "Exported example grids."
    );
    Ok(ExportResult {
        dx_files,
        pymol_file,
        center,
    })
}
