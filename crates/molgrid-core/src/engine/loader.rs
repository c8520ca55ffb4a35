use super::cache::{StructureCache, open_molcache};
use super::config::{ConfigError, MolGridConfig};
use super::error::{FileRole, LoaderError};
use super::progress::{Progress, ProgressReporter};
use super::sampling::ExampleSampler;
use crate::core::grid::density::Voxelizer;
use crate::core::grid::spec::GridSpec;
use crate::core::io::index::read_index_from_path;
use crate::core::io::molcache::{CachedGrid, MolCache};
use crate::core::models::example::Example;
use crate::core::models::grid::VoxelGrid;
use crate::core::models::structure::Structure;
use crate::core::models::tensor::Tensor;
use crate::core::typing::typemap::TypeMap;
use crate::core::utils::geometry::{RigidTransform, ligand_center};
use nalgebra::Point3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One batch of voxelized examples.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// `[batch_size, channels, n, n, n]`, receptor channels first.
    pub grids: Tensor,
    pub labels: Vec<f32>,
    /// Present when the index carries affinities.
    pub affinities: Option<Vec<f32>>,
    /// Positions in the index of the examples in this batch.
    pub example_indices: Vec<usize>,
}

/// Which half of an example a grid belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Receptor,
    Ligand,
}

#[derive(Debug)]
enum GridSource {
    /// Key into the matching molcache; the entry is centered where this example is.
    Cached(String),
    Computed(Arc<Structure>),
}

#[derive(Debug)]
struct VoxelJob {
    receptor: GridSource,
    ligand: GridSource,
    transform: RigidTransform,
}

/// Streams batches of receptor/ligand density grids from an index file.
pub struct MolGridLoader {
    config: MolGridConfig,
    examples: Vec<Example>,
    rec_map: TypeMap,
    lig_map: TypeMap,
    voxelizer: Voxelizer,
    rec_molcache: Option<MolCache>,
    lig_molcache: Option<MolCache>,
    structures: StructureCache,
    sampler: ExampleSampler,
    rng: StdRng,
    batches: u64,
}

impl MolGridLoader {
    #[instrument(skip_all, name = "molgrid_loader_init")]
    pub fn new(config: MolGridConfig, reporter: &ProgressReporter) -> Result<Self, LoaderError> {
        info!(
            source = %config.source.source.display(),
            "Initializing molecular grid loader."
        );
        reporter.report(Progress::PhaseStart {
            name: "Loader Setup",
        });

        let rec_map = load_type_map(FileRole::ReceptorMap, &config.grid.recmap)?;
        let lig_map = load_type_map(FileRole::LigandMap, &config.grid.ligmap)?;

        let source = &config.source.source;
        let examples = read_index_from_path(source, config.source.has_affinity)
            .map_err(|e| LoaderError::from_file(FileRole::Source, source, e))?;
        if examples.is_empty() {
            return Err(ConfigError::EmptySource(source.clone()).into());
        }

        let spec = config.grid.spec();
        let voxelizer = Voxelizer {
            spec,
            radius_multiple: config.grid.radius_multiple,
            use_covalent_radius: config.grid.use_covalent_radius,
            kernel: config.grid.kernel(),
        };
        let n = spec.points;

        let rec_molcache = match &config.cache.recmolcache {
            Some(path) => open_molcache(
                FileRole::ReceptorMolCache,
                path,
                [rec_map.num_channels(), n, n, n],
                spec.resolution,
                config.cache.cache_fallback,
            )?,
            None => None,
        };
        let lig_molcache = match &config.cache.ligmolcache {
            Some(path) => open_molcache(
                FileRole::LigandMolCache,
                path,
                [lig_map.num_channels(), n, n, n],
                spec.resolution,
                config.cache.cache_fallback,
            )?,
            None => None,
        };

        reporter.report(Progress::Message(format!(
            "Checking structure files for {} examples",
            examples.len()
        )));
        let augment = config.augmentation.is_enabled();
        let mut structures = StructureCache::new(config.cache.cache_structs);
        let mut off_center = 0usize;
        reporter.task(examples.len(), |i| {
            let example = &examples[i];
            let root = &config.source.root_folder;
            let lig_entry = cached_entry(augment, lig_molcache.as_ref(), &example.ligand);
            let rec_entry = cached_entry(augment, rec_molcache.as_ref(), &example.receptor);

            if lig_entry.is_none() {
                require_file(FileRole::Ligand, &example.ligand_path(root))?;
            }
            let rec_cached = match (rec_entry, lig_entry) {
                (None, _) => false,
                (Some(rec), Some(lig)) => rec.is_centered_on(&lig.center),
                (Some(rec), None) => {
                    let ligand = structures.load(FileRole::Ligand, &example.ligand_path(root))?;
                    rec.is_centered_on(&ligand_center(&ligand))
                }
            };
            if rec_entry.is_some() && !rec_cached {
                off_center += 1;
            }
            if !rec_cached {
                require_file(FileRole::Receptor, &example.receptor_path(root))?;
            }
            Ok::<(), LoaderError>(())
        })?;
        if off_center > 0 {
            info!(
                examples = off_center,
                "Receptor molcache entries centered on another ligand; these examples are voxelized from structures."
            );
        }

        let mut rng = match config.sampling.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sampler = ExampleSampler::new(&examples, &config.sampling, &mut rng)?;

        info!(
            examples = examples.len(),
            channels = rec_map.num_channels() + lig_map.num_channels(),
            points = n,
            rec_molcache = rec_molcache.is_some(),
            lig_molcache = lig_molcache.is_some(),
            "Loader ready."
        );
        reporter.report(Progress::PhaseFinish);

        Ok(Self {
            structures,
            config,
            examples,
            rec_map,
            lig_map,
            voxelizer,
            rec_molcache,
            lig_molcache,
            sampler,
            rng,
            batches: 0,
        })
    }

    /// Draws and voxelizes the next batch. Never runs out: the example order wraps at the end
    /// of every epoch.
    #[instrument(skip_all, name = "next_batch", fields(batch = self.batches))]
    pub fn next_batch(&mut self) -> Result<Batch, LoaderError> {
        let epoch_before = self.sampler.epoch();
        let indices = self.sampler.next_batch(&mut self.rng);
        let augment = self.config.augmentation.is_enabled();
        if augment && (self.rec_molcache.is_some() || self.lig_molcache.is_some()) {
            debug!("Augmentation is active; molcache grids are recomputed from structures.");
        }

        let mut jobs = Vec::with_capacity(indices.len());
        for &index in &indices {
            jobs.push(self.plan(index, augment)?);
        }
        let grids = self.render_all(&jobs);

        let labels = indices.iter().map(|&i| self.examples[i].label).collect();
        let affinities = self.config.source.has_affinity.then(|| {
            indices
                .iter()
                .map(|&i| self.examples[i].affinity.unwrap_or(0.0))
                .collect()
        });
        let grids = Tensor::stack_grids(grids)?;

        self.batches += 1;
        let epoch = self.sampler.epoch();
        if epoch != epoch_before {
            info!(epoch, batches = self.batches, "Epoch boundary reached.");
        }
        debug!(
            examples = indices.len(),
            epoch,
            shape = ?grids.shape(),
            "Batch assembled."
        );

        Ok(Batch {
            grids,
            labels,
            affinities,
            example_indices: indices,
        })
    }

    /// Voxelizes a single example, bypassing the sampler. Without `augment` the result is
    /// deterministic; with it, a fresh transform is drawn from the loader's generator.
    pub fn voxelize_example(&mut self, index: usize, augment: bool) -> Result<VoxelGrid, LoaderError> {
        self.check_index(index)?;
        let augment = augment && self.config.augmentation.is_enabled();
        let job = self.plan(index, augment)?;
        Ok(self.render(&job))
    }

    /// Computes the grid of one half of an example from its structure file, ignoring any
    /// molcache. The grid is centered on the example's ligand and has only that half's channels.
    pub fn voxelize_part(&mut self, index: usize, part: Part) -> Result<VoxelGrid, LoaderError> {
        self.check_index(index)?;
        let center = self.ligand_center(index)?;
        let transform = RigidTransform::identity(center);
        let example = &self.examples[index];
        let root = &self.config.source.root_folder;

        let (role, path, map) = match part {
            Part::Receptor => (FileRole::Receptor, example.receptor_path(root), &self.rec_map),
            Part::Ligand => (FileRole::Ligand, example.ligand_path(root), &self.lig_map),
        };
        let structure = self.structures.load(role, &path)?;
        let mut grid = VoxelGrid::zeros(map.num_channels(), self.voxelizer.spec.points);
        self.voxelizer
            .voxelize(&structure, map, &transform, &mut grid, 0);
        Ok(grid)
    }

    /// Grid center of an example: the centroid of its ligand's heavy atoms. Taken from the
    /// ligand molcache when it holds the ligand.
    pub fn ligand_center(&mut self, index: usize) -> Result<Point3<f64>, LoaderError> {
        self.check_index(index)?;
        let example = &self.examples[index];
        if let Some(entry) = cached_entry(false, self.lig_molcache.as_ref(), &example.ligand) {
            return Ok(entry.center);
        }
        let path = example.ligand_path(&self.config.source.root_folder);
        let ligand = self.structures.load(FileRole::Ligand, &path)?;
        Ok(ligand_center(&ligand))
    }

    /// Shape of one example grid, `[channels, n, n, n]`.
    pub fn grid_shape(&self) -> [usize; 4] {
        let n = self.voxelizer.spec.points;
        [self.num_channels(), n, n, n]
    }

    pub fn grid_spec(&self) -> GridSpec {
        self.voxelizer.spec
    }

    pub fn num_channels(&self) -> usize {
        self.rec_map.num_channels() + self.lig_map.num_channels()
    }

    pub fn receptor_channels(&self) -> usize {
        self.rec_map.num_channels()
    }

    /// Channel names in grid order, `rec_<types>` followed by `lig_<types>`.
    pub fn channel_names(&self) -> Vec<String> {
        self.rec_map
            .channel_names()
            .iter()
            .map(|name| format!("rec_{}", name))
            .chain(
                self.lig_map
                    .channel_names()
                    .iter()
                    .map(|name| format!("lig_{}", name)),
            )
            .collect()
    }

    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn config(&self) -> &MolGridConfig {
        &self.config
    }

    /// Completed passes over the index.
    pub fn epoch(&self) -> u64 {
        self.sampler.epoch()
    }

    pub fn batches_drawn(&self) -> u64 {
        self.batches
    }

    fn check_index(&self, index: usize) -> Result<(), LoaderError> {
        if index < self.examples.len() {
            Ok(())
        } else {
            Err(LoaderError::ExampleOutOfRange {
                index,
                count: self.examples.len(),
            })
        }
    }

    /// Resolves where each half of an example comes from and draws its transform. Runs
    /// sequentially so the random stream does not depend on scheduling.
    ///
    /// A cached receptor grid is only used when it was computed around this example's ligand
    /// center; receptors shared by several ligands fall back to their structure file.
    fn plan(&mut self, index: usize, augment: bool) -> Result<VoxelJob, LoaderError> {
        let example = &self.examples[index];
        let root = &self.config.source.root_folder;
        let lig_entry = cached_entry(augment, self.lig_molcache.as_ref(), &example.ligand);
        let rec_entry = cached_entry(augment, self.rec_molcache.as_ref(), &example.receptor);

        let (ligand, center) = match lig_entry {
            Some(entry) => (GridSource::Cached(example.ligand.clone()), entry.center),
            None => {
                let structure = self
                    .structures
                    .load(FileRole::Ligand, &example.ligand_path(root))?;
                let center = ligand_center(&structure);
                (GridSource::Computed(structure), center)
            }
        };
        let rec_cached = rec_entry.is_some_and(|entry| entry.is_centered_on(&center));

        let transform = if augment {
            RigidTransform::random(
                center,
                self.config.augmentation.random_rotation,
                self.config.augmentation.random_translate,
                &mut self.rng,
            )
        } else {
            RigidTransform::identity(center)
        };

        let receptor = if rec_cached {
            GridSource::Cached(example.receptor.clone())
        } else {
            GridSource::Computed(
                self.structures
                    .load(FileRole::Receptor, &example.receptor_path(root))?,
            )
        };

        trace!(
            index,
            rec_cached,
            lig_cached = lig_entry.is_some(),
            "Planned example."
        );
        Ok(VoxelJob {
            receptor,
            ligand,
            transform,
        })
    }

    fn render_all(&self, jobs: &[VoxelJob]) -> Vec<VoxelGrid> {
        #[cfg(not(feature = "parallel"))]
        let iterator = jobs.iter();

        #[cfg(feature = "parallel")]
        let iterator = jobs.par_iter();

        iterator.map(|job| self.render(job)).collect()
    }

    fn render(&self, job: &VoxelJob) -> VoxelGrid {
        let offset = self.rec_map.num_channels();
        let mut grid = VoxelGrid::zeros(self.num_channels(), self.voxelizer.spec.points);

        let halves = [
            (&job.receptor, &self.rec_map, self.rec_molcache.as_ref(), 0),
            (&job.ligand, &self.lig_map, self.lig_molcache.as_ref(), offset),
        ];
        for (source, map, molcache, channel_offset) in halves {
            match source {
                GridSource::Computed(structure) => {
                    self.voxelizer
                        .voxelize(structure, map, &job.transform, &mut grid, channel_offset);
                }
                GridSource::Cached(key) => {
                    if let Some(cached) = molcache.and_then(|cache| cache.get(key)) {
                        grid.copy_channels_from(&cached.grid, channel_offset);
                    }
                }
            }
        }
        grid
    }
}

/// The molcache entry for `key`, if caching applies: augmented examples never use it.
fn cached_entry<'a>(
    augment: bool,
    molcache: Option<&'a MolCache>,
    key: &str,
) -> Option<&'a CachedGrid> {
    if augment {
        return None;
    }
    molcache.and_then(|cache| cache.get(key))
}

fn require_file(role: FileRole, path: &Path) -> Result<(), LoaderError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoaderError::MissingFile {
            role,
            path: path.to_path_buf(),
        })
    }
}

fn load_type_map(role: FileRole, path: &Path) -> Result<TypeMap, LoaderError> {
    let map = TypeMap::read_from_path(path).map_err(|e| LoaderError::from_file(role, path, e))?;
    debug!(
        path = %path.display(),
        channels = map.num_channels(),
        "Loaded {}.",
        role
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{Dataset, LIG_CHANNELS, REC_CHANNELS};

    fn loader(dataset: &Dataset, batch_size: usize) -> MolGridLoader {
        let config = dataset.builder(batch_size).build().unwrap();
        MolGridLoader::new(config, &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn batches_have_the_configured_shape() {
        let dataset = Dataset::new(&[1.0, 0.0, 1.0, 0.0]);
        let mut loader = loader(&dataset, 3);
        assert_eq!(loader.grid_shape(), [REC_CHANNELS + LIG_CHANNELS, 13, 13, 13]);

        let batch = loader.next_batch().unwrap();
        assert_eq!(batch.grids.shape(), &[3, 5, 13, 13, 13]);
        assert_eq!(batch.labels, vec![1.0, 0.0, 1.0]);
        assert_eq!(batch.affinities, Some(vec![-0.0, -1.0, -2.0]));
        assert_eq!(batch.example_indices, vec![0, 1, 2]);
        assert!(batch.grids.data().iter().any(|&v| v > 0.0));

        let batch = loader.next_batch().unwrap();
        assert_eq!(batch.example_indices, vec![3, 0, 1]);
        assert_eq!(loader.epoch(), 1);
        assert_eq!(loader.batches_drawn(), 2);
    }

    #[test]
    fn default_geometry_gives_48_points() {
        let dataset = Dataset::new(&[1.0]);
        let config = dataset
            .builder(1)
            .dimension(23.5)
            .resolution(0.5)
            .build()
            .unwrap();
        let loader = MolGridLoader::new(config, &ProgressReporter::new()).unwrap();
        assert_eq!(loader.grid_shape(), [5, 48, 48, 48]);
    }

    #[test]
    fn unaugmented_voxelization_is_bit_identical() {
        let dataset = Dataset::new(&[1.0, 0.0]);
        let mut loader = loader(&dataset, 2);
        let first = loader.voxelize_example(1, false).unwrap();
        let second = loader.voxelize_example(1, false).unwrap();
        assert_eq!(first.data(), second.data());

        let from_batch = loader.next_batch().unwrap();
        assert_eq!(from_batch.grids.outer(1).unwrap(), first.data());
    }

    #[test]
    fn ligand_channels_follow_receptor_channels() {
        let dataset = Dataset::new(&[1.0]);
        let mut loader = loader(&dataset, 1);
        let whole = loader.voxelize_example(0, false).unwrap();
        let rec = loader.voxelize_part(0, Part::Receptor).unwrap();
        let lig = loader.voxelize_part(0, Part::Ligand).unwrap();
        assert_eq!(rec.channels(), REC_CHANNELS);
        assert_eq!(lig.channels(), LIG_CHANNELS);
        assert_eq!(&whole.data()[..rec.data().len()], rec.data());
        assert_eq!(&whole.data()[rec.data().len()..], lig.data());
        assert_eq!(
            loader.channel_names()[REC_CHANNELS],
            "lig_AliphaticCarbonXSHydrophobe_AromaticCarbonXSHydrophobe"
        );
    }

    #[test]
    fn seeded_augmentation_is_reproducible() {
        let dataset = Dataset::new(&[1.0, 0.0, 1.0]);
        let draw = || {
            let config = dataset
                .builder(3)
                .random_rotation(true)
                .random_translate(2.0)
                .shuffle(true)
                .seed(99)
                .build()
                .unwrap();
            let mut loader = MolGridLoader::new(config, &ProgressReporter::new()).unwrap();
            loader.next_batch().unwrap()
        };
        assert_eq!(draw(), draw());
    }

    #[test]
    fn augmentation_changes_the_grid() {
        let dataset = Dataset::new(&[1.0]);
        let config = dataset.builder(1).random_rotation(true).build().unwrap();
        let mut loader = MolGridLoader::new(config, &ProgressReporter::new()).unwrap();
        let plain = loader.voxelize_example(0, false).unwrap();
        let rotated = loader.voxelize_example(0, true).unwrap();
        assert_ne!(plain.data(), rotated.data());
    }

    #[test]
    fn missing_structure_is_reported() {
        let dataset = Dataset::new(&[1.0, 0.0]);
        std::fs::remove_file(dataset.path(&dataset.examples[1].receptor)).unwrap();
        let config = dataset.builder(2).build().unwrap();
        let result = MolGridLoader::new(config, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(LoaderError::MissingFile { role: FileRole::Receptor, ref path })
                if path.ends_with("rec1.gninatypes")
        ));
    }

    #[test]
    fn missing_type_map_is_reported() {
        let dataset = Dataset::new(&[1.0]);
        let config = dataset.builder(1).ligmap(dataset.path("nope.map")).build().unwrap();
        assert!(matches!(
            MolGridLoader::new(config, &ProgressReporter::new()),
            Err(LoaderError::MissingFile {
                role: FileRole::LigandMap,
                ..
            })
        ));
    }

    #[test]
    fn empty_index_is_a_config_error() {
        let dataset = Dataset::new(&[1.0]);
        std::fs::write(&dataset.index, "# nothing here\n").unwrap();
        let config = dataset.builder(1).build().unwrap();
        assert!(matches!(
            MolGridLoader::new(config, &ProgressReporter::new()),
            Err(LoaderError::Config(ConfigError::EmptySource(_)))
        ));
    }

    #[test]
    fn balanced_needs_both_classes() {
        let dataset = Dataset::new(&[0.0, 0.0]);
        let config = dataset.builder(2).balanced(true).build().unwrap();
        assert!(matches!(
            MolGridLoader::new(config, &ProgressReporter::new()),
            Err(LoaderError::Config(ConfigError::UnbalanceableSource { .. }))
        ));
    }

    fn write_receptor_cache(dataset: &Dataset, points: usize, fill: f32) -> std::path::PathBuf {
        let path = dataset.path("rec.molcache2");
        let mut cache = MolCache::new(REC_CHANNELS, points, 0.5);
        for (i, example) in dataset.examples.iter().enumerate() {
            if cache.contains(&example.receptor) {
                continue;
            }
            let values = vec![fill; REC_CHANNELS * points * points * points];
            cache
                .insert(
                    example.receptor.clone(),
                    dataset.ligand_center(i),
                    VoxelGrid::from_data(REC_CHANNELS, points, values).unwrap(),
                )
                .unwrap();
        }
        cache.write_to_path(&path).unwrap();
        path
    }

    #[test]
    fn cached_receptor_grids_replace_missing_files() {
        let dataset = Dataset::new(&[1.0, 0.0]);
        let cache_path = write_receptor_cache(&dataset, 13, 0.25);
        for example in &dataset.examples {
            std::fs::remove_file(dataset.path(&example.receptor)).unwrap();
        }

        let config = dataset.builder(2).recmolcache(&cache_path).build().unwrap();
        let mut loader = MolGridLoader::new(config, &ProgressReporter::new()).unwrap();
        let grid = loader.voxelize_example(0, false).unwrap();
        assert!(grid.channel(0).iter().all(|&v| v == 0.25));
        assert!(grid.channel(REC_CHANNELS).iter().any(|&v| v > 0.0 && v != 0.25));
    }

    #[test]
    fn cached_grids_need_files_when_augmenting() {
        let dataset = Dataset::new(&[1.0]);
        let cache_path = write_receptor_cache(&dataset, 13, 0.25);
        std::fs::remove_file(dataset.path(&dataset.examples[0].receptor)).unwrap();

        let config = dataset
            .builder(1)
            .recmolcache(&cache_path)
            .random_translate(1.0)
            .build()
            .unwrap();
        assert!(matches!(
            MolGridLoader::new(config, &ProgressReporter::new()),
            Err(LoaderError::MissingFile {
                role: FileRole::Receptor,
                ..
            })
        ));
    }

    #[test]
    fn mismatched_molcache_fails_or_falls_back() {
        let dataset = Dataset::new(&[1.0]);
        let cache_path = write_receptor_cache(&dataset, 7, 0.25);

        let config = dataset.builder(1).recmolcache(&cache_path).build().unwrap();
        assert!(matches!(
            MolGridLoader::new(config, &ProgressReporter::new()),
            Err(LoaderError::CacheMismatch {
                expected: [3, 13, 13, 13],
                found: [3, 7, 7, 7],
                ..
            })
        ));

        let config = dataset
            .builder(1)
            .recmolcache(&cache_path)
            .cache_fallback(true)
            .build()
            .unwrap();
        let mut loader = MolGridLoader::new(config, &ProgressReporter::new()).unwrap();
        let grid = loader.voxelize_example(0, false).unwrap();
        assert!(grid.channel(0).iter().all(|&v| v != 0.25));
    }

    #[test]
    fn structure_cache_does_not_change_results() {
        let dataset = Dataset::new(&[1.0, 0.0, 1.0]);
        let mut cached = loader(&dataset, 2);
        let config = dataset.builder(2).cache_structs(false).build().unwrap();
        let mut uncached = MolGridLoader::new(config, &ProgressReporter::new()).unwrap();
        for _ in 0..3 {
            assert_eq!(cached.next_batch().unwrap(), uncached.next_batch().unwrap());
        }
    }

    #[test]
    fn out_of_range_example_is_rejected() {
        let dataset = Dataset::new(&[1.0]);
        let mut loader = loader(&dataset, 1);
        assert!(matches!(
            loader.voxelize_example(5, false),
            Err(LoaderError::ExampleOutOfRange { index: 5, count: 1 })
        ));
    }

    #[test]
    fn shared_receptor_is_not_reused_around_another_ligand() {
        let dataset = Dataset::new(&[1.0, 0.0]);
        let mut examples = dataset.examples.clone();
        examples[1].receptor = examples[0].receptor.clone();
        dataset.rewrite_index(&examples);

        let cache_path = write_receptor_cache(&dataset, 13, 0.25);
        let config = dataset.builder(2).recmolcache(&cache_path).build().unwrap();
        let mut loader = MolGridLoader::new(config, &ProgressReporter::new()).unwrap();

        let first = loader.voxelize_example(0, false).unwrap();
        assert!(first.channel(0).iter().all(|&v| v == 0.25));

        let second = loader.voxelize_example(1, false).unwrap();
        let plain = loader.voxelize_part(1, Part::Receptor).unwrap();
        assert_eq!(&second.data()[..plain.data().len()], plain.data());
    }

    #[test]
    fn shared_receptor_file_is_required_when_off_center() {
        let dataset = Dataset::new(&[1.0, 0.0]);
        let mut examples = dataset.examples.clone();
        examples[1].receptor = examples[0].receptor.clone();
        dataset.rewrite_index(&examples);

        let cache_path = write_receptor_cache(&dataset, 13, 0.25);
        std::fs::remove_file(dataset.path(&examples[0].receptor)).unwrap();
        let config = dataset.builder(2).recmolcache(&cache_path).build().unwrap();
        assert!(matches!(
            MolGridLoader::new(config, &ProgressReporter::new()),
            Err(LoaderError::MissingFile { role: FileRole::Receptor, ref path })
                if path.ends_with("rec0.gninatypes")
        ));
    }

    #[test]
    fn molcache_at_another_resolution_is_rejected() {
        let dataset = Dataset::new(&[1.0]);
        let path = dataset.path("coarse.molcache2");
        let mut cache = MolCache::new(REC_CHANNELS, 13, 1.0);
        cache
            .insert(
                dataset.examples[0].receptor.clone(),
                dataset.ligand_center(0),
                VoxelGrid::zeros(REC_CHANNELS, 13),
            )
            .unwrap();
        cache.write_to_path(&path).unwrap();

        let config = dataset.builder(1).recmolcache(&path).build().unwrap();
        assert!(matches!(
            MolGridLoader::new(config, &ProgressReporter::new()),
            Err(LoaderError::CacheResolutionMismatch { .. })
        ));
    }
}
