use crate::core::grid::density::DensityKernel;
use crate::core::grid::spec::GridSpec;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },

    #[error("Index file {0} lists no examples")]
    EmptySource(PathBuf),

    #[error(
        "Balanced sampling needs both classes, index has {positives} positive and {negatives} negative examples"
    )]
    UnbalanceableSource { positives: usize, negatives: usize },
}

/// Where examples come from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Index file, one example per line.
    pub source: PathBuf,
    /// Base directory for relative structure references.
    pub root_folder: PathBuf,
    /// Whether index lines carry an affinity column.
    pub has_affinity: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub dimension: f64,
    pub resolution: f64,
    pub radius_multiple: f64,
    pub use_covalent_radius: bool,
    pub binary_occupancy: bool,
    pub recmap: PathBuf,
    pub ligmap: PathBuf,
}

impl GridConfig {
    pub fn spec(&self) -> GridSpec {
        GridSpec::new(self.dimension, self.resolution)
    }

    pub fn kernel(&self) -> DensityKernel {
        if self.binary_occupancy {
            DensityKernel::Binary
        } else {
            DensityKernel::Smooth
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentationConfig {
    pub random_rotation: bool,
    /// Largest shift per axis in Angstroms; `0.0` disables translation.
    pub random_translate: f64,
}

impl AugmentationConfig {
    pub fn is_enabled(&self) -> bool {
        self.random_rotation || self.random_translate > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub batch_size: usize,
    pub shuffle: bool,
    pub balanced: bool,
    /// Fraction of positives in each balanced batch.
    pub balance_ratio: f64,
    pub seed: Option<u64>,
}

impl SamplingConfig {
    /// Positives per balanced batch: `round(batch_size * balance_ratio)`.
    pub fn positives_per_batch(&self) -> usize {
        ((self.batch_size as f64 * self.balance_ratio).round() as usize).min(self.batch_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub cache_structs: bool,
    pub recmolcache: Option<PathBuf>,
    pub ligmolcache: Option<PathBuf>,
    /// Drop a molcache with the wrong grid shape instead of failing.
    pub cache_fallback: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MolGridConfig {
    pub source: SourceConfig,
    pub grid: GridConfig,
    pub augmentation: AugmentationConfig,
    pub sampling: SamplingConfig,
    pub cache: CacheConfig,
}

pub const DEFAULT_DIMENSION: f64 = 23.5;
pub const DEFAULT_RESOLUTION: f64 = 0.5;
pub const DEFAULT_RADIUS_MULTIPLE: f64 = 1.5;
pub const DEFAULT_BALANCE_RATIO: f64 = 0.5;

#[derive(Default)]
pub struct MolGridConfigBuilder {
    source: Option<PathBuf>,
    root_folder: Option<PathBuf>,
    has_affinity: Option<bool>,
    batch_size: Option<usize>,
    dimension: Option<f64>,
    resolution: Option<f64>,
    radius_multiple: Option<f64>,
    use_covalent_radius: Option<bool>,
    binary_occupancy: Option<bool>,
    recmap: Option<PathBuf>,
    ligmap: Option<PathBuf>,
    random_rotation: Option<bool>,
    random_translate: Option<f64>,
    shuffle: Option<bool>,
    balanced: Option<bool>,
    balance_ratio: Option<f64>,
    seed: Option<u64>,
    cache_structs: Option<bool>,
    recmolcache: Option<PathBuf>,
    ligmolcache: Option<PathBuf>,
    cache_fallback: Option<bool>,
}

impl MolGridConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }
    pub fn root_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_folder = Some(path.into());
        self
    }
    pub fn has_affinity(mut self, value: bool) -> Self {
        self.has_affinity = Some(value);
        self
    }
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }
    pub fn dimension(mut self, dimension: f64) -> Self {
        self.dimension = Some(dimension);
        self
    }
    pub fn resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }
    pub fn radius_multiple(mut self, multiple: f64) -> Self {
        self.radius_multiple = Some(multiple);
        self
    }
    pub fn use_covalent_radius(mut self, value: bool) -> Self {
        self.use_covalent_radius = Some(value);
        self
    }
    pub fn binary_occupancy(mut self, value: bool) -> Self {
        self.binary_occupancy = Some(value);
        self
    }
    pub fn recmap(mut self, path: impl Into<PathBuf>) -> Self {
        self.recmap = Some(path.into());
        self
    }
    pub fn ligmap(mut self, path: impl Into<PathBuf>) -> Self {
        self.ligmap = Some(path.into());
        self
    }
    pub fn random_rotation(mut self, value: bool) -> Self {
        self.random_rotation = Some(value);
        self
    }
    pub fn random_translate(mut self, max_shift: f64) -> Self {
        self.random_translate = Some(max_shift);
        self
    }
    pub fn shuffle(mut self, value: bool) -> Self {
        self.shuffle = Some(value);
        self
    }
    pub fn balanced(mut self, value: bool) -> Self {
        self.balanced = Some(value);
        self
    }
    pub fn balance_ratio(mut self, ratio: f64) -> Self {
        self.balance_ratio = Some(ratio);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn cache_structs(mut self, value: bool) -> Self {
        self.cache_structs = Some(value);
        self
    }
    pub fn recmolcache(mut self, path: impl Into<PathBuf>) -> Self {
        self.recmolcache = Some(path.into());
        self
    }
    pub fn ligmolcache(mut self, path: impl Into<PathBuf>) -> Self {
        self.ligmolcache = Some(path.into());
        self
    }
    pub fn cache_fallback(mut self, value: bool) -> Self {
        self.cache_fallback = Some(value);
        self
    }

    pub fn build(self) -> Result<MolGridConfig, ConfigError> {
        let source = SourceConfig {
            source: self.source.ok_or(ConfigError::MissingParameter("source"))?,
            root_folder: self.root_folder.unwrap_or_default(),
            has_affinity: self.has_affinity.unwrap_or(false),
        };

        let grid = GridConfig {
            dimension: positive("dimension", self.dimension.unwrap_or(DEFAULT_DIMENSION))?,
            resolution: positive("resolution", self.resolution.unwrap_or(DEFAULT_RESOLUTION))?,
            radius_multiple: positive(
                "radius_multiple",
                self.radius_multiple.unwrap_or(DEFAULT_RADIUS_MULTIPLE),
            )?,
            use_covalent_radius: self.use_covalent_radius.unwrap_or(false),
            binary_occupancy: self.binary_occupancy.unwrap_or(false),
            recmap: self.recmap.ok_or(ConfigError::MissingParameter("recmap"))?,
            ligmap: self.ligmap.ok_or(ConfigError::MissingParameter("ligmap"))?,
        };

        let random_translate = self.random_translate.unwrap_or(0.0);
        if !(random_translate >= 0.0 && random_translate.is_finite()) {
            return Err(ConfigError::InvalidValue {
                parameter: "random_translate",
                reason: format!("must be a finite value >= 0, got {}", random_translate),
            });
        }
        let augmentation = AugmentationConfig {
            random_rotation: self.random_rotation.unwrap_or(false),
            random_translate,
        };

        let batch_size = self
            .batch_size
            .ok_or(ConfigError::MissingParameter("batch_size"))?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        let balance_ratio = self.balance_ratio.unwrap_or(DEFAULT_BALANCE_RATIO);
        if !(balance_ratio > 0.0 && balance_ratio < 1.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "balance_ratio",
                reason: format!("must lie strictly between 0 and 1, got {}", balance_ratio),
            });
        }
        let sampling = SamplingConfig {
            batch_size,
            shuffle: self.shuffle.unwrap_or(false),
            balanced: self.balanced.unwrap_or(false),
            balance_ratio,
            seed: self.seed,
        };

        let cache = CacheConfig {
            cache_structs: self.cache_structs.unwrap_or(true),
            recmolcache: self.recmolcache,
            ligmolcache: self.ligmolcache,
            cache_fallback: self.cache_fallback.unwrap_or(false),
        };

        Ok(MolGridConfig {
            source,
            grid,
            augmentation,
            sampling,
            cache,
        })
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            reason: format!("must be a finite value > 0, got {}", value),
        })
    }
}
