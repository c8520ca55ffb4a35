use crate::cli::{ConfigArgs, Phase};
use crate::error::{CliError, Result};
use molgrid::engine::config::{MolGridConfig, MolGridConfigBuilder};
use molgrid::engine::slice::DEFAULT_SLICE_POINT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// One loader section (`[train]` or `[test]`) of the configuration file.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialLoaderConfig {
    source: Option<PathBuf>,
    batch_size: Option<usize>,
    dimension: Option<f64>,
    resolution: Option<f64>,
    shuffle: Option<bool>,
    balanced: Option<bool>,
    balance_ratio: Option<f64>,
    root_folder: Option<PathBuf>,
    random_rotation: Option<bool>,
    random_translate: Option<f64>,
    radius_multiple: Option<f64>,
    has_affinity: Option<bool>,
    use_covalent_radius: Option<bool>,
    binary_occupancy: Option<bool>,
    recmap: Option<PathBuf>,
    ligmap: Option<PathBuf>,
    cache_structs: Option<bool>,
    recmolcache: Option<PathBuf>,
    ligmolcache: Option<PathBuf>,
    cache_fallback: Option<bool>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSliceConfig {
    slice_point: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialGridConfig {
    train: Option<PartialLoaderConfig>,
    test: Option<PartialLoaderConfig>,
    slice: Option<PartialSliceConfig>,
}

/// The loader configuration for one phase plus the slice point, after merging file values,
/// `--set` overrides and command-line flags.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub loader: MolGridConfig,
    pub slice_point: usize,
}

impl PartialGridConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn merge_with_cli(mut self, args: &ConfigArgs) -> Result<ResolvedConfig> {
        self.apply_set_values(&args.set_values)?;

        let section = match args.phase {
            Phase::Train => self.train.take(),
            Phase::Test => self.test.take(),
        }
        .ok_or_else(|| {
            CliError::Config(format!(
                "The configuration file has no [{}] section.",
                args.phase.section()
            ))
        })?;

        let loader = Self::build_loader(section, args.seed)?;
        let slice_point = self
            .slice
            .and_then(|slice| slice.slice_point)
            .unwrap_or(DEFAULT_SLICE_POINT);

        Ok(ResolvedConfig {
            loader,
            slice_point,
        })
    }

    fn build_loader(p: PartialLoaderConfig, cli_seed: Option<u64>) -> Result<MolGridConfig> {
        let mut builder = MolGridConfigBuilder::new();

        if let Some(v) = p.source {
            builder = builder.source(v);
        }
        if let Some(v) = p.batch_size {
            builder = builder.batch_size(v);
        }
        if let Some(v) = p.dimension {
            builder = builder.dimension(v);
        }
        if let Some(v) = p.resolution {
            builder = builder.resolution(v);
        }
        if let Some(v) = p.shuffle {
            builder = builder.shuffle(v);
        }
        if let Some(v) = p.balanced {
            builder = builder.balanced(v);
        }
        if let Some(v) = p.balance_ratio {
            builder = builder.balance_ratio(v);
        }
        if let Some(v) = p.root_folder {
            builder = builder.root_folder(v);
        }
        if let Some(v) = p.random_rotation {
            builder = builder.random_rotation(v);
        }
        if let Some(v) = p.random_translate {
            builder = builder.random_translate(v);
        }
        if let Some(v) = p.radius_multiple {
            builder = builder.radius_multiple(v);
        }
        if let Some(v) = p.has_affinity {
            builder = builder.has_affinity(v);
        }
        if let Some(v) = p.use_covalent_radius {
            builder = builder.use_covalent_radius(v);
        }
        if let Some(v) = p.binary_occupancy {
            builder = builder.binary_occupancy(v);
        }
        if let Some(v) = p.recmap {
            builder = builder.recmap(v);
        }
        if let Some(v) = p.ligmap {
            builder = builder.ligmap(v);
        }
        if let Some(v) = p.cache_structs {
            builder = builder.cache_structs(v);
        }
        if let Some(v) = p.recmolcache {
            builder = builder.recmolcache(v);
        }
        if let Some(v) = p.ligmolcache {
            builder = builder.ligmolcache(v);
        }
        if let Some(v) = p.cache_fallback {
            builder = builder.cache_fallback(v);
        }
        if let Some(v) = cli_seed.or(p.seed) {
            builder = builder.seed(v);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let (section, field) = key.split_once('.').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set key: '{}'. Expected SECTION.KEY, e.g. train.batch-size.",
                    key
                ))
            })?;

            match section {
                "train" => self
                    .train
                    .get_or_insert_with(Default::default)
                    .set(key, field, value)?,
                "test" => self
                    .test
                    .get_or_insert_with(Default::default)
                    .set(key, field, value)?,
                "slice" if field == "slice-point" => {
                    self.slice.get_or_insert_with(Default::default).slice_point =
                        Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

impl PartialLoaderConfig {
    fn set(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        match field {
            "source" => self.source = Some(PathBuf::from(value)),
            "batch-size" => self.batch_size = Some(parse_value(key, value)?),
            "dimension" => self.dimension = Some(parse_value(key, value)?),
            "resolution" => self.resolution = Some(parse_value(key, value)?),
            "shuffle" => self.shuffle = Some(parse_value(key, value)?),
            "balanced" => self.balanced = Some(parse_value(key, value)?),
            "balance-ratio" => self.balance_ratio = Some(parse_value(key, value)?),
            "root-folder" => self.root_folder = Some(PathBuf::from(value)),
            "random-rotation" => self.random_rotation = Some(parse_value(key, value)?),
            "random-translate" => self.random_translate = Some(parse_value(key, value)?),
            "radius-multiple" => self.radius_multiple = Some(parse_value(key, value)?),
            "has-affinity" => self.has_affinity = Some(parse_value(key, value)?),
            "use-covalent-radius" => self.use_covalent_radius = Some(parse_value(key, value)?),
            "binary-occupancy" => self.binary_occupancy = Some(parse_value(key, value)?),
            "recmap" => self.recmap = Some(PathBuf::from(value)),
            "ligmap" => self.ligmap = Some(PathBuf::from(value)),
            "cache-structs" => self.cache_structs = Some(parse_value(key, value)?),
            "recmolcache" => self.recmolcache = Some(PathBuf::from(value)),
            "ligmolcache" => self.ligmolcache = Some(PathBuf::from(value)),
            "cache-fallback" => self.cache_fallback = Some(parse_value(key, value)?),
            "seed" => self.seed = Some(parse_value(key, value)?),
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid value for {}: '{}' ({})",
            key,
            value,
            std::any::type_name::<T>()
        ))
    })
}
