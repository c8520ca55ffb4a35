//! Molcache containers: precomputed voxel grids keyed by structure reference.
//!
//! Layout (all integers and floats little-endian):
//!
//! ```text
//! magic      4 bytes  "MGC2"
//! version    u32      2
//! channels   u32
//! points     u32      grid points per axis
//! resolution f32
//! count      u32
//! count x {
//!     key_len u32
//!     key     key_len bytes of UTF-8
//!     center  3 x f64  grid center the values were computed around
//!     values  channels * points^3 f32
//! }
//! ```

use crate::core::models::grid::VoxelGrid;
use nalgebra::Point3;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

const MAGIC: &[u8; 4] = b"MGC2";
const VERSION: u32 = 2;

/// Upper bound on `channels * points^3` accepted from a file header (1 GiB of values).
const MAX_GRID_VALUES: usize = 1 << 28;
const MAX_KEY_LEN: usize = 4096;
/// Distance in Angstroms below which two grid centers are considered the same.
const CENTER_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum MolCacheError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Not a molcache file (bad magic bytes)")]
    BadMagic,
    #[error("Unsupported molcache version {0} (expected 2)")]
    UnsupportedVersion(u32),
    #[error("Header declares {channels} channels of {points}^3 points, which is not a usable grid")]
    GridTooLarge { channels: usize, points: usize },
    #[error("Entry {entry} declares a key of {len} bytes")]
    KeyTooLong { entry: usize, len: usize },
    #[error("Entry {entry} has a key that is not valid UTF-8")]
    InvalidKey { entry: usize },
    #[error("Duplicate entry for key '{0}'")]
    DuplicateKey(String),
    #[error("Grid for '{key}' has shape {found:?}, cache stores {expected:?}")]
    ShapeMismatch {
        key: String,
        expected: [usize; 4],
        found: [usize; 4],
    },
}

/// One stored grid and the center it was voxelized around.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedGrid {
    pub center: Point3<f64>,
    pub grid: VoxelGrid,
}

impl CachedGrid {
    pub fn is_centered_on(&self, center: &Point3<f64>) -> bool {
        (self.center - center).norm() <= CENTER_TOLERANCE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MolCache {
    channels: usize,
    points: usize,
    resolution: f32,
    entries: HashMap<String, CachedGrid>,
}

impl MolCache {
    pub fn new(channels: usize, points: usize, resolution: f32) -> Self {
        Self {
            channels,
            points,
            resolution,
            entries: HashMap::new(),
        }
    }

    /// Shape shared by every stored grid, `[channels, points, points, points]`.
    pub fn grid_shape(&self) -> [usize; 4] {
        [self.channels, self.points, self.points, self.points]
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&CachedGrid> {
        self.entries.get(key)
    }

    pub fn insert(
        &mut self,
        key: String,
        center: Point3<f64>,
        grid: VoxelGrid,
    ) -> Result<(), MolCacheError> {
        if grid.shape() != self.grid_shape() {
            return Err(MolCacheError::ShapeMismatch {
                key,
                expected: self.grid_shape(),
                found: grid.shape(),
            });
        }
        self.entries.insert(key, CachedGrid { center, grid });
        Ok(())
    }

    pub fn read_from(reader: &mut impl Read) -> Result<Self, MolCacheError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(MolCacheError::BadMagic);
        }
        let version = read_u32(reader)?;
        if version != VERSION {
            return Err(MolCacheError::UnsupportedVersion(version));
        }

        let channels = read_u32(reader)? as usize;
        let points = read_u32(reader)? as usize;
        let resolution = read_f32(reader)?;
        let count = read_u32(reader)? as usize;

        let values = grid_values(channels, points)
            .ok_or(MolCacheError::GridTooLarge { channels, points })?;
        let mut cache = Self::new(channels, points, resolution);
        let mut raw = vec![0u8; values * 4];

        for entry in 0..count {
            let key_len = read_u32(reader)? as usize;
            if key_len > MAX_KEY_LEN {
                return Err(MolCacheError::KeyTooLong {
                    entry,
                    len: key_len,
                });
            }
            let mut key_bytes = vec![0u8; key_len];
            reader.read_exact(&mut key_bytes)?;
            let key =
                String::from_utf8(key_bytes).map_err(|_| MolCacheError::InvalidKey { entry })?;

            let center = Point3::new(read_f64(reader)?, read_f64(reader)?, read_f64(reader)?);
            reader.read_exact(&mut raw)?;
            let mut grid = VoxelGrid::zeros(channels, points);
            for (value, b) in grid.data_mut().iter_mut().zip(raw.chunks_exact(4)) {
                *value = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
            }

            if cache
                .entries
                .insert(key.clone(), CachedGrid { center, grid })
                .is_some()
            {
                return Err(MolCacheError::DuplicateKey(key));
            }
        }
        Ok(cache)
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), MolCacheError> {
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&(self.channels as u32).to_le_bytes())?;
        writer.write_all(&(self.points as u32).to_le_bytes())?;
        writer.write_all(&self.resolution.to_le_bytes())?;
        writer.write_all(&(self.entries.len() as u32).to_le_bytes())?;

        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        for key in keys {
            let entry = &self.entries[key];
            writer.write_all(&(key.len() as u32).to_le_bytes())?;
            writer.write_all(key.as_bytes())?;
            for coordinate in entry.center.iter() {
                writer.write_all(&coordinate.to_le_bytes())?;
            }
            for value in entry.grid.data() {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        Ok(())
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, MolCacheError> {
        let file = File::open(path)?;
        Self::read_from(&mut BufReader::new(file))
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), MolCacheError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// `channels * points^3`, or `None` when it overflows or exceeds [`MAX_GRID_VALUES`].
fn grid_values(channels: usize, points: usize) -> Option<usize> {
    points
        .checked_mul(points)?
        .checked_mul(points)?
        .checked_mul(channels)
        .filter(|&values| values <= MAX_GRID_VALUES)
}

fn read_u32(reader: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32(reader: &mut impl Read) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_f64(reader: &mut impl Read) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cache() -> MolCache {
        let mut cache = MolCache::new(2, 2, 0.5);
        let values: Vec<f32> = (0..16).map(|v| v as f32 * 0.25).collect();
        cache
            .insert(
                "rec/1abc.gninatypes".to_string(),
                Point3::new(1.5, -2.0, 0.25),
                VoxelGrid::from_data(2, 2, values).unwrap(),
            )
            .unwrap();
        cache
            .insert(
                "rec/2xyz.gninatypes".to_string(),
                Point3::origin(),
                VoxelGrid::zeros(2, 2),
            )
            .unwrap();
        cache
    }

    #[test]
    fn written_cache_reads_back_identically() {
        let cache = sample_cache();
        let mut bytes = Vec::new();
        cache.write_to(&mut bytes).unwrap();
        let restored = MolCache::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(restored, cache);
        assert_eq!(restored.grid_shape(), [2, 2, 2, 2]);
        let entry = restored.get("rec/1abc.gninatypes").unwrap();
        assert_eq!(entry.grid.get(1, 1, 1, 1), 3.75);
        assert_eq!(entry.center, Point3::new(1.5, -2.0, 0.25));
    }

    #[test]
    fn insert_rejects_wrong_shape() {
        let mut cache = MolCache::new(2, 2, 0.5);
        let result = cache.insert("x".to_string(), Point3::origin(), VoxelGrid::zeros(1, 2));
        assert!(matches!(
            result,
            Err(MolCacheError::ShapeMismatch {
                expected: [2, 2, 2, 2],
                found: [1, 2, 2, 2],
                ..
            })
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let bytes = b"NOPE\x02\x00\x00\x00".to_vec();
        assert!(matches!(
            MolCache::read_from(&mut bytes.as_slice()),
            Err(MolCacheError::BadMagic)
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            MolCache::read_from(&mut bytes.as_slice()),
            Err(MolCacheError::UnsupportedVersion(7))
        ));
    }

    fn header(channels: u32, points: u32, count: u32) -> Vec<u8> {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&points.to_le_bytes());
        bytes.extend_from_slice(&0.5f32.to_le_bytes());
        bytes.extend_from_slice(&count.to_le_bytes());
        bytes
    }

    #[test]
    fn oversized_grid_header_is_rejected() {
        for (channels, points) in [(u32::MAX, u32::MAX), (1, 1 << 20), (64, 2048)] {
            let bytes = header(channels, points, 1);
            assert!(matches!(
                MolCache::read_from(&mut bytes.as_slice()),
                Err(MolCacheError::GridTooLarge { .. })
            ));
        }
    }

    #[test]
    fn oversized_key_is_rejected() {
        let mut bytes = header(1, 2, 1);
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            MolCache::read_from(&mut bytes.as_slice()),
            Err(MolCacheError::KeyTooLong { entry: 0, .. })
        ));
    }

    #[test]
    fn centers_match_within_tolerance() {
        let entry = CachedGrid {
            center: Point3::new(1.0, 2.0, 3.0),
            grid: VoxelGrid::zeros(1, 1),
        };
        assert!(entry.is_centered_on(&Point3::new(1.0, 2.0, 3.0 + 1e-9)));
        assert!(!entry.is_centered_on(&Point3::new(1.0, 2.0, 3.03)));
    }

    #[test]
    fn truncated_entries_fail_with_io_error() {
        let mut bytes = Vec::new();
        sample_cache().write_to(&mut bytes).unwrap();
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            MolCache::read_from(&mut bytes.as_slice()),
            Err(MolCacheError::Io(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.molcache2");
        let cache = sample_cache();
        cache.write_to_path(&path).unwrap();
        assert_eq!(MolCache::read_from_path(&path).unwrap(), cache);
    }
}
