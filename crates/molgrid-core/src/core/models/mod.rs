//! Data models shared by the file readers, the voxelizer and the loader.
//!
//! - [`atom`] / [`structure`]: typed atoms and the structures they form.
//! - [`example`]: one receptor/ligand record of an index file.
//! - [`grid`]: a single multi-channel voxel grid.
//! - [`tensor`]: stacked batches and the slices taken from them.

pub mod atom;
pub mod example;
pub mod grid;
pub mod structure;
pub mod tensor;
