//! # MolGrid Core Library
//!
//! A data loader that turns receptor-ligand complexes into fixed-size, multi-channel 3-D
//! density grids for structure-based binding affinity models.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `VoxelGrid`, `Tensor`),
//!   the atom-type table and channel maps, file formats, grid geometry and the density kernel.
//!
//! - **[`engine`]: The Logic Core.** The stateful `MolGridLoader` that reads an index of
//!   examples, orders them per epoch (sequential, shuffled or class-balanced), applies random
//!   rigid-body augmentation and voxelizes batches, plus the channel slice stage.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the engine: inspecting
//!   batches, exporting a single example as OpenDX maps, and precomputing molcache files.

pub mod core;
pub mod engine;
pub mod workflows;
