//! # Core Module
//!
//! Fundamental building blocks for turning typed molecular structures into voxel grids.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Typed atoms, structures, index examples, voxel grids and tensors
//! - **Atom Typing** ([`typing`]) - The fixed atom-type table and atom-type-to-channel maps
//! - **File I/O** ([`io`]) - Index files, `.gninatypes` structures, molcache containers and OpenDX output
//! - **Gridding** ([`grid`]) - Grid geometry and the per-atom density kernel
//! - **Utilities** ([`utils`]) - Centroids and random rigid-body transforms
//!
//! Nothing in this module holds mutable state across calls; the stateful loader lives in
//! [`crate::engine`].

pub mod grid;
pub mod io;
pub mod models;
pub mod typing;
pub mod utils;
