//! # Engine Module
//!
//! The stateful half of the library: a loader that turns an index of receptor-ligand examples
//! into an endless stream of voxelized batches.
//!
//! ## Overview
//!
//! [`loader::MolGridLoader`] is built from a validated [`config::MolGridConfig`]. On
//! construction it reads the channel type maps and the index, opens optional molcaches and
//! checks that every structure it will need exists. Each call to
//! [`loader::MolGridLoader::next_batch`] then asks the [`sampling`] layer for example indices,
//! draws a rigid-body transform per example, and voxelizes receptor and ligand into
//! consecutive channels of one grid, in parallel when the `parallel` feature is enabled.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Loader options and their validating builder
//! - **Sampling** ([`sampling`]) - Sequential, shuffled and class-balanced example orders
//! - **Caching** ([`cache`]) - Parsed structures kept in memory and molcache lookups
//! - **Slicing** ([`slice`]) - Splitting batch tensors into receptor and ligand channels
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Loader errors with the offending file attached

pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod progress;
pub mod sampling;
pub mod slice;

#[cfg(test)]
pub(crate) mod fixtures;
