//! # Workflows Module
//!
//! Complete procedures built on the [`crate::engine`] loader. Each workflow takes a
//! validated [`crate::engine::config::MolGridConfig`] and a progress reporter, builds its
//! own loader, and returns a plain result value.
//!
//! - **Inspection** ([`inspect`]) - Draw batches and summarize shapes, class counts and
//!   densities, including the receptor/ligand channel split.
//! - **Export** ([`export`]) - Voxelize one example deterministically and write OpenDX maps
//!   plus a PyMOL script for visual checks.
//! - **Caching** ([`cache`]) - Precompute receptor or ligand grids into a molcache file that
//!   later loaders can read instead of the structure files.

pub mod cache;
pub mod export;
pub mod inspect;
