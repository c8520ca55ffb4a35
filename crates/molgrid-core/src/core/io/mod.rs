//! Provides input/output functionality for the files a grid loader touches.
//!
//! - [`index`]: the example index (`source`) listing labelled receptor/ligand pairs.
//! - [`gninatypes`]: pre-typed binary structure files, behind the [`traits::StructureFile`]
//!   interface.
//! - [`molcache`]: versioned containers of precomputed voxel grids.
//! - [`dx`] and [`pymol`]: OpenDX map output and PyMOL loader scripts for visual inspection
//!   of grid channels.

pub mod dx;
pub mod gninatypes;
pub mod index;
pub mod molcache;
pub mod pymol;
pub mod traits;
