use crate::core::typing::table::{AtomTypeInfo, type_info};
use nalgebra::Point3;

/// An atom reduced to what voxelization needs: a position and an atom-type index.
///
/// The type index refers to the fixed table in [`crate::core::typing::table`]. Readers
/// validate it on input, so [`TypedAtom::info`] only returns `None` for hand-built atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypedAtom {
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Index into the atom-type table.
    pub type_index: usize,
}

impl TypedAtom {
    pub fn new(position: Point3<f64>, type_index: usize) -> Self {
        Self {
            position,
            type_index,
        }
    }

    pub fn info(&self) -> Option<&'static AtomTypeInfo> {
        type_info(self.type_index)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.info().is_some_and(AtomTypeInfo::is_hydrogen)
    }
}
