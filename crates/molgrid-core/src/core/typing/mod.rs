//! Atom typing: the fixed table of atom types with their radii, and the channel maps that
//! assign those types to grid channels (`recmap` / `ligmap`).

pub mod table;
pub mod typemap;
