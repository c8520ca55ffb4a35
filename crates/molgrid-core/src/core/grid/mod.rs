//! Grid geometry ([`spec`]) and the atom density kernel that fills grids ([`density`]).

pub mod density;
pub mod spec;
