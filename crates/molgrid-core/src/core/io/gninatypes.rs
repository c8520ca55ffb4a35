use crate::core::io::traits::StructureFile;
use crate::core::models::atom::TypedAtom;
use crate::core::models::structure::Structure;
use crate::core::typing::table::num_atom_types;
use nalgebra::Point3;
use std::io::{self, Read, Write};
use thiserror::Error;

const RECORD_SIZE: usize = 16;

#[derive(Debug, Error)]
pub enum GninatypesError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("File length {length} is not a multiple of the 16-byte record size")]
    TruncatedRecord { length: usize },
    #[error("Record {record} has atom type {type_index}, outside the type table")]
    UnknownType { record: usize, type_index: i32 },
}

/// Pre-typed atom coordinates: consecutive little-endian records of
/// `f32 x, f32 y, f32 z, i32 type`.
pub struct GninatypesFile;

impl StructureFile for GninatypesFile {
    type Error = GninatypesError;

    fn read_from(reader: &mut impl Read) -> Result<Structure, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(GninatypesError::TruncatedRecord {
                length: bytes.len(),
            });
        }

        let mut structure = Structure::default();
        for (record, chunk) in bytes.chunks_exact(RECORD_SIZE).enumerate() {
            let x = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let y = f32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
            let z = f32::from_le_bytes([chunk[8], chunk[9], chunk[10], chunk[11]]);
            let type_index = i32::from_le_bytes([chunk[12], chunk[13], chunk[14], chunk[15]]);

            let index = usize::try_from(type_index)
                .ok()
                .filter(|&i| i < num_atom_types())
                .ok_or(GninatypesError::UnknownType { record, type_index })?;

            structure.push(TypedAtom::new(
                Point3::new(x as f64, y as f64, z as f64),
                index,
            ));
        }
        Ok(structure)
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        for atom in structure.atoms() {
            writer.write_all(&(atom.position.x as f32).to_le_bytes())?;
            writer.write_all(&(atom.position.y as f32).to_le_bytes())?;
            writer.write_all(&(atom.position.z as f32).to_le_bytes())?;
            writer.write_all(&(atom.type_index as i32).to_le_bytes())?;
        }
        Ok(())
    }
}
