use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes a PyMOL script that loads each map as `<map stem>_grid`, groups the maps under
/// `group_name` and then loads the receptor and ligand structures.
pub fn write_pymol_script(
    writer: &mut impl Write,
    group_name: &str,
    dx_files: &[String],
    receptor_file: &str,
    ligand_file: &str,
) -> io::Result<()> {
    let mut map_objects = Vec::with_capacity(dx_files.len());
    for dx_file in dx_files {
        let stem = dx_file.strip_suffix(".dx").unwrap_or(dx_file);
        let map_object = format!("{}_grid", stem);
        writeln!(writer, "load {}, {}", dx_file, map_object)?;
        map_objects.push(map_object);
    }
    if !map_objects.is_empty() {
        writeln!(writer, "group {}, {}", group_name, map_objects.join(" "))?;
    }
    writeln!(writer, "load {}", receptor_file)?;
    writeln!(writer, "load {}", ligand_file)?;
    Ok(())
}

pub fn write_pymol_script_to_path<P: AsRef<Path>>(
    path: P,
    group_name: &str,
    dx_files: &[String],
    receptor_file: &str,
    ligand_file: &str,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_pymol_script(&mut writer, group_name, dx_files, receptor_file, ligand_file)?;
    writer.flush()
}
