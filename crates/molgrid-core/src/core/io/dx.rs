use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes one cubic scalar field as an OpenDX map readable by PyMOL and VMD.
///
/// `values` holds `points^3` entries ordered x, y, z with z fastest, matching a single
/// [`crate::core::models::grid::VoxelGrid`] channel.
pub fn write_dx(
    writer: &mut impl Write,
    values: &[f32],
    points: usize,
    origin: &Point3<f64>,
    resolution: f64,
) -> io::Result<()> {
    let total = points * points * points;
    if values.len() != total {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("expected {} values for a {}^3 grid, got {}", total, points, values.len()),
        ));
    }

    writeln!(
        writer,
        "object 1 class gridpositions counts {} {} {}",
        points, points, points
    )?;
    writeln!(writer, "origin {:.5} {:.5} {:.5}", origin.x, origin.y, origin.z)?;
    writeln!(writer, "delta {:.5} 0 0", resolution)?;
    writeln!(writer, "delta 0 {:.5} 0", resolution)?;
    writeln!(writer, "delta 0 0 {:.5}", resolution)?;
    writeln!(
        writer,
        "object 2 class gridconnections counts {} {} {}",
        points, points, points
    )?;
    writeln!(
        writer,
        "object 3 class array type double rank 0 items [ {} ] data follows",
        total
    )?;

    for (n, value) in values.iter().enumerate() {
        write!(writer, "{:.10}", value)?;
        if (n + 1) % 3 == 0 || n + 1 == total {
            writeln!(writer)?;
        } else {
            write!(writer, " ")?;
        }
    }
    Ok(())
}

pub fn write_dx_to_path<P: AsRef<Path>>(
    path: P,
    values: &[f32],
    points: usize,
    origin: &Point3<f64>,
    resolution: f64,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_dx(&mut writer, values, points, origin, resolution)?;
    writer.flush()
}
