//! Wavefront OBJ writer

use std::io::{self, Write};

use primitive_geometry::{Geometry, Topology};

/// Write `geometry` as one OBJ object named `name`.
///
/// Positions, normals and UVs share one index space, so every face corner
/// uses the same number for `v`, `vt` and `vn`. Line cells become `l`
/// records, triangles and quads `f` records.
pub fn write_obj<W: Write>(
    mut writer: W,
    geometry: &Geometry,
    name: &str,
    normals: bool,
    uvs: bool,
) -> io::Result<()> {
    let normals = normals.then_some(geometry.normals.as_deref()).flatten();
    let uvs = uvs.then_some(geometry.uvs.as_deref()).flatten();

    writeln!(writer, "# {} vertices, {} cells", geometry.vertex_count(), geometry.cell_count())?;
    writeln!(writer, "o {name}")?;

    for p in geometry.positions.chunks_exact(3) {
        writeln!(writer, "v {} {} {}", p[0], p[1], p[2])?;
    }
    if let Some(uvs) = uvs {
        for uv in uvs.chunks_exact(2) {
            writeln!(writer, "vt {} {}", uv[0], uv[1])?;
        }
    }
    if let Some(normals) = normals {
        for n in normals.chunks_exact(3) {
            writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
        }
    }

    let record = match geometry.topology {
        Topology::Lines => "l",
        Topology::Triangles | Topology::Quads => "f",
    };
    let stride = geometry.topology.stride();
    let lines = geometry.topology == Topology::Lines;

    for cell in geometry.cells.to_u32().chunks_exact(stride) {
        write!(writer, "{record}")?;
        for &index in cell {
            // OBJ indices are 1-based
            let i = index + 1;
            match (uvs.is_some(), normals.is_some() && !lines) {
                (true, true) => write!(writer, " {i}/{i}/{i}")?,
                (false, true) => write!(writer, " {i}//{i}")?,
                (true, false) => write!(writer, " {i}/{i}")?,
                (false, false) => write!(writer, " {i}")?,
            }
        }
        writeln!(writer)?;
    }

    writer.flush()
}
