//! Rectilinear primitives: quad, plane, box, cube
//!
//! Plane and cube are one and six uses of the patch builder; quad and box are
//! fixed vertex tables.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Geometry, Topology};
use crate::math::{positive, segments};
use crate::patch::{compute_plane, BuildCursor, Direction, GeometryBuffers, Patch};

/// Options for [`quad`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadOptions {
    /// Side length
    pub scale: f32,
}

impl Default for QuadOptions {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Generate a single square in the XY plane facing +Z
///
/// 4 vertices, 2 triangles, UVs spanning [0, 1].
pub fn quad(options: &QuadOptions) -> Geometry {
    let h = positive("quad", "scale", options.scale) * 0.5;

    Geometry::new(
        vec![-h, -h, 0.0, h, -h, 0.0, h, h, 0.0, -h, h, 0.0],
        Some([0.0, 0.0, 1.0].repeat(4)),
        Some(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]),
        vec![0, 1, 2, 0, 2, 3],
        Topology::Triangles,
    )
}

/// Options for [`plane`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneOptions {
    /// Extent along the plane's first axis
    pub sx: f32,
    /// Extent along the second axis (defaults to `sx`)
    pub sy: Option<f32>,
    /// Subdivisions along the first axis
    pub nx: u32,
    /// Subdivisions along the second axis (defaults to `nx`)
    pub ny: Option<u32>,
    /// Facing
    pub direction: Direction,
    /// Emit quads instead of triangles
    pub quads: bool,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: None,
            nx: 1,
            ny: None,
            direction: Direction::PositiveZ,
            quads: false,
        }
    }
}

/// Generate a subdivided plane centered at the origin
///
/// `(nx + 1) * (ny + 1)` vertices; `nx * ny` quads, or twice as many
/// triangles.
pub fn plane(options: &PlaneOptions) -> Geometry {
    let sx = positive("plane", "sx", options.sx);
    let sy = positive("plane", "sy", options.sy.unwrap_or(sx));
    let nx = segments("plane", "nx", options.nx, 1);
    let ny = segments("plane", "ny", options.ny.unwrap_or(nx), 1);

    let patch = Patch {
        size: Vec2::new(sx, sy),
        nu: nx,
        nv: ny,
        direction: options.direction,
        quads: options.quads,
        ..Default::default()
    };

    let mut buffers = GeometryBuffers::new(patch.vertex_count(), patch.index_count());
    compute_plane(&mut buffers, &mut BuildCursor::default(), &patch);

    let topology = if options.quads {
        Topology::Quads
    } else {
        Topology::Triangles
    };
    buffers.into_geometry(topology)
}

/// Options for [`box_geometry`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxOptions {
    pub sx: f32,
    /// Defaults to `sx`
    pub sy: Option<f32>,
    /// Defaults to `sx`
    pub sz: Option<f32>,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: None,
            sz: None,
        }
    }
}

/// Generate a bare box: 8 shared corners and 6 outward-wound quads
///
/// No normals or UVs; use [`cube`] for a shaded box.
pub fn box_geometry(options: &BoxOptions) -> Geometry {
    let x = positive("box", "sx", options.sx) * 0.5;
    let y = positive("box", "sy", options.sy.unwrap_or(options.sx)) * 0.5;
    let z = positive("box", "sz", options.sz.unwrap_or(options.sx)) * 0.5;

    #[rustfmt::skip]
    let positions = vec![
        -x, -y,  z,
         x, -y,  z,
         x,  y,  z,
        -x,  y,  z,
         x, -y, -z,
        -x, -y, -z,
        -x,  y, -z,
         x,  y, -z,
    ];

    #[rustfmt::skip]
    let cells = vec![
        0, 1, 2, 3, // +z
        4, 5, 6, 7, // -z
        1, 4, 7, 2, // +x
        5, 0, 3, 6, // -x
        3, 2, 7, 6, // +y
        5, 4, 1, 0, // -y
    ];

    Geometry::new(positions, None, None, cells, Topology::Quads)
}

/// Options for [`cube`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeOptions {
    pub sx: f32,
    /// Defaults to `sx`
    pub sy: Option<f32>,
    /// Defaults to `sx`
    pub sz: Option<f32>,
    pub nx: u32,
    /// Defaults to `nx`
    pub ny: Option<u32>,
    /// Defaults to `nx`
    pub nz: Option<u32>,
}

impl Default for CubeOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: None,
            sz: None,
            nx: 1,
            ny: None,
            nz: None,
        }
    }
}

/// Face size, subdivisions and half-depth for each direction of a box
/// with extents `size` and subdivisions `n`.
pub(crate) fn face_layout(direction: Direction, size: Vec3, n: [u32; 3]) -> (Vec2, [u32; 2], f32) {
    match direction {
        Direction::PositiveZ | Direction::NegativeZ => {
            (Vec2::new(size.x, size.y), [n[0], n[1]], size.z * 0.5)
        }
        Direction::PositiveX | Direction::NegativeX => {
            (Vec2::new(size.z, size.y), [n[2], n[1]], size.x * 0.5)
        }
        Direction::PositiveY | Direction::NegativeY => {
            (Vec2::new(size.x, size.z), [n[0], n[2]], size.y * 0.5)
        }
    }
}

/// Generate a subdivided cube with flat per-face normals and per-face UVs
pub fn cube(options: &CubeOptions) -> Geometry {
    let sx = positive("cube", "sx", options.sx);
    let size = Vec3::new(
        sx,
        positive("cube", "sy", options.sy.unwrap_or(sx)),
        positive("cube", "sz", options.sz.unwrap_or(sx)),
    );
    let nx = segments("cube", "nx", options.nx, 1);
    let n = [
        nx,
        segments("cube", "ny", options.ny.unwrap_or(nx), 1),
        segments("cube", "nz", options.nz.unwrap_or(nx), 1),
    ];

    let patches = Direction::ALL.map(|direction| {
        let (face, [nu, nv], depth) = face_layout(direction, size, n);
        Patch {
            size: face,
            nu,
            nv,
            direction,
            offset: depth,
            ..Default::default()
        }
    });

    let vertex_count = patches.iter().map(Patch::vertex_count).sum();
    let index_count = patches.iter().map(Patch::index_count).sum();
    let mut buffers = GeometryBuffers::new(vertex_count, index_count);
    let mut cursor = BuildCursor::default();
    for patch in &patches {
        compute_plane(&mut buffers, &mut cursor, patch);
    }

    buffers.into_geometry(Topology::Triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexKind;

    #[test]
    fn test_box_counts() {
        let geometry = box_geometry(&BoxOptions {
            sx: 2.0,
            sy: Some(1.0),
            sz: Some(1.0),
        });
        assert_eq!(geometry.positions.len(), 24);
        assert_eq!(geometry.cells.len(), 24);
        assert_eq!(geometry.topology, Topology::Quads);
        assert!(geometry.normals.is_none());
        assert!(geometry.uvs.is_none());
        assert_eq!(geometry.position(1), [1.0, -0.5, 0.5]);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_box_quads_face_outward() {
        let geometry = box_geometry(&BoxOptions::default()).to_triangles();
        for tri in geometry.cell_indices() {
            let [p0, p1, p2] = [0, 1, 2].map(|k| Vec3::from(geometry.position(tri[k] as usize)));
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!((p1 - p0).cross(p2 - p0).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_plane_counts() {
        let geometry = plane(&PlaneOptions {
            nx: 4,
            ny: Some(3),
            ..Default::default()
        });
        assert_eq!(geometry.vertex_count(), 5 * 4);
        assert_eq!(geometry.cells.len(), 4 * 3 * 6);
        assert_eq!(IndexKind::for_vertex_count(geometry.vertex_count()), IndexKind::U8);

        let quads = plane(&PlaneOptions {
            nx: 4,
            quads: true,
            ..Default::default()
        });
        assert_eq!(quads.topology, Topology::Quads);
        assert_eq!(quads.cells.len(), 4 * 4 * 4);
    }

    #[test]
    fn test_plane_direction_normal() {
        let geometry = plane(&PlaneOptions {
            direction: Direction::NegativeY,
            ..Default::default()
        });
        for i in 0..geometry.vertex_count() {
            assert_eq!(geometry.normal(i), Some([0.0, -1.0, 0.0]));
            assert_eq!(geometry.position(i)[1], 0.0);
        }
    }

    #[test]
    fn test_cube_counts_and_extent() {
        let geometry = cube(&CubeOptions {
            sx: 2.0,
            nx: 2,
            ..Default::default()
        });
        assert_eq!(geometry.vertex_count(), 6 * 9);
        assert_eq!(geometry.cells.len(), 6 * 4 * 6);
        for i in 0..geometry.vertex_count() {
            let p = geometry.position(i);
            let max = p.iter().fold(0.0f32, |m, c| m.max(c.abs()));
            assert!((max - 1.0).abs() < 1e-6);
        }
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_quad() {
        let geometry = quad(&QuadOptions { scale: 2.0 });
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.position(2), [1.0, 1.0, 0.0]);
        assert!(geometry.validate().is_ok());
    }
}
