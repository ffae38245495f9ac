//! Planar patch builder
//!
//! Every rectilinear and rounded-rectilinear shape is assembled from flat
//! rectangular grids ("patches"). A shape computes its total vertex and index
//! counts up front, allocates [`GeometryBuffers`] once, then writes each patch
//! in turn through a shared [`BuildCursor`] so sub-patches land in disjoint
//! slots of the same buffers.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Geometry, Topology};

/// One of the six axis-aligned orientations a patch can face
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "x")]
    PositiveX,
    #[serde(rename = "-x")]
    NegativeX,
    #[serde(rename = "y")]
    PositiveY,
    #[serde(rename = "-y")]
    NegativeY,
    #[default]
    #[serde(rename = "z")]
    PositiveZ,
    #[serde(rename = "-z")]
    NegativeZ,
}

/// Axis assignment for a direction: which world axes the grid's `u`, `v` and
/// normal map onto, and the sign applied to each.
#[derive(Clone, Copy, Debug)]
struct Frame {
    u_axis: usize,
    v_axis: usize,
    w_axis: usize,
    u_sign: f32,
    v_sign: f32,
    w_sign: f32,
}

impl Direction {
    /// All six directions, in cube face order.
    pub const ALL: [Direction; 6] = [
        Direction::PositiveZ,
        Direction::NegativeZ,
        Direction::PositiveX,
        Direction::NegativeX,
        Direction::PositiveY,
        Direction::NegativeY,
    ];

    // u x v always equals the outward normal, so (i, j) order is CCW seen
    // from outside.
    fn frame(self) -> Frame {
        let (u_axis, v_axis, w_axis, u_sign, v_sign, w_sign) = match self {
            Direction::PositiveZ => (0, 1, 2, 1.0, 1.0, 1.0),
            Direction::NegativeZ => (0, 1, 2, -1.0, 1.0, -1.0),
            Direction::PositiveX => (2, 1, 0, -1.0, 1.0, 1.0),
            Direction::NegativeX => (2, 1, 0, 1.0, 1.0, -1.0),
            Direction::PositiveY => (0, 2, 1, 1.0, -1.0, 1.0),
            Direction::NegativeY => (0, 2, 1, 1.0, 1.0, -1.0),
        };
        Frame {
            u_axis,
            v_axis,
            w_axis,
            u_sign,
            v_sign,
            w_sign,
        }
    }

    /// Outward unit normal.
    pub fn normal(self) -> Vec3 {
        let frame = self.frame();
        let mut n = [0.0; 3];
        n[frame.w_axis] = frame.w_sign;
        Vec3::from_array(n)
    }

    /// Map face-local `(a, b, w)` coordinates (along the grid's `u`, `v` and
    /// normal) to world space.
    pub fn to_world(self, a: f32, b: f32, w: f32) -> Vec3 {
        let frame = self.frame();
        let mut p = [0.0; 3];
        p[frame.u_axis] = frame.u_sign * a;
        p[frame.v_axis] = frame.v_sign * b;
        p[frame.w_axis] = frame.w_sign * w;
        Vec3::from_array(p)
    }
}

/// Next free vertex and index slot in a set of [`GeometryBuffers`]
///
/// `cell` counts index entries, not cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildCursor {
    pub vertex: usize,
    pub cell: usize,
}

/// Pre-sized scratch buffers shared by consecutive patch writes
#[derive(Clone, Debug)]
pub struct GeometryBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub cells: Vec<u32>,
}

impl GeometryBuffers {
    /// Zeroed buffers for `vertex_count` vertices and `index_count` indices.
    pub fn new(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: vec![0.0; vertex_count * 3],
            normals: vec![0.0; vertex_count * 3],
            uvs: vec![0.0; vertex_count * 2],
            cells: vec![0; index_count],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.positions[i * 3..i * 3 + 3].copy_from_slice(&p.to_array());
    }

    pub fn set_normal(&mut self, i: usize, n: Vec3) {
        self.normals[i * 3..i * 3 + 3].copy_from_slice(&n.to_array());
    }

    /// Finish into a [`Geometry`] with normals and UVs.
    pub fn into_geometry(self, topology: Topology) -> Geometry {
        Geometry::new(
            self.positions,
            Some(self.normals),
            Some(self.uvs),
            self.cells,
            topology,
        )
    }
}

/// Description of one flat grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patch {
    /// Physical extent along the grid's `u` and `v` axes
    pub size: Vec2,
    /// Cells along `u` and `v` (`nu + 1` by `nv + 1` vertices)
    pub nu: u32,
    pub nv: u32,
    pub direction: Direction,
    /// Distance of the plane from `center` along the normal
    pub offset: f32,
    /// Emit quads instead of triangle pairs
    pub quads: bool,
    /// UV range covered by the grid: `uv = uv_offset + uv_scale * (i/nu, j/nv)`
    pub uv_scale: Vec2,
    pub uv_offset: Vec2,
    /// World-space center of the grid
    pub center: Vec3,
    /// Counter-clockwise winding seen from the normal side
    pub ccw: bool,
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            size: Vec2::ONE,
            nu: 1,
            nv: 1,
            direction: Direction::PositiveZ,
            offset: 0.0,
            quads: false,
            uv_scale: Vec2::ONE,
            uv_offset: Vec2::ZERO,
            center: Vec3::ZERO,
            ccw: true,
        }
    }
}

impl Patch {
    /// Vertices this patch writes.
    pub fn vertex_count(&self) -> usize {
        (self.nu as usize + 1) * (self.nv as usize + 1)
    }

    /// Index entries this patch writes.
    pub fn index_count(&self) -> usize {
        let per_cell = if self.quads { 4 } else { 6 };
        self.nu as usize * self.nv as usize * per_cell
    }
}

/// Write `patch` into `buffers` at `cursor` and advance the cursor.
///
/// The buffers must already be sized for every patch of the shape; writing
/// past them is a caller bug.
pub fn compute_plane(buffers: &mut GeometryBuffers, cursor: &mut BuildCursor, patch: &Patch) {
    debug_assert!(
        cursor.vertex + patch.vertex_count() <= buffers.vertex_count(),
        "patch vertices overflow pre-sized buffers"
    );
    debug_assert!(
        cursor.cell + patch.index_count() <= buffers.cells.len(),
        "patch cells overflow pre-sized buffers"
    );

    let frame = patch.direction.frame();
    let normal = patch.direction.normal();
    let (nu, nv) = (patch.nu, patch.nv);
    let row = nu + 1;
    let base = cursor.vertex as u32;

    let mut vertex = cursor.vertex;
    for j in 0..=nv {
        let t = j as f32 / nv as f32;
        for i in 0..=nu {
            let s = i as f32 / nu as f32;

            let mut p = patch.center.to_array();
            p[frame.u_axis] += frame.u_sign * (s - 0.5) * patch.size.x;
            p[frame.v_axis] += frame.v_sign * (t - 0.5) * patch.size.y;
            p[frame.w_axis] += frame.w_sign * patch.offset;

            buffers.set_position(vertex, Vec3::from_array(p));
            buffers.set_normal(vertex, normal);
            buffers.uvs[vertex * 2] = patch.uv_offset.x + patch.uv_scale.x * s;
            buffers.uvs[vertex * 2 + 1] = patch.uv_offset.y + patch.uv_scale.y * t;

            vertex += 1;
        }
    }

    let mut cell = cursor.cell;
    for j in 0..nv {
        for i in 0..nu {
            let a = base + j * row + i;
            let b = a + 1;
            let c = a + row + 1;
            let d = a + row;

            // Flipping swaps the b/d corners
            let (b, d) = if patch.ccw { (b, d) } else { (d, b) };

            if patch.quads {
                buffers.cells[cell..cell + 4].copy_from_slice(&[a, b, c, d]);
                cell += 4;
            } else {
                buffers.cells[cell..cell + 6].copy_from_slice(&[a, b, c, a, c, d]);
                cell += 6;
            }
        }
    }

    cursor.vertex = vertex;
    cursor.cell = cell;
}
