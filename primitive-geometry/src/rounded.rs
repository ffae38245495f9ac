//! Rounded rectilinear primitives: rounded rectangle, stadium, rounded cube
//!
//! Each face is laid out as a nine-patch (interior, four edge bands, four
//! corners) written through the patch builder into one buffer set. Every
//! patch receives the UV sub-rectangle it covers so the face atlas stays
//! continuous. Once assembled, vertices outside the straight-sided interior
//! box are projected back onto the rounding radius.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{Geometry, Topology};
use crate::math::{normalize_or, non_negative, positive, segments, EPSILON};
use crate::patch::{compute_plane, BuildCursor, Direction, GeometryBuffers, Patch};
use crate::rectilinear::face_layout;

/// One rounded face: a `size` rectangle facing `direction`, `depth` away from
/// the origin, with `n` interior subdivisions and bands `radius` wide split
/// into `round_segments`.
#[derive(Clone, Copy, Debug)]
struct RoundedFace {
    direction: Direction,
    size: Vec2,
    depth: f32,
    n: [u32; 2],
    radius: f32,
    round_segments: u32,
}

impl RoundedFace {
    /// The up-to-nine patches of this face. Spans that collapse to zero
    /// width (no rounding, or a stadium's straight section) are skipped.
    fn patches(&self) -> Vec<Patch> {
        let columns = spans(self.size.x, self.radius, self.n[0], self.round_segments);
        let rows = spans(self.size.y, self.radius, self.n[1], self.round_segments);

        let mut patches = Vec::with_capacity(9);
        for row in rows.iter().flatten() {
            for column in columns.iter().flatten() {
                let uv_offset = Vec2::new(
                    (column.center - column.width * 0.5) / self.size.x + 0.5,
                    (row.center - row.width * 0.5) / self.size.y + 0.5,
                );
                patches.push(Patch {
                    size: Vec2::new(column.width, row.width),
                    nu: column.segments,
                    nv: row.segments,
                    direction: self.direction,
                    offset: self.depth,
                    uv_scale: Vec2::new(column.width / self.size.x, row.width / self.size.y),
                    uv_offset,
                    center: self.direction.to_world(column.center, row.center, 0.0),
                    ..Default::default()
                });
            }
        }
        patches
    }
}

/// One column or row of a nine-patch, in face-local coordinates
#[derive(Clone, Copy, Debug)]
struct Span {
    center: f32,
    width: f32,
    segments: u32,
}

/// Leading band, straight middle and trailing band across `extent`.
fn spans(extent: f32, radius: f32, n: u32, round_segments: u32) -> [Option<Span>; 3] {
    let half = extent * 0.5;
    let middle = extent - 2.0 * radius;

    let band = |center: f32| {
        (radius > EPSILON).then_some(Span {
            center,
            width: radius,
            segments: round_segments,
        })
    };

    [
        band(-half + radius * 0.5),
        (middle > EPSILON).then_some(Span {
            center: 0.0,
            width: middle,
            segments: n,
        }),
        band(half - radius * 0.5),
    ]
}

/// Write every patch of every face, calling `project` on the vertex range
/// of each face once it is written.
fn build_faces(
    faces: &[RoundedFace],
    mut project: impl FnMut(&mut GeometryBuffers, std::ops::Range<usize>, &RoundedFace),
) -> GeometryBuffers {
    let patches: Vec<Vec<Patch>> = faces.iter().map(RoundedFace::patches).collect();
    let vertex_count = patches.iter().flatten().map(Patch::vertex_count).sum();
    let index_count = patches.iter().flatten().map(Patch::index_count).sum();

    let mut buffers = GeometryBuffers::new(vertex_count, index_count);
    let mut cursor = BuildCursor::default();
    for (face, face_patches) in faces.iter().zip(&patches) {
        let start = cursor.vertex;
        for patch in face_patches {
            compute_plane(&mut buffers, &mut cursor, patch);
        }
        project(&mut buffers, start..cursor.vertex, face);
    }

    debug_assert_eq!(cursor.vertex, vertex_count);
    debug_assert_eq!(cursor.cell, index_count);
    buffers
}

/// Clamp a radius so two bands fit inside the smallest extent.
fn clamp_radius(context: &str, radius: f32, min_extent: f32) -> f32 {
    let radius = non_negative(context, "radius", radius);
    let max = min_extent * 0.5;
    if radius > max {
        warn!("{context}: radius {radius} exceeds half the smallest extent, clamping to {max}");
        max
    } else {
        radius
    }
}

/// Options for [`rounded_rectangle`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundedRectangleOptions {
    pub sx: f32,
    /// Defaults to `sx`
    pub sy: Option<f32>,
    pub nx: u32,
    /// Defaults to `nx`
    pub ny: Option<u32>,
    /// Corner radius
    pub radius: f32,
    /// Subdivisions across each rounded band
    pub round_segments: u32,
}

impl Default for RoundedRectangleOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: None,
            nx: 1,
            ny: None,
            radius: 0.25,
            round_segments: 8,
        }
    }
}

/// Generate a rectangle with rounded corners in the XY plane facing +Z
pub fn rounded_rectangle(options: &RoundedRectangleOptions) -> Geometry {
    const CONTEXT: &str = "rounded_rectangle";

    let sx = positive(CONTEXT, "sx", options.sx);
    let sy = positive(CONTEXT, "sy", options.sy.unwrap_or(sx));
    let nx = segments(CONTEXT, "nx", options.nx, 1);
    let ny = segments(CONTEXT, "ny", options.ny.unwrap_or(nx), 1);
    let radius = clamp_radius(CONTEXT, options.radius, sx.min(sy));
    let round_segments = segments(CONTEXT, "round_segments", options.round_segments, 1);

    let face = RoundedFace {
        direction: Direction::PositiveZ,
        size: Vec2::new(sx, sy),
        depth: 0.0,
        n: [nx, ny],
        radius,
        round_segments,
    };
    let inner = Vec2::new(sx * 0.5 - radius, sy * 0.5 - radius);

    // Corner squares are pulled radially onto the quarter disc: the outer
    // rows land on the arc, the straight edges they share with the bands
    // stay put.
    let buffers = build_faces(&[face], |buffers, range, _| {
        for i in range {
            let p = buffers.position(i);
            let c = p.truncate().clamp(-inner, inner);
            let d = p.truncate() - c;
            let length = d.length();
            if length > EPSILON {
                let q = c + d / length * d.abs().max_element().min(radius);
                buffers.set_position(i, q.extend(p.z));
            }
        }
    });

    debug!(
        "rounded_rectangle: {} vertices, {} indices",
        buffers.vertex_count(),
        buffers.cells.len()
    );
    buffers.into_geometry(Topology::Triangles)
}

/// Options for [`stadium`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StadiumOptions {
    pub sx: f32,
    pub sy: f32,
    pub nx: u32,
    pub ny: u32,
    pub round_segments: u32,
}

impl Default for StadiumOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: 0.5,
            nx: 1,
            ny: 1,
            round_segments: 8,
        }
    }
}

/// Generate a stadium: a rounded rectangle whose radius is half its
/// smaller side
pub fn stadium(options: &StadiumOptions) -> Geometry {
    let sx = positive("stadium", "sx", options.sx);
    let sy = positive("stadium", "sy", options.sy);
    rounded_rectangle(&RoundedRectangleOptions {
        sx,
        sy: Some(sy),
        nx: options.nx,
        ny: Some(options.ny),
        radius: sx.min(sy) * 0.5,
        round_segments: options.round_segments,
    })
}

/// Options for [`rounded_cube`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundedCubeOptions {
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
    /// Edge and corner radius
    pub radius: f32,
    /// Subdivisions across each rounded band
    pub round_segments: u32,
}

impl Default for RoundedCubeOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: None,
            sz: None,
            nx: 1,
            ny: None,
            nz: None,
            radius: 0.25,
            round_segments: 8,
        }
    }
}

/// Generate a cube with rounded edges and corners
///
/// Each of the six faces is a nine-patch. Vertices are clamped axis-wise to
/// the interior box, then pushed out along the clamp displacement to the
/// radius; that displacement is also their normal, so edges become quarter
/// cylinders and corners sphere octants.
pub fn rounded_cube(options: &RoundedCubeOptions) -> Geometry {
    const CONTEXT: &str = "rounded_cube";

    let sx = positive(CONTEXT, "sx", options.sx);
    let size = Vec3::new(
        sx,
        positive(CONTEXT, "sy", options.sy.unwrap_or(sx)),
        positive(CONTEXT, "sz", options.sz.unwrap_or(sx)),
    );
    let nx = segments(CONTEXT, "nx", options.nx, 1);
    let n = [
        nx,
        segments(CONTEXT, "ny", options.ny.unwrap_or(nx), 1),
        segments(CONTEXT, "nz", options.nz.unwrap_or(nx), 1),
    ];
    let radius = clamp_radius(CONTEXT, options.radius, size.min_element());
    let round_segments = segments(CONTEXT, "round_segments", options.round_segments, 1);

    let faces = Direction::ALL.map(|direction| {
        let (face, [nu, nv], depth) = face_layout(direction, size, n);
        RoundedFace {
            direction,
            size: face,
            depth,
            n: [nu, nv],
            radius,
            round_segments,
        }
    });
    let inner = size * 0.5 - Vec3::splat(radius);

    let buffers = build_faces(&faces, |buffers, range, face| {
        let fallback = face.direction.normal();
        for i in range {
            let p = buffers.position(i);
            let c = p.clamp(-inner, inner);
            let normal = normalize_or(p - c, fallback);
            buffers.set_position(i, c + normal * radius);
            buffers.set_normal(i, normal);
        }
    });

    debug!(
        "rounded_cube: {} vertices, {} indices",
        buffers.vertex_count(),
        buffers.cells.len()
    );
    buffers.into_geometry(Topology::Triangles)
}
