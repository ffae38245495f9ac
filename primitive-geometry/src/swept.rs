//! Swept solids (cylinder, cone, capsule, torus)
//!
//! Cylinder, cone and capsule are stacks of rings around +Y; consecutive
//! rings are stitched into triangle pairs and flat caps are nested ring fans
//! appended after the body. The torus sweeps a tube circle around the major
//! circle.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{Geometry, Topology};
use crate::math::{lerp, non_negative, normalize_or, positive, segments, sweep, HALF_PI, MIN_EXTENT, TAU};

/// Growable vertex/index sink shared by the swept generators
struct SweepBuilder {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    cells: Vec<u32>,
}

impl SweepBuilder {
    fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            uvs: Vec::with_capacity(vertices * 2),
            cells: Vec::with_capacity(triangles * 3),
        }
    }

    fn vertex_count(&self) -> u32 {
        (self.positions.len() / 3) as u32
    }

    fn add_vertex(&mut self, position: Vec3, uv: Vec2, normal: Vec3) -> u32 {
        let index = self.vertex_count();
        self.positions.extend_from_slice(&position.to_array());
        self.normals.extend_from_slice(&normal.to_array());
        self.uvs.extend_from_slice(&uv.to_array());
        index
    }

    fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.cells.extend_from_slice(&[a, b, c]);
    }

    fn into_geometry(self, context: &str) -> Geometry {
        debug!(
            "{context}: {} vertices, {} triangles",
            self.positions.len() / 3,
            self.cells.len() / 3
        );
        Geometry::new(
            self.positions,
            Some(self.normals),
            Some(self.uvs),
            self.cells,
            Topology::Triangles,
        )
    }
}

/// One ring of a stack around +Y
#[derive(Clone, Copy, Debug)]
struct Ring {
    y: f32,
    radius: f32,
    /// Unnormalized normal as (radial, vertical) components
    normal: Vec2,
    v: f32,
}

/// Emit `nx + 1` vertices per ring over `phi` and stitch consecutive rings.
fn stack_rings(mesh: &mut SweepBuilder, rings: &[Ring], nx: u32, phi: f32) {
    let start = mesh.vertex_count();
    for ring in rings {
        for i in 0..=nx {
            let u = i as f32 / nx as f32;
            let (sin, cos) = (u * phi).sin_cos();
            let radial = Vec3::new(sin, 0.0, cos);

            let position = radial * ring.radius + Vec3::Y * ring.y;
            let normal = normalize_or(radial * ring.normal.x + Vec3::Y * ring.normal.y, Vec3::Y);
            mesh.add_vertex(position, Vec2::new(u, ring.v), normal);
        }
    }

    let row = nx + 1;
    for j in 0..rings.len().saturating_sub(1) as u32 {
        for i in 0..nx {
            let i0 = start + j * row + i;
            let i1 = i0 + 1;
            let i2 = i0 + row;
            let i3 = i2 + 1;

            mesh.add_triangle(i0, i1, i3);
            mesh.add_triangle(i0, i3, i2);
        }
    }
}

/// Flat disc at height `y`: a center vertex and `cap_segments` rings.
/// Faces +Y when `up`, -Y otherwise.
fn add_cap(mesh: &mut SweepBuilder, y: f32, radius: f32, nx: u32, cap_segments: u32, phi: f32, up: bool) {
    let normal = if up { Vec3::Y } else { Vec3::NEG_Y };
    let center = mesh.add_vertex(Vec3::new(0.0, y, 0.0), Vec2::splat(0.5), normal);

    let first = mesh.vertex_count();
    for k in 1..=cap_segments {
        let ratio = k as f32 / cap_segments as f32;
        for i in 0..=nx {
            let (sin, cos) = (i as f32 / nx as f32 * phi).sin_cos();
            let position = Vec3::new(sin * radius * ratio, y, cos * radius * ratio);
            let uv = Vec2::new(0.5 + 0.5 * ratio * sin, 0.5 + 0.5 * ratio * cos);
            mesh.add_vertex(position, uv, normal);
        }
    }

    for i in 0..nx {
        let a = first + i;
        if up {
            mesh.add_triangle(center, a, a + 1);
        } else {
            mesh.add_triangle(center, a + 1, a);
        }
    }

    let row = nx + 1;
    for k in 0..cap_segments - 1 {
        for i in 0..nx {
            let a = first + k * row + i;
            let b = a + row;
            if up {
                mesh.add_triangle(a, b, b + 1);
                mesh.add_triangle(a, b + 1, a + 1);
            } else {
                mesh.add_triangle(a, b + 1, b);
                mesh.add_triangle(a, a + 1, b + 1);
            }
        }
    }
}

/// Options for [`cylinder`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderOptions {
    pub height: f32,
    /// Base radius
    pub radius: f32,
    /// Top radius (defaults to `radius`)
    pub radius_apex: Option<f32>,
    /// Divisions around the axis
    pub nx: u32,
    /// Divisions along the axis
    pub ny: u32,
    /// Rings per cap
    pub cap_segments: u32,
    pub cap_base: bool,
    pub cap_apex: bool,
    /// Angular span around the axis
    pub phi: f32,
}

impl Default for CylinderOptions {
    fn default() -> Self {
        Self {
            height: 1.0,
            radius: 0.25,
            radius_apex: None,
            nx: 16,
            ny: 1,
            cap_segments: 1,
            cap_base: true,
            cap_apex: true,
            phi: TAU,
        }
    }
}

/// Generate a capped cylinder or truncated cone centered on the origin
///
/// # Returns
/// `(ny + 1) × (nx + 1)` body vertices with slant normals, then for each
/// enabled cap with a nonzero radius `1 + cap_segments × (nx + 1)` vertices.
///
/// # UV Mapping
/// - Body: U wraps 0→1 around the axis, V maps 0→1 from base to top
/// - Caps: radial around (0.5, 0.5)
pub fn cylinder(options: &CylinderOptions) -> Geometry {
    const CONTEXT: &str = "cylinder";

    let height = positive(CONTEXT, "height", options.height);
    let mut radius = non_negative(CONTEXT, "radius", options.radius);
    let radius_apex = non_negative(CONTEXT, "radius_apex", options.radius_apex.unwrap_or(radius));
    if radius == 0.0 && radius_apex == 0.0 {
        warn!("{CONTEXT}: radius and radius_apex are both 0.0, clamping radius to {MIN_EXTENT}");
        radius = MIN_EXTENT;
    }
    let nx = segments(CONTEXT, "nx", options.nx, 3);
    let ny = segments(CONTEXT, "ny", options.ny, 1);
    let cap_segments = segments(CONTEXT, "cap_segments", options.cap_segments, 1);
    let phi = sweep(CONTEXT, "phi", options.phi);

    let half_height = height * 0.5;
    let cap_base = options.cap_base && radius > 0.0;
    let cap_apex = options.cap_apex && radius_apex > 0.0;

    let row = nx as usize + 1;
    let caps = cap_base as usize + cap_apex as usize;
    let mut mesh = SweepBuilder::with_capacity(
        (ny as usize + 1) * row + caps * (1 + cap_segments as usize * row),
        nx as usize * (2 * ny as usize + caps * (2 * cap_segments as usize - 1)),
    );

    // Slant normal of a tapered side: the radius shrinks by (radius - apex)
    // over the height
    let slope = (radius - radius_apex) / height;
    let rings: Vec<Ring> = (0..=ny)
        .map(|j| {
            let v = j as f32 / ny as f32;
            Ring {
                y: -half_height + v * height,
                radius: lerp(radius, radius_apex, v),
                normal: Vec2::new(1.0, slope),
                v,
            }
        })
        .collect();
    stack_rings(&mut mesh, &rings, nx, phi);

    if cap_apex {
        add_cap(&mut mesh, half_height, radius_apex, nx, cap_segments, phi, true);
    }
    if cap_base {
        add_cap(&mut mesh, -half_height, radius, nx, cap_segments, phi, false);
    }

    mesh.into_geometry(CONTEXT)
}

/// Options for [`cone`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConeOptions {
    pub height: f32,
    pub radius: f32,
    pub nx: u32,
    pub ny: u32,
    pub cap_segments: u32,
    pub cap_base: bool,
    pub phi: f32,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            height: 1.0,
            radius: 0.25,
            nx: 16,
            ny: 1,
            cap_segments: 1,
            cap_base: true,
            phi: TAU,
        }
    }
}

/// Generate a cone: a [`cylinder`] whose top radius is zero
pub fn cone(options: &ConeOptions) -> Geometry {
    cylinder(&CylinderOptions {
        height: options.height,
        radius: options.radius,
        radius_apex: Some(0.0),
        nx: options.nx,
        ny: options.ny,
        cap_segments: options.cap_segments,
        cap_base: options.cap_base,
        cap_apex: false,
        phi: options.phi,
    })
}

/// Options for [`capsule`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleOptions {
    /// Length of the straight section
    pub height: f32,
    pub radius: f32,
    pub nx: u32,
    /// Divisions of the straight section
    pub ny: u32,
    /// Rings per hemisphere
    pub round_segments: u32,
    pub phi: f32,
}

impl Default for CapsuleOptions {
    fn default() -> Self {
        Self {
            height: 0.5,
            radius: 0.25,
            nx: 16,
            ny: 1,
            round_segments: 16,
            phi: TAU,
        }
    }
}

/// Generate a capsule: a cylinder closed by two hemispheres
///
/// One continuous stack of `2 * round_segments + ny + 1` rings from the
/// south pole to the north pole. V is proportional to height over the whole
/// capsule.
pub fn capsule(options: &CapsuleOptions) -> Geometry {
    const CONTEXT: &str = "capsule";

    let height = non_negative(CONTEXT, "height", options.height);
    let radius = positive(CONTEXT, "radius", options.radius);
    let nx = segments(CONTEXT, "nx", options.nx, 3);
    let ny = segments(CONTEXT, "ny", options.ny, 1);
    let round_segments = segments(CONTEXT, "round_segments", options.round_segments, 1);
    let phi = sweep(CONTEXT, "phi", options.phi);

    let half_height = height * 0.5;
    let total = height + 2.0 * radius;

    let mut rings = Vec::with_capacity((2 * round_segments + ny + 1) as usize);
    let mut push = |y: f32, ring_radius: f32, normal: Vec2| {
        rings.push(Ring {
            y,
            radius: ring_radius,
            normal,
            v: (y + half_height + radius) / total,
        });
    };

    for k in 0..=round_segments {
        let angle = -HALF_PI + k as f32 / round_segments as f32 * HALF_PI;
        let (sin, cos) = angle.sin_cos();
        push(-half_height + radius * sin, radius * cos.max(0.0), Vec2::new(cos, sin));
    }
    for j in 1..ny {
        push(-half_height + j as f32 / ny as f32 * height, radius, Vec2::X);
    }
    for k in 0..=round_segments {
        let angle = k as f32 / round_segments as f32 * HALF_PI;
        let (sin, cos) = angle.sin_cos();
        push(half_height + radius * sin, radius * cos.max(0.0), Vec2::new(cos, sin));
    }

    let mut mesh = SweepBuilder::with_capacity(
        rings.len() * (nx as usize + 1),
        (rings.len() - 1) * nx as usize * 2,
    );
    stack_rings(&mut mesh, &rings, nx, phi);
    mesh.into_geometry(CONTEXT)
}

/// Options for [`torus`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorusOptions {
    /// Distance from the center to the middle of the tube
    pub radius: f32,
    /// Tube radius
    pub minor_radius: f32,
    /// Divisions around the major circle
    pub segments: u32,
    /// Divisions around the tube
    pub minor_segments: u32,
    /// Major sweep
    pub theta: f32,
    pub theta_offset: f32,
    /// Tube sweep
    pub phi: f32,
    pub phi_offset: f32,
}

impl Default for TorusOptions {
    fn default() -> Self {
        Self {
            radius: 0.4,
            minor_radius: 0.1,
            segments: 64,
            minor_segments: 32,
            theta: TAU,
            theta_offset: 0.0,
            phi: TAU,
            phi_offset: 0.0,
        }
    }
}

/// Generate a torus lying in the XZ plane
///
/// `(segments + 1) × (minor_segments + 1)` vertices. U follows the major
/// circle, V the tube.
pub fn torus(options: &TorusOptions) -> Geometry {
    const CONTEXT: &str = "torus";

    let major_radius = positive(CONTEXT, "radius", options.radius);
    let minor_radius = positive(CONTEXT, "minor_radius", options.minor_radius);
    let major_segments = segments(CONTEXT, "segments", options.segments, 3);
    let minor_segments = segments(CONTEXT, "minor_segments", options.minor_segments, 3);
    let theta_sweep = sweep(CONTEXT, "theta", options.theta);
    let phi_sweep = sweep(CONTEXT, "phi", options.phi);

    let verts_per_ring = minor_segments + 1;
    let mut mesh = SweepBuilder::with_capacity(
        (major_segments as usize + 1) * verts_per_ring as usize,
        major_segments as usize * minor_segments as usize * 2,
    );

    for i in 0..=major_segments {
        let u = i as f32 / major_segments as f32;
        let (sin_theta, cos_theta) = (options.theta_offset + u * theta_sweep).sin_cos();
        let tube_center = Vec3::new(major_radius * cos_theta, 0.0, major_radius * sin_theta);

        for j in 0..=minor_segments {
            let v = j as f32 / minor_segments as f32;
            let (sin_phi, cos_phi) = (options.phi_offset + v * phi_sweep).sin_cos();

            let normal = Vec3::new(cos_phi * cos_theta, sin_phi, cos_phi * sin_theta);
            let position = tube_center + normal * minor_radius;
            mesh.add_vertex(position, Vec2::new(u, v), normal);
        }
    }

    for i in 0..major_segments {
        for j in 0..minor_segments {
            let i0 = i * verts_per_ring + j;
            let i1 = i0 + 1;
            let i2 = i0 + verts_per_ring;
            let i3 = i2 + 1;

            mesh.add_triangle(i0, i1, i3);
            mesh.add_triangle(i0, i3, i2);
        }
    }

    mesh.into_geometry(CONTEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every non-degenerate triangle must wind towards its vertex normals.
    fn assert_winding_follows_normals(geometry: &Geometry) {
        for tri in geometry.cell_indices() {
            let [p0, p1, p2] = [0, 1, 2].map(|k| Vec3::from(geometry.position(tri[k] as usize)));
            let cross = (p1 - p0).cross(p2 - p0);
            if cross.length() < 1e-7 {
                continue;
            }
            let normal: Vec3 = tri
                .iter()
                .map(|&i| Vec3::from(geometry.normal(i as usize).unwrap_or_default()))
                .sum();
            assert!(cross.dot(normal) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn test_cylinder_counts() {
        let geometry = cylinder(&CylinderOptions::default());
        assert_eq!(geometry.vertex_count(), 2 * 17 + 2 * (1 + 17));
        assert_eq!(geometry.cell_count(), 32 + 2 * 16);
        assert!(geometry.validate().is_ok());
        assert_winding_follows_normals(&geometry);
    }

    #[test]
    fn test_cylinder_cap_rings() {
        let geometry = cylinder(&CylinderOptions {
            nx: 8,
            ny: 3,
            cap_segments: 3,
            ..Default::default()
        });
        assert_eq!(geometry.vertex_count(), 4 * 9 + 2 * (1 + 3 * 9));
        assert_eq!(geometry.cell_count(), 8 * 3 * 2 + 2 * 8 * 5);
        assert!(geometry.validate().is_ok());
        assert_winding_follows_normals(&geometry);
    }

    #[test]
    fn test_cylinder_body_on_radius() {
        let geometry = cylinder(&CylinderOptions::default());
        for i in 0..34 {
            let p = geometry.position(i);
            assert!((Vec2::new(p[0], p[2]).length() - 0.25).abs() < 1e-6);
            assert!((p[1].abs() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cone() {
        let geometry = cone(&ConeOptions::default());
        // Body plus base cap only
        assert_eq!(geometry.vertex_count(), 2 * 17 + 1 + 17);
        assert_winding_follows_normals(&geometry);

        // Apex ring collapses to the tip
        for i in 17..34 {
            let p = geometry.position(i);
            assert!(p[0].abs() < 1e-6 && p[2].abs() < 1e-6 && (p[1] - 0.5).abs() < 1e-6);
        }

        // Slant normals lean up
        let n = Vec3::from(geometry.normal(0).unwrap_or_default());
        assert!((n.y - 0.25 / (1.0f32 + 0.0625).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_zero_radius_end_has_no_cap() {
        let geometry = cylinder(&CylinderOptions {
            radius: 0.0,
            radius_apex: Some(0.25),
            ..Default::default()
        });
        assert_eq!(geometry.vertex_count(), 2 * 17 + 1 + 17);
    }

    #[test]
    fn test_capsule() {
        let geometry = capsule(&CapsuleOptions::default());
        assert_eq!(geometry.vertex_count(), (2 * 16 + 1 + 1) * 17);
        assert!(geometry.validate().is_ok());
        assert_winding_follows_normals(&geometry);

        let (mut lo, mut hi) = (f32::MAX, f32::MIN);
        for i in 0..geometry.vertex_count() {
            let y = geometry.position(i)[1];
            lo = lo.min(y);
            hi = hi.max(y);
            let [_, v] = geometry.uv(i).unwrap_or_default();
            assert!((-1e-6..=1.0 + 1e-6).contains(&v));
        }
        assert!((lo + 0.5).abs() < 1e-6 && (hi - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_capsule_surface_distance() {
        let geometry = capsule(&CapsuleOptions {
            ny: 3,
            ..Default::default()
        });
        for i in 0..geometry.vertex_count() {
            let p = Vec3::from(geometry.position(i));
            let axis = Vec3::new(0.0, p.y.clamp(-0.25, 0.25), 0.0);
            assert!(((p - axis).length() - 0.25).abs() < 1e-5);
        }
    }

    #[test]
    fn test_torus() {
        let geometry = torus(&TorusOptions::default());
        assert_eq!(geometry.vertex_count(), 65 * 33);
        assert_eq!(geometry.cells.len(), 64 * 32 * 6);
        assert!(geometry.validate().is_ok());
        assert_winding_follows_normals(&geometry);

        for i in 0..geometry.vertex_count() {
            let p = Vec3::from(geometry.position(i));
            let ring = Vec3::new(p.x, 0.0, p.z).normalize() * 0.4;
            assert!(((p - ring).length() - 0.1).abs() < 1e-5);
        }
    }

    #[test]
    fn test_partial_sweeps() {
        let geometry = torus(&TorusOptions {
            theta: TAU / 4.0,
            segments: 4,
            minor_segments: 4,
            ..Default::default()
        });
        for i in 0..geometry.vertex_count() {
            let p = geometry.position(i);
            assert!(p[0] >= -1e-6 && p[2] >= -1e-6);
        }

        let half = cylinder(&CylinderOptions {
            phi: TAU / 2.0,
            ..Default::default()
        });
        for i in 0..half.vertex_count() {
            assert!(half.position(i)[0] >= -1e-6);
        }
    }
}
