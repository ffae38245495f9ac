//! Latitude/longitude sphere and ellipsoid

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{Geometry, Topology};
use crate::math::{normalize_or, positive, segments, sweep, PI, TAU};

/// Options for [`ellipsoid`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipsoidOptions {
    /// Uniform scale applied on top of the semi-axes
    pub radius: f32,
    /// Semi-axis along X
    pub rx: f32,
    /// Semi-axis along Y
    pub ry: f32,
    /// Semi-axis along Z
    pub rz: f32,
    /// Longitudinal divisions
    pub nx: u32,
    /// Latitudinal divisions
    pub ny: u32,
    /// Polar span, measured down from +Y
    pub theta: f32,
    pub theta_offset: f32,
    /// Azimuthal span
    pub phi: f32,
    pub phi_offset: f32,
}

impl Default for EllipsoidOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            rx: 0.5,
            ry: 0.25,
            rz: 0.25,
            nx: 32,
            ny: 16,
            theta: PI,
            theta_offset: 0.0,
            phi: TAU,
            phi_offset: 0.0,
        }
    }
}

/// Generate a UV ellipsoid with gradient normals
///
/// # Returns
/// `(ny + 1) × (nx + 1)` vertices and `ny × nx × 6` indices. Pole rows keep
/// their collapsed triangles so the index count is the same for every sweep.
///
/// # UV Mapping
/// - U: azimuth, 0→1 across `phi`
/// - V: 1 at the top row, 0 at the bottom
pub fn ellipsoid(options: &EllipsoidOptions) -> Geometry {
    const CONTEXT: &str = "ellipsoid";

    let radius = positive(CONTEXT, "radius", options.radius);
    let axes = Vec3::new(
        positive(CONTEXT, "rx", options.rx),
        positive(CONTEXT, "ry", options.ry),
        positive(CONTEXT, "rz", options.rz),
    ) * radius;
    let nx = segments(CONTEXT, "nx", options.nx, 1);
    let ny = segments(CONTEXT, "ny", options.ny, 1);
    let phi = sweep(CONTEXT, "phi", options.phi);
    let theta = if options.theta > 0.0 && options.theta <= PI + 1e-6 {
        options.theta
    } else {
        warn!("{CONTEXT}: theta must be in (0, PI], using a half turn");
        PI
    };

    let vertex_count = (nx as usize + 1) * (ny as usize + 1);
    let mut positions = Vec::with_capacity(vertex_count * 3);
    let mut normals = Vec::with_capacity(vertex_count * 3);
    let mut uvs = Vec::with_capacity(vertex_count * 2);

    // Gradient of x²/a² + y²/b² + z²/c²
    let inverse_square = Vec3::ONE / (axes * axes);

    for y in 0..=ny {
        let v = y as f32 / ny as f32;
        let (sin_t, cos_t) = (options.theta_offset + v * theta).sin_cos();

        for x in 0..=nx {
            let u = x as f32 / nx as f32;
            let (sin_p, cos_p) = (options.phi_offset + u * phi).sin_cos();

            let direction = Vec3::new(-cos_p * sin_t, cos_t, sin_p * sin_t);
            let position = direction * axes;
            let normal = normalize_or(position * inverse_square, direction);

            positions.extend_from_slice(&position.to_array());
            normals.extend_from_slice(&normal.to_array());
            uvs.extend_from_slice(&[u, 1.0 - v]);
        }
    }

    let row = nx + 1;
    let mut cells = Vec::with_capacity(nx as usize * ny as usize * 6);
    for y in 0..ny {
        for x in 0..nx {
            let i0 = y * row + x;
            let i1 = i0 + 1;
            let i2 = i0 + row;
            let i3 = i2 + 1;

            cells.extend_from_slice(&[i1, i0, i3, i0, i2, i3]);
        }
    }

    debug!("{CONTEXT}: {vertex_count} vertices, {} triangles", cells.len() / 3);

    Geometry::new(
        positions,
        Some(normals),
        Some(uvs),
        cells,
        Topology::Triangles,
    )
}

/// Options for [`sphere`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereOptions {
    pub radius: f32,
    pub nx: u32,
    pub ny: u32,
    pub theta: f32,
    pub theta_offset: f32,
    pub phi: f32,
    pub phi_offset: f32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            nx: 32,
            ny: 16,
            theta: PI,
            theta_offset: 0.0,
            phi: TAU,
            phi_offset: 0.0,
        }
    }
}

/// Generate a UV sphere: an [`ellipsoid`] with unit semi-axes
pub fn sphere(options: &SphereOptions) -> Geometry {
    ellipsoid(&EllipsoidOptions {
        radius: options.radius,
        rx: 1.0,
        ry: 1.0,
        rz: 1.0,
        nx: options.nx,
        ny: options.ny,
        theta: options.theta,
        theta_offset: options.theta_offset,
        phi: options.phi,
        phi_offset: options.phi_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_scenario_counts() {
        let geometry = sphere(&SphereOptions {
            nx: 4,
            ny: 2,
            ..Default::default()
        });
        assert_eq!(geometry.vertex_count(), 15);
        assert_eq!(geometry.cells.len(), 48);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let geometry = sphere(&SphereOptions::default());
        for i in 0..geometry.vertex_count() {
            let p = Vec3::from(geometry.position(i));
            assert!((p.length() - 0.5).abs() < 1e-5);

            // Sphere normals are radial
            let n = Vec3::from(geometry.normal(i).unwrap_or_default());
            assert!(n.dot(p.normalize()) > 0.999);
        }
    }

    #[test]
    fn test_ellipsoid_extent_and_normals() {
        let geometry = ellipsoid(&EllipsoidOptions::default());
        let mut max = Vec3::ZERO;
        for i in 0..geometry.vertex_count() {
            max = max.max(Vec3::from(geometry.position(i)).abs());
            let n = Vec3::from(geometry.normal(i).unwrap_or_default());
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
        assert!((max - Vec3::new(0.5, 0.25, 0.25)).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_ellipsoid_faces_outward() {
        let geometry = ellipsoid(&EllipsoidOptions {
            nx: 8,
            ny: 6,
            ..Default::default()
        });
        for tri in geometry.cell_indices() {
            let [p0, p1, p2] = [0, 1, 2].map(|k| Vec3::from(geometry.position(tri[k] as usize)));
            let cross = (p1 - p0).cross(p2 - p0);
            // Collapsed pole triangles have no facing
            if cross.length() < 1e-6 {
                continue;
            }
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!(cross.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_uv_orientation() {
        let geometry = sphere(&SphereOptions {
            nx: 4,
            ny: 2,
            ..Default::default()
        });
        assert_eq!(geometry.uv(0), Some([0.0, 1.0]));
        assert_eq!(geometry.uv(14), Some([1.0, 0.0]));
        assert!(geometry.position(0)[1] > 0.49);
    }

    #[test]
    fn test_hemisphere() {
        let geometry = sphere(&SphereOptions {
            theta: PI / 2.0,
            ..Default::default()
        });
        for i in 0..geometry.vertex_count() {
            assert!(geometry.position(i)[1] >= -1e-6);
        }
    }
}
