//! Icosphere: recursive icosahedron subdivision with seam-safe UVs
//!
//! Each round splits every triangle into four through its edge midpoints.
//! A per-round midpoint cache keyed by the unordered parent pair makes
//! neighbouring triangles share the midpoint they both need. After the last
//! round the points are pushed onto the unit sphere and unwrapped with
//! longitude/latitude UVs, then a repair pass duplicates the vertices whose
//! UVs would make a triangle stretch across the texture.

use glam::{Vec2, Vec3};
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GeometryError;
use crate::geometry::{Geometry, Topology};
use crate::math::{positive, EPSILON, PI, TAU};

/// Deepest subdivision whose vertex count still fits 32-bit indices with
/// room for seam duplicates.
pub const MAX_SUBDIVISIONS: u32 = 10;

/// Options for [`icosphere`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcosphereOptions {
    pub radius: f32,
    /// Subdivision rounds, at most [`MAX_SUBDIVISIONS`]
    pub subdivisions: u32,
}

impl Default for IcosphereOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            subdivisions: 2,
        }
    }
}

/// Options for [`icosahedron`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcosahedronOptions {
    pub radius: f32,
}

impl Default for IcosahedronOptions {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Generate a geodesic sphere with `20 * 4^subdivisions` triangles
///
/// Vertex count is `10 * 4^subdivisions + 2` plus seam and pole duplicates.
/// Fails with [`GeometryError::SubdivisionsOutOfRange`] above
/// [`MAX_SUBDIVISIONS`].
pub fn icosphere(options: &IcosphereOptions) -> Result<Geometry, GeometryError> {
    if options.subdivisions > MAX_SUBDIVISIONS {
        return Err(GeometryError::SubdivisionsOutOfRange {
            requested: options.subdivisions,
            max: MAX_SUBDIVISIONS,
        });
    }
    let radius = positive("icosphere", "radius", options.radius);
    Ok(build(radius, options.subdivisions))
}

/// Generate a regular icosahedron: 20 triangles, seam-repaired UVs
pub fn icosahedron(options: &IcosahedronOptions) -> Geometry {
    let radius = positive("icosahedron", "radius", options.radius);
    build(radius, 0)
}

fn build(radius: f32, subdivisions: u32) -> Geometry {
    let (mut points, mut faces) = base_icosahedron();
    for _ in 0..subdivisions {
        faces = subdivide(&mut points, &faces);
    }

    for p in points.iter_mut() {
        *p = p.normalize();
    }
    let mut uvs: Vec<Vec2> = points.iter().map(|&p| spherical_uv(p)).collect();
    let base_count = points.len();

    repair_seams(&mut points, &mut uvs, &mut faces);

    debug!(
        "icosphere: level {subdivisions}, {} vertices ({} seam duplicates), {} triangles",
        points.len(),
        points.len() - base_count,
        faces.len()
    );

    let mut positions = Vec::with_capacity(points.len() * 3);
    let mut normals = Vec::with_capacity(points.len() * 3);
    for &p in &points {
        positions.extend_from_slice(&(p * radius).to_array());
        normals.extend_from_slice(&p.to_array());
    }
    let uvs = uvs.iter().flat_map(|uv| uv.to_array()).collect();
    let cells = faces.into_iter().flatten().collect();

    Geometry::new(positions, Some(normals), Some(uvs), cells, Topology::Triangles)
}

fn base_icosahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;

    let points = vec![
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];

    #[rustfmt::skip]
    let faces = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    (points, faces)
}

/// Unordered pair of vertex indices packed into one key.
fn edge_key(a: u32, b: u32) -> u64 {
    ((a.min(b) as u64) << 32) | a.max(b) as u64
}

/// One subdivision round. Appends midpoints to `points` and returns the
/// four-times-larger face list.
fn subdivide(points: &mut Vec<Vec3>, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
    let mut cache: HashMap<u64, u32> = HashMap::with_capacity(faces.len() * 3 / 2);
    let mut midpoint = |a: u32, b: u32| -> u32 {
        *cache.entry(edge_key(a, b)).or_insert_with(|| {
            let m = (points[a as usize] + points[b as usize]) * 0.5;
            points.push(m);
            (points.len() - 1) as u32
        })
    };

    let mut next = Vec::with_capacity(faces.len() * 4);
    for &[a, b, c] in faces {
        let ab = midpoint(a, b);
        let bc = midpoint(b, c);
        let ca = midpoint(c, a);

        next.push([a, ab, ca]);
        next.push([b, bc, ab]);
        next.push([c, ca, bc]);
        next.push([ab, bc, ca]);
    }
    next
}

/// Longitude/latitude texture coordinate of a unit vector. `u` is 0.5 on
/// +Z and wraps at -Z; `v` is 1 at the north pole.
fn spherical_uv(p: Vec3) -> Vec2 {
    Vec2::new(p.x.atan2(p.z) / TAU + 0.5, p.y.clamp(-1.0, 1.0).asin() / PI + 0.5)
}

fn is_pole(p: Vec3) -> bool {
    Vec2::new(p.x, p.z).length() < EPSILON * 10.0
}

/// Give every triangle locally continuous UVs.
///
/// A triangle whose longitudes span more than half the texture straddles
/// the wrap; its low-`u` corners are replaced by copies shifted by +1. Those
/// copies are shared by every triangle that needs the same corner shifted.
/// Pole vertices have no longitude of their own, so each triangle touching
/// a pole gets the mean `u` of its other two corners: the first triangle
/// reuses the pole in place, later ones get private copies.
fn repair_seams(points: &mut Vec<Vec3>, uvs: &mut Vec<Vec2>, faces: &mut [[u32; 3]]) {
    let mut wrapped: HashMap<u32, u32> = HashMap::new();
    let mut pole_claimed: HashSet<u32> = HashSet::new();

    for face in faces.iter_mut() {
        let poles = face.map(|i| is_pole(points[i as usize]));

        let (min, max) = face
            .iter()
            .zip(poles)
            .filter(|&(_, pole)| !pole)
            .map(|(&i, _)| uvs[i as usize].x)
            .fold((f32::MAX, f32::MIN), |(lo, hi), u| (lo.min(u), hi.max(u)));

        if max - min > 0.5 {
            for (slot, pole) in face.iter_mut().zip(poles) {
                let original = *slot;
                if pole || uvs[original as usize].x >= 0.5 {
                    continue;
                }
                *slot = *wrapped.entry(original).or_insert_with(|| {
                    let uv = uvs[original as usize] + Vec2::X;
                    points.push(points[original as usize]);
                    uvs.push(uv);
                    (points.len() - 1) as u32
                });
            }
        }

        for k in 0..3 {
            if !poles[k] {
                continue;
            }
            let others = [face[(k + 1) % 3], face[(k + 2) % 3]];
            let u = others.iter().map(|&i| uvs[i as usize].x).sum::<f32>() * 0.5;

            let pole = face[k];
            if pole_claimed.insert(pole) {
                uvs[pole as usize].x = u;
            } else {
                points.push(points[pole as usize]);
                uvs.push(Vec2::new(u, uvs[pole as usize].y));
                face[k] = (points.len() - 1) as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_count(geometry: &Geometry) -> usize {
        geometry.cells.len() / 3
    }

    #[test]
    fn test_level_zero() {
        let geometry = icosahedron(&IcosahedronOptions::default());
        assert_eq!(triangle_count(&geometry), 20);
        // 12 corners plus the copies that fix the wrap
        assert!(geometry.vertex_count() >= 12);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_triangle_count_quadruples() {
        let mut previous = triangle_count(&icosahedron(&IcosahedronOptions::default()));
        for subdivisions in 1..=4 {
            let geometry = icosphere(&IcosphereOptions {
                subdivisions,
                ..Default::default()
            })
            .unwrap();
            let count = triangle_count(&geometry);
            assert_eq!(count, previous * 4);
            previous = count;
        }
    }

    #[test]
    fn test_subdivision_limit() {
        let err = icosphere(&IcosphereOptions {
            subdivisions: 11,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            GeometryError::SubdivisionsOutOfRange {
                requested: 11,
                max: MAX_SUBDIVISIONS
            }
        );
    }

    #[test]
    fn test_midpoints_are_shared() {
        let (mut points, faces) = base_icosahedron();
        let faces = subdivide(&mut points, &faces);
        // 30 edges, one midpoint each
        assert_eq!(points.len(), 12 + 30);
        assert_eq!(faces.len(), 80);
    }

    #[test]
    fn test_edge_key_is_unordered() {
        assert_eq!(edge_key(3, 7), edge_key(7, 3));
        assert_ne!(edge_key(3, 7), edge_key(3, 8));
    }

    #[test]
    fn test_vertices_on_sphere() {
        let geometry = icosphere(&IcosphereOptions {
            radius: 2.0,
            subdivisions: 3,
        })
        .unwrap();
        for i in 0..geometry.vertex_count() {
            let p = Vec3::from(geometry.position(i));
            assert!((p.length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_faces_outward() {
        let geometry = icosphere(&IcosphereOptions::default()).unwrap();
        for tri in geometry.cell_indices() {
            let [p0, p1, p2] = [0, 1, 2].map(|k| Vec3::from(geometry.position(tri[k] as usize)));
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!((p1 - p0).cross(p2 - p0).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_poles_get_one_vertex_per_triangle() {
        let geometry = icosphere(&IcosphereOptions {
            subdivisions: 1,
            ..Default::default()
        })
        .unwrap();
        let mut north = Vec::new();
        for tri in geometry.cell_indices() {
            for &i in &tri {
                if geometry.position(i as usize)[1] > 0.5 - 1e-6 {
                    north.push(i);
                }
            }
        }
        // The pole is an edge midpoint: six triangles meet there and none
        // share its vertex
        assert_eq!(north.len(), 6);
        north.sort_unstable();
        north.dedup();
        assert_eq!(north.len(), 6);
    }

    #[test]
    fn test_spherical_uv() {
        assert_eq!(spherical_uv(Vec3::Z), Vec2::new(0.5, 0.5));
        assert_eq!(spherical_uv(Vec3::Y).y, 1.0);
        assert!((spherical_uv(Vec3::X).x - 0.75).abs() < 1e-6);
    }
}
