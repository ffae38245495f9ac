//! Disc and ellipse family
//!
//! One ring-stepping generator, [`ellipse`], parameterized by a position
//! [`Equation`] and a [`UvMapping`]. Disc, superellipse, squircle, annulus
//! and reuleux are presets over it. [`circle`] is the outline-only sibling
//! emitting line cells.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{Geometry, Topology};
use crate::mapping::{MappingInput, UvMapping};
use crate::math::{lerp, non_negative, positive, segments, sign, sweep, EPSILON, HALF_PI, PI, TAU};

/// Input to an [`Equation`]: the direction of the current angular step and
/// the current ring radius
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EquationInput {
    pub cos: f32,
    pub sin: f32,
    pub radius: f32,
}

/// Outline equation of a disc-like shape, before `(sx, sy)` scaling
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equation {
    /// Circle of the ring radius
    #[default]
    Ellipse,
    /// Lamé curve `|x|^m + |y|^n = r`
    Superellipse { m: f32, n: f32 },
    /// Fernandez-Guasti squircle; squareness 0 is a circle, 1 a square
    Squircle { squareness: f32 },
    /// Reuleaux polygon with an odd number of sides
    Reuleux { sides: u32 },
    /// Caller-supplied outline
    #[serde(skip)]
    Custom(fn(&EquationInput) -> Vec2),
}

impl Equation {
    /// Point on the outline for one step of one ring.
    pub fn point(&self, input: &EquationInput) -> Vec2 {
        let (c, s, r) = (input.cos, input.sin, input.radius);
        match *self {
            Equation::Ellipse => Vec2::new(c, s) * r,
            Equation::Superellipse { m, n } => {
                let m = if m > EPSILON { m } else { 2.0 };
                let n = if n > EPSILON { n } else { m };
                Vec2::new(
                    sign(c) * c.abs().powf(2.0 / m),
                    sign(s) * s.abs().powf(2.0 / n),
                ) * r
            }
            Equation::Squircle { squareness } => {
                // x = sgn(c) / (k sqrt2 |s|) * sqrt(1 - sqrt(1 - k^2 sin^2 2t)),
                // rationalized so it has no pole on the axes
                let k = squareness.clamp(0.0, 1.0);
                let a = 4.0 * k * k * c * c * s * s;
                let scale = (2.0 / (1.0 + (1.0 - a).max(0.0).sqrt())).sqrt();
                Vec2::new(c, s) * (r * scale)
            }
            Equation::Reuleux { sides } => Vec2::new(c, s) * (r * reuleux_extent(c, s, sides)),
            Equation::Custom(f) => f(input),
        }
    }
}

/// Distance from the center to the outline of a unit-circumradius Reuleaux
/// polygon along `(c, s)`. One vertex points up.
fn reuleux_extent(c: f32, s: f32, sides: u32) -> f32 {
    let n = sides as f32;
    let step = TAU / n;
    let angle = s.atan2(c);

    // The arc crossed by this direction is centered on the vertex opposite
    let opposite = angle - (HALF_PI + PI);
    let j = (opposite / step).round();
    let vertex_angle = HALF_PI + j * step;
    let center = Vec2::new(vertex_angle.cos(), vertex_angle.sin());

    let arc_radius = 2.0 * (PI / (2.0 * n)).cos();
    let d = Vec2::new(c, s).dot(center);
    d + (d * d + arc_radius * arc_radius - 1.0).max(0.0).sqrt()
}

/// Options for [`ellipse`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipseOptions {
    /// Horizontal scale applied to the outline
    pub sx: f32,
    /// Vertical scale applied to the outline
    pub sy: f32,
    /// Outer ring radius
    pub radius: f32,
    /// Angular steps per ring
    pub segments: u32,
    /// Ring count between `inner_radius` and `radius`
    pub inner_segments: u32,
    /// Angular span
    pub theta: f32,
    /// Angle of the first step
    pub theta_offset: f32,
    /// Radius of the innermost ring
    pub inner_radius: f32,
    /// Collapse a zero-radius innermost ring into one center vertex
    pub merge_centroid: bool,
    pub mapping: UvMapping,
    pub equation: Equation,
}

impl Default for EllipseOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: 0.5,
            radius: 0.5,
            segments: 32,
            inner_segments: 16,
            theta: TAU,
            theta_offset: 0.0,
            inner_radius: 0.0,
            merge_centroid: true,
            mapping: UvMapping::Elliptical,
            equation: Equation::Ellipse,
        }
    }
}

/// Generate a flat ring-stepped shape in the XY plane facing +Z
///
/// `inner_segments + 1` rings of `segments + 1` vertices from
/// `inner_radius` to `radius`, stitched into triangle pairs. With a zero
/// inner radius and `merge_centroid`, the innermost ring is a single center
/// vertex joined to the next ring by a fan, so no zero-area triangle is
/// emitted.
pub fn ellipse(options: &EllipseOptions) -> Geometry {
    const CONTEXT: &str = "ellipse";

    let sx = positive(CONTEXT, "sx", options.sx);
    let sy = positive(CONTEXT, "sy", options.sy);
    let radius = positive(CONTEXT, "radius", options.radius);
    let segment_count = segments(CONTEXT, "segments", options.segments, 3);
    let ring_count = segments(CONTEXT, "inner_segments", options.inner_segments, 1);
    let theta = sweep(CONTEXT, "theta", options.theta);
    let mut inner_radius = non_negative(CONTEXT, "inner_radius", options.inner_radius);
    if inner_radius > radius {
        warn!("{CONTEXT}: inner_radius exceeds radius, clamping to {radius}");
        inner_radius = radius;
    }

    let merge = options.merge_centroid && inner_radius <= EPSILON;
    let row = segment_count as usize + 1;
    let vertex_count = if merge {
        1 + ring_count as usize * row
    } else {
        (ring_count as usize + 1) * row
    };

    let scale = Vec2::new(sx, sy);
    let mut positions = Vec::with_capacity(vertex_count * 3);
    let mut uvs = Vec::with_capacity(vertex_count * 2);
    let mut emit = |point: Vec2, input: MappingInput| {
        positions.extend_from_slice(&(point * scale).extend(0.0).to_array());
        uvs.extend_from_slice(&options.mapping.map(&input).to_array());
    };

    let first_ring = if merge {
        let mid = options.theta_offset + theta * 0.5;
        let point = options.equation.point(&EquationInput {
            cos: mid.cos(),
            sin: mid.sin(),
            radius: 0.0,
        });
        emit(
            point,
            MappingInput {
                t: 0.5,
                ..Default::default()
            },
        );
        1
    } else {
        0
    };

    for j in first_ring..=ring_count {
        let radius_ratio = j as f32 / ring_count as f32;
        let r = lerp(inner_radius, radius, radius_ratio);
        for i in 0..=segment_count {
            let t = i as f32 / segment_count as f32;
            let angle = options.theta_offset + t * theta;
            let (sin, cos) = angle.sin_cos();

            let point = options.equation.point(&EquationInput { cos, sin, radius: r });
            let disc = Vec2::new(cos, sin) * (r / radius);
            emit(
                point,
                MappingInput {
                    u: disc.x,
                    v: disc.y,
                    x: point.x / radius,
                    y: point.y / radius,
                    radius_ratio,
                    t,
                },
            );
        }
    }

    let triangle_count = if merge {
        segment_count as usize * (1 + 2 * (ring_count as usize - 1))
    } else {
        segment_count as usize * 2 * ring_count as usize
    };
    let mut cells = Vec::with_capacity(triangle_count * 3);

    let ring_start = |j: u32| -> u32 {
        if merge {
            1 + (j - 1) * row as u32
        } else {
            j * row as u32
        }
    };

    if merge {
        let outer = ring_start(1);
        for i in 0..segment_count {
            cells.extend_from_slice(&[0, outer + i, outer + i + 1]);
        }
    }
    for j in first_ring..ring_count {
        let inner = ring_start(j);
        let outer = ring_start(j + 1);
        for i in 0..segment_count {
            let (a, b) = (inner + i, outer + i);
            cells.extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
        }
    }

    debug_assert_eq!(positions.len(), vertex_count * 3);
    debug_assert_eq!(cells.len(), triangle_count * 3);
    debug!("{CONTEXT}: {vertex_count} vertices, {triangle_count} triangles");

    let normals = Vec3::Z.to_array().repeat(vertex_count);
    Geometry::new(
        positions,
        Some(normals),
        Some(uvs),
        cells,
        Topology::Triangles,
    )
}

/// Options for [`disc`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscOptions {
    pub radius: f32,
    pub segments: u32,
    pub inner_segments: u32,
    pub theta: f32,
    pub theta_offset: f32,
    pub merge_centroid: bool,
    pub mapping: UvMapping,
}

impl Default for DiscOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            segments: 32,
            inner_segments: 16,
            theta: TAU,
            theta_offset: 0.0,
            merge_centroid: true,
            mapping: UvMapping::Concentric,
        }
    }
}

/// Generate a filled circle of `radius`
pub fn disc(options: &DiscOptions) -> Geometry {
    ellipse(&EllipseOptions {
        sx: 1.0,
        sy: 1.0,
        radius: options.radius,
        segments: options.segments,
        inner_segments: options.inner_segments,
        theta: options.theta,
        theta_offset: options.theta_offset,
        inner_radius: 0.0,
        merge_centroid: options.merge_centroid,
        mapping: options.mapping,
        equation: Equation::Ellipse,
    })
}

/// Options for [`superellipse`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperellipseOptions {
    pub sx: f32,
    pub sy: f32,
    pub radius: f32,
    pub segments: u32,
    pub inner_segments: u32,
    pub theta: f32,
    pub theta_offset: f32,
    pub merge_centroid: bool,
    pub mapping: UvMapping,
    /// Horizontal exponent
    pub m: f32,
    /// Vertical exponent (defaults to `m`)
    pub n: Option<f32>,
}

impl Default for SuperellipseOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: 0.5,
            radius: 0.5,
            segments: 32,
            inner_segments: 16,
            theta: TAU,
            theta_offset: 0.0,
            merge_centroid: true,
            mapping: UvMapping::Lame,
            m: 2.0,
            n: None,
        }
    }
}

/// Generate a filled Lamé curve
pub fn superellipse(options: &SuperellipseOptions) -> Geometry {
    let m = positive("superellipse", "m", options.m);
    let n = positive("superellipse", "n", options.n.unwrap_or(m));
    ellipse(&EllipseOptions {
        sx: options.sx,
        sy: options.sy,
        radius: options.radius,
        segments: options.segments,
        inner_segments: options.inner_segments,
        theta: options.theta,
        theta_offset: options.theta_offset,
        inner_radius: 0.0,
        merge_centroid: options.merge_centroid,
        mapping: options.mapping,
        equation: Equation::Superellipse { m, n },
    })
}

/// Options for [`squircle`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquircleOptions {
    pub sx: f32,
    pub sy: f32,
    pub radius: f32,
    pub segments: u32,
    pub inner_segments: u32,
    pub theta: f32,
    pub theta_offset: f32,
    pub merge_centroid: bool,
    pub mapping: UvMapping,
    /// 0 for a circle, 1 for a square
    pub squareness: f32,
}

impl Default for SquircleOptions {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            radius: 0.5,
            segments: 128,
            inner_segments: 16,
            theta: TAU,
            theta_offset: 0.0,
            merge_centroid: true,
            mapping: UvMapping::FgSquircular,
            squareness: 0.95,
        }
    }
}

/// Generate a filled Fernandez-Guasti squircle
pub fn squircle(options: &SquircleOptions) -> Geometry {
    let squareness = if (0.0..=1.0).contains(&options.squareness) {
        options.squareness
    } else {
        warn!("squircle: squareness must be in [0, 1], clamping");
        options.squareness.clamp(0.0, 1.0)
    };
    ellipse(&EllipseOptions {
        sx: options.sx,
        sy: options.sy,
        radius: options.radius,
        segments: options.segments,
        inner_segments: options.inner_segments,
        theta: options.theta,
        theta_offset: options.theta_offset,
        inner_radius: 0.0,
        merge_centroid: options.merge_centroid,
        mapping: options.mapping,
        equation: Equation::Squircle { squareness },
    })
}

/// Options for [`annulus`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnulusOptions {
    pub radius: f32,
    pub inner_radius: f32,
    pub segments: u32,
    pub inner_segments: u32,
    pub theta: f32,
    pub theta_offset: f32,
    pub mapping: UvMapping,
}

impl Default for AnnulusOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            inner_radius: 0.25,
            segments: 32,
            inner_segments: 16,
            theta: TAU,
            theta_offset: 0.0,
            mapping: UvMapping::Polar,
        }
    }
}

/// Generate a flat ring between `inner_radius` and `radius`
pub fn annulus(options: &AnnulusOptions) -> Geometry {
    ellipse(&EllipseOptions {
        sx: 1.0,
        sy: 1.0,
        radius: options.radius,
        segments: options.segments,
        inner_segments: options.inner_segments,
        theta: options.theta,
        theta_offset: options.theta_offset,
        inner_radius: options.inner_radius,
        merge_centroid: false,
        mapping: options.mapping,
        equation: Equation::Ellipse,
    })
}

/// Options for [`reuleux`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReuleuxOptions {
    pub radius: f32,
    /// Odd side count, at least 3
    pub sides: u32,
    pub segments: u32,
    pub inner_segments: u32,
    pub theta: f32,
    pub theta_offset: f32,
    pub merge_centroid: bool,
    pub mapping: UvMapping,
}

impl Default for ReuleuxOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            sides: 3,
            segments: 32,
            inner_segments: 16,
            theta: TAU,
            theta_offset: 0.0,
            merge_centroid: true,
            mapping: UvMapping::Concentric,
        }
    }
}

/// Generate a filled Reuleaux polygon inscribed in a circle of `radius`
pub fn reuleux(options: &ReuleuxOptions) -> Geometry {
    let mut sides = segments("reuleux", "sides", options.sides, 3);
    if sides % 2 == 0 {
        warn!("reuleux: sides must be odd, using {}", sides + 1);
        sides += 1;
    }
    ellipse(&EllipseOptions {
        sx: 1.0,
        sy: 1.0,
        radius: options.radius,
        segments: options.segments,
        inner_segments: options.inner_segments,
        theta: options.theta,
        theta_offset: options.theta_offset,
        inner_radius: 0.0,
        merge_centroid: options.merge_centroid,
        mapping: options.mapping,
        equation: Equation::Reuleux { sides },
    })
}

/// Options for [`circle`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleOptions {
    pub radius: f32,
    pub segments: u32,
    pub theta: f32,
    pub theta_offset: f32,
    /// Join the last vertex back to the first instead of duplicating it
    pub closed: bool,
}

impl Default for CircleOptions {
    fn default() -> Self {
        Self {
            radius: 0.5,
            segments: 32,
            theta: TAU,
            theta_offset: 0.0,
            closed: false,
        }
    }
}

/// Generate a circle outline in the XY plane as line cells
///
/// Positions and cells only. Open circles have `segments + 1` vertices;
/// closed ones `segments`, with the last line returning to vertex 0.
pub fn circle(options: &CircleOptions) -> Geometry {
    let radius = positive("circle", "radius", options.radius);
    let segment_count = segments("circle", "segments", options.segments, 3);
    let theta = sweep("circle", "theta", options.theta);

    let vertex_count = if options.closed {
        segment_count
    } else {
        segment_count + 1
    };

    let mut positions = Vec::with_capacity(vertex_count as usize * 3);
    for i in 0..vertex_count {
        let angle = options.theta_offset + i as f32 / segment_count as f32 * theta;
        let (sin, cos) = angle.sin_cos();
        positions.extend_from_slice(&[radius * cos, radius * sin, 0.0]);
    }

    let cells = (0..segment_count)
        .flat_map(|i| [i, (i + 1) % vertex_count])
        .collect();

    Geometry::new(positions, None, None, cells, Topology::Lines)
}
