//! UV-mapping strategies for the disc/ellipse family
//!
//! Each strategy turns a point of the unit disc (plus the ring and angle
//! ratios it was generated from) into a texture coordinate. Most of them are
//! disc-to-square mappings: they stretch the disc onto `[-1, 1]^2` so a square
//! texture covers the whole shape, and differ in how they distort the
//! interior.
//!
//! Several of the closed forms divide by a coordinate or by a term that
//! vanishes on an axis or at the center. Inside an [`EPSILON`] band those
//! fall back to the exact on-axis value instead of producing NaN.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::{sign, to_unit, EPSILON, HALF_PI, PI, SQRT2, TAU};

/// Largest exponent used by [`UvMapping::Lame`] near the rim
const LAME_MAX_EXPONENT: f32 = 64.0;

/// Exponent of the [`UvMapping::Superellipse`] target curve
const SUPERELLIPSE_EXPONENT: f32 = 4.0;

/// Per-vertex input to a mapping
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MappingInput {
    /// Point in the unit disc the vertex was generated from
    pub u: f32,
    pub v: f32,
    /// Vertex position divided by the shape's half extents, in `[-1, 1]`
    pub x: f32,
    pub y: f32,
    /// Ring index ratio, 0 at the innermost ring and 1 at the rim
    pub radius_ratio: f32,
    /// Angular step ratio, 0 at the first step and 1 at the last
    pub t: f32,
}

/// Disc UV-mapping strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvMapping {
    /// Planar projection of the actual vertex position over the bounds
    Rectangular,
    /// Planar projection of the disc point (ignores the shape equation)
    Radial,
    /// Angle along U, ring along V
    Polar,
    /// Shirley-Chiu concentric squares
    Concentric,
    /// Lamé curves whose exponent grows toward the rim
    Lame,
    /// Radial scaling onto a fixed-exponent superellipse
    Superellipse,
    /// Nowell's elliptical grid
    #[default]
    Elliptical,
    /// Radial stretch onto the square
    SimpleStretch,
    /// Fernandez-Guasti squircle
    FgSquircular,
    /// 2-squircular
    TwoSquircular,
    /// 3-squircular
    ThreeSquircular,
    /// Non-axial 2-pinch
    NonAxialTwoPinch,
    /// Non-axial half-pinch
    NonAxialHalfPinch,
    /// Squelched on both axes
    Squelched,
    /// Squelched along V
    SquelchedVertical,
    /// Squelched along U
    SquelchedHorizontal,
}

impl UvMapping {
    /// Every strategy.
    pub const ALL: [UvMapping; 16] = [
        UvMapping::Rectangular,
        UvMapping::Radial,
        UvMapping::Polar,
        UvMapping::Concentric,
        UvMapping::Lame,
        UvMapping::Superellipse,
        UvMapping::Elliptical,
        UvMapping::SimpleStretch,
        UvMapping::FgSquircular,
        UvMapping::TwoSquircular,
        UvMapping::ThreeSquircular,
        UvMapping::NonAxialTwoPinch,
        UvMapping::NonAxialHalfPinch,
        UvMapping::Squelched,
        UvMapping::SquelchedVertical,
        UvMapping::SquelchedHorizontal,
    ];

    /// Texture coordinate for one vertex.
    pub fn map(self, input: &MappingInput) -> Vec2 {
        let (u, v) = (input.u, input.v);

        let square = match self {
            UvMapping::Rectangular => return Vec2::new(to_unit(input.x), to_unit(input.y)),
            UvMapping::Radial => return Vec2::new(to_unit(u), to_unit(v)),
            UvMapping::Polar => return Vec2::new(input.t, input.radius_ratio),
            UvMapping::Concentric => concentric(u, v),
            UvMapping::Lame => lame(u, v),
            UvMapping::Superellipse => superellipse(u, v),
            UvMapping::Elliptical => elliptical(u, v),
            UvMapping::SimpleStretch => simple_stretch(u, v),
            UvMapping::FgSquircular => fg_squircular(u, v),
            UvMapping::TwoSquircular => two_squircular(u, v),
            UvMapping::ThreeSquircular => squircle_constraint(u, v, 0.5, -0.5),
            UvMapping::NonAxialTwoPinch => squircle_constraint(u, v, 2.0, 1.0),
            UvMapping::NonAxialHalfPinch => squircle_constraint(u, v, 1.5, 0.5),
            UvMapping::Squelched => Vec2::new(squelch(u, v), squelch(v, u)),
            UvMapping::SquelchedVertical => Vec2::new(squelch(u, v), v),
            UvMapping::SquelchedHorizontal => Vec2::new(u, squelch(v, u)),
        };

        Vec2::new(to_unit(square.x), to_unit(square.y))
    }
}

/// Inverse Shirley-Chiu: concentric circles become concentric squares.
fn concentric(u: f32, v: f32) -> Vec2 {
    let r = (u * u + v * v).sqrt();
    if r < EPSILON {
        return Vec2::ZERO;
    }

    let quarter = PI / 4.0;
    let mut phi = v.atan2(u);
    if phi < -quarter {
        phi += TAU;
    }

    if phi < quarter {
        Vec2::new(r, phi * r / quarter)
    } else if phi < 3.0 * quarter {
        Vec2::new(-(phi - HALF_PI) * r / quarter, r)
    } else if phi < 5.0 * quarter {
        Vec2::new(-r, -(phi - PI) * r / quarter)
    } else {
        Vec2::new((phi - 3.0 * HALF_PI) * r / quarter, -r)
    }
}

/// Scale a disc point radially so its direction lands on the Lamé curve
/// `|x|^p + |y|^p = r^p`.
fn lame_scale(u: f32, v: f32, exponent: f32) -> Vec2 {
    let r = (u * u + v * v).sqrt();
    if r < EPSILON {
        return Vec2::ZERO;
    }
    let (c, s) = (u / r, v / r);
    let norm = (c.abs().powf(exponent) + s.abs().powf(exponent)).powf(1.0 / exponent);
    Vec2::new(c, s) * (r / norm)
}

fn lame(u: f32, v: f32) -> Vec2 {
    let falloff = 1.0 - (u * u + v * v);
    let exponent = if falloff < 2.0 / LAME_MAX_EXPONENT {
        LAME_MAX_EXPONENT
    } else {
        2.0 / falloff
    };
    lame_scale(u, v, exponent)
}

fn superellipse(u: f32, v: f32) -> Vec2 {
    lame_scale(u, v, SUPERELLIPSE_EXPONENT)
}

/// Nowell's elliptical grid mapping.
fn elliptical(u: f32, v: f32) -> Vec2 {
    let (u2, v2) = (u * u, v * v);
    let two_sqrt2 = 2.0 * SQRT2;
    let root = |x: f32| x.max(0.0).sqrt();

    Vec2::new(
        0.5 * root(2.0 + u2 - v2 + two_sqrt2 * u) - 0.5 * root(2.0 + u2 - v2 - two_sqrt2 * u),
        0.5 * root(2.0 - u2 + v2 + two_sqrt2 * v) - 0.5 * root(2.0 - u2 + v2 - two_sqrt2 * v),
    )
}

fn simple_stretch(u: f32, v: f32) -> Vec2 {
    let r = (u * u + v * v).sqrt();
    if r < EPSILON {
        return Vec2::ZERO;
    }
    if u * u >= v * v {
        let s = sign(u) * r;
        Vec2::new(s, s * v / u)
    } else {
        let s = sign(v) * r;
        Vec2::new(s * u / v, s)
    }
}

/// Inverse FG-squircular.
///
/// Rationalized form of `x = sgn(uv) / (v sqrt 2) * sqrt(r^2 - sqrt(r^2 (r^2 - 4u^2v^2)))`,
/// which loses every digit to cancellation close to the axes.
fn fg_squircular(u: f32, v: f32) -> Vec2 {
    let r2 = u * u + v * v;
    if r2 < EPSILON * EPSILON {
        return Vec2::new(u, v);
    }
    let discriminant = (1.0 - 4.0 * u * u * v * v / r2).max(0.0);
    Vec2::new(u, v) * (2.0 / (1.0 + discriminant.sqrt())).sqrt()
}

/// Inverse 2-squircular, rationalized like [`fg_squircular`].
fn two_squircular(u: f32, v: f32) -> Vec2 {
    let discriminant = (1.0 - 4.0 * u * u * v * v).max(0.0);
    Vec2::new(u, v) * (2.0 / (1.0 + discriminant.sqrt())).sqrt()
}

/// Invert a radial squircle constraint.
///
/// The square point keeps the disc point's direction; its radius `s`
/// satisfies `r^2 = (s^2 - p k s^4) / (1 - q k s^4)` with
/// `k = cos^2 sin^2` and `p = q + 1`, which puts the square's boundary
/// exactly on the unit circle. `(p, q) = (1, 0)` is FG-squircular, `(0, -1)`
/// 2-squircular.
fn squircle_constraint(u: f32, v: f32, p: f32, q: f32) -> Vec2 {
    let r2 = u * u + v * v;
    if r2 < EPSILON * EPSILON {
        return Vec2::new(u, v);
    }
    let k = u * u * v * v / (r2 * r2);
    let a = k * (p - q * r2);
    let discriminant = (1.0 - 4.0 * a * r2).max(0.0);
    // Rationalized root, finite as a -> 0
    let s2 = 2.0 * r2 / (1.0 + discriminant.sqrt());
    Vec2::new(u, v) * (s2 / r2).sqrt()
}

/// `a / sqrt(1 - b^2)`, zero on the rim where the denominator vanishes.
fn squelch(a: f32, b: f32) -> f32 {
    let denominator = 1.0 - b * b;
    if denominator < EPSILON {
        return 0.0;
    }
    (a / denominator.sqrt()).clamp(-1.0, 1.0)
}
