//! Numeric utilities
//!
//! Constants and small scalar/vector helpers shared by every generator, plus
//! the parameter guards that clamp invalid shape dimensions (with a warning)
//! instead of failing.

use glam::Vec3;
use tracing::warn;

/// Full turn in radians.
pub const TAU: f32 = std::f32::consts::TAU;

/// Quarter turn in radians.
pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;

/// Half turn in radians.
pub const PI: f32 = std::f32::consts::PI;

/// Square root of two.
pub const SQRT2: f32 = std::f32::consts::SQRT_2;

/// Band under which a denominator is treated as zero.
pub const EPSILON: f32 = 1e-6;

/// Smallest extent a clamped dimension is allowed to reach.
pub(crate) const MIN_EXTENT: f32 = 0.001;

/// Normalize `v`, returning `fallback` for (near) zero-length input.
#[inline]
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let length = v.length();
    if length > EPSILON { v / length } else { fallback }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Remap `x` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// A collapsed input range maps everything to `out_min`.
#[inline]
pub fn remap(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span.abs() < EPSILON {
        return out_min;
    }
    lerp(out_min, out_max, (x - in_min) / span)
}

/// Sign of `x`, with zero mapping to zero (unlike `f32::signum`).
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Map `[-1, 1]` to `[0, 1]`.
#[inline]
pub fn to_unit(x: f32) -> f32 {
    x * 0.5 + 0.5
}

// Parameter guards

/// Clamp a strictly positive dimension.
pub(crate) fn positive(context: &str, name: &str, value: f32) -> f32 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        warn!("{context}: {name} must be > 0.0, clamping to {MIN_EXTENT}");
        MIN_EXTENT
    }
}

/// Clamp a non-negative dimension.
pub(crate) fn non_negative(context: &str, name: &str, value: f32) -> f32 {
    if value >= 0.0 && value.is_finite() {
        value
    } else {
        warn!("{context}: {name} must be >= 0.0, clamping to 0.0");
        0.0
    }
}

/// Clamp a segment count to at least `min`.
pub(crate) fn segments(context: &str, name: &str, value: u32, min: u32) -> u32 {
    if value < min {
        warn!("{context}: {name} must be >= {min}, clamping to {min}");
        min
    } else {
        value
    }
}

/// Clamp a sweep angle to `(0, TAU]`.
pub(crate) fn sweep(context: &str, name: &str, value: f32) -> f32 {
    if value > 0.0 && value <= TAU + EPSILON {
        value
    } else {
        warn!("{context}: {name} must be in (0, TAU], using a full turn");
        TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_or_falls_back_on_zero() {
        assert_eq!(normalize_or(Vec3::ZERO, Vec3::Y), Vec3::Y);
        let n = normalize_or(Vec3::new(3.0, 0.0, 4.0), Vec3::Y);
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_remap() {
        assert_eq!(remap(5.0, 0.0, 10.0, 0.0, 1.0), 0.5);
        assert_eq!(remap(1.0, 1.0, 1.0, 2.0, 3.0), 2.0);
        assert_eq!(remap(0.0, -1.0, 1.0, 0.0, 1.0), to_unit(0.0));
    }

    #[test]
    fn test_sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-2.0), -1.0);
        assert_eq!(sign(0.5), 1.0);
    }

    #[test]
    fn test_guards_clamp() {
        assert_eq!(positive("test", "size", -1.0), MIN_EXTENT);
        assert_eq!(positive("test", "size", 2.0), 2.0);
        assert_eq!(non_negative("test", "radius", -0.5), 0.0);
        assert_eq!(segments("test", "nx", 0, 1), 1);
        assert_eq!(sweep("test", "theta", 0.0), TAU);
        assert_eq!(sweep("test", "theta", 1.0), 1.0);
    }
}
