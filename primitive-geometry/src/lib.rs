//! Procedural mesh generation
//!
//! Pure functions that build vertex attributes and index buffers for
//! parametric shapes. Every generator takes an options struct with documented
//! defaults and returns an owned [`Geometry`].
//!
//! Out-of-range options are clamped to the nearest valid value with a
//! `tracing` warning; only hard preconditions (icosphere depth) return a
//! [`GeometryError`].

mod disc;
mod error;
mod geometry;
mod icosphere;
mod index;
mod mapping;
pub mod math;
mod patch;
mod rectilinear;
mod rounded;
mod sphere;
mod swept;

pub use error::GeometryError;
pub use geometry::{Geometry, Topology};
pub use index::{index_kind_override, set_index_kind_override, IndexBuffer, IndexKind};
pub use mapping::{MappingInput, UvMapping};

// Patch builder, for composing custom flat shapes
pub use patch::{compute_plane, BuildCursor, Direction, GeometryBuffers, Patch};

// Re-export generators
pub use disc::{
    annulus, circle, disc, ellipse, reuleux, squircle, superellipse, AnnulusOptions,
    CircleOptions, DiscOptions, EllipseOptions, Equation, EquationInput, ReuleuxOptions,
    SquircleOptions, SuperellipseOptions,
};
pub use icosphere::{icosahedron, icosphere, IcosahedronOptions, IcosphereOptions, MAX_SUBDIVISIONS};
pub use rectilinear::{box_geometry, cube, plane, quad, BoxOptions, CubeOptions, PlaneOptions, QuadOptions};
pub use rounded::{
    rounded_cube, rounded_rectangle, stadium, RoundedCubeOptions, RoundedRectangleOptions,
    StadiumOptions,
};
pub use sphere::{ellipsoid, sphere, EllipsoidOptions, SphereOptions};
pub use swept::{
    capsule, cone, cylinder, torus, CapsuleOptions, ConeOptions, CylinderOptions, TorusOptions,
};
