//! Error types

/// Errors raised by generators with hard preconditions and by
/// [`Geometry::validate`](crate::Geometry::validate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Icosphere subdivision level would overflow 32-bit indices
    #[error("icosphere subdivisions {requested} exceeds the maximum of {max}")]
    SubdivisionsOutOfRange { requested: u32, max: u32 },

    /// A cell references a vertex that does not exist
    #[error("cell index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    /// Index count is not a multiple of the topology stride
    #[error("{len} indices is not a multiple of the {stride}-index cell stride")]
    InvalidStride { len: usize, stride: usize },

    /// A per-vertex attribute buffer has the wrong length
    #[error("{attribute} has {len} components, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        len: usize,
        expected: usize,
    },

    /// A normal is not unit length
    #[error("normal of vertex {vertex} has length {length}")]
    NonUnitNormal { vertex: usize, length: f32 },
}
