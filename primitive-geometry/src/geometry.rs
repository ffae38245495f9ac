//! Generated geometry

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::index::{IndexBuffer, IndexKind};

/// Tolerance used by [`Geometry::validate`] for unit normals
const NORMAL_TOLERANCE: f32 = 1e-3;

/// Primitive type the cells describe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Pairs of indices
    Lines,
    /// Triples of indices
    Triangles,
    /// Quadruples of indices, each splitting into two triangles
    Quads,
}

impl Topology {
    /// Indices per cell.
    pub fn stride(self) -> usize {
        match self {
            Topology::Lines => 2,
            Topology::Triangles => 3,
            Topology::Quads => 4,
        }
    }
}

/// Vertex attributes and cells produced by a generator
///
/// Attribute buffers are flat: 3 floats per vertex for positions and normals,
/// 2 per vertex for UVs. Shapes that carry no shading data (box, circle) leave
/// `normals` and `uvs` empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub positions: Vec<f32>,
    pub normals: Option<Vec<f32>>,
    pub uvs: Option<Vec<f32>>,
    pub cells: IndexBuffer,
    pub topology: Topology,
}

impl Geometry {
    /// Assemble a geometry from scratch buffers, picking the index width.
    pub fn new(
        positions: Vec<f32>,
        normals: Option<Vec<f32>>,
        uvs: Option<Vec<f32>>,
        cells: Vec<u32>,
        topology: Topology,
    ) -> Self {
        let vertex_count = positions.len() / 3;
        Self {
            positions,
            normals,
            uvs,
            cells: IndexBuffer::from_indices(cells, vertex_count),
            topology,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of cells (lines, triangles or quads).
    pub fn cell_count(&self) -> usize {
        self.cells.len() / self.topology.stride()
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        ]
    }

    /// Normal of vertex `i`, if normals are present.
    pub fn normal(&self, i: usize) -> Option<[f32; 3]> {
        self.normals
            .as_ref()
            .map(|n| [n[i * 3], n[i * 3 + 1], n[i * 3 + 2]])
    }

    /// UV of vertex `i`, if UVs are present.
    pub fn uv(&self, i: usize) -> Option<[f32; 2]> {
        self.uvs.as_ref().map(|uv| [uv[i * 2], uv[i * 2 + 1]])
    }

    /// Cells grouped by stride, widened to `u32`.
    pub fn cell_indices(&self) -> Vec<Vec<u32>> {
        self.cells
            .to_u32()
            .chunks(self.topology.stride())
            .map(<[u32]>::to_vec)
            .collect()
    }

    /// Check the buffer invariants every generator guarantees.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.positions.len() % 3 != 0 {
            return Err(GeometryError::AttributeLength {
                attribute: "positions",
                len: self.positions.len(),
                expected: self.positions.len() / 3 * 3,
            });
        }

        let vertex_count = self.vertex_count();

        if let Some(normals) = &self.normals {
            if normals.len() != vertex_count * 3 {
                return Err(GeometryError::AttributeLength {
                    attribute: "normals",
                    len: normals.len(),
                    expected: vertex_count * 3,
                });
            }
            for (vertex, n) in normals.chunks(3).enumerate() {
                let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
                if (length - 1.0).abs() > NORMAL_TOLERANCE {
                    return Err(GeometryError::NonUnitNormal { vertex, length });
                }
            }
        }

        if let Some(uvs) = &self.uvs {
            if uvs.len() != vertex_count * 2 {
                return Err(GeometryError::AttributeLength {
                    attribute: "uvs",
                    len: uvs.len(),
                    expected: vertex_count * 2,
                });
            }
        }

        let stride = self.topology.stride();
        if self.cells.len() % stride != 0 {
            return Err(GeometryError::InvalidStride {
                len: self.cells.len(),
                stride,
            });
        }

        if let Some(index) = self.cells.iter().find(|&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfBounds {
                index,
                vertex_count,
            });
        }

        Ok(())
    }

    /// Split quads into triangle pairs (`[a, b, c, d]` becomes `[a, b, c]`
    /// and `[a, c, d]`). Other topologies are returned unchanged.
    pub fn to_triangles(self) -> Self {
        if self.topology != Topology::Quads {
            return self;
        }

        let kind = self.cells.kind();
        let mut triangles = Vec::with_capacity(self.cells.len() / 4 * 6);
        for quad in self.cells.to_u32().chunks_exact(4) {
            triangles.extend_from_slice(&[quad[0], quad[1], quad[2]]);
            triangles.extend_from_slice(&[quad[0], quad[2], quad[3]]);
        }

        Self {
            cells: IndexBuffer::with_kind(triangles, kind),
            topology: Topology::Triangles,
            ..self
        }
    }

    /// Re-pack the cells at an explicit width, ignoring the process-wide
    /// override.
    pub fn with_index_kind(self, kind: IndexKind) -> Self {
        let indices = self.cells.to_u32();
        Self {
            cells: IndexBuffer::with_kind(indices, kind),
            ..self
        }
    }

    /// Index buffer bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        self.cells.as_bytes()
    }

    /// Position buffer bytes for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
}
