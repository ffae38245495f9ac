//! Index buffer width selection
//!
//! Generators build their cells as `u32` scratch indices and compact them at
//! the end into the narrowest unsigned buffer that can address every vertex.
//! A process-wide override can pin the width (e.g. for a renderer that only
//! accepts 16-bit indices); set it once before generating concurrently.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Unsigned integer width of an index buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    U8,
    U16,
    U32,
}

const NO_OVERRIDE: u8 = 0;

static INDEX_KIND_OVERRIDE: AtomicU8 = AtomicU8::new(NO_OVERRIDE);

impl IndexKind {
    /// Narrowest width that can address `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count <= u8::MAX as usize {
            IndexKind::U8
        } else if vertex_count <= u16::MAX as usize {
            IndexKind::U16
        } else {
            IndexKind::U32
        }
    }

    /// Width used by generators: the process-wide override if one is set,
    /// otherwise [`IndexKind::for_vertex_count`].
    pub fn select(vertex_count: usize) -> Self {
        index_kind_override().unwrap_or_else(|| Self::for_vertex_count(vertex_count))
    }

    /// Largest index value this width can hold.
    pub fn max_index(self) -> u32 {
        match self {
            IndexKind::U8 => u8::MAX as u32,
            IndexKind::U16 => u16::MAX as u32,
            IndexKind::U32 => u32::MAX,
        }
    }

    /// Bytes per index.
    pub fn size(self) -> usize {
        match self {
            IndexKind::U8 => 1,
            IndexKind::U16 => 2,
            IndexKind::U32 => 4,
        }
    }

    fn to_tag(self) -> u8 {
        match self {
            IndexKind::U8 => 1,
            IndexKind::U16 => 2,
            IndexKind::U32 => 3,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(IndexKind::U8),
            2 => Some(IndexKind::U16),
            3 => Some(IndexKind::U32),
            _ => None,
        }
    }
}

/// Force every subsequently generated geometry to use `kind`, or restore
/// automatic selection with `None`.
///
/// Concurrent writers race; establish the override before generating from
/// several threads.
pub fn set_index_kind_override(kind: Option<IndexKind>) {
    let tag = kind.map_or(NO_OVERRIDE, IndexKind::to_tag);
    INDEX_KIND_OVERRIDE.store(tag, Ordering::Relaxed);
}

/// Currently active index width override, if any.
pub fn index_kind_override() -> Option<IndexKind> {
    IndexKind::from_tag(INDEX_KIND_OVERRIDE.load(Ordering::Relaxed))
}

/// Index buffer with the element width chosen by [`IndexKind`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Compact scratch indices for a geometry with `vertex_count` vertices,
    /// honoring the process-wide override.
    pub fn from_indices(indices: Vec<u32>, vertex_count: usize) -> Self {
        Self::with_kind(indices, IndexKind::select(vertex_count))
    }

    /// Pack indices into a buffer of exactly `kind`.
    ///
    /// Values wider than `kind` are truncated; a warning is logged when that
    /// happens.
    pub fn with_kind(indices: Vec<u32>, kind: IndexKind) -> Self {
        let max = indices.iter().copied().max().unwrap_or(0);
        if max > kind.max_index() {
            warn!(
                "index buffer forced to {:?} but references vertex {}, indices will wrap",
                kind, max
            );
        }

        match kind {
            IndexKind::U8 => IndexBuffer::U8(indices.into_iter().map(|i| i as u8).collect()),
            IndexKind::U16 => IndexBuffer::U16(indices.into_iter().map(|i| i as u16).collect()),
            IndexKind::U32 => IndexBuffer::U32(indices),
        }
    }

    /// Element width of this buffer.
    pub fn kind(&self) -> IndexKind {
        match self {
            IndexBuffer::U8(_) => IndexKind::U8,
            IndexBuffer::U16(_) => IndexKind::U16,
            IndexBuffer::U32(_) => IndexKind::U32,
        }
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U8(v) => v.len(),
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at position `i`, widened to `u32`.
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            IndexBuffer::U8(v) => v.get(i).map(|&x| x as u32),
            IndexBuffer::U16(v) => v.get(i).map(|&x| x as u32),
            IndexBuffer::U32(v) => v.get(i).copied(),
        }
    }

    /// Iterate over all indices, widened to `u32`.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            IndexBuffer::U8(v) => Box::new(v.iter().map(|&x| x as u32)),
            IndexBuffer::U16(v) => Box::new(v.iter().map(|&x| x as u32)),
            IndexBuffer::U32(v) => Box::new(v.iter().copied()),
        }
    }

    /// Largest referenced index.
    pub fn max(&self) -> Option<u32> {
        self.iter().max()
    }

    /// Widen to a `u32` vector.
    pub fn to_u32(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Raw bytes for GPU upload (native endianness).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexBuffer::U8(v) => v.as_slice(),
            IndexBuffer::U16(v) => bytemuck::cast_slice(v),
            IndexBuffer::U32(v) => bytemuck::cast_slice(v),
        }
    }
}
