//! Vertex blob (.vnuv)
//!
//! # Layout
//! ```text
//! 0x00: px f32, py f32, pz f32
//! 0x0C: nx f32, ny f32, nz f32
//! 0x18: u f32, v f32
//! 0x20: next vertex
//! ```
//!
//! All values little-endian. Vertex count = file size / 32.

use bytemuck::{Pod, Zeroable};

use super::FormatError;
use crate::MEMBLOB_FORMAT;

/// One vertex record (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct VertexRecord {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexRecord {
    pub const SIZE: usize = MEMBLOB_FORMAT.vertex_stride();

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Swap every float between native and little-endian byte order
    ///
    /// A no-op on little-endian targets; the swap is its own inverse.
    fn le_order(self) -> Self {
        let swap = |v: f32| f32::from_bits(v.to_bits().to_le());
        Self {
            position: self.position.map(swap),
            normal: self.normal.map(swap),
            uv: self.uv.map(swap),
        }
    }

    /// Write record to little-endian bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes.copy_from_slice(bytemuck::bytes_of(&self.le_order()));
        bytes
    }

    /// Read record from little-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let record = bytes.get(..Self::SIZE)?;
        bytemuck::try_pod_read_unaligned::<Self>(record)
            .ok()
            .map(Self::le_order)
    }
}

/// Encode vertex records into a headerless .vnuv blob
pub fn encode_vertices(vertices: &[VertexRecord]) -> Vec<u8> {
    let mut data = Vec::with_capacity(vertices.len() * VertexRecord::SIZE);
    for vertex in vertices {
        data.extend_from_slice(&vertex.to_bytes());
    }
    data
}

/// Decode a headerless .vnuv blob
pub fn decode_vertices(bytes: &[u8]) -> Result<Vec<VertexRecord>, FormatError> {
    if bytes.len() % VertexRecord::SIZE != 0 {
        return Err(FormatError::TruncatedVertexBlob {
            len: bytes.len(),
            stride: VertexRecord::SIZE,
        });
    }
    Ok(bytes
        .chunks_exact(VertexRecord::SIZE)
        .filter_map(VertexRecord::from_bytes)
        .collect())
}
