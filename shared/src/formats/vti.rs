//! Triangle index blob (.vti)
//!
//! Three little-endian u32 per triangle. Values are offsets into the vertex
//! blob written alongside, not into any single mesh.

use super::FormatError;
use crate::MEMBLOB_FORMAT;

/// Bytes per triangle
pub const TRIANGLE_SIZE: usize = MEMBLOB_FORMAT.triangle_stride();

/// Encode triangles into a headerless .vti blob
pub fn encode_triangles(triangles: &[[u32; 3]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(triangles.len() * TRIANGLE_SIZE);
    for triangle in triangles {
        for index in triangle {
            data.extend_from_slice(&index.to_le_bytes());
        }
    }
    data
}

/// Decode a headerless .vti blob
pub fn decode_triangles(bytes: &[u8]) -> Result<Vec<[u32; 3]>, FormatError> {
    if bytes.len() % TRIANGLE_SIZE != 0 {
        return Err(FormatError::TruncatedIndexBlob {
            len: bytes.len(),
            stride: TRIANGLE_SIZE,
        });
    }
    Ok(bytes
        .chunks_exact(TRIANGLE_SIZE)
        .map(|tri| {
            let read = |i: usize| {
                u32::from_le_bytes([tri[i], tri[i + 1], tri[i + 2], tri[i + 3]])
            };
            [read(0), read(4), read(8)]
        })
        .collect())
}

/// Check every index refers to one of `vertex_count` vertices
pub fn validate_triangles(triangles: &[[u32; 3]], vertex_count: usize) -> Result<(), FormatError> {
    for (triangle, indices) in triangles.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(FormatError::IndexOutOfRange {
                triangle,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}
