//! Blob format constants for raw mesh exports.
//!
//! This module defines the `BlobFormat` struct which serves as the single source of truth
//! for all blob-related constants (file extensions, record widths, byte strides).
//!
//! # Example
//!
//! ```
//! use memblob_shared::MEMBLOB_FORMAT;
//!
//! // Get the vertex file extension
//! assert_eq!(MEMBLOB_FORMAT.vertex_ext, "vnuv");
//!
//! // One vertex record is eight little-endian f32 values
//! assert_eq!(MEMBLOB_FORMAT.vertex_stride(), 32);
//!
//! // One triangle is three little-endian u32 values
//! assert_eq!(MEMBLOB_FORMAT.triangle_stride(), 12);
//! ```

/// File extensions and record layout of the blob formats.
///
/// Defines the file format constants used for the vertex/index file pair.
/// Neither file carries a header: element counts come from the file size.
#[derive(Debug, Clone, Copy)]
pub struct BlobFormat {
    /// Vertex file extension without dot (e.g., "vnuv")
    pub vertex_ext: &'static str,

    /// Index file extension without dot (e.g., "vti")
    pub index_ext: &'static str,

    /// Shader constant source extension (e.g., "cginc")
    pub shader_constant_ext: &'static str,

    /// f32 values per vertex record
    pub floats_per_vertex: usize,

    /// u32 values per triangle record
    pub indices_per_triangle: usize,
}

impl BlobFormat {
    /// Create a new blob format description.
    pub const fn new(
        vertex_ext: &'static str,
        index_ext: &'static str,
        shader_constant_ext: &'static str,
        floats_per_vertex: usize,
        indices_per_triangle: usize,
    ) -> Self {
        Self {
            vertex_ext,
            index_ext,
            shader_constant_ext,
            floats_per_vertex,
            indices_per_triangle,
        }
    }

    /// Bytes per vertex record in the vertex file.
    #[inline]
    pub const fn vertex_stride(&self) -> usize {
        self.floats_per_vertex * size_of::<f32>()
    }

    /// Bytes per triangle record in the index file.
    #[inline]
    pub const fn triangle_stride(&self) -> usize {
        self.indices_per_triangle * size_of::<u32>()
    }
}

/// Memblob raw mesh format.
///
/// - Vertex file: `.vnuv`, records of (px, py, pz, nx, ny, nz, u, v)
/// - Index file: `.vti`, records of three global vertex indices
/// - Shader constants: `.cginc`
pub const MEMBLOB_FORMAT: BlobFormat = BlobFormat::new("vnuv", "vti", "cginc", 8, 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memblob_extensions() {
        assert_eq!(MEMBLOB_FORMAT.vertex_ext, "vnuv");
        assert_eq!(MEMBLOB_FORMAT.index_ext, "vti");
        assert_eq!(MEMBLOB_FORMAT.shader_constant_ext, "cginc");
    }

    #[test]
    fn test_memblob_strides() {
        assert_eq!(MEMBLOB_FORMAT.vertex_stride(), 32);
        assert_eq!(MEMBLOB_FORMAT.triangle_stride(), 12);
    }
}
