//! Shared formats and helpers for memblob tools.

pub mod blob_format;
pub mod formats;
pub mod fs;

pub use blob_format::{BlobFormat, MEMBLOB_FORMAT};
pub use formats::{
    decode_triangles, decode_vertices, encode_triangles, encode_vertices, validate_triangles,
    FormatError, VertexRecord,
};
