//! Raw blob formats
//!
//! Both files are POD streams with no header and no magic bytes. The element
//! count is implied by the file size, so decoding only checks that the length
//! is a whole number of records.
//!
//! Format constants (extensions, strides) are defined in [`crate::BlobFormat`].
//! Use [`crate::MEMBLOB_FORMAT`] for all of them.

pub mod vnuv;
pub mod vti;

pub use vnuv::*;
pub use vti::*;

/// Error decoding a raw blob.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("vertex blob is {len} bytes, not a multiple of the {stride}-byte record")]
    TruncatedVertexBlob { len: usize, stride: usize },

    #[error("index blob is {len} bytes, not a multiple of the {stride}-byte triangle")]
    TruncatedIndexBlob { len: usize, stride: usize },

    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}
