//! Mesh serialization (host meshes -> .vnuv / .vti)

pub mod ops;
mod serialize;
mod types;

// Re-export public API
pub use serialize::{process_mesh, serialize, serialize_meshes, MeshSummary, SerializedMeshes};
pub use types::{
    ExportError, Face, Mesh, MeshBuffers, UvLayer, UvSeamPolicy, DEFAULT_UV_LAYER,
};
