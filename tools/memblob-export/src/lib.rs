//! memblob-export library
//!
//! Provides scene loading, raw mesh serialization and shader constant
//! generation for use by the `memblob-export` binary and other tools.

pub mod batch;
pub mod export;
pub mod formats;
pub mod inspect;
pub mod manifest;
pub mod mesh;
pub mod scene;
pub mod shader_constant;

// Re-export blob format constants from memblob-shared
pub use memblob_shared::{BlobFormat, VertexRecord, MEMBLOB_FORMAT};

// Re-export key types for mesh serialization
pub use mesh::{
    process_mesh, serialize, serialize_meshes, ExportError, Face, Mesh, MeshBuffers, UvLayer,
    UvSeamPolicy,
};

// Re-export the scene host seam
pub use scene::{load_scene, prepare_scene, Scene, SceneLoader};

pub use batch::{run_batch, BatchConfig, BatchReport};
pub use export::{export_file, export_scene, ExportOptions, ExportReport};
