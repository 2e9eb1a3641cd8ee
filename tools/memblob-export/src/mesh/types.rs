//! Host mesh representation and per-mesh serializer output

use memblob_shared::VertexRecord;

/// Name given to UV layers created by loaders
pub const DEFAULT_UV_LAYER: &str = "UVMap";

/// A polygon as a contiguous run of loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub loop_start: u32,
    pub loop_total: u32,
}

impl Face {
    pub fn new(loop_start: u32, loop_total: u32) -> Self {
        Self {
            loop_start,
            loop_total,
        }
    }

    pub fn is_triangle(&self) -> bool {
        self.loop_total == 3
    }

    /// Loop indices of this face, in corner order
    pub fn loops(&self) -> std::ops::Range<usize> {
        let start = self.loop_start as usize;
        start..start + self.loop_total as usize
    }
}

/// Per-loop texture coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct UvLayer {
    pub name: String,
    /// One sample per loop
    pub uvs: Vec<[f32; 2]>,
}

/// Mesh object as handed over by a scene loader
///
/// Vertices carry position and normal. Faces are runs of loops, and each loop
/// points at a vertex. UVs live on loops, so a vertex shared by several faces
/// can see several UV samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// One normal per vertex
    pub normals: Vec<[f32; 3]>,
    /// Vertex index of each loop
    pub loops: Vec<u32>,
    pub faces: Vec<Face>,
    pub uv_layers: Vec<UvLayer>,
    /// Index into `uv_layers`
    pub active_uv_layer: Option<usize>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_triangulated(&self) -> bool {
        self.faces.iter().all(Face::is_triangle)
    }

    pub fn active_uv_layer(&self) -> Option<&UvLayer> {
        self.active_uv_layer.and_then(|i| self.uv_layers.get(i))
    }
}

/// UV handling for vertices whose loops carry different UVs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UvSeamPolicy {
    /// One record per vertex using the first loop's UV
    #[default]
    FirstLoop,
    /// Extra record per additional distinct UV of a vertex
    SplitSeams,
}

/// Serialized form of a single mesh, indices local to the mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<VertexRecord>,
    pub triangles: Vec<[u32; 3]>,
    /// Vertices whose loops disagree on UV
    pub seam_vertices: usize,
}

/// Mesh-scoped export failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("mesh {mesh}: {reason}")]
    MalformedGeometry { mesh: String, reason: String },

    #[error("mesh {mesh}: {reason}")]
    MissingUv { mesh: String, reason: String },

    #[error("mesh {mesh}: {vertex_count} vertices after offset {offset} exceed u32 index range")]
    TooManyVertices {
        mesh: String,
        offset: u64,
        vertex_count: usize,
    },
}

impl ExportError {
    pub fn mesh(&self) -> &str {
        match self {
            ExportError::MalformedGeometry { mesh, .. }
            | ExportError::MissingUv { mesh, .. }
            | ExportError::TooManyVertices { mesh, .. } => mesh,
        }
    }

    pub(crate) fn malformed(mesh: &Mesh, reason: impl Into<String>) -> Self {
        ExportError::MalformedGeometry {
            mesh: mesh.name.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_uv(mesh: &Mesh, reason: impl Into<String>) -> Self {
        ExportError::MissingUv {
            mesh: mesh.name.clone(),
            reason: reason.into(),
        }
    }
}
