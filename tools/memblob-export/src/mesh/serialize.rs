//! Raw mesh serializer
//!
//! Turns an ordered list of triangulated meshes into one global vertex buffer
//! (8 floats per vertex) and one global index buffer (3 u32 per triangle).
//! Each mesh is processed on its own into [`MeshBuffers`]; failures are logged
//! and skipped, and only successful meshes advance the running vertex offset.

use std::collections::HashMap;

use memblob_shared::{encode_triangles, encode_vertices, VertexRecord};

use super::types::{ExportError, Mesh, MeshBuffers, UvSeamPolicy};

/// Indices must stay addressable as u32 across the whole export
const MAX_GLOBAL_VERTICES: u64 = u32::MAX as u64 + 1;

/// Bookkeeping for one mesh that made it into the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshSummary {
    pub name: String,
    /// Global index of this mesh's first vertex
    pub first_vertex: u32,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub seam_vertices: usize,
}

/// Global buffers for one export run
#[derive(Debug, Clone, Default)]
pub struct SerializedMeshes {
    pub vertices: Vec<VertexRecord>,
    pub triangles: Vec<[u32; 3]>,
    pub exported: Vec<MeshSummary>,
    pub skipped: Vec<ExportError>,
}

impl SerializedMeshes {
    /// Contents of the .vnuv file
    pub fn vertex_bytes(&self) -> Vec<u8> {
        encode_vertices(&self.vertices)
    }

    /// Contents of the .vti file
    pub fn index_bytes(&self) -> Vec<u8> {
        encode_triangles(&self.triangles)
    }

    fn vertex_offset(&self) -> u64 {
        self.vertices.len() as u64
    }

    /// Append one mesh block, rebasing its local indices
    fn append(&mut self, name: &str, buffers: MeshBuffers) -> Result<(), ExportError> {
        let offset = self.vertex_offset();
        if offset + buffers.vertices.len() as u64 > MAX_GLOBAL_VERTICES {
            return Err(ExportError::TooManyVertices {
                mesh: name.to_string(),
                offset,
                vertex_count: buffers.vertices.len(),
            });
        }
        // Checked above: every rebased index fits in u32
        let base = offset as u32;

        self.exported.push(MeshSummary {
            name: name.to_string(),
            first_vertex: base,
            vertex_count: buffers.vertices.len(),
            triangle_count: buffers.triangles.len(),
            seam_vertices: buffers.seam_vertices,
        });
        self.vertices.extend(buffers.vertices);
        self.triangles.extend(
            buffers
                .triangles
                .into_iter()
                .map(|tri| tri.map(|i| i + base)),
        );
        Ok(())
    }
}

/// Serialize meshes into (.vnuv bytes, .vti bytes)
///
/// Meshes that fail are left out of both buffers. Uses the first-loop UV of
/// every vertex.
pub fn serialize<'a, I>(meshes: I) -> (Vec<u8>, Vec<u8>)
where
    I: IntoIterator<Item = &'a Mesh>,
{
    let serialized = serialize_meshes(meshes, UvSeamPolicy::FirstLoop);
    (serialized.vertex_bytes(), serialized.index_bytes())
}

/// Serialize meshes in order, keeping per-mesh results
pub fn serialize_meshes<'a, I>(meshes: I, policy: UvSeamPolicy) -> SerializedMeshes
where
    I: IntoIterator<Item = &'a Mesh>,
{
    let mut out = SerializedMeshes::default();

    for mesh in meshes {
        let result =
            process_mesh(mesh, policy).and_then(|buffers| out.append(&mesh.name, buffers));

        match result {
            Ok(()) => {
                if let Some(summary) = out.exported.last() {
                    tracing::info!(
                        "Exported mesh {}: {} vertices, {} triangles",
                        summary.name,
                        summary.vertex_count,
                        summary.triangle_count
                    );
                    if summary.seam_vertices > 0 && policy == UvSeamPolicy::FirstLoop {
                        tracing::warn!(
                            "Mesh {}: {} vertices sit on UV seams, kept first-loop UV only",
                            summary.name,
                            summary.seam_vertices
                        );
                    }
                }
            }
            Err(err) => {
                tracing::warn!("Failed to process mesh {}: {}", mesh.name, err);
                out.skipped.push(err);
            }
        }
    }

    out
}

/// Serialize a single mesh with mesh-local indices
pub fn process_mesh(mesh: &Mesh, policy: UvSeamPolicy) -> Result<MeshBuffers, ExportError> {
    check_topology(mesh)?;

    let layer = match mesh.active_uv_layer() {
        Some(layer) => layer,
        None if mesh.uv_layers.is_empty() => {
            return Err(ExportError::missing_uv(mesh, "no UV layer"));
        }
        None => return Err(ExportError::missing_uv(mesh, "no active UV layer")),
    };
    if layer.uvs.len() != mesh.loops.len() {
        return Err(ExportError::missing_uv(
            mesh,
            format!(
                "UV layer {} has {} samples for {} loops",
                layer.name,
                layer.uvs.len(),
                mesh.loops.len()
            ),
        ));
    }
    let uvs = &layer.uvs;

    let mut first_loop: Vec<Option<usize>> = vec![None; mesh.vertex_count()];
    for (loop_index, &vertex) in mesh.loops.iter().enumerate() {
        first_loop[vertex as usize].get_or_insert(loop_index);
    }

    let mut vertices = Vec::with_capacity(mesh.vertex_count());
    for (vertex, first) in first_loop.iter().enumerate() {
        let Some(loop_index) = *first else {
            return Err(ExportError::missing_uv(
                mesh,
                format!("no UV data for vertex {vertex}"),
            ));
        };
        vertices.push(VertexRecord::new(
            mesh.positions[vertex],
            mesh.normals[vertex],
            uvs[loop_index],
        ));
    }

    // Corner -> emitted vertex, identity unless seams get split
    let mut corner_target: Vec<u32> = mesh.loops.clone();
    let mut seam = vec![false; mesh.vertex_count()];
    let mut duplicates: HashMap<(u32, [u32; 2]), u32> = HashMap::new();

    for (loop_index, &vertex) in mesh.loops.iter().enumerate() {
        let v = vertex as usize;
        let uv = uvs[loop_index];
        if same_uv(uv, vertices[v].uv) {
            continue;
        }
        seam[v] = true;

        if policy == UvSeamPolicy::SplitSeams {
            let key = (vertex, uv.map(f32::to_bits));
            let target = match duplicates.get(&key) {
                Some(&target) => target,
                None => {
                    let target = local_index(mesh, vertices.len())?;
                    vertices.push(VertexRecord::new(
                        mesh.positions[v],
                        mesh.normals[v],
                        uv,
                    ));
                    duplicates.insert(key, target);
                    target
                }
            };
            corner_target[loop_index] = target;
        }
    }

    let triangles = mesh
        .faces
        .iter()
        .map(|face| {
            let start = face.loop_start as usize;
            [
                corner_target[start],
                corner_target[start + 1],
                corner_target[start + 2],
            ]
        })
        .collect();

    tracing::trace!(
        "Mesh {}: {} records from {} vertices",
        mesh.name,
        vertices.len(),
        mesh.vertex_count()
    );

    Ok(MeshBuffers {
        vertices,
        triangles,
        seam_vertices: seam.iter().filter(|&&s| s).count(),
    })
}

/// Every face a triangle, every reference in range
fn check_topology(mesh: &Mesh) -> Result<(), ExportError> {
    if let Some((index, face)) = mesh
        .faces
        .iter()
        .enumerate()
        .find(|(_, face)| !face.is_triangle())
    {
        return Err(ExportError::malformed(
            mesh,
            format!(
                "non-triangular face {index} with {} corners",
                face.loop_total
            ),
        ));
    }

    if mesh.normals.len() != mesh.vertex_count() {
        return Err(ExportError::malformed(
            mesh,
            format!(
                "{} normals for {} vertices",
                mesh.normals.len(),
                mesh.vertex_count()
            ),
        ));
    }

    if let Some((index, face)) = mesh
        .faces
        .iter()
        .enumerate()
        .find(|(_, face)| face.loops().end > mesh.loops.len())
    {
        return Err(ExportError::malformed(
            mesh,
            format!(
                "face {index} reads loops {:?} of {}",
                face.loops(),
                mesh.loops.len()
            ),
        ));
    }

    if let Some((index, vertex)) = mesh
        .loops
        .iter()
        .enumerate()
        .find(|(_, vertex)| **vertex as usize >= mesh.vertex_count())
    {
        return Err(ExportError::malformed(
            mesh,
            format!(
                "loop {index} references vertex {vertex} of {}",
                mesh.vertex_count()
            ),
        ));
    }

    Ok(())
}

fn local_index(mesh: &Mesh, index: usize) -> Result<u32, ExportError> {
    u32::try_from(index).map_err(|_| ExportError::TooManyVertices {
        mesh: mesh.name.clone(),
        offset: 0,
        vertex_count: index + 1,
    })
}

fn same_uv(a: [f32; 2], b: [f32; 2]) -> bool {
    a.map(f32::to_bits) == b.map(f32::to_bits)
}
