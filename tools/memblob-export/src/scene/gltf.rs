//! glTF/GLB scene loading

use anyhow::{Context, Result};
use glam::Mat4;
use gltf::mesh::Mode;
use std::collections::HashSet;
use std::path::Path;

use super::{scene_name, LoadOptions, Scene, SceneLoader};
use crate::mesh::{ops, Face, Mesh, UvLayer};

/// Loads glTF and GLB files, one mesh per primitive
pub struct GltfLoader;

impl SceneLoader for GltfLoader {
    fn name(&self) -> &'static str {
        "gltf"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["gltf", "glb"]
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Scene> {
        let (document, buffers, _images) =
            gltf::import(path).with_context(|| format!("Failed to load glTF: {:?}", path))?;

        let mut walker = SceneWalker {
            buffers: &buffers,
            animated: animated_nodes(&document),
            options,
            meshes: Vec::new(),
        };

        match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => {
                for node in scene.nodes() {
                    walker.visit(&node, Mat4::IDENTITY)?;
                }
            }
            None => {
                // No scene graph: take meshes as-is
                for mesh in document.meshes() {
                    walker.add_mesh(&mesh, mesh_name(None, &mesh), None)?;
                }
            }
        }

        Ok(Scene {
            name: scene_name(path),
            meshes: walker.meshes,
        })
    }
}

/// Nodes moved by any animation channel
fn animated_nodes(document: &gltf::Document) -> HashSet<usize> {
    let mut nodes = HashSet::new();
    for animation in document.animations() {
        for channel in animation.channels() {
            nodes.insert(channel.target().node().index());
        }
    }
    nodes
}

fn mesh_name(node: Option<&gltf::Node>, mesh: &gltf::Mesh) -> String {
    node.and_then(|n| n.name())
        .or_else(|| mesh.name())
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh{}", mesh.index()))
}

struct SceneWalker<'a> {
    buffers: &'a [gltf::buffer::Data],
    animated: HashSet<usize>,
    options: &'a LoadOptions,
    meshes: Vec<Mesh>,
}

impl SceneWalker<'_> {
    /// Depth-first, parents before children
    fn visit(&mut self, node: &gltf::Node, parent: Mat4) -> Result<()> {
        let local = Mat4::from_cols_array_2d(&node.transform().matrix());
        let world = parent * local;

        if let Some(mesh) = node.mesh() {
            let transform = if !self.options.apply_transforms {
                None
            } else if self.animated.contains(&node.index()) {
                tracing::warn!(
                    "Node {} is animated, leaving its transform unapplied",
                    mesh_name(Some(node), &mesh)
                );
                None
            } else {
                Some(world)
            };
            self.add_mesh(&mesh, mesh_name(Some(node), &mesh), transform)?;
        }

        for child in node.children() {
            self.visit(&child, world)?;
        }
        Ok(())
    }

    fn add_mesh(&mut self, mesh: &gltf::Mesh, name: String, transform: Option<Mat4>) -> Result<()> {
        let primitive_count = mesh.primitives().count();
        for primitive in mesh.primitives() {
            let name = if primitive_count > 1 {
                format!("{}.{}", name, primitive.index())
            } else {
                name.clone()
            };
            let mut converted = convert_primitive(&primitive, self.buffers, name)?;
            if let Some(transform) = transform {
                ops::apply_transform(&mut converted, transform);
            }
            self.meshes.push(converted);
        }
        Ok(())
    }
}

/// Convert one primitive: indices become loops, vertex UVs become loop UVs
fn convert_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    name: String,
) -> Result<Mesh> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    // Positions (required)
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .with_context(|| format!("No positions in primitive {}", name))?
        .collect();

    // Indices (optional, implicit order otherwise)
    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let (loops, faces) = assemble_faces(primitive.mode(), &indices);

    // Every TEXCOORD_n set becomes a layer
    let mut uv_layers = Vec::new();
    while let Some(tex_coords) = reader.read_tex_coords(uv_layers.len() as u32) {
        let vertex_uvs: Vec<[f32; 2]> = tex_coords.into_f32().collect();
        uv_layers.push(UvLayer {
            name: format!("TEXCOORD_{}", uv_layers.len()),
            uvs: loops
                .iter()
                .map(|&v| vertex_uvs.get(v as usize).copied().unwrap_or([0.0; 2]))
                .collect(),
        });
    }

    let normals = match reader.read_normals() {
        Some(iter) => {
            let normals: Vec<[f32; 3]> = iter.collect();
            if normals.len() == positions.len() {
                normals
            } else {
                tracing::warn!("Primitive {} has mismatched normals, recalculating", name);
                ops::calc_vertex_normals(&positions, &loops, &faces)
            }
        }
        None => ops::calc_vertex_normals(&positions, &loops, &faces),
    };

    tracing::debug!(
        "Loaded primitive {}: {} vertices, {} faces, {} UV layers",
        name,
        positions.len(),
        faces.len(),
        uv_layers.len()
    );

    Ok(Mesh {
        name,
        positions,
        normals,
        loops,
        faces,
        active_uv_layer: if uv_layers.is_empty() { None } else { Some(0) },
        uv_layers,
    })
}

/// Build loops and faces for a primitive topology
///
/// Strips and fans are expanded to triangle lists. Point and line topologies
/// produce 1- and 2-corner faces, which the serializer rejects.
fn assemble_faces(mode: Mode, indices: &[u32]) -> (Vec<u32>, Vec<Face>) {
    let n = indices.len();
    let leftover = match mode {
        Mode::Triangles => n % 3,
        Mode::Lines => n % 2,
        _ => 0,
    };
    if leftover > 0 {
        tracing::warn!(
            "{:?} primitive has {} indices, dropping {} trailing",
            mode,
            n,
            leftover
        );
    }

    let corners: Vec<Vec<u32>> = match mode {
        Mode::Triangles => indices.chunks_exact(3).map(<[u32]>::to_vec).collect(),
        Mode::TriangleStrip => (0..n.saturating_sub(2))
            .map(|i| {
                if i % 2 == 0 {
                    vec![indices[i], indices[i + 1], indices[i + 2]]
                } else {
                    vec![indices[i + 1], indices[i], indices[i + 2]]
                }
            })
            .collect(),
        Mode::TriangleFan => (1..n.saturating_sub(1))
            .map(|i| vec![indices[0], indices[i], indices[i + 1]])
            .collect(),
        Mode::Points => indices.iter().map(|&i| vec![i]).collect(),
        Mode::Lines => indices.chunks_exact(2).map(<[u32]>::to_vec).collect(),
        Mode::LineStrip | Mode::LineLoop => {
            let mut lines: Vec<Vec<u32>> =
                indices.windows(2).map(<[u32]>::to_vec).collect();
            if mode == Mode::LineLoop && n > 2 {
                lines.push(vec![indices[n - 1], indices[0]]);
            }
            lines
        }
    };

    let mut loops = Vec::with_capacity(corners.iter().map(Vec::len).sum());
    let mut faces = Vec::with_capacity(corners.len());
    for face in corners {
        faces.push(Face::new(loops.len() as u32, face.len() as u32));
        loops.extend(face);
    }
    (loops, faces)
}
