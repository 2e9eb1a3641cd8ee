//! OBJ scene loading

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{scene_name, LoadOptions, Scene, SceneLoader};
use crate::mesh::{ops, Face, Mesh, UvLayer, DEFAULT_UV_LAYER};

/// Loads Wavefront OBJ files, one mesh per `o`/`g` object
pub struct ObjLoader;

impl SceneLoader for ObjLoader {
    fn name(&self) -> &'static str {
        "obj"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }

    fn load(&self, path: &Path, _options: &LoadOptions) -> Result<Scene> {
        let file = File::open(path).with_context(|| format!("Failed to open OBJ: {:?}", path))?;
        parse_obj(BufReader::new(file), &scene_name(path))
            .with_context(|| format!("Failed to parse OBJ: {:?}", path))
    }
}

/// Faces of one OBJ object, still using file-global indices
#[derive(Default)]
struct ObjObject {
    name: String,
    /// (position index, texcoord index) per corner
    corners: Vec<(usize, Option<usize>)>,
    face_sizes: Vec<u32>,
}

/// Parse OBJ text into a scene
///
/// Faces are kept as authored, so quads and ngons come out as such. Vertex
/// normals are recalculated from the geometry; `vn` records are ignored.
pub fn parse_obj<R: BufRead>(reader: R, name: &str) -> Result<Scene> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut objects: Vec<ObjObject> = vec![ObjObject {
        name: name.to_string(),
        ..Default::default()
    }];

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "v" if parts.len() >= 4 => {
                let x: f32 = parts[1].parse().unwrap_or(0.0);
                let y: f32 = parts[2].parse().unwrap_or(0.0);
                let z: f32 = parts[3].parse().unwrap_or(0.0);
                positions.push([x, y, z]);
            }
            "vt" if parts.len() >= 3 => {
                let u: f32 = parts[1].parse().unwrap_or(0.0);
                let v: f32 = parts[2].parse().unwrap_or(0.0);
                tex_coords.push([u, v]);
            }
            "o" | "g" => {
                let object_name = parts[1..].join(" ");
                let object_name = if object_name.is_empty() {
                    name.to_string()
                } else {
                    object_name
                };
                match objects.last_mut() {
                    Some(current) if current.face_sizes.is_empty() => current.name = object_name,
                    _ => objects.push(ObjObject {
                        name: object_name,
                        ..Default::default()
                    }),
                }
            }
            "f" => {
                let corners: Option<Vec<(usize, Option<usize>)>> = parts[1..]
                    .iter()
                    .map(|v| parse_obj_vertex(v, positions.len(), tex_coords.len()))
                    .collect();

                // One unresolvable corner invalidates the whole face
                let Some(corners) = corners else {
                    tracing::warn!(
                        "OBJ line {}: face references a missing vertex, skipped",
                        line_no + 1
                    );
                    continue;
                };
                if corners.len() < 3 {
                    tracing::warn!(
                        "OBJ line {}: face with {} corners skipped",
                        line_no + 1,
                        corners.len()
                    );
                    continue;
                }

                if let Some(current) = objects.last_mut() {
                    current.face_sizes.push(corners.len() as u32);
                    current.corners.extend(corners);
                }
            }
            _ => {}
        }
    }

    let meshes: Vec<Mesh> = objects
        .into_iter()
        .filter(|object| !object.face_sizes.is_empty())
        .map(|object| build_mesh(object, &positions, &tex_coords))
        .collect();

    tracing::debug!(
        "Parsed OBJ {}: {} positions, {} texcoords, {} objects",
        name,
        positions.len(),
        tex_coords.len(),
        meshes.len()
    );

    Ok(Scene {
        name: name.to_string(),
        meshes,
    })
}

/// Turn one object into a mesh with object-local vertices
fn build_mesh(object: ObjObject, positions: &[[f32; 3]], tex_coords: &[[f32; 2]]) -> Mesh {
    // Referenced vertices, in file order
    let mut used: Vec<usize> = object.corners.iter().map(|&(vi, _)| vi).collect();
    used.sort_unstable();
    used.dedup();

    let local = |vi: usize| used.binary_search(&vi).unwrap_or(0) as u32;
    let loops: Vec<u32> = object.corners.iter().map(|&(vi, _)| local(vi)).collect();

    let mut faces = Vec::with_capacity(object.face_sizes.len());
    let mut loop_start = 0u32;
    for &size in &object.face_sizes {
        faces.push(Face::new(loop_start, size));
        loop_start += size;
    }

    let has_uvs = object.corners.iter().any(|&(_, vti)| vti.is_some());
    let uv_layers = if has_uvs {
        vec![UvLayer {
            name: DEFAULT_UV_LAYER.to_string(),
            uvs: object
                .corners
                .iter()
                .map(|&(_, vti)| vti.and_then(|ti| tex_coords.get(ti).copied()).unwrap_or([0.0; 2]))
                .collect(),
        }]
    } else {
        Vec::new()
    };

    let positions: Vec<[f32; 3]> = used.iter().map(|&vi| positions[vi]).collect();
    let normals = ops::calc_vertex_normals(&positions, &loops, &faces);

    Mesh {
        name: object.name,
        positions,
        normals,
        loops,
        faces,
        active_uv_layer: if has_uvs { Some(0) } else { None },
        uv_layers,
    }
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
///
/// Indices are 1-based; negative indices count back from the latest element.
fn parse_obj_vertex(s: &str, position_count: usize, tex_coord_count: usize) -> Option<(usize, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = resolve_index(parts.first()?, position_count)?;

    let vti = match parts.get(1).filter(|s| !s.is_empty()) {
        Some(s) => Some(resolve_index(s, tex_coord_count)?),
        None => None,
    };

    Some((vi, vti))
}

fn resolve_index(s: &str, count: usize) -> Option<usize> {
    let raw: i64 = s.parse().ok()?;
    let index = if raw < 0 {
        count as i64 + raw
    } else {
        raw - 1
    };
    (0..count as i64).contains(&index).then_some(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Scene {
        parse_obj(Cursor::new(text), "test").unwrap()
    }

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn test_quad_keeps_ngon() {
        let scene = parse(QUAD);
        assert_eq!(scene.meshes.len(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name, "test");
        assert_eq!(mesh.faces, vec![Face::new(0, 4)]);
        assert_eq!(mesh.loops, vec![0, 1, 2, 3]);
        assert_eq!(mesh.uv_layers[0].uvs[2], [1.0, 1.0]);
        assert_eq!(mesh.active_uv_layer, Some(0));
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_objects_get_local_vertices() {
        let scene = parse(
            "\
o First
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o Second
v 5 0 0
v 6 0 0
v 5 1 0
f 4 5 6
",
        );
        assert_eq!(scene.meshes.len(), 2);
        assert_eq!(scene.meshes[0].name, "First");
        assert_eq!(scene.meshes[1].name, "Second");
        assert_eq!(scene.meshes[1].loops, vec![0, 1, 2]);
        assert_eq!(scene.meshes[1].positions[0], [5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_texcoords_means_no_uv_layer() {
        let scene = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = &scene.meshes[0];
        assert!(mesh.uv_layers.is_empty());
        assert_eq!(mesh.active_uv_layer, None);
    }

    #[test]
    fn test_negative_indices_and_normal_refs() {
        let scene = parse(
            "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.5 0.5
vn 0 0 1
f -3/-1/1 -2/-1/1 -1//1
",
        );
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.loops, vec![0, 1, 2]);
        // Third corner has no texcoord, falls back to origin
        assert_eq!(mesh.uv_layers[0].uvs, vec![[0.5, 0.5], [0.5, 0.5], [0.0, 0.0]]);
    }

    #[test]
    fn test_unused_vertices_are_dropped() {
        let scene = parse("v 9 9 9\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 2 3 4\n");
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.loops, vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_range_corner_skips_face() {
        let scene = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 7\nf 1 2 3\n");
        assert_eq!(scene.meshes[0].faces.len(), 1);
    }

    #[test]
    fn test_quad_with_missing_corner_is_not_shrunk() {
        let scene = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3 9\n");
        assert!(scene.meshes.is_empty());

        let scene = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 4 9\nf 1 2 3\n");
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.faces, vec![Face::new(0, 3)]);
        assert_eq!(mesh.loops, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_tex_coord_skips_face() {
        let scene = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/5\n");
        assert!(scene.meshes.is_empty());
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index("1", 3), Some(0));
        assert_eq!(resolve_index("-1", 3), Some(2));
        assert_eq!(resolve_index("0", 3), None);
        assert_eq!(resolve_index("4", 3), None);
        assert_eq!(resolve_index("x", 3), None);
    }
}
