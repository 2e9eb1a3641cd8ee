//! Test asset generators
//!
//! Writes small OBJ, glTF and PNG files into a temp directory so the
//! integration tests never depend on checked-in binaries.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Cube with quad faces; every face maps the full 0..1 UV square
pub const CUBE_OBJ: &str = "\
o Cube
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 5/1 6/2 7/3 8/4
f 2/1 1/2 4/3 3/4
f 6/1 2/2 3/3 7/4
f 1/1 5/2 8/3 4/4
f 8/1 7/2 3/3 4/4
f 1/1 2/2 6/3 5/4
";

/// Single UV-mapped triangle
pub const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
";

/// Triangle with no texture coordinates
pub const NO_UV_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test asset");
    path
}

/// 2x2 RGB checkerboard
pub fn generate_checkerboard_png(path: &Path) {
    let img = image::RgbImage::from_fn(2, 2, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgb([255, 255, 255])
        } else {
            image::Rgb([0, 0, 0])
        }
    });
    img.save(path).expect("Failed to write PNG");
}

/// One glTF primitive's vertex data
pub struct PrimitiveData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub indices: Vec<u32>,
    /// glTF primitive mode (4 = TRIANGLES, 1 = LINES)
    pub mode: u32,
}

/// Unit quad in the XY plane facing +Z, as two triangles
pub fn quad_primitive() -> PrimitiveData {
    PrimitiveData {
        positions: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        normals: Some(vec![[0.0, 0.0, 1.0]; 4]),
        uvs: Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        indices: vec![0, 1, 2, 0, 2, 3],
        mode: 4,
    }
}

#[derive(Default)]
struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    fn push_view(&mut self, bytes: &[u8]) -> usize {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
        }));
        self.views.len() - 1
    }

    fn push_floats<const N: usize>(&mut self, values: &[[f32; N]], ty: &str, bounds: bool) -> usize {
        let bytes: Vec<u8> = values
            .iter()
            .flatten()
            .flat_map(|f| f.to_le_bytes())
            .collect();
        let view = self.push_view(&bytes);
        let mut accessor = json!({
            "bufferView": view,
            "componentType": 5126,
            "count": values.len(),
            "type": ty,
        });
        if bounds {
            let mut min = [f32::MAX; N];
            let mut max = [f32::MIN; N];
            for value in values {
                for i in 0..N {
                    min[i] = min[i].min(value[i]);
                    max[i] = max[i].max(value[i]);
                }
            }
            accessor["min"] = json!(min.to_vec());
            accessor["max"] = json!(max.to_vec());
        }
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn push_indices(&mut self, indices: &[u32]) -> usize {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes);
        self.accessors.push(json!({
            "bufferView": view,
            "componentType": 5125,
            "count": indices.len(),
            "type": "SCALAR",
        }));
        self.accessors.len() - 1
    }
}

/// Write `<stem>.gltf` + `<stem>.bin` and return the .gltf path
///
/// `meshes` are (name, primitives); `nodes` is the raw glTF node array and
/// the single scene lists `roots`.
pub fn write_gltf(
    dir: &Path,
    stem: &str,
    meshes: Vec<(&str, Vec<PrimitiveData>)>,
    nodes: Value,
    roots: &[usize],
) -> PathBuf {
    write_gltf_animated(dir, stem, meshes, nodes, roots, None)
}

/// Like [`write_gltf`], plus a two-key translation animation on `animated_node`
pub fn write_gltf_animated(
    dir: &Path,
    stem: &str,
    meshes: Vec<(&str, Vec<PrimitiveData>)>,
    nodes: Value,
    roots: &[usize],
    animated_node: Option<usize>,
) -> PathBuf {
    let mut buffer = BufferBuilder::default();
    let mut mesh_json = Vec::new();

    for (name, primitives) in meshes {
        let mut prims = Vec::new();
        for primitive in primitives {
            let mut attributes = json!({
                "POSITION": buffer.push_floats(&primitive.positions, "VEC3", true),
            });
            if let Some(normals) = &primitive.normals {
                attributes["NORMAL"] = json!(buffer.push_floats(normals, "VEC3", false));
            }
            if let Some(uvs) = &primitive.uvs {
                attributes["TEXCOORD_0"] = json!(buffer.push_floats(uvs, "VEC2", false));
            }
            prims.push(json!({
                "attributes": attributes,
                "indices": buffer.push_indices(&primitive.indices),
                "mode": primitive.mode,
            }));
        }
        mesh_json.push(json!({ "name": name, "primitives": prims }));
    }

    let animations: Vec<Value> = animated_node
        .map(|node| {
            let times = buffer.push_floats::<1>(&[[0.0], [1.0]], "SCALAR", true);
            let offsets =
                buffer.push_floats::<3>(&[[0.0, 0.0, 0.0], [0.0, 2.0, 0.0]], "VEC3", false);
            json!({
                "channels": [{ "sampler": 0, "target": { "node": node, "path": "translation" } }],
                "samplers": [{ "input": times, "output": offsets, "interpolation": "LINEAR" }],
            })
        })
        .into_iter()
        .collect();

    let bin_name = format!("{stem}.bin");
    let mut root = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": roots }],
        "nodes": nodes,
        "meshes": mesh_json,
        "buffers": [{ "uri": bin_name, "byteLength": buffer.data.len() }],
        "bufferViews": buffer.views,
        "accessors": buffer.accessors,
    });
    if !animations.is_empty() {
        root["animations"] = json!(animations);
    }

    std::fs::write(dir.join(&bin_name), &buffer.data).expect("Failed to write glTF buffer");
    let gltf_path = dir.join(format!("{stem}.gltf"));
    std::fs::write(
        &gltf_path,
        serde_json::to_string_pretty(&root).expect("Failed to encode glTF JSON"),
    )
    .expect("Failed to write glTF");
    gltf_path
}
