//! Host-side mesh operators
//!
//! Loaders hand over faces as authored. These run before serialization and
//! stand in for the scene host's triangulate and normal-recalculation steps.

use glam::{Mat3, Mat4, Vec3};

use super::types::{Face, Mesh, UvLayer};

/// Normal given to vertices with no usable face around them
const FALLBACK_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Fan-triangulate every face with more than three corners
///
/// Loop UVs are copied onto the new corners. Faces with fewer than three
/// corners cannot be triangulated and are carried over unchanged.
pub fn triangulate(mesh: &Mesh) -> Mesh {
    let mut loops = Vec::with_capacity(mesh.loops.len());
    let mut faces = Vec::with_capacity(mesh.faces.len());
    let mut uv_layers: Vec<UvLayer> = mesh
        .uv_layers
        .iter()
        .map(|layer| UvLayer {
            name: layer.name.clone(),
            uvs: Vec::with_capacity(layer.uvs.len()),
        })
        .collect();

    let mut push_face = |corners: &[usize]| {
        faces.push(Face::new(loops.len() as u32, corners.len() as u32));
        for &corner in corners {
            loops.push(mesh.loops.get(corner).copied().unwrap_or(u32::MAX));
            for (dst, src) in uv_layers.iter_mut().zip(&mesh.uv_layers) {
                dst.uvs.push(src.uvs.get(corner).copied().unwrap_or([0.0, 0.0]));
            }
        }
    };

    for face in &mesh.faces {
        let corners: Vec<usize> = face.loops().collect();
        if corners.len() <= 3 {
            push_face(&corners);
            continue;
        }
        // Fan triangulation for convex polygons
        for i in 1..corners.len() - 1 {
            push_face(&[corners[0], corners[i], corners[i + 1]]);
        }
    }

    tracing::debug!(
        "Triangulated mesh {}: {} faces -> {} faces",
        mesh.name,
        mesh.faces.len(),
        faces.len()
    );

    Mesh {
        name: mesh.name.clone(),
        positions: mesh.positions.clone(),
        normals: mesh.normals.clone(),
        loops,
        faces,
        uv_layers,
        active_uv_layer: mesh.active_uv_layer,
    }
}

/// Area-weighted vertex normals from face geometry
///
/// Each face contributes its Newell normal (length proportional to its area)
/// to every corner vertex.
pub fn calc_vertex_normals(positions: &[[f32; 3]], loops: &[u32], faces: &[Face]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for face in faces {
        let Some(corners) = loops.get(face.loops()) else {
            continue;
        };
        if corners.len() < 3 {
            continue;
        }
        let Some(points) = corners
            .iter()
            .map(|&v| positions.get(v as usize).copied().map(Vec3::from))
            .collect::<Option<Vec<Vec3>>>()
        else {
            continue;
        };

        let mut normal = Vec3::ZERO;
        for (i, cur) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            normal.x += (cur.y - next.y) * (cur.z + next.z);
            normal.y += (cur.z - next.z) * (cur.x + next.x);
            normal.z += (cur.x - next.x) * (cur.y + next.y);
        }

        for &v in corners {
            sums[v as usize] += normal;
        }
    }

    sums.into_iter()
        .map(|n| {
            n.try_normalize()
                .map(|n| n.to_array())
                .unwrap_or(FALLBACK_NORMAL)
        })
        .collect()
}

/// Bake a world transform into positions and normals
pub fn apply_transform(mesh: &mut Mesh, transform: Mat4) {
    if transform == Mat4::IDENTITY {
        return;
    }
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

    for position in &mut mesh.positions {
        *position = transform.transform_point3(Vec3::from(*position)).to_array();
    }
    for normal in &mut mesh.normals {
        *normal = (normal_matrix * Vec3::from(*normal))
            .try_normalize()
            .map(|n| n.to_array())
            .unwrap_or(FALLBACK_NORMAL);
    }

    // Mirroring transforms flip winding; keep faces front-facing
    if transform.determinant() < 0.0 {
        flip_faces(mesh);
    }
}

/// Reverse corner order of every face
fn flip_faces(mesh: &mut Mesh) {
    for face in &mesh.faces {
        let range = face.loops();
        if range.end > mesh.loops.len() {
            continue;
        }
        mesh.loops[range.clone()].reverse();
        for layer in &mut mesh.uv_layers {
            if let Some(uvs) = layer.uvs.get_mut(range.clone()) {
                uvs.reverse();
            }
        }
    }
}
