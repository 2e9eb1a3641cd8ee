//! Read back a .vnuv/.vti pair and check it is self-consistent

use anyhow::{Context, Result};
use std::path::Path;

use memblob_shared::fs::{read_file_with_limit, MAX_BLOB_BYTES};
use memblob_shared::{decode_triangles, decode_vertices, validate_triangles};

use crate::export::blob_paths;

#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Position bounds, `None` for an empty blob
    pub bounds: Option<([f32; 3], [f32; 3])>,
}

/// Decode `<base>.vnuv` and `<base>.vti`, checking every index is in range
pub fn inspect_blob_pair(base: &Path) -> Result<InspectReport> {
    let (vnuv_path, vti_path) = blob_paths(base);

    let vertices = decode_vertices(&read_file_with_limit(&vnuv_path, MAX_BLOB_BYTES)?)
        .with_context(|| format!("Invalid vertex blob: {:?}", vnuv_path))?;
    let triangles = decode_triangles(&read_file_with_limit(&vti_path, MAX_BLOB_BYTES)?)
        .with_context(|| format!("Invalid index blob: {:?}", vti_path))?;
    validate_triangles(&triangles, vertices.len())
        .with_context(|| format!("Index blob does not match vertex blob: {:?}", vti_path))?;

    let bounds = vertices.iter().fold(None, |acc: Option<([f32; 3], [f32; 3])>, v| {
        let (mut min, mut max) = acc.unwrap_or((v.position, v.position));
        for axis in 0..3 {
            min[axis] = min[axis].min(v.position[axis]);
            max[axis] = max[axis].max(v.position[axis]);
        }
        Some((min, max))
    });

    Ok(InspectReport {
        vertex_count: vertices.len(),
        triangle_count: triangles.len(),
        bounds,
    })
}
