//! Blob file writers
//!
//! Re-exports the raw formats from memblob-shared for writing export files.

pub use memblob_shared::formats::*;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memblob_shared::MEMBLOB_FORMAT;

/// Write a complete .vnuv stream (no header)
pub fn write_vnuv<W: Write>(w: &mut W, vertices: &[VertexRecord]) -> Result<()> {
    w.write_all(&encode_vertices(vertices))?;
    Ok(())
}

/// Write a complete .vti stream (no header)
pub fn write_vti<W: Write>(w: &mut W, triangles: &[[u32; 3]]) -> Result<()> {
    w.write_all(&encode_triangles(triangles))?;
    Ok(())
}

/// Write the vertex/index pair to disk
pub fn write_blob_pair(
    vnuv_path: &Path,
    vti_path: &Path,
    vertices: &[VertexRecord],
    triangles: &[[u32; 3]],
) -> Result<()> {
    let file = File::create(vnuv_path)
        .with_context(|| format!("Failed to create output: {:?}", vnuv_path))?;
    let mut writer = BufWriter::new(file);
    write_vnuv(&mut writer, vertices)?;
    writer.flush()?;
    tracing::info!(
        "Wrote {} floats ({} bytes) to {:?}",
        vertices.len() * MEMBLOB_FORMAT.floats_per_vertex,
        vertices.len() * MEMBLOB_FORMAT.vertex_stride(),
        vnuv_path
    );

    let file =
        File::create(vti_path).with_context(|| format!("Failed to create output: {:?}", vti_path))?;
    let mut writer = BufWriter::new(file);
    write_vti(&mut writer, triangles)?;
    writer.flush()?;
    tracing::info!(
        "Wrote {} indices ({} bytes) to {:?}",
        triangles.len() * MEMBLOB_FORMAT.indices_per_triangle,
        triangles.len() * MEMBLOB_FORMAT.triangle_stride(),
        vti_path
    );

    Ok(())
}
