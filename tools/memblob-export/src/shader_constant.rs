//! Image -> shader constant array (PNG/JPG -> .cginc)
//!
//! Bakes an image into a GLSL `const float` array so lookup tables such as
//! blue noise ship inside shader source instead of as a texture.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use memblob_shared::fs::{read_file_with_limit, MAX_IMAGE_BYTES};

/// Array name used when none is given
pub const DEFAULT_ARRAY_NAME: &str = "blueNoise";
/// Four RGB triplets per line
pub const DEFAULT_VALUES_PER_LINE: usize = 12;

#[derive(Debug, Clone)]
pub struct ShaderConstantOptions {
    pub name: String,
    pub values_per_line: usize,
}

impl Default for ShaderConstantOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_ARRAY_NAME.to_string(),
            values_per_line: DEFAULT_VALUES_PER_LINE,
        }
    }
}

/// Convert an image file to a shader constant source file
pub fn convert_image(input: &Path, output: &Path, options: &ShaderConstantOptions) -> Result<()> {
    let source = render_image(input, options)?;
    std::fs::write(output, &source)
        .with_context(|| format!("Failed to write output: {:?}", output))?;
    Ok(())
}

/// Load an image and render it as array source
pub fn render_image(input: &Path, options: &ShaderConstantOptions) -> Result<String> {
    let bytes = read_file_with_limit(input, MAX_IMAGE_BYTES)?;
    let img = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to load image: {:?}", input))?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let values: Vec<f32> = rgb.as_raw().iter().map(|&c| c as f32 / 255.0).collect();

    tracing::info!(
        "Converted image {:?}: {}x{}, {} values",
        input,
        width,
        height,
        values.len()
    );

    render_constant_array(&options.name, &values, options.values_per_line)
}

/// Render `const float name[N] = float[](...);` with fixed six-decimal values
pub fn render_constant_array(name: &str, values: &[f32], values_per_line: usize) -> Result<String> {
    if values_per_line == 0 {
        anyhow::bail!("values_per_line must be at least 1");
    }
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        anyhow::bail!("Invalid array name: {:?}", name);
    }

    let mut out = String::new();
    writeln!(out, "const float {}[{}] = float[](", name, values.len())?;

    let lines: Vec<String> = values
        .chunks(values_per_line)
        .map(|line| {
            let formatted: Vec<String> = line.iter().map(|v| format!("{:.6}", v)).collect();
            format!("    {}", formatted.join(", "))
        })
        .collect();
    if !lines.is_empty() {
        out.push_str(&lines.join(",\n"));
        out.push('\n');
    }

    out.push_str(");\n");
    Ok(out)
}
