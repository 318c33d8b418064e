//! Test asset generation
//!
//! Generates simple test assets for integration testing.
//! Uses proper libraries (image, bytemuck) and text formats (OBJ, glTF JSON).

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;

/// Generate a simple 4x4 checkerboard PNG
pub fn generate_checkerboard_png(path: &Path) -> std::io::Result<()> {
    let width = 4u32;
    let height = 4u32;
    let mut pixels = vec![0u8; (width * height * 4) as usize];

    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 4) as usize;
            let shade = if (x + y) % 2 == 0 { 255 } else { 96 };
            pixels[idx..idx + 4].copy_from_slice(&[shade, shade, shade, 255]);
        }
    }

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
        .map_err(std::io::Error::other)
}

/// Unit cube written as 6 quads with per-face normals and UVs
pub fn generate_cube_obj(path: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;

    writeln!(file, "# Quad cube for testing")?;
    writeln!(file, "o Cube")?;

    // Vertices (8 corners of unit cube)
    writeln!(file, "v -0.5 -0.5  0.5")?;
    writeln!(file, "v  0.5 -0.5  0.5")?;
    writeln!(file, "v  0.5  0.5  0.5")?;
    writeln!(file, "v -0.5  0.5  0.5")?;
    writeln!(file, "v -0.5 -0.5 -0.5")?;
    writeln!(file, "v  0.5 -0.5 -0.5")?;
    writeln!(file, "v  0.5  0.5 -0.5")?;
    writeln!(file, "v -0.5  0.5 -0.5")?;

    // Normals (6 face normals)
    writeln!(file, "vn  0  0  1")?;
    writeln!(file, "vn  0  0 -1")?;
    writeln!(file, "vn  1  0  0")?;
    writeln!(file, "vn -1  0  0")?;
    writeln!(file, "vn  0  1  0")?;
    writeln!(file, "vn  0 -1  0")?;

    writeln!(file, "vt 0 0")?;
    writeln!(file, "vt 1 0")?;
    writeln!(file, "vt 1 1")?;
    writeln!(file, "vt 0 1")?;

    writeln!(file, "f 1/1/1 2/2/1 3/3/1 4/4/1")?;
    writeln!(file, "f 6/1/2 5/2/2 8/3/2 7/4/2")?;
    writeln!(file, "f 2/1/3 6/2/3 7/3/3 3/4/3")?;
    writeln!(file, "f 5/1/4 1/2/4 4/3/4 8/4/4")?;
    writeln!(file, "f 4/1/5 3/2/5 7/3/5 8/4/5")?;
    writeln!(file, "f 5/1/6 6/2/6 2/3/6 1/4/6")?;

    Ok(())
}

/// Two triangles sharing an edge with identical attributes
pub fn generate_shared_edge_obj(path: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;

    writeln!(file, "v 0 0 0")?;
    writeln!(file, "v 1 0 0")?;
    writeln!(file, "v 1 1 0")?;
    writeln!(file, "v 0 1 0")?;
    writeln!(file, "vt 0 0")?;
    writeln!(file, "vt 1 0")?;
    writeln!(file, "vt 1 1")?;
    writeln!(file, "vt 0 1")?;
    writeln!(file, "vn 0 0 1")?;
    writeln!(file, "f 1/1/1 2/2/1 3/3/1")?;
    writeln!(file, "f 1/1/1 3/3/1 4/4/1")?;

    Ok(())
}

/// Triangle without normals (cannot be compiled)
pub fn generate_bare_triangle_obj(path: &Path) -> std::io::Result<()> {
    fs::write(path, "v 0 0 0\nv 1 0 0\nv 0.5 1 0\nf 1 2 3\n")
}

/// Indexed quad as .gltf JSON plus an external .bin buffer
///
/// Writes `<stem>.gltf` and `<stem>.bin` next to each other.
pub fn generate_quad_gltf(path: &Path) -> std::io::Result<()> {
    let positions: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];
    let normals: [[f32; 3]; 4] = [[0.0, 0.0, 1.0]; 4];
    let uvs: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];

    let mut bin = Vec::new();
    bin.extend_from_slice(bytemuck::cast_slice(&positions)); // 0..48
    bin.extend_from_slice(bytemuck::cast_slice(&normals)); // 48..96
    bin.extend_from_slice(bytemuck::cast_slice(&uvs)); // 96..128
    bin.extend_from_slice(bytemuck::cast_slice(&indices)); // 128..140

    let bin_name = format!(
        "{}.bin",
        path.file_stem().and_then(|s| s.to_str()).unwrap_or("mesh")
    );
    fs::write(path.with_file_name(&bin_name), &bin)?;

    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "buffers": [{{ "uri": "{bin_name}", "byteLength": {len} }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 48 }},
    {{ "buffer": 0, "byteOffset": 48, "byteLength": 48 }},
    {{ "buffer": 0, "byteOffset": 96, "byteLength": 32 }},
    {{ "buffer": 0, "byteOffset": 128, "byteLength": 12 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 4, "type": "VEC3" }},
    {{ "bufferView": 2, "componentType": 5126, "count": 4, "type": "VEC2" }},
    {{ "bufferView": 3, "componentType": 5123, "count": 6, "type": "SCALAR" }}
  ],
  "meshes": [{{
    "name": "Quad",
    "primitives": [{{
      "attributes": {{ "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 }},
      "indices": 3
    }}]
  }}]
}}
"#,
        bin_name = bin_name,
        len = bin.len()
    );
    fs::write(path, json)
}

/// glTF mesh whose only primitive draws points (no triangles to compile)
pub fn generate_points_gltf(path: &Path) -> std::io::Result<()> {
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let bin: &[u8] = bytemuck::cast_slice(&positions);

    let bin_name = format!(
        "{}.bin",
        path.file_stem().and_then(|s| s.to_str()).unwrap_or("mesh")
    );
    fs::write(path.with_file_name(&bin_name), bin)?;

    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "buffers": [{{ "uri": "{bin_name}", "byteLength": {len} }}],
  "bufferViews": [{{ "buffer": 0, "byteOffset": 0, "byteLength": {len} }}],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0] }}
  ],
  "meshes": [{{
    "name": "Cloud",
    "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "mode": 0 }}]
  }}]
}}
"#,
        bin_name = bin_name,
        len = bin.len()
    );
    fs::write(path, json)
}
