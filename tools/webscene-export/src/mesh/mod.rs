//! Mesh compiler (faces -> indexed vertex buffer) and host adapters

mod compiler;
mod error;
mod gltf;
mod hash;
mod obj;
mod types;

use anyhow::Result;
use std::path::Path;

// Re-export public API
pub use compiler::{
    compile, swizzle_for, FaceAttributeProvider, VertexBufferCompiler, QUAD_SWIZZLE,
    TRIANGLE_SWIZZLE,
};
pub use error::{FaceDefect, MeshError, ProviderError};
pub use self::gltf::{compile_gltf, GltfAttributeError, GltfFace, GltfMesh, GltfPrimitive};
pub use hash::structural_hash;
pub use obj::{compile_obj, ObjAttributeError, ObjCorner, ObjFace, ObjMesh};
pub use types::{
    CompiledMesh, CornerAttributes, VertexAttributes, MAX_U16_VERTICES, NORMAL_COMPONENTS,
    POSITION_COMPONENTS, TEX_COORD_COMPONENTS,
};

/// Compile a mesh file, detecting the format by extension.
///
/// `mesh_index` selects a mesh inside glTF files and is ignored for OBJ.
pub fn compile_file(input: &Path, mesh_index: Option<usize>) -> Result<CompiledMesh> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => compile_obj(input),
        "gltf" | "glb" => compile_gltf(input, mesh_index),
        _ => anyhow::bail!(
            "Unsupported mesh format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    }
}
