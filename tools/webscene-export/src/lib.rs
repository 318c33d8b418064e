//! webscene-export library
//!
//! Compiles meshes into indexed vertex buffers and packages them as scene
//! records for web runtimes.

pub mod formats;
pub mod manifest;
pub mod mesh;
pub mod runtime;
pub mod scene;

// Re-export the compiler entry points
pub use mesh::{compile, compile_file, CompiledMesh, FaceAttributeProvider, MeshError, VertexBufferCompiler};

// Re-export record encoding
pub use formats::{format_number, mesh_record_string, write_mesh_record, FormatError};

// Re-export layout and record types from shared
pub use webscene_shared::{MeshRecord, SceneRecord, WEB_SCENE_LAYOUT};
