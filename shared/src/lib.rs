//! Shared types for webscene exporters and runtimes.

pub mod fs;
pub mod layout;
pub mod records;

pub use layout::{SceneLayout, WEB_SCENE_LAYOUT};
pub use records::{
    MeshRecord, RecordError, RendererConfig, SceneObject, SceneRecord, TextureRecord,
};
