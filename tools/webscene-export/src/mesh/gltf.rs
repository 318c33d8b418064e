//! glTF/GLB host adapter

use anyhow::{bail, Context, Result};
use std::path::Path;

use super::compiler::{compile, FaceAttributeProvider};
use super::types::{CompiledMesh, CornerAttributes};

/// Vertex streams of one triangle-mode primitive.
#[derive(Debug, Clone, Default)]
pub struct GltfPrimitive {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
}

/// A triangle referencing vertices of one primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GltfFace {
    pub primitive: usize,
    pub corners: [u32; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GltfAttributeError {
    #[error("primitive {0} does not exist")]
    PrimitiveOutOfRange(usize),
    #[error("primitive {0} has no NORMAL attribute")]
    MissingNormals(usize),
    #[error("primitive {primitive} index {index} out of range")]
    IndexOutOfRange { primitive: usize, index: u32 },
}

/// Triangles of one glTF mesh, gathered from all triangle-mode primitives.
#[derive(Debug, Clone, Default)]
pub struct GltfMesh {
    pub name: Option<String>,
    pub primitives: Vec<GltfPrimitive>,
    pub faces: Vec<GltfFace>,
}

impl GltfMesh {
    /// Load mesh `mesh_index` (default: first mesh) from a glTF/GLB file.
    pub fn load(input: &Path, mesh_index: Option<usize>) -> Result<Self> {
        let (document, buffers, _images) =
            gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

        let index = mesh_index.unwrap_or(0);
        let mesh = document
            .meshes()
            .nth(index)
            .with_context(|| format!("Mesh {} not found in glTF", index))?;

        let mut out = GltfMesh {
            name: mesh.name().map(str::to_string),
            ..Default::default()
        };

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::warn!(
                    "Skipping primitive {} of mesh {}: mode {:?} is not triangles",
                    primitive.index(),
                    index,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .context("No positions in primitive")?
                .collect();
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());
            let tex_coords: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect());

            // Non-indexed primitives draw vertices in order
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            if indices.len() % 3 != 0 {
                tracing::warn!(
                    "Primitive {} has {} indices, ignoring trailing partial triangle",
                    primitive.index(),
                    indices.len()
                );
            }

            let slot = out.primitives.len();
            out.faces.extend(indices.chunks_exact(3).map(|tri| GltfFace {
                primitive: slot,
                corners: [tri[0], tri[1], tri[2]],
            }));
            out.primitives.push(GltfPrimitive {
                positions,
                normals,
                tex_coords,
            });
        }

        if out.faces.is_empty() {
            bail!("No triangles found in glTF mesh {}", index);
        }

        Ok(out)
    }

    pub fn compile(&self) -> Result<CompiledMesh> {
        compile(&self.faces, self).context("Failed to compile glTF mesh")
    }
}

impl FaceAttributeProvider for GltfMesh {
    type Face = GltfFace;
    type Error = GltfAttributeError;

    fn corner_count(&self, _face: &GltfFace) -> usize {
        3
    }

    fn corner(&self, face: &GltfFace, corner: usize) -> Result<CornerAttributes<'_>, GltfAttributeError> {
        let primitive = self
            .primitives
            .get(face.primitive)
            .ok_or(GltfAttributeError::PrimitiveOutOfRange(face.primitive))?;
        let index = face.corners[corner];
        let out_of_range = GltfAttributeError::IndexOutOfRange {
            primitive: face.primitive,
            index,
        };
        let i = index as usize;

        let position = primitive.positions.get(i).ok_or(out_of_range.clone())?;
        let normal = primitive
            .normals
            .as_ref()
            .ok_or(GltfAttributeError::MissingNormals(face.primitive))?
            .get(i)
            .ok_or(out_of_range.clone())?;
        let tex_coord = match &primitive.tex_coords {
            Some(uvs) => Some(uvs.get(i).ok_or(out_of_range)?.as_slice()),
            None => None,
        };

        Ok(CornerAttributes {
            position: position.as_slice(),
            normal: normal.as_slice(),
            tex_coord,
        })
    }
}

/// Load and compile one mesh of a glTF/GLB file.
pub fn compile_gltf(input: &Path, mesh_index: Option<usize>) -> Result<CompiledMesh> {
    let mesh = GltfMesh::load(input, mesh_index)?;
    mesh.compile()
        .with_context(|| format!("Failed to compile glTF: {:?}", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(normals: bool, uvs: bool) -> GltfMesh {
        GltfMesh {
            name: Some("Strip".to_string()),
            primitives: vec![GltfPrimitive {
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
                normals: normals.then(|| vec![[0.0, 0.0, 1.0]; 4]),
                tex_coords: uvs.then(|| vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            }],
            faces: vec![
                GltfFace {
                    primitive: 0,
                    corners: [0, 1, 2],
                },
                GltfFace {
                    primitive: 0,
                    corners: [0, 2, 3],
                },
            ],
        }
    }

    #[test]
    fn indexed_triangles_share_vertices() {
        let compiled = strip(true, true).compile().unwrap();
        assert_eq!(compiled.vertex_count(), 4);
        assert_eq!(compiled.indices, vec![0, 1, 2, 3, 0, 2]);
    }

    #[test]
    fn missing_uvs_default_to_origin() {
        let compiled = strip(true, false).compile().unwrap();
        assert!(compiled.texcoords.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn missing_normals_are_provider_errors() {
        let mesh = strip(false, true);
        let err = compile(&mesh.faces, &mesh).unwrap_err();
        assert!(!err.is_malformed_face());
        assert!(err.to_string().contains("face 0 corner 2"));
    }

    #[test]
    fn out_of_range_corner_is_reported() {
        let mut mesh = strip(true, true);
        mesh.faces[1].corners[0] = 9;
        let err = compile(&mesh.faces, &mesh).unwrap_err();
        assert!(matches!(
            err,
            crate::mesh::MeshError::AttributeProvider {
                face: 1,
                corner: 0,
                ..
            }
        ));
    }

    #[test]
    fn unknown_primitive_is_reported() {
        let mut mesh = strip(true, true);
        mesh.faces[0].primitive = 3;
        let err = compile(&mesh.faces, &mesh).unwrap_err();
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(
            source.to_string(),
            GltfAttributeError::PrimitiveOutOfRange(3).to_string()
        );
    }
}
