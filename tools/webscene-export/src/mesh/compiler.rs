//! Vertex buffer compiler
//!
//! Walks a mesh's faces in a fixed corner order, deduplicates the per-corner
//! attribute tuples and produces parallel attribute arrays plus a triangle
//! index list.
//!
//! Corner order reverses the input winding: triangles visit `[2, 1, 0]`,
//! quads are split into `{2, 1, 0}` and `{3, 2, 0}`. Runtimes depend on this
//! winding, so it must not change.

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::error::{FaceDefect, MeshError};
use super::hash::structural_hash;
use super::types::{
    CompiledMesh, CornerAttributes, VertexAttributes, NORMAL_COMPONENTS, POSITION_COMPONENTS,
    TEX_COORD_COMPONENTS,
};

/// Corner visit order for triangles
pub const TRIANGLE_SWIZZLE: [usize; 3] = [2, 1, 0];
/// Corner visit order for quads (two triangles)
pub const QUAD_SWIZZLE: [usize; 6] = [2, 1, 0, 3, 2, 0];

/// Host-side source of face corner attributes.
pub trait FaceAttributeProvider {
    type Face;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of corners the face reports.
    fn corner_count(&self, face: &Self::Face) -> usize;

    /// Attributes of `corner` (0-based, input order) on `face`.
    fn corner(&self, face: &Self::Face, corner: usize) -> Result<CornerAttributes<'_>, Self::Error>;
}

/// Corner visit order for a face with `corners` corners.
pub fn swizzle_for(corners: usize) -> Option<&'static [usize]> {
    match corners {
        3 => Some(&TRIANGLE_SWIZZLE),
        4 => Some(&QUAD_SWIZZLE),
        _ => None,
    }
}

/// Unique vertices keyed by structural hash.
///
/// Chains hold indices into `vertices`; index `i` is also the `i`-th vertex
/// appended to the output arrays.
#[derive(Default)]
struct DedupTable {
    chains: HashMap<u32, SmallVec<[u32; 2]>>,
    vertices: Vec<VertexAttributes>,
}

impl DedupTable {
    /// Index of `vertex`, and whether it was newly inserted.
    fn index_of(&mut self, vertex: VertexAttributes) -> (u32, bool) {
        let chain = self.chains.entry(structural_hash(&vertex.0)).or_default();
        if let Some(&index) = chain
            .iter()
            .find(|&&i| self.vertices[i as usize] == vertex)
        {
            return (index, false);
        }

        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        chain.push(index);
        (index, true)
    }
}

/// Compiles faces into an indexed vertex buffer.
///
/// Holds no state between calls; each compilation gets a fresh dedup table.
#[derive(Debug, Default, Clone, Copy)]
pub struct VertexBufferCompiler;

impl VertexBufferCompiler {
    pub fn new() -> Self {
        Self
    }

    pub fn compile<P: FaceAttributeProvider>(
        &self,
        faces: &[P::Face],
        provider: &P,
    ) -> Result<CompiledMesh, MeshError> {
        compile(faces, provider)
    }
}

/// Compile `faces` into a [`CompiledMesh`].
pub fn compile<P: FaceAttributeProvider>(
    faces: &[P::Face],
    provider: &P,
) -> Result<CompiledMesh, MeshError> {
    let mut table = DedupTable::default();
    let mut output = CompiledMesh::with_capacity(faces.len() * 2, faces.len() * 6);

    for (face_index, face) in faces.iter().enumerate() {
        let corners = provider.corner_count(face);
        let swizzle = swizzle_for(corners).ok_or(MeshError::MalformedFace {
            face: face_index,
            defect: FaceDefect::CornerCount(corners),
        })?;

        for &corner in swizzle {
            let attributes =
                provider
                    .corner(face, corner)
                    .map_err(|e| MeshError::AttributeProvider {
                        face: face_index,
                        corner,
                        source: Box::new(e),
                    })?;
            let vertex = build_vertex(&attributes).map_err(|defect| MeshError::MalformedFace {
                face: face_index,
                defect: defect.at_corner(corner),
            })?;

            let (index, inserted) = table.index_of(vertex);
            if inserted {
                output.push_vertex(&vertex);
            }
            output.indices.push(index);
        }
    }

    tracing::debug!(
        "Compiled {} faces: {} unique vertices, {} indices",
        faces.len(),
        output.vertex_count(),
        output.indices.len()
    );

    Ok(output)
}

/// Arity failure before the corner index is known.
struct ArityMismatch {
    attribute: &'static str,
    found: usize,
    expected: usize,
}

impl ArityMismatch {
    fn at_corner(self, corner: usize) -> FaceDefect {
        FaceDefect::Arity {
            corner,
            attribute: self.attribute,
            found: self.found,
            expected: self.expected,
        }
    }
}

fn build_vertex(attributes: &CornerAttributes<'_>) -> Result<VertexAttributes, ArityMismatch> {
    let position: [f32; POSITION_COMPONENTS] = fixed(attributes.position, "position")?;
    let normal: [f32; NORMAL_COMPONENTS] = fixed(attributes.normal, "normal")?;
    let tex_coord: [f32; TEX_COORD_COMPONENTS] = match attributes.tex_coord {
        Some(uv) => fixed(uv, "texcoord")?,
        None => [0.0, 0.0],
    };
    Ok(VertexAttributes::new(tex_coord, position, normal))
}

fn fixed<const N: usize>(
    values: &[f32],
    attribute: &'static str,
) -> Result<[f32; N], ArityMismatch> {
    values.try_into().map_err(|_| ArityMismatch {
        attribute,
        found: values.len(),
        expected: N,
    })
}
