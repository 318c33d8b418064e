//! Wavefront OBJ host adapter
//!
//! Faces keep the corner count written in the file; triangles and quads
//! compile, anything else is reported by the compiler as a malformed face.

use anyhow::{bail, Context, Result};
use smallvec::SmallVec;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::compiler::{compile, FaceAttributeProvider};
use super::types::{CompiledMesh, CornerAttributes};

/// Attribute indices of one face corner (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjCorner {
    pub position: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjFace {
    pub corners: SmallVec<[ObjCorner; 4]>,
}

/// Why an OBJ corner cannot supply its attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjAttributeError {
    #[error("position index {0} out of range")]
    PositionOutOfRange(usize),
    #[error("texcoord index {0} out of range")]
    TexCoordOutOfRange(usize),
    #[error("normal index {0} out of range")]
    NormalOutOfRange(usize),
    #[error("corner has no normal")]
    MissingNormal,
    #[error("corner has no texcoord but the mesh has a texcoord layer")]
    MissingTexCoord,
}

/// Parsed OBJ geometry.
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    /// Name from the first `o` statement
    pub name: Option<String>,
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<ObjFace>,
}

impl ObjMesh {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open OBJ: {:?}", path))?;
        Self::parse(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", path))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut mesh = ObjMesh::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let line_no = line_no + 1;

            match parts[0] {
                "v" => mesh.positions.push(parse_floats(&parts[1..], line_no)?),
                "vt" => mesh.tex_coords.push(parse_floats(&parts[1..], line_no)?),
                "vn" => mesh.normals.push(parse_floats(&parts[1..], line_no)?),
                "f" => {
                    let corners = parts[1..]
                        .iter()
                        .map(|v| {
                            parse_obj_vertex(v).with_context(|| {
                                format!("line {}: invalid face vertex {:?}", line_no, v)
                            })
                        })
                        .collect::<Result<SmallVec<_>>>()?;
                    mesh.faces.push(ObjFace { corners });
                }
                "o" if mesh.name.is_none() => {
                    mesh.name = parts.get(1).map(|s| s.to_string());
                }
                _ => {}
            }
        }

        if mesh.faces.is_empty() {
            bail!("No faces found in OBJ file");
        }

        Ok(mesh)
    }

    /// Whether the mesh carries a texture-coordinate layer.
    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    pub fn compile(&self) -> Result<CompiledMesh> {
        compile(&self.faces, self).context("Failed to compile OBJ mesh")
    }
}

impl FaceAttributeProvider for ObjMesh {
    type Face = ObjFace;
    type Error = ObjAttributeError;

    fn corner_count(&self, face: &ObjFace) -> usize {
        face.corners.len()
    }

    fn corner(&self, face: &ObjFace, corner: usize) -> Result<CornerAttributes<'_>, ObjAttributeError> {
        let c = face.corners[corner];

        let position = self
            .positions
            .get(c.position)
            .ok_or(ObjAttributeError::PositionOutOfRange(c.position))?;

        let normal = match c.normal {
            Some(i) => self
                .normals
                .get(i)
                .ok_or(ObjAttributeError::NormalOutOfRange(i))?,
            None => return Err(ObjAttributeError::MissingNormal),
        };

        let tex_coord = match c.tex_coord {
            Some(i) => Some(
                self.tex_coords
                    .get(i)
                    .ok_or(ObjAttributeError::TexCoordOutOfRange(i))?
                    .as_slice(),
            ),
            None if self.has_tex_coords() => return Err(ObjAttributeError::MissingTexCoord),
            None => None,
        };

        Ok(CornerAttributes {
            position: position.as_slice(),
            normal: normal.as_slice(),
            tex_coord,
        })
    }
}

/// Load and compile an OBJ file.
pub fn compile_obj(input: &Path) -> Result<CompiledMesh> {
    let mesh = ObjMesh::load(input)?;
    mesh.compile()
        .with_context(|| format!("Failed to compile OBJ: {:?}", input))
}

fn parse_floats<const N: usize>(values: &[&str], line_no: usize) -> Result<[f32; N]> {
    if values.len() < N {
        bail!("line {}: expected {} values, found {}", line_no, N, values.len());
    }
    let mut out = [0.0f32; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value
            .parse()
            .with_context(|| format!("line {}: invalid number {:?}", line_no, value))?;
    }
    Ok(out)
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(s: &str) -> Option<ObjCorner> {
    let parts: Vec<&str> = s.split('/').collect();

    let position = parts.first()?.parse::<usize>().ok()?.checked_sub(1)?; // OBJ indices are 1-based

    let index = |slot: usize| -> Option<Option<usize>> {
        match parts.get(slot) {
            None => Some(None),
            Some(s) if s.is_empty() => Some(None),
            Some(s) => Some(Some(s.parse::<usize>().ok()?.checked_sub(1)?)),
        }
    };

    Some(ObjCorner {
        position,
        tex_coord: index(1)?,
        normal: index(2)?,
    })
}
