//! Text encoding of compiled meshes
//!
//! Mesh records are JSON objects whose float arrays are written with
//! [`format_number`] to keep files small. The formatting is lossy (values
//! within 0.0001 of an integer snap to it, others keep 4 decimals); it never
//! affects deduplication, which compares full-precision floats.

use std::io::Write;

use crate::mesh::CompiledMesh;

/// Absolute distance under which a value is written as an integer.
pub const INTEGER_SNAP_TOLERANCE: f64 = 0.0001;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("{array}[{position}] is not finite ({value})")]
    NonFinite {
        array: &'static str,
        position: usize,
        value: f32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Format a float for a mesh record.
///
/// `2.0 -> "2"`, `2.5 -> "2.5"`, `0.33333 -> "0.3333"`, `1.00004999 -> "1"`.
pub fn format_number(value: f32) -> String {
    let n = f64::from(value);
    let rounded = n.round();
    if (rounded - n).abs() < INTEGER_SNAP_TOLERANCE {
        // Avoid "-0" for tiny negatives
        if rounded == 0.0 {
            return "0".to_string();
        }
        return format!("{}", rounded);
    }

    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0');
    let s = s.strip_suffix('.').unwrap_or(s);
    s.to_string()
}

/// Write one mesh record as a single-line JSON object.
pub fn write_mesh_record<W: Write>(
    w: &mut W,
    name: &str,
    mesh: &CompiledMesh,
) -> Result<(), FormatError> {
    // serde_json handles escaping of the name
    let name = serde_json::to_string(name).map_err(std::io::Error::from)?;
    write!(w, "{{\"name\":{}", name)?;

    for (array, values) in [
        ("texcoords", &mesh.texcoords),
        ("vertices", &mesh.positions),
        ("normals", &mesh.normals),
    ] {
        write!(w, ",\"{}\":[", array)?;
        for (position, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(FormatError::NonFinite {
                    array,
                    position,
                    value,
                });
            }
            if position > 0 {
                w.write_all(b",")?;
            }
            w.write_all(format_number(value).as_bytes())?;
        }
        w.write_all(b"]")?;
    }

    w.write_all(b",\"indices\":[")?;
    for (position, index) in mesh.indices.iter().enumerate() {
        if position > 0 {
            w.write_all(b",")?;
        }
        write!(w, "{}", index)?;
    }
    w.write_all(b"]}\n")?;

    Ok(())
}

/// In-memory variant of [`write_mesh_record`].
pub fn mesh_record_string(name: &str, mesh: &CompiledMesh) -> Result<String, FormatError> {
    let mut buf = Vec::new();
    write_mesh_record(&mut buf, name, mesh)?;
    // Only ASCII and serde_json-escaped UTF-8 are written
    String::from_utf8(buf).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use webscene_shared::MeshRecord;

    #[test]
    fn formats_integers_without_decimals() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(1000000.0), "1000000");
    }

    #[test]
    fn formats_fractions_with_four_decimals() {
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.33333), "0.3333");
        assert_eq!(format_number(-0.125), "-0.125");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn snaps_within_tolerance() {
        assert_eq!(format_number(1.00004999), "1");
        assert_eq!(format_number(0.99996), "1");
        assert_eq!(format_number(1.0002), "1.0002");
    }

    fn triangle() -> CompiledMesh {
        CompiledMesh {
            texcoords: vec![0.0, 1.0, 1.0, 0.0, 0.0, 0.0],
            positions: vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn writes_compact_record() {
        let text = mesh_record_string("Tri", &triangle()).unwrap();
        assert_eq!(
            text,
            "{\"name\":\"Tri\",\"texcoords\":[0,1,1,0,0,0],\"vertices\":[0,1,0,1,0,0,0,0,0],\"normals\":[0,0,1,0,0,1,0,0,1],\"indices\":[0,1,2]}\n"
        );
    }

    #[test]
    fn record_parses_back() {
        let mut mesh = triangle();
        mesh.positions[0] = 0.33333;
        let text = mesh_record_string("Quote \"mesh\"", &mesh).unwrap();
        let record = MeshRecord::from_json(&text).unwrap();

        assert_eq!(record.name, "Quote \"mesh\"");
        assert!((record.vertices[0] - 0.3333).abs() < 1e-6);
        assert_eq!(record.indices, mesh.indices);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut mesh = triangle();
        mesh.normals[4] = f32::NAN;
        let err = mesh_record_string("Bad", &mesh).unwrap_err();
        assert!(matches!(
            err,
            FormatError::NonFinite {
                array: "normals",
                position: 4,
                ..
            }
        ));
    }
}
