//! Wavefront OBJ loader
//!
//! Only vertex positions (`v`) and faces (`f`) are read. Polygons with more
//! than three corners are split into a triangle fan.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::rasterizer::{Face, TriangleMesh, Vec3};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

fn parse_error(line: usize, msg: impl Into<String>) -> ObjError {
    ObjError::Parse {
        line,
        msg: msg.into(),
    }
}

/// Load an OBJ file into a triangle mesh
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<TriangleMesh, ObjError> {
    let file = File::open(path)?;
    parse_obj(BufReader::new(file))
}

/// Parse OBJ text from any buffered reader
pub fn parse_obj<R: BufRead>(reader: R) -> Result<TriangleMesh, ObjError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let mut coords = [0.0; 3];
                for c in &mut coords {
                    let token = parts
                        .next()
                        .ok_or_else(|| parse_error(line_no, "vertex needs three coordinates"))?;
                    *c = token
                        .parse()
                        .map_err(|_| parse_error(line_no, format!("invalid coordinate '{}'", token)))?;
                }
                vertices.push(Vec3::from(coords));
            }
            Some("f") => {
                let corners = parts
                    .map(|token| resolve_index(token, vertices.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(parse_error(line_no, "face needs at least three corners"));
                }
                for k in 1..corners.len() - 1 {
                    faces.push(Face::new(corners[0], corners[k], corners[k + 1]));
                }
            }
            // Comments, normals, texture coordinates, groups, materials
            _ => {}
        }
    }

    Ok(TriangleMesh::new(vertices, faces))
}

/// Resolve a face token (`7`, `7/2`, `7/2/3`, `-1//4`) to a 0-based vertex index
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<usize, ObjError> {
    let position = token.split('/').next().unwrap_or_default();
    let index: i64 = position
        .parse()
        .map_err(|_| parse_error(line, format!("invalid face index '{}'", token)))?;

    // Positive indices are 1-based, negative ones count back from the last vertex
    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(vertex_count as i64 + i),
    };

    match resolved {
        Some(r) if r >= 0 && (r as usize) < vertex_count => Ok(r as usize),
        _ => Err(parse_error(
            line,
            format!("face index {} out of range ({} vertices)", index, vertex_count),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Mesh;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1 4/1/1
";

    #[test]
    fn test_parse_quad_as_fan() {
        let mesh = parse_obj(QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.faces, vec![Face::new(0, 1, 2), Face::new(0, 2, 3)]);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex(1, 2), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_negative_indices() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2//1 -1\n";
        let mesh = parse_obj(src.as_bytes()).unwrap();
        assert_eq!(mesh.faces, vec![Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_obj("v 0 0 0\nv 1 x 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::Parse { line: 2, .. }), "{}", err);

        let err = parse_obj("v 0 0 0\nf 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::Parse { line: 2, .. }), "{}", err);

        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::Parse { line: 3, .. }), "{}", err);

        let err = parse_obj("v 0 0 0\nf 0 1 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::Parse { line: 2, .. }), "{}", err);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_obj("does/not/exist.obj"),
            Err(ObjError::Io(_))
        ));
    }
}
