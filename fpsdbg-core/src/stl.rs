/// STL import for binary and ASCII files
///
/// Facet normals stored in the file are discarded; every imported mesh gets
/// its normals from [`crate::geometry::flat_normals`].
use std::path::Path;

use nalgebra::Point3;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending, space0},
    combinator::map,
    multi::many0,
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};

use crate::geometry::Mesh;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Errors from reading or parsing a mesh file
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("file too small to be a valid STL ({len} bytes)")]
    TooShort { len: usize },
    #[error("STL declares {declared} triangles but only {available} are present")]
    Truncated { declared: usize, available: usize },
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
}

/// Read and parse an STL file from disk
pub fn read_stl(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| MeshError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mesh = parse_stl(&data)?;
    tracing::info!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        "loaded STL mesh"
    );
    Ok(mesh)
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    // Binary files may also start with "solid", so fall back on failure.
    // When both readings fail the ASCII error is the one worth reporting.
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(ascii) => {
                    tracing::debug!("not ASCII STL, trying binary: {ascii}");
                    return parse_binary_stl(data).map_err(|_| ascii);
                }
            }
        }
    }

    parse_binary_stl(data)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(MeshError::TooShort { len: data.len() });
    }

    let declared = read_u32(data, HEADER_LEN) as usize;
    let facets = &data[HEADER_LEN + 4..];
    let available = facets.len() / FACET_LEN;
    if available < declared {
        return Err(MeshError::Truncated {
            declared,
            available,
        });
    }

    let mut positions = Vec::with_capacity(declared * 3);
    for facet in facets.chunks_exact(FACET_LEN).take(declared) {
        // 12 bytes of stored normal, 3 vertices, 2 bytes of attributes.
        for v in 0..3 {
            let offset = 12 + v * 12;
            positions.push(Point3::new(
                read_f32(facet, offset),
                read_f32(facet, offset + 4),
                read_f32(facet, offset + 8),
            ));
        }
    }

    Ok(Mesh::from_positions(positions))
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn read_f32(data: &[u8], offset: usize) -> f32 {
    f32::from_bits(read_u32(data, offset))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, MeshError> {
    match parse_solid(input) {
        Ok((_, positions)) => Ok(Mesh::from_positions(positions)),
        Err(e) => Err(MeshError::Ascii(format!("{:?}", e))),
    }
}

fn parse_solid(input: &str) -> IResult<&str, Vec<Point3<f32>>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = preceded(space0, not_line_ending)(input)?; // Optional name
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;

    Ok((input, facets.into_iter().flatten().collect()))
}

fn parse_facet(input: &str) -> IResult<&str, [Point3<f32>; 3]> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _stored_normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    preceded(
        preceded(multispace0, tag("vertex")),
        map(parse_vector3, |(x, y, z)| Point3::new(x, y, z)),
    )(input)
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    tuple((
        preceded(multispace1, float),
        preceded(multispace1, float),
        preceded(multispace1, float),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    const ASCII_TRIANGLE: &str = "solid demo part
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid demo part
";

    fn binary_stl(triangles: &[[[f32; 3]; 3]], declared: u32) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&declared.to_le_bytes());
        for tri in triangles {
            // Stored normal deliberately wrong.
            for c in [9.0f32, 9.0, 9.0] {
                data.extend_from_slice(&c.to_le_bytes());
            }
            for vertex in tri {
                for c in vertex {
                    data.extend_from_slice(&c.to_le_bytes());
                }
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let data = binary_stl(&[], 0);
        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_binary_normals_are_recomputed() {
        let data = binary_stl(&[[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]], 1);
        let mesh = parse_stl(&data).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.positions()[1], Point3::new(1.0, 0.0, 0.0));
        for n in mesh.normals() {
            assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_binary_too_short() {
        assert!(matches!(
            parse_binary_stl(&[0u8; 10]),
            Err(MeshError::TooShort { len: 10 })
        ));
    }

    #[test]
    fn test_binary_truncated() {
        let data = binary_stl(&[[[0.0; 3]; 3]], 2);
        assert!(matches!(
            parse_binary_stl(&data),
            Err(MeshError::Truncated {
                declared: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn test_named_ascii_solid() {
        let mesh = parse_stl(ASCII_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        // The stored normal says -Z; the winding says +Z.
        assert!((mesh.normals()[0] - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_ascii_scientific_notation() {
        let input = "solid\nfacet normal 0 0 0\nouter loop\nvertex 1e0 0 0\nvertex 0 2.5E-1 0\nvertex 0 0 -1\nendloop\nendfacet\nendsolid\n";
        let mesh = parse_ascii_stl(input).unwrap();
        assert_eq!(mesh.positions()[0], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.positions()[1], Point3::new(0.0, 0.25, 0.0));
    }

    #[test]
    fn test_malformed_ascii() {
        assert!(matches!(
            parse_ascii_stl("solid x\nfacet normal 0 0\n"),
            Err(MeshError::Ascii(_))
        ));
    }

    #[test]
    fn test_malformed_ascii_reports_ascii_error() {
        let result = parse_stl(b"solid x\nfacet normal 0 0\n");
        assert!(matches!(result, Err(MeshError::Ascii(_))));
    }

    #[test]
    fn test_binary_with_solid_header() {
        let mut data = binary_stl(&[[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]], 1);
        data[..5].copy_from_slice(b"solid");
        let mesh = parse_stl(&data).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_stl("/nonexistent/mesh.stl"),
            Err(MeshError::Io { .. })
        ));
    }
}
