//! STL (Stereolithography) file format support.
//!
//! Binary STL is read and written; ASCII STL is detected and read.
//!
//! STL stores every facet with its own three corners. The reader interns
//! corners through a [`VertexTable`], so identical positions become one
//! shared vertex. Positions that differ in the last bit stay separate; run
//! [`weld_vertices`](mesh_types::weld_vertices) afterwards to merge them.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored, often contains file info)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (often not accurate)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (usually 0)
//! end
//! ```
//!
//! The file length must be exactly `84 + 50 * count`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use mesh_types::{Mesh, Triangle, Vertex, VertexTable};
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file.
///
/// Automatically detects ASCII vs binary format.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file content is not valid STL
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("Loaded {} triangles", mesh.triangle_count());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::open(path, e))?;
    read_stl(BufReader::new(file))
}

/// Read an STL mesh from a reader.
///
/// # Errors
///
/// Returns an error if reading fails or the content is not valid STL.
pub fn read_stl<R: Read>(mut reader: R) -> IoResult<Mesh> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if is_ascii_stl(&bytes) {
        let text = std::str::from_utf8(&bytes)?;
        parse_stl_ascii(text.as_bytes())
    } else {
        parse_stl_binary(&bytes)
    }
}

/// ASCII files start with "solid" and have no NUL bytes in the first 80
/// bytes; some binary exporters also write "solid" into the header.
fn is_ascii_stl(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    String::from_utf8_lossy(head).trim_start().starts_with("solid") && !head.contains(&0)
}

/// Parse a complete binary STL image.
fn parse_stl_binary(bytes: &[u8]) -> IoResult<Mesh> {
    let Some((header, body)) = bytes.split_first_chunk::<{ HEADER_SIZE + 4 }>() else {
        return Err(IoError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got: bytes.len(),
        });
    };

    // Face count is stored after the 80-byte header
    let face_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    if body.len() as u64 != u64::from(face_count) * TRIANGLE_SIZE as u64 {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: only reported in the error message
        let got = (body.len() / TRIANGLE_SIZE) as u32;
        return Err(IoError::InvalidFaceCount {
            expected: face_count,
            got,
        });
    }

    let mut mesh = Mesh::with_capacity(face_count as usize / 2, face_count as usize);
    let mut table = VertexTable::with_capacity(face_count as usize / 2);

    for facet in body.chunks_exact(TRIANGLE_SIZE) {
        // Skip normal (12 bytes), read 3 vertices (36 bytes total)
        let a = table.intern(&mut mesh, read_vertex(&facet[12..24]));
        let b = table.intern(&mut mesh, read_vertex(&facet[24..36]));
        let c = table.intern(&mut mesh, read_vertex(&facet[36..48]));
        mesh.triangles.push(Triangle::new(a, b, c));
    }

    info!(
        facets = face_count,
        vertices = mesh.vertex_count(),
        "Read binary STL"
    );
    Ok(mesh)
}

/// Read a vertex from 12 bytes (3 f32s).
fn read_vertex(buf: &[u8]) -> Vertex {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vertex::from_coords(x, y, z)
}

/// Parse an ASCII STL file.
fn parse_stl_ascii<R: BufRead>(reader: R) -> IoResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut table = VertexTable::new();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut corners: Vec<u32> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                // Normal follows but we ignore it
            }
            "outer" => {
                if parts.next().is_some_and(|p| p.eq_ignore_ascii_case("loop")) {
                    in_loop = true;
                    corners.clear();
                }
            }
            "vertex" if in_loop => {
                let x: f32 = next_field(&mut parts)?.parse()?;
                let y: f32 = next_field(&mut parts)?.parse()?;
                let z: f32 = next_field(&mut parts)?.parse()?;
                corners.push(table.intern(&mut mesh, Vertex::from_coords(x, y, z)));
            }
            "endloop" => {
                in_loop = false;
            }
            "endfacet" => {
                if in_facet {
                    if let [a, b, c] = corners[..] {
                        mesh.triangles.push(Triangle::new(a, b, c));
                    } else {
                        return Err(IoError::invalid_content(format!(
                            "STL facet with {} vertices",
                            corners.len()
                        )));
                    }
                }
                in_facet = false;
            }
            "endsolid" => break,
            _ => {
                // Ignore unknown lines
            }
        }
    }

    info!(
        facets = mesh.triangle_count(),
        vertices = mesh.vertex_count(),
        "Read ASCII STL"
    );
    Ok(mesh)
}

fn next_field<'a>(parts: &mut impl Iterator<Item = &'a str>) -> IoResult<&'a str> {
    parts
        .next()
        .ok_or_else(|| IoError::invalid_content("STL vertex with fewer than 3 coordinates"))
}

/// Save a mesh to an STL file.
///
/// Quads are written as two triangles each.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Output file path
/// * `binary` - If true, save as binary STL; if false, save as ASCII
///
/// # Errors
///
/// Returns an error if a face references a missing vertex, the mesh has more
/// facets than binary STL can count, or the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use mesh_io::{load_stl, save_stl};
///
/// let mesh = load_stl("input.stl").unwrap();
/// save_stl(&mesh, "output.stl", true).unwrap(); // Binary
/// save_stl(&mesh, "output_ascii.stl", false).unwrap(); // ASCII
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &Mesh, path: P, binary: bool) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer, binary)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as STL to a writer.
///
/// # Errors
///
/// See [`save_stl`].
pub fn write_stl<W: Write>(mesh: &Mesh, writer: W, binary: bool) -> IoResult<()> {
    mesh.validate_indices()?;
    if binary {
        write_stl_binary(mesh, writer)
    } else {
        write_stl_ascii(mesh, writer)
    }
}

/// Triangles followed by the halves of every quad.
fn facets(mesh: &Mesh) -> impl Iterator<Item = Triangle> + '_ {
    mesh.triangles
        .iter()
        .copied()
        .chain(mesh.quads.iter().flat_map(|q| q.split()))
}

/// Corner positions and unit normal of a facet.
///
/// Degenerate facets get a zero normal.
fn facet_geometry(mesh: &Mesh, tri: Triangle) -> ([f32; 3], [[f32; 3]; 3]) {
    let [a, b, c] = tri.indices().map(|i| mesh.vertices()[i as usize].position);
    let normal = (b - a).cross(&(c - a));
    let len = normal.norm();
    let n = if len > f32::EPSILON {
        let n = normal / len;
        [n.x, n.y, n.z]
    } else {
        [0.0; 3]
    };
    (n, [a, b, c].map(|p| [p.x, p.y, p.z]))
}

/// Save mesh as binary STL.
fn write_stl_binary<W: Write>(mesh: &Mesh, mut writer: W) -> IoResult<()> {
    // Write 80-byte header (padded with spaces)
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL generated by mesh-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let total = mesh.triangle_count() + 2 * mesh.quad_count();
    let face_count = u32::try_from(total)
        .map_err(|_| IoError::invalid_content(format!("{total} facets exceed the STL limit")))?;
    writer.write_all(&face_count.to_le_bytes())?;

    let mut record = [0u8; TRIANGLE_SIZE];
    for tri in facets(mesh) {
        let (normal, corners) = facet_geometry(mesh, tri);
        let floats = normal.iter().chain(corners.iter().flatten());
        for (slot, value) in record.chunks_exact_mut(4).zip(floats) {
            slot.copy_from_slice(&value.to_le_bytes());
        }
        // Attribute byte count stays 0
        writer.write_all(&record)?;
    }

    debug!(facets = face_count, "Wrote binary STL");
    Ok(())
}

/// Save mesh as ASCII STL.
fn write_stl_ascii<W: Write>(mesh: &Mesh, mut writer: W) -> IoResult<()> {
    writeln!(writer, "solid mesh")?;

    for tri in facets(mesh) {
        let ([nx, ny, nz], corners) = facet_geometry(mesh, tri);
        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for [x, y, z] in corners {
            writeln!(writer, "      vertex {x:e} {y:e} {z:e}")?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid mesh")?;

    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::unnecessary_raw_string_hashes
)]
mod tests {
    use super::*;
    use mesh_types::{unit_cube, Quad};

    fn create_test_triangle() -> Mesh {
        Mesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![Triangle::new(0, 1, 2)],
        )
    }

    fn to_bytes(mesh: &Mesh, binary: bool) -> Vec<u8> {
        let mut out = Vec::new();
        write_stl(mesh, &mut out, binary).unwrap();
        out
    }

    #[test]
    fn binary_layout() {
        let bytes = to_bytes(&create_test_triangle(), true);
        assert_eq!(bytes.len(), 84 + 50);
        assert_eq!(&bytes[80..84], &1u32.to_le_bytes());
        // Counter-clockwise in the XY plane: normal +Z.
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, 1.0);
        assert_eq!(&bytes[132..134], &[0, 0]);
    }

    #[test]
    fn degenerate_facet_has_zero_normal() {
        let mesh = Mesh::from_parts(
            vec![Vertex::from_coords(1.0, 1.0, 1.0)],
            vec![Triangle::new(0, 0, 0)],
        );
        let bytes = to_bytes(&mesh, true);
        assert!(bytes[84..96].iter().all(|&b| b == 0));
    }

    #[test]
    fn roundtrip_binary_shares_vertices() {
        let cube = unit_cube();
        let loaded = read_stl(&to_bytes(&cube, true)[..]).unwrap();
        assert_eq!(loaded.triangle_count(), 12);
        assert_eq!(loaded.vertex_count(), 8);
        for (got, want) in loaded.triangles.iter().zip(&cube.triangles) {
            let got = got.indices().map(|i| loaded.vertices()[i as usize]);
            let want = want.indices().map(|i| cube.vertices()[i as usize]);
            assert_eq!(got, want);
        }
    }

    #[test]
    fn quads_are_split() {
        let mut mesh = unit_cube();
        mesh.triangles.clear();
        mesh.quads.push(Quad::new(0, 1, 2, 3));
        let loaded = read_stl(&to_bytes(&mesh, true)[..]).unwrap();
        assert_eq!(loaded.triangle_count(), 2);
        assert_eq!(loaded.vertex_count(), 4);
    }

    #[test]
    fn roundtrip_ascii() {
        let cube = unit_cube();
        let loaded = read_stl(&to_bytes(&cube, false)[..]).unwrap();
        assert_eq!(loaded.triangle_count(), 12);
        assert_eq!(loaded.vertex_count(), 8);
        assert_eq!(loaded.bounds(), cube.bounds());
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut bytes = to_bytes(&create_test_triangle(), true);
        bytes.pop();
        assert!(matches!(
            read_stl(&bytes[..]),
            Err(IoError::InvalidFaceCount {
                expected: 1,
                got: 0
            })
        ));
    }

    #[test]
    fn rejects_short_header() {
        assert!(matches!(
            read_stl(&[0u8; 40][..]),
            Err(IoError::InvalidHeader { got: 40, .. })
        ));
    }

    #[test]
    fn binary_header_starting_with_solid() {
        let mut bytes = to_bytes(&create_test_triangle(), true);
        bytes[..5].copy_from_slice(b"solid");
        bytes[10] = 0;
        let mesh = read_stl(&bytes[..]).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn load_nonexistent_file() {
        let result = load_stl("nonexistent_file_12345.stl");
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn ascii_stl_parsing() {
        let ascii_stl = br#"solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 1 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test"#;

        let mesh = read_stl(&ascii_stl[..]).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangles[1], Triangle::new(1, 3, 2));
    }

    #[test]
    fn ascii_stl_bad_facet() {
        let ascii_stl = b"solid test\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nendloop\nendfacet\n";
        assert!(matches!(
            read_stl(&ascii_stl[..]),
            Err(IoError::InvalidContent { .. })
        ));
    }

    #[test]
    fn ascii_stl_must_be_utf8() {
        let mut ascii_stl = b"solid test\nfacet normal 0 0 1\n".to_vec();
        ascii_stl.extend_from_slice(&[0xff, 0xfe, b'\n']);
        assert!(matches!(read_stl(&ascii_stl[..]), Err(IoError::Utf8(_))));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.stl");
        save_stl(&create_test_triangle(), &path, true).unwrap();
        let loaded = load_stl(&path).unwrap();
        assert_eq!(loaded.triangle_count(), 1);
        assert_eq!(loaded.vertex_count(), 3);
    }
}
