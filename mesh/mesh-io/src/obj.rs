//! OBJ (Wavefront) file format support.
//!
//! Only geometry is handled: `v` lines and `f` lines. Texture coordinates,
//! normals, groups and materials are ignored. Face corners may be written as
//! `i`, `i/t`, `i//n` or `i/t/n`; only the leading vertex index is used.
//!
//! Triangles become [`Triangle`]s. Quads are split into the two triangles
//! `(0, 1, 2)` and `(0, 2, 3)`. Larger polygons are fan-triangulated.
//!
//! Comment lines (`# ...`) written before the first `v` line are kept as
//! mesh comments.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use mesh_types::{Mesh, Triangle, Vertex};
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::error::{IoError, IoResult};

/// Load a mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - A vertex line has fewer than three coordinates or a bad number
/// - A face has fewer than three corners, or a corner index is zero,
///   negative, or past the vertices read so far
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_obj;
///
/// let mesh = load_obj("model.obj").unwrap();
/// println!("Loaded {} triangles", mesh.triangle_count());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::open(path, e))?;
    read_obj(BufReader::new(file))
}

/// Read an OBJ mesh from a buffered reader.
///
/// # Errors
///
/// See [`load_obj`].
pub fn read_obj<R: BufRead>(reader: R) -> IoResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut fanned = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if let Some(comment) = trimmed.strip_prefix('#') {
            if mesh.vertex_count() == 0 {
                mesh.comments.push(comment.trim().to_string());
            }
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut coord = || -> IoResult<f32> {
                    let field = parts.next().ok_or_else(|| {
                        IoError::invalid_content(format!(
                            "line {}: vertex with fewer than 3 coordinates",
                            line_no + 1
                        ))
                    })?;
                    Ok(field.parse()?)
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                mesh.push_vertex(Vertex::from_coords(x, y, z));
            }
            Some("f") => {
                let corners = parts
                    .map(|p| parse_corner(p, mesh.vertex_count(), line_no + 1))
                    .collect::<IoResult<SmallVec<[u32; 4]>>>()?;

                match corners[..] {
                    [a, b, c] => mesh.triangles.push(Triangle::new(a, b, c)),
                    [a, b, c, d] => {
                        mesh.triangles.push(Triangle::new(a, b, c));
                        mesh.triangles.push(Triangle::new(a, c, d));
                    }
                    [a, ref rest @ ..] if rest.len() > 3 => {
                        for pair in rest.windows(2) {
                            mesh.triangles.push(Triangle::new(a, pair[0], pair[1]));
                        }
                        fanned += 1;
                    }
                    _ => {
                        return Err(IoError::invalid_content(format!(
                            "line {}: face with {} corners",
                            line_no + 1,
                            corners.len()
                        )));
                    }
                }
            }
            _ => {
                // Ignore vt, vn, g, o, s, usemtl, mtllib and blank lines
            }
        }
    }

    if fanned > 0 {
        warn!(faces = fanned, "Fan-triangulated OBJ faces with more than 4 corners");
    }
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Read OBJ"
    );
    Ok(mesh)
}

/// Parse one face corner (`i`, `i/t`, `i//n`, `i/t/n`) into a zero-based index.
fn parse_corner(corner: &str, vertex_count: usize, line: usize) -> IoResult<u32> {
    let one_based: i64 = corner.split('/').next().unwrap_or_default().parse()?;
    one_based
        .checked_sub(1)
        .and_then(|i| u32::try_from(i).ok())
        .filter(|&i| (i as usize) < vertex_count)
        .ok_or_else(|| {
            IoError::invalid_content(format!(
                "line {line}: vertex index {one_based} out of range 1..={vertex_count}"
            ))
        })
}

/// Save a mesh to an OBJ file.
///
/// # Errors
///
/// Returns an error if a face references a missing vertex or the file
/// cannot be written.
///
/// # Example
///
/// ```no_run
/// use mesh_io::save_obj;
/// use mesh_types::unit_cube;
///
/// save_obj(&unit_cube(), "cube.obj").unwrap();
/// ```
pub fn save_obj<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ to a writer.
///
/// Comments come first as `#` lines, then vertices, triangles and quads.
/// Quads are written as four-corner faces.
///
/// # Errors
///
/// See [`save_obj`].
pub fn write_obj<W: Write>(mesh: &Mesh, mut writer: W) -> IoResult<()> {
    mesh.validate_indices()?;

    for comment in &mesh.comments {
        for line in comment.lines() {
            writeln!(writer, "# {line}")?;
        }
    }
    for v in mesh.vertices() {
        let [x, y, z] = v.to_array();
        writeln!(writer, "v {x} {y} {z}")?;
    }
    for t in &mesh.triangles {
        writeln!(writer, "f {} {} {}", t.a + 1, t.b + 1, t.c + 1)?;
    }
    for q in &mesh.quads {
        let [a, b, c, d] = q.v;
        writeln!(writer, "f {} {} {} {}", a + 1, b + 1, c + 1, d + 1)?;
    }
    Ok(())
}
