//! Optional near-duplicate vertex merging.
//!
//! Independently triangulated facets (typical of STL exports) often carry
//! corners that differ only in the last bits. [`VertexTable`](crate::VertexTable)
//! deliberately keeps those apart; this pass merges them when asked to.

use hashbrown::HashMap;
use tracing::debug;

use crate::{Mesh, Vertex};

/// Default per-axis tolerance for [`weld_vertices`].
pub const DEFAULT_WELD_TOLERANCE: f32 = 1e-4;

/// Merge vertices whose coordinates all differ by less than `tolerance`.
///
/// Each vertex is merged into the earliest vertex within tolerance of it
/// that has not itself been merged away. Triangles and quads are remapped,
/// the vertex list is compacted (surviving vertices keep their relative
/// order) and the bounding box is recomputed.
///
/// Returns the number of vertices removed. A non-positive or non-finite
/// tolerance is a no-op.
///
/// # Example
///
/// ```
/// use mesh_types::{weld_vertices, Mesh, Triangle, Vertex};
///
/// let mut mesh = Mesh::new();
/// mesh.push_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.push_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.push_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.push_vertex(Vertex::from_coords(1.000_01, 0.0, 0.0));
/// mesh.triangles.push(Triangle::new(0, 1, 2));
/// mesh.triangles.push(Triangle::new(2, 3, 0));
///
/// let removed = weld_vertices(&mut mesh, 1e-4);
/// assert_eq!(removed, 1);
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangles[1], Triangle::new(2, 1, 0));
/// ```
#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
pub fn weld_vertices(mesh: &mut Mesh, tolerance: f32) -> usize {
    let original_count = mesh.vertex_count();
    if original_count == 0 || !(tolerance.is_finite() && tolerance > 0.0) {
        return 0;
    }

    let vertices = mesh.vertices();

    // Cells at least as wide as the tolerance, so any match is in the 3x3x3 neighbourhood.
    let mut spatial_hash: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, vertex) in vertices.iter().enumerate() {
        let cell = pos_to_cell(vertex, tolerance);
        spatial_hash.entry(cell).or_default().push(idx as u32);
    }

    let mut remap: Vec<u32> = (0..original_count as u32).collect();
    let mut merged_count = 0;

    for (idx, vertex) in vertices.iter().enumerate() {
        let idx = idx as u32;
        if remap[idx as usize] != idx {
            continue;
        }

        let (cx, cy, cz) = pos_to_cell(vertex, tolerance);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = spatial_hash.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &other in candidates {
                        if other <= idx || remap[other as usize] != other {
                            continue;
                        }
                        if vertex.is_close_to(&vertices[other as usize], tolerance) {
                            remap[other as usize] = idx;
                            merged_count += 1;
                        }
                    }
                }
            }
        }
    }

    if merged_count == 0 {
        return 0;
    }

    // Compact: survivors get consecutive indices in original order.
    let mut new_index = vec![u32::MAX; original_count];
    let mut compacted: Vec<Vertex> = Vec::with_capacity(original_count - merged_count);
    for (idx, vertex) in vertices.iter().enumerate() {
        if remap[idx] == idx as u32 {
            new_index[idx] = compacted.len() as u32;
            compacted.push(*vertex);
        }
    }
    let resolve = |i: u32| new_index[remap[i as usize] as usize];

    for tri in &mut mesh.triangles {
        tri.a = resolve(tri.a);
        tri.b = resolve(tri.b);
        tri.c = resolve(tri.c);
    }
    for quad in &mut mesh.quads {
        for v in &mut quad.v {
            *v = resolve(*v);
        }
    }
    mesh.set_vertices(compacted);

    debug!(
        removed = merged_count,
        remaining = mesh.vertex_count(),
        tolerance,
        "Welded near-duplicate vertices"
    );

    merged_count
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: saturating float-to-int casts are fine for hashing cell coordinates
fn pos_to_cell(vertex: &Vertex, cell_size: f32) -> (i64, i64, i64) {
    let p = vertex.position;
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
        (p.z / cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quad, Triangle};

    fn soup() -> Mesh {
        // Two facets sharing an edge whose corners were written with slightly different rounding.
        let mut mesh = Mesh::new();
        for c in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.000_02, 0.0, 0.0],
            [0.0, 0.999_98, 0.0],
            [1.0, 1.0, 0.0],
        ] {
            mesh.push_vertex(Vertex::from_array(c));
        }
        mesh.triangles.push(Triangle::new(0, 1, 2));
        mesh.triangles.push(Triangle::new(3, 5, 4));
        mesh
    }

    #[test]
    fn weld_merges_near_duplicates() {
        let mut mesh = soup();
        let removed = weld_vertices(&mut mesh, DEFAULT_WELD_TOLERANCE);
        assert_eq!(removed, 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangles[0], Triangle::new(0, 1, 2));
        assert_eq!(mesh.triangles[1], Triangle::new(1, 3, 2));
        assert!(mesh.validate_indices().is_ok());
    }

    #[test]
    fn weld_remaps_quads() {
        let mut mesh = soup();
        mesh.quads.push(Quad::new(0, 3, 5, 4));
        weld_vertices(&mut mesh, DEFAULT_WELD_TOLERANCE);
        assert_eq!(mesh.quads[0], Quad::new(0, 1, 3, 2));
    }

    #[test]
    fn weld_with_tight_tolerance_is_noop() {
        let mut mesh = soup();
        assert_eq!(weld_vertices(&mut mesh, 1e-7), 0);
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn weld_rejects_bad_tolerance() {
        let mut mesh = soup();
        assert_eq!(weld_vertices(&mut mesh, 0.0), 0);
        assert_eq!(weld_vertices(&mut mesh, f32::NAN), 0);
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn weld_empty_mesh() {
        let mut mesh = Mesh::new();
        assert_eq!(weld_vertices(&mut mesh, 1.0), 0);
    }
}
