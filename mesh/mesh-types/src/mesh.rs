//! The mesh data model.

use thiserror::Error;

use crate::{Aabb, Quad, Triangle, Vertex};

/// A face that references a vertex past the end of the vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A triangle corner is out of range.
    #[error("triangle {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    Triangle {
        /// Position of the triangle in the triangle list.
        face: usize,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A quad corner is out of range.
    #[error("quad {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    Quad {
        /// Position of the quad in the quad list.
        face: usize,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

impl IndexError {
    /// The vertex index that was out of range.
    #[must_use]
    pub const fn index(&self) -> u32 {
        match self {
            Self::Triangle { index, .. } | Self::Quad { index, .. } => *index,
        }
    }

    /// Number of vertices the mesh actually has.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        match self {
            Self::Triangle { vertex_count, .. } | Self::Quad { vertex_count, .. } => *vertex_count,
        }
    }
}

/// A mesh of indexed triangles and quads with free-form comments.
///
/// Vertices are insertion-ordered and only appended through
/// [`push_vertex`](Self::push_vertex) (or [`VertexTable::intern`](crate::VertexTable::intern)
/// for deduplicated input), which keeps the bounding box current. The
/// face lists are public; callers that fill them directly are expected to
/// respect the invariant that every index is `< vertex_count()`, and can
/// check it with [`validate_indices`](Self::validate_indices).
///
/// # Example
///
/// ```
/// use mesh_types::{Mesh, Triangle, Vertex};
///
/// let mut mesh = Mesh::new();
/// let a = mesh.push_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
/// let b = mesh.push_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
/// let c = mesh.push_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.triangles.push(Triangle::new(a, b, c));
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// assert!(mesh.validate_indices().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,

    /// Triangles as vertex index triples.
    pub triangles: Vec<Triangle>,

    /// Quads, carried through untouched.
    pub quads: Vec<Quad>,

    /// Free-form comments stored alongside the geometry.
    pub comments: Vec<String>,

    bounds: Aabb,
}

impl Mesh {
    /// Create a new empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            ..Self::default()
        }
    }

    /// Create a mesh from vertices and triangles, computing the bounds.
    #[must_use]
    pub fn from_parts(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Self {
        let mut mesh = Self {
            vertices,
            triangles,
            ..Self::default()
        };
        mesh.recompute_bounds();
        mesh
    }

    /// Append a vertex without deduplication and return its index.
    ///
    /// The bounding box widens to include the new position.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: indices are u32 on the wire, meshes with >4B vertices are unsupported
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.bounds.expand_to_include(&vertex.position);
        self.vertices.push(vertex);
        index
    }

    /// Reserve room for `additional` more vertices.
    pub fn reserve_vertices(&mut self, additional: usize) {
        self.vertices.reserve(additional);
    }

    /// All vertices in insertion order.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The vertex at `index`, if it exists.
    #[inline]
    #[must_use]
    pub fn vertex(&self, index: u32) -> Option<&Vertex> {
        self.vertices.get(index as usize)
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of quads.
    #[inline]
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Check whether the mesh has no faces at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.quads.is_empty()
    }

    /// Bounding box of every vertex pushed so far.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Recompute the bounding box from the current vertex list.
    pub fn recompute_bounds(&mut self) {
        self.bounds = Aabb::from_points(self.vertices.iter().map(|v| &v.position));
    }

    /// Replace the vertex list wholesale and recompute the bounds.
    ///
    /// Face indices are not touched; callers remapping vertices must
    /// rewrite them in the same step.
    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) {
        self.vertices = vertices;
        self.recompute_bounds();
    }

    /// Check that every triangle and quad index is `< vertex_count()`.
    ///
    /// # Errors
    ///
    /// Returns the first offending face.
    pub fn validate_indices(&self) -> Result<(), IndexError> {
        let vertex_count = self.vertices.len();
        let in_range = |i: u32| (i as usize) < vertex_count;

        for (face, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.indices().iter().find(|&&i| !in_range(i)) {
                return Err(IndexError::Triangle {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        for (face, quad) in self.quads.iter().enumerate() {
            if let Some(&index) = quad.v.iter().find(|&&i| !in_range(i)) {
                return Err(IndexError::Quad {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}

/// Helper function to create a unit cube mesh.
///
/// Creates a cube from (0,0,0) to (1,1,1): 8 vertices and 12 triangles
/// with outward-facing winding. Every pair of triangles on a face shares
/// an edge, so it always yields strips.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.triangle_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 12);

    for [x, y, z] in [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ] {
        mesh.push_vertex(Vertex::from_coords(x, y, z));
    }

    mesh.triangles.extend(
        [
            // Bottom (z=0)
            [0, 2, 1],
            [0, 3, 2],
            // Top (z=1)
            [4, 5, 6],
            [4, 6, 7],
            // Front (y=0)
            [0, 1, 5],
            [0, 5, 4],
            // Back (y=1)
            [3, 7, 6],
            [3, 6, 2],
            // Left (x=0)
            [0, 4, 7],
            [0, 7, 3],
            // Right (x=1)
            [1, 2, 6],
            [1, 6, 5],
        ]
        .map(Triangle::from_indices),
    );

    mesh
}
