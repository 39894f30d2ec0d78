//! Vertex deduplication during mesh construction.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use crate::{Mesh, Vertex};

/// Maps vertex values to their index in a [`Mesh`], so that equal
/// positions are stored once.
///
/// Readers that receive unindexed geometry (binary STL repeats every
/// corner per facet) intern each corner through the table. The table is
/// only needed while the mesh is being built; drop it or call
/// [`clear`](Self::clear) once construction is done.
///
/// Equality is exact float equality, the same rule as `Vertex == Vertex`.
///
/// # Example
///
/// ```
/// use mesh_types::{Mesh, Vertex, VertexTable};
///
/// let mut mesh = Mesh::new();
/// let mut table = VertexTable::new();
///
/// let a = table.intern(&mut mesh, Vertex::from_coords(0.0, 0.0, 0.0));
/// let b = table.intern(&mut mesh, Vertex::from_coords(1.0, 0.0, 0.0));
/// let c = table.intern(&mut mesh, Vertex::from_coords(0.0, 0.0, 0.0));
///
/// assert_eq!(a, c);
/// assert_ne!(a, b);
/// assert_eq!(mesh.vertex_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VertexTable {
    lookup: HashMap<[u32; 3], u32>,
}

impl VertexTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table sized for `capacity` distinct vertices.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// Seed a table with the vertices a mesh already holds.
    ///
    /// When the mesh itself contains duplicates, the first occurrence wins.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut table = Self::with_capacity(mesh.vertex_count());
        for (index, vertex) in mesh.vertices().iter().enumerate() {
            table.lookup.entry(vertex.key()).or_insert(index as u32);
        }
        table
    }

    /// Return the index of `vertex` in `mesh`, appending it if unseen.
    ///
    /// Appending goes through [`Mesh::push_vertex`], so the mesh bounds
    /// widen as a side effect.
    pub fn intern(&mut self, mesh: &mut Mesh, vertex: Vertex) -> u32 {
        match self.lookup.entry(vertex.key()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => *entry.insert(mesh.push_vertex(vertex)),
        }
    }

    /// Look up `vertex` without inserting it.
    #[must_use]
    pub fn get(&self, vertex: &Vertex) -> Option<u32> {
        self.lookup.get(&vertex.key()).copied()
    }

    /// Number of distinct vertices seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Check whether nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Forget every entry and release the memory.
    pub fn clear(&mut self) {
        self.lookup = HashMap::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn intern_dedups_exact_matches() {
        let mut mesh = Mesh::new();
        let mut table = VertexTable::new();

        let coords = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.5, 0.5, 0.5],
        ];
        let indices: Vec<u32> = coords
            .iter()
            .map(|&c| table.intern(&mut mesh, Vertex::from_array(c)))
            .collect();

        assert_eq!(indices, vec![0, 1, 0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn intern_keeps_near_duplicates_apart() {
        let mut mesh = Mesh::new();
        let mut table = VertexTable::new();
        let a = table.intern(&mut mesh, Vertex::from_coords(1.0, 1.0, 1.0));
        let b = table.intern(&mut mesh, Vertex::from_coords(1.0, 1.0, 1.000_001));
        assert_ne!(a, b);
    }

    #[test]
    fn intern_widens_bounds() {
        let mut mesh = Mesh::new();
        let mut table = VertexTable::new();
        table.intern(&mut mesh, Vertex::from_coords(-1.0, 2.0, 0.0));
        table.intern(&mut mesh, Vertex::from_coords(3.0, -4.0, 5.0));
        assert_eq!(mesh.bounds().min, Point3::new(-1.0, -4.0, 0.0));
        assert_eq!(mesh.bounds().max, Point3::new(3.0, 2.0, 5.0));
    }

    #[test]
    fn from_mesh_reuses_existing_vertices() {
        let mut mesh = crate::unit_cube();
        let mut table = VertexTable::from_mesh(&mesh);
        let idx = table.intern(&mut mesh, Vertex::from_coords(1.0, 1.0, 1.0));
        assert_eq!(idx, 6);
        assert_eq!(mesh.vertex_count(), 8);
    }

    #[test]
    fn clear_forgets_entries() {
        let mut mesh = Mesh::new();
        let mut table = VertexTable::new();
        table.intern(&mut mesh, Vertex::from_coords(0.0, 0.0, 0.0));
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.get(&Vertex::from_coords(0.0, 0.0, 0.0)), None);
    }
}
