//! Uniform spatial grid over a mesh bounding box.
//!
//! Each bucket lists the triangles that have at least one vertex inside the
//! bucket's cell. Strip search never removes entries eagerly: a placed
//! triangle's slot is overwritten with [`TOMBSTONE`] and the buckets are
//! compacted once enough tombstones have piled up.

use mesh_types::{Aabb, Mesh, Triangle, Vertex};
use smallvec::SmallVec;
use tracing::debug;

/// Marker for a bucket slot whose triangle has been placed.
pub const TOMBSTONE: u32 = u32::MAX;

/// Smallest allowed grid resolution per axis.
pub const MIN_GRID_SIZE: u32 = 2;

/// Largest allowed grid resolution per axis.
pub const MAX_GRID_SIZE: u32 = 1024;

/// Bucket indices returned by [`SpatialGrid::near`]: a cell and its six
/// face neighbours.
pub type NearBuckets = SmallVec<[usize; 7]>;

/// A `size`³ grid of triangle-index buckets.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    size: u32,
    bounds: Aabb,
    buckets: Vec<Vec<u32>>,
    built: bool,
}

impl SpatialGrid {
    /// Create an unbuilt grid sized for `vertex_count` vertices.
    ///
    /// No buckets are allocated until [`build`](Self::build) is called.
    #[must_use]
    pub fn new(vertex_count: usize, bounds: Aabb) -> Self {
        Self::with_size(Self::size_for(vertex_count), bounds)
    }

    /// Create an unbuilt grid with an explicit resolution, clamped to
    /// `[MIN_GRID_SIZE, MAX_GRID_SIZE]`.
    #[must_use]
    pub fn with_size(size: u32, bounds: Aabb) -> Self {
        Self {
            size: size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE),
            bounds,
            buckets: Vec::new(),
            built: false,
        }
    }

    /// Create and build a grid over a mesh's vertices and triangles.
    #[must_use]
    pub fn for_mesh(mesh: &Mesh) -> Self {
        let mut grid = Self::new(mesh.vertex_count(), mesh.bounds());
        grid.build(mesh.vertices(), &mesh.triangles);
        grid
    }

    /// Grid resolution for a vertex count: `ceil(sqrt(n)) / 4`, clamped.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn size_for(vertex_count: usize) -> u32 {
        // Truncation: the quotient is at most ~2^30 for any usize count and
        // is clamped below to a small grid size anyway.
        let raw = ((vertex_count as f64).sqrt().ceil() / 4.0) as u64;
        raw.clamp(u64::from(MIN_GRID_SIZE), u64::from(MAX_GRID_SIZE)) as u32
    }

    /// Resolution per axis.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Total number of buckets (`size`³).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        let s = self.size as usize;
        s * s * s
    }

    /// Whether [`build`](Self::build) has run.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.built
    }

    /// The bounds the grid was laid over.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Allocate buckets and insert every triangle into the bucket of each of
    /// its vertices, once per distinct bucket.
    ///
    /// Idempotent: a grid that is already built is left untouched.
    /// Triangles referencing a vertex outside `vertices` are skipped for that
    /// corner.
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(&mut self, vertices: &[Vertex], triangles: &[Triangle]) {
        if self.built {
            return;
        }
        self.buckets = vec![Vec::new(); self.bucket_count()];

        for (t, tri) in triangles.iter().enumerate() {
            // Truncation: mesh triangle counts are bounded by u32 indexing.
            let t = t as u32;
            let mut seen: SmallVec<[usize; 3]> = SmallVec::new();
            for index in tri.indices() {
                let Some(vertex) = vertices.get(index as usize) else {
                    continue;
                };
                let bucket = self.bucket_of(vertex);
                if !seen.contains(&bucket) {
                    seen.push(bucket);
                    self.buckets[bucket].push(t);
                }
            }
        }

        self.built = true;
        debug!(
            size = self.size,
            triangles = triangles.len(),
            "Built spatial grid"
        );
    }

    /// Integer cell coordinates of a vertex.
    ///
    /// Each axis is mapped to `[0, 1]` against the bounds, scaled by
    /// `size - 1` and rounded. Axes with zero extent map to cell 0; vertices
    /// outside the bounds are clamped to the border cells.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn cell_of(&self, vertex: &Vertex) -> [u32; 3] {
        let scale = (self.size - 1) as f32;
        // Truncation: normalized coordinates lie in [0, 1], so the rounded
        // product lies in [0, size - 1].
        self.bounds
            .normalize(&vertex.position)
            .map(|t| (t * scale).round() as u32)
    }

    /// Linear bucket index of a vertex.
    #[must_use]
    pub fn bucket_of(&self, vertex: &Vertex) -> usize {
        self.linear(self.cell_of(vertex))
    }

    /// The vertex's bucket followed by its face-adjacent neighbours that lie
    /// inside the grid. At most seven indices.
    #[must_use]
    pub fn near(&self, vertex: &Vertex) -> NearBuckets {
        let [x, y, z] = self.cell_of(vertex);
        let max = self.size - 1;
        let mut out = NearBuckets::new();
        out.push(self.linear([x, y, z]));
        if x > 0 {
            out.push(self.linear([x - 1, y, z]));
        }
        if x < max {
            out.push(self.linear([x + 1, y, z]));
        }
        if y > 0 {
            out.push(self.linear([x, y - 1, z]));
        }
        if y < max {
            out.push(self.linear([x, y + 1, z]));
        }
        if z > 0 {
            out.push(self.linear([x, y, z - 1]));
        }
        if z < max {
            out.push(self.linear([x, y, z + 1]));
        }
        out
    }

    /// Triangle indices (and tombstones) stored in a bucket.
    ///
    /// Empty for an unbuilt grid or an out-of-range bucket.
    #[must_use]
    pub fn bucket(&self, bucket: usize) -> &[u32] {
        self.buckets.get(bucket).map_or(&[], Vec::as_slice)
    }

    /// Overwrite one bucket slot with [`TOMBSTONE`].
    ///
    /// Returns `true` if a live entry was replaced.
    pub fn tombstone(&mut self, bucket: usize, slot: usize) -> bool {
        match self.buckets.get_mut(bucket).and_then(|b| b.get_mut(slot)) {
            Some(entry) if *entry != TOMBSTONE => {
                *entry = TOMBSTONE;
                true
            }
            _ => false,
        }
    }

    /// Drop every tombstone from every bucket, preserving the relative order
    /// of the live entries. Returns the number of slots removed.
    pub fn compact(&mut self) -> usize {
        let mut removed = 0;
        for bucket in &mut self.buckets {
            let before = bucket.len();
            bucket.retain(|&t| t != TOMBSTONE);
            removed += before - bucket.len();
        }
        debug!(removed, "Compacted spatial grid");
        removed
    }

    /// Number of tombstoned slots across all buckets.
    #[must_use]
    pub fn tombstone_count(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.iter().filter(|&&t| t == TOMBSTONE).count())
            .sum()
    }

    fn linear(&self, [x, y, z]: [u32; 3]) -> usize {
        let s = self.size as usize;
        x as usize + s * (y as usize + s * z as usize)
    }
}
