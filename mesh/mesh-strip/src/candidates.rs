//! Candidate sources for strip extension.
//!
//! Each strip strategy answers one question: given the directed edge the
//! next strip triangle must start with, which unplaced triangle (if any)
//! contains it? The answer is aligned in place and marked placed.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use mesh_types::{Mesh, Triangle, Vertex};
use smallvec::SmallVec;

use crate::encode::align_to_edge;
use crate::grid::{SpatialGrid, TOMBSTONE};
use crate::params::StripParams;

/// Which triangles have been assigned to a strip or to the singles.
#[derive(Debug)]
pub(crate) struct Placement {
    used: Vec<bool>,
    placed: usize,
}

impl Placement {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            used: vec![false; count],
            placed: 0,
        }
    }

    pub(crate) fn is_placed(&self, t: u32) -> bool {
        self.used[t as usize]
    }

    pub(crate) fn place(&mut self, t: u32) {
        debug_assert!(!self.used[t as usize], "triangle {t} placed twice");
        self.used[t as usize] = true;
        self.placed += 1;
    }

    pub(crate) const fn placed(&self) -> usize {
        self.placed
    }
}

/// One strategy's way of finding the next strip triangle.
pub(crate) trait CandidateSource {
    /// Called when `seed` has been placed as the start of a new strip.
    fn begin_strip(&mut self, _seed: u32) {}

    /// Find an unplaced triangle containing the directed `edge`, rotate it to
    /// start with that edge, mark it placed and return its index.
    fn claim(
        &mut self,
        triangles: &mut [Triangle],
        placement: &mut Placement,
        edge: (u32, u32),
    ) -> Option<u32>;

    /// Called once per finished strip.
    fn maintain(&mut self) {}
}

/// Scan of the unplaced triangles in input order, optionally limited to a
/// window at the front of the queue.
#[derive(Debug)]
pub(crate) struct QueueCandidates {
    queue: VecDeque<u32>,
    window: Option<usize>,
}

impl QueueCandidates {
    /// Every unplaced triangle is a candidate.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn exhaustive(count: usize) -> Self {
        // Truncation: triangle indices are u32 throughout.
        Self {
            queue: (0..count as u32).collect(),
            window: None,
        }
    }

    /// Only the first `window` unplaced triangles are candidates.
    pub(crate) fn windowed(count: usize, window: usize) -> Self {
        Self {
            window: Some(window),
            ..Self::exhaustive(count)
        }
    }
}

impl CandidateSource for QueueCandidates {
    fn begin_strip(&mut self, seed: u32) {
        // Seeds are taken in input order, so the seed sits at the front.
        if self.queue.front() == Some(&seed) {
            self.queue.pop_front();
        } else if let Some(pos) = self.queue.iter().position(|&t| t == seed) {
            self.queue.remove(pos);
        }
    }

    fn claim(
        &mut self,
        triangles: &mut [Triangle],
        placement: &mut Placement,
        edge: (u32, u32),
    ) -> Option<u32> {
        let limit = self.window.unwrap_or(usize::MAX);
        let pos = self.queue.iter().take(limit).position(|&t| {
            !placement.is_placed(t) && align_to_edge(&mut triangles[t as usize], edge)
        })?;
        let t = self.queue.remove(pos)?;
        placement.place(t);
        Some(t)
    }
}

/// Lookup of triangles bucketed near either vertex of the shared edge.
#[derive(Debug)]
pub(crate) struct GridCandidates<'a> {
    vertices: &'a [Vertex],
    grid: SpatialGrid,
    dirtiness: usize,
    last_compact: Instant,
    compact_threshold: usize,
    compact_interval: Duration,
}

impl<'a> GridCandidates<'a> {
    pub(crate) fn new(mesh: &'a Mesh, params: &StripParams) -> Self {
        Self {
            vertices: mesh.vertices(),
            grid: SpatialGrid::for_mesh(mesh),
            dirtiness: 0,
            last_compact: Instant::now(),
            compact_threshold: params.compact_threshold,
            compact_interval: params.compact_interval,
        }
    }

    fn retire(&mut self, bucket: usize, slot: usize) {
        if self.grid.tombstone(bucket, slot) {
            self.dirtiness += 1;
        }
    }
}

impl CandidateSource for GridCandidates<'_> {
    fn claim(
        &mut self,
        triangles: &mut [Triangle],
        placement: &mut Placement,
        edge: (u32, u32),
    ) -> Option<u32> {
        let vertices = self.vertices;
        for v in [edge.0, edge.1] {
            let Some(vertex) = vertices.get(v as usize) else {
                continue;
            };
            for bucket in self.grid.near(vertex) {
                let mut stale: SmallVec<[usize; 8]> = SmallVec::new();
                let mut hit = None;
                for (slot, &t) in self.grid.bucket(bucket).iter().enumerate() {
                    if t == TOMBSTONE {
                        continue;
                    }
                    if placement.is_placed(t) {
                        stale.push(slot);
                    } else if align_to_edge(&mut triangles[t as usize], edge) {
                        hit = Some((slot, t));
                        break;
                    }
                }
                for slot in stale {
                    self.retire(bucket, slot);
                }
                if let Some((slot, t)) = hit {
                    self.retire(bucket, slot);
                    placement.place(t);
                    return Some(t);
                }
            }
        }
        None
    }

    fn maintain(&mut self) {
        if self.dirtiness >= self.compact_threshold
            && self.last_compact.elapsed() >= self.compact_interval
        {
            self.grid.compact();
            self.dirtiness = 0;
            self.last_compact = Instant::now();
        }
    }
}

/// Exact lookup through a vertex-to-triangle map built up front.
#[derive(Debug)]
pub(crate) struct LinkCandidates {
    links: HashMap<u32, Vec<u32>>,
}

impl LinkCandidates {
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn new(triangles: &[Triangle]) -> Self {
        let mut links: HashMap<u32, Vec<u32>> = HashMap::new();
        for (t, tri) in triangles.iter().enumerate() {
            // Truncation: triangle indices are u32 throughout.
            let t = t as u32;
            let [a, b, c] = tri.indices();
            links.entry(a).or_default().push(t);
            if b != a {
                links.entry(b).or_default().push(t);
            }
            if c != a && c != b {
                links.entry(c).or_default().push(t);
            }
        }
        Self { links }
    }
}

impl CandidateSource for LinkCandidates {
    fn claim(
        &mut self,
        triangles: &mut [Triangle],
        placement: &mut Placement,
        edge: (u32, u32),
    ) -> Option<u32> {
        // Any triangle containing the edge references its first vertex.
        let incident = self.links.get_mut(&edge.0)?;
        incident.retain(|&t| !placement.is_placed(t));
        let pos = incident
            .iter()
            .position(|&t| align_to_edge(&mut triangles[t as usize], edge))?;
        let t = incident.remove(pos);
        placement.place(t);
        Some(t)
    }
}
