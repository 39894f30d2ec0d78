//! Greedy strip search.
//!
//! Seeds are taken in input order. Each seed is extended one triangle at a
//! time across the edge dictated by the strip parity until the candidate
//! source has nothing left that fits.

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_possible_truncation)]

use std::time::Instant;

use mesh_types::{Mesh, Triangle};
use tracing::{debug, info};

use crate::candidates::{
    CandidateSource, GridCandidates, LinkCandidates, Placement, QueueCandidates,
};
use crate::encode::shared_edge;
use crate::params::StripParams;
use crate::result::StripSet;
use crate::strategy::StripStrategy;

/// Partition a mesh's triangles into strips and singles.
///
/// The mesh is not modified; the search works on its own copy of the
/// triangle list, which is returned in [`StripSet::triangles`] with each
/// triangle rotated as its strip requires.
///
/// # Arguments
///
/// * `mesh` - The mesh whose triangles are grouped
/// * `strategy` - How candidates for each extension step are found
/// * `params` - Search tunables
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_strip::{find_strips, StripParams, StripStrategy};
///
/// let cube = unit_cube();
/// let set = find_strips(&cube, StripStrategy::Link, &StripParams::default());
/// assert!(set.is_partition());
/// assert!(set.longest_strip() >= 2);
/// ```
#[must_use]
pub fn find_strips(mesh: &Mesh, strategy: StripStrategy, params: &StripParams) -> StripSet {
    let start = Instant::now();
    let mut triangles = mesh.triangles.clone();
    let count = triangles.len();

    info!(
        triangles = count,
        strategy = %strategy,
        "Starting strip search"
    );

    let (strips, singles) = match strategy {
        StripStrategy::Grid => {
            let mut source = GridCandidates::new(mesh, params);
            grow_strips(&mut triangles, &mut source, params)
        }
        StripStrategy::Window => {
            let mut source = QueueCandidates::windowed(count, params.window_size);
            grow_strips(&mut triangles, &mut source, params)
        }
        StripStrategy::Exhaustive => {
            let mut source = QueueCandidates::exhaustive(count);
            grow_strips(&mut triangles, &mut source, params)
        }
        StripStrategy::Link => {
            let mut source = LinkCandidates::new(&mesh.triangles);
            grow_strips(&mut triangles, &mut source, params)
        }
    };

    let set = StripSet {
        triangles,
        strips,
        singles,
        strategy,
    };

    info!(
        strips = set.strip_count(),
        singles = set.single_count(),
        longest = set.longest_strip(),
        elapsed_ms = start.elapsed().as_millis(),
        "Strip search complete"
    );

    set
}

/// Run the seed loop against one candidate source.
fn grow_strips<S: CandidateSource>(
    triangles: &mut [Triangle],
    source: &mut S,
    params: &StripParams,
) -> (Vec<Vec<u32>>, Vec<u32>) {
    let total = triangles.len();
    let orientations = params.seed_orientations.clamp(1, 3);
    let mut placement = Placement::new(total);
    let mut strips = Vec::new();
    let mut singles = Vec::new();
    let mut last_report = Instant::now();

    for seed in 0..total as u32 {
        if placement.is_placed(seed) {
            continue;
        }
        placement.place(seed);
        source.begin_strip(seed);

        let original = triangles[seed as usize];
        let mut strip = vec![seed];
        for attempt in 0..orientations {
            if attempt > 0 {
                triangles[seed as usize].rotate();
            }
            extend_strip(triangles, source, &mut placement, &mut strip);
            if strip.len() > 1 {
                break;
            }
        }

        if strip.len() > 1 {
            strips.push(strip);
        } else {
            // Singles keep their input winding order.
            triangles[seed as usize] = original;
            singles.push(seed);
        }
        source.maintain();

        if last_report.elapsed() >= params.progress_interval {
            info!(
                placed = placement.placed(),
                total,
                strips = strips.len(),
                "Strip search progress"
            );
            last_report = Instant::now();
        }
    }

    debug!(
        strips = strips.len(),
        singles = singles.len(),
        "Seed loop finished"
    );

    (strips, singles)
}

/// Append triangles to `strip` until the source finds no continuation.
fn extend_strip<S: CandidateSource>(
    triangles: &mut [Triangle],
    source: &mut S,
    placement: &mut Placement,
    strip: &mut Vec<u32>,
) {
    while let Some(&last) = strip.last() {
        let edge = shared_edge(&triangles[last as usize], strip.len());
        match source.claim(triangles, placement, edge) {
            Some(next) => strip.push(next),
            None => break,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::encode::decode_strip;
    use mesh_types::{unit_cube, Vertex};

    /// A row of `n` quads split into a zig-zag of `2n` triangles.
    fn ribbon(n: u32) -> Mesh {
        let mut vertices = Vec::new();
        for i in 0..=n {
            vertices.push(Vertex::from_coords(i as f32, 0.0, 0.0));
            vertices.push(Vertex::from_coords(i as f32, 1.0, 0.0));
        }
        let mut triangles = Vec::new();
        for i in 0..n {
            let (b0, t0, b1, t1) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
            triangles.push(Triangle::new(t0, b0, b1));
            triangles.push(Triangle::new(t0, b1, t1));
        }
        Mesh::from_parts(vertices, triangles)
    }

    fn decoded_triangles(set: &StripSet) -> Vec<Triangle> {
        let mut out = Vec::new();
        for i in 0..set.strip_count() {
            out.extend(decode_strip(&set.strip_words(i)).unwrap());
        }
        out.extend(set.single_triangles());
        out
    }

    fn assert_same_triangles(mesh: &Mesh, set: &StripSet) {
        let mut expected: Vec<Triangle> = mesh.triangles.iter().map(Triangle::canonical).collect();
        let mut actual: Vec<Triangle> = decoded_triangles(set)
            .iter()
            .map(Triangle::canonical)
            .collect();
        expected.sort_by_key(Triangle::indices);
        actual.sort_by_key(Triangle::indices);
        assert_eq!(expected, actual);
    }

    #[test]
    fn cube_strips_for_every_strategy() {
        let cube = unit_cube();
        for strategy in StripStrategy::ALL {
            let set = find_strips(&cube, strategy, &StripParams::default());
            assert!(set.is_partition(), "{strategy}");
            assert!(set.longest_strip() >= 2, "{strategy}");
            assert_same_triangles(&cube, &set);
        }
    }

    #[test]
    fn single_triangle_is_single() {
        let mesh = Mesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![Triangle::new(0, 1, 2)],
        );
        for strategy in StripStrategy::ALL {
            let set = find_strips(&mesh, strategy, &StripParams::default());
            assert_eq!(set.strip_count(), 0);
            assert_eq!(set.singles, vec![0]);
            assert_eq!(set.triangles, mesh.triangles);
        }
    }

    #[test]
    fn disjoint_triangles_are_singles() {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for i in 0..5u32 {
            let x = i as f32 * 10.0;
            vertices.push(Vertex::from_coords(x, 0.0, 0.0));
            vertices.push(Vertex::from_coords(x + 1.0, 0.0, 0.0));
            vertices.push(Vertex::from_coords(x, 1.0, 0.0));
            triangles.push(Triangle::new(3 * i, 3 * i + 1, 3 * i + 2));
        }
        let mesh = Mesh::from_parts(vertices, triangles);
        let set = find_strips(&mesh, StripStrategy::Link, &StripParams::default());
        assert_eq!(set.strip_count(), 0);
        assert_eq!(set.singles, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn ribbon_is_one_strip() {
        let mesh = ribbon(6);
        for strategy in StripStrategy::ALL {
            let set = find_strips(&mesh, strategy, &StripParams::default());
            assert!(set.is_partition(), "{strategy}");
            assert_eq!(set.strip_count(), 1, "{strategy}");
            assert_eq!(set.longest_strip(), 12, "{strategy}");
            assert_eq!(set.word_count(), 14, "{strategy}");
            assert_same_triangles(&mesh, &set);
        }
    }

    #[test]
    fn seed_rotation_rescues_strip() {
        // The seed's (a, c) edge is a boundary; its (b, a) edge is not.
        // One rotation turns that edge into the strip edge.
        let mesh = Mesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
                Vertex::from_coords(1.0, -1.0, 0.0),
            ],
            vec![Triangle::new(0, 1, 2), Triangle::new(1, 0, 3)],
        );

        let one = StripParams::default().with_seed_orientations(1);
        let set = find_strips(&mesh, StripStrategy::Exhaustive, &one);
        assert_eq!(set.strip_count(), 0);

        let set = find_strips(&mesh, StripStrategy::Exhaustive, &StripParams::default());
        assert_eq!(set.strip_count(), 1);
        assert_same_triangles(&mesh, &set);
    }

    #[test]
    fn window_of_zero_finds_no_strips() {
        let params = StripParams::default().with_window_size(0);
        let set = find_strips(&ribbon(3), StripStrategy::Window, &params);
        assert_eq!(set.strip_count(), 0);
        assert_eq!(set.single_count(), 6);
    }

    #[test]
    fn grid_with_eager_compaction() {
        let mesh = ribbon(20);
        let set = find_strips(&mesh, StripStrategy::Grid, &StripParams::eager_compaction());
        assert!(set.is_partition());
        assert_same_triangles(&mesh, &set);
    }

    #[test]
    fn empty_mesh() {
        let set = find_strips(&Mesh::new(), StripStrategy::Grid, &StripParams::default());
        assert!(set.strips.is_empty());
        assert!(set.singles.is_empty());
        assert!(set.is_partition());
    }
}
