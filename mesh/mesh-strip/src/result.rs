//! Strip search output.

use std::fmt;

use mesh_types::Triangle;

use crate::encode::encode_strip;
use crate::strategy::StripStrategy;

/// Partition of a mesh's triangles into strips and singles.
///
/// `triangles` holds the search's working copy of the mesh triangles, in
/// input order but possibly rotated. Strips and singles index into it, and
/// every index appears exactly once across the two.
#[derive(Debug, Clone, Default)]
pub struct StripSet {
    /// Working copy of the triangles, aligned for strip encoding.
    pub triangles: Vec<Triangle>,

    /// Ordered runs of at least two triangles.
    pub strips: Vec<Vec<u32>>,

    /// Triangles that could not be joined to any strip.
    pub singles: Vec<u32>,

    /// Strategy that produced the partition.
    pub strategy: StripStrategy,
}

impl StripSet {
    /// Number of strips.
    #[must_use]
    pub fn strip_count(&self) -> usize {
        self.strips.len()
    }

    /// Number of single triangles.
    #[must_use]
    pub fn single_count(&self) -> usize {
        self.singles.len()
    }

    /// Number of triangles covered by strips.
    #[must_use]
    pub fn stripped_triangle_count(&self) -> usize {
        self.strips.iter().map(Vec::len).sum()
    }

    /// Length of the longest strip, or 0 if there are none.
    #[must_use]
    pub fn longest_strip(&self) -> usize {
        self.strips.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Mean strip length, or 0.0 if there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_strip_length(&self) -> f64 {
        if self.strips.is_empty() {
            0.0
        } else {
            self.stripped_triangle_count() as f64 / self.strips.len() as f64
        }
    }

    /// Index words for strip `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= strip_count()`.
    #[must_use]
    pub fn strip_words(&self, i: usize) -> Vec<u32> {
        encode_strip(&self.triangles, &self.strips[i])
    }

    /// Triangles of strip `i`, in strip order and orientation.
    pub fn strip_triangles(&self, i: usize) -> impl Iterator<Item = Triangle> + '_ {
        self.strips
            .get(i)
            .into_iter()
            .flatten()
            .map(|&t| self.triangles[t as usize])
    }

    /// Single triangles, in placement order.
    pub fn single_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.singles.iter().map(|&t| self.triangles[t as usize])
    }

    /// Total index words needed to store this partition: `n + 2` per strip
    /// plus three per single.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.strips.iter().map(|s| s.len() + 2).sum::<usize>() + self.singles.len() * 3
    }

    /// Whether every triangle index appears exactly once across strips and
    /// singles.
    #[must_use]
    pub fn is_partition(&self) -> bool {
        let mut seen = vec![false; self.triangles.len()];
        for &t in self.strips.iter().flatten().chain(&self.singles) {
            match seen.get_mut(t as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        seen.into_iter().all(|s| s)
    }
}

impl fmt::Display for StripSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Strips ({}): {} triangles -> {} strips (longest {}, mean {:.1}), {} singles, {} index words",
            self.strategy,
            self.triangles.len(),
            self.strip_count(),
            self.longest_strip(),
            self.mean_strip_length(),
            self.single_count(),
            self.word_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StripSet {
        StripSet {
            triangles: vec![
                Triangle::new(0, 1, 2),
                Triangle::new(0, 2, 3),
                Triangle::new(4, 5, 6),
            ],
            strips: vec![vec![0, 1]],
            singles: vec![2],
            strategy: StripStrategy::Link,
        }
    }

    #[test]
    fn stats() {
        let set = sample();
        assert_eq!(set.strip_count(), 1);
        assert_eq!(set.single_count(), 1);
        assert_eq!(set.stripped_triangle_count(), 2);
        assert_eq!(set.longest_strip(), 2);
        assert!((set.mean_strip_length() - 2.0).abs() < 1e-12);
        assert_eq!(set.word_count(), 7);
        assert!(set.is_partition());
    }

    #[test]
    fn words_and_triangles() {
        let set = sample();
        assert_eq!(set.strip_words(0), vec![0, 1, 2, 3]);
        assert_eq!(set.strip_triangles(0).count(), 2);
        assert_eq!(set.strip_triangles(5).count(), 0);
        assert_eq!(
            set.single_triangles().collect::<Vec<_>>(),
            vec![Triangle::new(4, 5, 6)]
        );
    }

    #[test]
    fn partition_detects_duplicates_and_gaps() {
        let mut set = sample();
        set.singles = vec![1];
        assert!(!set.is_partition());

        set.singles = vec![];
        assert!(!set.is_partition());
    }

    #[test]
    fn display() {
        let s = format!("{}", sample());
        assert!(s.contains("link"));
        assert!(s.contains("1 strips"));
        assert!(s.contains("1 singles"));
    }

    #[test]
    fn empty_set() {
        let set = StripSet::default();
        assert_eq!(set.longest_strip(), 0);
        assert!(set.mean_strip_length().abs() < f64::EPSILON);
        assert!(set.is_partition());
    }
}
