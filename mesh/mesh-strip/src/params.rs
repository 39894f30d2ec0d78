//! Parameters for strip search.

use std::time::Duration;

/// Tunables of one strip-search pass.
///
/// Every threshold lives here rather than in globals, so two passes in the
/// same process never share state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripParams {
    /// Number of upcoming unplaced triangles the window strategy examines
    /// per extension step. Default: 1000
    pub window_size: usize,

    /// How many orientations of a seed triangle are tried before it is
    /// given up as a single. Values above 3 behave like 3. Default: 2
    pub seed_orientations: u32,

    /// Tombstones the grid strategy must accumulate before it compacts
    /// its buckets. Default: 10 000
    pub compact_threshold: usize,

    /// Minimum time between two grid compactions. Default: 60 s
    pub compact_interval: Duration,

    /// Minimum time between two progress log events. Default: 1 s
    pub progress_interval: Duration,
}

impl Default for StripParams {
    fn default() -> Self {
        Self {
            window_size: 1000,
            seed_orientations: 2,
            compact_threshold: 10_000,
            compact_interval: Duration::from_secs(60),
            progress_interval: Duration::from_secs(1),
        }
    }
}

impl StripParams {
    /// Params that compact the grid whenever any tombstone exists.
    ///
    /// Useful for small meshes and for exercising compaction in tests.
    #[must_use]
    pub fn eager_compaction() -> Self {
        Self {
            compact_threshold: 1,
            compact_interval: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Set the window size.
    #[must_use]
    pub const fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the number of seed orientations to try.
    #[must_use]
    pub const fn with_seed_orientations(mut self, orientations: u32) -> Self {
        self.seed_orientations = orientations;
        self
    }

    /// Set the compaction threshold and cooldown.
    #[must_use]
    pub const fn with_compaction(mut self, threshold: usize, interval: Duration) -> Self {
        self.compact_threshold = threshold;
        self.compact_interval = interval;
        self
    }

    /// Set the progress reporting interval.
    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}
