//! Candidate-generation strategy selector.

use std::fmt;
use std::str::FromStr;

use crate::error::StripError;

/// How strip search finds the next triangle of a strip.
///
/// All strategies share the same greedy extension rule; they differ only
/// in which triangles they consider as candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StripStrategy {
    /// Triangles bucketed near the shared edge in a uniform [`SpatialGrid`](crate::SpatialGrid).
    /// Approximate, amortised O(1) per step.
    Grid,
    /// The next [`window_size`](crate::StripParams::window_size) unplaced
    /// triangles in input order. Suited to input that is already local.
    Window,
    /// Every unplaced triangle. O(n) per step; the correctness baseline.
    Exhaustive,
    /// Triangles sharing the edge's first vertex, from a vertex-to-triangle
    /// map built up front. Exact and usually fastest.
    #[default]
    Link,
}

impl StripStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 4] = [Self::Grid, Self::Window, Self::Exhaustive, Self::Link];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Window => "window",
            Self::Exhaustive => "exhaustive",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for StripStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StripStrategy {
    type Err = StripError;

    /// Parse a strategy name, case-insensitively.
    ///
    /// The older names `map`, `next` and `all` are accepted as aliases of
    /// `grid`, `window` and `exhaustive`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" | "map" => Ok(Self::Grid),
            "window" | "next" => Ok(Self::Window),
            "exhaustive" | "all" => Ok(Self::Exhaustive),
            "link" => Ok(Self::Link),
            _ => Err(StripError::UnknownStrategy { name: s.to_string() }),
        }
    }
}
