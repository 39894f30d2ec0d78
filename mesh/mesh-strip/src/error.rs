//! Error types for strip operations.

use thiserror::Error;

/// Errors that can occur while configuring or decoding strips.
///
/// Strip search itself cannot fail: it only reorders and rotates
/// triangles that are already in the mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StripError {
    /// A strategy name that is not one of `grid`, `window`, `exhaustive`, `link`.
    #[error("unknown strip strategy '{name}' (expected grid, window, exhaustive or link)")]
    UnknownStrategy {
        /// The name that failed to parse.
        name: String,
    },

    /// A strip word list shorter than its seed triangle.
    #[error("strip has {words} index words, at least 3 are required")]
    StripTooShort {
        /// Number of words found.
        words: usize,
    },
}

/// Result type for strip operations.
pub type StripResult<T> = std::result::Result<T, StripError>;
