//! Triangle-strip discovery for indexed meshes.
//!
//! This crate groups a mesh's triangles into strips: runs of triangles in
//! which each one shares an edge with its predecessor, so that a strip of
//! `n` triangles can be stored in `n + 2` vertex indices instead of `3n`.
//!
//! # Features
//!
//! - **Greedy extension**: Each strip grows from a seed until nothing fits
//! - **Four candidate strategies**: Spatial grid, sequential window,
//!   exhaustive scan, and vertex adjacency links
//! - **Strip encoding**: Alternating-parity word format with a matching decoder
//! - **Spatial grid**: Uniform bucket grid with lazy tombstoning and compaction
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_strip::{decode_strip, find_strips, StripParams, StripStrategy};
//!
//! let cube = unit_cube();
//! let set = find_strips(&cube, StripStrategy::Link, &StripParams::default());
//! println!("{}", set);
//!
//! // Every strip decodes back into its triangles.
//! for i in 0..set.strip_count() {
//!     let triangles = decode_strip(&set.strip_words(i)).unwrap();
//!     assert_eq!(triangles.len(), set.strips[i].len());
//! }
//! ```
//!
//! # Algorithm
//!
//! 1. Take the first unplaced triangle in input order as the seed
//! 2. Ask the strategy for an unplaced triangle containing the edge the
//!    strip parity selects, rotate it to start with that edge, append it
//! 3. Repeat until no candidate exists; if the seed never extended, rotate
//!    it once and try again
//! 4. Strips of one triangle become singles

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod candidates;
mod encode;
mod error;
mod grid;
mod params;
mod result;
mod search;
mod strategy;

// Re-export main types and functions
pub use encode::{align_to_edge, decode_strip, decode_strip_into, encode_strip, shared_edge};
pub use error::{StripError, StripResult};
pub use grid::{NearBuckets, SpatialGrid, MAX_GRID_SIZE, MIN_GRID_SIZE, TOMBSTONE};
pub use params::StripParams;
pub use result::StripSet;
pub use search::find_strips;
pub use strategy::StripStrategy;
