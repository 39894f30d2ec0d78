//! Core mesh types for the SML conversion toolkit.
//!
//! This crate provides the data model every other crate works on:
//!
//! - [`Vertex`] - A single-precision point in 3D space
//! - [`Triangle`] / [`Quad`] - Faces as vertex indices
//! - [`Mesh`] - Vertices, triangles, quads and comments with a running bounding box
//! - [`VertexTable`] - Exact-match vertex deduplication during construction
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`weld_vertices`] - Optional tolerance-based merge pass
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//!
//! # Precision
//!
//! Coordinates are `f32`, the precision of every format the toolkit reads
//! and writes. Index triples are `u32`.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Mesh, Triangle, Vertex, VertexTable};
//!
//! // Build a quad out of two triangles from unindexed corners
//! let mut mesh = Mesh::new();
//! let mut table = VertexTable::new();
//! let corners = [
//!     [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
//!     [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
//! ];
//! for facet in corners {
//!     let [a, b, c] = facet.map(|p| table.intern(&mut mesh, Vertex::from_array(p)));
//!     mesh.triangles.push(Triangle::new(a, b, c));
//! }
//! drop(table);
//!
//! assert_eq!(mesh.vertex_count(), 4);
//! assert_eq!(mesh.triangle_count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod mesh;
mod table;
mod triangle;
mod vertex;
mod weld;

// Re-export core types
pub use bounds::Aabb;
pub use mesh::{unit_cube, IndexError, Mesh};
pub use table::VertexTable;
pub use triangle::{Quad, Triangle};
pub use vertex::Vertex;
pub use weld::{weld_vertices, DEFAULT_WELD_TOLERANCE};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
