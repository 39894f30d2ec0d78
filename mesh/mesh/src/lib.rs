//! Mesh conversion toolkit with triangle-strip compression.
//!
//! This umbrella crate re-exports the mesh-* crates, providing a unified API
//! for loading meshes, discovering triangle strips and writing the compact
//! SML format.
//!
//! # Quick Start
//!
//! ```no_run
//! use mesh::prelude::*;
//!
//! // Load a mesh
//! let mut mesh = load_mesh("model.stl").unwrap();
//!
//! // Merge near-coincident corners left behind by the facet soup
//! weld_vertices(&mut mesh, DEFAULT_WELD_TOLERANCE);
//!
//! // Save as strips
//! let options = SmlWriteOptions::with_strips(StripStrategy::Link);
//! let summary = mesh::io::save_sml(&mesh, "model.sml", &options).unwrap();
//! println!("{summary}");
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures: `Mesh`, `Vertex`, `Triangle`, `VertexTable`, `Aabb`
//! - [`strip`] - Strip discovery: `SpatialGrid`, strategies, strip encoding
//! - [`io`] - File I/O for SML, STL and OBJ formats

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `Mesh`, `Vertex`, `Triangle`, `VertexTable`, `Aabb`.
pub use mesh_types as types;

/// Triangle-strip discovery and encoding.
pub use mesh_strip as strip;

/// File I/O for SML, STL and OBJ formats.
pub use mesh_io as io;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for mesh conversion.
///
/// This module re-exports the most commonly used types and functions.
///
/// # Usage
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{
        weld_vertices, Aabb, Mesh, Quad, Triangle, Vertex, VertexTable, DEFAULT_WELD_TOLERANCE,
    };

    // Strips
    pub use mesh_strip::{find_strips, StripParams, StripSet, StripStrategy};

    // I/O
    pub use mesh_io::{load_mesh, save_mesh, IoError, MeshFormat, SmlWriteOptions};
}

// =============================================================================
// Tests
// =============================================================================
