//! Mesh file I/O.
//!
//! This crate provides loading and saving of meshes in three formats:
//!
//! - **SML** - Compact checksummed binary format with optional triangle strips
//! - **STL** (Stereolithography) - Binary (read and write) and ASCII (read, write)
//! - **OBJ** (Wavefront) - ASCII, geometry only
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Other game engines
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_stl, save_sml, SmlWriteOptions};
//! use mesh_strip::StripStrategy;
//!
//! // Load a mesh
//! let mesh = load_stl("model.stl").unwrap();
//!
//! // Store it as strips
//! let options = SmlWriteOptions::with_strips(StripStrategy::Link);
//! let summary = save_sml(&mesh, "model.sml", &options).unwrap();
//! println!("{}", summary);
//! ```
//!
//! # Format Detection
//!
//! The crate can automatically detect file format from extension:
//!
//! ```no_run
//! use mesh_io::{load_mesh, save_mesh};
//!
//! // Format detected from .sml extension
//! let mesh = load_mesh("model.sml").unwrap();
//!
//! // Save to a different format
//! save_mesh(&mesh, "model.obj").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod obj;
pub mod sml;
mod stl;

pub use error::{IoError, IoResult};
pub use obj::{load_obj, read_obj, save_obj, write_obj};
pub use sml::{
    decode_sml, encode_sml, load_sml, read_sml, save_sml, write_sml, SmlSummary, SmlWriteOptions,
};
pub use stl::{load_stl, read_stl, save_stl, write_stl};

use std::path::Path;

use mesh_types::Mesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// SML binary format.
    Sml,
    /// STL (Stereolithography) format.
    /// Supports binary and ASCII variants.
    Stl,
    /// OBJ (Wavefront) format.
    /// ASCII only, supports vertices and faces.
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to check for extension
    ///
    /// # Returns
    ///
    /// The detected format, or `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "sml" => Some(Self::Sml),
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Detect format from a path, reporting an unknown extension as an error.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownFormat`] if the extension is missing or not
    /// recognized.
    pub fn require<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        Self::from_path(path).ok_or_else(|| IoError::UnknownFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Sml => "sml",
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Arguments
///
/// * `path` - Path to the mesh file
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be read
/// - The file content is invalid for the detected format
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_mesh;
///
/// let mesh = load_mesh("model.stl").unwrap();
/// ```
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    match MeshFormat::require(path)? {
        MeshFormat::Sml => load_sml(path),
        MeshFormat::Stl => load_stl(path),
        MeshFormat::Obj => load_obj(path),
    }
}

/// Save a mesh to a file, detecting format from extension.
///
/// SML files are written without strips; use [`save_sml`] to choose a
/// strip strategy.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Path for the output file
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be written
///
/// # Example
///
/// ```no_run
/// use mesh_io::{save_mesh, load_mesh};
///
/// let mesh = load_mesh("input.stl").unwrap();
/// save_mesh(&mesh, "output.obj").unwrap();
/// ```
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    match MeshFormat::require(path)? {
        MeshFormat::Sml => save_sml(mesh, path, &SmlWriteOptions::default()).map(|_| ()),
        MeshFormat::Stl => save_stl(mesh, path, true), // Default to binary STL
        MeshFormat::Obj => save_obj(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_path_sml() {
        assert_eq!(MeshFormat::from_path("model.sml"), Some(MeshFormat::Sml));
        assert_eq!(MeshFormat::from_path("model.SML"), Some(MeshFormat::Sml));
        assert_eq!(
            MeshFormat::from_path("/path/to/model.sml"),
            Some(MeshFormat::Sml)
        );
    }

    #[test]
    fn format_from_path_stl() {
        assert_eq!(MeshFormat::from_path("model.stl"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("model.STL"), Some(MeshFormat::Stl));
        assert_eq!(
            MeshFormat::from_path("/path/to/model.stl"),
            Some(MeshFormat::Stl)
        );
    }

    #[test]
    fn format_from_path_obj() {
        assert_eq!(MeshFormat::from_path("model.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("model.OBJ"), Some(MeshFormat::Obj));
    }

    #[test]
    fn format_from_path_unknown() {
        assert_eq!(MeshFormat::from_path("model.xyz"), None);
        assert_eq!(MeshFormat::from_path("model"), None);
        assert_eq!(MeshFormat::from_path(""), None);
    }

    #[test]
    fn require_reports_extension() {
        match MeshFormat::require("model.ply") {
            Err(IoError::UnknownFormat { extension }) => assert_eq!(extension, "ply"),
            other => panic!("unexpected {other:?}"),
        }
        match MeshFormat::require("model") {
            Err(IoError::UnknownFormat { extension }) => assert_eq!(extension, "(none)"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn format_extension() {
        assert_eq!(MeshFormat::Sml.extension(), "sml");
        assert_eq!(MeshFormat::Stl.extension(), "stl");
        assert_eq!(MeshFormat::Obj.extension(), "obj");
    }
}
