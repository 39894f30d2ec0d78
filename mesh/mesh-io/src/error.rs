//! Error types for mesh I/O operations.

use std::path::PathBuf;

use mesh_strip::StripError;
use mesh_types::IndexError;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur during mesh I/O operations.
///
/// Every error aborts the file being processed; readers never return a
/// partially decoded mesh.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Unexpected end of file.
    #[error("unexpected end of file at position {position}")]
    UnexpectedEof {
        /// Position in the file where EOF was encountered.
        position: u64,
    },

    /// Invalid header in binary STL.
    #[error("invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Expected header size.
        expected: usize,
        /// Actual header size.
        got: usize,
    },

    /// Binary STL facet count disagrees with the file length.
    #[error("invalid face count: expected {expected}, got {got}")]
    InvalidFaceCount {
        /// Facet count stored in the header.
        expected: u32,
        /// Facets actually present.
        got: u32,
    },

    /// SML file does not start with `SML1`.
    #[error("bad SML magic: expected \"SML1\", found {found:02x?}")]
    BadMagic {
        /// The first bytes of the file (up to four).
        found: Vec<u8>,
    },

    /// Stored SML checksum does not match the file body.
    #[error("checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Checksum stored in the header.
        stored: u32,
        /// Checksum computed over the body.
        computed: u32,
    },

    /// A segment header or payload runs past the end of the file.
    #[error("truncated segment at offset {offset}: needs {needed} bytes, {available} available")]
    TruncatedSegment {
        /// File offset of the segment header.
        offset: u64,
        /// Bytes the segment claims to need.
        needed: u64,
        /// Bytes left in the file.
        available: u64,
    },

    /// Segment type tag not known to this reader.
    #[error("unknown segment type {tag} at offset {offset}")]
    UnknownSegment {
        /// The unrecognized tag.
        tag: u8,
        /// File offset of the segment header.
        offset: u64,
    },

    /// Segment payload length is not a multiple of its element size.
    #[error("segment type {tag} has length {length}, not a multiple of {element_size}")]
    MisalignedSegment {
        /// Segment type tag.
        tag: u8,
        /// Payload length in bytes.
        length: u32,
        /// Size of one element in bytes.
        element_size: usize,
    },

    /// A face refers to a vertex that does not exist.
    #[error("vertex index {index} out of range ({vertex_count} vertices)")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Segment payload too large for its 32-bit length field.
    #[error("segment type {tag} payload of {bytes} bytes exceeds the 4 GiB limit")]
    SegmentTooLarge {
        /// Segment type tag.
        tag: u8,
        /// Payload size in bytes.
        bytes: u64,
    },

    /// Malformed strip segment.
    #[error("invalid strip: {0}")]
    Strip(#[from] StripError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Integer parsing error.
    #[error("integer parsing error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Whether the error means the file is corrupt rather than unreadable.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::BadMagic { .. }
                | Self::ChecksumMismatch { .. }
                | Self::TruncatedSegment { .. }
                | Self::UnknownSegment { .. }
                | Self::MisalignedSegment { .. }
                | Self::IndexOutOfRange { .. }
                | Self::Strip(_)
        )
    }

    /// Map a file-open error, reporting a missing file by path.
    pub(crate) fn open(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}

impl From<IndexError> for IoError {
    fn from(err: IndexError) -> Self {
        Self::IndexOutOfRange {
            index: err.index(),
            vertex_count: err.vertex_count(),
        }
    }
}
