//! SML binary mesh format.
//!
//! # Layout
//!
//! All integers and floats are little-endian.
//!
//! ```text
//! UINT8[4]     – Magic "SML1"
//! UINT32       – CRC-32C of every byte after this field
//! foreach segment
//!     UINT8    – Type tag
//!     UINT32   – Payload length in bytes
//!     UINT8[n] – Payload
//! end
//! ```
//!
//! | Tag | Payload |
//! |-----|---------|
//! | 0 | comment: NUL-terminated string |
//! | 1 | vertices: 3 × f32 each |
//! | 2 | vertices: 3 × f64 each (read only, narrowed to f32) |
//! | 3 | triangles: 3 × u32 each |
//! | 4 | quads: 4 × u32 each |
//! | 5 | triangle strip: 3 + n u32 words (see [`mesh_strip::decode_strip`]) |
//!
//! The writer emits comments, then one vertex segment, then the strips (one
//! segment each), then the remaining triangles, then the quads. Empty lists
//! are omitted. The checksum field is written last, so a file whose writer
//! failed part-way never verifies.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use mesh_strip::{decode_strip_into, find_strips, StripParams, StripStrategy};
use mesh_types::{Mesh, Quad, Triangle, Vertex};
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// File magic.
pub const MAGIC: [u8; 4] = *b"SML1";

/// Size of the file header: magic plus checksum.
pub const HEADER_LEN: usize = 8;

/// Size of a segment header: tag plus length.
pub const SEGMENT_HEADER_LEN: usize = 5;

/// Payload bytes buffered before they are handed to the underlying writer.
const FLUSH_THRESHOLD: usize = 64 * 1024;

/// Type of an SML segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Free-form text.
    Comment,
    /// Single-precision vertex positions.
    Vertices,
    /// Double-precision vertex positions (legacy, never written).
    VerticesF64,
    /// Independent triangles.
    Triangles,
    /// Independent quads.
    Quads,
    /// One triangle strip.
    Strip,
}

impl SegmentKind {
    /// Wire tag of this segment type.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Comment => 0,
            Self::Vertices => 1,
            Self::VerticesF64 => 2,
            Self::Triangles => 3,
            Self::Quads => 4,
            Self::Strip => 5,
        }
    }

    /// Segment type for a wire tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Comment),
            1 => Some(Self::Vertices),
            2 => Some(Self::VerticesF64),
            3 => Some(Self::Triangles),
            4 => Some(Self::Quads),
            5 => Some(Self::Strip),
            _ => None,
        }
    }

    /// Size of one payload element in bytes (1 for comments).
    #[must_use]
    pub const fn element_size(self) -> usize {
        match self {
            Self::Comment => 1,
            Self::Vertices | Self::Triangles => 12,
            Self::VerticesF64 => 24,
            Self::Quads => 16,
            Self::Strip => 4,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Vertices => "vertices",
            Self::VerticesF64 => "vertices-f64",
            Self::Triangles => "triangles",
            Self::Quads => "quads",
            Self::Strip => "strip",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Location and size of one segment in an SML file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Segment type.
    pub kind: SegmentKind,
    /// File offset of the segment's tag byte.
    pub offset: u64,
    /// Payload length in bytes.
    pub length: u32,
}

impl SegmentHeader {
    /// Number of elements in the payload (bytes for comments, words for strips).
    #[must_use]
    pub const fn element_count(&self) -> usize {
        self.length as usize / self.kind.element_size()
    }
}

/// Options for writing SML files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmlWriteOptions {
    /// Strip strategy, or `None` to write all triangles as one list.
    pub strip: Option<StripStrategy>,
    /// Tunables for strip search.
    pub strip_params: StripParams,
}

impl SmlWriteOptions {
    /// Write with strips found by `strategy`.
    #[must_use]
    pub fn with_strips(strategy: StripStrategy) -> Self {
        Self {
            strip: Some(strategy),
            ..Default::default()
        }
    }

    /// Set strip search parameters.
    #[must_use]
    pub fn with_strip_params(mut self, params: StripParams) -> Self {
        self.strip_params = params;
        self
    }
}

/// What the writer put into a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmlSummary {
    /// Comment segments written.
    pub comments: usize,
    /// Vertices written.
    pub vertices: usize,
    /// Strip segments written.
    pub strips: usize,
    /// Triangles covered by the strip segments.
    pub strip_triangles: usize,
    /// Triangles written as a plain list.
    pub singles: usize,
    /// Quads written.
    pub quads: usize,
    /// Total file size in bytes.
    pub bytes: u64,
    /// CRC-32C stored in the header.
    pub checksum: u32,
}

impl fmt::Display for SmlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SML: {} vertices, {} strips ({} triangles), {} single triangles, {} quads, {} comments, {} bytes, crc {:08x}",
            self.vertices,
            self.strips,
            self.strip_triangles,
            self.singles,
            self.quads,
            self.comments,
            self.bytes,
            self.checksum
        )
    }
}

/// CRC-32C (Castagnoli) of an SML body.
#[must_use]
pub fn checksum(body: &[u8]) -> u32 {
    crc32c::crc32c(body)
}

// ============================================================================
// Writing
// ============================================================================

/// Segment writer that folds every byte after the header into the checksum.
struct BodyWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
    crc: u32,
    written: u64,
}

impl<W: Write> BodyWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(FLUSH_THRESHOLD + 64),
            crc: 0,
            written: 0,
        }
    }

    fn begin(&mut self, kind: SegmentKind, payload_len: usize) -> IoResult<()> {
        let length = u32::try_from(payload_len).map_err(|_| IoError::SegmentTooLarge {
            tag: kind.tag(),
            bytes: payload_len as u64,
        })?;
        debug!(kind = %kind, length, "Writing segment");
        self.buf.push(kind.tag());
        self.buf.extend_from_slice(&length.to_le_bytes());
        self.flush_if_full()
    }

    fn put_u32(&mut self, value: u32) -> IoResult<()> {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self.flush_if_full()
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> IoResult<()> {
        self.buf.extend_from_slice(bytes);
        self.flush_if_full()
    }

    fn put_vertex(&mut self, vertex: &Vertex) -> IoResult<()> {
        for c in vertex.to_array() {
            self.buf.extend_from_slice(&c.to_le_bytes());
        }
        self.flush_if_full()
    }

    fn flush_if_full(&mut self) -> IoResult<()> {
        if self.buf.len() >= FLUSH_THRESHOLD {
            self.flush_buf()?;
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> IoResult<()> {
        self.inner.write_all(&self.buf)?;
        self.crc = crc32c::crc32c_append(self.crc, &self.buf);
        self.written += self.buf.len() as u64;
        self.buf.clear();
        Ok(())
    }

    /// Flush the remaining bytes and return the writer, checksum and body size.
    fn finish(mut self) -> IoResult<(W, u32, u64)> {
        self.flush_buf()?;
        Ok((self.inner, self.crc, self.written))
    }
}

/// Write a mesh in SML format.
///
/// The writer must be seekable because the checksum is patched into the
/// header after the body has been written. On return the writer is
/// positioned at the end of the file.
///
/// # Errors
///
/// Returns an error if:
/// - A face references a vertex that does not exist
/// - A comment contains a NUL byte
/// - A segment would exceed the 32-bit length field
/// - Writing or seeking fails
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use mesh_io::{write_sml, SmlWriteOptions};
/// use mesh_strip::StripStrategy;
/// use mesh_types::unit_cube;
///
/// let mut out = Cursor::new(Vec::new());
/// let summary = write_sml(&unit_cube(), &mut out, &SmlWriteOptions::with_strips(StripStrategy::Link)).unwrap();
/// assert_eq!(summary.vertices, 8);
/// assert_eq!(summary.strip_triangles + summary.singles, 12);
/// ```
pub fn write_sml<W: Write + Seek>(
    mesh: &Mesh,
    mut writer: W,
    options: &SmlWriteOptions,
) -> IoResult<SmlSummary> {
    mesh.validate_indices()?;
    if mesh.comments.iter().any(|c| c.as_bytes().contains(&0)) {
        return Err(IoError::invalid_content("comment contains a NUL byte"));
    }

    writer.write_all(&MAGIC)?;
    writer.write_all(&0u32.to_le_bytes())?;

    let mut summary = SmlSummary::default();
    let mut body = BodyWriter::new(writer);

    for comment in &mesh.comments {
        body.begin(SegmentKind::Comment, comment.len() + 1)?;
        body.put_bytes(comment.as_bytes())?;
        body.put_bytes(&[0])?;
        summary.comments += 1;
    }

    if mesh.vertex_count() > 0 {
        body.begin(SegmentKind::Vertices, mesh.vertex_count() * 12)?;
        for v in mesh.vertices() {
            body.put_vertex(v)?;
        }
        summary.vertices = mesh.vertex_count();
    }

    match options.strip {
        Some(strategy) if !mesh.triangles.is_empty() => {
            let set = find_strips(mesh, strategy, &options.strip_params);
            for i in 0..set.strip_count() {
                let words = set.strip_words(i);
                body.begin(SegmentKind::Strip, words.len() * 4)?;
                for w in words {
                    body.put_u32(w)?;
                }
            }
            summary.strips = set.strip_count();
            summary.strip_triangles = set.stripped_triangle_count();
            write_triangles(&mut body, set.single_triangles(), set.single_count())?;
            summary.singles = set.single_count();
        }
        _ => {
            write_triangles(
                &mut body,
                mesh.triangles.iter().copied(),
                mesh.triangle_count(),
            )?;
            summary.singles = mesh.triangle_count();
        }
    }

    if !mesh.quads.is_empty() {
        body.begin(SegmentKind::Quads, mesh.quad_count() * 16)?;
        for q in &mesh.quads {
            for i in q.v {
                body.put_u32(i)?;
            }
        }
        summary.quads = mesh.quad_count();
    }

    let (mut writer, crc, body_len) = body.finish()?;
    writer.seek(SeekFrom::Start(4))?;
    writer.write_all(&crc.to_le_bytes())?;
    writer.seek(SeekFrom::End(0))?;
    writer.flush()?;

    summary.checksum = crc;
    summary.bytes = HEADER_LEN as u64 + body_len;

    info!(
        vertices = summary.vertices,
        strips = summary.strips,
        singles = summary.singles,
        quads = summary.quads,
        checksum = format_args!("{crc:08x}"),
        "Wrote SML"
    );

    Ok(summary)
}

fn write_triangles<W: Write>(
    body: &mut BodyWriter<W>,
    triangles: impl Iterator<Item = Triangle>,
    count: usize,
) -> IoResult<()> {
    if count == 0 {
        return Ok(());
    }
    body.begin(SegmentKind::Triangles, count * 12)?;
    for t in triangles {
        for i in t.indices() {
            body.put_u32(i)?;
        }
    }
    Ok(())
}

/// Encode a mesh to an in-memory SML image.
///
/// # Errors
///
/// Same as [`write_sml`], minus I/O failures.
pub fn encode_sml(mesh: &Mesh, options: &SmlWriteOptions) -> IoResult<(Vec<u8>, SmlSummary)> {
    let mut out = Cursor::new(Vec::new());
    let summary = write_sml(mesh, &mut out, options)?;
    Ok((out.into_inner(), summary))
}

/// Save a mesh to an SML file.
///
/// # Errors
///
/// Returns an error if the mesh cannot be encoded or the file cannot be
/// written.
///
/// # Example
///
/// ```no_run
/// use mesh_io::{save_sml, SmlWriteOptions};
/// use mesh_types::unit_cube;
///
/// save_sml(&unit_cube(), "cube.sml", &SmlWriteOptions::default()).unwrap();
/// ```
pub fn save_sml<P: AsRef<Path>>(
    mesh: &Mesh,
    path: P,
    options: &SmlWriteOptions,
) -> IoResult<SmlSummary> {
    let file = File::create(path)?;
    write_sml(mesh, BufWriter::new(file), options)
}

// ============================================================================
// Reading
// ============================================================================

/// Check magic and checksum, returning the body.
fn verify(bytes: &[u8]) -> IoResult<&[u8]> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(IoError::BadMagic {
            found: bytes[..bytes.len().min(MAGIC.len())].to_vec(),
        });
    }
    let Some((header, body)) = bytes.split_first_chunk::<HEADER_LEN>() else {
        return Err(IoError::UnexpectedEof {
            position: bytes.len() as u64,
        });
    };

    let stored = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let computed = checksum(body);
    if stored != computed {
        return Err(IoError::ChecksumMismatch { stored, computed });
    }
    Ok(body)
}

/// Iterator over the segments of a verified body.
struct Segments<'a> {
    body: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = IoResult<(SegmentHeader, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.body.len() {
            return None;
        }
        let offset = (HEADER_LEN + self.pos) as u64;
        let rest = &self.body[self.pos..];

        let Some((head, rest)) = rest.split_first_chunk::<SEGMENT_HEADER_LEN>() else {
            self.pos = self.body.len();
            return Some(Err(IoError::TruncatedSegment {
                offset,
                needed: SEGMENT_HEADER_LEN as u64,
                available: rest.len() as u64,
            }));
        };
        let tag = head[0];
        let length = u32::from_le_bytes([head[1], head[2], head[3], head[4]]);

        let Some(kind) = SegmentKind::from_tag(tag) else {
            self.pos = self.body.len();
            return Some(Err(IoError::UnknownSegment { tag, offset }));
        };
        if rest.len() < length as usize {
            self.pos = self.body.len();
            return Some(Err(IoError::TruncatedSegment {
                offset,
                needed: u64::from(length),
                available: rest.len() as u64,
            }));
        }

        self.pos += SEGMENT_HEADER_LEN + length as usize;
        let header = SegmentHeader {
            kind,
            offset,
            length,
        };
        Some(Ok((header, &rest[..length as usize])))
    }
}

/// List the segments of an SML image after verifying its magic and checksum.
///
/// # Errors
///
/// Returns an error if the magic or checksum is wrong, or a segment is
/// truncated or of unknown type.
pub fn segment_headers(bytes: &[u8]) -> IoResult<Vec<SegmentHeader>> {
    let body = verify(bytes)?;
    Segments { body, pos: 0 }
        .map(|s| s.map(|(header, _)| header))
        .collect()
}

fn check_alignment(header: &SegmentHeader) -> IoResult<()> {
    let element_size = header.kind.element_size();
    if header.length as usize % element_size == 0 {
        Ok(())
    } else {
        Err(IoError::MisalignedSegment {
            tag: header.kind.tag(),
            length: header.length,
            element_size,
        })
    }
}

fn le_u32(chunk: &[u8]) -> u32 {
    u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
}

fn le_f32(chunk: &[u8]) -> f32 {
    f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
}

fn le_f64(chunk: &[u8]) -> f64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&chunk[..8]);
    f64::from_le_bytes(b)
}

/// Decode an in-memory SML image.
///
/// The whole image is validated before a mesh is returned: magic,
/// checksum, segment framing, and that every face index refers to an
/// existing vertex. Strip segments are expanded into plain triangles.
///
/// # Errors
///
/// Returns the first problem found; see [`IoError::is_corrupt`].
pub fn decode_sml(bytes: &[u8]) -> IoResult<Mesh> {
    let body = verify(bytes)?;
    let mut mesh = Mesh::new();
    let mut strips = 0usize;

    for segment in (Segments { body, pos: 0 }) {
        let (header, payload) = segment?;
        check_alignment(&header)?;
        debug!(
            kind = %header.kind,
            offset = header.offset,
            length = header.length,
            "Reading segment"
        );

        match header.kind {
            SegmentKind::Comment => {
                let text = payload.split(|&b| b == 0).next().unwrap_or_default();
                mesh.comments.push(String::from_utf8_lossy(text).into_owned());
            }
            SegmentKind::Vertices => {
                mesh.reserve_vertices(header.element_count());
                for c in payload.chunks_exact(12) {
                    mesh.push_vertex(Vertex::from_coords(
                        le_f32(&c[0..4]),
                        le_f32(&c[4..8]),
                        le_f32(&c[8..12]),
                    ));
                }
            }
            SegmentKind::VerticesF64 => {
                mesh.reserve_vertices(header.element_count());
                for c in payload.chunks_exact(24) {
                    mesh.push_vertex(Vertex::from_f64(
                        le_f64(&c[0..8]),
                        le_f64(&c[8..16]),
                        le_f64(&c[16..24]),
                    ));
                }
            }
            SegmentKind::Triangles => {
                mesh.triangles.reserve(header.element_count());
                mesh.triangles.extend(payload.chunks_exact(12).map(|c| {
                    Triangle::new(le_u32(&c[0..4]), le_u32(&c[4..8]), le_u32(&c[8..12]))
                }));
            }
            SegmentKind::Quads => {
                mesh.quads.reserve(header.element_count());
                mesh.quads.extend(payload.chunks_exact(16).map(|c| {
                    Quad::new(
                        le_u32(&c[0..4]),
                        le_u32(&c[4..8]),
                        le_u32(&c[8..12]),
                        le_u32(&c[12..16]),
                    )
                }));
            }
            SegmentKind::Strip => {
                let words: Vec<u32> = payload.chunks_exact(4).map(le_u32).collect();
                decode_strip_into(&words, &mut mesh.triangles)?;
                strips += 1;
            }
        }
    }

    mesh.validate_indices()?;

    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        quads = mesh.quad_count(),
        strips,
        comments = mesh.comments.len(),
        "Read SML"
    );

    Ok(mesh)
}

/// Read an SML mesh from a reader.
///
/// The reader is consumed to its end before anything is decoded.
///
/// # Errors
///
/// Returns an error if reading fails or the content is not valid SML.
pub fn read_sml<R: Read>(mut reader: R) -> IoResult<Mesh> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_sml(&bytes)
}

/// Load a mesh from an SML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid SML.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_sml;
///
/// let mesh = load_sml("model.sml").unwrap();
/// println!("Loaded {} triangles", mesh.triangle_count());
/// ```
pub fn load_sml<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| IoError::open(path, e))?;
    decode_sml(&bytes)
}
