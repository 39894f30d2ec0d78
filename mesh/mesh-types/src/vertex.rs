//! Vertex positions.

use nalgebra::Point3;

/// A point in 3D space, stored in single precision.
///
/// Single precision matches every on-disk format this workspace reads and
/// writes (SML, binary STL). Double-precision input is down-converted once
/// at ingestion with [`Vertex::from_f64`] and never carried further.
///
/// Equality is exact component-wise float equality. Two vertices that
/// differ by one ULP are different vertices; merging near-duplicates is
/// the job of [`weld_vertices`](crate::weld_vertices), never of
/// [`VertexTable`](crate::VertexTable).
///
/// # Example
///
/// ```
/// use mesh_types::{Vertex, Point3};
///
/// let v1 = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// let v2 = Vertex::from_coords(1.0, 2.0, 3.0);
///
/// assert_eq!(v1, v2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f32>,
}

impl Vertex {
    /// Create a vertex from a point.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f32>) -> Self {
        Self { position }
    }

    /// Create a vertex from raw coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Vertex;
    ///
    /// let v = Vertex::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f32, y: f32, z: f32) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Create a vertex from double-precision coordinates.
    ///
    /// Each component is rounded to the nearest `f32`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: storage is single precision, legacy f64 input is narrowed once here
    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self::from_coords(x as f32, y as f32, z as f32)
    }

    /// Create a vertex from an `[x, y, z]` array.
    #[inline]
    #[must_use]
    pub fn from_array(c: [f32; 3]) -> Self {
        Self::from_coords(c[0], c[1], c[2])
    }

    /// Coordinates as an `[x, y, z]` array.
    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [f32; 3] {
        [self.position.x, self.position.y, self.position.z]
    }

    /// Check whether every coordinate differs from `other` by less than `tolerance`.
    ///
    /// This is the per-axis rule used by the optional weld pass. It is not
    /// transitive, so it must never be used as a hash-map equality.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Vertex;
    ///
    /// let a = Vertex::from_coords(0.0, 0.0, 0.0);
    /// let b = Vertex::from_coords(0.00005, 0.0, -0.00005);
    /// assert!(a.is_close_to(&b, 1e-4));
    /// assert!(!a.is_close_to(&Vertex::from_coords(0.001, 0.0, 0.0), 1e-4));
    /// ```
    #[must_use]
    pub fn is_close_to(&self, other: &Self, tolerance: f32) -> bool {
        (self.position.x - other.position.x).abs() < tolerance
            && (self.position.y - other.position.y).abs() < tolerance
            && (self.position.z - other.position.z).abs() < tolerance
    }

    /// Hashable key that agrees with `==` for all non-NaN coordinates.
    ///
    /// `0.0` and `-0.0` compare equal, so both map to the same key.
    #[inline]
    pub(crate) fn key(&self) -> [u32; 3] {
        let bits = |c: f32| if c == 0.0 { 0 } else { c.to_bits() };
        [
            bits(self.position.x),
            bits(self.position.y),
            bits(self.position.z),
        ]
    }
}

impl From<[f32; 3]> for Vertex {
    fn from(c: [f32; 3]) -> Self {
        Self::from_array(c)
    }
}
