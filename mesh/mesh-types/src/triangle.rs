//! Index triangles and quads.

/// A triangle as three indices into a mesh's vertex list.
///
/// The order `(a, b, c)` is the winding. [`rotate`](Self::rotate) and
/// [`rotate_back`](Self::rotate_back) cycle the indices without changing
/// the geometric triangle or its winding, which is how strip search lines
/// a candidate up with the edge it must share.
///
/// # Example
///
/// ```
/// use mesh_types::Triangle;
///
/// let mut tri = Triangle::new(0, 1, 2);
/// tri.rotate();
/// assert_eq!(tri.indices(), [1, 2, 0]);
///
/// tri.rotate_back();
/// assert_eq!(tri.indices(), [0, 1, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Triangle {
    /// First corner.
    pub a: u32,
    /// Second corner.
    pub b: u32,
    /// Third corner.
    pub c: u32,
}

impl Triangle {
    /// Create a triangle from three vertex indices.
    #[inline]
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    /// Create a triangle from an index array.
    #[inline]
    #[must_use]
    pub const fn from_indices(v: [u32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Indices in winding order.
    #[inline]
    #[must_use]
    pub const fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }

    /// Cycle forward: `(a, b, c)` becomes `(b, c, a)`.
    #[inline]
    pub fn rotate(&mut self) {
        *self = Self::new(self.b, self.c, self.a);
    }

    /// Cycle backward: `(a, b, c)` becomes `(c, a, b)`.
    #[inline]
    pub fn rotate_back(&mut self) {
        *self = Self::new(self.c, self.a, self.b);
    }

    /// Check whether the triangle references vertex `v`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, v: u32) -> bool {
        self.a == v || self.b == v || self.c == v
    }

    /// Check whether `other` is this triangle up to cyclic rotation.
    ///
    /// A reversed winding is a different triangle.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Triangle;
    ///
    /// let t = Triangle::new(4, 5, 6);
    /// assert!(t.same_triangle(&Triangle::new(6, 4, 5)));
    /// assert!(!t.same_triangle(&Triangle::new(4, 6, 5)));
    /// ```
    #[must_use]
    pub fn same_triangle(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }

    /// The lexicographically smallest rotation.
    ///
    /// Two triangles are the same up to rotation exactly when their
    /// canonical forms are equal.
    #[must_use]
    pub fn canonical(&self) -> Self {
        let forward = Self::new(self.b, self.c, self.a);
        let backward = Self::new(self.c, self.a, self.b);
        [*self, forward, backward]
            .into_iter()
            .min_by_key(Self::indices)
            .unwrap_or(*self)
    }

    /// Largest index referenced.
    #[inline]
    #[must_use]
    pub fn max_index(&self) -> u32 {
        self.a.max(self.b).max(self.c)
    }
}

impl From<[u32; 3]> for Triangle {
    fn from(v: [u32; 3]) -> Self {
        Self::from_indices(v)
    }
}

/// A quadrilateral as four vertex indices.
///
/// Quads pass through unchanged; they are never strip-compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Quad {
    /// Corner indices in winding order.
    pub v: [u32; 4],
}

impl Quad {
    /// Create a quad from four vertex indices.
    #[inline]
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { v: [a, b, c, d] }
    }

    /// Split into the triangles `(a, b, c)` and `(a, c, d)`.
    #[must_use]
    pub const fn split(&self) -> [Triangle; 2] {
        let [a, b, c, d] = self.v;
        [Triangle::new(a, b, c), Triangle::new(a, c, d)]
    }

    /// Largest index referenced.
    #[inline]
    #[must_use]
    pub fn max_index(&self) -> u32 {
        self.v.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_is_cyclic() {
        let mut t = Triangle::new(7, 8, 9);
        t.rotate();
        t.rotate();
        t.rotate();
        assert_eq!(t, Triangle::new(7, 8, 9));
    }

    #[test]
    fn rotate_back_inverts_rotate() {
        let mut t = Triangle::new(3, 1, 2);
        t.rotate();
        t.rotate_back();
        assert_eq!(t, Triangle::new(3, 1, 2));
    }

    #[test]
    fn canonical_starts_at_minimum() {
        assert_eq!(Triangle::new(2, 0, 1).canonical(), Triangle::new(0, 1, 2));
        assert_eq!(Triangle::new(1, 2, 0).canonical(), Triangle::new(0, 1, 2));
        assert_eq!(Triangle::new(0, 2, 1).canonical(), Triangle::new(0, 2, 1));
    }

    #[test]
    fn canonical_with_repeated_index() {
        let t = Triangle::new(5, 3, 3);
        let mut r = t;
        r.rotate();
        assert_eq!(t.canonical(), r.canonical());
        r.rotate();
        assert_eq!(t.canonical(), r.canonical());
    }

    #[test]
    fn contains_and_max() {
        let t = Triangle::new(4, 10, 2);
        assert!(t.contains(10));
        assert!(!t.contains(3));
        assert_eq!(t.max_index(), 10);
    }

    #[test]
    fn quad_split() {
        let q = Quad::new(0, 1, 2, 3);
        let [t0, t1] = q.split();
        assert_eq!(t0, Triangle::new(0, 1, 2));
        assert_eq!(t1, Triangle::new(0, 2, 3));
        assert_eq!(q.max_index(), 3);
    }
}
