//! Strip adjacency rule and strip word encoding.
//!
//! A strip of length `n` is written as `n + 2` vertex indices: the three
//! indices of the seed triangle, then one new index per following triangle.
//! Which edge of the previous triangle the next one shares alternates with
//! the position in the strip:
//!
//! | strip length so far | shared edge     |
//! |---------------------|-----------------|
//! | odd                 | `(prev.a, prev.c)` |
//! | even                | `(prev.c, prev.b)` |
//!
//! A triangle following `prev` is stored rotated so that its first two
//! indices are exactly that edge; its third index is the new word.

use mesh_types::Triangle;

use crate::error::{StripError, StripResult};

/// The directed edge the triangle after `prev` must start with, given that
/// the strip currently holds `len` triangles.
#[must_use]
pub const fn shared_edge(prev: &Triangle, len: usize) -> (u32, u32) {
    if len % 2 == 1 {
        (prev.a, prev.c)
    } else {
        (prev.c, prev.b)
    }
}

/// Rotate `tri` so it begins with the directed edge `(p, q)`.
///
/// Returns `false`, leaving `tri` unchanged, if the triangle does not contain
/// that edge in its winding order.
pub fn align_to_edge(tri: &mut Triangle, (p, q): (u32, u32)) -> bool {
    if tri.a == p && tri.b == q {
        true
    } else if tri.b == p && tri.c == q {
        tri.rotate();
        true
    } else if tri.c == p && tri.a == q {
        tri.rotate_back();
        true
    } else {
        false
    }
}

/// Write a strip as index words.
///
/// `triangles` is the arena the strip indexes into; every triangle after the
/// first must already be aligned to its predecessor's shared edge, as
/// produced by strip search. An empty strip yields no words.
#[must_use]
pub fn encode_strip(triangles: &[Triangle], strip: &[u32]) -> Vec<u32> {
    let Some((&first, rest)) = strip.split_first() else {
        return Vec::new();
    };
    let seed = triangles[first as usize];
    let mut words = Vec::with_capacity(strip.len() + 2);
    words.extend_from_slice(&seed.indices());

    let mut prev = seed;
    for (offset, &t) in rest.iter().enumerate() {
        let cur = triangles[t as usize];
        debug_assert_eq!(
            (cur.a, cur.b),
            shared_edge(&prev, offset + 1),
            "strip triangle {t} is not aligned to its predecessor"
        );
        words.push(cur.c);
        prev = cur;
    }
    words
}

/// Expand strip words back into triangles, appending them to `out`.
///
/// Returns the number of triangles appended.
///
/// # Errors
///
/// Returns [`StripError::StripTooShort`] if fewer than three words are given.
pub fn decode_strip_into(words: &[u32], out: &mut Vec<Triangle>) -> StripResult<usize> {
    let [a, b, c, rest @ ..] = words else {
        return Err(StripError::StripTooShort { words: words.len() });
    };
    out.reserve(rest.len() + 1);

    let mut prev = Triangle::new(*a, *b, *c);
    out.push(prev);
    for (offset, &x) in rest.iter().enumerate() {
        let (p, q) = shared_edge(&prev, offset + 1);
        prev = Triangle::new(p, q, x);
        out.push(prev);
    }
    Ok(rest.len() + 1)
}

/// Expand strip words into a fresh triangle list.
///
/// # Errors
///
/// Returns [`StripError::StripTooShort`] if fewer than three words are given.
///
/// # Example
///
/// ```
/// use mesh_strip::decode_strip;
/// use mesh_types::Triangle;
///
/// let tris = decode_strip(&[0, 1, 2, 3]).unwrap();
/// assert_eq!(tris, vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)]);
/// ```
pub fn decode_strip(words: &[u32]) -> StripResult<Vec<Triangle>> {
    let mut out = Vec::new();
    decode_strip_into(words, &mut out)?;
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn shared_edge_alternates() {
        let prev = Triangle::new(10, 20, 30);
        assert_eq!(shared_edge(&prev, 1), (10, 30));
        assert_eq!(shared_edge(&prev, 2), (30, 20));
        assert_eq!(shared_edge(&prev, 3), (10, 30));
    }

    #[test]
    fn align_all_rotations() {
        let edge = (4, 5);
        for tri in [
            Triangle::new(4, 5, 6),
            Triangle::new(6, 4, 5),
            Triangle::new(5, 6, 4),
        ] {
            let mut t = tri;
            assert!(align_to_edge(&mut t, edge));
            assert_eq!(t, Triangle::new(4, 5, 6));
            assert!(t.same_triangle(&tri));
        }
    }

    #[test]
    fn align_rejects_reversed_edge() {
        let mut t = Triangle::new(5, 4, 6);
        assert!(!align_to_edge(&mut t, (4, 5)));
        assert_eq!(t, Triangle::new(5, 4, 6));
    }

    #[test]
    fn decode_long_strip() {
        let tris = decode_strip(&[0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(
            tris,
            vec![
                Triangle::new(0, 1, 2),
                Triangle::new(0, 2, 3),
                Triangle::new(3, 2, 4),
                Triangle::new(3, 4, 5),
            ]
        );
    }

    #[test]
    fn encode_inverts_decode() {
        let words = [7, 8, 9, 1, 2, 3, 4];
        let tris = decode_strip(&words).unwrap();
        let strip: Vec<u32> = (0..tris.len() as u32).collect();
        assert_eq!(encode_strip(&tris, &strip), words);
    }

    #[test]
    fn decode_too_short() {
        assert_eq!(
            decode_strip(&[1, 2]),
            Err(StripError::StripTooShort { words: 2 })
        );
        assert!(decode_strip(&[]).is_err());
    }

    #[test]
    fn decode_into_appends() {
        let mut out = vec![Triangle::new(9, 9, 9)];
        assert_eq!(decode_strip_into(&[0, 1, 2], &mut out).unwrap(), 1);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn encode_empty() {
        assert!(encode_strip(&[], &[]).is_empty());
    }
}
