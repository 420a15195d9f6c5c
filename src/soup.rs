//! `PolygonSoup` — the flat points-plus-counts polygon container the clippers
//! read from and append to.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// An ordered sequence of 3D points plus an ordered sequence of per-loop
/// vertex counts. Loop *i* occupies the consecutive sub-range of `points`
/// starting at the sum of all previous counts.
///
/// Invariant: `sum(counts) == points.len()` — see [`PolygonSoup::is_consistent`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonSoup {
    pub points: Vec<Point3<Real>>,
    pub counts: Vec<usize>,
}

impl PolygonSoup {
    pub const fn new() -> Self {
        PolygonSoup {
            points: Vec::new(),
            counts: Vec::new(),
        }
    }

    /// Number of polygon loops.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.counts.clear();
    }

    /// `sum(counts) == points.len()` — must hold after every operation.
    pub fn is_consistent(&self) -> bool {
        self.counts.iter().sum::<usize>() == self.points.len()
    }

    /// Append one loop.
    pub fn push_polygon(&mut self, points: &[Point3<Real>]) {
        self.points.extend_from_slice(points);
        self.counts.push(points.len());
    }

    /// Bulk-append another soup.
    pub fn append(&mut self, other: &PolygonSoup) {
        self.points.extend_from_slice(&other.points);
        self.counts.extend_from_slice(&other.counts);
    }

    /// Iterate the loops as point slices.
    pub fn iter_loops(&self) -> impl Iterator<Item = &[Point3<Real>]> {
        self.counts.iter().scan(0usize, |start, &count| {
            let begin = *start;
            *start += count;
            Some(&self.points[begin..begin + count])
        })
    }

    /// The most recently appended loop, if any.
    pub fn last_polygon(&self) -> Option<&[Point3<Real>]> {
        let count = *self.counts.last()?;
        Some(&self.points[self.points.len() - count..])
    }

    /// Robust normal of the whole soup treated as one vertex ring.
    pub fn polygon_normal(&self) -> Vector3<Real> {
        newell_normal(&self.points)
    }

    /// Robust normal of the most recently appended loop only.
    pub fn last_polygon_normal(&self) -> Vector3<Real> {
        self.last_polygon().map_or_else(Vector3::zeros, newell_normal)
    }
}

/// Compute a polygon normal with Newell's method.
///
/// Robust for non-convex and mildly non-planar rings; the result is *not*
/// normalized — its magnitude is twice the enclosed area, which callers use
/// as a degeneracy test.
pub fn newell_normal(points: &[Point3<Real>]) -> Vector3<Real> {
    let mut normal = Vector3::zeros();
    let n = points.len();
    if n < 3 {
        return normal;
    }
    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        normal.x += (p.y - q.y) * (p.z + q.z);
        normal.y += (p.z - q.z) * (p.x + q.x);
        normal.z += (p.x - q.x) * (p.y + q.y);
    }
    normal
}
