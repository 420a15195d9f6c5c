//! Shared geometric primitives: segment/plane intersection and polygon
//! filtering for the clipping walks.

use crate::float_types::{EPSILON, Real};
use crate::soup::PolygonSoup;
use nalgebra::{Point3, Vector3};

/// Classify the segment `e0 → e1` against the plane `(base, normal)` and
/// return the crossing point, if any.
///
/// `assume_start_white` is the walker's running side for `e0`; it matters
/// only when `e0` lies exactly on the plane.
///
/// Contract:
/// - both endpoints within `EPSILON` of the plane: no hit — the following
///   segment, if it truly leaves the plane, reports the crossing instead, so
///   vertices lying exactly on the plane are never double-counted;
/// - only the start on the plane: a hit (at `e0`) is reported only if
///   continuing along the segment flips the white/black side relative to
///   `assume_start_white` — a segment that merely touches the plane and
///   returns generates no crossing;
/// - otherwise the parametric line/plane solve, with `t` clamped to `[0, 1]`.
pub fn segment_plane_intersection(
    base: &Point3<Real>,
    normal: &Vector3<Real>,
    e0: &Point3<Real>,
    e1: &Point3<Real>,
    assume_start_white: bool,
) -> Option<Point3<Real>> {
    let d0 = (e0 - base).dot(normal);
    let d1 = (e1 - base).dot(normal);

    if d0.abs() < EPSILON && d1.abs() < EPSILON {
        return None;
    }
    if d0.abs() < EPSILON {
        let end_white = d1 > -EPSILON;
        if end_white != assume_start_white {
            return Some(*e0);
        }
        return None;
    }

    let start_white = d0 > -EPSILON;
    let end_white = d1 > -EPSILON;
    if start_white == end_white {
        return None;
    }

    let t = (d0 / (d0 - d1)).clamp(0.0, 1.0);
    Some(e0 + (e1 - e0) * t)
}

/// Squared-distance deduplication tolerance for one polygon, derived from its
/// own bounding box: `diagonal² / 1e6`. Adapts the tolerance to the
/// geometry's scale instead of fixing it globally.
pub fn dedup_epsilon(points: &[Point3<Real>]) -> Real {
    let mut min = Vector3::repeat(Real::MAX);
    let mut max = Vector3::repeat(Real::MIN);
    for p in points {
        min = min.inf(&p.coords);
        max = max.sup(&p.coords);
    }
    (max - min).norm_squared() / 1.0e6
}

/// Remove consecutive near-duplicate points and a duplicate closing point
/// (first ≈ last). A result with fewer than 3 points is cleared to empty.
///
/// Idempotent: a second call on the output removes nothing further.
pub fn filter_polygon(points: &mut Vec<Point3<Real>>) {
    if points.len() < 3 {
        points.clear();
        return;
    }
    let eps = dedup_epsilon(points);
    points.dedup_by(|b, a| (*b - *a).norm_squared() < eps);
    while points.len() > 1 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (last - first).norm_squared() < eps {
            points.pop();
        } else {
            break;
        }
    }
    if points.len() < 3 {
        points.clear();
    }
}

/// Filter `points` and append them to `out` as a new loop if at least 3
/// points remain.
pub fn write_polygon(mut points: Vec<Point3<Real>>, out: &mut PolygonSoup) {
    filter_polygon(&mut points);
    if points.len() >= 3 {
        out.push_polygon(&points);
    }
}
