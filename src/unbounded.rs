//! Difference against an *unbounded* half-space: every loop of the input soup
//! is clipped independently against the infinite base plane.

use crate::float_types::{EPSILON, Real};
use crate::geometry::{segment_plane_intersection, write_polygon};
use crate::halfspace::HalfSpace;
use crate::soup::PolygonSoup;
use nalgebra::Point3;

/// Subtract `half_space` from `input`, appending the surviving loops to `out`.
///
/// Each loop is walked edge by edge: kept-side ("white") vertices are
/// retained, every plane crossing inserts the intersection point and flips
/// the running side. The walk accumulates into a loop-local scratch buffer
/// which is only committed when more than 2 points survive filtering, so
/// fully removed loops simply vanish and loops that never touch the plane are
/// emitted unchanged.
pub fn clip_half_space(input: &PolygonSoup, half_space: &HalfSpace, out: &mut PolygonSoup) {
    let base = half_space.base;
    let normal = half_space.kept_normal();

    for ring in input.iter_loops() {
        let n = ring.len();
        if n == 0 {
            continue;
        }
        let mut scratch: Vec<Point3<Real>> = Vec::with_capacity(n + 2);
        let mut white = (ring[0] - base).dot(&normal) > -EPSILON;

        for i in 0..n {
            let p = ring[i];
            let q = ring[(i + 1) % n];
            if white {
                scratch.push(p);
            }
            if let Some(hit) = segment_plane_intersection(&base, &normal, &p, &q, white) {
                scratch.push(hit);
                white = !white;
            }
        }

        write_polygon(scratch, out);
    }
}
