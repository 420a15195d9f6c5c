//! 2D boundary-profile queries: segment vs. closed-profile crossing detection
//! and ray-vote point classification. All coordinates live in the clipping
//! plane's local frame.

use crate::float_types::{EPSILON, Real};
use geo::{Area, Coord, LineString, Polygon as GeoPolygon};
use nalgebra::{Point2, Vector2};

/// One crossing of a tested segment with a boundary-profile edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCrossing {
    /// Parameter along the tested segment; may exceed 1 in half-open mode.
    pub t: Real,
    /// The 2D hit point in the plane's local frame.
    pub point: Point2<Real>,
    /// Index of the boundary edge that was crossed.
    pub boundary_edge: usize,
}

/// Signed area of the closed profile, positive for counter-clockwise winding.
pub fn profile_signed_area(profile: &[Point2<Real>]) -> Real {
    let ring = LineString::new(
        profile
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect::<Vec<_>>(),
    );
    GeoPolygon::new(ring, vec![]).signed_area()
}

fn cross2(a: &Vector2<Real>, b: &Vector2<Real>) -> Real {
    a.x * b.y - a.y * b.x
}

/// Inward normal of a boundary edge with direction `d`, for the given
/// winding.
fn inward_normal(d: &Vector2<Real>, ccw: bool) -> Vector2<Real> {
    if ccw {
        Vector2::new(-d.y, d.x)
    } else {
        Vector2::new(d.y, -d.x)
    }
}

/// Squared tolerance derived from the profile's own bounding box, matching
/// the 3D deduplication policy.
pub(crate) fn profile_epsilon(profile: &[Point2<Real>]) -> Real {
    let mut min = Vector2::repeat(Real::MAX);
    let mut max = Vector2::repeat(Real::MIN);
    for p in profile {
        min = min.inf(&p.coords);
        max = max.sup(&p.coords);
    }
    (max - min).norm_squared() / 1.0e6
}

/// Intersect the segment `e0 → e1` with every edge of the closed `profile`
/// and return the crossings ordered along the segment.
///
/// `start_inside` is the walker's running inside/outside state at `e0`; it
/// matters only when `e0` lies exactly on a boundary edge. With `half_open`
/// the `t ∈ [0, 1]` bound on the tested segment is relaxed upward, turning it
/// into a ray — used by [`point_in_profile`].
///
/// Exact-endpoint contract, mirroring the segment/plane test:
/// - a hit at `e1` is suppressed — the next segment necessarily starts there
///   and reports it if appropriate;
/// - a hit at `e0` is reported only if the segment's direction, measured
///   against the boundary's inward normal, changes the inside/outside state
///   relative to `start_inside`.
///
/// Near-duplicate hits on consecutive boundary edges (a crossing exactly
/// through a shared profile vertex reports once per edge) are coalesced into
/// one.
pub fn boundary_crossings(
    e0: &Point2<Real>,
    e1: &Point2<Real>,
    profile: &[Point2<Real>],
    start_inside: bool,
    half_open: bool,
) -> Vec<ProfileCrossing> {
    let m = profile.len();
    if m < 3 {
        return Vec::new();
    }
    let s = e1 - e0;
    if s.norm_squared() < EPSILON * EPSILON {
        return Vec::new();
    }
    let eps2 = profile_epsilon(profile);
    let ccw = profile_signed_area(profile) > 0.0;

    let mut crossings: Vec<ProfileCrossing> = Vec::new();
    for j in 0..m {
        let b0 = profile[j];
        let b1 = profile[(j + 1) % m];
        let d = b1 - b0;

        let denom = cross2(&s, &d);
        if denom.abs() < EPSILON {
            // Parallel or degenerate edge; a true tangent run shows up as an
            // odd total at the caller, which logs it.
            continue;
        }
        let w = b0 - e0;
        let t = cross2(&w, &d) / denom;
        let u = cross2(&w, &s) / denom;

        if !(-EPSILON..=1.0 + EPSILON).contains(&u) {
            continue;
        }
        if t < -EPSILON || (!half_open && t > 1.0 + EPSILON) {
            continue;
        }

        let hit = e0 + s * t;
        if !half_open && (hit - e1).norm_squared() < eps2 {
            // Ending exactly on the boundary: the next segment reports it.
            continue;
        }
        if (hit - e0).norm_squared() < eps2 {
            // Starting exactly on the boundary: only a genuine side change
            // counts, otherwise the segment merely touches and leaves.
            let heading_inside = s.dot(&inward_normal(&d, ccw)) > 0.0;
            if heading_inside == start_inside {
                continue;
            }
            crossings.push(ProfileCrossing {
                t: 0.0,
                point: *e0,
                boundary_edge: j,
            });
            continue;
        }

        crossings.push(ProfileCrossing {
            t,
            point: hit,
            boundary_edge: j,
        });
    }

    crossings.sort_by(|a, b| a.t.total_cmp(&b.t));
    crossings.dedup_by(|b, a| (b.point - a.point).norm_squared() < eps2);
    crossings
}

/// Even-odd point-in-profile test stabilized by majority vote.
///
/// Casts three rays in different directions and takes the parity of each
/// crossing count; the point is inside iff at least two votes agree. A single
/// even-odd ray is unstable when it grazes a shared profile vertex; three
/// skewed directions make that failure mode lose the vote.
pub fn point_in_profile(p: &Point2<Real>, profile: &[Point2<Real>]) -> bool {
    const RAY_DIRECTIONS: [[Real; 2]; 3] = [
        [0.928_847, 0.370_471],
        [-0.342_02, 0.939_693],
        [0.259_81, -0.965_661],
    ];
    let mut votes = 0;
    for dir in &RAY_DIRECTIONS {
        let e1 = p + Vector2::new(dir[0], dir[1]);
        let crossings = boundary_crossings(p, &e1, profile, false, true);
        if crossings.len() % 2 == 1 {
            votes += 1;
        }
    }
    votes >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn unit_square() -> Vec<Point2<Real>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn winding_sign_matches_vertex_order() {
        assert!(profile_signed_area(&unit_square()) > 0.0);
        let mut cw = unit_square();
        cw.reverse();
        assert!(profile_signed_area(&cw) < 0.0);
    }

    #[test]
    fn segment_through_the_square_crosses_twice() {
        let crossings = boundary_crossings(
            &Point2::new(-1.0, 0.5),
            &Point2::new(2.0, 0.5),
            &unit_square(),
            false,
            false,
        );
        assert_eq!(crossings.len(), 2);
        assert!(crossings[0].t < crossings[1].t);
        assert_eq!(crossings[0].boundary_edge, 3);
        assert_eq!(crossings[1].boundary_edge, 1);
    }

    #[test]
    fn segment_ending_on_the_boundary_is_suppressed() {
        let crossings = boundary_crossings(
            &Point2::new(-1.0, 0.5),
            &Point2::new(0.0, 0.5),
            &unit_square(),
            false,
            false,
        );
        assert!(crossings.is_empty());
        // ... and the follow-up segment starting there reports it.
        let crossings = boundary_crossings(
            &Point2::new(0.0, 0.5),
            &Point2::new(0.5, 0.5),
            &unit_square(),
            false,
            false,
        );
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].t, 0.0);
    }

    #[test]
    fn start_on_boundary_touch_and_return_is_ignored() {
        // Starts on the left edge but walks away outward while the walker
        // already believes it is outside: no state change, no crossing.
        let crossings = boundary_crossings(
            &Point2::new(0.0, 0.5),
            &Point2::new(-1.0, 0.5),
            &unit_square(),
            false,
            false,
        );
        assert!(crossings.is_empty());
    }

    #[test]
    fn closed_walk_produces_even_total_crossings() {
        // A triangle overlapping the square; walk its closed loop.
        let tri = [
            Point2::new(-0.5, 0.25),
            Point2::new(1.5, 0.25),
            Point2::new(0.5, 1.5),
        ];
        let mut inside = point_in_profile(&tri[0], &unit_square());
        let mut total = 0usize;
        for i in 0..tri.len() {
            let crossings = boundary_crossings(
                &tri[i],
                &tri[(i + 1) % tri.len()],
                &unit_square(),
                inside,
                false,
            );
            if crossings.len() % 2 == 1 {
                inside = !inside;
            }
            total += crossings.len();
        }
        assert_eq!(total % 2, 0);
        assert_eq!(total, 6);
    }

    #[test]
    fn point_in_profile_basic_classification() {
        assert!(point_in_profile(&Point2::new(0.5, 0.5), &unit_square()));
        assert!(!point_in_profile(&Point2::new(2.0, 2.0), &unit_square()));
    }

    #[test]
    fn point_exactly_on_a_vertex_is_decided_without_panic() {
        // The answer for a boundary point is unspecified; it just must not
        // crash or hang.
        let _ = point_in_profile(&Point2::new(0.0, 0.0), &unit_square());
        let _ = point_in_profile(&Point2::new(1.0, 1.0), &unit_square());
    }

    #[test]
    fn half_open_ray_reaches_past_the_segment_end() {
        // Short segment pointing at the square from outside: closed mode sees
        // nothing, ray mode sees both walls.
        let e0 = Point2::new(-2.0, 0.5);
        let e1 = Point2::new(-1.9, 0.5);
        assert!(boundary_crossings(&e0, &e1, &unit_square(), false, false).is_empty());
        let ray = boundary_crossings(&e0, &e1, &unit_square(), false, true);
        assert_eq!(ray.len(), 2);
    }
}
