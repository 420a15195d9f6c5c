//! Difference against a *polygon-bounded* half-space: the subtraction only
//! applies inside the footprint of a closed 2D boundary profile projected
//! onto the base plane.
//!
//! Per input loop the work splits in two: the part on the kept side of the
//! infinite plane survives unconditionally, while the removed-side chain is
//! reduced against the profile footprint — pieces outside the footprint are
//! stitched back into closed loops by marching along the boundary polygon.

use crate::boundary::{boundary_crossings, point_in_profile, profile_signed_area};
use crate::errors::ClipError;
use crate::float_types::{EPSILON, Real};
use crate::geometry::{dedup_epsilon, filter_polygon, segment_plane_intersection, write_polygon};
use crate::halfspace::HalfSpace;
use crate::soup::{PolygonSoup, newell_normal};
use nalgebra::{Matrix4, Point2, Point3, Vector2};

/// Above this |cos| the loop is treated as coplanar with the cutting plane
/// and classified by a single point test; edge-by-edge splitting is
/// numerically unstable when nearly coplanar.
const NEAR_PARALLEL: Real = 0.9999;

/// What to do with the partially rebuilt loop when the boundary march trips
/// its endless-loop guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarchOverflowPolicy {
    /// Drop the partial loop. An open ring triangulates worse than a missing
    /// facet, so this is the default.
    #[default]
    DiscardLoop,
    /// Keep whatever was accumulated before the guard tripped.
    KeepPartialLoop,
}

/// One crossing of the removed-side chain with the boundary profile.
#[derive(Debug, Clone)]
struct CrossingRecord {
    /// Chain edge the crossing lies on.
    chain_edge: usize,
    /// Parameter along that chain edge.
    t: Real,
    /// Hit point in world space (on the chain).
    point3: Point3<Real>,
    /// Hit point in the plane's local frame.
    point2: Point2<Real>,
    /// Boundary edge that was crossed.
    boundary_edge: usize,
    /// True when the chain leaves the footprint here (in → out).
    is_exit: bool,
}

/// Subtract the polygon-bounded half-space from `input`, appending the
/// surviving loops to `out`.
///
/// `profile` is the tessellated closed boundary in the plane's local frame;
/// `position` maps that frame to world coordinates and `position_inv` is its
/// inverse. The half-space direction must be unit length.
pub fn clip_bounded_half_space(
    input: &PolygonSoup,
    half_space: &HalfSpace,
    profile: &[Point2<Real>],
    position: &Matrix4<Real>,
    position_inv: &Matrix4<Real>,
    policy: MarchOverflowPolicy,
    out: &mut PolygonSoup,
) {
    let base = half_space.base;
    let kept = half_space.kept_normal();

    for ring in input.iter_loops() {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let ring_normal = newell_normal(ring);
        if ring_normal.norm_squared() < EPSILON * EPSILON {
            // Zero-area sliver; the filter drops it.
            write_polygon(ring.to_vec(), out);
            continue;
        }

        if ring_normal.normalize().dot(&kept).abs() > NEAR_PARALLEL {
            // Nearly coplanar with the cutting plane: classify the whole loop
            // by a single point test instead of splitting edge by edge.
            if half_space.is_kept(&ring[0]) {
                write_polygon(ring.to_vec(), out);
            } else {
                reduce_black_chain(ring.to_vec(), profile, position, position_inv, policy, out);
            }
            continue;
        }

        // General case: one walk, two chains. Every crossing point closes one
        // chain and opens the other, so both share the cut boundary exactly.
        let mut white_chain: Vec<Point3<Real>> = Vec::with_capacity(n + 2);
        let mut black_chain: Vec<Point3<Real>> = Vec::with_capacity(n + 2);
        let mut white = half_space.is_kept(&ring[0]);
        for i in 0..n {
            let p = ring[i];
            let q = ring[(i + 1) % n];
            if white {
                white_chain.push(p);
            } else {
                black_chain.push(p);
            }
            if let Some(hit) = segment_plane_intersection(&base, &kept, &p, &q, white) {
                white_chain.push(hit);
                black_chain.push(hit);
                white = !white;
            }
        }

        // Anything outside the infinite half-space survives regardless of the
        // bounding profile.
        write_polygon(white_chain, out);

        if !black_chain.is_empty() {
            reduce_black_chain(black_chain, profile, position, position_inv, policy, out);
        }
    }
}

/// Reduce the removed-side chain against the profile footprint: keep what
/// falls outside the footprint, rebuild closed loops along the boundary, drop
/// what is genuinely subtracted.
fn reduce_black_chain(
    mut chain: Vec<Point3<Real>>,
    profile: &[Point2<Real>],
    position: &Matrix4<Real>,
    position_inv: &Matrix4<Real>,
    policy: MarchOverflowPolicy,
    out: &mut PolygonSoup,
) {
    filter_polygon(&mut chain);
    if chain.len() < 3 {
        return;
    }
    let n = chain.len();

    let local: Vec<Point3<Real>> = chain
        .iter()
        .map(|p| position_inv.transform_point(p))
        .collect();
    let local2: Vec<Point2<Real>> = local.iter().map(|p| Point2::new(p.x, p.y)).collect();
    let eps3 = dedup_epsilon(&chain);

    // Walk the chain, collecting crossings in order and tracking the running
    // inside/outside state.
    let started_inside = point_in_profile(&local2[0], profile);
    let mut inside = started_inside;
    let mut crossings: Vec<CrossingRecord> = Vec::new();
    for i in 0..n {
        let a = local2[i];
        let b = local2[(i + 1) % n];
        let hits = boundary_crossings(&a, &b, profile, inside, false);
        for hit in hits {
            let world = chain[i] + (chain[(i + 1) % n] - chain[i]) * hit.t;
            crossings.push(CrossingRecord {
                chain_edge: i,
                t: hit.t,
                point3: world,
                point2: hit.point,
                boundary_edge: hit.boundary_edge,
                is_exit: inside,
            });
            inside = !inside;
        }
    }

    // Odd totals mean inconsistent input data; leave the loop unclipped
    // rather than aborting the import.
    if crossings.len() % 2 == 1 {
        log::warn!("{}", ClipError::OddCrossingCount(crossings.len()));
        write_polygon(chain, out);
        return;
    }

    // Start the list at an exit-type crossing so it pairs as (exit, entry),
    // then drop coincident adjacent pairs (tangent touches), wrap-around
    // included.
    if let Some(first_exit) = crossings.iter().position(|c| c.is_exit) {
        crossings.rotate_left(first_exit);
    }
    coalesce_coincident_pairs(&mut crossings, eps3);
    if let Some(first_exit) = crossings.iter().position(|c| c.is_exit) {
        crossings.rotate_left(first_exit);
    }

    if crossings.is_empty() {
        if started_inside {
            // Entirely within the footprint: fully subtracted.
            return;
        }
        emit_untouched_chain(chain, &local, &local2, profile, position, out);
        return;
    }

    rebuild_loops(&chain, &local, crossings, profile, position, policy, out);
}

/// Remove circular-adjacent crossing pairs whose 3D hit points are closer
/// than the chain's own deduplication tolerance. A coincident (exit, entry)
/// or (entry, exit) pair is a tangent touch that subtracts nothing. The
/// comparison is in 3D on purpose: on a loop whose plane contains the
/// extrusion axis two genuine crossings project onto the same 2D point.
fn coalesce_coincident_pairs(crossings: &mut Vec<CrossingRecord>, eps3: Real) {
    let mut changed = true;
    while changed && crossings.len() >= 2 {
        changed = false;
        let len = crossings.len();
        for i in 0..len {
            let j = (i + 1) % len;
            if (crossings[i].point3 - crossings[j].point3).norm_squared() < eps3 {
                if j > i {
                    crossings.drain(i..=j);
                } else {
                    crossings.remove(i);
                    crossings.remove(0);
                }
                changed = true;
                break;
            }
        }
    }
}

/// The chain never crosses the boundary and starts outside of it: it is kept
/// as-is. When the footprint lies wholly inside the chain it still punches a
/// hole, emitted as a counter-wound loop on the chain's plane.
fn emit_untouched_chain(
    chain: Vec<Point3<Real>>,
    local: &[Point3<Real>],
    local2: &[Point2<Real>],
    profile: &[Point2<Real>],
    position: &Matrix4<Real>,
    out: &mut PolygonSoup,
) {
    let chain_normal = newell_normal(local);
    let hole = chain_normal.z.abs() > EPSILON && point_in_profile(&profile[0], local2);

    write_polygon(chain, out);

    if hole {
        let lift = PlaneLift::new(local, local[0].z);
        let chain_ccw = chain_normal.z > 0.0;
        let profile_ccw = profile_signed_area(profile) > 0.0;
        let mut ring: Vec<Point3<Real>> = profile
            .iter()
            .map(|p| position.transform_point(&lift.lift(p)))
            .collect();
        if profile_ccw == chain_ccw {
            ring.reverse();
        }
        write_polygon(ring, out);
    }
}

/// Lifts 2D boundary points onto the chain's own polygon plane, expressed in
/// the plane-local frame.
struct PlaneLift {
    normal: nalgebra::Vector3<Real>,
    offset: Real,
    fallback_z: Real,
}

impl PlaneLift {
    fn new(local: &[Point3<Real>], fallback_z: Real) -> Self {
        let normal = newell_normal(local);
        let offset = normal.dot(&local[0].coords);
        PlaneLift {
            normal,
            offset,
            fallback_z,
        }
    }

    fn lift(&self, p: &Point2<Real>) -> Point3<Real> {
        let z = if self.normal.z.abs() > EPSILON {
            (self.offset - self.normal.x * p.x - self.normal.y * p.y) / self.normal.z
        } else {
            // Chain plane contains the extrusion axis; keep the last known
            // height instead of dividing by ~0.
            self.fallback_z
        };
        Point3::new(p.x, p.y, z)
    }
}

/// Parameter of `p` along boundary edge `edge`, 0 at the edge start.
fn edge_param(profile: &[Point2<Real>], edge: usize, p: &Point2<Real>) -> Real {
    let b0 = profile[edge];
    let d: Vector2<Real> = profile[(edge + 1) % profile.len()] - b0;
    let len2 = d.norm_squared();
    if len2 < EPSILON * EPSILON {
        return 0.0;
    }
    (p - b0).dot(&d) / len2
}

/// Explicit state of one boundary march: current edge, current parameter on
/// it, and the fixed direction of travel.
struct BoundaryMarch {
    edge: usize,
    u: Real,
    forward: bool,
}

impl BoundaryMarch {
    /// True when `u` is not behind the march direction on the current edge.
    /// Equal parameters count as ahead: on a loop whose plane contains the
    /// extrusion axis, distinct 3D targets share one projected parameter.
    fn ahead(&self, u: Real) -> bool {
        if self.forward {
            u > self.u - EPSILON
        } else {
            u < self.u + EPSILON
        }
    }

    /// Step past the end of the current edge, returning the index of the
    /// boundary vertex being passed.
    fn advance(&mut self, profile_len: usize) -> usize {
        if self.forward {
            let vertex = (self.edge + 1) % profile_len;
            self.edge = vertex;
            self.u = 0.0;
            vertex
        } else {
            let vertex = self.edge;
            self.edge = (self.edge + profile_len - 1) % profile_len;
            self.u = 1.0;
            vertex
        }
    }
}

/// What the march can run into on its current edge.
enum MarchTarget {
    /// The loop's own starting point: the loop closes.
    LoopStart,
    /// An unconsumed exit crossing: switch back to the chain there.
    Exit(usize),
}

/// Consume (exit, entry) crossing pairs, rebuilding one closed output loop
/// per iteration: chain segments outside the footprint joined by stretches of
/// the boundary polygon.
#[allow(clippy::too_many_arguments)]
fn rebuild_loops(
    chain: &[Point3<Real>],
    local: &[Point3<Real>],
    crossings: Vec<CrossingRecord>,
    profile: &[Point2<Real>],
    position: &Matrix4<Real>,
    policy: MarchOverflowPolicy,
    out: &mut PolygonSoup,
) {
    let m = profile.len();
    let pairs = crossings.len() / 2;
    let mut consumed = vec![false; pairs];
    let budget = chain.len() + m;

    // Winding rule: when the chain's projected normal agrees in sign with the
    // boundary's, march backwards along the boundary, otherwise forwards.
    // This keeps the rebuilt loop's winding consistent with the source solid.
    let chain_ccw = newell_normal(local).z > 0.0;
    let profile_ccw = profile_signed_area(profile) > 0.0;
    let forward = chain_ccw != profile_ccw;

    let lift = PlaneLift::new(local, local[0].z);

    for start in 0..pairs {
        if consumed[start] {
            continue;
        }
        consumed[start] = true;
        let start_exit = crossings[2 * start].clone();
        let entry = &crossings[2 * start + 1];

        let mut result: Vec<Point3<Real>> = vec![start_exit.point3];
        push_chain_segment(&mut result, chain, &start_exit, entry);
        result.push(entry.point3);

        let mut march = BoundaryMarch {
            edge: entry.boundary_edge,
            u: edge_param(profile, entry.boundary_edge, &entry.point2),
            forward,
        };
        let start_u = edge_param(profile, start_exit.boundary_edge, &start_exit.point2);
        // World-space march position; target ranking happens in 3D because
        // the projected parameter alone cannot separate targets on a loop
        // whose plane contains the extrusion axis.
        let mut current3 = entry.point3;

        let mut overflowed = false;
        loop {
            if result.len() > budget {
                log::error!(
                    "{}",
                    ClipError::RunawayMarch {
                        emitted: result.len(),
                        budget,
                    }
                );
                overflowed = true;
                break;
            }

            // Nearest termination on the current edge: the loop's own start
            // or any unconsumed exit, whichever lies at the smaller marching
            // distance.
            let mut best: Option<(Real, MarchTarget)> = None;
            if start_exit.boundary_edge == march.edge && march.ahead(start_u) {
                let d = (start_exit.point3 - current3).norm_squared();
                best = Some((d, MarchTarget::LoopStart));
            }
            for (pair, taken) in consumed.iter().enumerate() {
                if *taken {
                    continue;
                }
                let exit = &crossings[2 * pair];
                if exit.boundary_edge != march.edge {
                    continue;
                }
                if !march.ahead(edge_param(profile, march.edge, &exit.point2)) {
                    continue;
                }
                let d = (exit.point3 - current3).norm_squared();
                if best.as_ref().is_none_or(|(bd, _)| d < *bd) {
                    best = Some((d, MarchTarget::Exit(pair)));
                }
            }

            match best {
                Some((_, MarchTarget::LoopStart)) => break,
                Some((_, MarchTarget::Exit(pair))) => {
                    consumed[pair] = true;
                    let exit = &crossings[2 * pair];
                    let next_entry = &crossings[2 * pair + 1];
                    result.push(exit.point3);
                    push_chain_segment(&mut result, chain, exit, next_entry);
                    result.push(next_entry.point3);
                    march.edge = next_entry.boundary_edge;
                    march.u = edge_param(profile, next_entry.boundary_edge, &next_entry.point2);
                    current3 = next_entry.point3;
                },
                None => {
                    let vertex = march.advance(m);
                    let lifted = position.transform_point(&lift.lift(&profile[vertex]));
                    result.push(lifted);
                    current3 = lifted;
                },
            }
        }

        if !overflowed || policy == MarchOverflowPolicy::KeepPartialLoop {
            write_polygon(result, out);
        }
    }
}

/// Append every chain vertex from just after the exit edge up to and
/// including the vertex preceding the entry crossing. When both crossings sit
/// on the same edge with the entry ahead of the exit, no vertex lies between
/// them.
fn push_chain_segment(
    result: &mut Vec<Point3<Real>>,
    chain: &[Point3<Real>],
    exit: &CrossingRecord,
    entry: &CrossingRecord,
) {
    if exit.chain_edge == entry.chain_edge && entry.t > exit.t + EPSILON {
        return;
    }
    let n = chain.len();
    let mut idx = (exit.chain_edge + 1) % n;
    loop {
        result.push(chain[idx]);
        if idx == entry.chain_edge {
            break;
        }
        idx = (idx + 1) % n;
    }
}
