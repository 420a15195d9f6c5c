//! The Boolean-node dispatcher: resolves operand kinds, materializes the
//! first operand (recursing through nested Boolean results) and routes the
//! subtraction to the unbounded clipper, the bounded clipper, or the caller's
//! opening generator.

use crate::bounded::clip_bounded_half_space;
pub use crate::bounded::MarchOverflowPolicy;
use crate::errors::ClipError;
use crate::float_types::{EPSILON, Real};
use crate::halfspace::{HalfSpace, PolygonalBoundedHalfSpace};
use crate::soup::{PolygonSoup, newell_normal};
use crate::unbounded::clip_half_space;
use nalgebra::{Point2, Point3};

/// Opaque reference to a CAD entity owned by the surrounding conversion
/// pipeline; only the [`ConversionContext`] can resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    Union,
    Intersection,
    Difference,
}

impl BooleanOperator {
    pub const fn name(self) -> &'static str {
        match self {
            BooleanOperator::Union => "UNION",
            BooleanOperator::Intersection => "INTERSECTION",
            BooleanOperator::Difference => "DIFFERENCE",
        }
    }
}

/// One operand of a Boolean node, pre-resolved to the kinds the dispatcher
/// can route. Solids stay as opaque references because their materialization
/// (extrusion, sweeping) belongs to the conversion pipeline, not this engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    HalfSpace(HalfSpace),
    PolygonalBoundedHalfSpace(PolygonalBoundedHalfSpace),
    ExtrudedAreaSolid(EntityRef),
    SweptAreaSolid(EntityRef),
    BooleanResult(Box<BooleanNode>),
}

impl Operand {
    pub const fn kind(&self) -> &'static str {
        match self {
            Operand::HalfSpace(_) => "HalfSpace",
            Operand::PolygonalBoundedHalfSpace(_) => "PolygonalBoundedHalfSpace",
            Operand::ExtrudedAreaSolid(_) => "ExtrudedAreaSolid",
            Operand::SweptAreaSolid(_) => "SweptAreaSolid",
            Operand::BooleanResult(_) => "BooleanResult",
        }
    }
}

/// One node of a solid's Boolean definition tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanNode {
    pub operator: BooleanOperator,
    pub first: Operand,
    pub second: Operand,
}

/// Evaluation knobs threaded through the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipOptions {
    pub march_overflow: MarchOverflowPolicy,
}

/// The collaborator contracts of the surrounding conversion pipeline. The
/// engine never parses or tessellates CAD entities itself; everything beyond
/// the clipping arithmetic is delegated here.
pub trait ConversionContext {
    /// Tessellate a boundary curve into closed 2D profile points, expressed
    /// in the owning plane's local frame.
    fn process_curve(&self, curve: &EntityRef) -> Vec<Point2<Real>>;

    /// Materialize a swept-area solid's boundary into `out`.
    fn process_swept_area_solid(&self, solid: &EntityRef, out: &mut PolygonSoup);

    /// Materialize an extruded-area solid's boundary into `out`.
    fn process_extruded_area_solid(&self, solid: &EntityRef, out: &mut PolygonSoup);

    /// Cut the openings of `opening` out of one near-planar polygon,
    /// appending the remainder to `out`.
    fn generate_openings(
        &self,
        polygon: &[Point3<Real>],
        opening: &EntityRef,
        out: &mut PolygonSoup,
    );
}

/// Evaluate one Boolean node, appending the surviving loops to `out`.
///
/// Only DIFFERENCE subtracts. Everything that cannot be routed — unknown
/// operators, operand kinds in the wrong position, degenerate or singular
/// bounded-plane data — is logged and the first operand (where available)
/// passes through unclipped, so some renderable geometry always survives.
pub fn process_boolean<C: ConversionContext>(
    node: &BooleanNode,
    options: &ClipOptions,
    ctx: &C,
    out: &mut PolygonSoup,
) {
    let mut first = PolygonSoup::new();
    if !materialize(&node.first, options, ctx, &mut first) {
        return;
    }

    if node.operator != BooleanOperator::Difference {
        log::error!("{}", ClipError::UnsupportedOperator(node.operator.name()));
        out.append(&first);
        return;
    }

    match &node.second {
        Operand::HalfSpace(half_space) => clip_half_space(&first, half_space, out),
        Operand::PolygonalBoundedHalfSpace(bounded) => {
            let profile = ctx.process_curve(&bounded.boundary);
            if profile.len() < 3 {
                log::error!("{}", ClipError::DegenerateProfile(profile.len()));
                out.append(&first);
                return;
            }
            let Some(position_inv) = bounded.position.try_inverse() else {
                log::error!("{}", ClipError::SingularPlanePosition);
                out.append(&first);
                return;
            };
            clip_bounded_half_space(
                &first,
                &bounded.half_space,
                &profile,
                &bounded.position,
                &position_inv,
                options.march_overflow,
                out,
            );
        },
        Operand::ExtrudedAreaSolid(opening) => {
            // Reduced to the external opening generator, one near-planar
            // polygon at a time.
            for (index, ring) in first.iter_loops().enumerate() {
                if newell_normal(ring).norm_squared() < EPSILON * EPSILON {
                    log::warn!("{}", ClipError::DegeneratePolygon(index));
                    continue;
                }
                ctx.generate_openings(ring, opening, out);
            }
        },
        other => {
            log::error!(
                "{}",
                ClipError::UnsupportedOperand {
                    position: "second",
                    kind: other.kind(),
                }
            );
            out.append(&first);
        },
    }
}

/// Materialize a first-position operand into `out`. Returns false when the
/// operand kind cannot stand as a solid.
fn materialize<C: ConversionContext>(
    operand: &Operand,
    options: &ClipOptions,
    ctx: &C,
    out: &mut PolygonSoup,
) -> bool {
    match operand {
        Operand::BooleanResult(inner) => {
            process_boolean(inner, options, ctx, out);
            true
        },
        Operand::ExtrudedAreaSolid(solid) => {
            ctx.process_extruded_area_solid(solid, out);
            true
        },
        Operand::SweptAreaSolid(solid) => {
            ctx.process_swept_area_solid(solid, out);
            true
        },
        other => {
            log::error!(
                "{}",
                ClipError::UnsupportedOperand {
                    position: "first",
                    kind: other.kind(),
                }
            );
            false
        },
    }
}
