//! Half-space clipping primitives: the infinite half-space and its
//! polygon-bounded variant.

use crate::boolean::EntityRef;
use crate::float_types::{EPSILON, Real};
use nalgebra::{Matrix4, Point3, Vector3};

/// An infinite half-space: base point, direction and the CAD agreement flag.
///
/// The direction need not be unit length for plain plane clipping; the
/// polygon-bounded variant requires it normalized because profile points are
/// expressed in the plane's own frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfSpace {
    /// A point on the base plane.
    pub base: Point3<Real>,
    /// Plane direction as authored; interpreted through `agreement`.
    pub direction: Vector3<Real>,
    /// When true the half-space material lies on the positive side of
    /// `direction`; subtracting it therefore keeps the negative side.
    pub agreement: bool,
}

impl HalfSpace {
    pub const fn new(base: Point3<Real>, direction: Vector3<Real>, agreement: bool) -> Self {
        HalfSpace {
            base,
            direction,
            agreement,
        }
    }

    /// The direction resolved through the agreement flag so that it points
    /// toward the *kept* ("white") side: `(p - base) · kept_normal() > -EPSILON`
    /// means `p` survives the subtraction.
    pub fn kept_normal(&self) -> Vector3<Real> {
        if self.agreement {
            -self.direction
        } else {
            self.direction
        }
    }

    /// True if `p` is on the kept side (points within `EPSILON` of the plane
    /// count as kept).
    pub fn is_kept(&self, p: &Point3<Real>) -> bool {
        (p - self.base).dot(&self.kept_normal()) > -EPSILON
    }
}

/// A half-space whose subtraction effect is restricted to the footprint of a
/// closed 2D boundary polygon, expressed in the base plane's local frame.
///
/// The boundary is an opaque curve reference; the dispatcher tessellates it
/// through [`crate::boolean::ConversionContext::process_curve`] before
/// clipping. `position` maps plane-local coordinates to world coordinates;
/// its inverse is derived with [`Matrix4::try_inverse`] at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonalBoundedHalfSpace {
    pub half_space: HalfSpace,
    pub boundary: EntityRef,
    pub position: Matrix4<Real>,
}
