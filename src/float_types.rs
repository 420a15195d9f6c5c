// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// Fixed tolerance for plane / segment classification.
///
/// Deliberately *not* used for point deduplication, which derives its own
/// per-polygon tolerance from the polygon's bounding box — see
/// [`crate::geometry::dedup_epsilon`].
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-4;
/// Fixed tolerance for plane / segment classification.
///
/// Deliberately *not* used for point deduplication, which derives its own
/// per-polygon tolerance from the polygon's bounding box — see
/// [`crate::geometry::dedup_epsilon`].
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-6;
