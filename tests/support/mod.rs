//! Test support library
//! Provides various helper functions & utilities for tests.

use nalgebra::{Point2, Point3};
use solidclip::float_types::Real;
use solidclip::soup::newell_normal;
use solidclip::{ConversionContext, EntityRef, PolygonSoup};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// of a polygon soup.
pub fn bounding_box(soup: &PolygonSoup) -> [Real; 6] {
    let mut min_x = Real::MAX;
    let mut min_y = Real::MAX;
    let mut min_z = Real::MAX;
    let mut max_x = Real::MIN;
    let mut max_y = Real::MIN;
    let mut max_z = Real::MIN;

    for p in &soup.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        min_z = min_z.min(p.z);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
        max_z = max_z.max(p.z);
    }
    [min_x, min_y, min_z, max_x, max_y, max_z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Sum of the unsigned loop areas, via the Newell normal magnitude.
pub fn total_area(soup: &PolygonSoup) -> Real {
    soup.iter_loops().map(|r| newell_normal(r).norm() / 2.0).sum()
}

/// Axis-aligned cuboid as six outward-wound quads.
pub fn cuboid(min: Point3<Real>, max: Point3<Real>) -> PolygonSoup {
    let mut soup = PolygonSoup::new();
    // bottom (-z)
    soup.push_polygon(&[
        Point3::new(min.x, min.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(max.x, min.y, min.z),
    ]);
    // top (+z)
    soup.push_polygon(&[
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ]);
    // front (-y)
    soup.push_polygon(&[
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(min.x, min.y, max.z),
    ]);
    // back (+y)
    soup.push_polygon(&[
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, max.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(max.x, max.y, min.z),
    ]);
    // left (-x)
    soup.push_polygon(&[
        Point3::new(min.x, min.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(min.x, max.y, max.z),
        Point3::new(min.x, max.y, min.z),
    ]);
    // right (+x)
    soup.push_polygon(&[
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(max.x, min.y, max.z),
    ]);
    soup
}

/// Canned conversion pipeline: every solid reference resolves to the same
/// stored soup, every curve to the same stored profile, and the opening
/// generator passes polygons through unchanged.
pub struct StubPipeline {
    pub solid: PolygonSoup,
    pub profile: Vec<Point2<Real>>,
}

impl ConversionContext for StubPipeline {
    fn process_curve(&self, _curve: &EntityRef) -> Vec<Point2<Real>> {
        self.profile.clone()
    }

    fn process_swept_area_solid(&self, _solid: &EntityRef, out: &mut PolygonSoup) {
        out.append(&self.solid);
    }

    fn process_extruded_area_solid(&self, _solid: &EntityRef, out: &mut PolygonSoup) {
        out.append(&self.solid);
    }

    fn generate_openings(
        &self,
        polygon: &[Point3<Real>],
        _opening: &EntityRef,
        out: &mut PolygonSoup,
    ) {
        out.push_polygon(polygon);
    }
}
