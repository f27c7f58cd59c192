//! Geometry kernel for the pathfinding engine.
//!
//! This module provides the polygon and box primitives that both spatial
//! decompositions are built on: even-odd point-in-polygon containment,
//! segment-segment intersection, and polygon-vs-box queries. It has no
//! dependencies on the rest of the crate besides the error type.

use crate::error::NavError;
use nalgebra::Point2;

/// A point in world coordinates.
pub type Point = Point2<f64>;

/// Tests two line segments `a1-a2` and `b1-b2` for intersection.
///
/// Standard parametric test. A zero denominator (parallel or collinear
/// segments) yields `false`: collinear-overlapping segments are NOT treated
/// as intersecting. This is a deliberate simplification carried by the whole
/// engine; degenerate axis-aligned obstacle layouts where two edges overlap
/// exactly may therefore be under-detected.
pub fn segments_intersect(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> bool {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 {
        return false;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denom;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denom;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// An axis-aligned bounding box.
///
/// `contains` is half-open (`min` inclusive, `max` exclusive) so that a point
/// on a shared boundary between two boxes resolves to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    min: Point,
    max: Point,
}

impl Aabb {
    /// Creates a box from its minimum and maximum corners.
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Minimum corner.
    pub fn min(&self) -> &Point {
        &self.min
    }

    /// Maximum corner.
    pub fn max(&self) -> &Point {
        &self.max
    }

    /// Box width along x.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Box height along y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// The four corners, counter-clockwise from `min`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// The four sides as segments, following the corner order.
    pub fn sides(&self) -> [(Point, Point); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    /// Splits the box into four equal quadrants.
    pub fn quadrants(&self) -> [Aabb; 4] {
        let c = self.center();
        [
            Aabb::new(self.min, c),
            Aabb::new(Point::new(c.x, self.min.y), Point::new(self.max.x, c.y)),
            Aabb::new(Point::new(self.min.x, c.y), Point::new(c.x, self.max.y)),
            Aabb::new(c, self.max),
        ]
    }

    /// Half-open containment test.
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Tests whether two boxes touch (overlapping intervals on both axes,
    /// boundary contact included). Edge- and corner-adjacent boxes touch.
    pub fn touches(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// An obstacle polygon: a closed ring of vertices, immutable once built.
///
/// The last vertex implicitly connects back to the first. Construction
/// rejects degenerate rings (fewer than three vertices) and self-intersecting
/// rings; downstream components rely on both properties.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Builds a polygon from an ordered vertex ring.
    ///
    /// # Errors
    /// * `NavError::InvalidGeometry` if the ring has fewer than three
    ///   vertices or any two non-adjacent edges intersect.
    pub fn new(vertices: Vec<Point>) -> Result<Self, NavError> {
        if vertices.len() < 3 {
            return Err(NavError::InvalidGeometry(
                "polygon requires at least three vertices",
            ));
        }

        let n = vertices.len();
        for i in 0..n {
            for j in (i + 1)..n {
                // Adjacent edges share a vertex; the shared endpoint is not a
                // self-intersection.
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
                let (a1, a2) = (vertices[i], vertices[(i + 1) % n]);
                let (b1, b2) = (vertices[j], vertices[(j + 1) % n]);
                if segments_intersect(&a1, &a2, &b1, &b2) {
                    return Err(NavError::InvalidGeometry(
                        "polygon ring is self-intersecting",
                    ));
                }
            }
        }

        Ok(Self { vertices })
    }

    /// Convenience constructor for an axis-aligned rectangular obstacle.
    pub fn rectangle(min: Point, max: Point) -> Result<Self, NavError> {
        Self::new(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    /// The vertex ring.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Iterates over the ring's edges, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Axis-aligned bounding box of the ring.
    pub fn bounding_box(&self) -> Aabb {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        Aabb::new(min, max)
    }

    /// Even-odd (ray casting) containment test.
    ///
    /// Points exactly on an edge are classified one way or the other by the
    /// half-open comparisons below; the rule is arbitrary but the same rule
    /// is used everywhere containment is tested, so obstacle marking and
    /// point queries can never contradict each other.
    pub fn contains(&self, p: &Point) -> bool {
        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > p.y) != (vj.y > p.y)
                && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Tests whether this polygon fully contains the box (all four corners
    /// inside this single polygon).
    pub fn contains_box(&self, b: &Aabb) -> bool {
        b.corners().iter().all(|c| self.contains(c))
    }

    /// Tests whether this polygon intersects the box.
    ///
    /// Combines sampled containment (box corners and center inside the
    /// polygon, polygon vertices inside the box) with an exact edge-vs-edge
    /// intersection sweep. The edge sweep is required: a box can straddle a
    /// polygon edge without any sampled point falling inside it.
    pub fn intersects_box(&self, b: &Aabb) -> bool {
        if b.corners().iter().any(|c| self.contains(c)) || self.contains(&b.center()) {
            return true;
        }
        if self.vertices.iter().any(|v| b.contains(v)) {
            return true;
        }
        for (s1, s2) in b.sides() {
            for (p1, p2) in self.edges() {
                if segments_intersect(&s1, &s2, &p1, &p2) {
                    return true;
                }
            }
        }
        false
    }
}

/// Euclidean distance between two points.
pub fn euclidean(a: &Point, b: &Point) -> f64 {
    (b - a).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::rectangle(Point::new(x0, y0), Point::new(x1, y1)).unwrap()
    }

    #[test]
    fn test_point_in_polygon() {
        let poly = square(0.0, 0.0, 10.0, 10.0);
        assert!(poly.contains(&Point::new(5.0, 5.0)));
        assert!(!poly.contains(&Point::new(15.0, 5.0)));
        assert!(!poly.contains(&Point::new(5.0, -1.0)));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // L-shape: the notch at the top right is outside.
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(poly.contains(&Point::new(2.0, 8.0)));
        assert!(poly.contains(&Point::new(8.0, 2.0)));
        assert!(!poly.contains(&Point::new(8.0, 8.0)), "notch must be outside");
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let result = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(matches!(result, Err(NavError::InvalidGeometry(_))));
    }

    #[test]
    fn test_self_intersecting_polygon_rejected() {
        // Bowtie: edges (0,0)-(10,10) and (10,0)-(0,10) cross at (5,5).
        let result = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ]);
        assert!(matches!(result, Err(NavError::InvalidGeometry(_))));
    }

    #[test]
    fn test_segments_intersect() {
        let cross = segments_intersect(
            &Point::new(-1.0, 0.0),
            &Point::new(1.0, 0.0),
            &Point::new(0.0, -1.0),
            &Point::new(0.0, 1.0),
        );
        assert!(cross, "crossing segments must intersect");

        let apart = segments_intersect(
            &Point::new(0.0, 0.0),
            &Point::new(1.0, 0.0),
            &Point::new(2.0, 1.0),
            &Point::new(3.0, 1.0),
        );
        assert!(!apart, "parallel segments never intersect");
    }

    #[test]
    fn test_collinear_overlap_is_not_intersection() {
        // Known limitation: collinear overlapping segments report false.
        let overlap = segments_intersect(
            &Point::new(0.0, 0.0),
            &Point::new(4.0, 0.0),
            &Point::new(2.0, 0.0),
            &Point::new(6.0, 0.0),
        );
        assert!(!overlap);
    }

    #[test]
    fn test_polygon_contains_box() {
        let poly = square(0.0, 0.0, 100.0, 100.0);
        let inner = Aabb::new(Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        let straddling = Aabb::new(Point::new(90.0, 10.0), Point::new(110.0, 20.0));
        assert!(poly.contains_box(&inner));
        assert!(!poly.contains_box(&straddling));
    }

    #[test]
    fn test_intersects_box_straddling_edge() {
        // A thin polygon slicing through the middle of the box: no box corner
        // and no box center lies inside it, only the edge sweep detects it.
        let blade = square(-10.0, 4.0, 30.0, 4.5);
        let b = Aabb::new(Point::new(0.0, 0.0), Point::new(20.0, 10.0));
        assert!(!blade.contains(&b.center()));
        assert!(b.corners().iter().all(|c| !blade.contains(c)));
        assert!(blade.intersects_box(&b));
    }

    #[test]
    fn test_intersects_box_polygon_inside_box() {
        // A small obstacle strictly inside a large box is caught by the
        // vertex-in-box check even though no box sample is inside it.
        let small = square(40.0, 40.0, 45.0, 45.0);
        let b = Aabb::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!(small.intersects_box(&b));
    }

    #[test]
    fn test_intersects_box_disjoint() {
        let poly = square(50.0, 50.0, 60.0, 60.0);
        let b = Aabb::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(!poly.intersects_box(&b));
    }

    #[test]
    fn test_aabb_touches() {
        let a = Aabb::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let edge = Aabb::new(Point::new(10.0, 0.0), Point::new(20.0, 10.0));
        let corner = Aabb::new(Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        let apart = Aabb::new(Point::new(11.0, 0.0), Point::new(20.0, 10.0));
        assert!(a.touches(&edge), "edge-adjacent boxes touch");
        assert!(a.touches(&corner), "corner-adjacent boxes touch");
        assert!(!a.touches(&apart));
        assert!(edge.touches(&a), "touching is symmetric");
    }

    #[test]
    fn test_aabb_contains_half_open() {
        let a = Aabb::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(a.contains(&Point::new(0.0, 0.0)));
        assert!(!a.contains(&Point::new(10.0, 5.0)));
        assert!(!a.contains(&Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_quadrants_tile_the_box() {
        let a = Aabb::new(Point::new(0.0, 0.0), Point::new(8.0, 4.0));
        let q = a.quadrants();
        assert_eq!(q[0], Aabb::new(Point::new(0.0, 0.0), Point::new(4.0, 2.0)));
        assert_eq!(q[3], Aabb::new(Point::new(4.0, 2.0), Point::new(8.0, 4.0)));
        let area: f64 = q.iter().map(|b| b.width() * b.height()).sum();
        assert!((area - 32.0).abs() < 1e-9);
    }
}
