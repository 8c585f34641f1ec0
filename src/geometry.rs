//! Line and segment intersection in the plane
//!
//! Lines are handled in slope/intercept form (`y = m * x + b`). Vertical
//! lines have no slope and no intercept, so they get their own branch
//! everywhere instead of a sentinel number. Parallel and coincident lines
//! are ordinary outcomes, not errors.

use serde::{Deserialize, Serialize};

/// Run (`|dx|`) at or below which a line is treated as vertical
pub const VERTICAL_EPSILON: f64 = 1e-5;

/// Tolerance on slopes and intercepts when testing for parallel or
/// coincident lines
pub const PARALLEL_EPSILON: f64 = 1e-5;

/// Margin added on every side of a segment's bounding box when testing
/// whether an intersection lies on the segment
pub const BOX_TOLERANCE: f64 = 0.1;

/// A point in room coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// A finite segment between two points. Used for walls and sensor rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Intersection of this segment with `other`, see [`segment_intersect_with`]
    pub fn intersect(&self, other: &Segment, check: BoundsCheck) -> Option<Point> {
        segment_intersect_with(self.start, self.end, other.start, other.end, check)
    }
}

/// Slope of a line. Vertical lines are a separate variant so they can never
/// be mistaken for a zero slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slope {
    Finite(f64),
    Vertical,
}

impl Slope {
    /// Vertical only matches vertical; finite slopes match within
    /// [`PARALLEL_EPSILON`].
    pub fn is_parallel_to(self, other: Slope) -> bool {
        match (self, other) {
            (Slope::Vertical, Slope::Vertical) => true,
            (Slope::Finite(a), Slope::Finite(b)) => (a - b).abs() <= PARALLEL_EPSILON,
            _ => false,
        }
    }
}

/// Result of intersecting two infinite lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// Parallel, distinct lines
    Disjoint,
    /// Lines cross at exactly one point
    Point(Point),
    /// Same line: the four input endpoints, in argument order. The caller
    /// picks the ones lying on both finite segments.
    Collinear([Point; 4]),
}

impl Intersection {
    /// Candidate points in the order they should be tested
    pub fn candidates(&self) -> &[Point] {
        match self {
            Intersection::Disjoint => &[],
            Intersection::Point(p) => std::slice::from_ref(p),
            Intersection::Collinear(points) => points,
        }
    }
}

/// How a candidate point is checked against the second segment's box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsCheck {
    /// Both segments use min/max of their endpoints
    #[default]
    Symmetric,
    /// The second segment's box is taken from its raw endpoint order
    /// (start as lower bound, end as upper). Only matches when the wall is
    /// given low-to-high; kept for parity with older result files.
    Legacy,
}

/// Slope of the line through `p1` and `p2`
pub fn slope(p1: Point, p2: Point) -> Slope {
    let run = p1.x - p2.x;
    if run.abs() > VERTICAL_EPSILON {
        Slope::Finite((p1.y - p2.y) / run)
    } else {
        Slope::Vertical
    }
}

/// Y value where the line through `p` with slope `m` crosses `x = 0`
pub fn y_intercept(p: Point, m: f64) -> f64 {
    p.y - m * p.x
}

/// Intersect the infinite lines through (`p1`, `p2`) and (`p3`, `p4`)
pub fn infinite_line_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> Intersection {
    let m1 = slope(p1, p2);
    let m2 = slope(p3, p4);

    if m1.is_parallel_to(m2) {
        let coincident = match (m1, m2) {
            (Slope::Finite(m1), Slope::Finite(m2)) => {
                (y_intercept(p1, m1) - y_intercept(p3, m2)).abs() <= PARALLEL_EPSILON
            }
            // Both vertical: same line iff same x
            _ => (p1.x - p3.x).abs() <= VERTICAL_EPSILON,
        };

        return if coincident {
            Intersection::Collinear([p1, p2, p3, p4])
        } else {
            Intersection::Disjoint
        };
    }

    let point = match (m1, m2) {
        (Slope::Finite(m1), Slope::Finite(m2)) => {
            let b1 = y_intercept(p1, m1);
            let b2 = y_intercept(p3, m2);
            let x = (b2 - b1) / (m1 - m2);
            Point::new(x, m1 * x + b1)
        }
        (Slope::Vertical, Slope::Finite(m2)) => {
            let x = p1.x;
            Point::new(x, m2 * x + y_intercept(p3, m2))
        }
        (Slope::Finite(m1), Slope::Vertical) => {
            let x = p3.x;
            Point::new(x, m1 * x + y_intercept(p1, m1))
        }
        // Two vertical lines are parallel and were handled above
        (Slope::Vertical, Slope::Vertical) => return Intersection::Disjoint,
    };

    Intersection::Point(point)
}

/// Intersect segment (`p1`, `p2`) with segment (`p3`, `p4`) using the
/// symmetric bounding-box check
pub fn segment_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    segment_intersect_with(p1, p2, p3, p4, BoundsCheck::Symmetric)
}

/// Intersect two finite segments.
///
/// Returns the first candidate from [`infinite_line_intersect`] that lies in
/// both segments' bounding boxes, each widened by [`BOX_TOLERANCE`].
pub fn segment_intersect_with(
    p1: Point,
    p2: Point,
    p3: Point,
    p4: Point,
    check: BoundsCheck,
) -> Option<Point> {
    let lines = infinite_line_intersect(p1, p2, p3, p4);

    lines.candidates().iter().copied().find(|p| {
        let on_second = match check {
            BoundsCheck::Symmetric => in_span(p.x, p3.x, p4.x) && in_span(p.y, p3.y, p4.y),
            BoundsCheck::Legacy => in_raw_span(p.x, p3.x, p4.x) && in_raw_span(p.y, p3.y, p4.y),
        };
        on_second && in_span(p.x, p1.x, p2.x) && in_span(p.y, p1.y, p2.y)
    })
}

fn in_span(v: f64, a: f64, b: f64) -> bool {
    in_raw_span(v, a.min(b), a.max(b))
}

fn in_raw_span(v: f64, low: f64, high: f64) -> bool {
    v >= low - BOX_TOLERANCE && v <= high + BOX_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_slope() {
        assert_eq!(slope(p(0.0, 0.0), p(2.0, 4.0)), Slope::Finite(2.0));
        assert_eq!(slope(p(3.0, 0.0), p(3.0, 10.0)), Slope::Vertical);
        // Within the vertical tolerance
        assert_eq!(slope(p(3.0, 0.0), p(3.000001, 10.0)), Slope::Vertical);
        // Zero-length segment takes the vertical path
        assert_eq!(slope(p(1.0, 1.0), p(1.0, 1.0)), Slope::Vertical);
    }

    #[test]
    fn test_y_intercept() {
        assert_eq!(y_intercept(p(2.0, 5.0), 2.0), 1.0);
        assert_eq!(y_intercept(p(0.0, -3.0), 7.0), -3.0);
    }

    #[test]
    fn test_parallel_matching() {
        assert!(Slope::Vertical.is_parallel_to(Slope::Vertical));
        assert!(Slope::Finite(1.0).is_parallel_to(Slope::Finite(1.0 + 1e-7)));
        assert!(!Slope::Finite(1.0).is_parallel_to(Slope::Finite(1.1)));
        assert!(!Slope::Vertical.is_parallel_to(Slope::Finite(0.0)));
        assert!(!Slope::Finite(0.0).is_parallel_to(Slope::Vertical));
    }

    #[test]
    fn test_vertical_lines() {
        let same = infinite_line_intersect(p(2.0, 0.0), p(2.0, 1.0), p(2.0, 5.0), p(2.0, 9.0));
        assert!(matches!(same, Intersection::Collinear(_)));

        let apart = infinite_line_intersect(p(2.0, 0.0), p(2.0, 1.0), p(4.0, 5.0), p(4.0, 9.0));
        assert_eq!(apart, Intersection::Disjoint);
    }

    #[test]
    fn test_horizontal_meets_vertical_second() {
        let hit = infinite_line_intersect(p(0.0, 5.0), p(10.0, 5.0), p(5.0, 0.0), p(5.0, 10.0));
        assert_eq!(hit, Intersection::Point(p(5.0, 5.0)));
    }

    #[test]
    fn test_collinear_picks_first_shared_endpoint() {
        let hit = segment_intersect(p(0.0, 0.0), p(2.0, 2.0), p(1.0, 1.0), p(3.0, 3.0));
        assert_eq!(hit, Some(p(2.0, 2.0)));

        // Swapping arguments changes which shared point comes first
        let swapped = segment_intersect(p(1.0, 1.0), p(3.0, 3.0), p(0.0, 0.0), p(2.0, 2.0));
        assert_eq!(swapped, Some(p(1.0, 1.0)));
    }

    #[test]
    fn test_tolerance_band() {
        // Vertical wall ends at y = 10, horizontal ray at y = 10.05 is within the band
        let hit = segment_intersect(p(0.0, 10.05), p(10.0, 10.05), p(5.0, 0.0), p(5.0, 10.0));
        assert!(hit.is_some());

        let miss = segment_intersect(p(0.0, 10.2), p(10.0, 10.2), p(5.0, 0.0), p(5.0, 10.0));
        assert_eq!(miss, None);
    }

    #[test]
    fn test_tolerance_band_edge_is_inclusive() {
        for check in [BoundsCheck::Symmetric, BoundsCheck::Legacy] {
            let hit =
                segment_intersect_with(p(0.0, 10.1), p(10.0, 10.1), p(5.0, 0.0), p(5.0, 10.0), check);
            assert_eq!(hit, Some(p(5.0, 10.1)), "{:?}", check);
        }
    }

    #[test]
    fn test_legacy_check_needs_ordered_wall() {
        let ray_start = p(50.0, 50.0);
        let ray_end = p(150.0, 150.0);
        let wall = (p(0.0, 100.0), p(200.0, 100.0));
        let reversed = (wall.1, wall.0);

        let ordered = segment_intersect_with(ray_start, ray_end, wall.0, wall.1, BoundsCheck::Legacy);
        let backwards =
            segment_intersect_with(ray_start, ray_end, reversed.0, reversed.1, BoundsCheck::Legacy);
        let symmetric =
            segment_intersect_with(ray_start, ray_end, reversed.0, reversed.1, BoundsCheck::Symmetric);

        assert_eq!(ordered, Some(p(100.0, 100.0)));
        assert_eq!(backwards, None);
        assert_eq!(symmetric, Some(p(100.0, 100.0)));
    }

    #[test]
    fn test_segment_method() {
        let a = Segment::new(p(3.0, 0.0), p(3.0, 10.0));
        let b = Segment::new(p(0.0, 5.0), p(10.0, 5.0));
        assert_eq!(a.intersect(&b, BoundsCheck::Symmetric), Some(p(3.0, 5.0)));
        assert_eq!(b.length(), 10.0);
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&p(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p(1.5, -2.0));
    }
}
