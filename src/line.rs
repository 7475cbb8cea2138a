// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line segments.

use crate::{Point, Rect};

/// A single line segment.
///
/// Both trail segments and element boundaries are represented as `Line`s.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

/// The result of [`Line::nearest`].
#[derive(Debug, Clone, Copy)]
pub struct Nearest {
    /// The square of the distance from the nearest position on the segment
    /// to the given point.
    pub distance_sq: f64,
    /// The position on the segment, as a parameter in `0..=1`.
    pub t: f64,
}

impl Line {
    /// Create a new line.
    #[inline(always)]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// The point at parameter `t`, where `t = 0` is `p0` and `t = 1` is `p1`.
    #[inline]
    pub fn eval(self, t: f64) -> Point {
        self.p0 + (self.p1 - self.p0) * t
    }

    /// The nearest position on the segment to `p`.
    #[inline]
    pub fn nearest(self, p: Point) -> Nearest {
        let d = self.p1 - self.p0;
        let v = p - self.p0;

        // This is infinite or NaN when the segment has zero length; the
        // `max`/`min` chain below maps both of those onto the segment.
        let t = d.dot(v) / d.hypot2();
        let t = t.max(0.).min(1.);

        let distance_sq = (v - d * t).hypot2();
        Nearest { distance_sq, t }
    }

    /// Computes the point where two lines, if extended to infinity, would cross.
    ///
    /// Returns `None` for parallel or zero-length lines.
    pub fn crossing_point(self, other: Line) -> Option<Point> {
        let ab = self.p1 - self.p0;
        let cd = other.p1 - other.p0;
        let pcd = ab.cross(cd);
        if pcd == 0.0 {
            return None;
        }
        let h = ab.cross(self.p0 - other.p0) / pcd;
        Some(other.p0 + cd * h)
    }

    /// Finds a point shared by both segments, allowing for `tolerance`.
    ///
    /// When the lines cross, the crossing point is returned if it lies within
    /// `tolerance` of both segments. Otherwise (parallel, collinear or
    /// zero-length segments, or crossings past the ends) the first endpoint
    /// lying within `tolerance` of the other segment is returned.
    ///
    /// The test is symmetric: `a.intersection(b, tol).is_some()` equals
    /// `b.intersection(a, tol).is_some()`, and neither depends on the
    /// direction of either segment.
    pub fn intersection(self, other: Line, tolerance: f64) -> Option<Point> {
        let tolerance_sq = tolerance.max(0.0).powi(2);
        if let Some(p) = self.crossing_point(other) {
            if self.nearest(p).distance_sq <= tolerance_sq
                && other.nearest(p).distance_sq <= tolerance_sq
            {
                return Some(p);
            }
        }
        [
            (other.p0, self),
            (other.p1, self),
            (self.p0, other),
            (self.p1, other),
        ]
        .into_iter()
        .find(|(p, line)| line.nearest(*p).distance_sq <= tolerance_sq)
        .map(|(p, _)| p)
    }

    /// The smallest rectangle enclosing the segment.
    #[inline]
    pub fn bounding_box(self) -> Rect {
        Rect::from_points(self.p0, self.p1)
    }
}

impl From<(Point, Point)> for Line {
    #[inline(always)]
    fn from((from, to): (Point, Point)) -> Self {
        Line::new(from, to)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Line, Point};

    fn assert_approx_eq(x: f64, y: f64) {
        assert!((x - y).abs() < 1e-9, "{x} != {y}");
    }

    #[test]
    fn nearest_clamps_to_segment() {
        let l = Line::new((0.0, 0.0), (10.0, 0.0));
        let n = l.nearest(Point::new(5.0, 3.0));
        assert_approx_eq(n.t, 0.5);
        assert_approx_eq(n.distance_sq, 9.0);

        let n = l.nearest(Point::new(-4.0, 3.0));
        assert_approx_eq(n.t, 0.0);
        assert_approx_eq(n.distance_sq, 25.0);
    }

    #[test]
    fn nearest_on_zero_length_segment() {
        let l = Line::new((2.0, 2.0), (2.0, 2.0));
        let n = l.nearest(Point::new(5.0, 6.0));
        assert_approx_eq(n.t, 0.0);
        assert_approx_eq(n.distance_sq, 25.0);
    }

    #[test]
    fn crossing() {
        let l1 = Line::new((0.0, 0.0), (10.0, 10.0));
        let l2 = Line::new((0.0, 10.0), (10.0, 0.0));
        let p = l1.intersection(l2, 0.0).unwrap();
        assert_approx_eq(p.x, 5.0);
        assert_approx_eq(p.y, 5.0);
    }

    #[test]
    fn crossing_past_the_end_needs_tolerance() {
        let l1 = Line::new((0.0, 0.0), (10.0, 0.0));
        let l2 = Line::new((11.0, -5.0), (11.0, 5.0));
        assert!(l1.intersection(l2, 0.5).is_none());
        assert!(l1.intersection(l2, 1.0).is_some());
        assert!(l2.intersection(l1, 1.0).is_some());
    }

    #[test]
    fn parallel_segments() {
        let l1 = Line::new((0.0, 0.0), (10.0, 0.0));
        let near = Line::new((2.0, 1.0), (8.0, 1.0));
        let far = Line::new((2.0, 3.0), (8.0, 3.0));
        assert!(l1.intersection(near, 2.0).is_some());
        assert!(l1.intersection(far, 2.0).is_none());
        assert!(l1.intersection(Line::new(l1.p1, l1.p0), 0.0).is_some());
    }

    #[test]
    fn degenerate_segment_acts_as_point() {
        let l = Line::new((0.0, 0.0), (10.0, 0.0));
        let dot = Line::new((5.0, 1.5), (5.0, 1.5));
        assert!(l.intersection(dot, 2.0).is_some());
        assert!(dot.intersection(l, 2.0).is_some());
        assert!(l.intersection(dot, 1.0).is_none());
    }
}
