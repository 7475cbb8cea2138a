// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outline shapes of canvas elements.

use core::f64::consts::TAU;

use smallvec::SmallVec;

use crate::{Line, Point, Rect, Vec2};

/// Number of line segments used to approximate an ellipse boundary.
pub const ELLIPSE_SEGMENTS: usize = 32;

/// The outline of an element in canvas space.
///
/// This is what "point in shape" is tested against for fillable elements.
/// The boundary, as a list of [`Line`]s, is what trail segments and the
/// eraser footprint are tested against for everything else.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometricShape {
    /// A closed polygon, such as a (possibly rotated) rectangle or diamond.
    Polygon(SmallVec<[Point; 4]>),
    /// A chain of points, such as a freehand stroke or a polyline.
    Polyline {
        /// The vertices in drawing order.
        points: Vec<Point>,
        /// Whether the last point connects back to the first, making the
        /// polyline enclose an area.
        closed: bool,
    },
    /// An ellipse.
    Ellipse(Ellipse),
}

/// A rotated ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipse {
    /// The center.
    pub center: Point,
    /// The radii along the ellipse's own x and y axes.
    pub radii: Vec2,
    /// Rotation of the ellipse's axes, in radians.
    pub rotation: f64,
}

impl Ellipse {
    /// A new ellipse.
    #[inline]
    pub fn new(center: impl Into<Point>, radii: impl Into<Vec2>, rotation: f64) -> Ellipse {
        Ellipse {
            center: center.into(),
            radii: radii.into(),
            rotation,
        }
    }

    /// Whether `pt` lies inside the ellipse.
    pub fn contains(&self, pt: Point) -> bool {
        let Vec2 { x: rx, y: ry } = self.radii;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        // Map the point into the ellipse's own frame and test against the
        // unit circle.
        let local = (pt - self.center).rotate(-self.rotation);
        let u = local.x / rx;
        let v = local.y / ry;
        u * u + v * v <= 1.0
    }

    /// The point on the boundary at angle `theta` of the ellipse's own frame.
    #[inline]
    pub fn eval(&self, theta: f64) -> Point {
        let (sin, cos) = theta.sin_cos();
        self.center + Vec2::new(self.radii.x * cos, self.radii.y * sin).rotate(self.rotation)
    }

    /// A tight bounding box of the rotated ellipse.
    pub fn bounding_box(&self) -> Rect {
        let (sin, cos) = self.rotation.sin_cos();
        let Vec2 { x: rx, y: ry } = self.radii;
        let half_w = (rx * cos).hypot(ry * sin);
        let half_h = (rx * sin).hypot(ry * cos);
        Rect::new(
            self.center.x - half_w,
            self.center.y - half_h,
            self.center.x + half_w,
            self.center.y + half_h,
        )
    }

    /// The boundary, flattened into [`ELLIPSE_SEGMENTS`] line segments.
    pub fn flatten(&self) -> Vec<Line> {
        let step = TAU / ELLIPSE_SEGMENTS as f64;
        (0..ELLIPSE_SEGMENTS)
            .map(|i| {
                Line::new(
                    self.eval(step * i as f64),
                    self.eval(step * (i + 1) as f64),
                )
            })
            .collect()
    }
}

impl GeometricShape {
    /// A closed polygon through `points`.
    pub fn polygon(points: impl IntoIterator<Item = Point>) -> GeometricShape {
        GeometricShape::Polygon(points.into_iter().collect())
    }

    /// Whether `pt` lies inside the shape.
    ///
    /// Polygons and closed polylines use the non-zero winding rule. Open
    /// polylines enclose nothing.
    pub fn contains(&self, pt: Point) -> bool {
        match self {
            GeometricShape::Polygon(points) => winding(points, pt) != 0,
            GeometricShape::Polyline {
                points,
                closed: true,
            } => winding(points, pt) != 0,
            GeometricShape::Polyline { closed: false, .. } => false,
            GeometricShape::Ellipse(ellipse) => ellipse.contains(pt),
        }
    }

    /// The boundary of the shape as line segments.
    ///
    /// A polyline with a single point yields one zero-length segment, so it
    /// can still be hit.
    pub fn segments(&self) -> Vec<Line> {
        match self {
            GeometricShape::Polygon(points) => closed_segments(points),
            GeometricShape::Polyline { points, closed } => {
                if let [only] = points.as_slice() {
                    return vec![Line::new(*only, *only)];
                }
                if *closed {
                    closed_segments(points)
                } else {
                    points.windows(2).map(|w| Line::new(w[0], w[1])).collect()
                }
            }
            GeometricShape::Ellipse(ellipse) => ellipse.flatten(),
        }
    }

    /// The smallest rectangle that encloses the shape.
    pub fn bounding_box(&self) -> Rect {
        match self {
            GeometricShape::Polygon(points) => {
                Rect::enclosing(points.iter().copied()).unwrap_or_default()
            }
            GeometricShape::Polyline { points, .. } => {
                Rect::enclosing(points.iter().copied()).unwrap_or_default()
            }
            GeometricShape::Ellipse(ellipse) => ellipse.bounding_box(),
        }
    }
}

fn closed_segments(points: &[Point]) -> Vec<Line> {
    let n = points.len();
    if n < 2 {
        return points.iter().map(|p| Line::new(*p, *p)).collect();
    }
    (0..n)
        .map(|i| Line::new(points[i], points[(i + 1) % n]))
        .collect()
}

/// Winding number of `p` with respect to the closed polygon through `points`.
fn winding(points: &[Point], p: Point) -> i32 {
    let n = points.len();
    if n < 3 {
        return 0;
    }
    (0..n)
        .map(|i| edge_winding(points[i], points[(i + 1) % n], p))
        .sum()
}

fn edge_winding(start: Point, end: Point, p: Point) -> i32 {
    let sign = if end.y > start.y {
        if p.y < start.y || p.y >= end.y {
            return 0;
        }
        -1
    } else if end.y < start.y {
        if p.y < end.y || p.y >= start.y {
            return 0;
        }
        1
    } else {
        return 0;
    };
    if p.x < start.x.min(end.x) {
        return 0;
    }
    if p.x >= start.x.max(end.x) {
        return sign;
    }
    // line equation ax + by = c
    let a = end.y - start.y;
    let b = start.x - end.x;
    let c = a * start.x + b * start.y;
    if (a * p.x + b * p.y - c) * (sign as f64) <= 0.0 {
        sign
    } else {
        0
    }
}
