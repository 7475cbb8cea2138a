// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The circular eraser footprint.

use crate::{Line, Point, Rect};

/// A circle.
///
/// The pixel eraser tests a circle centered on each pointer sample against
/// element boundaries.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    /// The center.
    pub center: Point,
    /// The radius.
    pub radius: f64,
}

impl Circle {
    /// A new circle from center and radius.
    #[inline]
    pub fn new(center: impl Into<Point>, radius: f64) -> Circle {
        Circle {
            center: center.into(),
            radius,
        }
    }

    /// Whether `point` lies inside the circle, boundary included.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Whether any part of `line` lies inside the circle, boundary included.
    #[inline]
    pub fn touches(&self, line: Line) -> bool {
        line.nearest(self.center).distance_sq <= self.radius * self.radius
    }

    /// The smallest rectangle enclosing the circle.
    #[inline]
    pub fn bounding_box(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }
}
