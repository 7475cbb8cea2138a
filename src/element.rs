// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas elements, as seen by the eraser.

use core::fmt;

use smallvec::SmallVec;

use crate::{Ellipse, GeometricShape, Point, Rect, Vec2};

/// Freehand and linear elements whose end points are at most this far apart
/// are treated as closed loops.
pub const LOOP_THRESHOLD: f64 = 8.0;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(id: &str) -> Self {
                Self(id.into())
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Identity of an element in the scene.
    ElementId
}

string_id! {
    /// Identity of a group of elements.
    GroupId
}

/// The kind of a linear element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinearKind {
    /// A plain line or polyline.
    Line,
    /// An arrow. Arrows are never hit from the inside.
    Arrow,
}

/// The kind of a generic shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    /// An axis-aligned rectangle before rotation.
    Rectangle,
    /// A rhombus inscribed in the element's box.
    Diamond,
    /// An ellipse inscribed in the element's box.
    Ellipse,
}

/// What an element is. This decides how it is hit and whether pixel
/// erasing can trim it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    /// A freehand stroke, stored as a chain of points with pressures.
    FreeDraw,
    /// A line or arrow through a chain of points.
    Linear(LinearKind),
    /// A rectangle, diamond or ellipse filling the element's box.
    Shape(ShapeKind),
    /// A text block, either free-standing or bound to a container.
    Text,
    /// A frame grouping other elements visually.
    Frame,
    /// Anything else; hit-tested through its box.
    Other,
}

/// A drawn element.
///
/// Elements belong to the scene; the eraser only reads them and refers to
/// them by [`ElementId`]. Relations to other elements (`container_id`,
/// `bound_text_id`) are ids that have to be looked up in the scene.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    /// The element's identity.
    pub id: ElementId,
    /// What the element is.
    pub kind: ElementKind,
    /// Position of the element in canvas space.
    pub origin: Point,
    /// Width of the element's box.
    pub width: f64,
    /// Height of the element's box.
    pub height: f64,
    /// Rotation around the element's center, in radians.
    pub angle: f64,
    /// Points of freehand and linear elements, relative to `origin`.
    pub points: Vec<Vec2>,
    /// Per-point pressures of freehand elements; either empty or as long as
    /// `points`.
    pub pressures: Vec<f32>,
    /// Groups the element belongs to, innermost first.
    pub group_ids: SmallVec<[GroupId; 2]>,
    /// The container this element (a text) is bound to.
    pub container_id: Option<ElementId>,
    /// The text bound to this element.
    pub bound_text_id: Option<ElementId>,
    /// Whether the element has a visible fill.
    pub filled: bool,
    /// Locked elements are never erased.
    pub locked: bool,
    /// Soft-deletion flag.
    pub is_deleted: bool,
}

impl Element {
    /// A new element of `kind` with its box at `origin` and zero size.
    pub fn new(id: impl Into<ElementId>, kind: ElementKind, origin: impl Into<Point>) -> Element {
        Element {
            id: id.into(),
            kind,
            origin: origin.into(),
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            points: Vec::new(),
            pressures: Vec::new(),
            group_ids: SmallVec::new(),
            container_id: None,
            bound_text_id: None,
            filled: false,
            locked: false,
            is_deleted: false,
        }
    }

    /// A box-shaped element of `kind` covering `rect`.
    pub fn boxed(id: impl Into<ElementId>, kind: ElementKind, rect: Rect) -> Element {
        let rect = rect.abs();
        let mut element = Element::new(id, kind, (rect.x0, rect.y0));
        element.width = rect.width();
        element.height = rect.height();
        element
    }

    /// A rectangle covering `rect`.
    pub fn rectangle(id: impl Into<ElementId>, rect: Rect) -> Element {
        Element::boxed(id, ElementKind::Shape(ShapeKind::Rectangle), rect)
    }

    /// A text block covering `rect`.
    pub fn text(id: impl Into<ElementId>, rect: Rect) -> Element {
        Element::boxed(id, ElementKind::Text, rect)
    }

    /// A freehand stroke through `points`, relative to `origin`.
    pub fn free_draw(
        id: impl Into<ElementId>,
        origin: impl Into<Point>,
        points: impl IntoIterator<Item = Vec2>,
    ) -> Element {
        Element::new(id, ElementKind::FreeDraw, origin).with_points(points)
    }

    /// A line or arrow through `points`, relative to `origin`.
    pub fn linear(
        id: impl Into<ElementId>,
        kind: LinearKind,
        origin: impl Into<Point>,
        points: impl IntoIterator<Item = Vec2>,
    ) -> Element {
        Element::new(id, ElementKind::Linear(kind), origin).with_points(points)
    }

    /// Replace the points, resizing the element's box to fit them.
    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = Vec2>) -> Element {
        self.set_points(points.into_iter().collect(), Vec::new());
        self
    }

    /// Set per-point pressures.
    #[must_use]
    pub fn with_pressures(mut self, pressures: impl IntoIterator<Item = f32>) -> Element {
        self.pressures = pressures.into_iter().collect();
        self
    }

    /// Set the groups, innermost first.
    #[must_use]
    pub fn with_groups<G: Into<GroupId>>(mut self, groups: impl IntoIterator<Item = G>) -> Element {
        self.group_ids = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Bind this element (a text) to `container`.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<ElementId>) -> Element {
        self.container_id = Some(container.into());
        self
    }

    /// Bind `text` to this element.
    #[must_use]
    pub fn with_bound_text(mut self, text: impl Into<ElementId>) -> Element {
        self.bound_text_id = Some(text.into());
        self
    }

    /// Rotate the element around its center.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Element {
        self.angle = angle;
        self
    }

    /// Give the element a visible fill.
    #[must_use]
    pub fn filled(mut self) -> Element {
        self.filled = true;
        self
    }

    /// Lock the element.
    #[must_use]
    pub fn locked(mut self) -> Element {
        self.locked = true;
        self
    }

    /// Replace points and pressures, resizing the element's box to the
    /// extent of the new points.
    pub fn set_points(&mut self, points: Vec<Vec2>, pressures: Vec<f32>) {
        let extent = Rect::enclosing(points.iter().map(|v| v.to_point())).unwrap_or_default();
        self.width = extent.width();
        self.height = extent.height();
        self.points = points;
        self.pressures = pressures;
    }

    /// The origin that keeps `points` where they are on the canvas once they
    /// replace the element's current points.
    ///
    /// Rotated freehand and linear elements turn around the center of their
    /// points' extent, which moves when points are removed; the returned
    /// origin compensates for that shift.
    pub fn origin_for_points(&self, points: &[Vec2]) -> Point {
        if self.angle == 0.0 || !matches!(self.kind, ElementKind::FreeDraw | ElementKind::Linear(_)) {
            return self.origin;
        }
        let (Some(old), Some(new)) = (
            Rect::enclosing(self.points.iter().map(|v| v.to_point())),
            Rect::enclosing(points.iter().map(|v| v.to_point())),
        ) else {
            return self.origin;
        };
        let shift = old.center() - new.center();
        self.origin + shift - shift.rotate(self.angle)
    }

    /// The shallowest group: the outermost group containing the element.
    #[inline]
    pub fn shallowest_group(&self) -> Option<&GroupId> {
        self.group_ids.last()
    }

    /// Whether the element belongs to `group` at any depth.
    #[inline]
    pub fn in_group(&self, group: &GroupId) -> bool {
        self.group_ids.contains(group)
    }

    /// Elements that live and die with this one: its container and its
    /// bound text.
    pub fn dependencies(&self) -> impl Iterator<Item = &ElementId> {
        self.container_id.iter().chain(self.bound_text_id.iter())
    }

    /// The center of rotation in canvas space.
    pub fn center(&self) -> Point {
        match self.kind {
            ElementKind::FreeDraw | ElementKind::Linear(_) => {
                let extent = Rect::enclosing(self.points.iter().map(|v| v.to_point()))
                    .unwrap_or_default();
                self.origin + extent.center().to_vec2()
            }
            _ => self.origin + Vec2::new(0.5 * self.width, 0.5 * self.height),
        }
    }

    /// Map a point relative to the element's origin into canvas space.
    ///
    /// For unrotated elements this is just `origin + local`.
    #[inline]
    pub fn to_global(&self, local: Vec2) -> Point {
        let p = self.origin + local;
        if self.angle == 0.0 {
            p
        } else {
            p.rotate_around(self.center(), self.angle)
        }
    }

    /// Whether the points of a freehand or linear element form a closed loop.
    pub fn is_loop(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 3 => {
                (*last - *first).hypot() <= LOOP_THRESHOLD
            }
            _ => false,
        }
    }

    /// Whether a point inside the element's outline counts as a hit.
    ///
    /// Outlines of elements that are only drawn as strokes are hit on their
    /// boundary alone.
    pub fn should_test_inside(&self) -> bool {
        match self.kind {
            ElementKind::Text => true,
            ElementKind::Shape(_) => self.filled || self.bound_text_id.is_some(),
            ElementKind::FreeDraw | ElementKind::Linear(LinearKind::Line) => {
                self.filled && self.is_loop()
            }
            ElementKind::Linear(LinearKind::Arrow) | ElementKind::Frame => false,
            ElementKind::Other => self.filled,
        }
    }

    /// The outline of the element in canvas space.
    ///
    /// Returns `None` for malformed elements: non-finite geometry, or a
    /// freehand or linear element without points.
    pub fn outline(&self) -> Option<GeometricShape> {
        if !self.origin.is_finite() || !self.angle.is_finite() {
            return None;
        }
        let shape = match self.kind {
            ElementKind::FreeDraw | ElementKind::Linear(_) => {
                if self.points.is_empty() {
                    return None;
                }
                let center = self.center();
                let points: Vec<Point> = self
                    .points
                    .iter()
                    .map(|v| {
                        let p = self.origin + *v;
                        if self.angle == 0.0 {
                            p
                        } else {
                            p.rotate_around(center, self.angle)
                        }
                    })
                    .collect();
                GeometricShape::Polyline {
                    points,
                    closed: self.is_loop(),
                }
            }
            ElementKind::Shape(ShapeKind::Ellipse) => GeometricShape::Ellipse(Ellipse::new(
                self.center(),
                (0.5 * self.width.abs(), 0.5 * self.height.abs()),
                self.angle,
            )),
            ElementKind::Shape(ShapeKind::Diamond) => {
                let (w, h) = (self.width, self.height);
                self.box_polygon([(0.5 * w, 0.0), (w, 0.5 * h), (0.5 * w, h), (0.0, 0.5 * h)])
            }
            ElementKind::Shape(ShapeKind::Rectangle)
            | ElementKind::Text
            | ElementKind::Frame
            | ElementKind::Other => {
                let (w, h) = (self.width, self.height);
                self.box_polygon([(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)])
            }
        };
        let finite = match &shape {
            GeometricShape::Polygon(points) => points.iter().all(|p| p.is_finite()),
            GeometricShape::Polyline { points, .. } => points.iter().all(|p| p.is_finite()),
            GeometricShape::Ellipse(e) => e.center.is_finite() && e.radii.is_finite(),
        };
        finite.then_some(shape)
    }

    fn box_polygon(&self, corners: [(f64, f64); 4]) -> GeometricShape {
        GeometricShape::polygon(corners.map(|c| self.to_global(Vec2::from(c))))
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn shallowest_group_is_outermost() {
        let e = Element::rectangle("r", Rect::new(0.0, 0.0, 1.0, 1.0)).with_groups(["inner", "outer"]);
        assert_eq!(e.shallowest_group(), Some(&GroupId::from("outer")));
        assert!(e.in_group(&GroupId::from("inner")));
        assert!(Element::text("t", Rect::default()).shallowest_group().is_none());
    }

    #[test]
    fn free_draw_sizes_box_from_points() {
        let e = Element::free_draw("f", (10.0, 10.0), [Vec2::new(0.0, 0.0), Vec2::new(20.0, -5.0)]);
        assert_eq!(e.width, 20.0);
        assert_eq!(e.height, 5.0);
        assert_eq!(e.to_global(Vec2::new(20.0, -5.0)), Point::new(30.0, 5.0));
    }

    #[test]
    fn rotated_rectangle_outline() {
        let e = Element::rectangle("r", Rect::new(0.0, 0.0, 20.0, 10.0)).with_angle(FRAC_PI_2);
        let bb = e.outline().unwrap().bounding_box();
        assert!((bb.width() - 10.0).abs() < 1e-9);
        assert!((bb.height() - 20.0).abs() < 1e-9);
        assert!((bb.center().x - 10.0).abs() < 1e-9);
        assert!((bb.center().y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn diamond_outline_skips_corners() {
        let e = Element::boxed("d", ElementKind::Shape(ShapeKind::Diamond), Rect::new(0.0, 0.0, 10.0, 10.0));
        let outline = e.outline().unwrap();
        assert!(outline.contains(Point::new(5.0, 5.0)));
        assert!(!outline.contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn malformed_elements_have_no_outline() {
        assert!(Element::free_draw("f", (0.0, 0.0), []).outline().is_none());
        let mut nan = Element::rectangle("r", Rect::new(0.0, 0.0, 1.0, 1.0));
        nan.width = f64::NAN;
        assert!(nan.outline().is_none());
        let bad_point = Element::free_draw("g", (0.0, 0.0), [Vec2::new(f64::INFINITY, 0.0)]);
        assert!(bad_point.outline().is_none());
    }

    #[test]
    fn inside_testing_by_kind() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(Element::text("t", rect).should_test_inside());
        assert!(!Element::rectangle("r", rect).should_test_inside());
        assert!(Element::rectangle("r", rect).filled().should_test_inside());
        assert!(Element::rectangle("r", rect).with_bound_text("t").should_test_inside());
        assert!(!Element::boxed("f", ElementKind::Frame, rect).filled().should_test_inside());

        let loop_points = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 1.0)].map(Vec2::from);
        let stroke = Element::free_draw("s", (0.0, 0.0), loop_points);
        assert!(stroke.is_loop());
        assert!(!stroke.should_test_inside());
        assert!(stroke.clone().filled().should_test_inside());
        let arrow = Element::linear("a", LinearKind::Arrow, (0.0, 0.0), loop_points).filled();
        assert!(!arrow.should_test_inside());
    }

    #[test]
    fn origin_for_points_keeps_rotated_points_in_place() {
        let points = [(0.0, 0.0), (10.0, 0.0), (20.0, 5.0), (30.0, 0.0)].map(Vec2::from);
        let mut e = Element::free_draw("f", (3.0, 7.0), points).with_angle(FRAC_PI_2);
        let kept = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let before = kept.map(|v| e.to_global(v));
        e.origin = e.origin_for_points(&kept);
        e.set_points(kept.to_vec(), Vec::new());
        for (v, p) in kept.into_iter().zip(before) {
            assert!(e.to_global(v).distance(p) < 1e-9, "{v:?} moved from {p:?}");
        }

        let upright = Element::free_draw("g", (3.0, 7.0), kept);
        assert_eq!(upright.origin_for_points(&kept[..1]), Point::new(3.0, 7.0));
    }

    #[test]
    fn dependencies() {
        let text = Element::text("t", Rect::default()).with_container("box");
        let deps: Vec<_> = text.dependencies().collect();
        assert_eq!(deps, vec![&ElementId::from("box")]);
    }
}
