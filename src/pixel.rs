// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Erasing parts of freehand and linear elements.

use std::collections::BTreeSet;

use crate::scene::mark_with_dependencies;
use crate::{
    Circle, Element, ElementId, ElementKind, GeometryCache, Line, Point, Scene, TrailSampling,
    Vec2,
};

/// A change to one element produced by a pixel-mode gesture.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementMutation {
    /// Soft-delete the element: too few of its points survived.
    Delete,
    /// Keep the element with only the surviving points.
    ReplacePoints {
        /// The element's new origin.
        ///
        /// Differs from the current origin only for rotated elements, so that
        /// the surviving points stay where they were on the canvas.
        origin: Point,
        /// Surviving points, relative to `origin`, in order.
        points: Vec<Vec2>,
        /// Pressures of the surviving points; empty if the element had none.
        pressures: Vec<f32>,
    },
}

/// An [`ElementMutation`] together with the element it applies to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelMutation {
    /// The element to change.
    pub element_id: ElementId,
    /// What to do with it.
    pub mutation: ElementMutation,
}

/// A pixel-mode erasing gesture.
///
/// Samples are hit-tested with a circular footprint and recorded as the
/// trail. When the gesture is committed, [`finalize`](Self::finalize) removes
/// every point of a touched freehand or linear element that lies under the
/// trail.
#[derive(Clone, Debug, Default)]
pub struct PixelSession {
    active: bool,
    radius: f64,
    sampling: TrailSampling,
    trail: Vec<Point>,
    marked: BTreeSet<ElementId>,
    cache: GeometryCache,
}

impl PixelSession {
    /// A new, idle session.
    pub fn new() -> PixelSession {
        PixelSession::default()
    }

    /// Start a gesture at `point` with an eraser of the given `radius`,
    /// discarding any previous state.
    ///
    /// The start point becomes part of the trail but is not hit-tested.
    pub fn start_path(&mut self, point: Point, radius: f64, sampling: TrailSampling) {
        self.end_path();
        self.active = true;
        self.radius = radius;
        self.sampling = sampling;
        if point.is_finite() {
            self.trail.push(point);
        }
        tracing::debug!(x = point.x, y = point.y, radius, ?sampling, "pixel erase started");
    }

    /// Record `point` and return the elements touched so far.
    ///
    /// Outside a gesture this does nothing and returns an empty list.
    pub fn add_point(&mut self, point: Point, scene: &impl Scene) -> Vec<ElementId> {
        if !self.active {
            return Vec::new();
        }
        if !point.is_finite() {
            tracing::trace!(x = point.x, y = point.y, "ignoring non-finite sample");
            return self.marked();
        }
        self.trail.push(point);
        let footprint = Circle::new(point, self.radius);
        for element in scene.visible_elements() {
            if element.locked || self.marked.contains(&element.id) {
                continue;
            }
            if self.cache.hits_footprint(element, footprint) {
                tracing::trace!(element = %element.id, "touched");
                mark_with_dependencies(&mut self.marked, &element.id, scene);
            }
        }
        self.marked()
    }

    /// Compute the changes to apply for the current gesture.
    ///
    /// Freehand and linear elements lose every point within the eraser
    /// radius of the trail; if fewer than two points remain they are deleted.
    /// Elements that lose no points are left out. Other kinds of elements are
    /// never changed by pixel erasing.
    pub fn finalize(&self, scene: &impl Scene) -> Vec<PixelMutation> {
        if !self.active || self.trail.is_empty() {
            return Vec::new();
        }
        let mut mutations = Vec::new();
        for id in &self.marked {
            let Some(element) = scene.element(id) else {
                continue;
            };
            if element.is_deleted || element.locked {
                continue;
            }
            match element.kind {
                ElementKind::FreeDraw | ElementKind::Linear(_) => {
                    if let Some(mutation) = self.trim(element) {
                        tracing::trace!(element = %id, ?mutation, "trimmed");
                        mutations.push(PixelMutation {
                            element_id: id.clone(),
                            mutation,
                        });
                    }
                }
                kind => {
                    tracing::debug!(element = %id, ?kind, "pixel erasing does not support this kind");
                }
            }
        }
        mutations
    }

    /// End the gesture and forget all state.
    pub fn end_path(&mut self) {
        if self.active {
            tracing::debug!(
                marked = self.marked.len(),
                samples = self.trail.len(),
                "pixel erase ended"
            );
        }
        self.active = false;
        self.trail.clear();
        self.marked.clear();
        self.cache.clear();
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The elements touched so far, in id order.
    pub fn marked(&self) -> Vec<ElementId> {
        self.marked.iter().cloned().collect()
    }

    /// The recorded trail.
    pub fn trail(&self) -> &[Point] {
        &self.trail
    }

    fn trim(&self, element: &Element) -> Option<ElementMutation> {
        let count = element.points.len();
        if count < 2 {
            return None;
        }
        let with_pressures = element.pressures.len() == count;
        let mut points = Vec::with_capacity(count);
        let mut pressures = Vec::with_capacity(if with_pressures { count } else { 0 });
        for (i, &local) in element.points.iter().enumerate() {
            if self.is_erased(element.to_global(local)) {
                continue;
            }
            points.push(local);
            if with_pressures {
                pressures.push(element.pressures[i]);
            }
        }
        match points.len() {
            n if n == count => None,
            0 | 1 => Some(ElementMutation::Delete),
            _ => Some(ElementMutation::ReplacePoints {
                origin: element.origin_for_points(&points),
                points,
                pressures,
            }),
        }
    }

    fn is_erased(&self, p: Point) -> bool {
        let footprint = Circle::new(p, self.radius);
        match (self.sampling, self.trail.as_slice()) {
            (TrailSampling::Segments, trail @ [_, _, ..]) => {
                trail.windows(2).any(|w| footprint.touches(Line::new(w[0], w[1])))
            }
            (_, trail) => trail.iter().any(|&t| footprint.contains(t)),
        }
    }
}
