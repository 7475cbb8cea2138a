// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture memoization of element geometry.

use std::collections::HashMap;

use crate::{Circle, Element, ElementId, GeometricShape, Line, Rect};

#[derive(Clone, Debug)]
struct Outline {
    shape: GeometricShape,
    bounds: Rect,
}

/// Memoized outlines and boundary segments, keyed by element id.
///
/// Entries are computed on first access and never invalidated, so a cache
/// must not outlive the gesture it was built for. Elements without usable
/// geometry are remembered as such and never hit.
#[derive(Clone, Debug, Default)]
pub struct GeometryCache {
    outlines: HashMap<ElementId, Option<Outline>>,
    segments: HashMap<ElementId, Option<Vec<Line>>>,
}

impl GeometryCache {
    /// An empty cache.
    pub fn new() -> GeometryCache {
        GeometryCache::default()
    }

    /// The element's outline in canvas space.
    pub fn shape_of(&mut self, element: &Element) -> Option<&GeometricShape> {
        self.outline(element).map(|o| &o.shape)
    }

    /// The element's bounding box in canvas space.
    pub fn bounds_of(&mut self, element: &Element) -> Option<Rect> {
        self.outline(element).map(|o| o.bounds)
    }

    /// The element's boundary as line segments in canvas space.
    pub fn segments_of(&mut self, element: &Element) -> Option<&[Line]> {
        if !self.segments.contains_key(&element.id) {
            let segments = self.outline(element).map(|o| o.shape.segments());
            self.segments.insert(element.id.clone(), segments);
        }
        self.segments.get(&element.id)?.as_deref()
    }

    /// Whether the trail segment `path` hits the element.
    ///
    /// It does if its end point lies inside an element that is hit from the
    /// inside, or if it passes within `tolerance` of the element's boundary.
    pub fn hits_segment(&mut self, element: &Element, path: Line, tolerance: f64) -> bool {
        let Some(bounds) = self.bounds_of(element) else {
            return false;
        };
        if !bounds
            .inflate(tolerance.max(0.0))
            .overlaps(path.bounding_box())
        {
            return false;
        }
        if element.should_test_inside()
            && self
                .shape_of(element)
                .is_some_and(|shape| shape.contains(path.p1))
        {
            return true;
        }
        self.segments_of(element).is_some_and(|segments| {
            segments
                .iter()
                .any(|s| path.intersection(*s, tolerance).is_some())
        })
    }

    /// Whether the eraser footprint touches the element.
    ///
    /// It does if its center lies inside an element that is hit from the
    /// inside, or if any boundary segment passes through the circle.
    pub fn hits_footprint(&mut self, element: &Element, footprint: Circle) -> bool {
        let Some(bounds) = self.bounds_of(element) else {
            return false;
        };
        if !bounds.overlaps(footprint.bounding_box()) {
            return false;
        }
        if element.should_test_inside()
            && self
                .shape_of(element)
                .is_some_and(|shape| shape.contains(footprint.center))
        {
            return true;
        }
        self.segments_of(element)
            .is_some_and(|segments| segments.iter().any(|s| footprint.touches(*s)))
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.outlines.clear();
        self.segments.clear();
    }

    /// Number of elements with a memoized outline.
    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    /// Whether nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    fn outline(&mut self, element: &Element) -> Option<&Outline> {
        self.outlines
            .entry(element.id.clone())
            .or_insert_with(|| {
                let outline = element.outline();
                if outline.is_none() {
                    tracing::debug!(element = %element.id, "element has no usable geometry");
                }
                outline.map(|shape| Outline {
                    bounds: shape.bounding_box(),
                    shape,
                })
            })
            .as_ref()
    }
}
