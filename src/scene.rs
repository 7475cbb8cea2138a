// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read access to the elements on the canvas.

use std::collections::{BTreeSet, HashMap};

use crate::{
    Element, ElementId, ElementMutation, EraseOutcome, GroupId, PixelMutation, Rect,
};

/// The eraser's view of the canvas.
///
/// The eraser never mutates a scene. It reads elements through this trait
/// and reports what should change; see [`EraseOutcome`].
pub trait Scene {
    /// Every element in z-order, soft-deleted ones included.
    fn elements(&self) -> impl Iterator<Item = &Element>;

    /// The elements that can currently be hit, in z-order.
    ///
    /// These are never soft-deleted, but may be locked.
    fn visible_elements(&self) -> impl Iterator<Item = &Element>;

    /// Look up an element by id, including soft-deleted ones.
    fn element(&self, id: &ElementId) -> Option<&Element>;

    /// The non-deleted members of `group`, at any depth.
    fn group_members(&self, group: &GroupId) -> impl Iterator<Item = &Element> {
        self.elements()
            .filter(move |e| !e.is_deleted && e.in_group(group))
    }
}

/// Add `id` and everything it drags along (its container and bound text,
/// transitively) to `marked`.
///
/// Elements that are missing, soft-deleted or locked are left out, and so
/// are their own dependencies.
pub(crate) fn mark_with_dependencies(
    marked: &mut BTreeSet<ElementId>,
    id: &ElementId,
    scene: &impl Scene,
) {
    let mut pending = vec![id.clone()];
    while let Some(id) = pending.pop() {
        let Some(element) = scene.element(&id) else {
            continue;
        };
        if element.is_deleted || element.locked || marked.contains(&id) {
            continue;
        }
        pending.extend(element.dependencies().cloned());
        marked.insert(id);
    }
}

#[derive(Clone, Debug)]
struct Slot {
    element: Element,
    bounds: Option<Rect>,
}

impl Slot {
    fn new(element: Element) -> Slot {
        let bounds = element.outline().map(|o| o.bounding_box());
        Slot { element, bounds }
    }
}

/// A simple in-memory scene.
///
/// Elements are kept in insertion order, which is also their z-order. If a
/// viewport is set, only elements whose bounds overlap it are visible.
#[derive(Clone, Debug, Default)]
pub struct Elements {
    slots: Vec<Slot>,
    index: HashMap<ElementId, usize>,
    viewport: Option<Rect>,
}

impl Elements {
    /// An empty scene without a viewport.
    pub fn new() -> Elements {
        Elements::default()
    }

    /// Restrict visibility to elements overlapping `viewport`.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Rect) -> Elements {
        self.viewport = Some(viewport);
        self
    }

    /// Set or clear the viewport.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    /// The current viewport, if any.
    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Add an element on top, or replace the element with the same id in
    /// place.
    pub fn push(&mut self, element: Element) {
        match self.index.get(&element.id) {
            Some(&i) => self.slots[i] = Slot::new(element),
            None => {
                self.index.insert(element.id.clone(), self.slots.len());
                self.slots.push(Slot::new(element));
            }
        }
    }

    /// Look up an element.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.slots[i].element)
    }

    /// Iterate over all elements in z-order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.slots.iter().map(|s| &s.element)
    }

    /// Number of elements, soft-deleted ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the scene holds no elements at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Apply the result of a committed gesture.
    ///
    /// Ids that are not in the scene are skipped.
    pub fn apply(&mut self, outcome: &EraseOutcome) {
        match outcome {
            EraseOutcome::Stroke(result) => {
                for id in &result.marked_for_deletion {
                    self.update(id, |e| e.is_deleted = true);
                }
            }
            EraseOutcome::Pixel(mutations) => {
                for PixelMutation {
                    element_id,
                    mutation,
                } in mutations
                {
                    match mutation {
                        ElementMutation::Delete => self.update(element_id, |e| e.is_deleted = true),
                        ElementMutation::ReplacePoints {
                            origin,
                            points,
                            pressures,
                        } => {
                            self.update(element_id, |e| {
                                e.origin = *origin;
                                e.set_points(points.clone(), pressures.clone());
                            });
                        }
                    }
                }
            }
        }
    }

    fn update(&mut self, id: &ElementId, f: impl FnOnce(&mut Element)) {
        let Some(&i) = self.index.get(id) else {
            tracing::debug!(element = %id, "skipping update of unknown element");
            return;
        };
        let slot = &mut self.slots[i];
        f(&mut slot.element);
        slot.bounds = slot.element.outline().map(|o| o.bounding_box());
    }
}

impl Scene for Elements {
    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.iter()
    }

    fn visible_elements(&self) -> impl Iterator<Item = &Element> {
        let viewport = self.viewport;
        self.slots
            .iter()
            .filter(move |slot| {
                !slot.element.is_deleted
                    && match (viewport, slot.bounds) {
                        (None, _) => true,
                        (Some(viewport), Some(bounds)) => viewport.overlaps(bounds),
                        (Some(_), None) => false,
                    }
            })
            .map(|slot| &slot.element)
    }

    fn element(&self, id: &ElementId) -> Option<&Element> {
        self.get(id)
    }
}

impl FromIterator<Element> for Elements {
    fn from_iter<T: IntoIterator<Item = Element>>(iter: T) -> Self {
        let mut elements = Elements::new();
        for element in iter {
            elements.push(element);
        }
        elements
    }
}

impl Extend<Element> for Elements {
    fn extend<T: IntoIterator<Item = Element>>(&mut self, iter: T) {
        for element in iter {
            self.push(element);
        }
    }
}
