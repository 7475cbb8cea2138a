// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Erasing whole elements along the pointer trail.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::scene::mark_with_dependencies;
use crate::{Element, ElementId, GeometryCache, GroupId, Line, Point, Scene};

/// A stroke-mode erasing gesture.
///
/// Every new pointer sample forms a segment with the previous one. Elements
/// hit by that segment are marked for deletion together with their whole
/// outermost group and any bound text or container. Moving back over a marked
/// element while restoring unmarks it again.
///
/// The set of marked elements is always derived from what was hit directly
/// and which groups were expanded, so restoring one element never leaves a
/// bound text or group sibling marked without a reason.
#[derive(Clone, Debug, Default)]
pub struct StrokeSession {
    active: bool,
    tolerance: f64,
    window: ArrayVec<Point, 2>,
    hits: BTreeSet<ElementId>,
    groups: BTreeSet<GroupId>,
    marked: BTreeSet<ElementId>,
    cache: GeometryCache,
}

impl StrokeSession {
    /// A new, idle session.
    pub fn new() -> StrokeSession {
        StrokeSession::default()
    }

    /// Start a gesture at `point`, discarding any previous state.
    ///
    /// Trail segments hit element boundaries within `tolerance`.
    pub fn start_path(&mut self, point: Point, tolerance: f64) {
        self.end_path();
        self.active = true;
        self.tolerance = tolerance;
        if point.is_finite() {
            self.window.push(point);
        }
        tracing::debug!(x = point.x, y = point.y, tolerance, "stroke erase started");
    }

    /// Extend the trail to `point` and return the elements now marked.
    ///
    /// With `restoring` set, elements hit by the new segment are unmarked
    /// instead. Outside a gesture this does nothing and returns an empty
    /// list.
    pub fn add_point(
        &mut self,
        point: Point,
        restoring: bool,
        scene: &impl Scene,
    ) -> Vec<ElementId> {
        if !self.active {
            return Vec::new();
        }
        if !point.is_finite() {
            tracing::trace!(x = point.x, y = point.y, "ignoring non-finite sample");
            return self.marked();
        }
        if self.window.is_full() {
            self.window.remove(0);
        }
        self.window.push(point);
        if let [p0, p1] = self.window[..] {
            let path = Line::new(p0, p1);
            if restoring {
                self.restore(path, scene);
            } else {
                self.extend(path, scene);
            }
        }
        self.marked()
    }

    /// End the gesture and forget all state.
    pub fn end_path(&mut self) {
        if self.active {
            tracing::debug!(marked = self.marked.len(), "stroke erase ended");
        }
        self.active = false;
        self.window.clear();
        self.hits.clear();
        self.groups.clear();
        self.marked.clear();
        self.cache.clear();
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The elements currently marked for deletion, in id order.
    pub fn marked(&self) -> Vec<ElementId> {
        self.marked.iter().cloned().collect()
    }

    /// Whether `id` is currently marked for deletion.
    pub fn is_marked(&self, id: &ElementId) -> bool {
        self.marked.contains(id)
    }

    /// The groups that were erased as a whole.
    pub fn erased_groups(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.iter()
    }

    fn extend(&mut self, path: Line, scene: &impl Scene) {
        for element in scene.visible_elements() {
            if element.locked || self.marked.contains(&element.id) {
                continue;
            }
            if !self.cache.hits_segment(element, path, self.tolerance) {
                continue;
            }
            tracing::trace!(element = %element.id, "marked");
            self.hits.insert(element.id.clone());
            if let Some(group) = element.shallowest_group() {
                if self.groups.insert(group.clone()) {
                    tracing::trace!(%group, "group marked");
                    for member in scene.group_members(group) {
                        mark_with_dependencies(&mut self.marked, &member.id, scene);
                    }
                }
            }
            mark_with_dependencies(&mut self.marked, &element.id, scene);
        }
    }

    fn restore(&mut self, path: Line, scene: &impl Scene) {
        for element in scene.visible_elements() {
            if element.locked || !self.marked.contains(&element.id) {
                continue;
            }
            if !self.cache.hits_segment(element, path, self.tolerance) {
                continue;
            }
            tracing::trace!(element = %element.id, "restored");
            self.unmark(element, scene);
            self.rebuild(scene);
        }
    }

    /// Drop every reason `element` was marked for.
    fn unmark(&mut self, element: &Element, scene: &impl Scene) {
        self.hits.remove(&element.id);
        for dependency in element.dependencies() {
            self.hits.remove(dependency);
        }
        if let Some(group) = element.shallowest_group() {
            if self.groups.remove(group) {
                tracing::trace!(%group, "group restored");
                for member in scene.group_members(group) {
                    self.hits.remove(&member.id);
                }
            }
        }
    }

    /// Recompute the marked set from direct hits and expanded groups.
    fn rebuild(&mut self, scene: &impl Scene) {
        self.marked.clear();
        for id in &self.hits {
            mark_with_dependencies(&mut self.marked, id, scene);
        }
        for group in &self.groups {
            for member in scene.group_members(group) {
                mark_with_dependencies(&mut self.marked, &member.id, scene);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Elements, Rect, Vec2};

    fn ids(list: &[&str]) -> Vec<ElementId> {
        list.iter().map(|&id| ElementId::from(id)).collect()
    }

    fn session_at(point: (f64, f64)) -> StrokeSession {
        let mut session = StrokeSession::new();
        session.start_path(point.into(), 2.0);
        session
    }

    #[test]
    fn idle_session_ignores_points() {
        let scene: Elements = [Element::rectangle("a", Rect::new(0.0, 0.0, 10.0, 10.0))]
            .into_iter()
            .collect();
        let mut session = StrokeSession::new();
        assert!(session.add_point(Point::new(5.0, 5.0), false, &scene).is_empty());
        assert!(!session.is_active());
    }

    #[test]
    fn crossing_marks_element() {
        let scene: Elements = [
            Element::free_draw("f", (0.0, 0.0), [(0.0, 0.0), (100.0, 0.0)].map(Vec2::from)),
            Element::rectangle("far", Rect::new(200.0, 200.0, 210.0, 210.0)),
        ]
        .into_iter()
        .collect();
        let mut session = session_at((50.0, -10.0));
        assert_eq!(session.add_point(Point::new(50.0, 10.0), false, &scene), ids(&["f"]));
    }

    #[test]
    fn first_sample_alone_hits_nothing() {
        let scene: Elements = [Element::text("t", Rect::new(0.0, 0.0, 100.0, 100.0))]
            .into_iter()
            .collect();
        let mut session = StrokeSession::new();
        session.start_path(Point::new(f64::NAN, 0.0), 2.0);
        assert!(session.add_point(Point::new(50.0, 50.0), false, &scene).is_empty());
        assert_eq!(session.add_point(Point::new(51.0, 50.0), false, &scene), ids(&["t"]));
    }

    #[test]
    fn group_is_erased_as_a_whole() {
        let scene: Elements = [
            Element::rectangle("a", Rect::new(0.0, 0.0, 10.0, 10.0)).with_groups(["g"]),
            Element::rectangle("b", Rect::new(100.0, 0.0, 110.0, 10.0)).with_groups(["g"]),
            Element::rectangle("c", Rect::new(200.0, 0.0, 210.0, 10.0)),
        ]
        .into_iter()
        .collect();
        let mut session = session_at((-5.0, 5.0));
        let marked = session.add_point(Point::new(5.0, 5.0), false, &scene);
        assert_eq!(marked, ids(&["a", "b"]));
        assert_eq!(session.erased_groups().count(), 1);
    }

    #[test]
    fn nested_groups_expand_outermost() {
        let scene: Elements = [
            Element::rectangle("a", Rect::new(0.0, 0.0, 10.0, 10.0)).with_groups(["inner", "outer"]),
            Element::rectangle("b", Rect::new(100.0, 0.0, 110.0, 10.0)).with_groups(["inner", "outer"]),
            Element::rectangle("c", Rect::new(200.0, 0.0, 210.0, 10.0)).with_groups(["outer"]),
        ]
        .into_iter()
        .collect();
        let mut session = session_at((-5.0, 5.0));
        let marked = session.add_point(Point::new(5.0, 5.0), false, &scene);
        assert_eq!(marked, ids(&["a", "b", "c"]));
    }

    #[test]
    fn bound_text_follows_container() {
        let scene: Elements = [
            Element::rectangle("box", Rect::new(0.0, 0.0, 100.0, 100.0)).with_bound_text("label"),
            Element::text("label", Rect::new(40.0, 40.0, 60.0, 60.0)).with_container("box"),
        ]
        .into_iter()
        .collect();
        let mut session = session_at((-5.0, 10.0));
        let marked = session.add_point(Point::new(5.0, 10.0), false, &scene);
        assert_eq!(marked, ids(&["box", "label"]));
    }

    #[test]
    fn locked_elements_are_never_marked() {
        let scene: Elements = [
            Element::rectangle("a", Rect::new(0.0, 0.0, 10.0, 10.0)).with_groups(["g"]),
            Element::rectangle("b", Rect::new(20.0, 0.0, 30.0, 10.0)).with_groups(["g"]).locked(),
        ]
        .into_iter()
        .collect();
        let mut session = session_at((-5.0, 5.0));
        assert_eq!(session.add_point(Point::new(40.0, 5.0), false, &scene), ids(&["a"]));
    }

    #[test]
    fn restore_unmarks_group_and_bindings() {
        let scene: Elements = [
            Element::rectangle("a", Rect::new(0.0, 0.0, 10.0, 10.0))
                .with_groups(["g"])
                .with_bound_text("label"),
            Element::text("label", Rect::new(2.0, 2.0, 8.0, 8.0)).with_container("a"),
            Element::rectangle("b", Rect::new(100.0, 0.0, 110.0, 10.0)).with_groups(["g"]),
            Element::rectangle("c", Rect::new(0.0, 50.0, 10.0, 60.0)),
        ]
        .into_iter()
        .collect();
        let mut session = session_at((-5.0, 5.0));
        session.add_point(Point::new(5.0, 5.0), false, &scene);
        session.add_point(Point::new(5.0, 55.0), false, &scene);
        assert_eq!(session.marked(), ids(&["a", "b", "c", "label"]));

        // Back out along the left edge of `c` only.
        session.add_point(Point::new(-5.0, 55.0), true, &scene);
        assert_eq!(session.marked(), ids(&["a", "b", "label"]));

        // Restoring inside the container takes its label and group along.
        session.add_point(Point::new(5.0, 5.0), false, &scene);
        session.add_point(Point::new(5.0, 4.0), true, &scene);
        assert!(session.marked().is_empty());
        assert_eq!(session.erased_groups().count(), 0);
    }

    #[test]
    fn restore_keeps_independently_hit_elements() {
        let scene: Elements = [
            Element::rectangle("a", Rect::new(0.0, 0.0, 10.0, 10.0)),
            Element::rectangle("b", Rect::new(100.0, 0.0, 110.0, 10.0)),
        ]
        .into_iter()
        .collect();
        let mut session = session_at((-5.0, 5.0));
        session.add_point(Point::new(105.0, 5.0), false, &scene);
        assert_eq!(session.marked(), ids(&["a", "b"]));
        session.add_point(Point::new(105.0, 50.0), true, &scene);
        assert_eq!(session.marked(), ids(&["a"]));
    }

    #[test]
    fn restoring_a_group_keeps_members_bound_to_other_hits() {
        // `t` is the label of `c` and also a member of group `g` with `a`.
        let scene: Elements = [
            Element::rectangle("c", Rect::new(0.0, 0.0, 10.0, 10.0)).with_bound_text("t"),
            Element::text("t", Rect::new(40.0, 40.0, 60.0, 60.0))
                .with_container("c")
                .with_groups(["g"]),
            Element::rectangle("a", Rect::new(100.0, 0.0, 110.0, 10.0)).with_groups(["g"]),
        ]
        .into_iter()
        .collect();
        let mut session = session_at((-5.0, 5.0));
        assert_eq!(session.add_point(Point::new(5.0, 5.0), false, &scene), ids(&["c", "t"]));
        assert_eq!(session.erased_groups().count(), 0);

        assert_eq!(session.add_point(Point::new(105.0, 5.0), false, &scene), ids(&["a", "c", "t"]));
        assert_eq!(session.erased_groups().count(), 1);

        // Leaving `a` through its bottom edge reverses the group, but `t`
        // still goes with `c`.
        assert_eq!(session.add_point(Point::new(105.0, 50.0), true, &scene), ids(&["c", "t"]));
        assert_eq!(session.erased_groups().count(), 0);
        assert!(session.is_marked(&"t".into()));
        assert!(!session.is_marked(&"a".into()));
    }

    #[test]
    fn end_path_resets() {
        let scene: Elements = [Element::rectangle("a", Rect::new(0.0, 0.0, 10.0, 10.0))]
            .into_iter()
            .collect();
        let mut session = session_at((-5.0, 5.0));
        session.add_point(Point::new(5.0, 5.0), false, &scene);
        session.end_path();
        assert!(!session.is_active());
        assert!(session.marked().is_empty());
        assert!(session.add_point(Point::new(6.0, 5.0), false, &scene).is_empty());
    }
}
