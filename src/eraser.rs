// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The eraser tool: routes pointer input to the session for the current mode.

use crate::{
    ElementId, EraserMode, EraserSettings, EraserSize, PixelMutation, PixelSession, Point, Scene,
    SettingsError, StrokeSession,
};

/// A raw pointer sample in canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerSample {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Pen pressure, if the device reports one.
    pub pressure: f32,
    /// Time of the sample in milliseconds.
    pub timestamp_ms: f64,
}

impl PointerSample {
    /// A sample at `(x, y)` with no pressure or time information.
    #[inline]
    pub fn new(x: f64, y: f64) -> PointerSample {
        PointerSample {
            x,
            y,
            ..PointerSample::default()
        }
    }
}

impl From<PointerSample> for Point {
    #[inline]
    fn from(sample: PointerSample) -> Point {
        Point::new(sample.x, sample.y)
    }
}

/// What a stroke-mode gesture erases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrokeResult {
    /// Elements to soft-delete, in id order.
    pub marked_for_deletion: Vec<ElementId>,
}

/// The result of committing a gesture.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EraseOutcome {
    /// Whole elements to delete.
    Stroke(StrokeResult),
    /// Per-element changes from pixel erasing.
    Pixel(Vec<PixelMutation>),
}

impl EraseOutcome {
    /// Whether committing the gesture changes nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            EraseOutcome::Stroke(result) => result.marked_for_deletion.is_empty(),
            EraseOutcome::Pixel(mutations) => mutations.is_empty(),
        }
    }
}

#[derive(Clone, Debug)]
enum Session {
    Stroke(StrokeSession),
    Pixel(PixelSession),
}

impl Session {
    fn mode(&self) -> EraserMode {
        match self {
            Session::Stroke(_) => EraserMode::Stroke,
            Session::Pixel(_) => EraserMode::Pixel,
        }
    }
}

/// The eraser tool.
///
/// Holds the settings and at most one gesture in progress. A gesture is
/// started with [`start_path`](Self::start_path), fed with
/// [`add_point`](Self::add_point) and [`restore_point`](Self::restore_point),
/// and ends with either [`commit`](Self::commit) or
/// [`end_path`](Self::end_path).
///
/// The mode and size are read when a gesture starts; changing them while a
/// gesture is in progress only affects the next one.
#[derive(Clone, Debug, Default)]
pub struct Eraser {
    settings: EraserSettings,
    session: Option<Session>,
}

impl Eraser {
    /// An idle eraser with the given settings.
    pub fn new(settings: EraserSettings) -> Eraser {
        Eraser {
            settings,
            session: None,
        }
    }

    /// The current settings.
    pub fn settings(&self) -> &EraserSettings {
        &self.settings
    }

    /// Replace all settings.
    pub fn set_settings(&mut self, settings: EraserSettings) {
        self.settings = settings;
        self.note_deferred_change();
    }

    /// The configured eraser size.
    pub fn size(&self) -> f64 {
        self.settings.size.get()
    }

    /// Set the eraser size.
    ///
    /// Sizes outside `1..=50` are rejected and leave the settings unchanged.
    pub fn set_size(&mut self, size: f64) -> Result<(), SettingsError> {
        self.settings.size = EraserSize::new(size)?;
        self.note_deferred_change();
        Ok(())
    }

    /// The configured mode.
    pub fn mode(&self) -> EraserMode {
        self.settings.mode
    }

    /// Set the mode.
    pub fn set_mode(&mut self, mode: EraserMode) {
        self.settings.mode = mode;
        self.note_deferred_change();
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The mode of the gesture in progress, if any.
    pub fn active_mode(&self) -> Option<EraserMode> {
        self.session.as_ref().map(Session::mode)
    }

    /// Start a gesture at `point`, cancelling any gesture in progress.
    pub fn start_path(&mut self, point: impl Into<Point>) {
        self.end_path();
        let point = point.into();
        let session = match self.settings.mode {
            EraserMode::Stroke => {
                let mut session = StrokeSession::new();
                session.start_path(point, self.settings.hit_tolerance.get());
                Session::Stroke(session)
            }
            EraserMode::Pixel => {
                let mut session = PixelSession::new();
                session.start_path(point, self.size(), self.settings.trail_sampling);
                Session::Pixel(session)
            }
        };
        self.session = Some(session);
    }

    /// Extend the gesture to `point` and return the elements currently
    /// marked. Without a gesture in progress this returns an empty list.
    pub fn add_point(&mut self, point: impl Into<Point>, scene: &impl Scene) -> Vec<ElementId> {
        match &mut self.session {
            Some(Session::Stroke(session)) => session.add_point(point.into(), false, scene),
            Some(Session::Pixel(session)) => session.add_point(point.into(), scene),
            None => Vec::new(),
        }
    }

    /// Extend the gesture to `point`, unmarking what the new segment hits.
    ///
    /// Pixel mode cannot restore, so there this only reports what is
    /// already marked.
    pub fn restore_point(
        &mut self,
        point: impl Into<Point>,
        scene: &impl Scene,
    ) -> Vec<ElementId> {
        match &mut self.session {
            Some(Session::Stroke(session)) => session.add_point(point.into(), true, scene),
            Some(Session::Pixel(session)) => session.marked(),
            None => Vec::new(),
        }
    }

    /// The elements currently marked by the gesture in progress.
    pub fn marked(&self) -> Vec<ElementId> {
        match &self.session {
            Some(Session::Stroke(session)) => session.marked(),
            Some(Session::Pixel(session)) => session.marked(),
            None => Vec::new(),
        }
    }

    /// Finish the gesture and return what it erases.
    ///
    /// Returns `None` if no gesture was in progress. The eraser is idle
    /// afterwards either way.
    pub fn commit(&mut self, scene: &impl Scene) -> Option<EraseOutcome> {
        let outcome = match self.session.as_ref()? {
            Session::Stroke(session) => EraseOutcome::Stroke(StrokeResult {
                marked_for_deletion: session.marked(),
            }),
            Session::Pixel(session) => EraseOutcome::Pixel(session.finalize(scene)),
        };
        tracing::debug!(?outcome, "erase committed");
        self.end_path();
        Some(outcome)
    }

    /// Cancel the gesture in progress without erasing anything.
    pub fn end_path(&mut self) {
        match self.session.take() {
            Some(Session::Stroke(mut session)) => session.end_path(),
            Some(Session::Pixel(mut session)) => session.end_path(),
            None => {}
        }
    }

    fn note_deferred_change(&self) {
        if let Some(session) = &self.session {
            tracing::debug!(
                active = ?session.mode(),
                "settings changed during a gesture; they apply to the next one"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Element, Elements, Rect, TrailSampling, Vec2};

    fn scene() -> Elements {
        [
            Element::rectangle("r", Rect::new(0.0, 0.0, 10.0, 10.0)),
            Element::free_draw("f", (0.0, 50.0), [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)].map(Vec2::from)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn idle_eraser() {
        let mut eraser = Eraser::default();
        let scene = scene();
        assert!(!eraser.is_active());
        assert!(eraser.add_point((5.0, 5.0), &scene).is_empty());
        assert!(eraser.restore_point((5.0, 5.0), &scene).is_empty());
        assert!(eraser.commit(&scene).is_none());
        assert_eq!(eraser.size(), 10.0);
        assert_eq!(eraser.mode(), EraserMode::Stroke);
    }

    #[test]
    fn stroke_gesture() {
        let mut eraser = Eraser::default();
        let scene = scene();
        eraser.start_path(PointerSample::new(-5.0, 5.0));
        assert_eq!(eraser.active_mode(), Some(EraserMode::Stroke));
        assert_eq!(eraser.add_point(PointerSample::new(5.0, 5.0), &scene), vec![ElementId::from("r")]);
        let outcome = eraser.commit(&scene).unwrap();
        assert_eq!(
            outcome,
            EraseOutcome::Stroke(StrokeResult {
                marked_for_deletion: vec!["r".into()],
            })
        );
        assert!(!eraser.is_active());
    }

    #[test]
    fn pixel_gesture() {
        let settings = EraserSettings::new(EraserMode::Pixel).with_size(5.0).unwrap();
        let mut eraser = Eraser::new(settings);
        let scene = scene();
        eraser.start_path((0.0, 50.0));
        eraser.add_point((10.0, 50.0), &scene);
        assert_eq!(eraser.restore_point((10.0, 50.0), &scene), vec![ElementId::from("f")]);
        let outcome = eraser.commit(&scene).unwrap();
        assert!(matches!(&outcome, EraseOutcome::Pixel(m) if m.len() == 1));
    }

    #[test]
    fn settings_changes_wait_for_next_gesture() {
        let mut eraser = Eraser::default();
        let scene = scene();
        eraser.start_path((-5.0, 5.0));
        eraser.set_mode(EraserMode::Pixel);
        assert_eq!(eraser.set_size(60.0), Err(SettingsError::SizeOutOfRange(60.0)));
        assert_eq!(eraser.size(), 10.0);
        eraser.set_size(20.0).unwrap();
        assert_eq!(eraser.active_mode(), Some(EraserMode::Stroke));
        eraser.add_point((5.0, 5.0), &scene);
        assert!(matches!(eraser.commit(&scene), Some(EraseOutcome::Stroke(_))));

        eraser.start_path((0.0, 50.0));
        assert_eq!(eraser.active_mode(), Some(EraserMode::Pixel));
    }

    #[test]
    fn cancel_discards_marks() {
        let mut eraser = Eraser::new(EraserSettings::default().with_trail_sampling(TrailSampling::Segments));
        let scene = scene();
        eraser.start_path((-5.0, 5.0));
        eraser.add_point((5.0, 5.0), &scene);
        assert_eq!(eraser.marked().len(), 1);
        eraser.end_path();
        assert!(eraser.marked().is_empty());
        assert!(eraser.commit(&scene).is_none());
    }

    #[test]
    fn restart_discards_previous_gesture() {
        let mut eraser = Eraser::default();
        let scene = scene();
        eraser.start_path((-5.0, 5.0));
        eraser.add_point((5.0, 5.0), &scene);
        eraser.start_path((100.0, 100.0));
        assert!(eraser.marked().is_empty());
    }
}
