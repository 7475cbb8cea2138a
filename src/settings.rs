// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eraser configuration.

use core::fmt;

/// The smallest allowed eraser size.
pub const MIN_ERASER_SIZE: f64 = 1.0;

/// The largest allowed eraser size.
pub const MAX_ERASER_SIZE: f64 = 50.0;

/// The eraser size used when none is configured.
pub const DEFAULT_ERASER_SIZE: f64 = 10.0;

/// The default distance within which a trail segment counts as touching an
/// element boundary in stroke mode.
pub const DEFAULT_HIT_TOLERANCE: f64 = 2.0;

/// Error returned when eraser settings are out of range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettingsError {
    /// The size is not a finite number in `MIN_ERASER_SIZE..=MAX_ERASER_SIZE`.
    SizeOutOfRange(f64),
    /// The hit tolerance is negative or not finite.
    InvalidTolerance(f64),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::SizeOutOfRange(size) => write!(
                f,
                "eraser size {size} is outside {MIN_ERASER_SIZE}..={MAX_ERASER_SIZE}"
            ),
            SettingsError::InvalidTolerance(tolerance) => {
                write!(f, "hit tolerance {tolerance} must be finite and non-negative")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// A validated eraser size.
///
/// In pixel mode this is the radius of the eraser footprint.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct EraserSize(f64);

impl EraserSize {
    /// Validate a size.
    pub fn new(size: f64) -> Result<EraserSize, SettingsError> {
        if (MIN_ERASER_SIZE..=MAX_ERASER_SIZE).contains(&size) {
            Ok(EraserSize(size))
        } else {
            Err(SettingsError::SizeOutOfRange(size))
        }
    }

    /// The size as a number.
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for EraserSize {
    fn default() -> Self {
        EraserSize(DEFAULT_ERASER_SIZE)
    }
}

impl TryFrom<f64> for EraserSize {
    type Error = SettingsError;

    fn try_from(size: f64) -> Result<Self, Self::Error> {
        EraserSize::new(size)
    }
}

impl From<EraserSize> for f64 {
    fn from(size: EraserSize) -> f64 {
        size.0
    }
}

impl fmt::Display for EraserSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for EraserSize {
    fn schema_name() -> String {
        "EraserSize".into()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <f64 as schemars::JsonSchema>::json_schema(generator)
    }
}

/// A validated stroke-mode hit tolerance: finite and non-negative.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct HitTolerance(f64);

impl HitTolerance {
    /// Validate a tolerance.
    pub fn new(tolerance: f64) -> Result<HitTolerance, SettingsError> {
        if tolerance.is_finite() && tolerance >= 0.0 {
            Ok(HitTolerance(tolerance))
        } else {
            Err(SettingsError::InvalidTolerance(tolerance))
        }
    }

    /// The tolerance in canvas units.
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for HitTolerance {
    fn default() -> Self {
        HitTolerance(DEFAULT_HIT_TOLERANCE)
    }
}

impl TryFrom<f64> for HitTolerance {
    type Error = SettingsError;

    fn try_from(tolerance: f64) -> Result<Self, Self::Error> {
        HitTolerance::new(tolerance)
    }
}

impl From<HitTolerance> for f64 {
    fn from(tolerance: HitTolerance) -> f64 {
        tolerance.0
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for HitTolerance {
    fn schema_name() -> String {
        "HitTolerance".into()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <f64 as schemars::JsonSchema>::json_schema(generator)
    }
}

/// What an erasing gesture does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EraserMode {
    /// Erase whole elements the trail passes through.
    #[default]
    Stroke,
    /// Erase the points of freehand and linear elements under the eraser.
    Pixel,
}

/// How pixel mode decides which points of an element were erased.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrailSampling {
    /// A point is erased if it lies within the eraser size of a trail sample.
    #[default]
    Points,
    /// A point is erased if it lies within the eraser size of the trail
    /// polyline, so fast strokes leave no gaps between samples.
    Segments,
}

/// Eraser configuration.
///
/// Settings are read when a gesture starts; changing them during a gesture
/// affects the next one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EraserSettings {
    /// The eraser size.
    pub size: EraserSize,
    /// Which session a gesture starts.
    pub mode: EraserMode,
    /// Stroke mode: how close a trail segment has to come to a boundary.
    pub hit_tolerance: HitTolerance,
    /// Pixel mode: how the trail erases points.
    pub trail_sampling: TrailSampling,
}

impl Default for EraserSettings {
    fn default() -> Self {
        EraserSettings {
            size: EraserSize::default(),
            mode: EraserMode::default(),
            hit_tolerance: HitTolerance::default(),
            trail_sampling: TrailSampling::default(),
        }
    }
}

impl EraserSettings {
    /// Default settings with the given mode.
    pub fn new(mode: EraserMode) -> EraserSettings {
        EraserSettings {
            mode,
            ..EraserSettings::default()
        }
    }

    /// Set the size.
    pub fn with_size(mut self, size: f64) -> Result<EraserSettings, SettingsError> {
        self.size = EraserSize::new(size)?;
        Ok(self)
    }

    /// Set the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: EraserMode) -> EraserSettings {
        self.mode = mode;
        self
    }

    /// Set the stroke-mode hit tolerance.
    pub fn with_hit_tolerance(mut self, tolerance: f64) -> Result<EraserSettings, SettingsError> {
        self.hit_tolerance = HitTolerance::new(tolerance)?;
        Ok(self)
    }

    /// Set the pixel-mode trail sampling.
    #[must_use]
    pub fn with_trail_sampling(mut self, sampling: TrailSampling) -> EraserSettings {
        self.trail_sampling = sampling;
        self
    }
}
