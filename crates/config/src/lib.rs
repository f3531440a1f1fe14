//! Shared configuration for Chisel
//!
//! This crate provides the single source of truth for carving tunables,
//! export colors, and file naming constants shared by the carving engine
//! and the command-line host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extension of saved project files
pub const PROJECT_EXTENSION: &str = ".chisel-project";

/// Extension of exported images
pub const IMAGE_EXTENSION: &str = ".png";

/// Suffix appended to the transparent image when saving everything at once
pub const TRANSPARENT_SUFFIX: &str = "_transparent";

/// Longest file name accepted from the user, in characters
pub const MAX_FILENAME_LENGTH: usize = 128;

/// Directory preferred for saves when it exists under the working directory
pub const SAVES_DIR: &str = "saves";

/// Default rock field width in cells
pub const DEFAULT_FIELD_WIDTH: u32 = 640;

/// Default rock field height in cells
pub const DEFAULT_FIELD_HEIGHT: u32 = 480;

/// Default footprint radius floor, in cells
pub const DEFAULT_MIN_RADIUS: f32 = 2.0;

/// Default footprint radius cap, in cells
pub const DEFAULT_MAX_RADIUS: f32 = 24.0;

/// Default material removed per footprint visit
pub const DEFAULT_INTENSITY: f32 = 0.35;

/// Default interpolation step as a fraction of the radius
pub const DEFAULT_SPACING: f32 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_radius must be positive, got {0}")]
    MinRadius(f32),
    #[error("max_radius {max} is smaller than min_radius {min}")]
    RadiusRange { min: f32, max: f32 },
    #[error("intensity must be within [0, 1], got {0}")]
    Intensity(f32),
    #[error("spacing must be within (0, 1], got {0}")]
    Spacing(f32),
    #[error("speed curve is not monotonic non-decreasing: {0}")]
    SpeedCurve(String),
}

/// Mapping from swing speed (cells per second) to footprint radius (cells).
///
/// Every variant is monotonic non-decreasing in speed once validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeedCurve {
    /// Same radius regardless of speed
    Constant { radius: f32 },
    /// `base + gain * speed`
    Linear { base: f32, gain: f32 },
    /// `base + span * speed / (speed + half_speed)`, approaching `base + span`
    Saturating { base: f32, span: f32, half_speed: f32 },
}

impl Default for SpeedCurve {
    fn default() -> Self {
        SpeedCurve::Linear {
            base: DEFAULT_MIN_RADIUS,
            gain: 0.015,
        }
    }
}

impl SpeedCurve {
    /// Evaluate the unclamped radius for a speed
    pub fn radius_for_speed(&self, speed: f32) -> f32 {
        let speed = if speed.is_finite() { speed.max(0.0) } else { f32::MAX };
        match *self {
            SpeedCurve::Constant { radius } => radius,
            SpeedCurve::Linear { base, gain } => base + gain * speed,
            SpeedCurve::Saturating {
                base,
                span,
                half_speed,
            } => {
                if speed == f32::MAX {
                    base + span
                } else {
                    base + span * speed / (speed + half_speed)
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            SpeedCurve::Constant { radius } if !radius.is_finite() => {
                Err(ConfigError::SpeedCurve(format!("radius {radius}")))
            }
            SpeedCurve::Linear { base, gain } if !base.is_finite() || !(gain >= 0.0) => {
                Err(ConfigError::SpeedCurve(format!("base {base}, gain {gain}")))
            }
            SpeedCurve::Saturating {
                base,
                span,
                half_speed,
            } if !base.is_finite() || !(span >= 0.0) || !(half_speed > 0.0) => {
                Err(ConfigError::SpeedCurve(format!(
                    "base {base}, span {span}, half_speed {half_speed}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Carving tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveConfig {
    /// Smallest footprint radius, applied even at zero speed
    pub min_radius: f32,
    /// Hard cap on footprint radius regardless of speed
    pub max_radius: f32,
    /// Speed to radius mapping
    pub speed_to_radius: SpeedCurve,
    /// Removal amount per footprint visit, 0.0-1.0
    pub intensity: f32,
    /// Interpolation step as a fraction of the radius, (0.0, 1.0]
    pub spacing: f32,
}

impl Default for CarveConfig {
    fn default() -> Self {
        Self {
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            speed_to_radius: SpeedCurve::default(),
            intensity: DEFAULT_INTENSITY,
            spacing: DEFAULT_SPACING,
        }
    }
}

impl CarveConfig {
    /// A config whose footprint radius is always `radius`
    pub fn fixed_radius(radius: f32, intensity: f32) -> Self {
        Self {
            min_radius: radius,
            max_radius: radius,
            speed_to_radius: SpeedCurve::Constant { radius },
            intensity,
            ..Default::default()
        }
    }

    /// Footprint radius for a swing speed, clamped to `[min_radius, max_radius]`.
    ///
    /// Never panics, even on settings that fail [`CarveConfig::validate`]: an
    /// inverted range collapses to `min_radius`.
    pub fn radius_for_speed(&self, speed: f32) -> f32 {
        let radius = self.speed_to_radius.radius_for_speed(speed);
        if radius.is_nan() {
            return self.min_radius;
        }
        radius
            .max(self.min_radius)
            .min(self.max_radius.max(self.min_radius))
    }

    /// Check that every tunable is within its documented range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_radius > 0.0) || !self.min_radius.is_finite() {
            return Err(ConfigError::MinRadius(self.min_radius));
        }
        if !(self.max_radius >= self.min_radius) || !self.max_radius.is_finite() {
            return Err(ConfigError::RadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(ConfigError::Intensity(self.intensity));
        }
        if !(self.spacing > 0.0 && self.spacing <= 1.0) {
            return Err(ConfigError::Spacing(self.spacing));
        }
        self.speed_to_radius.validate()
    }
}

/// Colors used when rasterizing the rock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Stone color when the rock has no source texture
    pub stone_color: [u8; 3],
    /// Backdrop for non-transparent export when no background image is given
    pub background_color: [u8; 4],
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            stone_color: [128, 122, 114],
            background_color: [186, 208, 224, 255],
        }
    }
}

/// Everything the host can override from a config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChiselConfig {
    pub carve: CarveConfig,
    pub export: ExportConfig,
}
