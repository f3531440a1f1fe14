//! Host-facing carving session
//!
//! [`ChiselSession`] connects:
//! - Pointer input (begin/continue/end stroke)
//! - The strike tracker (speed from consecutive samples)
//! - The carve step (footprints stamped into the field)
//! - Reset, project files and image export
//!
//! It owns the one live [`MaterialField`]. Hosts that touch it from a worker
//! thread share it as a [`SharedSession`].

mod files;
mod stroke;

use std::sync::{Arc, Mutex};

use chisel_config::{CarveConfig, ChiselConfig};
use image::RgbaImage;

use crate::error::{ChiselError, ChiselResult};
use crate::export::Exporter;
use crate::field::{MaterialField, TileCoord};
use crate::silhouette::Silhouette;
use crate::strike::StrikeTracker;

/// A session behind one lock covering the whole grid
pub type SharedSession = Arc<Mutex<ChiselSession>>;

/// Carving state for one rock
pub struct ChiselSession {
    /// Live material
    pub(crate) field: MaterialField,
    pub(crate) tracker: StrikeTracker,
    pub(crate) carve: CarveConfig,
    pub(crate) exporter: Exporter,
    /// Backdrop for non-transparent export, sized like the field
    pub(crate) background: Option<RgbaImage>,
    /// Pointer input is ignored while set
    pub(crate) input_suspended: bool,
}

impl ChiselSession {
    /// Start a session on a pristine rock
    pub fn new(silhouette: Silhouette, config: ChiselConfig) -> ChiselResult<Self> {
        Self::with_field(MaterialField::fully_covered(silhouette), config)
    }

    /// Start a session on an existing field
    pub fn with_field(field: MaterialField, config: ChiselConfig) -> ChiselResult<Self> {
        config.carve.validate()?;
        Ok(Self {
            field,
            tracker: StrikeTracker::new(),
            carve: config.carve,
            exporter: Exporter::new(config.export),
            background: None,
            input_suspended: false,
        })
    }

    /// Wrap the session for use across threads
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn field(&self) -> &MaterialField {
        &self.field
    }

    pub fn width(&self) -> u32 {
        self.field.width()
    }

    pub fn height(&self) -> u32 {
        self.field.height()
    }

    /// Fraction of the pristine material still present
    pub fn remaining_fraction(&self) -> f64 {
        self.field.remaining_fraction()
    }

    /// Tiles changed since the last call, for partial redraws
    pub fn take_dirty_tiles(&mut self) -> Vec<TileCoord> {
        self.field.take_dirty_tiles()
    }

    pub fn carve_config(&self) -> &CarveConfig {
        &self.carve
    }

    /// Replace the carve settings. Invalid settings leave the old ones in place.
    pub fn set_carve_config(&mut self, config: CarveConfig) -> ChiselResult<()> {
        config.validate()?;
        self.carve = config;
        Ok(())
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    /// Set or clear the backdrop image. It must match the field dimensions.
    pub fn set_background(&mut self, background: Option<RgbaImage>) -> ChiselResult<()> {
        if let Some(image) = &background {
            if image.dimensions() != self.field.dimensions() {
                return Err(ChiselError::dimensions(
                    self.field.dimensions(),
                    image.dimensions(),
                ));
            }
        }
        self.background = background;
        Ok(())
    }
}
