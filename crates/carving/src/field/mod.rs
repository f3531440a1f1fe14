//! Material state of the rock
//!
//! [`MaterialField`] owns the per-cell coverage (fraction of material left),
//! the immutable [`Silhouette`], and the pristine baseline used by reset.
//! Grids are flat row-major arenas indexed by `y * width + x`.
//!
//! Invariants held by every method:
//! - `coverage[i] <= pristine[i]`
//! - `coverage[i] == 0` wherever the silhouette is empty

mod dirty_tracking;

use std::collections::HashSet;

use tracing::debug;

use crate::constants::DEFAULT_TILE_SIZE;
use crate::error::{ChiselError, ChiselResult};
use crate::quantize::to_coverage_byte;
use crate::silhouette::Silhouette;

pub use dirty_tracking::TileCoord;

/// Per-cell material of a rock plus its reset baseline
#[derive(Debug, Clone)]
pub struct MaterialField {
    silhouette: Silhouette,
    coverage: Vec<f32>,
    pristine: Vec<f32>,
    tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
    dirty_tiles: HashSet<TileCoord>,
}

impl MaterialField {
    /// Build a field from a silhouette and an initial coverage grid.
    ///
    /// The initial grid becomes the pristine baseline. Values are clamped to
    /// `[0, 1]` and zeroed outside the silhouette.
    pub fn new(
        silhouette: Silhouette,
        width: u32,
        height: u32,
        initial: Vec<f32>,
    ) -> ChiselResult<Self> {
        if silhouette.dimensions() != (width, height) {
            return Err(ChiselError::dimensions(
                silhouette.dimensions(),
                (width, height),
            ));
        }
        if initial.len() != width as usize * height as usize {
            return Err(ChiselError::dimensions(
                (width, height),
                (initial.len() as u32, 1),
            ));
        }

        let pristine: Vec<f32> = initial
            .into_iter()
            .zip(silhouette.mask())
            .map(|(value, &inside)| {
                if inside && value.is_finite() {
                    value.clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect();

        Ok(Self::from_parts(silhouette, pristine.clone(), pristine))
    }

    /// A pristine rock: full coverage inside the silhouette
    pub fn fully_covered(silhouette: Silhouette) -> Self {
        let pristine = pristine_for(&silhouette);
        Self::from_parts(silhouette, pristine.clone(), pristine)
    }

    /// Assemble a field from already-validated grids
    pub(crate) fn from_parts(silhouette: Silhouette, coverage: Vec<f32>, pristine: Vec<f32>) -> Self {
        let (width, height) = silhouette.dimensions();
        let tile_size = DEFAULT_TILE_SIZE;
        Self {
            silhouette,
            coverage,
            pristine,
            tile_size,
            tiles_x: width.div_ceil(tile_size),
            tiles_y: height.div_ceil(tile_size),
            dirty_tiles: HashSet::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.silhouette.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.silhouette.height()
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.silhouette.dimensions()
    }

    /// The rock outline this field was built on
    pub fn silhouette(&self) -> &Silhouette {
        &self.silhouette
    }

    /// Coverage at a cell
    pub fn get(&self, x: u32, y: u32) -> ChiselResult<f32> {
        self.silhouette
            .index(x as i64, y as i64)
            .map(|i| self.coverage[i])
            .ok_or(ChiselError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width(),
                height: self.height(),
            })
    }

    /// Remove up to `amount` material from a cell.
    ///
    /// Cells outside the field or the silhouette, and cells already empty,
    /// are left alone. Returns the amount actually removed.
    #[inline]
    pub fn apply_removal(&mut self, x: i64, y: i64, amount: f32) -> f32 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let Some(index) = self.silhouette.index(x, y) else {
            return 0.0;
        };
        if !self.silhouette.mask()[index] {
            return 0.0;
        }

        let current = self.coverage[index];
        if current <= 0.0 {
            return 0.0;
        }
        let next = (current - amount).max(0.0);
        self.coverage[index] = next;
        self.mark_dirty(x as u32, y as u32);
        current - next
    }

    /// Restore every cell to the pristine baseline
    pub fn reset(&mut self) {
        self.coverage.copy_from_slice(&self.pristine);
        self.mark_all_dirty();
        debug!(
            "MaterialField::reset: {}x{} restored to pristine",
            self.width(),
            self.height()
        );
    }

    /// Fraction of the pristine material still present.
    ///
    /// A rock with no pristine material reports 1.0.
    pub fn remaining_fraction(&self) -> f64 {
        let pristine: f64 = self.pristine.iter().map(|&v| v as f64).sum();
        if pristine <= 0.0 {
            return 1.0;
        }
        let remaining: f64 = self.coverage.iter().map(|&v| v as f64).sum();
        remaining / pristine
    }

    /// Row-major coverage
    #[inline]
    pub fn coverage(&self) -> &[f32] {
        &self.coverage
    }

    /// Row-major reset baseline
    #[inline]
    pub fn pristine(&self) -> &[f32] {
        &self.pristine
    }

    /// Coverage quantized to bytes, row-major
    pub fn quantized(&self) -> Vec<u8> {
        self.coverage.iter().map(|&c| to_coverage_byte(c)).collect()
    }

    /// Whether a cell is part of the rock
    #[inline]
    pub fn in_silhouette(&self, x: i64, y: i64) -> bool {
        self.silhouette.contains(x, y)
    }
}

/// Baseline for a fresh rock: 1.0 inside the outline, 0.0 outside
pub(crate) fn pristine_for(silhouette: &Silhouette) -> Vec<f32> {
    silhouette
        .mask()
        .iter()
        .map(|&inside| if inside { 1.0 } else { 0.0 })
        .collect()
}
