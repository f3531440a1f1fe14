//! Rock outline and stone texture
//!
//! The silhouette marks which cells belong to the rock at all. It is fixed
//! for the lifetime of a field; carving can never create material outside it.

use std::path::Path;

use image::RgbaImage;
use tracing::info;

use crate::error::{ChiselError, ChiselResult};

/// Immutable rock outline, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    width: u32,
    height: u32,
    mask: Vec<bool>,
    /// Per-cell stone color from the source image, if the rock came from one
    texture: Option<Vec<[u8; 3]>>,
}

impl Silhouette {
    /// Build a silhouette from an explicit mask in row-major order
    pub fn from_mask(width: u32, height: u32, mask: Vec<bool>) -> ChiselResult<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if mask.len() != expected {
            // A flat mask has no shape of its own; report it as one long row.
            return Err(ChiselError::dimensions(
                (width, height),
                (mask.len() as u32, 1),
            ));
        }
        Ok(Self {
            width,
            height,
            mask,
            texture: None,
        })
    }

    /// A silhouette covering every cell
    pub fn full(width: u32, height: u32) -> ChiselResult<Self> {
        let count = width as usize * height as usize;
        Self::from_mask(width, height, vec![true; count])
    }

    /// Procedural rock: the ellipse inscribed in the field
    pub fn ellipse(width: u32, height: u32) -> ChiselResult<Self> {
        check_dimensions(width, height)?;
        let a = width as f32 / 2.0;
        let b = height as f32 / 2.0;
        let mut mask = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let nx = (x as f32 + 0.5 - a) / a;
                let ny = (y as f32 + 0.5 - b) / b;
                mask.push(nx * nx + ny * ny <= 1.0);
            }
        }
        Self::from_mask(width, height, mask)
    }

    /// Derive the outline from an image: a cell is rock where alpha > 0.
    /// The image's RGB becomes the stone texture.
    pub fn from_image(image: &RgbaImage) -> ChiselResult<Self> {
        let (width, height) = image.dimensions();
        check_dimensions(width, height)?;
        let mut mask = Vec::with_capacity(width as usize * height as usize);
        let mut texture = Vec::with_capacity(mask.capacity());
        for pixel in image.pixels() {
            let [r, g, b, a] = pixel.0;
            mask.push(a > 0);
            texture.push([r, g, b]);
        }
        Ok(Self {
            width,
            height,
            mask,
            texture: Some(texture),
        })
    }

    /// Decode a rock image from disk
    pub fn load(path: impl AsRef<Path>) -> ChiselResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgba8();
        let silhouette = Self::from_image(&image)?;
        info!(
            "Loaded rock silhouette {}x{} from {} ({} rock cells)",
            silhouette.width,
            silhouette.height,
            path.display(),
            silhouette.rock_cell_count()
        );
        Ok(silhouette)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the cell belongs to the rock. Cells outside the field never do.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.index(x, y).is_some_and(|i| self.mask[i])
    }

    /// Row-major mask
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Stone color at a cell, if the rock has a source texture
    #[inline]
    pub fn texture_at(&self, index: usize) -> Option<[u8; 3]> {
        self.texture.as_ref().map(|t| t[index])
    }

    /// Whether a source texture is attached
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Number of cells inside the outline
    pub fn rock_cell_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Row-major index for a cell, or None outside the field
    #[inline]
    pub(crate) fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

fn check_dimensions(width: u32, height: u32) -> ChiselResult<()> {
    if width == 0 || height == 0 {
        return Err(ChiselError::dimensions(
            (width.max(1), height.max(1)),
            (width, height),
        ));
    }
    Ok(())
}
