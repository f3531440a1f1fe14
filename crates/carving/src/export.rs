//! Rasterize a carved rock to a PNG.
//!
//! Each cell becomes one pixel whose alpha is the cell's quantized coverage.
//! Transparent export keeps that alpha as-is; otherwise the stone layer is
//! composited "over" a background image or the configured backdrop color.

use std::io::Cursor;
use std::path::Path;

use chisel_config::ExportConfig;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use tracing::{debug, info};

use crate::cancel::{CancelToken, checkpoint};
use crate::constants::ROW_CHUNK;
use crate::error::{ChiselError, ChiselResult};
use crate::field::MaterialField;
use crate::persist::write_atomic;
use crate::quantize::to_coverage_byte;

/// Renders fields to images
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render the field to an RGBA image.
    ///
    /// `background` is only used when `transparent` is false and must match
    /// the field dimensions.
    pub fn render(
        &self,
        field: &MaterialField,
        transparent: bool,
        background: Option<&RgbaImage>,
    ) -> ChiselResult<RgbaImage> {
        self.render_with(field, transparent, background, None)
    }

    /// [`Exporter::render`], checking `cancel` between row chunks
    pub fn render_cancellable(
        &self,
        field: &MaterialField,
        transparent: bool,
        background: Option<&RgbaImage>,
        cancel: &CancelToken,
    ) -> ChiselResult<RgbaImage> {
        self.render_with(field, transparent, background, Some(cancel))
    }

    fn render_with(
        &self,
        field: &MaterialField,
        transparent: bool,
        background: Option<&RgbaImage>,
        cancel: Option<&CancelToken>,
    ) -> ChiselResult<RgbaImage> {
        let (width, height) = field.dimensions();
        let background = if transparent {
            if background.is_some() {
                debug!("Exporter::render: transparent export ignores the background image");
            }
            None
        } else {
            if let Some(image) = background {
                if image.dimensions() != (width, height) {
                    return Err(ChiselError::dimensions((width, height), image.dimensions()));
                }
            }
            background
        };

        let silhouette = field.silhouette();
        let coverage = field.coverage();
        let mut out = RgbaImage::new(width, height);

        for y in 0..height {
            if y as usize % ROW_CHUNK == 0 {
                checkpoint(cancel)?;
            }
            for x in 0..width {
                let index = y as usize * width as usize + x as usize;
                let alpha = to_coverage_byte(coverage[index]);
                let stone = silhouette
                    .texture_at(index)
                    .unwrap_or(self.config.stone_color);

                let pixel = if transparent {
                    if alpha == 0 {
                        [0, 0, 0, 0]
                    } else {
                        [stone[0], stone[1], stone[2], alpha]
                    }
                } else {
                    let backdrop = background
                        .map(|image| image.get_pixel(x, y).0)
                        .unwrap_or(self.config.background_color);
                    composite_over(stone, alpha, backdrop)
                };
                out.put_pixel(x, y, Rgba(pixel));
            }
        }

        Ok(out)
    }

    /// Render and write a PNG atomically
    pub fn export_image(
        &self,
        field: &MaterialField,
        destination: impl AsRef<Path>,
        transparent: bool,
        background: Option<&RgbaImage>,
    ) -> ChiselResult<()> {
        let destination = destination.as_ref();
        let image = self.render(field, transparent, background)?;
        write_atomic(destination, &encode_png(&image)?)?;
        info!(
            "Exported {}x{} image to {} (transparent={})",
            image.width(),
            image.height(),
            destination.display(),
            transparent
        );
        Ok(())
    }

    /// [`Exporter::export_image`], checking `cancel` while rendering
    pub fn export_image_cancellable(
        &self,
        field: &MaterialField,
        destination: impl AsRef<Path>,
        transparent: bool,
        background: Option<&RgbaImage>,
        cancel: &CancelToken,
    ) -> ChiselResult<()> {
        let image = self.render_cancellable(field, transparent, background, cancel)?;
        let bytes = encode_png(&image)?;
        cancel.check()?;
        write_atomic(destination.as_ref(), &bytes)?;
        Ok(())
    }
}

/// Encode an image to PNG bytes in memory
pub fn encode_png(image: &RgbaImage) -> ChiselResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buf.into_inner())
}

/// Straight-alpha "over": stone with `alpha` on top of `backdrop`
fn composite_over(stone: [u8; 3], alpha: u8, backdrop: [u8; 4]) -> [u8; 4] {
    let src_a = alpha as f32 / 255.0;
    let dst_a = backdrop[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let channel = |s: u8, d: u8| -> u8 {
        let value = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(stone[0], backdrop[0]),
        channel(stone[1], backdrop[1]),
        channel(stone[2], backdrop[2]),
        (out_a * 255.0).round() as u8,
    ]
}
