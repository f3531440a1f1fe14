//! Project file encoding
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! offset 0   u32  format version
//! offset 4   u32  width
//! offset 8   u32  height
//! offset 12  u8 * width * height   coverage, row-major, byte = round(c * 255)
//! ```
//!
//! Trailing bytes after the coverage payload are ignored.

use std::fs;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use tracing::info;

use crate::cancel::{CancelToken, checkpoint};
use crate::constants::{FORMAT_VERSION, HEADER_LEN, ROW_CHUNK};
use crate::error::{ChiselError, ChiselResult};
use crate::field::{MaterialField, pristine_for};
use crate::persist::write_atomic;
use crate::quantize::{from_coverage_byte, to_coverage_byte};
use crate::silhouette::Silhouette;

/// On-disk header. Fields are stored little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct ProjectHeader {
    format_version: u32,
    width: u32,
    height: u32,
}

impl ProjectHeader {
    fn into_le(self) -> Self {
        Self {
            format_version: self.format_version.to_le(),
            width: self.width.to_le(),
            height: self.height.to_le(),
        }
    }

    fn into_native(self) -> Self {
        Self {
            format_version: u32::from_le(self.format_version),
            width: u32::from_le(self.width),
            height: u32::from_le(self.height),
        }
    }
}

/// Serialize a field to project bytes
pub fn encode(field: &MaterialField) -> Vec<u8> {
    let mut bytes = header_bytes(field);
    bytes.extend(field.coverage().iter().map(|&c| to_coverage_byte(c)));
    bytes
}

/// Serialize a field, checking `cancel` between row chunks
pub fn encode_cancellable(field: &MaterialField, cancel: &CancelToken) -> ChiselResult<Vec<u8>> {
    let mut bytes = header_bytes(field);
    for rows in field.coverage().chunks(field.width() as usize * ROW_CHUNK) {
        cancel.check()?;
        bytes.extend(rows.iter().map(|&c| to_coverage_byte(c)));
    }
    Ok(bytes)
}

fn header_bytes(field: &MaterialField) -> Vec<u8> {
    let (width, height) = field.dimensions();
    let header = ProjectHeader {
        format_version: FORMAT_VERSION,
        width,
        height,
    }
    .into_le();

    let mut bytes = Vec::with_capacity(HEADER_LEN + field.coverage().len());
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    bytes
}

/// Rebuild a field from project bytes.
///
/// The stored dimensions must match `silhouette`. The returned field's
/// pristine baseline is a fresh, fully covered rock.
pub fn decode(bytes: &[u8], silhouette: &Silhouette) -> ChiselResult<MaterialField> {
    decode_with(bytes, silhouette, None)
}

/// [`decode`], checking `cancel` between row chunks
pub fn decode_cancellable(
    bytes: &[u8],
    silhouette: &Silhouette,
    cancel: &CancelToken,
) -> ChiselResult<MaterialField> {
    decode_with(bytes, silhouette, Some(cancel))
}

/// Stored `(width, height)` of project bytes.
///
/// Checks the header and that the coverage payload is complete, so the
/// returned size is safe to allocate a grid for.
pub fn peek_dimensions(bytes: &[u8]) -> ChiselResult<(u32, u32)> {
    let header = read_header(bytes)?;
    check_payload(bytes, &header)?;
    Ok((header.width, header.height))
}

fn read_header(bytes: &[u8]) -> ChiselResult<ProjectHeader> {
    if bytes.len() < HEADER_LEN {
        return Err(ChiselError::CorruptData(format!(
            "file is {} bytes, shorter than the {}-byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }
    let header = bytemuck::pod_read_unaligned::<ProjectHeader>(&bytes[..HEADER_LEN]).into_native();

    if header.format_version != FORMAT_VERSION {
        return Err(ChiselError::UnsupportedVersion {
            found: header.format_version,
            supported: FORMAT_VERSION,
        });
    }
    Ok(header)
}

/// Number of coverage bytes the header promises, or CorruptData when the
/// payload is shorter
fn check_payload(bytes: &[u8], header: &ProjectHeader) -> ChiselResult<usize> {
    let payload = bytes.len() - HEADER_LEN;
    let cells = (header.width as usize)
        .checked_mul(header.height as usize)
        .ok_or_else(|| {
            ChiselError::CorruptData(format!(
                "{}x{} grid is too large",
                header.width, header.height
            ))
        })?;
    if payload < cells {
        return Err(ChiselError::CorruptData(format!(
            "coverage payload has {payload} bytes, expected {cells}"
        )));
    }
    Ok(cells)
}

fn decode_with(
    bytes: &[u8],
    silhouette: &Silhouette,
    cancel: Option<&CancelToken>,
) -> ChiselResult<MaterialField> {
    let header = read_header(bytes)?;
    let found = (header.width, header.height);
    if found != silhouette.dimensions() {
        return Err(ChiselError::dimensions(silhouette.dimensions(), found));
    }

    let cells = check_payload(bytes, &header)?;
    let payload = &bytes[HEADER_LEN..];

    let mask = silhouette.mask();
    let row_chunk = header.width as usize * ROW_CHUNK;
    let mut coverage = Vec::with_capacity(cells);
    for (chunk_index, rows) in payload[..cells].chunks(row_chunk).enumerate() {
        checkpoint(cancel)?;
        let offset = chunk_index * row_chunk;
        for (i, &byte) in rows.iter().enumerate() {
            if byte != 0 && !mask[offset + i] {
                let index = offset + i;
                return Err(ChiselError::CorruptData(format!(
                    "material at ({}, {}) lies outside the rock",
                    index % header.width as usize,
                    index / header.width as usize
                )));
            }
            coverage.push(from_coverage_byte(byte));
        }
    }

    Ok(MaterialField::from_parts(
        silhouette.clone(),
        coverage,
        pristine_for(silhouette),
    ))
}

/// Write a project file atomically
pub fn save(field: &MaterialField, destination: impl AsRef<Path>) -> ChiselResult<()> {
    let destination = destination.as_ref();
    write_atomic(destination, &encode(field))?;
    info!(
        "Saved {}x{} project to {}",
        field.width(),
        field.height(),
        destination.display()
    );
    Ok(())
}

/// [`save`], checking `cancel` while encoding. A cancelled save writes nothing.
pub fn save_cancellable(
    field: &MaterialField,
    destination: impl AsRef<Path>,
    cancel: &CancelToken,
) -> ChiselResult<()> {
    let bytes = encode_cancellable(field, cancel)?;
    write_atomic(destination.as_ref(), &bytes)?;
    Ok(())
}

/// Read a project file for a rock with the given silhouette
pub fn load(source: impl AsRef<Path>, silhouette: &Silhouette) -> ChiselResult<MaterialField> {
    let source = source.as_ref();
    let bytes = fs::read(source)?;
    let field = decode(&bytes, silhouette)?;
    info!(
        "Loaded {}x{} project from {} ({:.1}% material remaining)",
        field.width(),
        field.height(),
        source.display(),
        field.remaining_fraction() * 100.0
    );
    Ok(field)
}

/// [`load`], checking `cancel` while decoding
pub fn load_cancellable(
    source: impl AsRef<Path>,
    silhouette: &Silhouette,
    cancel: &CancelToken,
) -> ChiselResult<MaterialField> {
    let bytes = fs::read(source.as_ref())?;
    decode_cancellable(&bytes, silhouette, cancel)
}
