/// Project file format version written by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Size of the project file header in bytes (version, width, height).
pub const HEADER_LEN: usize = 12;

/// Largest coverage byte; maps to a pristine cell.
pub const COVERAGE_SCALE: f32 = 255.0;

/// Default tile size for dirty tracking, in cells.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// Rows processed between cancellation checks.
pub const ROW_CHUNK: usize = 32;
