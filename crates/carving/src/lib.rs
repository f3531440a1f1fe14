//! Rock carving engine
//!
//! This crate provides the core of a digital sculpting toy where a pointer
//! "chisel" wears material off a rock:
//! - [`silhouette`] - Immutable rock outline and stone texture
//! - [`field`] - Per-cell material coverage with dirty tile tracking
//! - [`strike`] - Pointer samples to timed strike segments
//! - [`carve`] - Speed-dependent material removal along a strike
//! - [`codec`] - `.chisel-project` save and load
//! - [`export`] - PNG rasterization
//! - [`saves`] - "Save as" file naming
//! - [`session`] - Host-facing facade tying the above together

pub mod cancel;
pub mod carve;
pub mod codec;
pub mod constants;
pub mod error;
pub mod export;
pub mod field;
pub mod persist;
pub mod quantize;
pub mod saves;
pub mod session;
pub mod silhouette;
pub mod strike;

pub use cancel::*;
pub use constants::*;
pub use error::*;
pub use export::*;
pub use field::*;
pub use saves::*;
pub use session::*;
pub use silhouette::*;
pub use strike::*;

pub use chisel_config::{CarveConfig, ChiselConfig, ExportConfig, SpeedCurve};
pub use glam::Vec2;
