//! Material removal along a strike
//!
//! A strike's speed picks a footprint radius; circular footprints are then
//! stamped along the segment at a step no larger than the radius, so
//! consecutive footprints always overlap. Every cell whose center lies
//! within the radius of a stamp loses up to `intensity` material.

use chisel_config::CarveConfig;
use glam::Vec2;
use tracing::debug;

use crate::field::MaterialField;
use crate::strike::Strike;

/// Footprint radius for a strike, clamped to the configured range
#[inline]
pub fn footprint_radius(strike: &Strike, config: &CarveConfig) -> f32 {
    config.radius_for_speed(strike.speed())
}

/// Carve one strike into the field. Returns the total material removed.
pub fn apply(field: &mut MaterialField, strike: &Strike, config: &CarveConfig) -> f32 {
    let radius = footprint_radius(strike, config);
    let intensity = config.intensity.clamp(0.0, 1.0);
    let step = radius * config.spacing.clamp(f32::EPSILON, 1.0);

    let length = strike.length();
    let steps = if length > 0.0 && step > 0.0 {
        (length / step).ceil() as u32
    } else {
        0
    };

    let mut removed = 0.0;
    for i in 0..=steps {
        let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
        let center = strike.from().lerp(strike.to(), t);
        removed += stamp(field, center, radius, intensity);
    }

    debug!(
        "carve::apply: ({:.1}, {:.1}) -> ({:.1}, {:.1}), speed={:.1}, radius={:.2}, stamps={}, removed={:.3}",
        strike.from().x,
        strike.from().y,
        strike.to().x,
        strike.to().y,
        strike.speed(),
        radius,
        steps + 1,
        removed
    );

    removed
}

/// Remove `intensity` from every cell whose center is within `radius` of
/// `center`. Returns the material removed.
pub fn stamp(field: &mut MaterialField, center: Vec2, radius: f32, intensity: f32) -> f32 {
    if !(radius > 0.0) || !(intensity > 0.0) {
        return 0.0;
    }

    // Cell (x, y) has its center at (x + 0.5, y + 0.5)
    let x_min = (center.x - radius - 0.5).floor().max(0.0) as i64;
    let y_min = (center.y - radius - 0.5).floor().max(0.0) as i64;
    let x_max = ((center.x + radius - 0.5).ceil() as i64).min(field.width() as i64 - 1);
    let y_max = ((center.y + radius - 0.5).ceil() as i64).min(field.height() as i64 - 1);

    if x_min > x_max || y_min > y_max {
        return 0.0;
    }

    let radius_sq = radius * radius;
    let mut removed = 0.0;
    for y in y_min..=y_max {
        let dy = y as f32 + 0.5 - center.y;
        for x in x_min..=x_max {
            let dx = x as f32 + 0.5 - center.x;
            if dx * dx + dy * dy <= radius_sq {
                removed += field.apply_removal(x, y, intensity);
            }
        }
    }
    removed
}
