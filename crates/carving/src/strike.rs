//! Pointer gesture tracking
//!
//! [`StrikeTracker`] turns a pointer down/move/up sequence into discrete
//! [`Strike`] segments annotated with elapsed time, so the carve step can
//! stay stateless.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One recorded pointer sample, as hosts and stroke scripts deliver them.
///
/// Positions are field cell coordinates; `t` is seconds on any monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f32, y: f32, t: f64 },
    Move { x: f32, y: f32, t: f64 },
    Up { t: f64 },
}

/// One incremental pointer movement, the unit of carving input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    from: Vec2,
    to: Vec2,
    elapsed: f64,
}

impl Strike {
    /// Create a strike. Returns None unless `elapsed` is finite and positive.
    pub fn new(from: Vec2, to: Vec2, elapsed: f64) -> Option<Self> {
        if elapsed.is_finite() && elapsed > 0.0 {
            Some(Self { from, to, elapsed })
        } else {
            None
        }
    }

    #[inline]
    pub fn from(&self) -> Vec2 {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Vec2 {
        self.to
    }

    /// Seconds between the two samples, always > 0
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Segment length in cells
    #[inline]
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    /// Swing speed in cells per second
    #[inline]
    pub fn speed(&self) -> f32 {
        (self.length() as f64 / self.elapsed) as f32
    }
}

/// Tracker state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrikeState {
    #[default]
    Idle,
    Stroking { last_pos: Vec2, last_time: f64 },
}

/// Converts pointer samples into strikes
#[derive(Debug, Default)]
pub struct StrikeTracker {
    state: StrikeState,
}

impl StrikeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> StrikeState {
        self.state
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        matches!(self.state, StrikeState::Stroking { .. })
    }

    /// Pointer down. A begin while already stroking ends the old stroke
    /// first (release events can be lost). Samples with a non-finite
    /// timestamp or position are ignored.
    pub fn begin(&mut self, pos: Vec2, timestamp: f64) {
        if !timestamp.is_finite() || !pos.is_finite() {
            warn!(
                "StrikeTracker::begin: ignoring sample at {} (t={})",
                pos, timestamp
            );
            return;
        }
        if let StrikeState::Stroking { last_time, .. } = self.state {
            debug!("StrikeTracker::begin while stroking, ending previous stroke");
            self.end(last_time.max(timestamp));
        }
        self.state = StrikeState::Stroking {
            last_pos: pos,
            last_time: timestamp,
        };
    }

    /// Pointer move. Emits a strike from the last sample, or None when idle
    /// or when the timestamp does not advance.
    pub fn move_to(&mut self, pos: Vec2, timestamp: f64) -> Option<Strike> {
        let StrikeState::Stroking {
            last_pos,
            last_time,
        } = self.state
        else {
            return None;
        };

        // Duplicate or out-of-order delivery from the host
        if !(timestamp > last_time) {
            warn!(
                "StrikeTracker::move_to: discarding sample at t={} (last t={})",
                timestamp, last_time
            );
            return None;
        }

        let strike = Strike::new(last_pos, pos, timestamp - last_time)?;
        self.state = StrikeState::Stroking {
            last_pos: pos,
            last_time: timestamp,
        };
        Some(strike)
    }

    /// Pointer up. Never emits a strike.
    pub fn end(&mut self, _timestamp: f64) {
        self.state = StrikeState::Idle;
    }
}
