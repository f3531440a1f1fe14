//! Pointer input for the carving session

use glam::Vec2;
use tracing::debug;

use crate::carve;
use crate::strike::{PointerEvent, StrikeState};

use super::ChiselSession;

impl ChiselSession {
    /// Pointer down at `pos` (field cell coordinates, `0..=width` by `0..=height`)
    pub fn begin_stroke(&mut self, pos: Vec2, timestamp: f64) {
        if self.input_suspended {
            debug!("begin_stroke: input suspended, ignoring");
            return;
        }
        let pos = self.clamp_to_field(pos);
        self.tracker.begin(pos, timestamp);
    }

    /// Pointer move. Carves the segment since the previous sample and
    /// returns the material removed.
    pub fn continue_stroke(&mut self, pos: Vec2, timestamp: f64) -> f32 {
        if self.input_suspended {
            debug!("continue_stroke: input suspended, ignoring");
            return 0.0;
        }
        let pos = self.clamp_to_field(pos);
        match self.tracker.move_to(pos, timestamp) {
            Some(strike) => carve::apply(&mut self.field, &strike, &self.carve),
            None => 0.0,
        }
    }

    /// Pointer up
    pub fn end_stroke(&mut self, timestamp: f64) {
        self.tracker.end(timestamp);
    }

    /// Dispatch one pointer sample. Returns the material removed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> f32 {
        match event {
            PointerEvent::Down { x, y, t } => {
                self.begin_stroke(Vec2::new(x, y), t);
                0.0
            }
            PointerEvent::Move { x, y, t } => self.continue_stroke(Vec2::new(x, y), t),
            PointerEvent::Up { t } => {
                self.end_stroke(t);
                0.0
            }
        }
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        self.tracker.is_stroking()
    }

    /// Stop accepting pointer input, ending any stroke in progress.
    ///
    /// Hosts call this while a menu is open or a file operation runs.
    pub fn suspend_input(&mut self) {
        self.finish_open_stroke();
        self.input_suspended = true;
    }

    pub fn resume_input(&mut self) {
        self.input_suspended = false;
    }

    pub fn is_input_suspended(&self) -> bool {
        self.input_suspended
    }

    /// End a stroke at its last sample time, if one is open
    pub(crate) fn finish_open_stroke(&mut self) {
        if let StrikeState::Stroking { last_time, .. } = self.tracker.state() {
            self.tracker.end(last_time);
        }
    }

    fn clamp_to_field(&self, pos: Vec2) -> Vec2 {
        let max = Vec2::new(self.field.width() as f32, self.field.height() as f32);
        debug_assert!(
            pos.is_finite() && pos.cmpge(Vec2::ZERO).all() && pos.cmple(max).all(),
            "pointer position {pos} outside the {}x{} field",
            self.field.width(),
            self.field.height()
        );
        let clamp = |value: f32, hi: f32| if value.is_nan() { 0.0 } else { value.clamp(0.0, hi) };
        Vec2::new(clamp(pos.x, max.x), clamp(pos.y, max.y))
    }
}

#[cfg(test)]
mod tests {
    use chisel_config::{CarveConfig, ChiselConfig};

    use crate::silhouette::Silhouette;

    use super::*;

    fn session() -> ChiselSession {
        let config = ChiselConfig {
            carve: CarveConfig::fixed_radius(2.0, 0.5),
            ..Default::default()
        };
        ChiselSession::new(Silhouette::full(40, 20).unwrap(), config).unwrap()
    }

    #[test]
    fn test_stroke_carves() {
        let mut session = session();
        session.begin_stroke(Vec2::new(5.0, 10.0), 0.0);
        assert!(session.is_stroking());

        let removed = session.continue_stroke(Vec2::new(30.0, 10.0), 0.1);
        assert!(removed > 0.0);
        assert!(session.field().get(20, 9).unwrap() < 1.0);
        assert_eq!(session.field().get(20, 0).unwrap(), 1.0);

        session.end_stroke(0.2);
        assert!(!session.is_stroking());
        assert_eq!(session.continue_stroke(Vec2::new(35.0, 10.0), 0.3), 0.0);
    }

    #[test]
    fn test_begin_does_not_carve() {
        let mut session = session();
        session.begin_stroke(Vec2::new(5.0, 10.0), 0.0);
        assert_eq!(session.remaining_fraction(), 1.0);
    }

    #[test]
    fn test_suspended_input_ignores_strokes() {
        let mut session = session();
        session.suspend_input();
        session.begin_stroke(Vec2::new(5.0, 10.0), 0.0);
        assert!(!session.is_stroking());
        assert_eq!(session.continue_stroke(Vec2::new(30.0, 10.0), 0.1), 0.0);
        assert_eq!(session.remaining_fraction(), 1.0);

        session.resume_input();
        session.begin_stroke(Vec2::new(5.0, 10.0), 0.0);
        assert!(session.continue_stroke(Vec2::new(30.0, 10.0), 0.1) > 0.0);
    }

    #[test]
    fn test_suspend_ends_open_stroke() {
        let mut session = session();
        session.begin_stroke(Vec2::new(5.0, 10.0), 0.0);
        session.suspend_input();
        session.resume_input();

        assert!(!session.is_stroking());
        assert_eq!(session.continue_stroke(Vec2::new(30.0, 10.0), 0.1), 0.0);
    }

    #[test]
    fn test_handle_pointer_sequence() {
        let mut session = session();
        let events = [
            PointerEvent::Down { x: 5.0, y: 10.0, t: 0.0 },
            PointerEvent::Move { x: 15.0, y: 10.0, t: 0.1 },
            PointerEvent::Move { x: 25.0, y: 10.0, t: 0.2 },
            PointerEvent::Up { t: 0.3 },
        ];

        let removed: f32 = events.into_iter().map(|e| session.handle_pointer(e)).sum();
        assert!(removed > 0.0);
        assert!(!session.is_stroking());
        assert!(session.field().get(15, 10).unwrap() < 1.0);
    }

    #[test]
    fn test_field_edges_are_accepted() {
        let mut session = session();
        session.begin_stroke(Vec2::new(0.0, 0.0), 0.0);
        assert!(session.continue_stroke(Vec2::new(40.0, 20.0), 0.5) > 0.0);
        assert!(session.field().get(0, 0).unwrap() < 1.0);
        assert!(session.field().get(39, 19).unwrap() < 1.0);
    }
}
