//! Pointer samples turned into gesture events.

use shared::{domain::Translation, protocol::GestureEvent};

/// Tracks a single pointer from press to release and reports translation
/// from the press origin.
///
/// A press that never moves is a click and produces no gesture.
#[derive(Debug, Default)]
pub struct PointerTracker {
    origin: Option<[f32; 2]>,
    last: Option<Translation>,
}

impl PointerTracker {
    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    pub fn gesture_in_progress(&self) -> bool {
        self.last.is_some()
    }

    pub fn press(&mut self, at: [f32; 2]) {
        self.origin = Some(at);
        self.last = None;
    }

    pub fn moved(&mut self, at: [f32; 2]) -> Option<GestureEvent> {
        let translation = self.translation_to(at)?;
        if self.last == Some(translation) {
            return None;
        }
        self.last = Some(translation);
        Some(GestureEvent::Changed(translation))
    }

    pub fn release(&mut self, at: Option<[f32; 2]>) -> Option<GestureEvent> {
        let translation = at
            .and_then(|at| self.translation_to(at))
            .or(self.last);
        let started = self.last.is_some();
        self.reset();
        match (started, translation) {
            (true, Some(translation)) => Some(GestureEvent::Ended(translation)),
            _ => None,
        }
    }

    /// The platform took the pointer away (focus loss, escape).
    pub fn lost(&mut self) -> Option<GestureEvent> {
        let started = self.last.is_some();
        self.reset();
        started.then_some(GestureEvent::Cancelled)
    }

    fn translation_to(&self, at: [f32; 2]) -> Option<Translation> {
        let origin = self.origin?;
        Some(Translation::new(
            f64::from(at[0] - origin[0]),
            f64::from(at[1] - origin[1]),
        ))
    }

    fn reset(&mut self) {
        self.origin = None;
        self.last = None;
    }
}
