use std::time::Duration;

use serde::Serialize;
use shared::{
    domain::{Mode, Translation},
    protocol::{AnimationSpec, GestureEvent},
};
use tracing::{debug, info};

pub mod clock;
pub mod gesture;
pub mod spring;

pub use clock::{FrameClock, ManualClock, MonotonicClock};
pub use gesture::DragOutcome;
pub use spring::SpringCurve;

/// Upper bound on a negative resting offset for a gesture to commit.
///
/// The comparison only runs for offsets already below zero, so every
/// negative offset commits.
pub const COMMIT_THRESHOLD: f64 = 240.0;
/// Offset that pushes the preview region out of view once Browse is committed.
pub const COLLAPSED_PREVIEW_OFFSET: f64 = -760.0;

pub fn resting_offset(mode: Mode) -> f64 {
    match mode {
        Mode::Preview => 0.0,
        Mode::Browse => COLLAPSED_PREVIEW_OFFSET,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionState {
    pub mode: Mode,
    pub offset_y: f64,
    pub is_dragging: bool,
}

impl Default for TransitionState {
    fn default() -> Self {
        Self {
            mode: Mode::Preview,
            offset_y: resting_offset(Mode::Preview),
            is_dragging: false,
        }
    }
}

/// One atomic, animatable batch of controller writes.
///
/// The controller never moves the offset over time. Readers interpolate from
/// `from_offset_y` toward `spec.target_offset_y` along the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    pub from_offset_y: f64,
    pub spec: AnimationSpec,
    pub started_at: Duration,
    curve: SpringCurve,
}

impl Transaction {
    fn new(
        from_offset_y: f64,
        from_mode: Mode,
        target_mode: Mode,
        target_offset_y: f64,
        curve: SpringCurve,
        started_at: Duration,
    ) -> Self {
        Self {
            from_offset_y,
            spec: AnimationSpec {
                target_offset_y,
                from_mode,
                target_mode,
                easing: curve.easing(),
                duration_secs: curve.settle_duration().as_secs_f64(),
            },
            started_at,
            curve,
        }
    }

    fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    pub fn value_at(&self, now: Duration) -> f64 {
        self.curve
            .value_at(self.from_offset_y, self.spec.target_offset_y, self.elapsed(now))
    }

    pub fn progress_at(&self, now: Duration) -> f64 {
        self.curve.progress_at(self.elapsed(now))
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.elapsed(now) >= self.curve.settle_duration()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndOutcome {
    /// The gesture flipped the mode.
    Committed(Transaction),
    /// The offset animates back to zero, mode unchanged.
    SnappedBack(Transaction),
}

impl EndOutcome {
    pub fn transaction(&self) -> &Transaction {
        match self {
            Self::Committed(tx) | Self::SnappedBack(tx) => tx,
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    Drag(DragOutcome),
    End(EndOutcome),
    /// `None` when no gesture was in progress.
    Cancel(Option<Transaction>),
    Toggle(Transaction),
}

/// What the presentation surface paints this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresentedFrame {
    pub mode: Mode,
    /// Interpolated offset at the time of the read.
    pub offset_y: f64,
    pub animation: Option<AnimationSpec>,
    /// Eased progress of the in-flight transaction, 1.0 at rest.
    pub progress: f64,
    pub is_dragging: bool,
}

pub struct TransitionController<C: FrameClock = MonotonicClock> {
    state: TransitionState,
    last_translation: Option<Translation>,
    transaction: Option<Transaction>,
    curve: SpringCurve,
    clock: C,
}

impl TransitionController<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for TransitionController<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FrameClock> TransitionController<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: TransitionState::default(),
            last_translation: None,
            transaction: None,
            curve: SpringCurve::default(),
            clock,
        }
    }

    pub fn with_curve(mut self, curve: SpringCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn current_state(&self) -> TransitionState {
        self.state
    }

    pub fn curve(&self) -> SpringCurve {
        self.curve
    }

    pub fn last_translation(&self) -> Option<Translation> {
        self.last_translation
    }

    /// The most recent transaction, until a read retires it or a gesture
    /// interrupts it.
    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        let now = self.clock.now();
        self.transaction.is_some_and(|tx| !tx.is_complete(now))
    }

    pub fn apply(&mut self, event: GestureEvent) -> EventOutcome {
        match event {
            GestureEvent::Changed(translation) => {
                EventOutcome::Drag(self.on_drag_changed(translation))
            }
            GestureEvent::Ended(translation) => EventOutcome::End(self.on_drag_ended(translation)),
            GestureEvent::Cancelled => EventOutcome::Cancel(self.cancel()),
            GestureEvent::Toggle => EventOutcome::Toggle(self.toggle_screen()),
        }
    }

    pub fn on_drag_changed(&mut self, translation: Translation) -> DragOutcome {
        self.begin_gesture();
        self.last_translation = Some(translation);

        let outcome = gesture::interpret(translation, self.state.offset_y);
        if let Some(offset_y) = outcome.offset_y() {
            self.state.offset_y = offset_y;
        }

        debug!(
            dx = translation.dx,
            dy = translation.dy,
            outcome = outcome.label(),
            offset_y = self.state.offset_y,
            "drag sample"
        );
        outcome
    }

    pub fn on_drag_ended(&mut self, translation: Translation) -> EndOutcome {
        self.begin_gesture();
        self.last_translation = Some(translation);
        self.state.is_dragging = false;

        let offset_y = self.state.offset_y;
        if offset_y < 0.0 && offset_y < COMMIT_THRESHOLD {
            info!(offset_y, dy = translation.dy, "drag committed");
            return EndOutcome::Committed(self.toggle_screen());
        }

        debug!(offset_y, dy = translation.dy, "drag snapped back");
        let mode = self.state.mode;
        EndOutcome::SnappedBack(self.animate_to(mode, 0.0))
    }

    /// Platform interruption. Takes the snap-back branch of
    /// [`Self::on_drag_ended`] whatever the offset: back to 0, mode unchanged.
    pub fn cancel(&mut self) -> Option<Transaction> {
        if !self.state.is_dragging {
            return None;
        }
        self.state.is_dragging = false;

        let mode = self.state.mode;
        debug!(
            offset_y = self.state.offset_y,
            last_dy = self.last_translation.map(|t| t.dy),
            "drag cancelled"
        );
        Some(self.animate_to(mode, 0.0))
    }

    pub fn toggle_screen(&mut self) -> Transaction {
        let from = self.state.mode;
        let mode = from.toggled();
        info!(from = from.label(), to = mode.label(), "toggling screen");
        self.animate_to(mode, resting_offset(mode))
    }

    /// Reads the frame to paint now and retires a finished transaction.
    pub fn presentation(&mut self) -> PresentedFrame {
        let now = self.clock.now();
        if self.transaction.is_some_and(|tx| tx.is_complete(now)) {
            self.transaction = None;
            debug!(offset_y = self.state.offset_y, "settle animation finished");
        }

        match self.transaction {
            Some(tx) => PresentedFrame {
                mode: self.state.mode,
                offset_y: tx.value_at(now),
                animation: Some(tx.spec),
                progress: tx.progress_at(now),
                is_dragging: self.state.is_dragging,
            },
            None => PresentedFrame {
                mode: self.state.mode,
                offset_y: self.state.offset_y,
                animation: None,
                progress: 1.0,
                is_dragging: self.state.is_dragging,
            },
        }
    }

    /// Marks a gesture in progress and freezes any running animation at its
    /// presented value. Runs on every sample: a toggle issued mid-gesture
    /// must not keep animating under the pointer.
    fn begin_gesture(&mut self) {
        self.state.is_dragging = true;

        let now = self.clock.now();
        if let Some(tx) = self.transaction.take() {
            if !tx.is_complete(now) {
                self.state.offset_y = tx.value_at(now);
                debug!(
                    offset_y = self.state.offset_y,
                    target = tx.spec.target_offset_y,
                    "gesture interrupted settle animation"
                );
            }
        }
    }

    fn presented_offset(&self, now: Duration) -> f64 {
        match self.transaction {
            Some(tx) if !tx.is_complete(now) => tx.value_at(now),
            _ => self.state.offset_y,
        }
    }

    fn animate_to(&mut self, mode: Mode, target_offset_y: f64) -> Transaction {
        let now = self.clock.now();
        let from_offset_y = self.presented_offset(now);
        let from_mode = self.state.mode;

        self.state.mode = mode;
        self.state.offset_y = target_offset_y;

        let tx = Transaction::new(
            from_offset_y,
            from_mode,
            mode,
            target_offset_y,
            self.curve,
            now,
        );
        self.transaction = Some(tx);
        tx
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
