//! Gesture queue between pointer handling and the transition controller.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::protocol::GestureEvent;
use transition_core::{EventOutcome, FrameClock, TransitionController};

pub const GESTURE_QUEUE_CAPACITY: usize = 256;

pub fn dispatch_gesture_event(
    gesture_tx: &Sender<GestureEvent>,
    event: GestureEvent,
    status: &mut String,
) {
    let event_name = event.name();
    match gesture_tx.try_send(event) {
        Ok(()) => tracing::trace!(event = event_name, "queued gesture event"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(event = event_name, "gesture queue full; dropping sample");
            *status = "Input queue is full; gesture sample dropped".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Gesture queue disconnected; input is no longer processed".to_string();
        }
    }
}

/// Applies every queued event in arrival order. Returns how many were applied.
pub fn drain_gesture_events<C: FrameClock>(
    gesture_rx: &Receiver<GestureEvent>,
    controller: &mut TransitionController<C>,
    status: &mut String,
) -> usize {
    let mut applied = 0;
    while let Ok(event) = gesture_rx.try_recv() {
        applied += 1;
        match controller.apply(event) {
            EventOutcome::End(end) if end.is_commit() => {
                *status = format!("Switched to {}", end.transaction().spec.target_mode.label());
            }
            EventOutcome::Toggle(tx) => {
                *status = format!("Switched to {}", tx.spec.target_mode.label());
            }
            EventOutcome::Cancel(Some(_)) => {
                *status = "Gesture cancelled".to_string();
            }
            EventOutcome::Drag(_) | EventOutcome::End(_) | EventOutcome::Cancel(None) => {}
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use shared::domain::{Mode, Translation};
    use transition_core::ManualClock;

    use super::*;

    #[test]
    fn drains_events_in_order_into_controller() {
        let (tx, rx) = bounded(8);
        let mut status = String::new();
        dispatch_gesture_event(&tx, GestureEvent::Changed(Translation::vertical(-10.0)), &mut status);
        dispatch_gesture_event(&tx, GestureEvent::Changed(Translation::vertical(-90.0)), &mut status);
        dispatch_gesture_event(&tx, GestureEvent::Ended(Translation::vertical(-90.0)), &mut status);
        assert!(status.is_empty());

        let mut controller = TransitionController::with_clock(ManualClock::shared());
        let applied = drain_gesture_events(&rx, &mut controller, &mut status);

        assert_eq!(applied, 3);
        assert_eq!(controller.current_state().mode, Mode::Browse);
        assert_eq!(status, "Switched to browse");
    }

    #[test]
    fn full_queue_reports_dropped_sample() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        dispatch_gesture_event(&tx, GestureEvent::Toggle, &mut status);
        dispatch_gesture_event(&tx, GestureEvent::Toggle, &mut status);
        assert!(status.contains("full"));
    }

    #[test]
    fn disconnected_queue_is_reported() {
        let (tx, rx) = bounded::<GestureEvent>(1);
        drop(rx);
        let mut status = String::new();
        dispatch_gesture_event(&tx, GestureEvent::Cancelled, &mut status);
        assert!(status.contains("disconnected"));
    }
}
