use std::sync::Arc;

use super::*;

fn controller() -> (TransitionController<Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = ManualClock::shared();
    (TransitionController::with_clock(clock.clone()), clock)
}

fn settle(controller: &mut TransitionController<Arc<ManualClock>>, clock: &ManualClock) {
    clock.advance(controller.curve().settle_duration() + Duration::from_millis(1));
    let frame = controller.presentation();
    assert!(frame.animation.is_none());
}

#[test]
fn starts_at_rest_in_preview() {
    let (mut controller, _clock) = controller();
    assert_eq!(controller.current_state(), TransitionState::default());
    assert!(!controller.is_animating());

    let frame = controller.presentation();
    assert_eq!(frame.mode, Mode::Preview);
    assert_eq!(frame.offset_y, 0.0);
    assert_eq!(frame.progress, 1.0);
    assert!(frame.animation.is_none());
}

#[test]
fn first_sample_starts_gesture_even_when_gated() {
    let (mut controller, _clock) = controller();
    let outcome = controller.on_drag_changed(Translation::new(50.0, -40.0));
    assert_eq!(outcome, DragOutcome::Gated);

    let state = controller.current_state();
    assert!(state.is_dragging);
    assert_eq!(state.offset_y, 0.0);
    assert_eq!(
        controller.last_translation(),
        Some(Translation::new(50.0, -40.0))
    );
}

#[test]
fn toggle_attaches_spring_transaction_to_browse() {
    let (mut controller, clock) = controller();
    let tx = controller.toggle_screen();

    assert_eq!(tx.from_offset_y, 0.0);
    assert_eq!(tx.spec.target_mode, Mode::Browse);
    assert_eq!(tx.spec.target_offset_y, COLLAPSED_PREVIEW_OFFSET);
    assert_eq!(tx.spec.easing, SpringCurve::default().easing());
    assert!(tx.spec.duration_secs > 0.0);

    // Field writes land immediately; only the reader interpolates.
    let state = controller.current_state();
    assert_eq!(state.mode, Mode::Browse);
    assert_eq!(state.offset_y, COLLAPSED_PREVIEW_OFFSET);

    clock.advance(Duration::from_millis(100));
    let frame = controller.presentation();
    assert!(frame.offset_y < 0.0 && frame.offset_y > COLLAPSED_PREVIEW_OFFSET);
    assert!(frame.progress > 0.0 && frame.progress < 1.0);
    assert_eq!(frame.animation, Some(tx.spec));
    assert!(controller.is_animating());
}

#[test]
fn presentation_retires_finished_transaction() {
    let (mut controller, clock) = controller();
    controller.toggle_screen();
    settle(&mut controller, &clock);

    assert!(controller.transaction().is_none());
    let frame = controller.presentation();
    assert_eq!(frame.offset_y, COLLAPSED_PREVIEW_OFFSET);
    assert_eq!(frame.progress, 1.0);
}

#[test]
fn new_gesture_freezes_in_flight_animation_at_presented_value() {
    let (mut controller, clock) = controller();
    controller.on_drag_changed(Translation::vertical(10.0));
    controller.on_drag_ended(Translation::vertical(10.0));
    // 4 / log10(10) = 4, so the snap-back runs from 4 toward 0.

    clock.advance(Duration::from_millis(40));
    let presented = controller.presentation().offset_y;
    assert!(presented > 0.0 && presented < 4.0, "{presented}");

    // A gated sample still starts the gesture and stops the animation.
    let outcome = controller.on_drag_changed(Translation::new(30.0, 5.0));
    assert_eq!(outcome, DragOutcome::Gated);
    assert!(controller.transaction().is_none());
    assert_eq!(controller.current_state().offset_y, presented);

    clock.advance(Duration::from_secs(2));
    assert_eq!(controller.presentation().offset_y, presented);
}

#[test]
fn downward_sample_after_interruption_accumulates_on_frozen_value() {
    let (mut controller, clock) = controller();
    controller.toggle_screen();
    clock.advance(Duration::from_millis(50));
    let presented = controller.presentation().offset_y;

    let outcome = controller.on_drag_changed(Translation::vertical(100.0));
    let offset = outcome.offset_y().expect("damped");
    assert!((offset - (presented + 2.0)).abs() < 1e-9);
    assert_eq!(controller.current_state().mode, Mode::Browse);
}

#[test]
fn samples_after_mid_gesture_toggle_take_over_the_animation() {
    let (mut controller, clock) = controller();
    controller.on_drag_changed(Translation::vertical(-100.0));
    let tx = controller.toggle_screen();
    assert_eq!(tx.from_offset_y, -100.0);
    assert!(tx.spec.changes_mode());

    clock.advance(Duration::from_millis(50));
    assert!(controller.is_animating());

    controller.on_drag_changed(Translation::vertical(-200.0));
    assert!(controller.transaction().is_none());
    assert!(!controller.is_animating());

    let frame = controller.presentation();
    assert_eq!(controller.current_state().offset_y, -200.0);
    assert_eq!(frame.offset_y, -200.0);
    assert!(frame.animation.is_none());
    assert!(frame.is_dragging);
}

#[test]
fn toggle_mid_flight_starts_from_presented_value() {
    let (mut controller, clock) = controller();
    controller.toggle_screen();
    clock.advance(Duration::from_millis(80));
    let presented = controller.presentation().offset_y;

    let tx = controller.toggle_screen();
    assert_eq!(tx.from_offset_y, presented);
    assert_eq!(tx.spec.target_mode, Mode::Preview);
    assert_eq!(tx.spec.target_offset_y, 0.0);
}

#[test]
fn cancel_snaps_back_without_committing() {
    let (mut controller, _clock) = controller();
    controller.on_drag_changed(Translation::vertical(-300.0));

    let tx = controller.cancel().expect("gesture in progress");
    assert_eq!(tx.from_offset_y, -300.0);
    assert_eq!(tx.spec.target_offset_y, 0.0);

    let state = controller.current_state();
    assert_eq!(state.mode, Mode::Preview);
    assert_eq!(state.offset_y, 0.0);
    assert!(!state.is_dragging);
}

#[test]
fn cancel_in_browse_snaps_offset_to_zero_and_keeps_mode() {
    let (mut controller, clock) = controller();
    controller.toggle_screen();
    settle(&mut controller, &clock);

    controller.on_drag_changed(Translation::vertical(-120.0));
    let tx = controller.cancel().expect("gesture in progress");
    assert_eq!(tx.spec.from_mode, Mode::Browse);
    assert_eq!(tx.spec.target_mode, Mode::Browse);
    assert_eq!(tx.spec.target_offset_y, 0.0);
    assert!(!tx.spec.changes_mode());

    let state = controller.current_state();
    assert_eq!(state.mode, Mode::Browse);
    assert_eq!(state.offset_y, 0.0);
}

#[test]
fn cancel_without_gesture_is_noop() {
    let (mut controller, _clock) = controller();
    assert_eq!(controller.cancel(), None);
    assert_eq!(controller.current_state(), TransitionState::default());
    assert!(controller.transaction().is_none());
}

#[test]
fn apply_dispatches_every_event_kind() {
    let (mut controller, clock) = controller();

    let outcome = controller.apply(GestureEvent::Changed(Translation::vertical(-50.0)));
    assert_eq!(
        outcome,
        EventOutcome::Drag(DragOutcome::Tracked { offset_y: -50.0 })
    );

    let outcome = controller.apply(GestureEvent::Ended(Translation::vertical(-50.0)));
    assert!(matches!(outcome, EventOutcome::End(end) if end.is_commit()));
    settle(&mut controller, &clock);

    assert!(matches!(
        controller.apply(GestureEvent::Toggle),
        EventOutcome::Toggle(tx) if tx.spec.target_mode == Mode::Preview
    ));
    assert_eq!(
        controller.apply(GestureEvent::Cancelled),
        EventOutcome::Cancel(None)
    );
}

#[test]
fn end_without_samples_evaluates_resting_offset() {
    let (mut controller, _clock) = controller();
    let outcome = controller.on_drag_ended(Translation::ZERO);
    assert!(!outcome.is_commit());
    assert_eq!(outcome.transaction().spec.target_offset_y, 0.0);
    assert_eq!(controller.current_state().mode, Mode::Preview);
}

#[test]
fn custom_curve_is_carried_into_animation_spec() {
    let clock = ManualClock::shared();
    let curve = SpringCurve::new(0.3, 1.0);
    let mut controller = TransitionController::with_clock(clock).with_curve(curve);

    let tx = controller.toggle_screen();
    assert_eq!(tx.spec.easing, curve.easing());
    assert_eq!(tx.spec.duration_secs, curve.settle_duration().as_secs_f64());
}

#[test]
fn presented_frame_serializes_for_tooling() {
    let (mut controller, _clock) = controller();
    controller.toggle_screen();
    let json = serde_json::to_value(controller.presentation()).expect("json");
    assert_eq!(json["mode"], "browse");
    assert_eq!(json["animation"]["target_offset_y"], COLLAPSED_PREVIEW_OFFSET);
    assert_eq!(json["animation"]["easing"]["kind"], "spring");
}
