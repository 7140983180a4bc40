//! Drag sample interpretation: the vertical gate and the offset formulas.

use serde::Serialize;
use shared::domain::Translation;

/// A sample is vertical iff `|dy| > VERTICAL_GATE_RATIO * |dx|`.
pub const VERTICAL_GATE_RATIO: f64 = 2.0;
pub const DOWNWARD_DAMPING_NUMERATOR: f64 = 4.0;
/// Smallest `|log10(dy)|` accepted as a damping divisor.
pub const MIN_LOG_DIVISOR: f64 = 1e-6;

/// What a single drag sample did to the offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragOutcome {
    /// Upward drag: the offset follows the pointer 1:1.
    Tracked { offset_y: f64 },
    /// Downward drag: the offset moved by a log-damped increment.
    Damped { increment: f64, offset_y: f64 },
    /// Not vertical enough; ignored.
    Gated,
    /// Would have produced a non-finite offset; ignored.
    Degenerate,
}

impl DragOutcome {
    pub fn offset_y(&self) -> Option<f64> {
        match self {
            Self::Tracked { offset_y } | Self::Damped { offset_y, .. } => Some(*offset_y),
            Self::Gated | Self::Degenerate => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tracked { .. } => "tracked",
            Self::Damped { .. } => "damped",
            Self::Gated => "gated",
            Self::Degenerate => "degenerate",
        }
    }
}

pub fn is_vertical(translation: Translation) -> bool {
    translation.dy.abs() > VERTICAL_GATE_RATIO * translation.dx.abs()
}

/// `4 / log10(dy)`, or `None` where the divisor vanishes or is undefined.
///
/// For `0 < dy < 1` the divisor is negative and so is the increment.
pub fn damped_increment(dy: f64) -> Option<f64> {
    if !dy.is_finite() || dy <= 0.0 {
        return None;
    }
    let divisor = dy.log10();
    if !divisor.is_finite() || divisor.abs() < MIN_LOG_DIVISOR {
        return None;
    }
    let increment = DOWNWARD_DAMPING_NUMERATOR / divisor;
    increment.is_finite().then_some(increment)
}

/// Applies one sample to `offset_y` without touching any state.
pub fn interpret(translation: Translation, offset_y: f64) -> DragOutcome {
    if !translation.is_finite() {
        return DragOutcome::Degenerate;
    }
    if !is_vertical(translation) {
        return DragOutcome::Gated;
    }

    if translation.dy < 0.0 {
        return DragOutcome::Tracked {
            offset_y: translation.dy,
        };
    }

    match damped_increment(translation.dy) {
        Some(increment) if (offset_y + increment).is_finite() => DragOutcome::Damped {
            increment,
            offset_y: offset_y + increment,
        },
        _ => DragOutcome::Degenerate,
    }
}
