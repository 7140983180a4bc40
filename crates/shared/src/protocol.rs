use serde::{Deserialize, Serialize};

use crate::{
    domain::{Mode, Translation},
    error::ScriptError,
};

/// One event emitted by an input source.
///
/// A gesture is a run of `Changed` samples closed by one `Ended` or
/// `Cancelled`. An `Ended` with no samples before it is a gesture of its own,
/// and a `Cancelled` outside a gesture is ignored. `Toggle` is the explicit
/// mode-switch control and only occurs between gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GestureEvent {
    Changed(Translation),
    Ended(Translation),
    Cancelled,
    Toggle,
}

impl GestureEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Changed(_) => "changed",
            Self::Ended(_) => "ended",
            Self::Cancelled => "cancelled",
            Self::Toggle => "toggle",
        }
    }
}

/// Easing curve attached to an animated commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    /// Damped spring. `response` is the undamped period in seconds,
    /// `damping_fraction` is the damping ratio (1.0 is critically damped).
    Spring {
        response: f64,
        damping_fraction: f64,
    },
}

/// What a renderer needs to interpolate one committed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub target_offset_y: f64,
    /// Mode in effect when the transaction started.
    pub from_mode: Mode,
    pub target_mode: Mode,
    pub easing: Easing,
    pub duration_secs: f64,
}

impl AnimationSpec {
    /// False for snap-backs, which only move the offset.
    pub fn changes_mode(&self) -> bool {
        self.from_mode != self.target_mode
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub at_ms: u64,
    pub event: GestureEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    #[serde(default)]
    pub events: Vec<ScriptedEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    Json,
    Toml,
}

impl ScriptFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

pub fn parse_script(raw: &str, format: ScriptFormat) -> Result<GestureScript, ScriptError> {
    let script: GestureScript = match format {
        ScriptFormat::Json => serde_json::from_str(raw)?,
        ScriptFormat::Toml => toml::from_str(raw)?,
    };
    validate_script(&script)?;
    Ok(script)
}

/// Checks that a script respects the input source contract.
pub fn validate_script(script: &GestureScript) -> Result<(), ScriptError> {
    if script.events.is_empty() {
        return Err(ScriptError::Empty);
    }

    let mut previous_ms = 0;
    let mut open_gesture: Option<usize> = None;

    for (index, scripted) in script.events.iter().enumerate() {
        if scripted.at_ms < previous_ms {
            return Err(ScriptError::OutOfOrder {
                index,
                at_ms: scripted.at_ms,
                previous_ms,
            });
        }
        previous_ms = scripted.at_ms;

        match scripted.event {
            GestureEvent::Changed(_) => {
                open_gesture.get_or_insert(index);
            }
            GestureEvent::Ended(_) | GestureEvent::Cancelled => {
                open_gesture = None;
            }
            GestureEvent::Toggle => {
                if let Some(started_at) = open_gesture {
                    return Err(ScriptError::ToggleDuringGesture { index, started_at });
                }
            }
        }
    }

    match open_gesture {
        Some(started_at) => Err(ScriptError::UnterminatedGesture { started_at }),
        None => Ok(()),
    }
}
