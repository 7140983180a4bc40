use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to parse gesture script as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse gesture script as TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("gesture script contains no events")]
    Empty,
    #[error("event {index} at {at_ms}ms precedes the previous event at {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },
    #[error("event {index} requests a toggle while the gesture started at event {started_at} is in progress")]
    ToggleDuringGesture { index: usize, started_at: usize },
    #[error("gesture started at event {started_at} is never ended or cancelled")]
    UnterminatedGesture { started_at: usize },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("column count must be between {min} and {max}, got {actual}")]
    ColumnsOutOfRange { min: usize, max: usize, actual: usize },
    #[error("item count must be at least 1")]
    NoItems,
    #[error("window size must be positive, got {width}x{height}")]
    InvalidWindowSize { width: f32, height: f32 },
    #[error("{key} must be between {min} and {max}, got {actual}")]
    SpringOutOfRange {
        key: &'static str,
        min: f64,
        max: f64,
        actual: f64,
    },
}
