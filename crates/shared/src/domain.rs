use serde::{Deserialize, Serialize};

/// Which presentation of the item collection is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Compact horizontal strip under the preview region.
    #[default]
    Preview,
    /// Expanded vertical grid.
    Browse,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Preview => Self::Browse,
            Self::Browse => Self::Preview,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Browse => "browse",
        }
    }
}

/// Cumulative pointer translation from the point where a gesture started.
///
/// Screen coordinates: positive `dy` points down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

impl Translation {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn vertical(dy: f64) -> Self {
        Self { dx: 0.0, dy }
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}
