//! Geometry of the composed view for a given mode blend.
//!
//! `blend` runs from 0.0 (strip under the preview) to 1.0 (grid). The renderer
//! derives it from the controller's transaction so the layout change follows
//! the same spring as the offset.

use shared::domain::Mode;
use transition_core::PresentedFrame;

use crate::config::{MAX_COLUMNS, MIN_COLUMNS};

/// Chrome kept below the preview region in Preview mode.
pub const PREVIEW_CHROME_HEIGHT: f32 = 80.0;
pub const STRIP_HEIGHT: f32 = 80.0;
pub const STRIP_TILE_SIZE: [f32; 2] = [80.0, 64.0];
pub const BROWSE_SPACING: f32 = 160.0;
pub const GRID_TILE_HEIGHT: f32 = 240.0;
pub const GRID_TILE_INSET: f32 = 60.0;
pub const MIN_GRID_TILE_WIDTH: f32 = 24.0;
pub const TILE_CORNER_RADIUS: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCount(usize);

impl ColumnCount {
    pub fn new(columns: usize) -> Self {
        Self(columns.clamp(MIN_COLUMNS, MAX_COLUMNS))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn increment(&mut self) -> bool {
        let next = Self::new(self.0 + 1);
        let changed = next != *self;
        *self = next;
        changed
    }

    pub fn decrement(&mut self) -> bool {
        let next = Self::new(self.0.saturating_sub(1));
        let changed = next != *self;
        *self = next;
        changed
    }
}

/// 0.0 for Preview, 1.0 for Browse, eased in between while a mode switch
/// runs. Snap-backs keep the settled blend.
pub fn mode_blend(frame: &PresentedFrame) -> f32 {
    match frame.animation {
        Some(spec) if spec.changes_mode() => match spec.target_mode {
            Mode::Browse => frame.progress as f32,
            Mode::Preview => 1.0 - frame.progress as f32,
        },
        _ => match frame.mode {
            Mode::Preview => 0.0,
            Mode::Browse => 1.0,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub preview_height: f32,
    pub spacing: f32,
    pub collection_height: f32,
    pub tile_size: [f32; 2],
}

impl SurfaceLayout {
    /// `columns` may be fractional while a column change animates.
    pub fn compute(viewport: [f32; 2], blend: f32, columns: f32) -> Self {
        let [width, height] = viewport;
        let blend = blend.clamp(0.0, 1.0);
        let columns = columns.max(MIN_COLUMNS as f32);

        let grid_tile_width = (width / columns - GRID_TILE_INSET).max(MIN_GRID_TILE_WIDTH);

        Self {
            preview_height: (height - PREVIEW_CHROME_HEIGHT).max(0.0),
            spacing: lerp(0.0, BROWSE_SPACING, blend),
            collection_height: lerp(STRIP_HEIGHT, height, blend),
            tile_size: [
                lerp(STRIP_TILE_SIZE[0], grid_tile_width, blend),
                lerp(STRIP_TILE_SIZE[1], GRID_TILE_HEIGHT, blend),
            ],
        }
    }

    pub fn collection_top(&self) -> f32 {
        self.preview_height + self.spacing
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
