use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::{domain::Mode, protocol::GestureEvent};
use transition_core::{PresentedFrame, TransitionController};

use crate::{
    config::Settings,
    controller::{
        events::PointerTracker,
        orchestration::{dispatch_gesture_event, drain_gesture_events},
    },
    ui::layout::{mode_blend, ColumnCount, SurfaceLayout, TILE_CORNER_RADIUS},
};

pub const SETTINGS_STORAGE_KEY: &str = "desktop_gui.surface";
const COLUMN_ANIMATION_SECS: f32 = 0.25;
const TILE_GAP: f32 = 8.0;

/// What survives a restart. Transition state deliberately does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSurfaceSettings {
    pub columns: usize,
}

impl Default for PersistedSurfaceSettings {
    fn default() -> Self {
        Self {
            columns: Settings::default().columns,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub item_count: usize,
    pub columns: usize,
    pub curve: transition_core::SpringCurve,
}

impl From<&Settings> for StartupConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            item_count: settings.item_count,
            columns: settings.columns,
            curve: settings.spring_curve(),
        }
    }
}

pub struct MorphApp {
    gesture_tx: Sender<GestureEvent>,
    gesture_rx: Receiver<GestureEvent>,
    controller: TransitionController,
    pointer: PointerTracker,
    columns: ColumnCount,
    item_count: usize,
    status: String,
}

impl MorphApp {
    pub fn new(
        gesture_tx: Sender<GestureEvent>,
        gesture_rx: Receiver<GestureEvent>,
        persisted: Option<PersistedSurfaceSettings>,
        startup: StartupConfig,
    ) -> Self {
        let columns = persisted.map_or(startup.columns, |p| p.columns);
        Self {
            gesture_tx,
            gesture_rx,
            controller: TransitionController::new().with_curve(startup.curve),
            pointer: PointerTracker::default(),
            columns: ColumnCount::new(columns),
            item_count: startup.item_count,
            status: "Drag up to browse".to_string(),
        }
    }

    fn dispatch(&mut self, event: GestureEvent) {
        dispatch_gesture_event(&self.gesture_tx, event, &mut self.status);
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let (escape, focused, origin) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.focused,
                i.pointer.press_origin(),
            )
        });

        if self.pointer.is_tracking() && (escape || !focused) {
            if let Some(event) = self.pointer.lost() {
                self.dispatch(event);
            }
            return;
        }

        if response.drag_started() {
            if let Some(origin) = origin.or_else(|| response.interact_pointer_pos()) {
                self.pointer.press([origin.x, origin.y]);
            }
        }

        if response.dragged() && self.pointer.is_tracking() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(event) = self.pointer.moved([pos.x, pos.y]) {
                    self.dispatch(event);
                }
            }
        }

        if response.drag_stopped() {
            let at = ctx.input(|i| i.pointer.latest_pos()).map(|p| [p.x, p.y]);
            if let Some(event) = self.pointer.release(at) {
                self.dispatch(event);
            }
        }
    }

    fn show_controls(&mut self, ctx: &egui::Context, mode: Mode) {
        egui::TopBottomPanel::bottom("morph_controls").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let toggle_label = match mode {
                    Mode::Preview => "Show Grid",
                    Mode::Browse => "Show List",
                };
                if ui.button(toggle_label).clicked() {
                    self.dispatch(GestureEvent::Toggle);
                }
                if ui.button("+").clicked() && self.columns.increment() {
                    tracing::debug!(columns = self.columns.get(), "column count changed");
                }
                if ui.button("-").clicked() && self.columns.decrement() {
                    tracing::debug!(columns = self.columns.get(), "column count changed");
                }
                ui.separator();
                ui.label(&self.status);
            });
            ui.add_space(6.0);
        });
    }

    fn show_surface(&mut self, ctx: &egui::Context, frame: &PresentedFrame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let full = ui.max_rect();
                let response = ui.interact(
                    full,
                    ui.make_persistent_id("morph_gesture_area"),
                    egui::Sense::drag(),
                );
                self.handle_pointer(ctx, &response);

                let columns = ctx.animate_value_with_time(
                    egui::Id::new("morph_grid_columns"),
                    self.columns.get() as f32,
                    COLUMN_ANIMATION_SECS,
                );
                let layout = SurfaceLayout::compute(
                    [full.width(), full.height()],
                    mode_blend(frame),
                    columns,
                );

                let origin = full.min + egui::vec2(0.0, frame.offset_y as f32);
                let preview_rect = egui::Rect::from_min_size(
                    origin,
                    egui::vec2(full.width(), layout.preview_height),
                );
                let collection_rect = egui::Rect::from_min_size(
                    origin + egui::vec2(0.0, layout.collection_top()),
                    egui::vec2(full.width(), layout.collection_height),
                );

                let painter = ui.painter_at(full);
                painter.rect_filled(preview_rect, 0.0, egui::Color32::BLACK);
                painter.text(
                    preview_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "camera preview",
                    egui::FontId::proportional(18.0),
                    egui::Color32::WHITE,
                );

                let clip = collection_rect.intersect(full);
                if clip.is_positive() {
                    ui.scope_builder(egui::UiBuilder::new().max_rect(collection_rect), |ui| {
                        ui.set_clip_rect(clip);
                        self.show_collection(ui, frame.mode, &layout);
                    });
                }
            });
    }

    fn show_collection(&self, ui: &mut egui::Ui, mode: Mode, layout: &SurfaceLayout) {
        let tile_size = egui::vec2(layout.tile_size[0], layout.tile_size[1]);
        match mode {
            Mode::Preview => {
                egui::ScrollArea::horizontal()
                    .id_salt("morph_strip")
                    .drag_to_scroll(false)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = TILE_GAP;
                            for index in 0..self.item_count {
                                tile(ui, tile_size, index);
                            }
                        });
                    });
            }
            Mode::Browse => {
                let columns = self.columns.get();
                egui::ScrollArea::vertical()
                    .id_salt("morph_grid")
                    .drag_to_scroll(false)
                    .show(ui, |ui| {
                        egui::Grid::new("morph_tiles")
                            .spacing(egui::vec2(TILE_GAP, TILE_GAP))
                            .show(ui, |ui| {
                                for index in 0..self.item_count {
                                    tile(ui, tile_size, index);
                                    if (index + 1) % columns == 0 {
                                        ui.end_row();
                                    }
                                }
                            });
                    });
            }
        }
    }
}

fn tile(ui: &mut egui::Ui, size: egui::Vec2, index: usize) {
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, TILE_CORNER_RADIUS, egui::Color32::RED);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        format!("grid {index}"),
        egui::FontId::proportional(13.0),
        egui::Color32::WHITE,
    );
}

impl eframe::App for MorphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        drain_gesture_events(&self.gesture_rx, &mut self.controller, &mut self.status);

        let frame = self.controller.presentation();
        self.show_controls(ctx, frame.mode);
        self.show_surface(ctx, &frame);

        // Samples queued while painting take effect on the next frame.
        if !self.gesture_rx.is_empty()
            || frame.animation.is_some()
            || frame.is_dragging
            || self.pointer.gesture_in_progress()
        {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSurfaceSettings {
            columns: self.columns.get(),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
