//! Main application module

mod keyboard;
mod menus;
mod styles;

use eframe::egui;

use crate::state::{EditorSettings, EditorState};
use crate::ui::{properties, scene_tree, sketch_toolbar, status_bar, toolbar};
use crate::viewport::ViewportPanel;

/// Which side panels are shown
pub struct Panels {
    pub scene_tree: bool,
    pub properties: bool,
}

/// Main application
pub struct SceneEditorApp {
    state: EditorState,
    viewport: ViewportPanel,
    panels: Panels,
    /// Last failure shown to the user (import errors and the like)
    error: Option<String>,
}

impl SceneEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_scene: Option<String>) -> Self {
        let mut state = EditorState::new(EditorSettings::load());
        let mut error = None;

        if let Some(json) = initial_scene {
            if let Err(e) = state.import_json(&json) {
                error = Some(e.to_string());
            }
        }

        styles::configure_styles(&cc.egui_ctx);

        Self {
            state,
            viewport: ViewportPanel::new(),
            panels: Panels {
                scene_tree: true,
                properties: true,
            },
            error,
        }
    }
}

impl eframe::App for SceneEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        keyboard::handle_keyboard(ctx, &mut self.state);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                if let Err(e) = menus::file_menu(ui, &mut self.state) {
                    self.error = Some(e);
                }
                menus::edit_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state, &mut self.viewport, &mut self.panels);
                menus::create_menu(ui, &mut self.state);
            });
        });

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.state);
            });

        // ── Sketch toolbar (only in sketch mode) ─────────────
        if self.state.sketch.is_active() {
            egui::TopBottomPanel::top("sketch_toolbar")
                .frame(
                    egui::Frame::side_top_panel(&ctx.style())
                        .inner_margin(egui::Margin::symmetric(8, 3))
                        .fill(egui::Color32::from_rgb(45, 45, 55)),
                )
                .show(ctx, |ui| {
                    sketch_toolbar::show(ui, &mut self.state);
                });
        }

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state, &self.viewport.stats(), self.error.as_deref());
            });

        // ── Left panel: Scene tree ───────────────────────────
        if self.panels.scene_tree {
            egui::SidePanel::left("scene_tree")
                .default_width(200.0)
                .width_range(140.0..=400.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    scene_tree::show(ui, &mut self.state);
                });
        }

        // ── Right panel: Properties ──────────────────────────
        if self.panels.properties {
            egui::SidePanel::right("properties")
                .default_width(260.0)
                .width_range(200.0..=450.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("props_scroll")
                        .show(ui, |ui| {
                            properties::show(ui, &mut self.state);
                        });
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.settings.save();
    }
}
