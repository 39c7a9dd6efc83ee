//! Application menu bar

use eframe::egui;
use shared::ShapeKind;

use super::Panels;
use crate::build::SketchTool;
use crate::i18n::{lang, set_lang, shape_name, t, tool_name, view_mode_name, Lang};
use crate::scene::ViewMode;
use crate::state::EditorState;
use crate::ui::toolbar;
use crate::viewport::ViewportPanel;

/// Show the file menu. Returns an error message when opening or saving failed.
pub fn file_menu(ui: &mut egui::Ui, state: &mut EditorState) -> Result<(), String> {
    let mut result = Ok(());
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.new")).clicked() {
            state.disable_sketch();
            state.clear_all();
            ui.close_menu();
        }
        if ui.button(t("menu.open")).clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title(t("menu.open_title"))
                .add_filter("JSON", &["json"])
                .pick_file()
            {
                result = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {}: {e}", path.display()))
                    .and_then(|json| state.import_json(&json).map_err(|e| e.to_string()))
                    .map(|count| {
                        tracing::info!("Loaded {count} objects from {}", path.display());
                    });
            }
        }
        if ui.button(t("menu.save")).clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title(t("menu.save_title"))
                .add_filter("JSON", &["json"])
                .set_file_name("scene.json")
                .save_file()
            {
                result = state
                    .export_json()
                    .map_err(|e| format!("Failed to serialize scene: {e}"))
                    .and_then(|json| {
                        std::fs::write(&path, json)
                            .map_err(|e| format!("Failed to write {}: {e}", path.display()))
                    })
                    .map(|()| tracing::info!("Saved scene to {}", path.display()));
            }
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
    if let Err(e) = &result {
        tracing::error!("{e}");
    }
    result
}

/// Show the edit menu
pub fn edit_menu(ui: &mut egui::Ui, state: &mut EditorState) {
    ui.menu_button(t("menu.edit"), |ui| {
        if ui
            .add_enabled(state.history.can_undo(), egui::Button::new(t("menu.undo")))
            .clicked()
        {
            state.undo();
            ui.close_menu();
        }
        if ui
            .add_enabled(state.history.can_redo(), egui::Button::new(t("menu.redo")))
            .clicked()
        {
            state.redo();
            ui.close_menu();
        }
        ui.separator();
        let has_selection = state.selected_id().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.delete")))
            .clicked()
        {
            state.delete_selected();
            ui.close_menu();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.deselect")))
            .clicked()
        {
            state.clear_selection();
            ui.close_menu();
        }
        ui.separator();
        if ui
            .add_enabled(!state.scene.is_empty(), egui::Button::new(t("menu.clear_all")))
            .clicked()
        {
            state.clear_all();
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(
    ui: &mut egui::Ui,
    state: &mut EditorState,
    viewport: &mut ViewportPanel,
    panels: &mut Panels,
) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut panels.scene_tree, t("menu.scene_tree"));
        ui.checkbox(&mut panels.properties, t("menu.properties"));
        ui.separator();

        let mut ground = state.settings.grid.ground_visible;
        if ui.checkbox(&mut ground, t("menu.ground_grid")).changed() {
            state.set_ground_visible(ground);
        }
        let mut axes = state.settings.grid.axes_visible;
        if ui.checkbox(&mut axes, t("menu.axes")).changed() {
            state.set_axes_visible(axes);
        }
        ui.separator();

        let current = state.scene.view_mode();
        for mode in [ViewMode::Wireframe, ViewMode::Default, ViewMode::Realistic] {
            if ui.radio(current == mode, view_mode_name(mode)).clicked() {
                state.set_view_mode(mode);
                ui.close_menu();
            }
        }
        ui.separator();

        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera(state);
            ui.close_menu();
        }
        ui.menu_button(t("menu.language"), |ui| {
            if ui.radio(lang() == Lang::En, "English").clicked() {
                set_lang(Lang::En);
                ui.close_menu();
            }
            if ui.radio(lang() == Lang::Ru, "Русский").clicked() {
                set_lang(Lang::Ru);
                ui.close_menu();
            }
        });
    });
}

/// Show the create menu
pub fn create_menu(ui: &mut egui::Ui, state: &mut EditorState) {
    ui.menu_button(t("menu.create"), |ui| {
        ui.menu_button(t("menu.primitives"), |ui| {
            for kind in ShapeKind::PRIMITIVES {
                if ui.button(shape_name(kind)).clicked() {
                    toolbar::action_create(state, kind);
                    ui.close_menu();
                }
            }
        });
        ui.menu_button(t("menu.sketch"), |ui| {
            for tool in SketchTool::ALL {
                if ui.button(tool_name(tool)).clicked() {
                    toolbar::action_sketch(state, tool);
                    ui.close_menu();
                }
            }
        });
    });
}
