use egui::Ui;

use crate::i18n::{t, tool_name};
use crate::scene::FrameStats;
use crate::state::EditorState;

pub fn show(ui: &mut Ui, state: &EditorState, stats: &FrameStats, error: Option<&str>) {
    ui.horizontal(|ui| {
        ui.weak(format!("{}: {}", t("status.objects"), state.scene.len()));
        ui.separator();

        if let Some(tool) = state.sketch.tool() {
            let hint = if state.sketch.is_drawing() {
                t("hint.release")
            } else {
                t("hint.press")
            };
            ui.colored_label(
                egui::Color32::YELLOW,
                format!("{} [{}]: {hint}", t("hint.sketch_prefix"), tool_name(tool)),
            );
            ui.separator();
            ui.weak(t("hint.esc"));
        } else if let Some(id) = state.selection.selected_id() {
            ui.label(format!("{}: {}", t("status.selected"), id.get(..8).unwrap_or(id)));
        } else {
            ui.weak(t("status.ready"));
        }

        if let Some(e) = error {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(255, 120, 100), e);
        }

        // Right-aligned counters
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!(
                "{} {}/{}  |  frame {}",
                t("status.history"),
                state.history.undo_depth(),
                state.history.redo_depth(),
                stats.frame
            ));
        });
    });
}
