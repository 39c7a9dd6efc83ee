//! Scene tree panel: flat list of placed objects

use egui::Ui;

use crate::i18n::{shape_name, t};
use crate::state::{EditorState, InteractionMode};

pub fn show(ui: &mut Ui, state: &mut EditorState) {
    ui.horizontal(|ui| {
        ui.heading(t("tree.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", state.scene.len()));
        });
    });
    ui.separator();

    if state.scene.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("tree.empty"));
        });
        return;
    }

    // Collect rows first to avoid borrow conflicts
    let rows: Vec<(String, String, bool)> = state
        .scene
        .objects()
        .iter()
        .enumerate()
        .map(|(i, o)| {
            (
                o.id.clone(),
                format!("{} {}", shape_name(o.metadata.kind()), i + 1),
                o.visible,
            )
        })
        .collect();
    let selected = state.selected_id();
    let selectable = state.mode() == InteractionMode::Select;

    egui::ScrollArea::vertical()
        .id_salt("scene_tree_scroll")
        .show(ui, |ui| {
            for (id, label, visible) in rows {
                let is_selected = selected.as_deref() == Some(id.as_str());
                let text = if visible {
                    egui::RichText::new(label)
                } else {
                    egui::RichText::new(label).weak()
                };
                let response = ui.add_enabled(selectable, egui::SelectableLabel::new(is_selected, text));
                if response.clicked() {
                    if is_selected {
                        state.clear_selection();
                    } else {
                        state.select(&id);
                    }
                }
            }
        });
}
