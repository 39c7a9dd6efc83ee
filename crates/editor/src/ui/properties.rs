//! Properties panel for the selected object

use egui::Ui;

use crate::i18n::{shape_name, t};
use crate::state::EditorState;

pub fn show(ui: &mut Ui, state: &mut EditorState) {
    ui.heading(t("prop.title"));
    ui.separator();

    let Some(id) = state.selected_id() else {
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("prop.select_object"));
            ui.weak(t("prop.to_view"));
        });
        return;
    };
    let Some(object) = state.scene.find_by_id(&id) else {
        return;
    };

    // Copy what the panel shows so the state can be mutated below
    let kind = object.metadata.kind();
    let face_count = object.metadata.face_count;
    let edge_count = object.metadata.edge_count;
    let position = object.position;
    let scale = object.scale;
    let visible = object.visible;
    let mut rgb = object.color.to_rgb();
    let can_extrude = object.profile.is_some() && kind.is_sketch();
    let parameters = serde_json::to_value(&object.metadata.shape)
        .ok()
        .and_then(|v| v.get("parameters").cloned());

    ui.strong(shape_name(kind));
    ui.add_space(4.0);

    egui::Grid::new("object_props")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("ID:");
            ui.monospace(short_id(&id));
            ui.end_row();

            ui.label(format!("{}:", t("prop.faces")));
            ui.label(face_count.to_string());
            ui.end_row();

            ui.label(format!("{}:", t("prop.edges")));
            ui.label(edge_count.to_string());
            ui.end_row();

            ui.label(format!("{}:", t("prop.position")));
            ui.monospace(format!("{:.2} {:.2} {:.2}", position.x, position.y, position.z));
            ui.end_row();

            ui.label(format!("{}:", t("prop.scale")));
            ui.monospace(format!("{:.2} {:.2} {:.2}", scale.x, scale.y, scale.z));
            ui.end_row();

            ui.label(format!("{}:", t("prop.visible")));
            ui.label(if visible { t("yes") } else { t("no") });
            ui.end_row();

            ui.label(format!("{}:", t("prop.color")));
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                state.set_color(shared::Color::from_rgb(rgb[0], rgb[1], rgb[2]));
            }
            ui.end_row();
        });

    if let Some(serde_json::Value::Object(params)) = parameters {
        ui.add_space(8.0);
        egui::CollapsingHeader::new(t("prop.parameters"))
            .id_salt("object_params")
            .default_open(true)
            .show(ui, |ui| {
                for (name, value) in params {
                    ui.horizontal(|ui| {
                        ui.label(format!("{name}:"));
                        ui.monospace(value.to_string());
                    });
                }
            });
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button(t("prop.toggle_visible")).clicked() {
            state.toggle_visibility();
        }
        if can_extrude && ui.button(t("prop.extrude")).clicked() {
            state.extrude_selected(None);
        }
        if ui.button(t("prop.delete")).clicked() {
            state.delete_selected();
        }
    });
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
