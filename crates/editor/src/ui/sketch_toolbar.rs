use egui::Ui;

use crate::build::SketchTool;
use crate::i18n::{t, tool_name};
use crate::state::settings::{MAX_POLYGON_SIDES, MIN_POLYGON_SIDES};
use crate::state::EditorState;
use crate::ui::toolbar;

pub fn show(ui: &mut Ui, state: &mut EditorState) {
    ui.horizontal(|ui| {
        ui.label(t("sk.title"));

        let active = state.sketch.tool();
        for tool in SketchTool::ALL {
            if ui.selectable_label(active == Some(tool), tool_name(tool)).clicked() {
                toolbar::action_sketch(state, tool);
            }
        }

        ui.separator();

        let mut hollow = state.settings.sketch.hollow;
        if ui.checkbox(&mut hollow, t("sk.hollow")).changed() {
            state.set_hollow(hollow);
        }

        if active == Some(SketchTool::Polygon) {
            ui.label(t("sk.sides"));
            let mut sides = state.settings.sketch.polygon_sides;
            if ui
                .add(egui::DragValue::new(&mut sides).range(MIN_POLYGON_SIDES..=MAX_POLYGON_SIDES))
                .changed()
            {
                state.enable_sketch(SketchTool::Polygon, hollow, Some(sides));
            }
        }

        ui.separator();

        let mut snap = state.settings.grid.snap;
        if ui.checkbox(&mut snap, t("sk.snap")).changed() {
            state.set_snap(snap);
        }
        ui.label(t("sk.grid"));
        let mut grid = state.settings.grid.size;
        if ui
            .add(egui::DragValue::new(&mut grid).speed(0.05).range(0.05..=10.0))
            .changed()
        {
            state.set_grid_size(grid);
        }

        ui.separator();

        let mut extrude = state.settings.sketch.extrude;
        if ui.checkbox(&mut extrude, t("sk.extrude")).changed() {
            state.set_extrude(extrude);
        }
        ui.add_enabled_ui(extrude, |ui| {
            ui.label(t("sk.depth"));
            let mut depth = state.settings.sketch.extrude_depth;
            if ui
                .add(egui::DragValue::new(&mut depth).speed(0.05).range(0.0..=100.0))
                .changed()
            {
                state.set_extrude_depth(depth);
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(t("sk.done")).clicked() {
                state.disable_sketch();
            }
        });
    });
}
