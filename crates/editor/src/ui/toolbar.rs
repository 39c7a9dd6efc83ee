//! Main toolbar: primitives, sketch tools, history, view and transform modes

use egui::Ui;
use shared::ShapeKind;

use crate::build::SketchTool;
use crate::i18n::{shape_name, t, tool_name, transform_mode_name, view_mode_name};
use crate::scene::ViewMode;
use crate::state::transform::TransformMode;
use crate::state::{EditorState, InteractionMode};

// ── Public actions (callable from menus too) ─────────────────

pub fn action_create(state: &mut EditorState, kind: ShapeKind) {
    if state.sketch.is_active() {
        state.disable_sketch();
    }
    if let Err(e) = state.create_primitive(kind, None) {
        tracing::warn!("create {}: {e}", kind.label());
    }
}

pub fn action_sketch(state: &mut EditorState, tool: SketchTool) {
    let hollow = state.settings.sketch.hollow;
    let sides = state.settings.sketch.polygon_sides;
    state.enable_sketch(tool, hollow, Some(sides));
}

pub fn show(ui: &mut Ui, state: &mut EditorState) {
    ui.horizontal_wrapped(|ui| {
        ui.label(t("tb.primitives"));
        for kind in ShapeKind::PRIMITIVES {
            if ui.button(shape_name(kind)).clicked() {
                action_create(state, kind);
            }
        }

        ui.separator();
        ui.label(t("tb.sketch"));
        let active_tool = state.sketch.tool();
        for tool in SketchTool::ALL {
            if ui
                .selectable_label(active_tool == Some(tool), tool_name(tool))
                .clicked()
            {
                if active_tool == Some(tool) {
                    state.disable_sketch();
                } else {
                    action_sketch(state, tool);
                }
            }
        }

        ui.separator();
        if ui
            .add_enabled(state.history.can_undo(), egui::Button::new(t("tb.undo")))
            .clicked()
        {
            state.undo();
        }
        if ui
            .add_enabled(state.history.can_redo(), egui::Button::new(t("tb.redo")))
            .clicked()
        {
            state.redo();
        }

        ui.separator();
        ui.label(t("tb.view"));
        let current_view = state.scene.view_mode();
        for mode in [ViewMode::Wireframe, ViewMode::Default, ViewMode::Realistic] {
            if ui
                .selectable_label(current_view == mode, view_mode_name(mode))
                .clicked()
            {
                state.set_view_mode(mode);
            }
        }

        ui.separator();
        ui.label(t("tb.transform"));
        let enabled = state.mode() == InteractionMode::Select;
        let current = state.transform.mode();
        ui.add_enabled_ui(enabled, |ui| {
            for mode in [TransformMode::Translate, TransformMode::Rotate, TransformMode::Scale] {
                if ui
                    .selectable_label(current == mode, transform_mode_name(mode))
                    .clicked()
                {
                    state.set_transform_mode(mode);
                }
            }
        });
    });
}
