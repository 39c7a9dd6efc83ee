//! Keyboard shortcut handling

use eframe::egui;

use crate::state::transform::TransformMode;
use crate::state::EditorState;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut EditorState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        // Ctrl+Z: undo
        if i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift {
            state.undo();
        }
        // Ctrl+Shift+Z or Ctrl+Y: redo
        if (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
            || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        {
            state.redo();
        }
        if i.key_pressed(egui::Key::Escape) {
            handle_escape(state);
        }
        if i.key_pressed(egui::Key::Delete) {
            state.delete_selected();
        }
        if !i.modifiers.command && !state.sketch.is_active() {
            if i.key_pressed(egui::Key::G) {
                state.set_transform_mode(TransformMode::Translate);
            }
            if i.key_pressed(egui::Key::R) {
                state.set_transform_mode(TransformMode::Rotate);
            }
            if i.key_pressed(egui::Key::S) {
                state.set_transform_mode(TransformMode::Scale);
            }
        }
    });
}

/// Escape cancels the shape being drawn, then leaves sketch mode, then deselects
fn handle_escape(state: &mut EditorState) {
    if state.sketch.is_drawing() {
        state.sketch.cancel_drawing(&mut state.scene);
    } else if state.sketch.is_active() {
        state.disable_sketch();
    } else {
        state.clear_selection();
    }
}
