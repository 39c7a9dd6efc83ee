//! 3D viewport panel: camera controls, pointer routing and scene painting

mod renderer;

use egui::Ui;
use glam::DVec2;

use crate::i18n::{t, view_mode_name};
use crate::state::EditorState;
use scene_editor_lib::scene::FrameStats;
use scene_editor_lib::viewport::camera::ArcBallCamera;

/// Degrees of orbit per pointer pixel
const ORBIT_SPEED: f64 = 0.5;
const PAN_SPEED: f64 = 0.01;
const ZOOM_SPEED: f64 = 0.001;

fn to_dvec2(p: egui::Pos2) -> DVec2 {
    DVec2::new(p.x as f64, p.y as f64)
}

/// 3D viewport panel drawn with the software painter
pub struct ViewportPanel {
    last_stats: FrameStats,
    /// Left button drag owned by a sketch shape or widget handle
    tool_drag: bool,
    last_pointer: Option<DVec2>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            last_stats: FrameStats::default(),
            tool_drag: false,
            last_pointer: None,
        }
    }

    pub fn reset_camera(&mut self, state: &mut EditorState) {
        let orbit = state.scene.camera.orbit_enabled;
        state.scene.camera = ArcBallCamera::new();
        state.scene.camera.orbit_enabled = orbit;
    }

    pub fn stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut EditorState) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        state.scene.set_viewport(renderer::viewport_rect(rect));

        self.handle_tools(&response, ui, state);
        self.handle_camera(&response, ui, state);

        // ── Scroll zoom ─────────────────────────────
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                state.scene.camera.zoom(scroll as f64 * ZOOM_SPEED);
            }
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter_at(rect);
        self.last_stats = renderer::paint_scene(&painter, rect, state);
        self.draw_overlays(&painter, rect, state);
    }

    /// Left button: sketch drawing, widget drags and click selection
    fn handle_tools(&mut self, response: &egui::Response, ui: &Ui, state: &mut EditorState) {
        let alt = ui.input(|i| i.modifiers.alt);

        if response.drag_started_by(egui::PointerButton::Primary) && !alt {
            // Drags are detected after some movement; start from the press point
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(pos) = origin {
                self.last_pointer = Some(to_dvec2(pos));
                self.tool_drag = state.pointer_down(to_dvec2(pos));
                // A press that only selected something does not own the drag
                self.tool_drag &= state.sketch.is_drawing() || state.transform.is_dragging();
            }
        }

        if self.tool_drag {
            if response.dragged_by(egui::PointerButton::Primary) {
                if let Some(pos) = response.interact_pointer_pos() {
                    let d = response.drag_delta();
                    self.last_pointer = Some(to_dvec2(pos));
                    state.pointer_move(to_dvec2(pos), DVec2::new(d.x as f64, d.y as f64));
                }
            }
            if response.drag_stopped() {
                let pos = response
                    .interact_pointer_pos()
                    .or_else(|| response.hover_pos())
                    .map(to_dvec2)
                    .or(self.last_pointer);
                if let Some(pos) = pos {
                    state.pointer_up(pos);
                }
                self.tool_drag = false;
            }
            return;
        }

        if response.clicked() && !alt {
            if let Some(pos) = response.interact_pointer_pos() {
                state.click(to_dvec2(pos));
            }
        }
    }

    /// Middle or Alt+left drag orbits, right drag pans
    fn handle_camera(&mut self, response: &egui::Response, ui: &Ui, state: &mut EditorState) {
        if self.tool_drag {
            return;
        }
        let camera = &mut state.scene.camera;
        if response.dragged_by(egui::PointerButton::Middle)
            || (response.dragged_by(egui::PointerButton::Primary) && ui.input(|i| i.modifiers.alt))
        {
            let delta = response.drag_delta();
            camera.rotate(delta.x as f64 * ORBIT_SPEED, delta.y as f64 * ORBIT_SPEED);
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            camera.pan(-delta.x as f64 * PAN_SPEED, delta.y as f64 * PAN_SPEED);
        }
    }

    fn draw_overlays(&self, painter: &egui::Painter, rect: egui::Rect, state: &EditorState) {
        let text = format!(
            "{}  |  {} tris",
            view_mode_name(state.scene.view_mode()),
            self.last_stats.triangles
        );
        painter.text(
            rect.left_top() + egui::vec2(8.0, 6.0),
            egui::Align2::LEFT_TOP,
            text,
            egui::FontId::proportional(12.0),
            egui::Color32::from_gray(180),
        );

        if state.transform.attached().is_some() && !state.sketch.is_active() {
            painter.text(
                rect.left_bottom() + egui::vec2(8.0, -6.0),
                egui::Align2::LEFT_BOTTOM,
                t("hint.drag_axis"),
                egui::FontId::proportional(12.0),
                egui::Color32::from_gray(150),
            );
        }
    }
}
