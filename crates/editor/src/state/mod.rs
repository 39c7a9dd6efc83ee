pub mod history;
pub mod persistence;
pub mod selection;
pub mod settings;
pub mod sketch;
pub mod transform;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{Color, ObjectId, ShapeKind, ShapeParams};

use crate::build::{build_primitive, SketchTool};
use crate::scene::{PlacedObject, SceneGraph, ViewMode};
pub use history::{EditHistory, HistoryEntry, Replay};
pub use persistence::ImportError;
use selection::SelectionState;
pub use settings::EditorSettings;
use sketch::{SketchOptions, SketchSession, SketchState};
use transform::{GizmoAxis, TransformMode, TransformSession};

/// Which controller owns the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    Select,
    Sketch,
}

/// Combined editor state. Every edit goes through its methods.
pub struct EditorState {
    pub scene: SceneGraph,
    pub selection: SelectionState,
    pub transform: TransformSession,
    pub sketch: SketchSession,
    pub history: EditHistory,
    pub settings: EditorSettings,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

/// Mirror one history replay step into the scene
fn apply_replay(
    scene: &mut SceneGraph,
    selection: &mut SelectionState,
    transform: &mut TransformSession,
    op: Replay<'_>,
) -> Option<PlacedObject> {
    match op {
        Replay::Insert(object) => {
            scene.add(object.clone());
            None
        }
        Replay::Delete(id) => {
            if selection.is_selected(id) {
                selection.clear_selection(scene);
            }
            if transform.attached() == Some(id) {
                transform.attach(None, scene);
            }
            scene.remove(id)
        }
        Replay::SetTransform(id, snapshot) => {
            if let Some(object) = scene.find_by_id_mut(id) {
                object.apply_snapshot(snapshot);
            }
            None
        }
    }
}

impl EditorState {
    pub fn new(settings: EditorSettings) -> Self {
        let settings = settings.sanitized();

        let mut scene = SceneGraph::new();
        scene.background = settings.viewport.background_color;
        scene.set_ground_visible(settings.grid.ground_visible);
        scene.set_axes_visible(settings.grid.axes_visible);
        scene.set_sketch_grid_size(settings.grid.size);
        scene.set_view_mode(settings.viewport.view_mode);

        let sketch = SketchSession::new(SketchOptions {
            hollow: settings.sketch.hollow,
            polygon_sides: settings.sketch.clamped_sides(),
            snap: settings.grid.snap,
            grid_size: settings.grid.size,
            extrude: settings.sketch.extrude,
            extrude_depth: settings.sketch.extrude_depth,
            color: settings.viewport.default_color,
        });

        Self {
            scene,
            selection: SelectionState::new(),
            transform: TransformSession::new(),
            sketch,
            history: EditHistory::new(settings.history.limit),
            settings,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        if self.sketch.is_active() {
            InteractionMode::Sketch
        } else {
            InteractionMode::Select
        }
    }

    fn tint(&self) -> Color {
        self.settings.viewport.selection_color
    }

    /// Currently selected object id
    pub fn selected_id(&mut self) -> Option<ObjectId> {
        self.selection.selected(&self.scene).map(str::to_string)
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    /// Add a primitive at the origin (default parameters unless given) and
    /// select it when in select mode.
    pub fn create_primitive(
        &mut self,
        kind: ShapeKind,
        params: Option<ShapeParams>,
    ) -> Result<ObjectId, String> {
        let params = match params {
            Some(p) if p.kind() != kind => {
                return Err(format!(
                    "parameters for {} given for {}",
                    p.kind().label(),
                    kind.label()
                ))
            }
            Some(p) => p,
            None => ShapeParams::default_for(kind)
                .ok_or_else(|| format!("{} is not a primitive", kind.label()))?,
        };

        let desc = build_primitive(&params)?;
        let object = PlacedObject::from_primitive(desc, self.settings.viewport.default_color);
        let id = object.id.clone();
        self.add_object(object);
        tracing::info!(%id, kind = kind.label(), "primitive created");

        if self.mode() == InteractionMode::Select {
            self.select(&id);
        }
        Ok(id)
    }

    /// Add an object and record it
    fn add_object(&mut self, object: PlacedObject) {
        if self.scene.add(object.clone()) {
            self.history.push(HistoryEntry::Add { object });
        }
    }

    /// Remove the selected object (recorded). False when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected_id() else {
            return false;
        };
        self.clear_selection();
        match self.scene.remove(&id) {
            Some(object) => {
                tracing::info!(%id, "object deleted");
                self.history.push(HistoryEntry::Remove { object });
                true
            }
            None => false,
        }
    }

    /// Remove every object; each removal is its own history entry.
    /// Returns the number of objects removed.
    pub fn clear_all(&mut self) -> usize {
        self.sketch.cancel_drawing(&mut self.scene);
        self.clear_selection();
        let removed = self.scene.clear();
        let count = removed.len();
        for object in removed {
            self.history.push(HistoryEntry::Remove { object });
        }
        tracing::info!(count, "scene cleared");
        count
    }

    /// Flip visibility of the selected object; returns the new flag
    pub fn toggle_visibility(&mut self) -> Option<bool> {
        let id = self.selected_id()?;
        let object = self.scene.find_by_id_mut(&id)?;
        object.visible = !object.visible;
        Some(object.visible)
    }

    /// Recolor the selected object
    pub fn set_color(&mut self, color: Color) -> bool {
        let tint = self.tint();
        let Some(id) = self.selected_id() else {
            return false;
        };
        match self.scene.find_by_id_mut(&id) {
            Some(object) => {
                object.recolor(color, tint);
                true
            }
            None => false,
        }
    }

    /// Extrude the selected sketch object
    pub fn extrude_selected(&mut self, depth: Option<f64>) -> Option<ObjectId> {
        let id = self.selected_id()?;
        self.sketch.extrude_existing(&mut self.scene, &id, depth)
    }

    // ------------------------------------------------------------------
    // Selection and transform widget
    // ------------------------------------------------------------------

    /// Select an object and attach the widget to it. Ignored in sketch mode.
    pub fn select(&mut self, id: &str) -> bool {
        if self.mode() == InteractionMode::Sketch {
            tracing::debug!(id, "select ignored in sketch mode");
            return false;
        }
        let tint = self.tint();
        if !self.selection.select(&mut self.scene, id, tint) {
            return false;
        }
        if self.transform.attached() != Some(id) {
            self.transform.attach(Some(id), &mut self.scene);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection(&mut self.scene);
        self.transform.attach(None, &mut self.scene);
    }

    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.transform.set_mode(mode);
    }

    /// Start a widget drag on the attached object
    pub fn begin_transform(&mut self, axis: GizmoAxis) -> bool {
        self.transform.begin_drag(&mut self.scene, axis)
    }

    pub fn drag_transform(&mut self, amount: f64) -> bool {
        self.transform.drag(&mut self.scene, amount)
    }

    /// Finish the drag; records a transform entry if anything changed
    pub fn end_transform(&mut self) -> bool {
        match self.transform.end_drag(&mut self.scene) {
            Some(entry) => {
                self.history.push(entry);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Sketch
    // ------------------------------------------------------------------

    /// Enter sketch mode with a tool. Clears the selection and detaches the
    /// widget, dropping any drag in flight.
    pub fn enable_sketch(&mut self, tool: SketchTool, hollow: bool, sides: Option<u32>) {
        self.clear_selection();
        let sides = sides.map(|s| {
            s.clamp(settings::MIN_POLYGON_SIDES, settings::MAX_POLYGON_SIDES)
        });
        if let Some(s) = sides {
            self.settings.sketch.polygon_sides = s;
        }
        self.settings.sketch.hollow = hollow;
        self.sketch.enable(&mut self.scene, tool, hollow, sides);
    }

    pub fn disable_sketch(&mut self) {
        self.sketch.disable(&mut self.scene);
    }

    pub fn set_snap(&mut self, snap: bool) {
        self.settings.grid.snap = snap;
        self.sketch.options.snap = snap;
    }

    pub fn set_grid_size(&mut self, size: f64) -> bool {
        if !self.sketch.set_grid_size(&mut self.scene, size) {
            return false;
        }
        self.settings.grid.size = size;
        true
    }

    pub fn set_hollow(&mut self, hollow: bool) {
        self.settings.sketch.hollow = hollow;
        self.sketch.options.hollow = hollow;
    }

    pub fn set_extrude(&mut self, extrude: bool) {
        self.settings.sketch.extrude = extrude;
        self.sketch.options.extrude = extrude;
    }

    /// Set the extrusion depth; negative or non-finite depths are rejected
    pub fn set_extrude_depth(&mut self, depth: f64) -> bool {
        if !(depth.is_finite() && depth >= 0.0) {
            tracing::warn!(depth, "rejected extrude depth");
            return false;
        }
        self.settings.sketch.extrude_depth = depth;
        self.sketch.options.extrude_depth = depth;
        true
    }

    pub fn sketch_down(&mut self, point: DVec3) -> bool {
        self.sketch.pointer_down(point)
    }

    pub fn sketch_move(&mut self, point: DVec3) -> bool {
        self.sketch.pointer_move(&mut self.scene, point)
    }

    /// Finish the shape being drawn; the new object is added and recorded
    pub fn sketch_up(&mut self, point: DVec3) -> Option<ObjectId> {
        let object = self.sketch.pointer_up(&mut self.scene, point)?;
        let id = object.id.clone();
        self.add_object(object);
        Some(id)
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Change the view mode. The selection highlight is lifted around the swap
    /// so it never gets saved as an original material.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        let tint = self.tint();
        self.selection.unhighlight(&mut self.scene);
        self.scene.set_view_mode(mode);
        self.selection.rehighlight(&mut self.scene, tint);
        self.settings.viewport.view_mode = mode;
    }

    pub fn set_ground_visible(&mut self, visible: bool) {
        self.settings.grid.ground_visible = visible;
        self.scene.set_ground_visible(visible);
    }

    pub fn set_axes_visible(&mut self, visible: bool) {
        self.settings.grid.axes_visible = visible;
        self.scene.set_axes_visible(visible);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn interrupt_interactions(&mut self) {
        self.sketch.cancel_drawing(&mut self.scene);
        if self.transform.is_dragging() {
            let attached = self.transform.attached().map(str::to_string);
            self.transform.attach(attached.as_deref(), &mut self.scene);
        }
    }

    pub fn undo(&mut self) -> bool {
        self.interrupt_interactions();
        let Self {
            scene,
            selection,
            transform,
            history,
            ..
        } = self;
        history.undo(|op| apply_replay(scene, selection, transform, op))
    }

    pub fn redo(&mut self) -> bool {
        self.interrupt_interactions();
        let Self {
            scene,
            selection,
            transform,
            history,
            ..
        } = self;
        history.redo(|op| apply_replay(scene, selection, transform, op))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        persistence::export_json(&self.scene)
    }

    /// Replace the scene with the contents of a scene document. On failure
    /// the current scene is left untouched.
    pub fn import_json(&mut self, json: &str) -> Result<usize, ImportError> {
        let imported = match persistence::import_json(json, self.settings.viewport.default_color)
        {
            Ok(imported) => imported,
            Err(e) => {
                tracing::error!("scene import failed: {}", e);
                return Err(e);
            }
        };

        self.disable_sketch();
        self.clear_selection();
        self.scene.clear();
        self.history.clear();

        let count = imported.objects.len();
        for object in imported.objects {
            self.scene.add(object);
        }
        tracing::info!(count, skipped = imported.skipped, "scene imported");
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Pointer routing (screen coordinates)
    // ------------------------------------------------------------------

    fn work_plane_at(&self, pointer: DVec2) -> Option<DVec3> {
        let ray = self.scene.camera.screen_ray(pointer, &self.scene.viewport());
        self.sketch.work_plane_point(&ray)
    }

    /// Pointer pressed: starts a sketch shape, grabs a widget handle, or picks
    pub fn pointer_down(&mut self, pointer: DVec2) -> bool {
        match self.mode() {
            InteractionMode::Sketch => match self.work_plane_at(pointer) {
                Some(point) => self.sketch_down(point),
                None => false,
            },
            InteractionMode::Select => {
                let ray = self.scene.camera.screen_ray(pointer, &self.scene.viewport());
                if let Some(axis) = self.transform.hit_test(&ray, &self.scene) {
                    return self.begin_transform(axis);
                }
                self.click(pointer)
            }
        }
    }

    /// Pointer moved by `delta` pixels
    pub fn pointer_move(&mut self, pointer: DVec2, delta: DVec2) -> bool {
        if self.sketch.is_drawing() {
            return match self.work_plane_at(pointer) {
                Some(point) => self.sketch_move(point),
                None => false,
            };
        }
        if self.transform.is_dragging() {
            return self.transform.drag_screen(&mut self.scene, delta);
        }
        false
    }

    /// Pointer released: commits a sketch shape or ends a widget drag
    pub fn pointer_up(&mut self, pointer: DVec2) -> bool {
        if let SketchState::Drawing { current, .. } = self.sketch.state() {
            let point = self.work_plane_at(pointer).unwrap_or(current);
            return self.sketch_up(point).is_some();
        }
        if self.transform.is_dragging() {
            return self.end_transform();
        }
        false
    }

    /// Select whatever is under the pointer, or clear the selection
    pub fn click(&mut self, pointer: DVec2) -> bool {
        if self.mode() == InteractionMode::Sketch {
            return false;
        }
        let viewport = self.scene.viewport();
        match selection::pick(pointer, &viewport, &self.scene.camera, &self.scene) {
            Some(id) => self.select(&id),
            None => {
                self.clear_selection();
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// JSON summary of the editor state
    pub fn inspect(&mut self) -> serde_json::Value {
        let selected = self.selected_id();
        let objects: Vec<serde_json::Value> = self
            .scene
            .objects()
            .iter()
            .map(|o| {
                json!({
                    "id": o.id,
                    "kind": o.metadata.kind(),
                    "faceCount": o.metadata.face_count,
                    "edgeCount": o.metadata.edge_count,
                    "position": o.position.to_array(),
                    "scale": o.scale.to_array(),
                    "visible": o.visible,
                })
            })
            .collect();

        json!({
            "objects": objects,
            "selected": selected,
            "mode": self.mode(),
            "sketchTool": self.sketch.tool(),
            "drawing": self.sketch.is_drawing(),
            "viewMode": self.scene.view_mode(),
            "transformMode": self.transform.mode(),
            "canUndo": self.history.can_undo(),
            "canRedo": self.history.can_redo(),
            "undoDepth": self.history.undo_depth(),
            "redoDepth": self.history.redo_depth(),
        })
    }
}
