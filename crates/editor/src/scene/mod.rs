//! Scene graph adapter
//!
//! Owns the render-side state (camera, lights, helpers, preview slot) and the
//! flat list of top-level placed objects. Unknown ids are silently ignored.

mod helpers;
mod material;
mod node;
mod object;
mod render;
mod resources;

pub use helpers::{
    sketch_grid_divisions, Helper, HelperKind, Light, LightKind, AXES_SIZE, GRID_EXTENT,
};
pub use material::{Material, MaterialRef};
pub use node::{GeometryHandle, LineRole, RenderNode, OUTLINE_COLOR};
pub use object::{new_object_id, PlacedObject, TransformSnapshot, SKETCH_SURFACE_OFFSET};
pub use render::{DrawItem, FrameStats};
pub use resources::{GeometryId, ResourceError, ResourceRegistry};

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use shared::Color;

use crate::viewport::camera::{ArcBallCamera, ViewportRect};

/// Scene-wide rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Wireframe,
    #[default]
    Default,
    Realistic,
}

/// Render scene plus placed objects
#[derive(Debug)]
pub struct SceneGraph {
    objects: Vec<PlacedObject>,
    pub camera: ArcBallCamera,
    viewport: ViewportRect,
    lights: Vec<Light>,
    helpers: Vec<Helper>,
    preview: Option<RenderNode>,
    view_mode: ViewMode,
    wireframe_material: MaterialRef,
    resources: ResourceRegistry,
    ground_enabled: bool,
    axes_enabled: bool,
    pub background: Color,
    frame: Cell<u64>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            camera: ArcBallCamera::new(),
            viewport: ViewportRect::sized(800.0, 600.0),
            lights: helpers::default_lights(),
            helpers: helpers::default_helpers(1.0),
            preview: None,
            view_mode: ViewMode::Default,
            wireframe_material: Material::wireframe().into_ref(),
            resources: ResourceRegistry::new(),
            ground_enabled: true,
            axes_enabled: true,
            background: Color(0x2b2b2b),
            frame: Cell::new(0),
        }
    }

    // --- objects ---

    /// Add a placed object. Registers its geometry and brings its materials in
    /// line with the current view mode. Duplicate ids are rejected.
    pub fn add(&mut self, mut object: PlacedObject) -> bool {
        if self.find_by_id(&object.id).is_some() {
            tracing::warn!(id = %object.id, "object already in scene");
            return false;
        }

        for handle in object.root.geometry_handles_mut() {
            handle.id = Some(self.resources.register(&handle.mesh));
        }
        self.sync_view_material(&mut object);
        object
            .root
            .set_lines_visible(LineRole::EdgeOutline, self.outlines_visible());

        tracing::debug!(id = %object.id, kind = ?object.metadata.kind(), "object added");
        self.objects.push(object);
        true
    }

    /// Remove an object and release its geometry. The returned object carries
    /// no highlight and can be added back later.
    pub fn remove(&mut self, id: &str) -> Option<PlacedObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        let mut object = self.objects.remove(index);
        self.release_geometry(&mut object.root);

        if let Some(prev) = object.pre_highlight.take() {
            object.set_material(&prev);
        }

        tracing::debug!(id = %object.id, "object removed");
        Some(object)
    }

    /// Remove every object, in scene order
    pub fn clear(&mut self) -> Vec<PlacedObject> {
        let ids: Vec<String> = self.objects.iter().map(|o| o.id.clone()).collect();
        ids.iter().filter_map(|id| self.remove(id)).collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Visit every top-level object in insertion order
    pub fn traverse(&self, mut visitor: impl FnMut(&PlacedObject)) {
        for object in &self.objects {
            visitor(object);
        }
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Swap an object's render tree, releasing the old geometry. The new tree
    /// takes over whatever material is currently drawn.
    pub fn replace_render_tree(&mut self, id: &str, mut root: RenderNode) -> bool {
        let Some(index) = self.objects.iter().position(|o| o.id == id) else {
            return false;
        };
        let outlines = self.outlines_visible();

        let mut old = std::mem::replace(&mut self.objects[index].root, RenderNode::group(vec![]));
        self.release_geometry(&mut old);

        for handle in root.geometry_handles_mut() {
            handle.id = Some(self.resources.register(&handle.mesh));
        }
        if let Some(current) = old.surface_material() {
            root.set_surface_material(&current);
        }
        root.set_lines_visible(LineRole::EdgeOutline, outlines);
        self.objects[index].root = root;
        true
    }

    fn release_geometry(&mut self, root: &mut RenderNode) {
        for handle in root.geometry_handles_mut() {
            if let Err(e) = self.resources.release(handle.id.take()) {
                tracing::debug!("geometry release skipped: {}", e);
            }
        }
    }

    /// Live geometry buffers held by objects in the scene
    pub fn live_geometry_count(&self) -> usize {
        self.resources.live_count()
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    // --- view mode ---

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch rendering mode.
    ///
    /// Wireframe swaps every solid's material for the shared wireframe material,
    /// saving the original once. Leaving wireframe restores the saved reference.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        let outlines = self.outlines_visible();
        let wire = self.wireframe_material.clone();
        for object in &mut self.objects {
            apply_view_material(object, mode, &wire);
            object.root.set_lines_visible(LineRole::EdgeOutline, outlines);
        }
        tracing::debug!(?mode, "view mode set");
    }

    fn sync_view_material(&self, object: &mut PlacedObject) {
        apply_view_material(object, self.view_mode, &self.wireframe_material);
    }

    pub fn wireframe_material(&self) -> &MaterialRef {
        &self.wireframe_material
    }

    pub fn outlines_visible(&self) -> bool {
        self.view_mode == ViewMode::Default
    }

    // --- helpers ---

    pub fn helpers(&self) -> &[Helper] {
        &self.helpers
    }

    pub fn helper(&self, kind: HelperKind) -> Option<&Helper> {
        self.helpers.iter().find(|h| h.kind == kind)
    }

    /// Whether a helper is drawn, after view-mode and toggle rules
    pub fn helper_visible(&self, kind: HelperKind) -> bool {
        let Some(helper) = self.helper(kind) else {
            return false;
        };
        let realistic = self.view_mode == ViewMode::Realistic;
        match kind {
            HelperKind::GroundGrid => helper.visible && self.ground_enabled && !realistic,
            HelperKind::Axes => helper.visible && self.axes_enabled && !realistic,
            HelperKind::WorkPlane | HelperKind::SketchGrid => helper.visible,
        }
    }

    pub fn set_ground_visible(&mut self, visible: bool) {
        self.ground_enabled = visible;
    }

    pub fn set_axes_visible(&mut self, visible: bool) {
        self.axes_enabled = visible;
    }

    /// Show or hide the sketch overlays (work plane and sketch grid)
    pub fn set_sketch_overlays(&mut self, visible: bool) {
        for helper in &mut self.helpers {
            if matches!(helper.kind, HelperKind::WorkPlane | HelperKind::SketchGrid) {
                helper.visible = visible;
            }
        }
    }

    /// Rebuild the sketch grid overlay; returns the new division count
    pub fn set_sketch_grid_size(&mut self, grid_size: f64) -> u32 {
        let divisions = sketch_grid_divisions(grid_size);
        if let Some(helper) = self
            .helpers
            .iter_mut()
            .find(|h| h.kind == HelperKind::SketchGrid)
        {
            helper.node = helpers::sketch_grid_node(grid_size);
        }
        tracing::debug!(grid_size, divisions, "sketch grid rebuilt");
        divisions
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    // --- preview ---

    pub fn set_preview(&mut self, node: RenderNode) {
        self.preview = Some(node);
    }

    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&RenderNode> {
        self.preview.as_ref()
    }

    // --- viewport ---

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = ViewportRect::new(
            self.viewport.x,
            self.viewport.y,
            width.max(1.0),
            height.max(1.0),
        );
    }

    /// Move and size the viewport in pointer coordinates
    pub fn set_viewport(&mut self, rect: ViewportRect) {
        self.viewport = rect;
        self.resize(rect.width, rect.height);
    }

    pub fn viewport(&self) -> ViewportRect {
        self.viewport
    }
}

/// Bring an object's materials in line with a view mode
fn apply_view_material(object: &mut PlacedObject, mode: ViewMode, wire: &MaterialRef) {
    match mode {
        ViewMode::Wireframe => {
            if object.saved_material.is_some() {
                return;
            }
            let active = object.pre_highlight.take().or_else(|| object.material());
            object.saved_material = active;
            object.set_material(wire);
        }
        ViewMode::Default | ViewMode::Realistic => {
            if let Some(saved) = object.saved_material.take() {
                object.pre_highlight = None;
                object.set_material(&saved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_default_primitive;
    use shared::ShapeKind;
    use std::rc::Rc;

    fn box_object() -> PlacedObject {
        PlacedObject::from_primitive(
            build_default_primitive(ShapeKind::Box).unwrap(),
            Color::default(),
        )
    }

    #[test]
    fn test_add_find_remove() {
        let mut scene = SceneGraph::new();
        let obj = box_object();
        let id = obj.id.clone();
        assert!(scene.add(obj));
        assert_eq!(scene.len(), 1);
        assert!(scene.find_by_id(&id).is_some());
        assert_eq!(scene.live_geometry_count(), 1);

        let removed = scene.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(scene.is_empty());
        assert_eq!(scene.live_geometry_count(), 0);
    }

    #[test]
    fn test_unknown_id_noop() {
        let mut scene = SceneGraph::new();
        assert!(scene.remove("missing").is_none());
        assert!(scene.find_by_id("missing").is_none());
        assert!(!scene.replace_render_tree("missing", RenderNode::group(vec![])));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut scene = SceneGraph::new();
        let obj = box_object();
        assert!(scene.add(obj.clone()));
        assert!(!scene.add(obj));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.live_geometry_count(), 1);
    }

    #[test]
    fn test_readd_registers_again() {
        let mut scene = SceneGraph::new();
        let obj = box_object();
        let id = obj.id.clone();
        scene.add(obj);
        let removed = scene.remove(&id).unwrap();
        assert!(scene.add(removed));
        assert_eq!(scene.live_geometry_count(), 1);
    }

    #[test]
    fn test_wireframe_roundtrip_restores_reference() {
        let mut scene = SceneGraph::new();
        scene.add(box_object());
        scene.add(box_object());
        let before: Vec<MaterialRef> = scene.objects().iter().map(|o| o.material().unwrap()).collect();

        scene.set_view_mode(ViewMode::Wireframe);
        for o in scene.objects() {
            assert!(Rc::ptr_eq(&o.material().unwrap(), scene.wireframe_material()));
        }
        // Second wireframe call must not save the wireframe material
        scene.set_view_mode(ViewMode::Wireframe);

        scene.set_view_mode(ViewMode::Default);
        for (o, b) in scene.objects().iter().zip(&before) {
            assert!(Rc::ptr_eq(&o.material().unwrap(), b));
            assert!(o.saved_material.is_none());
        }
    }

    #[test]
    fn test_added_in_wireframe_is_swapped() {
        let mut scene = SceneGraph::new();
        scene.set_view_mode(ViewMode::Wireframe);
        let obj = box_object();
        let original = obj.material().unwrap();
        let id = obj.id.clone();
        scene.add(obj);
        let placed = scene.find_by_id(&id).unwrap();
        assert!(Rc::ptr_eq(&placed.material().unwrap(), scene.wireframe_material()));
        scene.set_view_mode(ViewMode::Realistic);
        assert!(Rc::ptr_eq(&scene.find_by_id(&id).unwrap().material().unwrap(), &original));
    }

    #[test]
    fn test_recolor_in_wireframe_restores_new_color() {
        let mut scene = SceneGraph::new();
        let obj = box_object();
        let id = obj.id.clone();
        scene.add(obj);
        scene.set_view_mode(ViewMode::Wireframe);
        scene
            .find_by_id_mut(&id)
            .unwrap()
            .recolor(Color(0xff0000), Color(0xffff00));
        scene.set_view_mode(ViewMode::Default);
        assert_eq!(
            scene.find_by_id(&id).unwrap().material().unwrap().color,
            Color(0xff0000)
        );
    }

    #[test]
    fn test_realistic_hides_helpers_and_outlines() {
        let mut scene = SceneGraph::new();
        scene.add(box_object());
        assert!(scene.helper_visible(HelperKind::GroundGrid));
        scene.set_view_mode(ViewMode::Realistic);
        assert!(!scene.helper_visible(HelperKind::GroundGrid));
        assert!(!scene.helper_visible(HelperKind::Axes));
        assert!(!scene.outlines_visible());
        scene.set_view_mode(ViewMode::Default);
        assert!(scene.helper_visible(HelperKind::Axes));
    }

    #[test]
    fn test_sketch_overlays_toggle() {
        let mut scene = SceneGraph::new();
        assert!(!scene.helper_visible(HelperKind::WorkPlane));
        scene.set_sketch_overlays(true);
        assert!(scene.helper_visible(HelperKind::WorkPlane));
        assert!(scene.helper_visible(HelperKind::SketchGrid));
        scene.set_sketch_overlays(false);
        assert!(!scene.helper_visible(HelperKind::SketchGrid));
    }

    #[test]
    fn test_set_sketch_grid_size() {
        let mut scene = SceneGraph::new();
        assert_eq!(scene.set_sketch_grid_size(0.5), 200);
        let grid = scene.helper(HelperKind::SketchGrid).unwrap();
        assert_eq!(grid.node.line_count(LineRole::Helper), 2 * 201);
    }

    #[test]
    fn test_clear_returns_all_in_order() {
        let mut scene = SceneGraph::new();
        let a = box_object();
        let b = box_object();
        let ids = vec![a.id.clone(), b.id.clone()];
        scene.add(a);
        scene.add(b);
        let removed: Vec<String> = scene.clear().into_iter().map(|o| o.id).collect();
        assert_eq!(removed, ids);
        assert_eq!(scene.live_geometry_count(), 0);
    }

    #[test]
    fn test_replace_render_tree_releases_old() {
        let mut scene = SceneGraph::new();
        let obj = box_object();
        let id = obj.id.clone();
        scene.add(obj);
        let sphere = build_default_primitive(ShapeKind::Sphere).unwrap();
        let node = RenderNode::solid(sphere.mesh, Material::solid(Color::WHITE).into_ref());
        assert!(scene.replace_render_tree(&id, node));
        assert_eq!(scene.live_geometry_count(), 1);
        // Carries over the material that was drawn
        assert_eq!(
            scene.find_by_id(&id).unwrap().material().unwrap().color,
            Color::default()
        );
    }

    #[test]
    fn test_resize_clamps() {
        let mut scene = SceneGraph::new();
        scene.resize(0.0, -5.0);
        assert_eq!(scene.viewport().width, 1.0);
        assert_eq!(scene.viewport().height, 1.0);
    }
}
