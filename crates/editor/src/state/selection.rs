use glam::DVec2;
use serde::{Deserialize, Serialize};
use shared::{Color, ObjectId};

use crate::scene::{HelperKind, PlacedObject, RenderNode, SceneGraph};
use crate::viewport::camera::{ArcBallCamera, ViewportRect};
use crate::viewport::picking::{ray_mesh, Ray};

/// What kind of thing is selected. Only whole shapes are selectable for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Shape,
    Edge,
    Face,
    #[default]
    None,
}

/// Owner of the nearest ray hit
#[derive(Debug, Clone, PartialEq)]
pub enum PickTarget {
    Object(ObjectId),
    Helper(HelperKind),
}

/// Nearest hit distance of a ray against the meshes of a render tree
fn ray_tree(ray: &Ray, node: &RenderNode, object: Option<&PlacedObject>) -> Option<f64> {
    let matrix = object.map(PlacedObject::world_matrix);
    let mut nearest: Option<f64> = None;
    node.visit(&mut |n| {
        if let RenderNode::Mesh { geometry, .. } = n {
            let hit = match &matrix {
                Some(m) => ray_mesh(ray, &geometry.mesh.transformed(m)),
                None => ray_mesh(ray, &geometry.mesh),
            };
            if let Some(t) = hit {
                if nearest.map_or(true, |best| t < best) {
                    nearest = Some(t);
                }
            }
        }
    });
    nearest
}

/// Cast a ray against every visible object and pickable helper; nearest hit wins
pub fn raycast(scene: &SceneGraph, ray: &Ray) -> Option<(PickTarget, f64)> {
    let mut best: Option<(PickTarget, f64)> = None;
    let mut consider = |target: PickTarget, t: f64| {
        if best.as_ref().map_or(true, |(_, bt)| t < *bt) {
            best = Some((target, t));
        }
    };

    for object in scene.objects().iter().filter(|o| o.visible) {
        if let Some(t) = ray_tree(ray, &object.root, Some(object)) {
            consider(PickTarget::Object(object.id.clone()), t);
        }
    }
    for helper in scene.helpers() {
        if scene.helper_visible(helper.kind) {
            if let Some(t) = ray_tree(ray, &helper.node, None) {
                consider(PickTarget::Helper(helper.kind), t);
            }
        }
    }

    best
}

/// Object under the pointer, if any. A nearest hit on a helper is no hit.
pub fn pick(
    pointer: DVec2,
    viewport: &ViewportRect,
    camera: &ArcBallCamera,
    scene: &SceneGraph,
) -> Option<ObjectId> {
    let ray = camera.screen_ray(pointer, viewport);
    match raycast(scene, &ray)? {
        (PickTarget::Object(id), _) => Some(id),
        (PickTarget::Helper(_), _) => None,
    }
}

/// Swap in a highlighted copy of the current material. No-op when already highlighted.
fn highlight(object: &mut PlacedObject, tint: Color) {
    if object.pre_highlight.is_some() {
        return;
    }
    if let Some(current) = object.material() {
        let lit = current.highlighted(tint).into_ref();
        object.pre_highlight = Some(current);
        object.set_material(&lit);
    }
}

/// Put back the pre-highlight material. No-op when never highlighted.
fn restore(object: &mut PlacedObject) {
    if let Some(prev) = object.pre_highlight.take() {
        object.set_material(&prev);
    }
}

/// Single-object selection
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<ObjectId>,
    kind: SelectionKind,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an object, un-highlighting the previous one. Unknown ids leave
    /// the selection unchanged and return false.
    pub fn select(&mut self, scene: &mut SceneGraph, id: &str, tint: Color) -> bool {
        if scene.find_by_id(id).is_none() {
            return false;
        }
        if self.selected.as_deref() == Some(id) {
            return true;
        }
        self.clear_selection(scene);

        if let Some(object) = scene.find_by_id_mut(id) {
            highlight(object, tint);
        }
        self.selected = Some(id.to_string());
        self.kind = SelectionKind::Shape;
        tracing::debug!(id, "selected");
        true
    }

    /// Restore the selected object's look and select nothing
    pub fn clear_selection(&mut self, scene: &mut SceneGraph) {
        if let Some(id) = self.selected.take() {
            if let Some(object) = scene.find_by_id_mut(&id) {
                restore(object);
            }
            tracing::debug!(%id, "selection cleared");
        }
        self.kind = SelectionKind::None;
    }

    /// Take the highlight off the selected object, keeping it selected
    pub fn unhighlight(&self, scene: &mut SceneGraph) {
        if let Some(object) = self.selected.as_deref().and_then(|id| scene.find_by_id_mut(id)) {
            restore(object);
        }
    }

    /// Put the highlight back on the selected object
    pub fn rehighlight(&self, scene: &mut SceneGraph, tint: Color) {
        if let Some(object) = self.selected.as_deref().and_then(|id| scene.find_by_id_mut(id)) {
            highlight(object, tint);
        }
    }

    /// Selected id, dropping it if the object is no longer in the scene
    pub fn selected(&mut self, scene: &SceneGraph) -> Option<&str> {
        if let Some(id) = &self.selected {
            if scene.find_by_id(id).is_none() {
                self.selected = None;
                self.kind = SelectionKind::None;
            }
        }
        self.selected.as_deref()
    }

    /// Selected id without checking the scene
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_default_primitive;
    use glam::DVec3;
    use shared::ShapeKind;
    use std::rc::Rc;

    const TINT: Color = Color(0xffaa33);

    fn scene_with_boxes(xs: &[f64]) -> (SceneGraph, Vec<ObjectId>) {
        let mut scene = SceneGraph::new();
        let mut ids = Vec::new();
        for x in xs {
            let obj = PlacedObject::from_primitive(
                build_default_primitive(ShapeKind::Box).unwrap(),
                Color::default(),
            )
            .with_position(DVec3::new(*x, 0.0, 0.0));
            ids.push(obj.id.clone());
            scene.add(obj);
        }
        (scene, ids)
    }

    #[test]
    fn test_pick_center_hits_object() {
        let (scene, ids) = scene_with_boxes(&[0.0]);
        let rect = ViewportRect::sized(800.0, 600.0);
        let picked = pick(rect.center(), &rect, &scene.camera, &scene);
        assert_eq!(picked.as_deref(), Some(ids[0].as_str()));
    }

    #[test]
    fn test_pick_empty_space() {
        let (scene, _) = scene_with_boxes(&[0.0]);
        let rect = ViewportRect::sized(800.0, 600.0);
        assert!(pick(DVec2::new(2.0, 2.0), &rect, &scene.camera, &scene).is_none());
    }

    #[test]
    fn test_pick_nearest_of_two() {
        let mut scene = SceneGraph::new();
        let near = PlacedObject::from_primitive(
            build_default_primitive(ShapeKind::Box).unwrap(),
            Color::default(),
        )
        .with_position(DVec3::new(0.0, 5.0, 0.0));
        let far = PlacedObject::from_primitive(
            build_default_primitive(ShapeKind::Box).unwrap(),
            Color::default(),
        );
        let near_id = near.id.clone();
        scene.add(far);
        scene.add(near);
        let ray = Ray::new(DVec3::new(0.0, 20.0, 0.0), DVec3::NEG_Y);
        let (target, t) = raycast(&scene, &ray).unwrap();
        assert_eq!(target, PickTarget::Object(near_id));
        assert!((t - 14.5).abs() < 1e-9);
    }

    #[test]
    fn test_work_plane_hit_is_no_hit() {
        let mut scene = SceneGraph::new();
        scene.set_sketch_overlays(true);
        let rect = ViewportRect::sized(800.0, 600.0);
        assert!(pick(rect.center(), &rect, &scene.camera, &scene).is_none());
        let ray = scene.camera.screen_ray(rect.center(), &rect);
        assert!(matches!(
            raycast(&scene, &ray),
            Some((PickTarget::Helper(HelperKind::WorkPlane), _))
        ));
    }

    #[test]
    fn test_hidden_objects_not_picked() {
        let (mut scene, ids) = scene_with_boxes(&[0.0]);
        scene.find_by_id_mut(&ids[0]).unwrap().visible = false;
        let ray = Ray::new(DVec3::new(0.0, 20.0, 0.0), DVec3::NEG_Y);
        assert!(raycast(&scene, &ray).is_none());
    }

    #[test]
    fn test_single_highlight() {
        let (mut scene, ids) = scene_with_boxes(&[0.0, 3.0]);
        let base0 = scene.find_by_id(&ids[0]).unwrap().material().unwrap();
        let mut sel = SelectionState::new();

        assert!(sel.select(&mut scene, &ids[0], TINT));
        assert!(scene.find_by_id(&ids[0]).unwrap().is_highlighted());
        assert_eq!(sel.kind(), SelectionKind::Shape);

        assert!(sel.select(&mut scene, &ids[1], TINT));
        let first = scene.find_by_id(&ids[0]).unwrap();
        assert!(!first.is_highlighted());
        assert!(Rc::ptr_eq(&first.material().unwrap(), &base0));
        let highlighted = scene.objects().iter().filter(|o| o.is_highlighted()).count();
        assert_eq!(highlighted, 1);
    }

    #[test]
    fn test_clear_restores_and_is_idempotent() {
        let (mut scene, ids) = scene_with_boxes(&[0.0]);
        let base = scene.find_by_id(&ids[0]).unwrap().material().unwrap();
        let mut sel = SelectionState::new();
        sel.select(&mut scene, &ids[0], TINT);
        sel.clear_selection(&mut scene);
        sel.clear_selection(&mut scene);
        assert!(sel.selected_id().is_none());
        assert_eq!(sel.kind(), SelectionKind::None);
        assert!(Rc::ptr_eq(&scene.find_by_id(&ids[0]).unwrap().material().unwrap(), &base));
    }

    #[test]
    fn test_restore_never_highlighted_is_noop() {
        let (mut scene, ids) = scene_with_boxes(&[0.0]);
        let obj = scene.find_by_id_mut(&ids[0]).unwrap();
        let before = obj.material().unwrap();
        restore(obj);
        assert!(Rc::ptr_eq(&obj.material().unwrap(), &before));
    }

    #[test]
    fn test_removed_object_drops_selection() {
        let (mut scene, ids) = scene_with_boxes(&[0.0]);
        let mut sel = SelectionState::new();
        sel.select(&mut scene, &ids[0], TINT);
        scene.remove(&ids[0]);
        assert!(sel.selected(&scene).is_none());
    }

    #[test]
    fn test_unhighlight_keeps_selection() {
        let (mut scene, ids) = scene_with_boxes(&[0.0]);
        let mut sel = SelectionState::new();
        sel.select(&mut scene, &ids[0], TINT);
        sel.unhighlight(&mut scene);
        assert!(!scene.find_by_id(&ids[0]).unwrap().is_highlighted());
        assert!(sel.is_selected(&ids[0]));
        sel.rehighlight(&mut scene, TINT);
        assert!(scene.find_by_id(&ids[0]).unwrap().is_highlighted());
    }

    #[test]
    fn test_select_unknown_id() {
        let (mut scene, ids) = scene_with_boxes(&[0.0]);
        let mut sel = SelectionState::new();
        sel.select(&mut scene, &ids[0], TINT);
        assert!(!sel.select(&mut scene, "nope", TINT));
        assert!(sel.is_selected(&ids[0]));
    }
}
