//! Factory functions for creating test data.
//!
//! Provides helpers to construct placed objects, populated scenes, editor
//! states and scene documents used by tests and by command-driven sessions.

use glam::DVec3;
use shared::*;

use crate::build::{
    build_default_primitive, build_primitive, build_profile, placement_origin, sketch_params,
};
use crate::build::{ProfileOptions, SketchTool};
use crate::scene::{PlacedObject, SceneGraph, SKETCH_SURFACE_OFFSET};
use crate::state::EditorState;

// ── Object factories ────────────────────────────────────────────

/// Default-parameter primitive at the origin.
pub fn primitive(kind: ShapeKind) -> PlacedObject {
    let desc = match build_default_primitive(kind) {
        Ok(desc) => desc,
        Err(e) => panic!("{} is not a primitive: {e}", kind.label()),
    };
    PlacedObject::from_primitive(desc, Color::default())
}

/// Default-parameter primitive at a given position.
pub fn primitive_at(kind: ShapeKind, pos: [f64; 3]) -> PlacedObject {
    primitive(kind).with_position(DVec3::from_array(pos))
}

/// Box with explicit dimensions.
pub fn box_object(width: f64, height: f64, depth: f64) -> PlacedObject {
    let params = ShapeParams::Box {
        width,
        height,
        depth,
    };
    match build_primitive(&params) {
        Ok(desc) => PlacedObject::from_primitive(desc, Color::default()),
        Err(e) => panic!("invalid box: {e}"),
    }
}

/// Flat sketch object drawn with `tool` from `start` to `end` on the work plane.
pub fn flat_sketch(tool: SketchTool, start: [f64; 2], end: [f64; 2], hollow: bool) -> PlacedObject {
    let start = DVec3::new(start[0], 0.0, start[1]);
    let end = DVec3::new(end[0], 0.0, end[1]);
    let options = ProfileOptions {
        hollow,
        ..Default::default()
    };
    let profile = build_profile(tool, start, end, &options);
    let params = sketch_params(tool, start, end, &options);
    let origin = placement_origin(tool, start, end);
    PlacedObject::flat_sketch(params, profile, Color::default())
        .with_position(DVec3::new(origin.x, SKETCH_SURFACE_OFFSET, origin.z))
}

// ── Scene factories ─────────────────────────────────────────────

/// Scene with the given objects already added.
pub fn scene_with(objects: Vec<PlacedObject>) -> SceneGraph {
    let mut scene = SceneGraph::new();
    for object in objects {
        scene.add(object);
    }
    scene
}

/// Scene with one of every primitive, spaced along X.
pub fn scene_all_primitives() -> SceneGraph {
    scene_with(
        ShapeKind::PRIMITIVES
            .iter()
            .enumerate()
            .map(|(i, kind)| primitive_at(*kind, [i as f64 * 2.0, 0.0, 0.0]))
            .collect(),
    )
}

/// Fresh editor state with default settings.
pub fn editor() -> EditorState {
    EditorState::default()
}

/// Editor state after creating the given primitives through the command surface.
pub fn editor_with(kinds: &[ShapeKind]) -> EditorState {
    let mut state = editor();
    for kind in kinds {
        if let Err(e) = state.create_primitive(*kind, None) {
            panic!("cannot create {}: {e}", kind.label());
        }
    }
    state
}

// ── Scene document factories ───────────────────────────────────

/// Record for an object at a position with identity rotation and unit scale.
pub fn record(
    id: &str,
    shape: ShapeParams,
    face_count: u32,
    edge_count: u32,
    pos: [f64; 3],
) -> SceneObjectRecord {
    SceneObjectRecord {
        metadata: ShapeMetadata {
            id: id.to_string(),
            shape,
            face_count,
            edge_count,
        },
        position: Xyz::from(pos),
        rotation: Xyz::new(0.0, 0.0, 0.0),
        scale: Xyz::new(1.0, 1.0, 1.0),
    }
}

/// Scene document with a unit box and a sphere.
pub fn scene_file_box_and_sphere() -> SceneFile {
    SceneFile {
        version: SCENE_FORMAT_VERSION.to_string(),
        objects: vec![
            record(
                "box1",
                ShapeParams::Box {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                },
                6,
                12,
                [0.0, 0.0, 0.0],
            ),
            record(
                "sphere1",
                ShapeParams::Sphere {
                    radius: 0.5,
                    width_segments: 32,
                    height_segments: 16,
                },
                512,
                1024,
                [3.0, 0.0, 0.0],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_factories() {
        let obj = primitive_at(ShapeKind::Cone, [1.0, 2.0, 3.0]);
        assert_eq!(obj.metadata.kind(), ShapeKind::Cone);
        assert_eq!(obj.position, DVec3::new(1.0, 2.0, 3.0));

        let b = box_object(2.0, 3.0, 4.0);
        assert_eq!(b.metadata.face_count, 6);
    }

    #[test]
    fn test_flat_sketch_factory() {
        let obj = flat_sketch(SketchTool::Rectangle, [0.0, 0.0], [2.0, 4.0], false);
        assert_eq!(obj.metadata.kind(), ShapeKind::SketchRectangle);
        assert!(obj.profile.is_some());
        assert_eq!(obj.position, DVec3::new(1.0, 0.01, 2.0));
    }

    #[test]
    fn test_scene_factories() {
        assert_eq!(scene_all_primitives().len(), 6);
        assert!(scene_with(vec![]).is_empty());
        assert_eq!(scene_file_box_and_sphere().objects.len(), 2);
    }

    #[test]
    fn test_editor_with() {
        let mut state = editor_with(&[ShapeKind::Box, ShapeKind::Torus]);
        assert_eq!(state.scene.len(), 2);
        assert_eq!(state.history.undo_depth(), 2);
        assert!(state.selected_id().is_some());
    }
}
