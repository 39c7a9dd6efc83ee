//! JSON command protocol over [`EditorState`].
//!
//! Every command maps onto one editor operation, so a script or test driver
//! can replay a whole editing session.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use shared::{Color, ShapeKind, ShapeParams};

use crate::build::SketchTool;
use crate::scene::ViewMode;
use crate::state::transform::{GizmoAxis, TransformMode};
use crate::state::EditorState;

/// A command an external driver can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Add a primitive at the origin; default parameters when omitted
    CreatePrimitive {
        kind: ShapeKind,
        #[serde(default)]
        parameters: Option<serde_json::Value>,
    },
    EnableSketch {
        tool: SketchTool,
        #[serde(default)]
        hollow: bool,
        #[serde(default)]
        sides: Option<u32>,
    },
    DisableSketch,
    SetSnap {
        enabled: bool,
    },
    SetGridSize {
        size: f64,
    },
    SetHollow {
        enabled: bool,
    },
    SetExtrude {
        enabled: bool,
    },
    SetExtrudeDepth {
        depth: f64,
    },
    SetViewMode {
        mode: ViewMode,
    },
    SetTransformMode {
        mode: TransformMode,
    },
    /// Press on the work plane (world coordinates)
    SketchDown {
        point: [f64; 3],
    },
    SketchMove {
        point: [f64; 3],
    },
    SketchUp {
        point: [f64; 3],
    },
    /// Drag the attached object's widget along one axis in a single step
    Transform {
        axis: GizmoAxis,
        amount: f64,
    },
    Undo,
    Redo,
    ClearAll,
    Select {
        id: String,
    },
    ClearSelection,
    DeleteSelected,
    ToggleVisibility,
    SetColor {
        color: Color,
    },
    ExtrudeSelected {
        #[serde(default)]
        depth: Option<f64>,
    },
    Inspect,
    ExportScene,
    ImportScene {
        scene_json: String,
    },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn parse_params(kind: ShapeKind, parameters: serde_json::Value) -> Result<ShapeParams, String> {
    serde_json::from_value(serde_json::json!({ "kind": kind, "parameters": parameters }))
        .map_err(|e| format!("Invalid parameters for {}: {e}", kind.label()))
}

/// Execute a single command on the editor.
pub fn execute_command(state: &mut EditorState, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::CreatePrimitive { kind, parameters } => {
            let params = match parameters.map(|p| parse_params(kind, p)).transpose() {
                Ok(params) => params,
                Err(e) => return CommandResponse::err(e),
            };
            match state.create_primitive(kind, params) {
                Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
                Err(e) => CommandResponse::err(e),
            }
        }

        EditorCommand::EnableSketch {
            tool,
            hollow,
            sides,
        } => {
            state.enable_sketch(tool, hollow, sides);
            CommandResponse::ok()
        }

        EditorCommand::DisableSketch => {
            state.disable_sketch();
            CommandResponse::ok()
        }

        EditorCommand::SetSnap { enabled } => {
            state.set_snap(enabled);
            CommandResponse::ok()
        }

        EditorCommand::SetGridSize { size } => {
            if state.set_grid_size(size) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Invalid grid size {size}"))
            }
        }

        EditorCommand::SetHollow { enabled } => {
            state.set_hollow(enabled);
            CommandResponse::ok()
        }

        EditorCommand::SetExtrude { enabled } => {
            state.set_extrude(enabled);
            CommandResponse::ok()
        }

        EditorCommand::SetExtrudeDepth { depth } => {
            if state.set_extrude_depth(depth) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("Invalid extrude depth {depth}"))
            }
        }

        EditorCommand::SetViewMode { mode } => {
            state.set_view_mode(mode);
            CommandResponse::ok()
        }

        EditorCommand::SetTransformMode { mode } => {
            state.set_transform_mode(mode);
            CommandResponse::ok()
        }

        EditorCommand::SketchDown { point } => {
            let started = state.sketch_down(DVec3::from_array(point));
            CommandResponse::ok_with_data(serde_json::json!({ "drawing": started }))
        }

        EditorCommand::SketchMove { point } => {
            let moved = state.sketch_move(DVec3::from_array(point));
            CommandResponse::ok_with_data(serde_json::json!({ "moved": moved }))
        }

        EditorCommand::SketchUp { point } => {
            let id = state.sketch_up(DVec3::from_array(point));
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        EditorCommand::Transform { axis, amount } => {
            if !state.begin_transform(axis) {
                return CommandResponse::err("No object attached to the transform widget");
            }
            state.drag_transform(amount);
            let recorded = state.end_transform();
            CommandResponse::ok_with_data(serde_json::json!({ "recorded": recorded }))
        }

        EditorCommand::Undo => {
            let success = state.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = state.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        EditorCommand::ClearAll => {
            let removed = state.clear_all();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::Select { id } => {
            if state.select(&id) {
                CommandResponse::ok_with_data(serde_json::json!({ "selected": id }))
            } else {
                CommandResponse::err(format!("Cannot select {id}"))
            }
        }

        EditorCommand::ClearSelection => {
            state.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::DeleteSelected => {
            let removed = state.delete_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::ToggleVisibility => match state.toggle_visibility() {
            Some(visible) => CommandResponse::ok_with_data(serde_json::json!({ "visible": visible })),
            None => CommandResponse::err("Nothing selected"),
        },

        EditorCommand::SetColor { color } => {
            if state.set_color(color) {
                CommandResponse::ok()
            } else {
                CommandResponse::err("Nothing selected")
            }
        }

        EditorCommand::ExtrudeSelected { depth } => match state.extrude_selected(depth) {
            Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            None => CommandResponse::err("Selected object cannot be extruded"),
        },

        EditorCommand::Inspect => CommandResponse::ok_with_data(state.inspect()),

        EditorCommand::ExportScene => match state.export_json() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::ImportScene { scene_json } => match state.import_json(&scene_json) {
            Ok(count) => CommandResponse::ok_with_data(serde_json::json!({ "imported": count })),
            Err(e) => CommandResponse::err(e.to_string()),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(state: &mut EditorState, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(state, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    state: &mut EditorState,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(state, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_undo() {
        let cmd: EditorCommand = serde_json::from_str(r#"{"command": "undo"}"#).unwrap();
        assert!(matches!(cmd, EditorCommand::Undo));
    }

    #[test]
    fn test_command_serde_enable_sketch() {
        let json = r#"{"command": "enable_sketch", "tool": "polygon", "hollow": true, "sides": 8}"#;
        match serde_json::from_str::<EditorCommand>(json).unwrap() {
            EditorCommand::EnableSketch {
                tool,
                hollow,
                sides,
            } => {
                assert_eq!(tool, SketchTool::Polygon);
                assert!(hollow);
                assert_eq!(sides, Some(8));
            }
            _ => panic!("Expected EnableSketch"),
        }
    }

    #[test]
    fn test_execute_create_with_parameters() {
        let mut state = EditorState::default();
        let json = r#"{"command": "create_primitive", "kind": "Cylinder", "parameters": {"radiusTop": 1.0, "radiusBottom": 2.0, "height": 3.0, "radialSegments": 12}}"#;
        let resp = execute_json(&mut state, json).unwrap();
        assert!(resp.success, "{:?}", resp.error);
        let obj = &state.scene.objects()[0];
        assert_eq!(
            obj.metadata.shape,
            ShapeParams::Cylinder {
                radius_top: 1.0,
                radius_bottom: 2.0,
                height: 3.0,
                radial_segments: 12
            }
        );
    }

    #[test]
    fn test_execute_create_bad_parameters() {
        let mut state = EditorState::default();
        let json = r#"{"command": "create_primitive", "kind": "Box", "parameters": {"width": 1.0}}"#;
        let resp = execute_json(&mut state, json).unwrap();
        assert!(!resp.success);
        assert!(state.scene.is_empty());

        let json = r#"{"command": "create_primitive", "kind": "Extruded"}"#;
        assert!(!execute_json(&mut state, json).unwrap().success);
    }

    #[test]
    fn test_execute_inspect() {
        let mut state = EditorState::default();
        execute_json(&mut state, r#"{"command": "create_primitive", "kind": "Box"}"#).unwrap();
        execute_json(&mut state, r#"{"command": "create_primitive", "kind": "Sphere"}"#).unwrap();

        let resp = execute_json(&mut state, r#"{"command": "inspect"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["objects"].as_array().unwrap().len(), 2);
        assert_eq!(data["undoDepth"], 2);
    }

    #[test]
    fn test_execute_undo_redo() {
        let mut state = EditorState::default();
        execute_json(&mut state, r#"{"command": "create_primitive", "kind": "Torus"}"#).unwrap();

        let resp = execute_json(&mut state, r#"{"command": "undo"}"#).unwrap();
        assert_eq!(resp.data.unwrap()["undone"], true);
        assert!(state.scene.is_empty());

        let resp = execute_json(&mut state, r#"{"command": "redo"}"#).unwrap();
        assert_eq!(resp.data.unwrap()["redone"], true);
        assert_eq!(state.scene.len(), 1);
    }

    #[test]
    fn test_execute_transform_requires_attachment() {
        let mut state = EditorState::default();
        let resp =
            execute_json(&mut state, r#"{"command": "transform", "axis": "x", "amount": 1.0}"#)
                .unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut state = EditorState::default();
        assert!(execute_json(&mut state, "not valid json").is_err());
        assert!(execute_json(&mut state, r#"{"command": "explode"}"#).is_err());
    }
}
