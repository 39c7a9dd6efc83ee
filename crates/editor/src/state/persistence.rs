//! Scene JSON export and import
//!
//! Only parameters and transforms are stored; geometry is rebuilt on import.

use std::collections::HashSet;

use glam::{DQuat, DVec3, EulerRot};
use shared::{Color, SceneFile, SceneObjectRecord, ShapeKind, Xyz, SCENE_FORMAT_VERSION};

use crate::build::{build_primitive, profile_for_params};
use crate::scene::{new_object_id, PlacedObject, SceneGraph};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("malformed scene JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("object {index}: {reason}")]
    InvalidObject { index: usize, reason: String },
}

/// Objects rebuilt from a scene file, ready to replace the current scene
#[derive(Debug)]
pub struct ImportedScene {
    pub objects: Vec<PlacedObject>,
    /// Entries that cannot be rebuilt (extrusions)
    pub skipped: usize,
}

fn to_xyz(v: DVec3) -> Xyz {
    Xyz::new(v.x, v.y, v.z)
}

fn from_xyz(v: &Xyz) -> DVec3 {
    DVec3::new(v.x, v.y, v.z)
}

/// Serializable record of one object
pub fn object_record(object: &PlacedObject) -> SceneObjectRecord {
    let (rx, ry, rz) = object.orientation.to_euler(EulerRot::XYZ);
    SceneObjectRecord {
        metadata: object.metadata.clone(),
        position: to_xyz(object.position),
        rotation: Xyz::new(rx, ry, rz),
        scale: to_xyz(object.scale),
    }
}

/// Scene file of every top-level object
pub fn export_scene(scene: &SceneGraph) -> SceneFile {
    let mut objects = Vec::with_capacity(scene.len());
    scene.traverse(|o| objects.push(object_record(o)));
    SceneFile {
        version: SCENE_FORMAT_VERSION.to_string(),
        objects,
    }
}

pub fn export_json(scene: &SceneGraph) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export_scene(scene))
}

/// Rebuild one object from its record
pub fn object_from_record(record: &SceneObjectRecord, color: Color) -> Result<PlacedObject, String> {
    let params = &record.metadata.shape;
    params.validate()?;

    let mut object = match params.kind() {
        kind if kind.is_primitive() => PlacedObject::from_primitive(build_primitive(params)?, color),
        kind if kind.is_sketch() => {
            let profile = profile_for_params(params)
                .ok_or_else(|| format!("{} has no profile", kind.label()))?;
            PlacedObject::flat_sketch(params.clone(), profile, color)
        }
        kind => return Err(format!("{} cannot be rebuilt", kind.label())),
    };

    let position = from_xyz(&record.position);
    let rotation = from_xyz(&record.rotation);
    let scale = from_xyz(&record.scale);
    if !(position.is_finite() && rotation.is_finite() && scale.is_finite()) {
        return Err("non-finite transform".to_string());
    }

    object.position = position;
    object.orientation = DQuat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    object.scale = scale;
    Ok(object)
}

/// Parse a scene document and rebuild all of its objects. Nothing is applied
/// here: either every object is rebuilt or an error is returned.
pub fn import_json(json: &str, color: Color) -> Result<ImportedScene, ImportError> {
    let file: SceneFile = serde_json::from_str(json)?;
    if file.version != SCENE_FORMAT_VERSION {
        tracing::warn!(version = %file.version, "unexpected scene version, importing anyway");
    }

    let mut objects = Vec::with_capacity(file.objects.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut skipped = 0;

    for (index, record) in file.objects.iter().enumerate() {
        if record.metadata.kind() == ShapeKind::Extruded {
            tracing::warn!(index, "extruded objects cannot be imported, skipping");
            skipped += 1;
            continue;
        }

        let mut object = object_from_record(record, color)
            .map_err(|reason| ImportError::InvalidObject { index, reason })?;

        // Keep stored ids unless missing or repeated
        let stored = record.metadata.id.trim();
        let id = if stored.is_empty() || seen.contains(stored) {
            new_object_id()
        } else {
            stored.to_string()
        };
        seen.insert(id.clone());
        object.id = id.clone();
        object.metadata.id = id;

        objects.push(object);
    }

    Ok(ImportedScene { objects, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_default_primitive;
    use shared::ShapeParams;

    fn sample_scene() -> SceneGraph {
        let mut scene = SceneGraph::new();
        let mut obj = PlacedObject::from_primitive(
            build_default_primitive(ShapeKind::Torus).unwrap(),
            Color::default(),
        );
        obj.position = DVec3::new(1.0, 2.0, -3.0);
        obj.orientation = DQuat::from_euler(EulerRot::XYZ, 0.3, -0.2, 1.1);
        obj.scale = DVec3::new(1.0, 2.0, 0.5);
        scene.add(obj);
        scene
    }

    #[test]
    fn test_export_layout() {
        let scene = sample_scene();
        let value: serde_json::Value =
            serde_json::from_str(&export_json(&scene).unwrap()).unwrap();
        assert_eq!(value["version"], "1.0");
        let obj = &value["objects"][0];
        assert_eq!(obj["metadata"]["kind"], "Torus");
        assert_eq!(obj["metadata"]["faceCount"], 16 * 48);
        assert_eq!(obj["position"]["z"], -3.0);
        assert!((obj["rotation"]["x"].as_f64().unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_keeps_id_and_transform() {
        let scene = sample_scene();
        let original = &scene.objects()[0];
        let imported = import_json(&export_json(&scene).unwrap(), Color::default()).unwrap();
        assert_eq!(imported.skipped, 0);
        let back = &imported.objects[0];
        assert_eq!(back.id, original.id);
        assert_eq!(back.metadata, original.metadata);
        assert!((back.position - original.position).length() < 1e-6);
        assert!((back.scale - original.scale).length() < 1e-6);
        assert!(back.orientation.angle_between(original.orientation) < 1e-6);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            import_json("{not json", Color::default()),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_kind_fails() {
        let json = r#"{"version":"1.0","objects":[{"metadata":{"kind":"Pyramid","id":"a","parameters":{},"faceCount":5,"edgeCount":8},"position":{"x":0,"y":0,"z":0},"rotation":{"x":0,"y":0,"z":0},"scale":{"x":1,"y":1,"z":1}}]}"#;
        assert!(matches!(import_json(json, Color::default()), Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_invalid_parameters_fail_whole_import() {
        let mut file = export_scene(&sample_scene());
        let mut bad = file.objects[0].clone();
        bad.metadata.shape = ShapeParams::Box {
            width: -1.0,
            height: 1.0,
            depth: 1.0,
        };
        file.objects.push(bad);
        let json = serde_json::to_string(&file).unwrap();
        match import_json(&json, Color::default()) {
            Err(ImportError::InvalidObject { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_oversized_segment_counts_fail_import() {
        let oversized = [
            ShapeParams::SketchPolygon {
                radius: 1.0,
                sides: u32::MAX,
                hollow: false,
            },
            ShapeParams::Sphere {
                radius: 1.0,
                width_segments: 4_000_000_000,
                height_segments: 16,
            },
        ];
        for shape in oversized {
            let mut file = export_scene(&sample_scene());
            file.objects[0].metadata.shape = shape;
            let json = serde_json::to_string(&file).unwrap();
            match import_json(&json, Color::default()) {
                Err(ImportError::InvalidObject { index, .. }) => assert_eq!(index, 0),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_extruded_skipped() {
        let mut file = export_scene(&sample_scene());
        let mut ext = file.objects[0].clone();
        ext.metadata.shape = ShapeParams::Extruded { depth: 2.0 };
        ext.metadata.id = "ext".into();
        file.objects.insert(0, ext);
        let imported = import_json(&serde_json::to_string(&file).unwrap(), Color::default()).unwrap();
        assert_eq!(imported.skipped, 1);
        assert_eq!(imported.objects.len(), 1);
        assert_eq!(imported.objects[0].metadata.kind(), ShapeKind::Torus);
    }

    #[test]
    fn test_duplicate_ids_reassigned() {
        let mut file = export_scene(&sample_scene());
        file.objects.push(file.objects[0].clone());
        let imported = import_json(&serde_json::to_string(&file).unwrap(), Color::default()).unwrap();
        assert_eq!(imported.objects.len(), 2);
        assert_ne!(imported.objects[0].id, imported.objects[1].id);
        assert_eq!(imported.objects[1].id, imported.objects[1].metadata.id);
    }

    #[test]
    fn test_sketch_objects_rebuilt_with_profile() {
        let json = r#"{"version":"1.0","objects":[{"metadata":{"kind":"SketchPolygon","id":"p","parameters":{"radius":2.0,"sides":5,"hollow":true},"faceCount":1,"edgeCount":10},"position":{"x":1,"y":0.01,"z":1},"rotation":{"x":0,"y":0,"z":0},"scale":{"x":1,"y":1,"z":1}}]}"#;
        let imported = import_json(json, Color::default()).unwrap();
        let obj = &imported.objects[0];
        let profile = obj.profile.as_ref().unwrap();
        assert_eq!(profile.outer.len(), 5);
        assert_eq!(profile.holes.len(), 1);
        assert_eq!(obj.position, DVec3::new(1.0, 0.01, 1.0));
    }
}
