use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Версия формата JSON-файла сцены
pub const SCENE_FORMAT_VERSION: &str = "1.0";

/// Наибольшее число сегментов у примитивов
pub const MAX_SEGMENTS: u32 = 512;

/// Наибольшее число сторон многоугольника эскиза
pub const MAX_POLYGON_SIDES: u32 = 12;

// ============================================================================
// Типы фигур
// ============================================================================

/// Тип фигуры (примитив, выдавливание или плоский эскиз)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Plane,
    Extruded,
    SketchRectangle,
    SketchCircle,
    SketchTriangle,
    SketchEllipse,
    SketchPolygon,
}

impl ShapeKind {
    /// Шесть твёрдых примитивов
    pub const PRIMITIVES: [ShapeKind; 6] = [
        ShapeKind::Box,
        ShapeKind::Sphere,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
        ShapeKind::Torus,
        ShapeKind::Plane,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Box => "Box",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Cone => "Cone",
            ShapeKind::Torus => "Torus",
            ShapeKind::Plane => "Plane",
            ShapeKind::Extruded => "Extruded",
            ShapeKind::SketchRectangle => "Rectangle",
            ShapeKind::SketchCircle => "Circle",
            ShapeKind::SketchTriangle => "Triangle",
            ShapeKind::SketchEllipse => "Ellipse",
            ShapeKind::SketchPolygon => "Polygon",
        }
    }

    /// Твёрдый примитив (создаётся командой create-primitive)
    pub fn is_primitive(&self) -> bool {
        Self::PRIMITIVES.contains(self)
    }

    /// Плоская фигура эскиза
    pub fn is_sketch(&self) -> bool {
        matches!(
            self,
            ShapeKind::SketchRectangle
                | ShapeKind::SketchCircle
                | ShapeKind::SketchTriangle
                | ShapeKind::SketchEllipse
                | ShapeKind::SketchPolygon
        )
    }
}

/// Параметры фигуры. Тип и параметры хранятся вместе, чтобы тип
/// не мог получить чужие параметры: `{"kind": "Box", "parameters": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "parameters", rename_all_fields = "camelCase")]
pub enum ShapeParams {
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f64,
        radius_bottom: f64,
        height: f64,
        radial_segments: u32,
    },
    Cone {
        radius: f64,
        height: f64,
        radial_segments: u32,
    },
    Torus {
        radius: f64,
        tube: f64,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Plane {
        width: f64,
        height: f64,
    },
    /// Выдавленный профиль. Профиль не сохраняется, поэтому восстановить
    /// геометрию по этим параметрам нельзя.
    Extruded {
        depth: f64,
    },
    SketchRectangle {
        width: f64,
        depth: f64,
        hollow: bool,
    },
    SketchCircle {
        radius: f64,
        hollow: bool,
    },
    SketchTriangle {
        width: f64,
        depth: f64,
        hollow: bool,
    },
    SketchEllipse {
        radius_x: f64,
        radius_z: f64,
        hollow: bool,
    },
    SketchPolygon {
        radius: f64,
        sides: u32,
        hollow: bool,
    },
}

impl ShapeParams {
    /// Тип фигуры
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParams::Box { .. } => ShapeKind::Box,
            ShapeParams::Sphere { .. } => ShapeKind::Sphere,
            ShapeParams::Cylinder { .. } => ShapeKind::Cylinder,
            ShapeParams::Cone { .. } => ShapeKind::Cone,
            ShapeParams::Torus { .. } => ShapeKind::Torus,
            ShapeParams::Plane { .. } => ShapeKind::Plane,
            ShapeParams::Extruded { .. } => ShapeKind::Extruded,
            ShapeParams::SketchRectangle { .. } => ShapeKind::SketchRectangle,
            ShapeParams::SketchCircle { .. } => ShapeKind::SketchCircle,
            ShapeParams::SketchTriangle { .. } => ShapeKind::SketchTriangle,
            ShapeParams::SketchEllipse { .. } => ShapeKind::SketchEllipse,
            ShapeParams::SketchPolygon { .. } => ShapeKind::SketchPolygon,
        }
    }

    /// Параметры по умолчанию для твёрдого примитива.
    /// Для эскизов и выдавливания значений по умолчанию нет.
    pub fn default_for(kind: ShapeKind) -> Option<Self> {
        let params = match kind {
            ShapeKind::Box => ShapeParams::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            ShapeKind::Sphere => ShapeParams::Sphere {
                radius: 0.5,
                width_segments: 32,
                height_segments: 16,
            },
            ShapeKind::Cylinder => ShapeParams::Cylinder {
                radius_top: 0.5,
                radius_bottom: 0.5,
                height: 1.0,
                radial_segments: 32,
            },
            ShapeKind::Cone => ShapeParams::Cone {
                radius: 0.5,
                height: 1.0,
                radial_segments: 32,
            },
            ShapeKind::Torus => ShapeParams::Torus {
                radius: 0.5,
                tube: 0.2,
                radial_segments: 16,
                tubular_segments: 48,
            },
            ShapeKind::Plane => ShapeParams::Plane {
                width: 1.0,
                height: 1.0,
            },
            _ => return None,
        };
        Some(params)
    }

    /// Флаг «полая фигура» (только для эскизов)
    pub fn is_hollow(&self) -> bool {
        match self {
            ShapeParams::SketchRectangle { hollow, .. }
            | ShapeParams::SketchCircle { hollow, .. }
            | ShapeParams::SketchTriangle { hollow, .. }
            | ShapeParams::SketchEllipse { hollow, .. }
            | ShapeParams::SketchPolygon { hollow, .. } => *hollow,
            _ => false,
        }
    }

    /// Проверка параметров: размеры конечны и неотрицательны,
    /// количество сегментов в допустимом диапазоне.
    pub fn validate(&self) -> Result<(), String> {
        let dims: Vec<(&str, f64)> = match self {
            ShapeParams::Box { width, height, depth } => {
                vec![("width", *width), ("height", *height), ("depth", *depth)]
            }
            ShapeParams::Sphere { radius, .. } => vec![("radius", *radius)],
            ShapeParams::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => vec![
                ("radiusTop", *radius_top),
                ("radiusBottom", *radius_bottom),
                ("height", *height),
            ],
            ShapeParams::Cone { radius, height, .. } => {
                vec![("radius", *radius), ("height", *height)]
            }
            ShapeParams::Torus { radius, tube, .. } => vec![("radius", *radius), ("tube", *tube)],
            ShapeParams::Plane { width, height } => vec![("width", *width), ("height", *height)],
            ShapeParams::Extruded { depth } => vec![("depth", *depth)],
            ShapeParams::SketchRectangle { width, depth, .. }
            | ShapeParams::SketchTriangle { width, depth, .. } => {
                vec![("width", *width), ("depth", *depth)]
            }
            ShapeParams::SketchCircle { radius, .. } | ShapeParams::SketchPolygon { radius, .. } => {
                vec![("radius", *radius)]
            }
            ShapeParams::SketchEllipse {
                radius_x, radius_z, ..
            } => vec![("radiusX", *radius_x), ("radiusZ", *radius_z)],
        };

        for (name, value) in dims {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} has invalid {name}: {value}", self.kind().label()));
            }
        }

        let segments: Vec<(&str, u32, u32, u32)> = match self {
            ShapeParams::Sphere {
                width_segments,
                height_segments,
                ..
            } => vec![
                ("widthSegments", *width_segments, 3, MAX_SEGMENTS),
                ("heightSegments", *height_segments, 2, MAX_SEGMENTS),
            ],
            ShapeParams::Cylinder { radial_segments, .. }
            | ShapeParams::Cone { radial_segments, .. } => {
                vec![("radialSegments", *radial_segments, 3, MAX_SEGMENTS)]
            }
            ShapeParams::Torus {
                radial_segments,
                tubular_segments,
                ..
            } => vec![
                ("radialSegments", *radial_segments, 3, MAX_SEGMENTS),
                ("tubularSegments", *tubular_segments, 3, MAX_SEGMENTS),
            ],
            ShapeParams::SketchPolygon { sides, .. } => vec![("sides", *sides, 3, MAX_POLYGON_SIDES)],
            _ => Vec::new(),
        };

        for (name, value, min, max) in segments {
            if !(min..=max).contains(&value) {
                return Err(format!(
                    "{} has invalid {name}: {value} (allowed {min}..={max})",
                    self.kind().label()
                ));
            }
        }

        Ok(())
    }
}

/// Метаданные размещённого объекта. Неизменяемы после создания:
/// параметры полностью определяют геометрию.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMetadata {
    pub id: ObjectId,
    #[serde(flatten)]
    pub shape: ShapeParams,
    /// Количество логических граней
    pub face_count: u32,
    /// Количество логических рёбер
    pub edge_count: u32,
}

impl ShapeMetadata {
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
}

// ============================================================================
// Цвет
// ============================================================================

/// Цвет в формате 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xffffff);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        ]
    }

    /// Компоненты в диапазоне 0.0 - 1.0
    pub fn to_rgb_f32(self) -> [f32; 3] {
        let [r, g, b] = self.to_rgb();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color(0x4a90d9)
    }
}

// ============================================================================
// Файл сцены
// ============================================================================

/// Тройка координат `{x, y, z}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Xyz {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Объект в файле сцены: метаданные + трансформация.
/// Геометрия не сохраняется, она восстанавливается по параметрам.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObjectRecord {
    pub metadata: ShapeMetadata,
    pub position: Xyz,
    /// Углы Эйлера (XYZ), радианы
    pub rotation: Xyz,
    pub scale: Xyz,
}

/// Файл сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub version: String,
    pub objects: Vec<SceneObjectRecord>,
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            version: SCENE_FORMAT_VERSION.to_string(),
            objects: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(val: &T) {
        let json = serde_json::to_string(val).expect("serialize");
        let back: T = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(*val, back);
    }

    fn metadata(shape: ShapeParams) -> ShapeMetadata {
        ShapeMetadata {
            id: "obj1".to_string(),
            shape,
            face_count: 6,
            edge_count: 12,
        }
    }

    // --- ShapeKind ---

    #[test]
    fn test_shape_kind_serde() {
        let json = serde_json::to_string(&ShapeKind::SketchPolygon).unwrap();
        assert_eq!(json, r#""SketchPolygon""#);
        roundtrip(&ShapeKind::Box);
        roundtrip(&ShapeKind::Extruded);
    }

    #[test]
    fn test_shape_kind_classes() {
        assert!(ShapeKind::Torus.is_primitive());
        assert!(!ShapeKind::Extruded.is_primitive());
        assert!(ShapeKind::SketchEllipse.is_sketch());
        assert!(!ShapeKind::Plane.is_sketch());
    }

    // --- ShapeParams ---

    #[test]
    fn test_params_adjacent_tagging() {
        let p = ShapeParams::Box {
            width: 2.0,
            height: 3.0,
            depth: 1.5,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains(r#""kind":"Box""#));
        assert!(json.contains(r#""parameters":{"width":2.0"#));
        roundtrip(&p);
    }

    #[test]
    fn test_params_camel_case_fields() {
        let p = ShapeParams::Torus {
            radius: 1.0,
            tube: 0.4,
            radial_segments: 12,
            tubular_segments: 48,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("radialSegments"));
        assert!(json.contains("tubularSegments"));
        roundtrip(&p);
    }

    #[test]
    fn test_params_kind() {
        for kind in ShapeKind::PRIMITIVES {
            let params = ShapeParams::default_for(kind).unwrap();
            assert_eq!(params.kind(), kind);
        }
        assert!(ShapeParams::default_for(ShapeKind::Extruded).is_none());
        assert!(ShapeParams::default_for(ShapeKind::SketchCircle).is_none());
    }

    #[test]
    fn test_params_validate() {
        assert!(ShapeParams::default_for(ShapeKind::Sphere)
            .unwrap()
            .validate()
            .is_ok());
        let bad = ShapeParams::Box {
            width: -1.0,
            height: 1.0,
            depth: 1.0,
        };
        assert!(bad.validate().is_err());
        let bad = ShapeParams::SketchPolygon {
            radius: 1.0,
            sides: 2,
            hollow: false,
        };
        assert!(bad.validate().is_err());
        let bad = ShapeParams::Plane {
            width: f64::NAN,
            height: 1.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_params_validate_upper_bounds() {
        let polygon = |sides| ShapeParams::SketchPolygon {
            radius: 1.0,
            sides,
            hollow: true,
        };
        assert!(polygon(MAX_POLYGON_SIDES).validate().is_ok());
        assert!(polygon(MAX_POLYGON_SIDES + 1).validate().is_err());
        assert!(polygon(u32::MAX).validate().is_err());

        let sphere = ShapeParams::Sphere {
            radius: 1.0,
            width_segments: 4_000_000_000,
            height_segments: 16,
        };
        assert!(sphere.validate().is_err());
        let torus = ShapeParams::Torus {
            radius: 1.0,
            tube: 0.2,
            radial_segments: MAX_SEGMENTS,
            tubular_segments: MAX_SEGMENTS + 1,
        };
        assert!(torus.validate().is_err());
    }

    #[test]
    fn test_params_hollow() {
        let p = ShapeParams::SketchCircle {
            radius: 1.0,
            hollow: true,
        };
        assert!(p.is_hollow());
        assert!(!ShapeParams::default_for(ShapeKind::Box).unwrap().is_hollow());
    }

    // --- ShapeMetadata ---

    #[test]
    fn test_metadata_flat_layout() {
        let m = metadata(ShapeParams::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        });
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["kind"], "Box");
        assert_eq!(value["id"], "obj1");
        assert_eq!(value["faceCount"], 6);
        assert_eq!(value["edgeCount"], 12);
        assert_eq!(value["parameters"]["depth"], 1.0);
        roundtrip(&m);
    }

    #[test]
    fn test_metadata_unknown_kind_rejected() {
        let json = r#"{"id":"a","kind":"Pyramid","parameters":{},"faceCount":1,"edgeCount":1}"#;
        assert!(serde_json::from_str::<ShapeMetadata>(json).is_err());
    }

    // --- Color ---

    #[test]
    fn test_color_rgb() {
        let c = Color::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(c, Color(0x123456));
        assert_eq!(c.to_rgb(), [0x12, 0x34, 0x56]);
        assert_eq!(serde_json::to_string(&c).unwrap(), "1193046");
    }

    // --- SceneFile ---

    #[test]
    fn test_scene_file_serde() {
        let file = SceneFile {
            version: SCENE_FORMAT_VERSION.to_string(),
            objects: vec![SceneObjectRecord {
                metadata: metadata(ShapeParams::SketchRectangle {
                    width: 2.0,
                    depth: 1.0,
                    hollow: false,
                }),
                position: Xyz::new(1.0, 0.01, 0.5),
                rotation: Xyz::default(),
                scale: Xyz::new(1.0, 1.0, 1.0),
            }],
        };
        roundtrip(&file);
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains(r#""version":"1.0""#));
        assert!(json.contains(r#""position":{"x":1.0,"y":0.01,"z":0.5}"#));
    }
}
