//! Non-selectable scene furniture: grids, axes, work plane and lights

use glam::DVec3;
use shared::Color;

use super::material::Material;
use super::node::{LineRole, RenderNode};
use crate::viewport::mesh::MeshData;

/// Ground grid and sketch grid extent
pub const GRID_EXTENT: f64 = 100.0;
pub const AXES_SIZE: f64 = 2.0;
const SKETCH_GRID_HEIGHT: f64 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    GroundGrid,
    Axes,
    WorkPlane,
    SketchGrid,
}

#[derive(Debug, Clone)]
pub struct Helper {
    pub kind: HelperKind,
    pub visible: bool,
    pub node: RenderNode,
}

/// Division count of the sketch grid overlay for a cell size
pub fn sketch_grid_divisions(grid_size: f64) -> u32 {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return 10;
    }
    (GRID_EXTENT / grid_size).round().clamp(10.0, 10_000.0) as u32
}

/// Square grid of `divisions` cells per side in the XZ plane at height `y`
pub fn grid_node(extent: f64, divisions: u32, y: f64, color: Color) -> RenderNode {
    let material = Material::line(color).into_ref();
    let half = extent / 2.0;
    let step = extent / divisions.max(1) as f64;
    let mut lines = Vec::with_capacity(2 * (divisions as usize + 1));
    for i in 0..=divisions {
        let t = -half + i as f64 * step;
        lines.push(RenderNode::line(
            vec![DVec3::new(t, y, -half), DVec3::new(t, y, half)],
            material.clone(),
            LineRole::Helper,
        ));
        lines.push(RenderNode::line(
            vec![DVec3::new(-half, y, t), DVec3::new(half, y, t)],
            material.clone(),
            LineRole::Helper,
        ));
    }
    RenderNode::group(lines)
}

/// X (red), Y (green), Z (blue) axis lines from the origin
pub fn axes_node(size: f64) -> RenderNode {
    let axis = |dir: DVec3, color: u32| {
        RenderNode::line(
            vec![DVec3::ZERO, dir * size],
            Material::line(Color(color)).into_ref(),
            LineRole::Helper,
        )
    };
    RenderNode::group(vec![
        axis(DVec3::X, 0xe04040),
        axis(DVec3::Y, 0x40c040),
        axis(DVec3::Z, 0x4060e0),
    ])
}

/// Translucent pickable plane in XZ used while sketching
pub fn work_plane_node(extent: f64) -> RenderNode {
    let h = extent / 2.0;
    let mut mesh = MeshData::new();
    let a = mesh.push_vertex(DVec3::new(-h, 0.0, -h));
    let b = mesh.push_vertex(DVec3::new(-h, 0.0, h));
    let c = mesh.push_vertex(DVec3::new(h, 0.0, h));
    let d = mesh.push_vertex(DVec3::new(h, 0.0, -h));
    mesh.push_quad(a, b, c, d);
    RenderNode::mesh(mesh, Material::translucent(Color(0x88aacc), 0.15).into_ref())
}

/// Sketch grid overlay for a cell size
pub fn sketch_grid_node(grid_size: f64) -> RenderNode {
    grid_node(
        GRID_EXTENT,
        sketch_grid_divisions(grid_size),
        SKETCH_GRID_HEIGHT,
        Color(0x6688aa),
    )
}

/// Default helper set: ground grid and axes shown, sketch overlays hidden
pub fn default_helpers(sketch_grid_size: f64) -> Vec<Helper> {
    vec![
        Helper {
            kind: HelperKind::GroundGrid,
            visible: true,
            node: grid_node(GRID_EXTENT, GRID_EXTENT as u32, 0.0, Color(0x444444)),
        },
        Helper {
            kind: HelperKind::Axes,
            visible: true,
            node: axes_node(AXES_SIZE),
        },
        Helper {
            kind: HelperKind::WorkPlane,
            visible: false,
            node: work_plane_node(GRID_EXTENT),
        },
        Helper {
            kind: HelperKind::SketchGrid,
            visible: false,
            node: sketch_grid_node(sketch_grid_size),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional { direction: DVec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f64,
}

pub fn default_lights() -> Vec<Light> {
    vec![
        Light {
            kind: LightKind::Ambient,
            color: Color::WHITE,
            intensity: 0.45,
        },
        Light {
            kind: LightKind::Directional {
                direction: DVec3::new(-5.0, -10.0, -7.0).normalize(),
            },
            color: Color::WHITE,
            intensity: 0.75,
        },
    ]
}
