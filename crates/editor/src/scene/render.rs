//! Per-frame draw list. Reads scene state only.

use glam::{DMat4, DVec3};

use super::helpers::HelperKind;
use super::material::MaterialRef;
use super::node::{LineRole, RenderNode};
use super::SceneGraph;
use crate::viewport::mesh::MeshData;

/// One world-space draw call
#[derive(Debug, Clone)]
pub enum DrawItem {
    Triangles {
        mesh: MeshData,
        material: MaterialRef,
        /// Owning object, None for helpers and the preview
        owner: Option<String>,
    },
    Lines {
        points: Vec<DVec3>,
        material: MaterialRef,
        role: LineRole,
    },
}

/// What the last frame drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub objects: usize,
    pub meshes: usize,
    pub triangles: usize,
    pub lines: usize,
    pub helpers: usize,
    pub preview: bool,
}

fn push_node(
    node: &RenderNode,
    matrix: &DMat4,
    owner: Option<&str>,
    out: &mut Vec<DrawItem>,
) {
    match node {
        RenderNode::Mesh { geometry, material } => out.push(DrawItem::Triangles {
            mesh: geometry.mesh.transformed(matrix),
            material: material.clone(),
            owner: owner.map(str::to_string),
        }),
        RenderNode::LineStrip {
            points,
            material,
            role,
            visible,
        } => {
            if *visible && points.len() >= 2 {
                out.push(DrawItem::Lines {
                    points: points.iter().map(|p| matrix.transform_point3(*p)).collect(),
                    material: material.clone(),
                    role: *role,
                });
            }
        }
        RenderNode::Group { children } => {
            for child in children {
                push_node(child, matrix, owner, out);
            }
        }
    }
}

impl SceneGraph {
    /// World-space draw list: visible helpers, visible objects, then the preview
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut out = Vec::new();

        for helper in self.helpers() {
            if self.helper_visible(helper.kind) {
                push_node(&helper.node, &DMat4::IDENTITY, None, &mut out);
            }
        }
        for object in self.objects().iter().filter(|o| o.visible) {
            push_node(&object.root, &object.world_matrix(), Some(&object.id), &mut out);
        }
        if let Some(preview) = self.preview() {
            push_node(preview, &DMat4::IDENTITY, None, &mut out);
        }

        out
    }

    /// Produce one frame and report what it drew
    pub fn render_frame(&self) -> FrameStats {
        let frame = self.frame.get() + 1;
        self.frame.set(frame);

        let items = self.draw_list();
        let mut stats = FrameStats {
            frame,
            objects: self.objects().iter().filter(|o| o.visible).count(),
            helpers: [
                HelperKind::GroundGrid,
                HelperKind::Axes,
                HelperKind::WorkPlane,
                HelperKind::SketchGrid,
            ]
            .into_iter()
            .filter(|k| self.helper_visible(*k))
            .count(),
            preview: self.preview().is_some(),
            ..Default::default()
        };
        for item in &items {
            match item {
                DrawItem::Triangles { mesh, .. } => {
                    stats.meshes += 1;
                    stats.triangles += mesh.triangle_count();
                }
                DrawItem::Lines { .. } => stats.lines += 1,
            }
        }
        stats
    }
}
