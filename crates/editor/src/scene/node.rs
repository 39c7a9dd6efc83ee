use std::rc::Rc;

use glam::DVec3;
use shared::Color;

use super::material::{Material, MaterialRef};
use super::resources::GeometryId;
use crate::viewport::edge::{outline_segments, OUTLINE_THRESHOLD_DEGREES};
use crate::viewport::mesh::MeshData;

/// Outline color drawn over solids
pub const OUTLINE_COLOR: Color = Color(0x1a1a1a);

/// Geometry buffer of a mesh node; `id` is set while the owner is in the scene
#[derive(Debug, Clone)]
pub struct GeometryHandle {
    pub id: Option<GeometryId>,
    pub mesh: Rc<MeshData>,
}

impl GeometryHandle {
    pub fn new(mesh: MeshData) -> Self {
        Self {
            id: None,
            mesh: Rc::new(mesh),
        }
    }
}

/// What a line strip is drawn for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// Sharp/boundary edges of a solid
    EdgeOutline,
    /// Sketch preview outline
    SketchStroke,
    /// Grid and axis lines
    Helper,
}

/// Node of a render tree. Only the placed object owning a tree carries metadata.
#[derive(Debug, Clone)]
pub enum RenderNode {
    Mesh {
        geometry: GeometryHandle,
        material: MaterialRef,
    },
    LineStrip {
        points: Vec<DVec3>,
        material: MaterialRef,
        role: LineRole,
        visible: bool,
    },
    Group {
        children: Vec<RenderNode>,
    },
}

impl RenderNode {
    pub fn mesh(mesh: MeshData, material: MaterialRef) -> Self {
        Self::Mesh {
            geometry: GeometryHandle::new(mesh),
            material,
        }
    }

    pub fn line(points: Vec<DVec3>, material: MaterialRef, role: LineRole) -> Self {
        Self::LineStrip {
            points,
            material,
            role,
            visible: true,
        }
    }

    pub fn group(children: Vec<RenderNode>) -> Self {
        Self::Group { children }
    }

    /// Surface mesh plus its edge-outline strips
    pub fn solid(mesh: MeshData, material: MaterialRef) -> Self {
        let outline: MaterialRef = Rc::new(Material::line(OUTLINE_COLOR));
        let mut children: Vec<RenderNode> = outline_segments(&mesh, OUTLINE_THRESHOLD_DEGREES)
            .into_iter()
            .map(|[a, b]| Self::line(vec![a, b], outline.clone(), LineRole::EdgeOutline))
            .collect();
        children.insert(0, Self::mesh(mesh, material));
        Self::group(children)
    }

    /// Depth-first visit
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a RenderNode)) {
        f(self);
        if let Self::Group { children } = self {
            for child in children {
                child.visit(f);
            }
        }
    }

    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut RenderNode)) {
        f(self);
        if let Self::Group { children } = self {
            for child in children {
                child.visit_mut(f);
            }
        }
    }

    /// Material of the first mesh in the tree
    pub fn surface_material(&self) -> Option<MaterialRef> {
        let mut found = None;
        self.visit(&mut |node| {
            if found.is_some() {
                return;
            }
            if let Self::Mesh { material, .. } = node {
                found = Some(material.clone());
            }
        });
        found
    }

    /// Set the material of every mesh in the tree
    pub fn set_surface_material(&mut self, m: &MaterialRef) {
        self.visit_mut(&mut |node| {
            if let Self::Mesh { material, .. } = node {
                *material = m.clone();
            }
        });
    }

    /// Show or hide every line strip with the given role
    pub fn set_lines_visible(&mut self, which: LineRole, show: bool) {
        self.visit_mut(&mut |node| {
            if let Self::LineStrip { role, visible, .. } = node {
                if *role == which {
                    *visible = show;
                }
            }
        });
    }

    /// Geometry handles of every mesh in the tree
    pub fn geometry_handles_mut(&mut self) -> Vec<&mut GeometryHandle> {
        let mut out = Vec::new();
        collect_handles(self, &mut out);
        out
    }

    pub fn mesh_count(&self) -> usize {
        let mut n = 0;
        self.visit(&mut |node| {
            if matches!(node, Self::Mesh { .. }) {
                n += 1;
            }
        });
        n
    }

    pub fn triangle_count(&self) -> usize {
        let mut n = 0;
        self.visit(&mut |node| {
            if let Self::Mesh { geometry, .. } = node {
                n += geometry.mesh.triangle_count();
            }
        });
        n
    }

    /// Line strips with the given role, visible or not
    pub fn line_count(&self, which: LineRole) -> usize {
        let mut n = 0;
        self.visit(&mut |node| {
            if let Self::LineStrip { role, .. } = node {
                if *role == which {
                    n += 1;
                }
            }
        });
        n
    }
}

fn collect_handles<'a>(node: &'a mut RenderNode, out: &mut Vec<&'a mut GeometryHandle>) {
    match node {
        RenderNode::Mesh { geometry, .. } => out.push(geometry),
        RenderNode::Group { children } => {
            for child in children {
                collect_handles(child, out);
            }
        }
        RenderNode::LineStrip { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_default_primitive;
    use shared::ShapeKind;

    fn box_node() -> RenderNode {
        let d = build_default_primitive(ShapeKind::Box).unwrap();
        RenderNode::solid(d.mesh, Material::solid(Color::default()).into_ref())
    }

    #[test]
    fn test_solid_box_has_twelve_outline_edges() {
        let node = box_node();
        assert_eq!(node.mesh_count(), 1);
        assert_eq!(node.line_count(LineRole::EdgeOutline), 12);
        assert_eq!(node.triangle_count(), 12);
    }

    #[test]
    fn test_set_surface_material() {
        let mut node = box_node();
        let m = Material::wireframe().into_ref();
        node.set_surface_material(&m);
        assert!(Rc::ptr_eq(&node.surface_material().unwrap(), &m));
    }

    #[test]
    fn test_hide_outlines() {
        let mut node = box_node();
        node.set_lines_visible(LineRole::EdgeOutline, false);
        let mut shown = 0;
        node.visit(&mut |n| {
            if let RenderNode::LineStrip { visible: true, .. } = n {
                shown += 1;
            }
        });
        assert_eq!(shown, 0);
    }

    #[test]
    fn test_geometry_handles() {
        let mut node = RenderNode::group(vec![box_node(), box_node()]);
        assert_eq!(node.geometry_handles_mut().len(), 2);
    }
}
