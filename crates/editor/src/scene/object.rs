//! Placed objects: top-level scene entities with identity, transform and metadata

use glam::{DMat4, DQuat, DVec3};
use shared::{Color, ObjectId, ShapeMetadata, ShapeParams};
use uuid::Uuid;

use super::material::{Material, MaterialRef};
use super::node::RenderNode;
use crate::build::extrude::{build_extrusion, extruded_counts, flat_counts, flat_surface};
use crate::build::{PrimitiveDescriptor, Profile2D};
use crate::viewport::mesh::MeshData;

/// Height of flat sketch surfaces above the work-plane
pub const SKETCH_SURFACE_OFFSET: f64 = 0.01;

/// Fresh unique object id
pub fn new_object_id() -> ObjectId {
    Uuid::new_v4().to_string()
}

/// Position, orientation and scale at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSnapshot {
    pub position: DVec3,
    pub orientation: DQuat,
    pub scale: DVec3,
}

impl Default for TransformSnapshot {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

/// A top-level scene entity
#[derive(Debug, Clone)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub position: DVec3,
    pub orientation: DQuat,
    pub scale: DVec3,
    pub visible: bool,
    pub metadata: ShapeMetadata,
    pub root: RenderNode,
    /// Surface color of the base material
    pub color: Color,
    /// Work-plane profile of sketch objects
    pub profile: Option<Profile2D>,
    /// Base material while the wireframe material is swapped in
    pub saved_material: Option<MaterialRef>,
    /// Material that was active before the highlight was applied
    pub pre_highlight: Option<MaterialRef>,
}

impl PlacedObject {
    /// Object at the origin with an identity transform
    pub fn new(metadata: ShapeMetadata, root: RenderNode, color: Color) -> Self {
        Self {
            id: metadata.id.clone(),
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
            scale: DVec3::ONE,
            visible: true,
            metadata,
            root,
            color,
            profile: None,
            saved_material: None,
            pre_highlight: None,
        }
    }

    pub fn from_primitive(desc: PrimitiveDescriptor, color: Color) -> Self {
        let metadata = ShapeMetadata {
            id: new_object_id(),
            shape: desc.params,
            face_count: desc.face_count,
            edge_count: desc.edge_count,
        };
        let root = RenderNode::solid(desc.mesh, Material::solid(color).into_ref());
        Self::new(metadata, root, color)
    }

    /// Flat surface lying in the work-plane; `params` must be sketch parameters
    pub fn flat_sketch(params: ShapeParams, profile: Profile2D, color: Color) -> Self {
        let (face_count, edge_count) = flat_counts(&profile);
        let metadata = ShapeMetadata {
            id: new_object_id(),
            shape: params,
            face_count,
            edge_count,
        };
        let root = RenderNode::solid(flat_surface(&profile), Material::solid(color).into_ref());
        let mut obj = Self::new(metadata, root, color);
        obj.position.y = SKETCH_SURFACE_OFFSET;
        obj.profile = Some(profile);
        obj
    }

    /// Solid extruded from a work-plane profile, resting on the plane
    pub fn extruded(profile: Profile2D, depth: f64, color: Color) -> Self {
        let (face_count, edge_count) = extruded_counts(&profile);
        let metadata = ShapeMetadata {
            id: new_object_id(),
            shape: ShapeParams::Extruded { depth },
            face_count,
            edge_count,
        };
        let root = RenderNode::solid(
            build_extrusion(&profile, depth),
            Material::solid(color).into_ref(),
        );
        let mut obj = Self::new(metadata, root, color);
        obj.position.y = depth / 2.0;
        obj.profile = Some(profile);
        obj
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    pub fn snapshot(&self) -> TransformSnapshot {
        TransformSnapshot {
            position: self.position,
            orientation: self.orientation,
            scale: self.scale,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: &TransformSnapshot) {
        self.position = snapshot.position;
        self.orientation = snapshot.orientation;
        self.scale = snapshot.scale;
    }

    /// Local → world
    pub fn world_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }

    /// Material currently drawn
    pub fn material(&self) -> Option<MaterialRef> {
        self.root.surface_material()
    }

    pub fn set_material(&mut self, material: &MaterialRef) {
        self.root.set_surface_material(material);
    }

    /// Material the object has outside of wireframe and highlight swaps
    pub fn base_material(&self) -> Option<MaterialRef> {
        self.saved_material
            .clone()
            .or_else(|| self.pre_highlight.clone())
            .or_else(|| self.material())
    }

    pub fn is_highlighted(&self) -> bool {
        self.pre_highlight.is_some()
    }

    /// Surface mesh in object-local coordinates
    pub fn surface_mesh(&self) -> Option<&MeshData> {
        let mut found = None;
        self.root.visit(&mut |node| {
            if found.is_some() {
                return;
            }
            if let RenderNode::Mesh { geometry, .. } = node {
                found = Some(geometry.mesh.as_ref());
            }
        });
        found
    }

    /// Change the base color. The new material goes into the deepest
    /// swapped-out slot so wireframe and highlight restore to it.
    pub fn recolor(&mut self, color: Color, highlight: Color) {
        self.color = color;
        let base = Material::solid(color).into_ref();
        if self.saved_material.is_some() {
            self.saved_material = Some(base);
        } else if self.pre_highlight.is_some() {
            let lit = base.highlighted(highlight).into_ref();
            self.pre_highlight = Some(base);
            self.set_material(&lit);
        } else {
            self.set_material(&base);
        }
    }
}
