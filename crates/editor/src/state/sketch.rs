use glam::DVec3;
use shared::{Color, ObjectId, ShapeParams};

use crate::build::extrude::{build_extrusion, extruded_counts, flat_surface, outline_strokes};
use crate::build::{build_profile, placement_origin, sketch_params, Profile2D, ProfileOptions, SketchTool};
use crate::scene::{
    LineRole, Material, PlacedObject, RenderNode, SceneGraph, SKETCH_SURFACE_OFFSET,
};
use crate::viewport::picking::{ray_plane, Ray};

// ============================================================================
// Параметры инструмента
// ============================================================================

/// Options the sketch tools read at draw and commit time
#[derive(Debug, Clone, PartialEq)]
pub struct SketchOptions {
    pub hollow: bool,
    pub polygon_sides: u32,
    /// Snap anchors to the grid
    pub snap: bool,
    pub grid_size: f64,
    /// Commit as an extruded solid
    pub extrude: bool,
    pub extrude_depth: f64,
    /// Color of committed shapes
    pub color: Color,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self {
            hollow: false,
            polygon_sides: 6,
            snap: true,
            grid_size: 1.0,
            extrude: false,
            extrude_depth: 1.0,
            color: Color::default(),
        }
    }
}

impl SketchOptions {
    fn profile_options(&self) -> ProfileOptions {
        ProfileOptions {
            hollow: self.hollow,
            polygon_sides: self.polygon_sides as f64,
        }
    }
}

// ============================================================================
// Состояние сессии
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SketchState {
    #[default]
    Inactive,
    ToolArmed {
        tool: SketchTool,
    },
    Drawing {
        tool: SketchTool,
        start: DVec3,
        current: DVec3,
    },
}

/// Pointer-driven sketch tool on the XZ work-plane
#[derive(Debug, Default)]
pub struct SketchSession {
    state: SketchState,
    pub options: SketchOptions,
    /// Profile shown by the live preview
    preview_profile: Option<Profile2D>,
}

impl SketchSession {
    pub fn new(options: SketchOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn state(&self) -> SketchState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SketchState::Inactive
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SketchState::Drawing { .. })
    }

    pub fn tool(&self) -> Option<SketchTool> {
        match self.state {
            SketchState::Inactive => None,
            SketchState::ToolArmed { tool } | SketchState::Drawing { tool, .. } => Some(tool),
        }
    }

    pub fn preview_profile(&self) -> Option<&Profile2D> {
        self.preview_profile.as_ref()
    }

    /// Arm a tool. Shows the work-plane overlays and turns camera orbit off.
    pub fn enable(
        &mut self,
        scene: &mut SceneGraph,
        tool: SketchTool,
        hollow: bool,
        polygon_sides: Option<u32>,
    ) {
        self.options.hollow = hollow;
        if let Some(sides) = polygon_sides {
            self.options.polygon_sides = sides.max(3);
        }
        self.discard_preview(scene);
        self.state = SketchState::ToolArmed { tool };

        scene.set_sketch_grid_size(self.options.grid_size);
        scene.set_sketch_overlays(true);
        scene.camera.orbit_enabled = false;
        tracing::debug!(?tool, hollow, "sketch tool armed");
    }

    /// Leave sketch mode. Safe in any state; calling it twice equals calling it once.
    pub fn disable(&mut self, scene: &mut SceneGraph) {
        if self.state != SketchState::Inactive {
            tracing::debug!("sketch mode off");
        }
        self.state = SketchState::Inactive;
        self.discard_preview(scene);
        scene.set_sketch_overlays(false);
        scene.camera.orbit_enabled = true;
    }

    /// Drop an in-progress shape, keeping the tool armed
    pub fn cancel_drawing(&mut self, scene: &mut SceneGraph) {
        if let SketchState::Drawing { tool, .. } = self.state {
            self.state = SketchState::ToolArmed { tool };
            self.discard_preview(scene);
        }
    }

    fn discard_preview(&mut self, scene: &mut SceneGraph) {
        self.preview_profile = None;
        scene.clear_preview();
    }

    /// Project a point onto the work-plane, snapping X and Z to the grid when enabled
    pub fn snap(&self, point: DVec3) -> DVec3 {
        let g = self.options.grid_size;
        if self.options.snap && g > 0.0 {
            DVec3::new((point.x / g).round() * g, 0.0, (point.z / g).round() * g)
        } else {
            DVec3::new(point.x, 0.0, point.z)
        }
    }

    /// Where a pointer ray meets the work-plane
    pub fn work_plane_point(&self, ray: &Ray) -> Option<DVec3> {
        ray_plane(ray, DVec3::ZERO, DVec3::Y)
    }

    pub fn pointer_down(&mut self, point: DVec3) -> bool {
        let SketchState::ToolArmed { tool } = self.state else {
            return false;
        };
        let start = self.snap(point);
        self.state = SketchState::Drawing {
            tool,
            start,
            current: start,
        };
        tracing::debug!(?tool, x = start.x, z = start.z, "sketch drawing started");
        true
    }

    /// Rebuild the live preview with the same builder the commit uses
    pub fn pointer_move(&mut self, scene: &mut SceneGraph, point: DVec3) -> bool {
        let SketchState::Drawing { tool, start, .. } = self.state else {
            return false;
        };
        let current = self.snap(point);
        self.state = SketchState::Drawing {
            tool,
            start,
            current,
        };

        let profile = build_profile(tool, start, current, &self.options.profile_options());
        let lift = placement_origin(tool, start, current) + DVec3::Y * SKETCH_SURFACE_OFFSET;
        scene.set_preview(preview_node(&profile, lift, &self.options));
        self.preview_profile = Some(profile);
        true
    }

    /// Finish the shape. Returns the new object for the caller to add and record;
    /// zero-area shapes are discarded.
    pub fn pointer_up(&mut self, scene: &mut SceneGraph, point: DVec3) -> Option<PlacedObject> {
        let SketchState::Drawing { tool, start, .. } = self.state else {
            return None;
        };
        let end = self.snap(point);
        self.state = SketchState::ToolArmed { tool };
        self.discard_preview(scene);

        let options = self.options.profile_options();
        let profile = build_profile(tool, start, end, &options);
        if profile.is_degenerate() {
            tracing::debug!(?tool, "zero-area sketch discarded");
            return None;
        }
        if !profile.holes_fit() {
            tracing::debug!(?tool, "hollow sketch with oversized hole discarded");
            return None;
        }

        let origin = placement_origin(tool, start, end);
        let color = self.options.color;
        let object = if self.options.extrude && self.options.extrude_depth > 0.0 {
            let depth = self.options.extrude_depth;
            PlacedObject::extruded(profile, depth, color)
                .with_position(DVec3::new(origin.x, depth / 2.0, origin.z))
        } else {
            let params = sketch_params(tool, start, end, &options);
            PlacedObject::flat_sketch(params, profile, color)
                .with_position(DVec3::new(origin.x, SKETCH_SURFACE_OFFSET, origin.z))
        };
        tracing::info!(id = %object.id, kind = ?object.metadata.kind(), "sketch committed");
        Some(object)
    }

    /// Turn an existing sketch object into an extruded solid of `depth`
    /// (or the configured depth), keeping its X/Z placement and orientation.
    pub fn extrude_existing(
        &self,
        scene: &mut SceneGraph,
        id: &str,
        depth: Option<f64>,
    ) -> Option<ObjectId> {
        let depth = depth.unwrap_or(self.options.extrude_depth);
        if !(depth.is_finite() && depth > 0.0) {
            return None;
        }
        let profile = scene.find_by_id(id)?.profile.clone()?;

        let mesh = build_extrusion(&profile, depth);
        let root = RenderNode::solid(mesh, Material::solid(self.options.color).into_ref());
        if !scene.replace_render_tree(id, root) {
            return None;
        }

        let (face_count, edge_count) = extruded_counts(&profile);
        let object = scene.find_by_id_mut(id)?;
        object.metadata.shape = ShapeParams::Extruded { depth };
        object.metadata.face_count = face_count;
        object.metadata.edge_count = edge_count;
        object.position.y = depth / 2.0;
        tracing::info!(%id, depth, "sketch extruded");
        Some(object.id.clone())
    }

    /// Change the grid cell size and rebuild the overlay. Non-positive sizes are ignored.
    pub fn set_grid_size(&mut self, scene: &mut SceneGraph, grid_size: f64) -> bool {
        if !(grid_size.is_finite() && grid_size > 0.0) {
            tracing::warn!(grid_size, "rejected grid size");
            return false;
        }
        self.options.grid_size = grid_size;
        scene.set_sketch_grid_size(grid_size);
        true
    }
}

/// Preview geometry in world space: outline strokes for hollow shapes,
/// a translucent surface otherwise
fn preview_node(profile: &Profile2D, offset: DVec3, options: &SketchOptions) -> RenderNode {
    if options.hollow {
        let material = Material::line(options.color).into_ref();
        let strokes = outline_strokes(profile, 0.0)
            .into_iter()
            .map(|s| {
                RenderNode::line(
                    s.into_iter().map(|p| p + offset).collect(),
                    material.clone(),
                    LineRole::SketchStroke,
                )
            })
            .collect();
        RenderNode::group(strokes)
    } else {
        let mut mesh = flat_surface(profile);
        for p in &mut mesh.positions {
            *p += offset;
        }
        RenderNode::mesh(mesh, Material::translucent(options.color, 0.5).into_ref())
    }
}
