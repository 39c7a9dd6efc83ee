//! Transform widget session: translate/rotate/scale drags with before/after capture

use glam::{DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use shared::ObjectId;

use super::history::HistoryEntry;
use crate::scene::{SceneGraph, TransformSnapshot};
use crate::viewport::camera::{ArcBallCamera, ViewportRect};
use crate::viewport::picking::Ray;

/// Length of the widget's axis handles in world units
pub const GIZMO_LENGTH: f64 = 2.0;
/// Pick distance around a handle
const HANDLE_THRESHOLD: f64 = 0.15;
/// Radians per pointer pixel while rotating
const ROTATE_SPEED: f64 = 0.01;
const MIN_SCALE: f64 = 0.01;

/// Manipulation applied by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Which axis a gizmo handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    pub fn direction(&self) -> DVec3 {
        match self {
            GizmoAxis::X => DVec3::X,
            GizmoAxis::Y => DVec3::Y,
            GizmoAxis::Z => DVec3::Z,
        }
    }
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        object_id: ObjectId,
        axis: GizmoAxis,
        before: TransformSnapshot,
    },
}

/// Transform widget bound to at most one object
#[derive(Debug, Default)]
pub struct TransformSession {
    attached: Option<ObjectId>,
    mode: TransformMode,
    state: DragState,
}

impl TransformSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the widget to an object, or to nothing. A drag in flight is
    /// cancelled: the object goes back to its `before` snapshot and no
    /// history entry is produced.
    pub fn attach(&mut self, id: Option<&str>, scene: &mut SceneGraph) {
        if let DragState::Dragging {
            object_id, before, ..
        } = std::mem::take(&mut self.state)
        {
            if let Some(object) = scene.find_by_id_mut(&object_id) {
                object.apply_snapshot(&before);
            }
            tracing::debug!(%object_id, "drag cancelled by detach");
        }
        scene.camera.orbit_enabled = true;
        self.attached = id.map(str::to_string);
    }

    pub fn attached(&self) -> Option<&str> {
        self.attached.as_deref()
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Axis of the drag in progress
    pub fn active_axis(&self) -> Option<GizmoAxis> {
        match &self.state {
            DragState::Dragging { axis, .. } => Some(*axis),
            DragState::Idle => None,
        }
    }

    /// Idle → Dragging on the attached object. Captures `before` and turns
    /// camera orbit off.
    pub fn begin_drag(&mut self, scene: &mut SceneGraph, axis: GizmoAxis) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(id) = self.attached.clone() else {
            return false;
        };
        let Some(object) = scene.find_by_id(&id) else {
            return false;
        };
        let before = object.snapshot();
        scene.camera.orbit_enabled = false;
        tracing::debug!(%id, ?axis, mode = ?self.mode, "drag started");
        self.state = DragState::Dragging {
            object_id: id,
            axis,
            before,
        };
        true
    }

    /// Move the dragged object by `amount` along the active axis: world units
    /// for translate and scale, radians for rotate.
    pub fn drag(&mut self, scene: &mut SceneGraph, amount: f64) -> bool {
        let DragState::Dragging {
            object_id, axis, ..
        } = &self.state
        else {
            return false;
        };
        let Some(object) = scene.find_by_id_mut(object_id) else {
            return false;
        };
        let dir = axis.direction();
        match self.mode {
            TransformMode::Translate => object.position += dir * amount,
            TransformMode::Rotate => {
                object.orientation =
                    (DQuat::from_axis_angle(dir, amount) * object.orientation).normalize();
            }
            TransformMode::Scale => {
                object.scale = (object.scale + dir * amount).max(DVec3::splat(MIN_SCALE));
            }
        }
        true
    }

    /// Drag by a pointer movement in screen pixels
    pub fn drag_screen(&mut self, scene: &mut SceneGraph, screen_delta: DVec2) -> bool {
        let (Some(axis), Some(id)) = (self.active_axis(), self.attached.as_deref()) else {
            return false;
        };
        let Some(center) = scene.find_by_id(id).map(|o| o.position) else {
            return false;
        };
        let amount = match self.mode {
            TransformMode::Rotate => screen_delta.x * ROTATE_SPEED,
            TransformMode::Translate | TransformMode::Scale => axis_drag_amount(
                &scene.camera,
                &scene.viewport(),
                center,
                axis,
                screen_delta,
            ),
        };
        self.drag(scene, amount)
    }

    /// Dragging → Idle. Emits a transform entry when the object actually moved.
    pub fn end_drag(&mut self, scene: &mut SceneGraph) -> Option<HistoryEntry> {
        let DragState::Dragging {
            object_id, before, ..
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };
        scene.camera.orbit_enabled = true;

        let after = scene.find_by_id(&object_id)?.snapshot();
        if after == before {
            tracing::debug!(%object_id, "drag ended without change");
            return None;
        }
        tracing::info!(%object_id, mode = ?self.mode, "object transformed");
        Some(HistoryEntry::Transform {
            object_id,
            before,
            after,
        })
    }

    /// Handle under a ray, if the widget is attached
    pub fn hit_test(&self, ray: &Ray, scene: &SceneGraph) -> Option<GizmoAxis> {
        let center = scene.find_by_id(self.attached.as_deref()?)?.position;
        gizmo_hit_test(ray, center, GIZMO_LENGTH)
    }

    /// Handle line segments for drawing
    pub fn handle_lines(&self, scene: &SceneGraph) -> Vec<(GizmoAxis, [DVec3; 2])> {
        let Some(center) = self
            .attached
            .as_deref()
            .and_then(|id| scene.find_by_id(id))
            .map(|o| o.position)
        else {
            return Vec::new();
        };
        GizmoAxis::ALL
            .iter()
            .map(|a| (*a, [center, center + a.direction() * GIZMO_LENGTH]))
            .collect()
    }
}

/// Test if a ray hits one of the gizmo axes.
/// Returns the axis if the ray passes within the handle threshold of an axis line.
pub fn gizmo_hit_test(ray: &Ray, center: DVec3, axis_length: f64) -> Option<GizmoAxis> {
    let mut best: Option<(GizmoAxis, f64)> = None;

    for axis in GizmoAxis::ALL {
        let line_end = center + axis.direction() * axis_length;
        let dist = ray_line_distance(ray, center, line_end);

        if dist < HANDLE_THRESHOLD && best.as_ref().map_or(true, |(_, d)| dist < *d) {
            best = Some((axis, dist));
        }
    }

    best.map(|(axis, _)| axis)
}

/// World distance along `axis` for a screen-space drag.
/// Projects the drag onto the axis direction as it appears on screen.
pub fn axis_drag_amount(
    camera: &ArcBallCamera,
    rect: &ViewportRect,
    center: DVec3,
    axis: GizmoAxis,
    screen_delta: DVec2,
) -> f64 {
    let p0 = camera.project(center, rect);
    let p1 = camera.project(center + axis.direction(), rect);

    let (Some((screen_p0, _)), Some((screen_p1, _))) = (p0, p1) else {
        return 0.0;
    };

    let screen_axis = screen_p1 - screen_p0;
    let screen_axis_len = screen_axis.length();
    if screen_axis_len < 1.0 {
        return 0.0;
    }

    // 1 world unit = screen_axis_len pixels
    screen_delta.dot(screen_axis / screen_axis_len) / screen_axis_len
}

/// Minimum distance between a ray and a line segment.
fn ray_line_distance(ray: &Ray, line_start: DVec3, line_end: DVec3) -> f64 {
    let u = ray.direction;
    let v = line_end - line_start;
    let w = ray.origin - line_start;

    let a = u.dot(u);
    let b = u.dot(v);
    let c = v.dot(v);
    let d = u.dot(w);
    let e = v.dot(w);

    let denom = a * c - b * b;

    let (sc, tc) = if denom < 1e-12 {
        // Nearly parallel
        (0.0, if b > c { d / b } else { e / c })
    } else {
        ((b * e - c * d) / denom, (a * e - b * d) / denom)
    };

    let tc = tc.clamp(0.0, 1.0);
    let sc = sc.max(0.0);

    let closest_ray = ray.origin + u * sc;
    let closest_line = line_start + v * tc;

    (closest_ray - closest_line).length()
}
