use glam::{DMat4, DVec2, DVec3, DVec4};

use super::picking::Ray;

/// Screen-space rectangle of the viewport, in the pointer's pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pointer position → normalized device coordinates (y up)
    pub fn to_ndc(&self, pointer: DVec2) -> DVec2 {
        let c = self.center();
        DVec2::new(
            (pointer.x - c.x) / (self.width * 0.5),
            -(pointer.y - c.y) / (self.height * 0.5),
        )
    }
}

/// Arc-ball camera for 3D viewport
#[derive(Debug, Clone)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f64,
    /// Vertical rotation angle (radians)
    pub pitch: f64,
    /// Distance from target
    pub distance: f64,
    /// Camera target point
    pub target: DVec3,
    /// Vertical field of view (radians)
    pub fov: f64,
    /// Free-orbit navigation; switched off while a tool owns the pointer
    pub orbit_enabled: bool,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.5,
            distance: 10.0,
            target: DVec3::ZERO,
            fov: 50.0_f64.to_radians(),
            orbit_enabled: true,
        }
    }

    /// Orbit around the target (degrees). Ignored while orbit is disabled.
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        if !self.orbit_enabled {
            return;
        }
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f64) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 200.0);
    }

    /// Pan the target. Ignored while orbit is disabled.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !self.orbit_enabled {
            return;
        }
        let right = self.right_vector();
        let up = self.up_vector();
        self.target += right * dx + up * dy;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> DVec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + DVec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye_position(), self.target, DVec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f64) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov, aspect, 0.1, 500.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f64) -> DMat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> DVec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(DVec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> DVec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a 3D point to screen coords. Returns the screen point and the
    /// clip-space depth, or None for points behind the camera.
    pub fn project(&self, point: DVec3, rect: &ViewportRect) -> Option<(DVec2, f64)> {
        let vp = self.view_projection(rect.aspect());
        let p = vp * DVec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let c = rect.center();
        let screen = DVec2::new(
            c.x + ndc.x * rect.width * 0.5,
            c.y - ndc.y * rect.height * 0.5,
        );
        Some((screen, ndc.z))
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: DVec2, rect: &ViewportRect) -> Ray {
        let ndc = rect.to_ndc(screen_pos);
        let vp_inv = self.view_projection(rect.aspect()).inverse();

        // Unproject near and far points
        let near_world = vp_inv * DVec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * DVec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray::new(self.eye_position(), far - near)
    }
}
