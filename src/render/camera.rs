use crate::constants::{
    CAMERA_DISTANCE, CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_OFFSET_X,
};
use crate::geometry::Bounds;
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

const ROTATE_SPEED: f32 = 0.005;
const ZOOM_SPEED: f32 = 0.001;
const MIN_DISTANCE: f32 = 0.5;
// Stay short of the poles so the up vector never aligns with the view direction
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

/// Perspective camera orbiting a target point, Y up
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation around the Y axis, 0 looks down -Z
    pub yaw: f32,
    /// Elevation above the XZ plane
    pub pitch: f32,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let offset = Vec3::new(CAMERA_OFFSET_X, 0.0, CAMERA_DISTANCE);
        Self {
            target: Vec3::ZERO,
            distance: offset.length(),
            yaw: offset.x.atan2(offset.z),
            pitch: 0.0,
            fov_y: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl OrbitCamera {
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    #[must_use]
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, aspect.max(f32::EPSILON), self.near, self.far)
    }

    #[must_use]
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// Orbit by a mouse drag delta in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ROTATE_SPEED;
        self.pitch = (self.pitch + dy * ROTATE_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move the target in the view plane by a mouse drag delta in pixels
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        // World units per pixel at the target's depth
        let scale = 2.0 * self.distance * (self.fov_y * 0.5).tan() / viewport_height.max(1.0);
        self.target += (up * dy - right * dx) * scale;
    }

    /// Dolly towards or away from the target by a wheel delta
    pub fn zoom(&mut self, delta: f32) {
        let factor = (delta * ZOOM_SPEED).exp();
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, self.far * 0.5);
    }

    /// Point at the centre of `bounds` from far enough away to see all of it
    pub fn frame_bounds(&mut self, bounds: Bounds) {
        let radius = bounds.extent().length() * 0.5;
        self.target = bounds.center();
        self.distance = (radius / (self.fov_y * 0.5).sin()).clamp(MIN_DISTANCE, self.far * 0.5);
    }
}
