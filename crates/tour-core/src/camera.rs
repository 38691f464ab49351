//! Eye-at-origin camera used to look around inside a panorama sphere.
//!
//! Orientation is stored as yaw (about +Y) and pitch (about the camera's
//! local X). Pitch is clamped to `[-PITCH_LIMIT, PITCH_LIMIT]`; yaw is left
//! unbounded so repeated drags keep accumulating.

use crate::constants::{CAMERA_FOV_Y_DEG, CAMERA_ZFAR, CAMERA_ZNEAR, PITCH_LIMIT};
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_Y_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Camera {
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.set_orientation(self.yaw + d_yaw, self.pitch + d_pitch);
    }

    /// Yaw wrapped into `[0, 2π)`, for display and equality checks.
    pub fn yaw_wrapped(&self) -> f32 {
        self.yaw.rem_euclid(std::f32::consts::TAU)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Unit look direction; yaw = pitch = 0 looks down -Z.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// The eye is fixed at the origin, so the view is the inverse rotation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation().inverse())
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a pixel of a `viewport`-sized surface.
    ///
    /// Returns `None` for an empty viewport.
    pub fn screen_ray(&self, screen: Vec2, viewport: Vec2) -> Option<Ray> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc_x = (2.0 * screen.x / viewport.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / viewport.y);
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if p_far.w.abs() <= f32::EPSILON {
            return None;
        }
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let dir = p1.try_normalize()?;
        Some(Ray::new(Vec3::ZERO, dir))
    }
}
