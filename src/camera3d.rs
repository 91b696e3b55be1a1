use glam::{Mat4, Vec2, Vec3};

use crate::wrap_angle;

const DEFAULT_UP: Vec3 = Vec3::Y;

/// Simple perspective camera feeding the render passes.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { position, target, up: DEFAULT_UP, fov_y_radians, near, far }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Free-fly controller storing orientation as yaw/pitch spherical angles.
///
/// Yaw 0 faces -Z; positive yaw turns toward +X, positive pitch looks up.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw_radians: f32,
    pub pitch_radians: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        Self { position, yaw_radians: 0.0, pitch_radians: 0.0 }
    }

    /// Spherical-to-Cartesian conversion of the stored orientation.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw_radians.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch_radians.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, -cos_pitch * cos_yaw).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(DEFAULT_UP).normalize()
    }

    pub fn look(&mut self, delta: Vec2) {
        self.yaw_radians = wrap_angle(self.yaw_radians + delta.x);
        self.pitch_radians = (self.pitch_radians + delta.y)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);
    }

    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    pub fn strafe(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    pub fn to_camera(&self, fov_y_radians: f32, near: f32, far: f32) -> Camera3D {
        Camera3D::new(self.position, self.position + self.forward(), fov_y_radians, near, far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera3d_view_projection_is_finite() {
        let camera =
            Camera3D::new(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, 60.0_f32.to_radians(), 0.1, 1000.0);
        let vp = camera.view_projection(1280.0 / 720.0);
        assert!(!vp.to_cols_array().iter().any(|v| v.is_nan() || v.is_infinite()));
    }

    #[test]
    fn fly_camera_default_faces_negative_z() {
        let fly = FlyCamera::new(Vec3::ZERO);
        let forward = fly.forward();
        assert!(forward.distance(Vec3::NEG_Z) < 1e-5);
        assert!((forward.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fly_camera_pitch_clamps_short_of_poles() {
        let mut fly = FlyCamera::new(Vec3::ZERO);
        fly.look(Vec2::new(0.0, 10.0));
        assert!(fly.pitch_radians < std::f32::consts::FRAC_PI_2);
        let forward = fly.forward();
        assert!((forward.length() - 1.0).abs() < 1e-5);
        assert!(forward.y > 0.9);
    }

    #[test]
    fn fly_camera_yaw_wraps() {
        let mut fly = FlyCamera::new(Vec3::ZERO);
        fly.look(Vec2::new(3.0 * std::f32::consts::PI, 0.0));
        assert!(fly.yaw_radians.abs() <= std::f32::consts::PI + 1e-5);
    }

    #[test]
    fn fly_camera_strafe_is_orthogonal_to_forward() {
        let mut fly = FlyCamera::new(Vec3::ZERO);
        fly.look(Vec2::new(0.7, 0.2));
        assert!(fly.forward().dot(fly.right()).abs() < 1e-5);
        fly.strafe(2.0);
        assert!(fly.position.length() > 1.9);
    }
}
