use glam::{Mat4, Vec3};

use crate::types::CameraUniform;

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;
/// Distance along +Z the camera moves to once the model has loaded
pub const VIEW_DISTANCE: f32 = 50.0;

/// Perspective camera looking down -Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::ZERO,
            fov_y: FOV_Y_DEGREES.to_radians(),
            aspect: aspect_ratio(width, height),
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }

    /// Pulls back far enough to frame a model normalized to the target size
    pub fn frame_model(&mut self) {
        self.position.z = VIEW_DISTANCE;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            position: self.position.to_array(),
            _pad: 0.0,
        }
    }
}

/// Zero-height windows (minimized) keep a square aspect
fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_camera_defaults() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.position, Vec3::ZERO);
        assert!((camera.fov_y - 75f32.to_radians()).abs() < 1e-6);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_frame_model_moves_back() {
        let mut camera = Camera::new(800, 600);
        camera.frame_model();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 50.0));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = Camera::new(800, 600);
        camera.resize(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
        camera.resize(0, 0);
        assert_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let mut camera = Camera::new(800, 600);
        camera.frame_model();
        let clip = camera.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
