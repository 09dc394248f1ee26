//! Camera and viewport types shared with the web frontend.
//!
//! Nothing here touches platform APIs; the frontend feeds container sizes in
//! and reads projection matrices and backing-store sizes out.

use crate::constants::{
    CAMERA_BASE_EYE, CAMERA_FAR, CAMERA_FOVY_DEG, CAMERA_NEAR, CAMERA_TARGET, MAX_PIXEL_RATIO,
};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::from(CAMERA_BASE_EYE),
            target: Vec3::from(CAMERA_TARGET),
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
    }
}

/// Logical container size plus a capped device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// Zero or non-finite sizes fall back to 1; the ratio is clamped to `[1, 2]`.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let side = |v: f64| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        let pixel_ratio = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        Self {
            width: side(width),
            height: side(height),
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// Physical backing-store size in pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round() as u32;
        let h = (self.height * self.pixel_ratio).round() as u32;
        (w.max(1), h.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_container_falls_back_to_one_pixel() {
        let vp = Viewport::new(0.0, 0.0, 1.0);
        assert_eq!(vp.backing_size(), (1, 1));
        assert_eq!(vp.aspect(), 1.0);
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let vp = Viewport::new(400.0, 200.0, 3.0);
        assert_eq!(vp.pixel_ratio, 2.0);
        assert_eq!(vp.backing_size(), (800, 400));
        assert!((vp.aspect() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn camera_aspect_follows_viewport() {
        let mut cam = Camera::default();
        cam.set_viewport(&Viewport::new(900.0, 300.0, 1.0));
        assert!((cam.aspect - 3.0).abs() < 1e-6);
    }
}
