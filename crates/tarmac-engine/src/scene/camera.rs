use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Per-frame values shared by every draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    /// Seconds since the scene started.
    pub time: f32,
}

/// Per-object values, one block per dynamic-offset slot.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub fn from_transform(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// Perspective camera looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Camera {
    pub const EYE_HEIGHT: f32 = 10.0;

    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            fovy: std::f32::consts::FRAC_PI_4,
            aspect: 1.0,
            near: 0.01,
            far: 400.0,
            position: Vec3::new(0.0, Self::EYE_HEIGHT, 0.0),
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Keeps the previous aspect when either side is zero (minimized window).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Moves the camera sideways; height and depth stay fixed.
    pub fn set_pan(&mut self, pan: f32) {
        self.position = Vec3::new(pan, Self::EYE_HEIGHT, 0.0);
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn uniforms(&self, time: f32) -> FrameUniforms {
        FrameUniforms {
            view_proj: self.view_proj().to_cols_array_2d(),
            camera_position: self.position.to_array(),
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn uniform_blocks_have_shader_sizes() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 80);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 64);
    }

    #[test]
    fn default_camera_matches_window_aspect() {
        let camera = Camera::new(1200, 800);
        assert!((camera.aspect - 1.5).abs() < 1e-6);
        assert_eq!(camera.position, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn zero_viewport_keeps_aspect() {
        let mut camera = Camera::new(1200, 800);
        camera.set_viewport(0, 800);
        assert!((camera.aspect - 1.5).abs() < 1e-6);
    }

    #[test]
    fn point_ahead_of_camera_projects_inside_clip_volume() {
        let camera = Camera::new(1200, 800);
        // Straight ahead, at eye height.
        let clip = camera.view_proj() * Vec4::new(0.0, 10.0, -50.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);

        // Behind the camera: negative w.
        let behind = camera.view_proj() * Vec4::new(0.0, 10.0, 50.0, 1.0);
        assert!(behind.w < 0.0);
    }

    #[test]
    fn pan_moves_only_x() {
        let mut camera = Camera::new(1200, 800);
        camera.set_pan(-0.75);
        assert_eq!(camera.uniforms(2.5).camera_position, [-0.75, 10.0, 0.0]);
        assert_eq!(camera.uniforms(2.5).time, 2.5);
    }
}
