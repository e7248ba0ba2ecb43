use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Perspective projection parameters (vertical field of view in radians).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 45f32.to_radians(),
            near: 0.1,
            far: 5000.0,
        }
    }
}

impl Projection {
    /// Right-handed perspective with `0..1` clip depth.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-4), self.near, self.far)
    }
}

/// Camera block shared by every scene shader (`group(0) binding(0)`).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz = eye position, w unused.
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, projection: Mat4, eye: Vec3) -> Self {
        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_std140_sized() {
        assert_eq!(size_of::<CameraUniform>(), 3 * 64 + 16);
    }

    #[test]
    fn near_plane_maps_to_zero_depth() {
        let p = Projection::default().matrix(16.0 / 9.0);
        let clip = p * glam::Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert!((clip.z / clip.w).abs() < 1e-5);
    }

    #[test]
    fn view_proj_is_projection_times_view() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, Vec3::Y);
        let proj = Projection::default().matrix(1.0);
        let u = CameraUniform::new(view, proj, Vec3::new(0.0, 5.0, 10.0));
        assert!(u.view_proj().abs_diff_eq(proj * view, 1e-5));
    }
}
