//! Cursor picking against the ground plane.

use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Hit point with the horizontal plane `y = height`, if it lies ahead.
    pub fn intersect_plane_y(&self, height: f32) -> Option<Vec3> {
        if self.dir.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.dir.y;
        (t >= 0.0).then(|| self.at(t))
    }
}

/// World-space ray through a cursor position given in physical pixels.
///
/// `view_proj` uses wgpu clip conventions (depth in `[0, 1]`, y up).
pub fn cursor_ray(cursor: Vec2, viewport: Vec2, view_proj: Mat4) -> Option<Ray> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    let ndc = Vec2::new(cursor.x / viewport.x * 2.0 - 1.0, 1.0 - cursor.y / viewport.y * 2.0);
    let inv = view_proj.inverse();
    let near = inv.project_point3(ndc.extend(0.0));
    let far = inv.project_point3(ndc.extend(1.0));
    let dir = (far - near).try_normalize()?;
    Some(Ray { origin: near, dir })
}
