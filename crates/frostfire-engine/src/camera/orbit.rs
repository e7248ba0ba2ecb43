use glam::{Mat4, Vec3};

use crate::input::{InputFrame, InputState, MouseButton};

/// Camera orbiting `target` on a sphere.
///
/// `angle` is the azimuth around +Y, `elevation` the angle above the XZ plane
/// (both radians).
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub angle: f32,
    pub elevation: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians per logical pixel of drag.
    pub rotate_speed: f32,
    /// Distance multiplier per wheel line.
    pub zoom_step: f32,
}

impl OrbitCamera {
    pub fn new(angle: f32, elevation: f32, distance: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            angle,
            elevation,
            distance,
            min_distance: 1.0,
            max_distance: 500.0,
            rotate_speed: 0.005,
            zoom_step: 0.9,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sa, ca) = self.angle.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        self.target + self.distance * Vec3::new(ce * sa, se, ce * ca)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// Left drag rotates, wheel zooms.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame) {
        if input.button_down(MouseButton::Left) {
            let (dx, dy) = frame.pointer_delta;
            self.rotate(-dx * self.rotate_speed, dy * self.rotate_speed);
        }
        if frame.wheel_lines != 0.0 {
            self.zoom(frame.wheel_lines);
        }
    }

    pub fn rotate(&mut self, d_angle: f32, d_elevation: f32) {
        let limit = 89f32.to_radians();
        self.angle += d_angle;
        self.elevation = (self.elevation + d_elevation).clamp(-limit, limit);
    }

    /// Positive `lines` moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.distance =
            (self.distance * self.zoom_step.powf(lines)).clamp(self.min_distance, self.max_distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_lies_at_distance_from_target() {
        let cam = OrbitCamera::new((-45f32).to_radians(), 20f32.to_radians(), 50.0);
        assert!((cam.eye().length() - 50.0).abs() < 1e-3);
        assert!(cam.eye().y > 0.0);
    }

    #[test]
    fn zero_angles_look_down_negative_z() {
        let cam = OrbitCamera::new(0.0, 0.0, 10.0);
        assert!(cam.eye().abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-5));
    }

    #[test]
    fn elevation_is_clamped_short_of_the_pole() {
        let mut cam = OrbitCamera::new(0.0, 0.0, 10.0);
        cam.rotate(0.0, 10.0);
        assert!(cam.elevation < 90f32.to_radians());
    }

    #[test]
    fn wheel_zoom_respects_bounds() {
        let mut cam = OrbitCamera::new(0.0, 0.0, 10.0);
        cam.zoom(1.0);
        assert!((cam.distance - 9.0).abs() < 1e-5);
        cam.zoom(1000.0);
        assert_eq!(cam.distance, cam.min_distance);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, cam.max_distance);
    }
}
