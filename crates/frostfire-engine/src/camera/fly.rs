use glam::{Mat4, Vec3};

use crate::input::{InputFrame, InputState, Key, MouseButton};

/// First-person camera.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Radians; 0 looks down -Z.
    pub yaw: f32,
    pub pitch: f32,
    /// Units per second.
    pub speed: f32,
    pub sprint_multiplier: f32,
    pub look_speed: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            speed: 5.0,
            sprint_multiplier: 4.0,
            look_speed: 0.004,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// WASD (+ Q/E down/up) moves, right drag looks, shift sprints.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32) {
        if input.button_down(MouseButton::Right) {
            let (dx, dy) = frame.pointer_delta;
            self.look(-dx * self.look_speed, -dy * self.look_speed);
        }

        let axis = |pos: Key, neg: Key| -> f32 {
            f32::from(u8::from(input.key_down(pos))) - f32::from(u8::from(input.key_down(neg)))
        };
        let forward = axis(Key::W, Key::S);
        let strafe = axis(Key::D, Key::A);
        let lift = axis(Key::E, Key::Q);
        self.translate(forward, strafe, lift, dt, input.key_down(Key::Shift));
    }

    pub fn look(&mut self, d_yaw: f32, d_pitch: f32) {
        let limit = 89f32.to_radians();
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-limit, limit);
    }

    /// Moves along the view axes; each input is in `-1..=1`.
    pub fn translate(&mut self, forward: f32, strafe: f32, lift: f32, dt: f32, sprint: bool) {
        let dir = self.forward() * forward + self.right() * strafe + Vec3::Y * lift;
        if dir == Vec3::ZERO {
            return;
        }
        let speed = if sprint {
            self.speed * self.sprint_multiplier
        } else {
            self.speed
        };
        self.position += dir.normalize() * speed * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orientation_looks_down_negative_z() {
        let cam = FlyCamera::new(Vec3::ZERO, 0.0, 0.0);
        assert!(cam.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(cam.right().abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn forward_moves_by_speed_times_dt() {
        let mut cam = FlyCamera::new(Vec3::ZERO, 0.0, 0.0);
        cam.translate(1.0, 0.0, 0.0, 0.5, false);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), 1e-5));
    }

    #[test]
    fn sprint_multiplies_speed() {
        let mut cam = FlyCamera::new(Vec3::ZERO, 0.0, 0.0);
        cam.translate(0.0, 1.0, 0.0, 1.0, true);
        assert!((cam.position.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut cam = FlyCamera::new(Vec3::ZERO, 0.0, 0.0);
        cam.translate(1.0, 1.0, 0.0, 1.0, false);
        assert!((cam.position.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FlyCamera::new(Vec3::ZERO, 0.0, 0.0);
        cam.look(0.0, -5.0);
        assert!(cam.pitch > -90f32.to_radians());
    }
}
