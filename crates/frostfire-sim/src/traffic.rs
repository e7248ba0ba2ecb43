//! Car scene animation: the car loop, its lights and the flickering lamp.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const STREET_LAMP_COUNT: usize = 19;
pub const STREET_LAMP_SPACING: f32 = 3.0;
/// Lamp whose bulb flickers.
pub const BLINKING_LAMP: usize = 10;

/// X coordinate of street lamp `i`, centred on the road.
pub fn street_lamp_x(i: usize) -> f32 {
    let half = (STREET_LAMP_COUNT * 3 / 2) as f32 - 1.0;
    i as f32 * STREET_LAMP_SPACING - half
}

/// Light offsets from the car origin: two front, then two rear.
const CAR_LIGHT_OFFSETS: [Vec3; 4] = [
    Vec3::new(0.287, -0.016, -0.115),
    Vec3::new(0.287, -0.016, 0.115),
    Vec3::new(-0.289, -0.005, -0.146),
    Vec3::new(-0.289, -0.005, 0.146),
];

/// Car driving along +x and looping back.
#[derive(Debug, Clone)]
pub struct CarAnimation {
    pub position: Vec3,
    /// Units per second.
    pub speed: f32,
    pub paused: bool,
    /// Once `x` reaches this the car jumps back by `loop_length`.
    pub end_x: f32,
    pub loop_length: f32,
}

impl Default for CarAnimation {
    fn default() -> Self {
        Self {
            position: Vec3::new(-14.0, -0.28, 0.8),
            speed: 2.0,
            paused: false,
            end_x: 25.0,
            loop_length: 50.0,
        }
    }
}

impl CarAnimation {
    pub fn advance(&mut self, dt: f32) {
        if self.position.x < self.end_x {
            if !self.paused {
                self.position.x += self.speed * dt;
            }
        } else {
            self.position.x -= self.loop_length;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// World positions of the light meshes (front pair first).
    pub fn light_positions(&self) -> [Vec3; 4] {
        CAR_LIGHT_OFFSETS.map(|o| self.position + o)
    }

    /// Spot light origins; headlights sit 0.3 ahead, tail lights 0.3 behind.
    pub fn spot_positions(&self) -> [Vec3; 4] {
        let x = self.position.x;
        [
            Vec3::new(x + 0.3, -0.28, 0.65),
            Vec3::new(x + 0.3, -0.28, 0.95),
            Vec3::new(x - 0.3, -0.28, 0.65),
            Vec3::new(x - 0.3, -0.28, 0.95),
        ]
    }
}

/// Lamp that re-rolls its state on a fixed cadence.
#[derive(Debug, Clone)]
pub struct BlinkingLamp {
    rng: StdRng,
    interval: f32,
    next_flip: f32,
    on: bool,
}

impl BlinkingLamp {
    pub fn new(seed: u64, interval: f32) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), interval, next_flip: interval, on: true }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Rolls once per elapsed interval boundary; returns `true` if the state changed.
    pub fn update(&mut self, now: f32) -> bool {
        let before = self.on;
        while now >= self.next_flip {
            self.next_flip += self.interval;
            self.on = self.rng.random_bool(0.5);
        }
        before != self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── car ───────────────────────────────────────────────────────────────

    #[test]
    fn car_advances_two_units_per_second() {
        let mut car = CarAnimation::default();
        car.advance(0.5);
        assert!((car.position.x - -13.0).abs() < 1e-6);
    }

    #[test]
    fn car_wraps_after_end() {
        let mut car = CarAnimation { position: Vec3::new(25.0, -0.28, 0.8), ..Default::default() };
        car.advance(0.1);
        assert_eq!(car.position.x, -25.0);
    }

    #[test]
    fn paused_car_stays() {
        let mut car = CarAnimation::default();
        car.toggle_pause();
        car.advance(1.0);
        assert_eq!(car.position.x, -14.0);
    }

    #[test]
    fn lights_follow_car() {
        let mut car = CarAnimation::default();
        let before = car.light_positions();
        car.advance(1.0);
        for (a, b) in before.iter().zip(car.light_positions()) {
            assert!((b.x - a.x - 2.0).abs() < 1e-5);
            assert_eq!(a.z, b.z);
        }
        assert!(car.spot_positions()[0].x > car.position.x);
        assert!(car.spot_positions()[3].x < car.position.x);
    }

    // ── street lamps ──────────────────────────────────────────────────────

    #[test]
    fn lamps_span_the_road() {
        assert_eq!(street_lamp_x(0), -27.0);
        assert_eq!(street_lamp_x(STREET_LAMP_COUNT - 1), 27.0);
    }

    #[test]
    fn lamp_rolls_once_per_interval() {
        let mut a = BlinkingLamp::new(3, 0.5);
        let mut b = BlinkingLamp::new(3, 0.5);
        assert!(!a.update(0.2));
        for i in 1..40 {
            let t = i as f32 * 0.25;
            a.update(t);
            b.update(t);
            assert_eq!(a.is_on(), b.is_on());
        }
    }
}
