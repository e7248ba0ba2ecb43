use std::collections::HashSet;

use super::types::Key;

/// Transitions collected since the last presented frame.
///
/// Cleared by the runtime after every `on_frame`.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys that went down this frame; auto-repeat is not counted.
    pub keys_pressed: HashSet<Key>,

    /// Summed pointer motion, logical pixels.
    pub pointer_delta: (f32, f32),

    /// Summed wheel motion in lines.
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel_lines = 0.0;
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
