use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// Held keys and buttons plus the pointer position of one window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Logical pixels; `None` while the pointer is outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds `ev` into the held state and records its transition in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases arrive at the other window.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, repeat } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(key) && !repeat {
                        frame.keys_pressed.insert(key);
                    }
                }
                ButtonState::Released => {
                    self.keys_down.remove(&key);
                }
            },

            InputEvent::PointerButton { button, state } => {
                if state.is_pressed() {
                    self.buttons_down.insert(button);
                } else {
                    self.buttons_down.remove(&button);
                }
            }

            InputEvent::Wheel(lines) => frame.wheel_lines += lines,
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn press_is_reported_once() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::W, ButtonState::Pressed));
        s.apply_event(&mut f, key(Key::W, ButtonState::Pressed));
        assert!(s.key_down(Key::W));
        assert!(f.key_pressed(Key::W));
        f.clear();
        s.apply_event(&mut f, key(Key::W, ButtonState::Pressed));
        assert!(!f.key_pressed(Key::W));
    }

    #[test]
    fn release_then_press_reports_again() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::Tab, ButtonState::Pressed));
        f.clear();
        s.apply_event(&mut f, key(Key::Tab, ButtonState::Released));
        s.apply_event(&mut f, key(Key::Tab, ButtonState::Pressed));
        assert!(f.key_pressed(Key::Tab));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::Shift, ButtonState::Pressed));
        s.apply_event(&mut f, InputEvent::PointerButton { button: MouseButton::Right, state: ButtonState::Pressed });
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(!s.key_down(Key::Shift));
        assert!(!s.button_down(MouseButton::Right));
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_delta_accumulates_within_frame() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        for (x, y) in [(10.0, 10.0), (15.0, 8.0), (20.0, 4.0)] {
            s.apply_event(&mut f, moved(x, y));
        }
        assert_eq!(f.pointer_delta, (10.0, -6.0));
        assert_eq!(s.pointer_pos, Some((20.0, 4.0)));
    }

    #[test]
    fn reentry_after_leaving_has_no_jump() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, moved(300.0, 200.0));
        s.apply_event(&mut f, InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
        s.apply_event(&mut f, moved(10.0, 10.0));
        assert_eq!(f.pointer_delta, (0.0, 0.0));
    }

    #[test]
    fn wheel_sums_lines() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::Wheel(1.0));
        s.apply_event(&mut f, InputEvent::Wheel(2.0));
        assert_eq!(f.wheel_lines, 3.0);
    }
}
