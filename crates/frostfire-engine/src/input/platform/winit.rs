use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{ButtonState, InputEvent, Key, MouseButton};

/// Logical pixels per wheel line for touchpads and other pixel-precise devices.
const PIXELS_PER_LINE: f64 = 40.0;

/// Maps a winit `WindowEvent` to an engine event; `None` for events the
/// demos ignore. Positions are converted with `scale_factor`.
pub(crate) fn translate_window_event(scale_factor: f64, event: &WindowEvent) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::Focused(f) => InputEvent::Focused(*f),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::CursorMoved { position, .. } => {
            let p = position.to_logical::<f64>(scale_factor);
            InputEvent::PointerMoved {
                x: p.x as f32,
                y: p.y as f32,
            }
        }
        WindowEvent::MouseInput { state, button, .. } => InputEvent::PointerButton {
            button: map_mouse_button(*button),
            state: map_state(*state),
        },
        WindowEvent::MouseWheel { delta, .. } => InputEvent::Wheel(wheel_lines(*delta, scale_factor)),
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: map_key(event.physical_key),
            state: map_state(event.state),
            repeat: event.repeat,
        },
        _ => return None,
    };
    Some(ev)
}

fn map_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

fn wheel_lines(delta: MouseScrollDelta, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(p) => (p.to_logical::<f64>(scale_factor).y / PIXELS_PER_LINE) as f32,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

/// Physical key positions, so bindings stay put on non-QWERTY layouts.
fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Other;
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::Minus | KeyCode::NumpadSubtract => Key::Minus,
        KeyCode::Equal | KeyCode::NumpadAdd => Key::Equal,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyW => Key::W,

        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn keypad_plus_and_minus_share_bindings() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::NumpadAdd)), Key::Equal);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::NumpadSubtract)), Key::Minus);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::F5)), Key::Other);
    }

    #[test]
    fn pixel_wheel_scales_to_lines() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 160.0));
        assert_eq!(wheel_lines(delta, 2.0), 2.0);
        assert_eq!(wheel_lines(MouseScrollDelta::LineDelta(0.0, -1.0), 2.0), -1.0);
    }
}
