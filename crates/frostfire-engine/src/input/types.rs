/// Keys the demos bind. Everything else arrives as [`Key::Other`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Space,
    Shift,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,

    /// `-` on the main row or the keypad.
    Minus,
    /// `=` on the main row, `+` on the keypad.
    Equal,

    A,
    B,
    C,
    D,
    E,
    F,
    G,
    N,
    P,
    Q,
    R,
    S,
    T,
    W,

    Other,
}

/// Transition of a key or mouse button.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Window input after platform translation. Positions are logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: ButtonState,
        /// Auto-repeat from a held key.
        repeat: bool,
    },
    PointerMoved {
        x: f32,
        y: f32,
    },
    PointerButton {
        button: MouseButton,
        state: ButtonState,
    },
    /// Vertical wheel motion in lines, positive away from the user.
    Wheel(f32),
    PointerLeft,
    Focused(bool),
}
