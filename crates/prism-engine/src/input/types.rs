/// Key identifiers used by the demos.
///
/// Only keys the camera controller and demo toggles care about get a named
/// variant; everything else is preserved as `Unknown` with the platform scancode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,
    Shift,

    W,
    A,
    S,
    D,
    Q,
    E,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// Window focus changed.
    Focused(bool),

    /// Keyboard transition.
    Key {
        key: Key,
        state: KeyState,
        repeat: bool,
    },

    /// Relative pointer motion in device units (cursor is grabbed).
    PointerDelta { dx: f32, dy: f32 },

    /// Vertical scroll, in lines.
    Wheel { dy: f32 },
}
