use std::collections::HashSet;

use super::types::Key;

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys); `InputFrame` provides
/// the accumulated transitions and motion for the current frame. The runtime
/// clears it after each `on_frame` call.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Accumulated relative pointer motion this frame.
    pub pointer_delta: (f32, f32),

    /// Accumulated vertical scroll this frame, in lines.
    pub wheel: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel = 0.0;
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
