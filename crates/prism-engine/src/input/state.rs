use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current input state for the window.
///
/// Holds "is down" information; per-frame transitions and motion are recorded
/// into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes
    /// deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // On focus loss, clear the "down" set. Avoids stuck movement
                    // keys when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },

            InputEvent::PointerDelta { dx, dy } => {
                frame.pointer_delta.0 += dx;
                frame.pointer_delta.1 += dy;
            }

            InputEvent::Wheel { dy } => {
                frame.wheel += dy;
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(
            frame,
            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                repeat: false,
            },
        );
    }

    fn release(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(
            frame,
            InputEvent::Key {
                key,
                state: KeyState::Released,
                repeat: false,
            },
        );
    }

    #[test]
    fn press_release_tracks_down_set_and_frame_deltas() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::W);
        assert!(state.key_down(Key::W));
        assert!(frame.pressed(Key::W));

        frame.clear();

        release(&mut state, &mut frame, Key::W);
        assert!(!state.key_down(Key::W));
        assert!(frame.keys_released.contains(&Key::W));
    }

    #[test]
    fn repeated_press_does_not_duplicate_transition() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::D);
        frame.clear();
        press(&mut state, &mut frame, Key::D);

        assert!(state.key_down(Key::D));
        assert!(!frame.pressed(Key::D));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::A);
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::A));
    }

    #[test]
    fn pointer_and_wheel_deltas_accumulate() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerDelta { dx: 2.0, dy: -1.0 });
        state.apply_event(&mut frame, InputEvent::PointerDelta { dx: 1.0, dy: 4.0 });
        state.apply_event(&mut frame, InputEvent::Wheel { dy: 1.5 });

        assert_eq!(frame.pointer_delta, (3.0, 3.0));
        assert_eq!(frame.wheel, 1.5);
    }
}
