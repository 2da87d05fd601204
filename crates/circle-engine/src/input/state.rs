use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState};

/// Current keyboard state for a single window.
///
/// Holds "is down" information only; applications poll it once per frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered to an unfocused window.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(*key);
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Marks `key` as held. Shorthand for applying a press event.
    pub fn press(&mut self, key: Key) {
        self.apply_event(&InputEvent::Key { key, state: KeyState::Pressed, repeat: false });
    }

    /// Marks `key` as released. Shorthand for applying a release event.
    pub fn release(&mut self, key: Key) {
        self.apply_event(&InputEvent::Key { key, state: KeyState::Released, repeat: false });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_release() {
        let mut st = InputState::default();
        st.press(Key::W);
        assert!(st.key_down(Key::W));
        st.release(Key::W);
        assert!(!st.key_down(Key::W));
    }

    #[test]
    fn repeat_press_keeps_key_down() {
        let mut st = InputState::default();
        st.press(Key::D);
        st.apply_event(&InputEvent::Key { key: Key::D, state: KeyState::Pressed, repeat: true });
        assert!(st.key_down(Key::D));
        assert_eq!(st.keys_down.len(), 1);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut st = InputState::default();
        st.apply_event(&InputEvent::Focused(true));
        st.press(Key::A);
        st.press(Key::S);
        st.apply_event(&InputEvent::Focused(false));
        assert!(!st.focused);
        assert!(st.keys_down.is_empty());
    }

    #[test]
    fn unknown_keys_are_tracked_separately() {
        let mut st = InputState::default();
        st.press(Key::Unknown(42));
        assert!(st.key_down(Key::Unknown(42)));
        assert!(!st.key_down(Key::Unknown(7)));
    }
}
