use crate::interface::{ApplicationFramework, ButtonEvent, ButtonsInterface, RawKey, StorageInterface};

use super::OperatingSystem;

/// A key press, reduced to what the menu cares about.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum OSInput {
    Up,
    Down,
    Confirm,
    Back,

    /// Any other key.
    Any,
}

impl OSInput {
    /// Maps a raw key to an input. Special codes take priority over the character.
    pub fn from_raw_key(key: RawKey) -> Self {
        match key.code {
            RawKey::CODE_UP => return OSInput::Up,
            RawKey::CODE_DOWN => return OSInput::Down,
            RawKey::CODE_ENTER => return OSInput::Confirm,
            RawKey::CODE_ESCAPE | RawKey::CODE_BACKSPACE => return OSInput::Back,
            _ => (),
        }

        match key.character {
            Some(';' | 'w') => OSInput::Up,
            Some('.' | 's') => OSInput::Down,
            Some('\n' | '\r') => OSInput::Confirm,
            Some('`') => OSInput::Back,
            _ => OSInput::Any,
        }
    }
}

impl<F: ApplicationFramework, S: StorageInterface> OperatingSystem<F, S> {
    /// Returns the next input, if a key has been pressed. Releases are ignored.
    /// 
    /// Alternatively, if virtual presses have been queued with `queue_virtual_presses` as part of a
    /// test, pops the queue and returns the next one.
    pub fn input(&mut self) -> Option<OSInput> {
        if let Some(input) = self.virtual_input_queue.pop_front() {
            return Some(input);
        }

        match self.framework.buttons_mut().poll_event() {
            Some(ButtonEvent::Press(key)) => Some(OSInput::from_raw_key(key)),
            Some(ButtonEvent::Release(_)) | None => None,
        }
    }

    /// Queues a sequence of presses to return for subsequent calls to `input`. Designed for use
    /// when writing tests.
    pub fn queue_virtual_presses(&mut self, inputs: &[OSInput]) {
        self.virtual_input_queue.extend(inputs.iter().copied());
    }
}
