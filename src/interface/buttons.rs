/// A key as reported by the keyboard scanner: a raw HID-style usage code and, where the key
/// produces one, the character it types.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct RawKey {
    pub code: u8,
    pub character: Option<char>,
}

impl RawKey {
    pub const CODE_NONE: u8 = 0x00;
    pub const CODE_ENTER: u8 = 0x28;
    pub const CODE_ESCAPE: u8 = 0x29;
    pub const CODE_BACKSPACE: u8 = 0x2A;
    pub const CODE_DOWN: u8 = 0x51;
    pub const CODE_UP: u8 = 0x52;

    pub fn code(code: u8) -> Self {
        Self { code, character: None }
    }

    /// A printable key, which carries no special code.
    pub fn character(character: char) -> Self {
        Self { code: Self::CODE_NONE, character: Some(character) }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ButtonEvent {
    Press(RawKey),
    Release(RawKey),
}

pub trait ButtonsInterface {
    /// Returns the next pending key event, if any, without blocking.
    fn poll_event(&mut self) -> Option<ButtonEvent>;
}
