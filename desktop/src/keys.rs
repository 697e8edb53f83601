pub const KEY_BACKSPACE: u8 = 0x08;
pub const KEY_TAB: u8 = 0x09;
pub const KEY_ENTER: u8 = 0x0A;
pub const KEY_RETURN: u8 = 0x0D;
pub const KEY_ESCAPE: u8 = 0x1B;

// Arrow keys sit above ASCII so they never collide with typed text.
pub const KEY_UP: u8 = 0x80;
pub const KEY_DOWN: u8 = 0x81;
pub const KEY_LEFT: u8 = 0x82;
pub const KEY_RIGHT: u8 = 0x83;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    /// Printable ASCII, 32..=126.
    Char(u8),
    Enter,
    Backspace,
    Tab,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Decodes one keyboard byte. `0`, unassigned control bytes and
    /// extended codes past the arrow block yield `None`.
    pub fn from_byte(byte: u8) -> Option<Key> {
        match byte {
            KEY_ENTER | KEY_RETURN => Some(Key::Enter),
            KEY_BACKSPACE => Some(Key::Backspace),
            KEY_TAB => Some(Key::Tab),
            KEY_ESCAPE => Some(Key::Escape),
            KEY_UP => Some(Key::Up),
            KEY_DOWN => Some(Key::Down),
            KEY_LEFT => Some(Key::Left),
            KEY_RIGHT => Some(Key::Right),
            0x20..=0x7E => Some(Key::Char(byte)),
            0x84..=0xFF => {
                log_debug!("keys: dropped extended code {:#04x}", byte);
                None
            }
            _ => None,
        }
    }
}
