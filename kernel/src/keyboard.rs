use ajos_desktop::keys::{
    KEY_BACKSPACE, KEY_DOWN, KEY_ENTER, KEY_ESCAPE, KEY_LEFT, KEY_RIGHT, KEY_TAB, KEY_UP,
};
use ajos_desktop::KeySource;
use pc_keyboard::{
    layouts::Us104Key, DecodedKey, HandleControl, KeyCode, Keyboard as PcKeyboard, ScancodeSet1,
};

use crate::ps2;

const KBD_SET_DEFAULTS: u8 = 0xF6;
const KBD_ENABLE_SCANNING: u8 = 0xF4;
const KBD_SET_SCANCODE: u8 = 0xF0;
const KBD_SET_SCANCODE_SET2: u8 = 0x02;
const KBD_ACK: u8 = 0xFA;

pub fn init() -> bool {
    ps2::flush_output();
    let ok_defaults = ps2::send_keyboard_command(KBD_SET_DEFAULTS) == Some(KBD_ACK);
    let ok_set = ps2::send_keyboard_command(KBD_SET_SCANCODE) == Some(KBD_ACK)
        && ps2::send_keyboard_command(KBD_SET_SCANCODE_SET2) == Some(KBD_ACK);
    let ok_enable = ps2::send_keyboard_command(KBD_ENABLE_SCANNING) == Some(KBD_ACK);
    ps2::flush_output();
    ok_defaults && ok_set && ok_enable
}

/// Decodes the controller's translated set-1 stream into desktop key
/// bytes.
pub struct Keyboard {
    kb: PcKeyboard<Us104Key, ScancodeSet1>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            kb: PcKeyboard::new(ScancodeSet1::new(), Us104Key, HandleControl::Ignore),
        }
    }

    fn translate(key: DecodedKey) -> Option<u8> {
        match key {
            DecodedKey::Unicode(c) => match c {
                '\n' | '\r' => Some(KEY_ENTER),
                '\x08' => Some(KEY_BACKSPACE),
                '\t' => Some(KEY_TAB),
                '\x1b' => Some(KEY_ESCAPE),
                ' '..='~' => Some(c as u8),
                _ => None,
            },
            DecodedKey::RawKey(code) => match code {
                KeyCode::Return => Some(KEY_ENTER),
                KeyCode::Backspace => Some(KEY_BACKSPACE),
                KeyCode::Tab => Some(KEY_TAB),
                KeyCode::Escape => Some(KEY_ESCAPE),
                KeyCode::ArrowUp => Some(KEY_UP),
                KeyCode::ArrowDown => Some(KEY_DOWN),
                KeyCode::ArrowLeft => Some(KEY_LEFT),
                KeyCode::ArrowRight => Some(KEY_RIGHT),
                _ => None,
            },
        }
    }
}

impl KeySource for Keyboard {
    fn poll(&mut self) -> Option<u8> {
        ps2::pump();
        while let Some(sc) = ps2::pop_scancode() {
            let Ok(Some(evt)) = self.kb.add_byte(sc) else {
                continue;
            };
            if let Some(byte) = self.kb.process_keyevent(evt).and_then(Self::translate) {
                return Some(byte);
            }
        }
        None
    }
}
