use ajos_desktop::MouseSource;

use crate::ps2;

const MOUSE_SET_DEFAULTS: u8 = 0xF6;
const MOUSE_ENABLE_DATA: u8 = 0xF4;
const MOUSE_ACK: u8 = 0xFA;

const BUTTON_LEFT: u8 = 0x01;
const BUTTON_RIGHT: u8 = 0x02;

pub fn init() -> bool {
    ps2::flush_output();
    let ok_defaults = ps2::send_mouse_command(MOUSE_SET_DEFAULTS) == Some(MOUSE_ACK);
    let ok_enable = ps2::send_mouse_command(MOUSE_ENABLE_DATA) == Some(MOUSE_ACK);
    ps2::flush_output();
    ok_defaults && ok_enable
}

/// Three-byte PS/2 packet decoder holding the pointer position.
pub struct Mouse {
    x: i32,
    y: i32,
    max_x: i32,
    max_y: i32,
    packet: [u8; 3],
    packet_idx: usize,
    buttons: u8,
}

impl Mouse {
    /// Starts centred on a `width`×`height` screen.
    pub fn new(width: usize, height: usize) -> Self {
        let max_x = width.saturating_sub(1) as i32;
        let max_y = height.saturating_sub(1) as i32;
        Self {
            x: max_x / 2,
            y: max_y / 2,
            max_x,
            max_y,
            packet: [0; 3],
            packet_idx: 0,
            buttons: 0,
        }
    }

    fn push_byte(&mut self, byte: u8) {
        // Bit 3 is always set in the first byte; use it to resync.
        if self.packet_idx == 0 && (byte & 0x08) == 0 {
            return;
        }
        self.packet[self.packet_idx] = byte;
        self.packet_idx += 1;
        if self.packet_idx < self.packet.len() {
            return;
        }
        self.packet_idx = 0;
        self.apply_packet();
    }

    fn apply_packet(&mut self) {
        let header = self.packet[0];
        self.buttons = header & 0x07;
        if header & 0xC0 != 0 {
            return;
        }
        let dx = self.packet[1] as i8 as i32;
        let dy = self.packet[2] as i8 as i32;
        self.x = (self.x + dx).clamp(0, self.max_x.max(0));
        self.y = (self.y - dy).clamp(0, self.max_y.max(0));
    }
}

impl MouseSource for Mouse {
    fn poll(&mut self) {
        ps2::pump();
        while let Some(byte) = ps2::pop_mouse_byte() {
            self.push_byte(byte);
        }
    }

    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn left_pressed(&self) -> bool {
        self.buttons & BUTTON_LEFT != 0
    }

    fn right_pressed(&self) -> bool {
        self.buttons & BUTTON_RIGHT != 0
    }
}
