//! PIT channel 0 as a polled frame clock.
//!
//! The counter runs as a rate generator at the frame rate with its IRQ
//! left masked. A frame tick has passed each time the latched count jumps
//! back up to a reload.

use ajos_desktop::FramePacer;
use core::hint::spin_loop;
use x86_64::instructions::port::Port;

const CHANNEL_0_DATA: u16 = 0x40;
const COMMAND: u16 = 0x43;
const PIT_HZ: u32 = 1_193_182;
pub const FRAME_HZ: u32 = 60;

/// Channel 0, lobyte/hibyte, mode 2, binary.
const MODE_RATE_GENERATOR: u8 = 0b0011_0100;
const LATCH_CHANNEL_0: u8 = 0b0000_0000;

pub struct PitPacer {
    command: Port<u8>,
    data: Port<u8>,
    last: u16,
}

impl PitPacer {
    pub fn new() -> Self {
        let mut pacer = Self {
            command: Port::new(COMMAND),
            data: Port::new(CHANNEL_0_DATA),
            last: 0,
        };
        let reload = (PIT_HZ / FRAME_HZ) as u16;
        unsafe {
            pacer.command.write(MODE_RATE_GENERATOR);
            pacer.data.write((reload & 0xFF) as u8);
            pacer.data.write((reload >> 8) as u8);
        }
        pacer.last = pacer.read_counter();
        pacer
    }

    fn read_counter(&mut self) -> u16 {
        unsafe {
            self.command.write(LATCH_CHANNEL_0);
            let low = self.data.read() as u16;
            let high = self.data.read() as u16;
            (high << 8) | low
        }
    }
}

impl FramePacer for PitPacer {
    fn wait_for_tick(&mut self) {
        loop {
            let now = self.read_counter();
            let reloaded = now > self.last;
            self.last = now;
            if reloaded {
                return;
            }
            spin_loop();
        }
    }
}
