use ajos_desktop::SystemControl;
use x86_64::instructions::interrupts;

use crate::{ps2, serial};

pub fn halt_forever() -> ! {
    interrupts::disable();
    loop {
        unsafe { x86::halt() };
    }
}

pub struct Power;

impl SystemControl for Power {
    fn reboot(&mut self) {
        serial::write("power: pulsing reset line");
        ps2::pulse_reset();
        // Reset did not take; park the CPU.
        halt_forever();
    }

    fn halt(&mut self) {
        serial::write("power: halted");
        halt_forever();
    }
}
