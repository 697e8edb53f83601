//! 8042 controller access shared by the keyboard and mouse.
//!
//! Nothing here is interrupt driven. Both devices drain the one output
//! buffer through [`pump`], which routes each byte by the AUX status bit.

use heapless::Deque;
use spin::Mutex;
use x86_64::instructions::interrupts;
use x86_64::instructions::port::Port;

const STATUS_PORT: u16 = 0x64;
const DATA_PORT: u16 = 0x60;

const CMD_READ_CTRL: u8 = 0x20;
const CMD_WRITE_CTRL: u8 = 0x60;
const CMD_DISABLE_PORT1: u8 = 0xAD;
const CMD_DISABLE_PORT2: u8 = 0xA7;
const CMD_ENABLE_PORT1: u8 = 0xAE;
const CMD_ENABLE_PORT2: u8 = 0xA8;
const CMD_WRITE_MOUSE: u8 = 0xD4;
const CMD_PULSE_RESET: u8 = 0xFE;

const STATUS_OUT_FULL: u8 = 0x01;
const STATUS_IN_FULL: u8 = 0x02;
const STATUS_AUX_DATA: u8 = 0x20;

const SCANCODE_QUEUE_LEN: usize = 128;
const MOUSE_QUEUE_LEN: usize = 256;
/// Bytes drained per pump so a flooding device cannot stall a frame.
const PUMP_BUDGET: usize = 64;

struct Queues {
    scancodes: Deque<u8, SCANCODE_QUEUE_LEN>,
    mouse: Deque<u8, MOUSE_QUEUE_LEN>,
}

static QUEUES: Mutex<Queues> = Mutex::new(Queues {
    scancodes: Deque::new(),
    mouse: Deque::new(),
});

fn read_status() -> u8 {
    unsafe { Port::<u8>::new(STATUS_PORT).read() }
}

fn read_data() -> u8 {
    unsafe { Port::<u8>::new(DATA_PORT).read() }
}

fn write_command(cmd: u8) {
    let _ = wait_input_clear();
    unsafe { Port::<u8>::new(STATUS_PORT).write(cmd) };
}

fn write_data(data: u8) {
    let _ = wait_input_clear();
    unsafe { Port::<u8>::new(DATA_PORT).write(data) };
}

fn wait_input_clear() -> bool {
    for _ in 0..100_000 {
        if read_status() & STATUS_IN_FULL == 0 {
            return true;
        }
    }
    false
}

fn wait_output_full() -> bool {
    for _ in 0..100_000 {
        if read_status() & STATUS_OUT_FULL != 0 {
            return true;
        }
    }
    false
}

pub fn flush_output() {
    while read_status() & STATUS_OUT_FULL != 0 {
        let _ = read_data();
    }
}

pub fn read_output_byte() -> Option<u8> {
    if read_status() & STATUS_OUT_FULL == 0 {
        return None;
    }
    Some(read_data())
}

pub fn send_keyboard_command(cmd: u8) -> Option<u8> {
    write_data(cmd);
    if wait_output_full() {
        Some(read_data())
    } else {
        None
    }
}

pub fn send_mouse_command(cmd: u8) -> Option<u8> {
    write_command(CMD_WRITE_MOUSE);
    write_data(cmd);
    if wait_output_full() {
        Some(read_data())
    } else {
        None
    }
}

/// Enables both ports with their IRQ lines masked; input is polled.
pub fn init_controller() -> bool {
    write_command(CMD_DISABLE_PORT1);
    write_command(CMD_DISABLE_PORT2);
    flush_output();

    write_command(CMD_READ_CTRL);
    if !wait_output_full() {
        return false;
    }
    let mut ctrl = read_data();
    ctrl &= !(0x01 | 0x02);
    ctrl |= 0x40;
    ctrl &= !0x30;

    write_command(CMD_WRITE_CTRL);
    write_data(ctrl);

    write_command(CMD_ENABLE_PORT1);
    write_command(CMD_ENABLE_PORT2);
    flush_output();
    true
}

/// Pulses the CPU reset line.
pub fn pulse_reset() {
    write_command(CMD_PULSE_RESET);
}

/// Moves pending controller bytes into the per-device queues. Full
/// queues drop the new byte.
pub fn pump() {
    interrupts::without_interrupts(|| {
        let mut q = QUEUES.lock();
        for _ in 0..PUMP_BUDGET {
            let status = read_status();
            if status & STATUS_OUT_FULL == 0 {
                break;
            }
            let byte = read_data();
            let result = if status & STATUS_AUX_DATA != 0 {
                q.mouse.push_back(byte)
            } else if byte == 0xFA || byte == 0xFE {
                Ok(())
            } else {
                q.scancodes.push_back(byte)
            };
            if result.is_err() {
                ajos_desktop::log_debug!("ps2: queue full, dropped {:#04x}", byte);
            }
        }
    });
}

pub fn pop_scancode() -> Option<u8> {
    interrupts::without_interrupts(|| QUEUES.lock().scancodes.pop_front())
}

pub fn pop_mouse_byte() -> Option<u8> {
    interrupts::without_interrupts(|| QUEUES.lock().mouse.pop_front())
}
