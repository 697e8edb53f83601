use core::fmt::{self, Write};

use ajos_desktop::logger::Level;
use heapless::String as HString;
use lazy_static::lazy_static;
use spin::Mutex;
use uart_16550::SerialPort;

const LOG_LINE_CAPACITY: usize = 256;

lazy_static! {
    static ref SERIAL1: Mutex<SerialPort> = {
        let mut serial_port = unsafe { SerialPort::new(0x3F8) };
        serial_port.init();
        Mutex::new(serial_port)
    };
}

pub fn write(msg: &str) {
    let mut serial = SERIAL1.lock();
    for byte in msg.bytes() {
        serial.send(byte);
    }
    serial.send(b'\r');
    serial.send(b'\n');
}

/// Used from the panic handler, where the port may already be held.
pub fn write_try(msg: &str) {
    let Some(mut serial) = SERIAL1.try_lock() else {
        return;
    };
    for byte in msg.bytes() {
        serial.send(byte);
    }
    serial.send(b'\r');
    serial.send(b'\n');
}

/// Sink for the desktop logger: one `[LEVEL] message` line per record.
/// Overlong records are cut at the line capacity.
pub fn log_sink(level: Level, args: fmt::Arguments<'_>) {
    let mut line = HString::<LOG_LINE_CAPACITY>::new();
    let _ = write!(line, "[{}] ", level.as_str());
    let _ = line.write_fmt(args);
    write(line.as_str());
}
