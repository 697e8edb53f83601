use ajos_desktop::{Clock, WallTime};
use core::hint::spin_loop;
use x86_64::instructions::port::Port;

const REG_SECONDS: u8 = 0x00;
const REG_MINUTES: u8 = 0x02;
const REG_HOURS: u8 = 0x04;
const REG_STATUS_A: u8 = 0x0A;
const REG_STATUS_B: u8 = 0x0B;

const STATUS_A_UPDATING: u8 = 0x80;
const STATUS_B_24H: u8 = 0x02;
const STATUS_B_BINARY: u8 = 0x04;

fn read_rtc_register(reg: u8) -> u8 {
    unsafe {
        let mut cmos_address = Port::<u8>::new(0x70);
        let mut cmos_data = Port::<u8>::new(0x71);
        cmos_address.write(reg);
        cmos_data.read()
    }
}

fn bcd_to_binary(value: u8) -> u8 {
    ((value / 16) * 10) + (value & 0xF)
}

#[derive(Copy, Clone, PartialEq, Eq)]
struct RawTime {
    sec: u8,
    min: u8,
    hour: u8,
}

fn read_snapshot() -> RawTime {
    RawTime {
        sec: read_rtc_register(REG_SECONDS),
        min: read_rtc_register(REG_MINUTES),
        hour: read_rtc_register(REG_HOURS),
    }
}

fn decode(raw: RawTime, status_b: u8) -> WallTime {
    let bcd_mode = status_b & STATUS_B_BINARY == 0;
    let hour_24 = status_b & STATUS_B_24H != 0;

    let (mut sec, mut min, mut hour) = (raw.sec, raw.min, raw.hour & 0x7F);
    if bcd_mode {
        sec = bcd_to_binary(sec);
        min = bcd_to_binary(min);
        hour = bcd_to_binary(hour);
    }
    if !hour_24 {
        let pm = raw.hour & 0x80 != 0;
        if pm && hour < 12 {
            hour += 12;
        } else if !pm && hour == 12 {
            hour = 0;
        }
    }
    WallTime {
        hours: hour % 24,
        minutes: min % 60,
        seconds: sec % 60,
    }
}

/// CMOS real-time clock, read as UTC.
pub struct CmosClock;

impl Clock for CmosClock {
    fn now(&mut self) -> WallTime {
        const MAX_TRIES: usize = 5;
        let status_b = read_rtc_register(REG_STATUS_B);
        for _ in 0..MAX_TRIES {
            for _ in 0..1000 {
                if read_rtc_register(REG_STATUS_A) & STATUS_A_UPDATING == 0 {
                    break;
                }
                spin_loop();
            }
            // Two equal reads in a row mean no update tore the snapshot.
            let a = read_snapshot();
            let b = read_snapshot();
            if a == b {
                return decode(a, status_b);
            }
        }
        decode(read_snapshot(), status_b)
    }
}
