#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]
#![cfg_attr(not(target_os = "none"), allow(dead_code))]

extern crate lazy_static;
extern crate spin;

mod framebuffer;
mod keyboard;
mod mouse;
mod power;
mod ps2;
mod rtc;
mod serial;
mod timer;

#[cfg(target_os = "none")]
use bootloader_api::{config::BootloaderConfig, entry_point, BootInfo};
#[cfg(target_arch = "x86_64")]
use core::arch::asm;

use ajos_desktop::{logger, Desktop, Devices};
use framebuffer::FrameBuffer;
use keyboard::Keyboard;
use mouse::Mouse;
use power::Power;
use rtc::CmosClock;
use timer::PitPacer;

pub const OS_NAME: &str = "AJOS";

#[cfg(target_os = "none")]
static BOOTLOADER_CONFIG: BootloaderConfig = {
    let mut cfg = BootloaderConfig::new_default();
    cfg.mappings.physical_memory =
        Some(bootloader_api::config::Mapping::FixedAddress(0xffff_8000_0000_0000));
    // The desktop state (sixteen terminal sessions) lives on the boot stack.
    cfg.kernel_stack_size = 1024 * 1024;
    cfg
};

#[cfg(target_os = "none")]
entry_point!(kernel_main, config = &BOOTLOADER_CONFIG);

#[cfg(target_os = "none")]
fn kernel_main(boot_info: &'static mut BootInfo) -> ! {
    enable_sse();
    serial::write("ajos: booting");
    logger::set_sink(serial::log_sink);
    #[cfg(feature = "log")]
    logger::set_max_level(logger::Level::Debug);

    let Some(fb) = boot_info.framebuffer.as_mut() else {
        serial::write("ajos: no framebuffer, halting");
        power::halt_forever();
    };
    let mut display = FrameBuffer::new(fb);
    let info = display.info();
    ajos_desktop::log_info!(
        "framebuffer {}x{} stride {} bpp {}",
        info.width,
        info.height,
        info.stride,
        info.bytes_per_pixel
    );

    boot(&mut display, info.width, info.height)
}

fn boot(display: &mut FrameBuffer, width: usize, height: usize) -> ! {
    let ps2_ok = ps2::init_controller();
    let kbd_ok = keyboard::init();
    let mouse_ok = mouse::init();
    if !ps2_ok {
        serial::write("ps2: controller init failed");
    }
    if !kbd_ok {
        serial::write("ps2: keyboard init failed");
    }
    if !mouse_ok {
        serial::write("ps2: mouse init failed");
    }

    let mut keys = Keyboard::new();
    let mut pointer = Mouse::new(width, height);
    let mut clock = CmosClock;
    let mut pacer = PitPacer::new();
    let mut system = Power;

    let devices = Devices {
        display,
        keyboard: &mut keys,
        mouse: &mut pointer,
        clock: &mut clock,
        system: &mut system,
        pacer: &mut pacer,
    };
    ajos_desktop::log_info!("{} desktop at {} Hz", OS_NAME, timer::FRAME_HZ);
    Desktop::new().run(devices)
}

fn enable_sse() {
    use x86_64::registers::control::{Cr0, Cr0Flags, Cr4, Cr4Flags};
    unsafe {
        Cr0::update(|flags| {
            flags.remove(Cr0Flags::EMULATE_COPROCESSOR);
            flags.remove(Cr0Flags::TASK_SWITCHED);
            flags.insert(Cr0Flags::MONITOR_COPROCESSOR);
        });
        Cr4::update(|flags| {
            flags.insert(Cr4Flags::OSFXSR);
            flags.insert(Cr4Flags::OSXMMEXCPT_ENABLE);
        });
        let mxcsr: u32 = 0x1F80;
        asm!("ldmxcsr [{}]", in(reg) &mxcsr, options(nostack, preserves_flags));
    }
}

#[cfg(target_os = "none")]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use core::fmt::Write;
    let mut msg = heapless::String::<256>::new();
    let _ = write!(msg, "KERNEL PANIC: {}", info);
    serial::write_try(msg.as_str());
    power::halt_forever()
}

/// The kernel only runs on bare metal; a hosted build exists so the
/// workspace can be checked from a development machine.
#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("{}: build for x86_64-unknown-none and boot with a bootloader image", OS_NAME);
}
