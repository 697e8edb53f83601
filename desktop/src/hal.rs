//! Collaborator seams.
//!
//! The desktop never touches a port or a framebuffer directly. The kernel
//! implements these traits over the real devices; tests implement them
//! over plain arrays.

use crate::geometry::Rect;

/// Packed `0x00RRGGBB`.
pub type Color = u32;

pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

pub const MOUSE_LEFT: u8 = 0x01;
pub const MOUSE_RIGHT: u8 = 0x02;

/// Raster output. Implementors clip anything outside the screen.
pub trait Surface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Presents the back buffer.
    fn swap(&mut self);

    fn hline(&mut self, x: i32, y: i32, w: i32, color: Color) {
        self.fill_rect(Rect::new(x, y, w, 1), color);
    }

    fn vline(&mut self, x: i32, y: i32, h: i32, color: Color) {
        self.fill_rect(Rect::new(x, y, 1, h), color);
    }

    /// One pixel outline.
    fn draw_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.hline(rect.x, rect.y, rect.w, color);
        self.hline(rect.x, rect.bottom() - 1, rect.w, color);
        self.vline(rect.x, rect.y, rect.h, color);
        self.vline(rect.right() - 1, rect.y, rect.h, color);
    }
}

/// Fixed-cell glyph rasterizer.
pub trait Glyphs {
    fn cell_width(&self) -> i32;
    fn cell_height(&self) -> i32;
    fn draw_char(&mut self, x: i32, y: i32, ch: u8, fg: Color, bg: Color);

    fn draw_str(&mut self, x: i32, y: i32, text: &str, fg: Color, bg: Color) {
        let step = self.cell_width();
        let mut cx = x;
        for byte in text.bytes() {
            self.draw_char(cx, y, byte, fg, bg);
            cx += step;
        }
    }
}

pub trait Display: Surface + Glyphs {}

impl<T: Surface + Glyphs> Display for T {}

/// Non-blocking keyboard. Yields ASCII bytes or the arrow codes in
/// [`crate::keys`]; `None` when the queue is empty.
pub trait KeySource {
    fn poll(&mut self) -> Option<u8>;
}

pub trait MouseSource {
    /// Drains pending device input into the position/button state.
    fn poll(&mut self) {}
    /// Current position, already clamped to the screen.
    fn position(&self) -> (i32, i32);
    fn left_pressed(&self) -> bool;
    fn right_pressed(&self) -> bool;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WallTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

pub trait Clock {
    fn now(&mut self) -> WallTime;
}

/// Power effects requested by terminal commands.
pub trait SystemControl {
    fn reboot(&mut self);
    fn halt(&mut self);
}

pub trait FramePacer {
    /// Yields until the next frame tick.
    fn wait_for_tick(&mut self);
}

/// Everything one frame of the desktop loop talks to.
pub struct Devices<'a> {
    pub display: &'a mut dyn Display,
    pub keyboard: &'a mut dyn KeySource,
    pub mouse: &'a mut dyn MouseSource,
    pub clock: &'a mut dyn Clock,
    pub system: &'a mut dyn SystemControl,
    pub pacer: &'a mut dyn FramePacer,
}
