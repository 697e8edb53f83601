//! Linear framebuffer with a static back buffer.
//!
//! Frames are composed in RGB `u32` order into the back buffer using the
//! firmware's byte layout, then copied to the visible buffer on `swap`.
//! Glyphs come from the embedded-graphics 8x13 mono font.

use ajos_desktop::geometry::Rect;
use ajos_desktop::{Color, Glyphs, Surface};
use bootloader_api::info::{FrameBuffer as BootFrameBuffer, FrameBufferInfo, PixelFormat};
use core::convert::Infallible;
use core::ptr::addr_of_mut;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point as EgPoint, Size};
use embedded_graphics::mono_font::{ascii::FONT_8X13, MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::{Drawable, Pixel};

use crate::serial;

const FONT: &MonoFont<'static> = &FONT_8X13;

/// Large enough for 1920x1200 at 4 bytes per pixel.
const BACK_BUFFER_BYTES: usize = 1920 * 1200 * 4;

static mut BACK_BUFFER: [u8; BACK_BUFFER_BYTES] = [0; BACK_BUFFER_BYTES];

fn write_pixel_raw_format(buf: &mut [u8], off: usize, color: u32, pixel_format: PixelFormat, bpp: usize) {
    if off + bpp > buf.len() {
        return;
    }
    let r = ((color >> 16) & 0xFF) as u8;
    let g = ((color >> 8) & 0xFF) as u8;
    let b = (color & 0xFF) as u8;
    match (pixel_format, bpp) {
        (PixelFormat::Rgb, 3 | 4) => {
            buf[off] = r;
            buf[off + 1] = g;
            buf[off + 2] = b;
        }
        (PixelFormat::Bgr, 3 | 4) => {
            buf[off] = b;
            buf[off + 1] = g;
            buf[off + 2] = r;
        }
        (PixelFormat::U8, 1) => {
            buf[off] = ((r as u16 * 77 + g as u16 * 150 + b as u16 * 29) >> 8) as u8;
        }
        _ => {}
    }
}

pub struct FrameBuffer {
    front: &'static mut [u8],
    back: Option<&'static mut [u8]>,
    info: FrameBufferInfo,
}

impl FrameBuffer {
    pub fn new(fb: &'static mut BootFrameBuffer) -> Self {
        let info = fb.info();
        let front = fb.buffer_mut();
        let back = if front.len() <= BACK_BUFFER_BYTES {
            // Taken exactly once, here.
            let buf = unsafe { &mut *addr_of_mut!(BACK_BUFFER) };
            Some(&mut buf[..front.len()])
        } else {
            serial::write("framebuffer: too large for back buffer, drawing direct");
            None
        };
        Self { front, back, info }
    }

    pub fn info(&self) -> FrameBufferInfo {
        self.info
    }

    fn target(&mut self) -> &mut [u8] {
        match self.back.as_deref_mut() {
            Some(back) => back,
            None => &mut *self.front,
        }
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        let info = self.info;
        if x < 0 || y < 0 || x as usize >= info.width || y as usize >= info.height {
            return;
        }
        let off = (y as usize * info.stride + x as usize) * info.bytes_per_pixel;
        write_pixel_raw_format(self.target(), off, color, info.pixel_format, info.bytes_per_pixel);
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> i32 {
        self.info.width as i32
    }

    fn height(&self) -> i32 {
        self.info.height as i32
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.put(x, y, color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clip = rect.intersect(&Rect::new(0, 0, self.width(), self.height()));
        if clip.is_empty() {
            return;
        }
        let info = self.info;
        let bpp = info.bytes_per_pixel;
        // Encode one pixel, then stamp it across each row.
        let mut pixel = [0u8; 4];
        write_pixel_raw_format(&mut pixel, 0, color, info.pixel_format, bpp.min(4));
        let buf = self.target();
        for y in clip.y..clip.bottom() {
            let row = (y as usize * info.stride + clip.x as usize) * bpp;
            let end = row + clip.w as usize * bpp;
            if end > buf.len() {
                break;
            }
            for chunk in buf[row..end].chunks_exact_mut(bpp) {
                chunk.copy_from_slice(&pixel[..bpp.min(4)]);
            }
        }
    }

    fn swap(&mut self) {
        if let Some(back) = self.back.as_deref() {
            self.front.copy_from_slice(back);
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.info.width as u32, self.info.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let c = ((color.r() as u32) << 16) | ((color.g() as u32) << 8) | color.b() as u32;
            self.put(coord.x, coord.y, c);
        }
        Ok(())
    }
}

fn to_rgb888(color: Color) -> Rgb888 {
    Rgb888::new((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

impl Glyphs for FrameBuffer {
    fn cell_width(&self) -> i32 {
        FONT.character_size.width as i32
    }

    fn cell_height(&self) -> i32 {
        FONT.character_size.height as i32
    }

    fn draw_char(&mut self, x: i32, y: i32, ch: u8, fg: Color, bg: Color) {
        let glyph = [if (0x20..0x7F).contains(&ch) { ch } else { b'?' }];
        let text = core::str::from_utf8(&glyph).unwrap_or("?");
        let style = MonoTextStyleBuilder::new()
            .font(FONT)
            .text_color(to_rgb888(fg))
            .background_color(to_rgb888(bg))
            .build();
        let _ = Text::with_baseline(text, EgPoint::new(x, y), style, Baseline::Top).draw(self);
    }
}
