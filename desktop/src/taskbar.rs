//! Bottom strip: start button and wall clock.

use core::fmt::Write;
use heapless::String as HString;

use crate::config::{
    Theme, CLOCK_WIDTH, START_BTN_HEIGHT, START_BTN_MARGIN, START_BTN_WIDTH, TASKBAR_HEIGHT,
};
use crate::geometry::Rect;
use crate::hal::{Color, Display, WallTime};

pub const START_LABEL: &str = "AJOS";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TaskbarAction {
    SpawnTerminal,
}

/// `H:MM:SS AM/PM` after shifting the hour by `offset_hours`.
pub fn format_clock(time: WallTime, offset_hours: i8) -> HString<12> {
    let hours = (time.hours as i32 + offset_hours as i32).rem_euclid(24);
    let suffix = if hours >= 12 { "PM" } else { "AM" };
    let hours12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    let mut out = HString::new();
    let _ = write!(out, "{}:{:02}:{:02} {}", hours12, time.minutes, time.seconds, suffix);
    out
}

pub struct Taskbar {
    screen_w: i32,
    top: i32,
    theme: Theme,
    clock_offset_hours: i8,
}

impl Taskbar {
    pub fn new(screen_w: i32, screen_h: i32, theme: Theme, clock_offset_hours: i8) -> Self {
        Self {
            screen_w,
            top: screen_h - TASKBAR_HEIGHT,
            theme,
            clock_offset_hours,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0, self.top, self.screen_w, TASKBAR_HEIGHT)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        y >= self.top && y < self.top + TASKBAR_HEIGHT && x >= 0 && x < self.screen_w
    }

    pub fn start_button(&self) -> Rect {
        Rect::new(
            START_BTN_MARGIN,
            self.top + (TASKBAR_HEIGHT - START_BTN_HEIGHT) / 2,
            START_BTN_WIDTH,
            START_BTN_HEIGHT,
        )
    }

    pub fn draw(&self, display: &mut dyn Display, time: WallTime) {
        let theme = &self.theme;
        display.fill_rect(self.rect(), theme.taskbar_bg);
        display.hline(0, self.top, self.screen_w, theme.taskbar_light);

        let btn = self.start_button();
        self.draw_button(display, btn, theme.start_bg);
        let cw = display.cell_width();
        let ch = display.cell_height();
        let label_x = btn.x + (btn.w - START_LABEL.len() as i32 * cw) / 2;
        let label_y = btn.y + (btn.h - ch) / 2;
        display.draw_str(label_x, label_y, START_LABEL, theme.start_text, theme.start_bg);

        let clock = format_clock(time, self.clock_offset_hours);
        let clock_x = self.screen_w - CLOCK_WIDTH - START_BTN_MARGIN;
        let clock_y = self.top + (TASKBAR_HEIGHT - ch) / 2;
        display.draw_str(clock_x, clock_y, clock.as_str(), theme.clock_text, theme.taskbar_bg);

        // TODO: per-window buttons between the start button and the clock
        // need a title/focus listing from the window manager.
    }

    fn draw_button(&self, display: &mut dyn Display, r: Rect, bg: Color) {
        display.fill_rect(r, bg);
        display.hline(r.x, r.y, r.w, self.theme.taskbar_light);
        display.vline(r.x, r.y, r.h, self.theme.taskbar_light);
        display.hline(r.x, r.bottom() - 1, r.w, self.theme.taskbar_dark);
        display.vline(r.right() - 1, r.y, r.h, self.theme.taskbar_dark);
    }

    pub fn handle_click(&self, x: i32, y: i32) -> Option<TaskbarAction> {
        if !self.contains(x, y) {
            return None;
        }
        if self.start_button().contains(x, y) {
            return Some(TaskbarAction::SpawnTerminal);
        }
        None
    }
}
