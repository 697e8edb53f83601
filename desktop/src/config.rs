use crate::geometry::Point;
use crate::hal::{rgb, Color};

pub const MAX_WINDOWS: usize = 16;
pub const TITLE_CAPACITY: usize = 63;

pub const TITLEBAR_HEIGHT: i32 = 24;
pub const WINDOW_BORDER: i32 = 2;
pub const CLOSE_BTN_SIZE: i32 = 16;
pub const CLOSE_BTN_MARGIN: i32 = 4;
/// Width at the right end of the titlebar that never starts a drag.
pub const DRAG_CLOSE_RESERVE: i32 = 20;
pub const TITLE_TEXT_INSET: i32 = 4;

pub const RESIZE_GRIP: i32 = 4;
pub const MIN_WINDOW_WIDTH: i32 = 160;
pub const MIN_WINDOW_HEIGHT: i32 = 96;

pub const TASKBAR_HEIGHT: i32 = 32;
pub const START_BTN_WIDTH: i32 = 60;
pub const START_BTN_HEIGHT: i32 = 24;
pub const START_BTN_MARGIN: i32 = 4;
pub const CLOCK_WIDTH: i32 = 96;
pub const CLOCK_OFFSET_HOURS: i8 = -5;

pub const INITIAL_TERMINAL_ORIGIN: Point = Point::new(100, 80);
pub const SPAWNED_TERMINAL_ORIGIN: Point = Point::new(50, 50);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Theme {
    pub desktop_bg: Color,
    pub window_bg: Color,
    pub window_border: Color,
    pub window_highlight: Color,
    pub titlebar_focused: Color,
    pub titlebar_unfocused: Color,
    pub titlebar_text: Color,
    pub close_bg: Color,
    pub close_border: Color,
    pub close_glyph: Color,
    pub taskbar_bg: Color,
    pub taskbar_light: Color,
    pub taskbar_dark: Color,
    pub start_bg: Color,
    pub start_text: Color,
    pub clock_text: Color,
    pub terminal_fg: Color,
    pub terminal_bg: Color,
    pub cursor_fill: Color,
    pub cursor_outline: Color,
}

impl Theme {
    pub const CLASSIC: Theme = Theme {
        desktop_bg: rgb(0, 128, 128),
        window_bg: rgb(192, 192, 192),
        window_border: rgb(64, 64, 64),
        window_highlight: rgb(255, 255, 255),
        titlebar_focused: rgb(0, 0, 128),
        titlebar_unfocused: rgb(128, 128, 128),
        titlebar_text: rgb(255, 255, 255),
        close_bg: rgb(192, 192, 192),
        close_border: rgb(64, 64, 64),
        close_glyph: rgb(0, 0, 0),
        taskbar_bg: rgb(64, 64, 64),
        taskbar_light: rgb(128, 128, 128),
        taskbar_dark: rgb(32, 32, 32),
        start_bg: rgb(0, 128, 0),
        start_text: rgb(255, 255, 255),
        clock_text: rgb(255, 255, 255),
        terminal_fg: rgb(192, 192, 192),
        terminal_bg: rgb(0, 0, 0),
        cursor_fill: rgb(255, 255, 255),
        cursor_outline: rgb(0, 0, 0),
    };
}

impl Default for Theme {
    fn default() -> Self {
        Theme::CLASSIC
    }
}

/// Tunables consulted by the desktop loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    pub theme: Theme,
    pub resize_grip: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub clock_offset_hours: i8,
    pub initial_terminal: Point,
    pub spawned_terminal: Point,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            theme: Theme::CLASSIC,
            resize_grip: RESIZE_GRIP,
            min_width: MIN_WINDOW_WIDTH,
            min_height: MIN_WINDOW_HEIGHT,
            clock_offset_hours: CLOCK_OFFSET_HOURS,
            initial_terminal: INITIAL_TERMINAL_ORIGIN,
            spawned_terminal: SPAWNED_TERMINAL_ORIGIN,
        }
    }
}
