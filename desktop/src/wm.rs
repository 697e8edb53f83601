//! Window manager: lifecycle, focus, hit-testing, chrome and dispatch.

use crate::config::{
    Theme, CLOSE_BTN_MARGIN, CLOSE_BTN_SIZE, TITLEBAR_HEIGHT, TITLE_TEXT_INSET, WINDOW_BORDER,
};
use crate::error::WmError;
use crate::geometry::Rect;
use crate::hal::{Display, MOUSE_LEFT};
use crate::keys::Key;
use crate::terminal::SystemRequest;
use crate::window::{ContentKind, Window, WindowId, WindowRegistry};

/// Content hook: what a window shows and how it reacts to keys.
pub trait WindowContent {
    fn draw(&self, content: Rect, display: &mut dyn Display);
    fn handle_key(&mut self, key: Key) -> Option<SystemRequest>;
}

/// Resolves a window's content tag to its implementation.
pub trait ContentHost {
    fn content(&self, id: WindowId, kind: ContentKind) -> Option<&dyn WindowContent>;
    fn content_mut(&mut self, id: WindowId, kind: ContentKind) -> Option<&mut dyn WindowContent>;
}

/// Host for windows that carry no content.
pub struct NoContent;

impl ContentHost for NoContent {
    fn content(&self, _id: WindowId, _kind: ContentKind) -> Option<&dyn WindowContent> {
        None
    }

    fn content_mut(&mut self, _id: WindowId, _kind: ContentKind) -> Option<&mut dyn WindowContent> {
        None
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseOutcome {
    Ignored,
    Focused(WindowId),
    Closed(WindowId),
}

pub fn content_rect(rect: &Rect) -> Rect {
    Rect::new(
        rect.x + WINDOW_BORDER,
        rect.y + TITLEBAR_HEIGHT + WINDOW_BORDER,
        rect.w - 2 * WINDOW_BORDER,
        rect.h - TITLEBAR_HEIGHT - 2 * WINDOW_BORDER,
    )
}

pub fn titlebar_rect(rect: &Rect) -> Rect {
    Rect::new(
        rect.x + WINDOW_BORDER,
        rect.y + WINDOW_BORDER,
        rect.w - 2 * WINDOW_BORDER,
        TITLEBAR_HEIGHT - WINDOW_BORDER,
    )
}

pub fn close_button_rect(rect: &Rect) -> Rect {
    Rect::new(
        rect.right() - WINDOW_BORDER - CLOSE_BTN_SIZE - CLOSE_BTN_MARGIN,
        rect.y + WINDOW_BORDER + (TITLEBAR_HEIGHT - WINDOW_BORDER - CLOSE_BTN_SIZE) / 2,
        CLOSE_BTN_SIZE,
        CLOSE_BTN_SIZE,
    )
}

pub fn hit_window(rect: &Rect, x: i32, y: i32) -> bool {
    rect.contains(x, y)
}

pub fn hit_close_button(rect: &Rect, x: i32, y: i32) -> bool {
    close_button_rect(rect).contains(x, y)
}

/// Titlebar band minus the close button.
pub fn hit_titlebar(rect: &Rect, x: i32, y: i32) -> bool {
    if hit_close_button(rect, x, y) {
        return false;
    }
    x >= rect.x + WINDOW_BORDER
        && x < rect.right() - WINDOW_BORDER
        && y >= rect.y + WINDOW_BORDER
        && y < rect.y + TITLEBAR_HEIGHT
}

pub struct WindowManager {
    windows: WindowRegistry,
    theme: Theme,
}

impl WindowManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            windows: WindowRegistry::new(),
            theme,
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn create(&mut self, rect: Rect, title: &str) -> Result<WindowId, WmError> {
        let id = match self.windows.insert(rect, title, self.theme.window_bg) {
            Ok(id) => id,
            Err(err) => {
                log_warn!("wm: create '{}' failed: {}", title, err);
                return Err(err);
            }
        };
        self.focus(id)?;
        log_info!("wm: created {} '{}' at {},{} {}x{}", id, title, rect.x, rect.y, rect.w, rect.h);
        Ok(id)
    }

    pub fn destroy(&mut self, id: WindowId) -> Result<(), WmError> {
        if self.windows.remove(id).is_none() {
            return Err(WmError::InvalidHandle(id));
        }
        log_info!("wm: destroyed {}", id);
        let next = self.windows.iter().next_back().map(|win| win.id);
        if let Some(next) = next {
            self.focus(next)?;
        }
        Ok(())
    }

    pub fn focus(&mut self, id: WindowId) -> Result<(), WmError> {
        if !self.windows.get(id).map(|win| win.visible).unwrap_or(false) {
            return Err(WmError::InvalidHandle(id));
        }
        for win in self.windows.iter_mut() {
            win.focused = win.id == id;
        }
        self.windows.raise(id);
        Ok(())
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.windows.iter().find(|win| win.focused).map(|win| win.id)
    }

    pub fn set_rect(&mut self, id: WindowId, rect: Rect) -> Result<(), WmError> {
        let win = self.windows.get_mut(id).ok_or(WmError::InvalidHandle(id))?;
        win.rect = rect;
        Ok(())
    }

    pub fn set_content(&mut self, id: WindowId, kind: ContentKind) -> Result<(), WmError> {
        let win = self.windows.get_mut(id).ok_or(WmError::InvalidHandle(id))?;
        win.content = kind;
        Ok(())
    }

    pub fn set_bg_color(&mut self, id: WindowId, color: u32) -> Result<(), WmError> {
        let win = self.windows.get_mut(id).ok_or(WmError::InvalidHandle(id))?;
        win.bg_color = color;
        Ok(())
    }

    pub fn content_rect(&self, id: WindowId) -> Option<Rect> {
        self.windows.get(id).map(|win| content_rect(&win.rect))
    }

    pub fn draw_all(&self, display: &mut dyn Display, host: &dyn ContentHost) {
        for win in self.windows.iter() {
            self.draw_window(win, display, host);
        }
    }

    fn draw_window(&self, win: &Window, display: &mut dyn Display, host: &dyn ContentHost) {
        self.draw_frame(win, display);
        self.draw_titlebar(win, display);
        let content = content_rect(&win.rect);
        display.fill_rect(content, win.bg_color);
        if win.content != ContentKind::None {
            if let Some(hook) = host.content(win.id, win.content) {
                hook.draw(content, display);
            }
        }
    }

    fn draw_frame(&self, win: &Window, display: &mut dyn Display) {
        display.draw_rect(win.rect, self.theme.window_border);
        display.draw_rect(win.rect.inset(1), self.theme.window_highlight);
    }

    fn draw_titlebar(&self, win: &Window, display: &mut dyn Display) {
        let color = if win.focused {
            self.theme.titlebar_focused
        } else {
            self.theme.titlebar_unfocused
        };
        let band = titlebar_rect(&win.rect);
        display.fill_rect(band, color);

        let text_y = band.y + (band.h - display.cell_height()) / 2;
        display.draw_str(band.x + TITLE_TEXT_INSET, text_y, win.title.as_str(), self.theme.titlebar_text, color);

        let btn = close_button_rect(&win.rect);
        display.fill_rect(btn, self.theme.close_bg);
        display.draw_rect(btn, self.theme.close_border);
        for i in 2..CLOSE_BTN_SIZE - 2 {
            display.draw_pixel(btn.x + i, btn.y + i, self.theme.close_glyph);
            display.draw_pixel(btn.x + i + 1, btn.y + i, self.theme.close_glyph);
            display.draw_pixel(btn.x + CLOSE_BTN_SIZE - 1 - i, btn.y + i, self.theme.close_glyph);
            display.draw_pixel(btn.x + CLOSE_BTN_SIZE - 2 - i, btn.y + i, self.theme.close_glyph);
        }
    }

    /// Routes a press edge to the frontmost window under the point.
    /// `buttons` holds only the buttons that went down this frame.
    pub fn handle_mouse(&mut self, x: i32, y: i32, buttons: u8) -> MouseOutcome {
        if buttons & MOUSE_LEFT == 0 {
            return MouseOutcome::Ignored;
        }
        let hit = self
            .windows
            .iter()
            .rev()
            .find(|win| hit_window(&win.rect, x, y))
            .map(|win| (win.id, hit_close_button(&win.rect, x, y)));
        let Some((id, on_close)) = hit else {
            return MouseOutcome::Ignored;
        };
        if on_close {
            let _ = self.destroy(id);
            return MouseOutcome::Closed(id);
        }
        // Titlebar and content clicks both just focus; drags are started
        // by the desktop loop.
        let _ = self.focus(id);
        MouseOutcome::Focused(id)
    }

    pub fn handle_key(&mut self, key: Key, host: &mut dyn ContentHost) -> Option<SystemRequest> {
        let id = self.focused()?;
        let kind = self.windows.get(id)?.content;
        if kind == ContentKind::None {
            return None;
        }
        host.content_mut(id, kind)?.handle_key(key)
    }
}
