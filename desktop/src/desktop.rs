//! The desktop loop: one frame = draw, keyboard, mouse.
//!
//! Drag and resize live in a single [`Interaction`] value owned here. The
//! window manager never sees a drag; it only gets press edges that the
//! loop did not claim.

use core::ops::BitOr;

use crate::config::{DesktopConfig, DRAG_CLOSE_RESERVE, TASKBAR_HEIGHT, TITLEBAR_HEIGHT, WINDOW_BORDER};
use crate::error::WmError;
use crate::geometry::{Point, Rect};
use crate::hal::{Devices, Display, MouseSource, MOUSE_LEFT, MOUSE_RIGHT};
use crate::keys::Key;
use crate::taskbar::{Taskbar, TaskbarAction};
use crate::terminal::{self, SystemRequest, TerminalPool};
use crate::window::{ContentKind, WindowId};
use crate::wm::{MouseOutcome, WindowManager};

/// Upper bound on keys drained per frame.
const KEYS_PER_FRAME: usize = 16;

const CURSOR_W: usize = 12;
const CURSOR_H: usize = 19;

// 0 transparent, 1 fill, 2 outline.
const CURSOR: [[u8; CURSOR_W]; CURSOR_H] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 1, 1, 2, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 1, 1, 1, 2, 0, 0, 0, 0, 0, 0, 0],
    [2, 1, 1, 1, 1, 2, 0, 0, 0, 0, 0, 0],
    [2, 1, 1, 1, 1, 1, 2, 0, 0, 0, 0, 0],
    [2, 1, 1, 1, 1, 1, 1, 2, 0, 0, 0, 0],
    [2, 1, 1, 1, 1, 1, 1, 1, 2, 0, 0, 0],
    [2, 1, 1, 1, 1, 1, 1, 1, 1, 2, 0, 0],
    [2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 0],
    [2, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2],
    [2, 1, 1, 1, 2, 1, 1, 2, 0, 0, 0, 0],
    [2, 1, 1, 2, 0, 2, 1, 1, 2, 0, 0, 0],
    [2, 1, 2, 0, 0, 2, 1, 1, 2, 0, 0, 0],
    [2, 2, 0, 0, 0, 0, 2, 1, 1, 2, 0, 0],
    [2, 0, 0, 0, 0, 0, 2, 1, 1, 2, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 2, 1, 2, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0],
];

/// Which window edges a resize moves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct EdgeMask(u8);

impl EdgeMask {
    pub const NONE: EdgeMask = EdgeMask(0);
    pub const LEFT: EdgeMask = EdgeMask(1 << 0);
    pub const RIGHT: EdgeMask = EdgeMask(1 << 1);
    pub const TOP: EdgeMask = EdgeMask(1 << 2);
    pub const BOTTOM: EdgeMask = EdgeMask(1 << 3);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: EdgeMask) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl BitOr for EdgeMask {
    type Output = EdgeMask;

    fn bitor(self, rhs: EdgeMask) -> EdgeMask {
        EdgeMask(self.0 | rhs.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        window: WindowId,
        grab: Point,
    },
    Resizing {
        window: WindowId,
        edges: EdgeMask,
        anchor_rect: Rect,
        anchor_mouse: Point,
    },
}

/// Mouse state read once at the start of a frame's decisions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MouseSnapshot {
    pub x: i32,
    pub y: i32,
    pub buttons: u8,
    /// Buttons that went down since the previous snapshot.
    pub pressed: u8,
}

impl MouseSnapshot {
    pub fn sample(mouse: &dyn MouseSource, prev: &MouseSnapshot) -> Self {
        let (x, y) = mouse.position();
        let mut buttons = 0;
        if mouse.left_pressed() {
            buttons |= MOUSE_LEFT;
        }
        if mouse.right_pressed() {
            buttons |= MOUSE_RIGHT;
        }
        Self {
            x,
            y,
            buttons,
            pressed: buttons & !prev.buttons,
        }
    }

    pub fn left(&self) -> bool {
        self.buttons & MOUSE_LEFT != 0
    }

    pub fn left_just_pressed(&self) -> bool {
        self.pressed & MOUSE_LEFT != 0
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Edges of `rect` within `grip` pixels of the point. Empty when the
/// point is outside the window.
pub fn classify_edges(rect: &Rect, x: i32, y: i32, grip: i32) -> EdgeMask {
    if !rect.contains(x, y) {
        return EdgeMask::NONE;
    }
    let mut mask = EdgeMask::NONE;
    if x < rect.x + grip {
        mask = mask | EdgeMask::LEFT;
    }
    if x >= rect.right() - grip {
        mask = mask | EdgeMask::RIGHT;
    }
    if y < rect.y + grip {
        mask = mask | EdgeMask::TOP;
    }
    if y >= rect.bottom() - grip {
        mask = mask | EdgeMask::BOTTOM;
    }
    mask
}

/// Titlebar band that starts a drag; stops short of the close button.
pub fn in_drag_zone(rect: &Rect, x: i32, y: i32) -> bool {
    x >= rect.x + WINDOW_BORDER
        && x < rect.right() - WINDOW_BORDER - DRAG_CLOSE_RESERVE
        && y >= rect.y + WINDOW_BORDER
        && y < rect.y + TITLEBAR_HEIGHT
}

/// Origin for a dragged window, kept on screen above the taskbar.
pub fn drag_origin(target: Point, size: (i32, i32), screen: (i32, i32)) -> Point {
    let (w, h) = size;
    let (sw, sh) = screen;
    let mut x = target.x.max(0);
    let mut y = target.y.max(0);
    let max_x = sw - w;
    let max_y = sh - TASKBAR_HEIGHT - h;
    if x > max_x {
        x = max_x;
    }
    if y > max_y {
        y = max_y;
    }
    Point::new(x, y)
}

/// Applies the mouse delta to the anchor rectangle. Edges that move the
/// origin keep the opposite edge fixed when the minimum size kicks in.
pub fn resize_rect(anchor: Rect, edges: EdgeMask, delta: Point, min_w: i32, min_h: i32) -> Rect {
    let mut r = anchor;
    if edges.contains(EdgeMask::LEFT) {
        r.x = anchor.x + delta.x;
        r.w = anchor.w - delta.x;
    }
    if edges.contains(EdgeMask::RIGHT) {
        r.w = anchor.w + delta.x;
    }
    if edges.contains(EdgeMask::TOP) {
        r.y = anchor.y + delta.y;
        r.h = anchor.h - delta.y;
    }
    if edges.contains(EdgeMask::BOTTOM) {
        r.h = anchor.h + delta.y;
    }
    if r.w < min_w {
        r.w = min_w;
        if edges.contains(EdgeMask::LEFT) {
            r.x = anchor.right() - min_w;
        }
    }
    if r.h < min_h {
        r.h = min_h;
        if edges.contains(EdgeMask::TOP) {
            r.y = anchor.bottom() - min_h;
        }
    }
    r.x = r.x.max(0);
    r.y = r.y.max(0);
    r
}

pub struct Desktop {
    config: DesktopConfig,
    wm: WindowManager,
    terminals: TerminalPool,
    taskbar: Option<Taskbar>,
    interaction: Interaction,
    mouse: MouseSnapshot,
    cell: (i32, i32),
}

impl Desktop {
    pub fn new() -> Self {
        Self::with_config(DesktopConfig::default())
    }

    pub fn with_config(config: DesktopConfig) -> Self {
        Self {
            config,
            wm: WindowManager::new(config.theme),
            terminals: TerminalPool::new(),
            taskbar: None,
            interaction: Interaction::Idle,
            mouse: MouseSnapshot::default(),
            cell: (0, 0),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.taskbar.is_some()
    }

    /// Sets up the taskbar and opens the first terminal. Later calls do
    /// nothing.
    pub fn init(&mut self, display: &dyn Display) {
        if self.is_initialized() {
            return;
        }
        self.cell = (display.cell_width(), display.cell_height());
        self.taskbar = Some(Taskbar::new(
            display.width(),
            display.height(),
            self.config.theme,
            self.config.clock_offset_hours,
        ));
        log_info!("desktop: init {}x{}", display.width(), display.height());
        if let Err(err) = self.spawn_terminal(self.config.initial_terminal) {
            log_error!("desktop: initial terminal failed: {}", err);
        }
    }

    pub fn wm(&self) -> &WindowManager {
        &self.wm
    }

    pub fn terminals(&self) -> &TerminalPool {
        &self.terminals
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn spawn_terminal(&mut self, origin: Point) -> Result<WindowId, WmError> {
        let (w, h) = terminal::window_size(self.cell.0, self.cell.1);
        let id = self.wm.create(Rect::new(origin.x, origin.y, w, h), "Terminal")?;
        let theme = self.config.theme;
        if let Err(err) = self.terminals.attach(id, theme.terminal_fg, theme.terminal_bg) {
            let _ = self.wm.destroy(id);
            return Err(err);
        }
        self.wm.set_content(id, ContentKind::Terminal)?;
        self.wm.set_bg_color(id, theme.terminal_bg)?;
        log_info!("desktop: terminal spawned in {}", id);
        Ok(id)
    }

    pub fn close_window(&mut self, id: WindowId) -> Result<(), WmError> {
        self.wm.destroy(id)?;
        self.release_content(id);
        Ok(())
    }

    fn release_content(&mut self, id: WindowId) {
        if self.terminals.release(id) {
            log_info!("desktop: terminal released from {}", id);
        }
        let held = match self.interaction {
            Interaction::Dragging { window, .. } | Interaction::Resizing { window, .. } => Some(window),
            Interaction::Idle => None,
        };
        if held == Some(id) {
            self.set_interaction(Interaction::Idle);
        }
    }

    fn set_interaction(&mut self, next: Interaction) {
        match next {
            Interaction::Idle => log_debug!("desktop: idle"),
            Interaction::Dragging { window, .. } => log_debug!("desktop: dragging {}", window),
            Interaction::Resizing { window, edges, .. } => {
                log_debug!("desktop: resizing {} edges {:#x}", window, edges.bits())
            }
        }
        self.interaction = next;
    }

    pub fn draw(&self, dev: &mut Devices<'_>) {
        let display = &mut *dev.display;
        let (sw, sh) = (display.width(), display.height());
        display.fill_rect(Rect::new(0, 0, sw, sh - TASKBAR_HEIGHT), self.config.theme.desktop_bg);
        self.wm.draw_all(display, &self.terminals);
        if let Some(taskbar) = &self.taskbar {
            taskbar.draw(display, dev.clock.now());
        }
        self.draw_cursor(display, self.mouse.x, self.mouse.y);
        display.swap();
    }

    fn draw_cursor(&self, display: &mut dyn Display, x: i32, y: i32) {
        let theme = &self.config.theme;
        for (row, line) in CURSOR.iter().enumerate() {
            for (col, &px) in line.iter().enumerate() {
                let color = match px {
                    1 => theme.cursor_fill,
                    2 => theme.cursor_outline,
                    _ => continue,
                };
                display.draw_pixel(x + col as i32, y + row as i32, color);
            }
        }
    }

    /// One iteration of the loop, without pacing.
    pub fn frame(&mut self, dev: &mut Devices<'_>) {
        self.init(&*dev.display);
        self.draw(dev);
        self.process_keys(dev);
        dev.mouse.poll();
        let snapshot = MouseSnapshot::sample(&*dev.mouse, &self.mouse);
        let screen = (dev.display.width(), dev.display.height());
        self.process_mouse(snapshot, screen);
        self.mouse = snapshot;
    }

    pub fn run(&mut self, mut dev: Devices<'_>) -> ! {
        self.init(&*dev.display);
        loop {
            self.frame(&mut dev);
            dev.pacer.wait_for_tick();
        }
    }

    fn process_keys(&mut self, dev: &mut Devices<'_>) {
        for _ in 0..KEYS_PER_FRAME {
            let Some(byte) = dev.keyboard.poll() else {
                break;
            };
            let Some(key) = Key::from_byte(byte) else {
                continue;
            };
            if let Some(request) = self.wm.handle_key(key, &mut self.terminals) {
                // Put the farewell message on screen first.
                self.draw(dev);
                match request {
                    SystemRequest::Reboot => dev.system.reboot(),
                    SystemRequest::Halt => dev.system.halt(),
                }
            }
        }
    }

    fn process_mouse(&mut self, m: MouseSnapshot, screen: (i32, i32)) {
        match self.interaction {
            Interaction::Dragging { window, grab } => {
                if !m.left() {
                    self.set_interaction(Interaction::Idle);
                    return;
                }
                let Some(rect) = self.wm.window(window).map(|w| w.rect) else {
                    self.set_interaction(Interaction::Idle);
                    return;
                };
                let target = Point::new(m.x - grab.x, m.y - grab.y);
                let origin = drag_origin(target, (rect.w, rect.h), screen);
                let _ = self.wm.set_rect(window, Rect::new(origin.x, origin.y, rect.w, rect.h));
            }
            Interaction::Resizing {
                window,
                edges,
                anchor_rect,
                anchor_mouse,
            } => {
                if !m.left() {
                    self.set_interaction(Interaction::Idle);
                    return;
                }
                let delta = Point::new(m.x - anchor_mouse.x, m.y - anchor_mouse.y);
                let rect = resize_rect(anchor_rect, edges, delta, self.config.min_width, self.config.min_height);
                if self.wm.set_rect(window, rect).is_err() {
                    self.set_interaction(Interaction::Idle);
                }
            }
            Interaction::Idle => {
                if m.left_just_pressed() {
                    self.press(m);
                }
            }
        }
    }

    fn press(&mut self, m: MouseSnapshot) {
        if let Some(taskbar) = &self.taskbar {
            if taskbar.contains(m.x, m.y) {
                if let Some(TaskbarAction::SpawnTerminal) = taskbar.handle_click(m.x, m.y) {
                    if let Err(err) = self.spawn_terminal(self.config.spawned_terminal) {
                        log_warn!("desktop: start button spawn failed: {}", err);
                    }
                }
                return;
            }
        }

        let before = self.wm.focused();
        if let Some(id) = before {
            if self.try_begin(id, m) {
                return;
            }
        }

        if let MouseOutcome::Closed(id) = self.wm.handle_mouse(m.x, m.y, m.pressed) {
            self.release_content(id);
        }

        let after = self.wm.focused();
        if after != before {
            if let Some(id) = after {
                self.try_begin(id, m);
            }
        }
    }

    /// Starts a resize or drag of `id` if the press landed on its edge or
    /// titlebar.
    fn try_begin(&mut self, id: WindowId, m: MouseSnapshot) -> bool {
        let Some(rect) = self.wm.window(id).map(|w| w.rect) else {
            return false;
        };
        let edges = classify_edges(&rect, m.x, m.y, self.config.resize_grip);
        if !edges.is_empty() {
            self.set_interaction(Interaction::Resizing {
                window: id,
                edges,
                anchor_rect: rect,
                anchor_mouse: m.point(),
            });
            return true;
        }
        if in_drag_zone(&rect, m.x, m.y) {
            self.set_interaction(Interaction::Dragging {
                window: id,
                grab: Point::new(m.x - rect.x, m.y - rect.y),
            });
            return true;
        }
        false
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::testing::Rig;
    use crate::wm::close_button_rect;

    const W: i32 = 800;
    const H: i32 = 600;

    fn booted() -> (Desktop, Rig, WindowId) {
        let mut rig = Rig::new(W, H);
        let mut desktop = Desktop::new();
        desktop.frame(&mut rig.devices());
        let id = desktop.wm().focused().unwrap();
        (desktop, rig, id)
    }

    fn step(desktop: &mut Desktop, rig: &mut Rig, x: i32, y: i32, left: bool) {
        rig.mouse.set(x, y, left);
        desktop.frame(&mut rig.devices());
    }

    fn rect_of(desktop: &Desktop, id: WindowId) -> Rect {
        desktop.wm().window(id).unwrap().rect
    }

    #[test]
    fn init_is_idempotent_and_opens_one_terminal() {
        let (mut desktop, mut rig, id) = booted();
        desktop.init(&rig.display);
        desktop.frame(&mut rig.devices());
        assert_eq!(desktop.wm().registry().len(), 1);
        assert_eq!(desktop.terminals().len(), 1);
        let r = rect_of(&desktop, id);
        assert_eq!((r.x, r.y), (100, 80));
        assert_eq!((r.w, r.h), terminal::window_size(8, 16));
        let win = desktop.wm().window(id).unwrap();
        assert_eq!(win.content, ContentKind::Terminal);
        assert_eq!(win.bg_color, Theme::CLASSIC.terminal_bg);
    }

    #[test]
    fn drag_clamps_to_screen_above_taskbar() {
        let (mut desktop, mut rig, id) = booted();
        let r = rect_of(&desktop, id);
        step(&mut desktop, &mut rig, 150, 90, true);
        assert!(matches!(desktop.interaction(), Interaction::Dragging { .. }));

        step(&mut desktop, &mut rig, 10, 5, true);
        let moved = rect_of(&desktop, id);
        assert_eq!((moved.x, moved.y), (0, 0));

        step(&mut desktop, &mut rig, 790, 590, true);
        let moved = rect_of(&desktop, id);
        assert_eq!((moved.x, moved.y), (W - r.w, H - TASKBAR_HEIGHT - r.h));

        step(&mut desktop, &mut rig, 160, 100, true);
        assert_eq!(rect_of(&desktop, id).origin(), Point::new(110, 90));

        step(&mut desktop, &mut rig, 400, 300, false);
        assert_eq!(desktop.interaction(), Interaction::Idle);
        let settled = rect_of(&desktop, id);
        step(&mut desktop, &mut rig, 20, 20, false);
        assert_eq!(rect_of(&desktop, id), settled);
    }

    #[test]
    fn resize_left_past_minimum_keeps_right_edge() {
        let (mut desktop, mut rig, id) = booted();
        let start = rect_of(&desktop, id);
        step(&mut desktop, &mut rig, start.x + 1, 300, true);
        match desktop.interaction() {
            Interaction::Resizing { edges, .. } => assert_eq!(edges, EdgeMask::LEFT),
            other => panic!("expected resize, got {other:?}"),
        }
        let push = start.w - desktop.config.min_width + 50;
        step(&mut desktop, &mut rig, start.x + 1 + push, 300, true);
        let r = rect_of(&desktop, id);
        assert_eq!(r.w, desktop.config.min_width);
        assert_eq!(r.right(), start.right());

        step(&mut desktop, &mut rig, start.x + 1 + push, 300, false);
        assert_eq!(desktop.interaction(), Interaction::Idle);
    }

    #[test]
    fn resize_bottom_right_corner_grows_both_axes() {
        let (mut desktop, mut rig, id) = booted();
        let start = rect_of(&desktop, id);
        let (cx, cy) = (start.right() - 1, start.bottom() - 1);
        step(&mut desktop, &mut rig, cx, cy, true);
        match desktop.interaction() {
            Interaction::Resizing { edges, .. } => assert_eq!(edges, EdgeMask::RIGHT | EdgeMask::BOTTOM),
            other => panic!("expected resize, got {other:?}"),
        }
        step(&mut desktop, &mut rig, cx - 30, cy - 20, true);
        let r = rect_of(&desktop, id);
        assert_eq!(r.origin(), start.origin());
        assert_eq!((r.w, r.h), (start.w - 30, start.h - 20));
    }

    #[test]
    fn resize_top_left_reanchors_at_minimum() {
        let anchor = Rect::new(200, 200, 300, 200);
        let r = resize_rect(anchor, EdgeMask::LEFT | EdgeMask::TOP, Point::new(500, 500), 160, 96);
        assert_eq!(r, Rect::new(500 - 160, 400 - 96, 160, 96));
        let r = resize_rect(anchor, EdgeMask::LEFT | EdgeMask::TOP, Point::new(-400, -400), 160, 96);
        assert_eq!((r.x, r.y), (0, 0));
        assert_eq!((r.w, r.h), (700, 600));
    }

    #[test]
    fn edge_classification() {
        let r = Rect::new(10, 10, 200, 100);
        assert_eq!(classify_edges(&r, 10, 10, 4), EdgeMask::LEFT | EdgeMask::TOP);
        assert_eq!(classify_edges(&r, 209, 60, 4), EdgeMask::RIGHT);
        assert_eq!(classify_edges(&r, 100, 109, 4), EdgeMask::BOTTOM);
        assert!(classify_edges(&r, 100, 60, 4).is_empty());
        assert!(classify_edges(&r, 9, 60, 4).is_empty());
        assert!(in_drag_zone(&r, 20, 20));
        assert!(!in_drag_zone(&r, 210 - 2 - 20, 20));
        assert!(!in_drag_zone(&r, 20, 10 + TITLEBAR_HEIGHT));
    }

    #[test]
    fn drag_origin_clamps_exactly_to_bounds() {
        let size = (200, 100);
        let screen = (W, H);
        assert_eq!(drag_origin(Point::new(-5, -7), size, screen), Point::new(0, 0));
        assert_eq!(drag_origin(Point::new(700, 600), size, screen), Point::new(600, H - TASKBAR_HEIGHT - 100));
        assert_eq!(drag_origin(Point::new(30, 40), size, screen), Point::new(30, 40));
    }

    #[test]
    fn start_button_spawns_focused_terminal() {
        let (mut desktop, mut rig, first) = booted();
        step(&mut desktop, &mut rig, 10, H - 20, true);
        assert_eq!(desktop.interaction(), Interaction::Idle);
        let second = desktop.wm().focused().unwrap();
        assert_ne!(second, first);
        assert_eq!(rect_of(&desktop, second).origin(), Point::new(50, 50));
        assert_eq!(desktop.terminals().len(), 2);

        // Held button does not spawn again.
        step(&mut desktop, &mut rig, 10, H - 20, true);
        assert_eq!(desktop.terminals().len(), 2);
        step(&mut desktop, &mut rig, 300, H - 20, false);
        step(&mut desktop, &mut rig, 300, H - 20, true);
        assert_eq!(desktop.terminals().len(), 2);
    }

    #[test]
    fn close_button_releases_terminal() {
        let (mut desktop, mut rig, id) = booted();
        let close = close_button_rect(&rect_of(&desktop, id));
        step(&mut desktop, &mut rig, close.x + 3, close.y + 3, true);
        assert!(desktop.wm().window(id).is_none());
        assert!(desktop.terminals().is_empty());
        assert_eq!(desktop.wm().focused(), None);
        assert_eq!(desktop.interaction(), Interaction::Idle);
    }

    #[test]
    fn clicking_back_titlebar_raises_and_drags_in_one_press() {
        let (mut desktop, mut rig, first) = booted();
        let second = desktop.spawn_terminal(Point::new(50, 50)).unwrap();
        assert_eq!(desktop.wm().focused(), Some(second));
        // On the first window's titlebar, clear of the second window.
        let r1 = rect_of(&desktop, first);
        let (px, py) = (r1.right() - 40, r1.y + 10);
        assert!(!rect_of(&desktop, second).contains(px, py));

        step(&mut desktop, &mut rig, px, py, true);
        assert_eq!(desktop.wm().focused(), Some(first));
        assert!(matches!(desktop.interaction(), Interaction::Dragging { window, .. } if window == first));
        step(&mut desktop, &mut rig, px - 10, py + 5, true);
        assert_eq!(rect_of(&desktop, first).origin(), Point::new(r1.x - 10, r1.y + 5));
    }

    #[test]
    fn keys_reach_focused_terminal() {
        let (mut desktop, mut rig, id) = booted();
        rig.keys.push_str("aj echo hi\n");
        desktop.frame(&mut rig.devices());
        let term = desktop.terminals().get(id).unwrap();
        assert_eq!(term.row_text(3).as_str(), "AJOS> aj echo hi");
        assert_eq!(term.row_text(4).as_str(), "hi");
        assert_eq!(term.row_text(5).as_str(), "AJOS>");
    }

    #[test]
    fn power_commands_reach_system_control() {
        let (mut desktop, mut rig, _) = booted();
        rig.keys.push_str("aj reboot\n");
        desktop.frame(&mut rig.devices());
        assert_eq!(rig.system.reboots, 1);
        rig.keys.push_str("aj halt\n");
        desktop.frame(&mut rig.devices());
        assert_eq!(rig.system.halts, 1);
    }

    #[test]
    fn frame_paints_background_taskbar_and_cursor() {
        let (mut desktop, mut rig, _) = booted();
        step(&mut desktop, &mut rig, 20, 20, false);
        step(&mut desktop, &mut rig, 20, 20, false);
        let theme = Theme::CLASSIC;
        assert_eq!(rig.display.pixel(5, 5), theme.desktop_bg);
        assert_eq!(rig.display.pixel(400, H - 10), theme.taskbar_bg);
        assert_eq!(rig.display.pixel(20, 20), theme.cursor_outline);
        assert_eq!(rig.display.pixel(21, 22), theme.cursor_fill);
        assert_eq!(rig.display.swaps, 3);
        assert_eq!(rig.mouse.polls, 3);
    }
}
