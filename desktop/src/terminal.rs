//! Terminal emulator: character grid, line editor and command history.

use heapless::{HistoryBuffer, String as HString};

use crate::commands;
use crate::config::{MAX_WINDOWS, TITLEBAR_HEIGHT, WINDOW_BORDER};
use crate::error::WmError;
use crate::geometry::Rect;
use crate::hal::{Color, Display};
use crate::keys::Key;
use crate::window::{ContentKind, WindowId};
use crate::wm::{ContentHost, WindowContent};

pub const ROWS: usize = 24;
pub const COLS: usize = 80;
pub const INPUT_CAPACITY: usize = 255;
pub const HISTORY_CAPACITY: usize = 16;
pub const PROMPT: &str = "AJOS> ";
pub const BANNER: &str = "AJOS Terminal v0.1\nType 'aj help' for commands.\n\n";
/// Gap between the content edge and the first glyph cell.
pub const GRID_PADDING: i32 = 4;

const TAB_WIDTH: usize = 4;

pub type InputLine = HString<INPUT_CAPACITY>;

/// Power effect a command asks the host to carry out.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SystemRequest {
    Reboot,
    Halt,
}

/// Outer window size that fits the whole grid plus padding.
pub fn window_size(cell_w: i32, cell_h: i32) -> (i32, i32) {
    let content_w = COLS as i32 * cell_w + 2 * GRID_PADDING;
    let content_h = ROWS as i32 * cell_h + 2 * GRID_PADDING;
    (
        content_w + 2 * WINDOW_BORDER + 4,
        content_h + TITLEBAR_HEIGHT + 2 * WINDOW_BORDER + 4,
    )
}

/// Draft captured when history browsing starts.
#[derive(Debug, Clone)]
struct Browse {
    index: usize,
    draft: InputLine,
    draft_cursor: usize,
}

pub struct Terminal {
    grid: [[u8; COLS]; ROWS],
    cursor_row: usize,
    cursor_col: usize,
    fg: Color,
    bg: Color,
    input: InputLine,
    input_cursor: usize,
    history: HistoryBuffer<InputLine, HISTORY_CAPACITY>,
    browse: Option<Browse>,
}

impl Terminal {
    /// Blank grid with nothing printed.
    pub fn blank(fg: Color, bg: Color) -> Self {
        Self {
            grid: [[0; COLS]; ROWS],
            cursor_row: 0,
            cursor_col: 0,
            fg,
            bg,
            input: InputLine::new(),
            input_cursor: 0,
            history: HistoryBuffer::new(),
            browse: None,
        }
    }

    /// Fresh session: banner and first prompt already on screen.
    pub fn new(fg: Color, bg: Color) -> Self {
        let mut term = Self::blank(fg, bg);
        term.print(BANNER);
        term.print(PROMPT);
        term
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    pub fn is_browsing(&self) -> bool {
        self.browse.is_some()
    }

    /// Recorded lines, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> + '_ {
        self.history.oldest_ordered().map(|line| line.as_str())
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Grid row with empty cells as spaces and trailing blanks trimmed.
    pub fn row_text(&self, row: usize) -> HString<COLS> {
        let mut out = HString::new();
        if let Some(cells) = self.grid.get(row) {
            let end = cells.iter().rposition(|c| *c != 0 && *c != b' ').map_or(0, |p| p + 1);
            for &c in &cells[..end] {
                let _ = out.push(if c == 0 { ' ' } else { c as char });
            }
        }
        out
    }

    pub fn putchar(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                self.cursor_col = 0;
                self.advance_row();
            }
            b'\r' => self.cursor_col = 0,
            0x08 => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                    self.grid[self.cursor_row][self.cursor_col] = b' ';
                }
            }
            b'\t' => {
                let stop = ((self.cursor_col / TAB_WIDTH + 1) * TAB_WIDTH).min(COLS);
                while self.cursor_col < stop {
                    self.grid[self.cursor_row][self.cursor_col] = b' ';
                    self.cursor_col += 1;
                }
            }
            0x20..=0x7E => {
                if self.cursor_col >= COLS {
                    return;
                }
                self.grid[self.cursor_row][self.cursor_col] = byte;
                self.cursor_col += 1;
                if self.cursor_col >= COLS {
                    self.cursor_col = 0;
                    self.advance_row();
                }
            }
            _ => {}
        }
    }

    pub fn print(&mut self, text: &str) {
        for byte in text.bytes() {
            self.putchar(byte);
        }
    }

    pub fn clear(&mut self) {
        self.grid = [[0; COLS]; ROWS];
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    fn advance_row(&mut self) {
        self.cursor_row += 1;
        if self.cursor_row >= ROWS {
            self.scroll();
            self.cursor_row = ROWS - 1;
        }
    }

    fn scroll(&mut self) {
        self.grid.copy_within(1.., 0);
        self.grid[ROWS - 1] = [0; COLS];
    }

    /// Draws as much of the grid as fits in `content`.
    pub fn render(&self, content: Rect, display: &mut dyn Display) {
        let cw = display.cell_width();
        let ch = display.cell_height();
        if cw <= 0 || ch <= 0 {
            return;
        }
        let cols = ((content.w - 2 * GRID_PADDING) / cw).clamp(0, COLS as i32) as usize;
        let rows = ((content.h - 2 * GRID_PADDING) / ch).clamp(0, ROWS as i32) as usize;
        let base_x = content.x + GRID_PADDING;
        let base_y = content.y + GRID_PADDING;

        for (r, cells) in self.grid.iter().take(rows).enumerate() {
            let y = base_y + r as i32 * ch;
            for (c, &cell) in cells.iter().take(cols).enumerate() {
                let glyph = if cell == 0 { b' ' } else { cell };
                display.draw_char(base_x + c as i32 * cw, y, glyph, self.fg, self.bg);
            }
        }

        if self.cursor_row < rows && self.cursor_col < cols {
            let x = base_x + self.cursor_col as i32 * cw;
            let y = base_y + self.cursor_row as i32 * ch;
            display.fill_rect(Rect::new(x, y, cw, ch), self.fg);
        }
    }

    pub fn key(&mut self, key: Key) -> Option<SystemRequest> {
        match key {
            Key::Char(byte) => {
                self.browse = None;
                self.insert(byte);
                None
            }
            Key::Backspace => {
                self.browse = None;
                self.erase();
                None
            }
            Key::Enter => self.submit(),
            Key::Up => {
                self.history_prev();
                None
            }
            Key::Down => {
                self.history_next();
                None
            }
            Key::Tab | Key::Escape | Key::Left | Key::Right => None,
        }
    }

    fn insert(&mut self, byte: u8) {
        if self.input.len() >= INPUT_CAPACITY || self.input.push(byte as char).is_err() {
            log_debug!("terminal: input line full, dropped {:#04x}", byte);
            return;
        }
        self.input_cursor = self.input.len();
        self.putchar(byte);
    }

    fn erase(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input.pop();
        self.input_cursor = self.input.len();
        self.putchar(0x08);
    }

    fn submit(&mut self) -> Option<SystemRequest> {
        self.putchar(b'\n');
        let line = self.input.clone();
        let trimmed = line.trim();
        if !trimmed.is_empty() && self.history.recent().map(|last| last.as_str()) != Some(trimmed) {
            let mut entry = InputLine::new();
            let _ = entry.push_str(trimmed);
            self.history.write(entry);
        }
        self.browse = None;
        let request = commands::execute(self, line.as_str());
        self.input.clear();
        self.input_cursor = 0;
        request
    }

    fn history_prev(&mut self) {
        let len = self.history.len();
        let index = match &self.browse {
            Some(browse) => browse.index,
            None => {
                if len == 0 {
                    return;
                }
                self.browse = Some(Browse {
                    index: len,
                    draft: self.input.clone(),
                    draft_cursor: self.input_cursor,
                });
                len
            }
        };
        if index == 0 {
            return;
        }
        self.show_history(index - 1);
    }

    fn history_next(&mut self) {
        let Some(index) = self.browse.as_ref().map(|b| b.index) else {
            return;
        };
        if index + 1 >= self.history.len() {
            if let Some(browse) = self.browse.take() {
                self.replace_input(browse.draft.as_str());
                self.input_cursor = browse.draft_cursor.min(self.input.len());
            }
            return;
        }
        self.show_history(index + 1);
    }

    fn show_history(&mut self, index: usize) {
        let Some(entry) = self.history.oldest_ordered().nth(index).cloned() else {
            return;
        };
        if let Some(browse) = self.browse.as_mut() {
            browse.index = index;
        }
        self.replace_input(entry.as_str());
    }

    /// Backspaces the visible input away, then types `text` in its place.
    fn replace_input(&mut self, text: &str) {
        for _ in 0..self.input.len() {
            self.putchar(0x08);
        }
        self.input.clear();
        let _ = self.input.push_str(text);
        self.input_cursor = self.input.len();
        self.print(text);
    }
}

impl WindowContent for Terminal {
    fn draw(&self, content: Rect, display: &mut dyn Display) {
        self.render(content, display);
    }

    fn handle_key(&mut self, key: Key) -> Option<SystemRequest> {
        self.key(key)
    }
}

struct Session {
    window: WindowId,
    terminal: Terminal,
}

/// Terminal sessions keyed by the window that shows them.
pub struct TerminalPool {
    sessions: [Option<Session>; MAX_WINDOWS],
}

impl TerminalPool {
    pub fn new() -> Self {
        Self {
            sessions: core::array::from_fn(|_| None),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Binds a fresh session to `window`.
    pub fn attach(&mut self, window: WindowId, fg: Color, bg: Color) -> Result<&mut Terminal, WmError> {
        let Some(free) = self.sessions.iter_mut().find(|s| s.is_none()) else {
            return Err(WmError::ResourceExhausted { capacity: MAX_WINDOWS });
        };
        let session = free.insert(Session {
            window,
            terminal: Terminal::new(fg, bg),
        });
        Ok(&mut session.terminal)
    }

    pub fn release(&mut self, window: WindowId) -> bool {
        for slot in self.sessions.iter_mut() {
            if slot.as_ref().map(|s| s.window) == Some(window) {
                *slot = None;
                return true;
            }
        }
        false
    }

    pub fn get(&self, window: WindowId) -> Option<&Terminal> {
        self.sessions
            .iter()
            .flatten()
            .find(|s| s.window == window)
            .map(|s| &s.terminal)
    }

    pub fn get_mut(&mut self, window: WindowId) -> Option<&mut Terminal> {
        self.sessions
            .iter_mut()
            .flatten()
            .find(|s| s.window == window)
            .map(|s| &mut s.terminal)
    }
}

impl Default for TerminalPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHost for TerminalPool {
    fn content(&self, id: WindowId, kind: ContentKind) -> Option<&dyn WindowContent> {
        match kind {
            ContentKind::Terminal => self.get(id).map(|t| t as &dyn WindowContent),
            ContentKind::None => None,
        }
    }

    fn content_mut(&mut self, id: WindowId, kind: ContentKind) -> Option<&mut dyn WindowContent> {
        match kind {
            ContentKind::Terminal => self.get_mut(id).map(|t| t as &mut dyn WindowContent),
            ContentKind::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDisplay;
    use crate::window::WindowRegistry;

    fn term() -> Terminal {
        Terminal::blank(0xC0C0C0, 0)
    }

    fn type_line(t: &mut Terminal, text: &str) -> Option<SystemRequest> {
        for b in text.bytes() {
            t.key(Key::Char(b));
        }
        t.key(Key::Enter)
    }

    #[test]
    fn printable_past_width_wraps_to_next_row() {
        let mut t = term();
        for _ in 0..COLS {
            t.putchar(b'x');
        }
        assert_eq!(t.cursor(), (1, 0));
        t.putchar(b'y');
        assert_eq!(t.cursor(), (1, 1));
        assert_eq!(t.row_text(1).as_str(), "y");
        assert_eq!(t.row_text(0).len(), COLS);
    }

    #[test]
    fn wrap_on_last_row_scrolls() {
        let mut t = term();
        t.print("first");
        for _ in 0..ROWS - 1 {
            t.putchar(b'\n');
        }
        assert_eq!(t.cursor(), (ROWS - 1, 0));
        t.print("bottom");
        for _ in 0..COLS - 6 {
            t.putchar(b'z');
        }
        assert_eq!(t.cursor(), (ROWS - 1, 0));
        assert_eq!(t.row_text(0).as_str(), "");
        assert!(t.row_text(ROWS - 2).as_str().starts_with("bottom"));
        assert_eq!(t.row_text(ROWS - 1).as_str(), "");
    }

    #[test]
    fn control_bytes() {
        let mut t = term();
        t.print("ab\tc");
        assert_eq!(t.row_text(0).as_str(), "ab  c");
        t.putchar(0x08);
        t.putchar(0x08);
        assert_eq!(t.cursor(), (0, 3));
        t.putchar(b'\r');
        assert_eq!(t.cursor(), (0, 0));
        t.putchar(0x08);
        assert_eq!(t.cursor(), (0, 0));
        t.putchar(0x07);
        t.putchar(0xC3);
        assert_eq!(t.cursor(), (0, 0));

        for _ in 0..COLS - 2 {
            t.putchar(b' ');
        }
        t.putchar(b'\t');
        assert_eq!(t.cursor(), (0, COLS));
    }

    #[test]
    fn consecutive_duplicates_are_not_recorded() {
        let mut t = term();
        type_line(&mut t, "a");
        type_line(&mut t, "b");
        type_line(&mut t, "b");
        type_line(&mut t, "   ");
        let recorded: std::vec::Vec<&str> = t.history().collect();
        assert_eq!(recorded, ["a", "b"]);
    }

    #[test]
    fn history_ring_overwrites_oldest() {
        let mut t = term();
        for i in 0..HISTORY_CAPACITY + 2 {
            type_line(&mut t, &std::format!("cmd{i}"));
        }
        assert_eq!(t.history_len(), HISTORY_CAPACITY);
        assert_eq!(t.history().next(), Some("cmd2"));
    }

    #[test]
    fn up_with_empty_history_keeps_input() {
        let mut t = term();
        t.key(Key::Char(b'q'));
        t.key(Key::Up);
        assert_eq!(t.input(), "q");
        assert!(!t.is_browsing());
    }

    #[test]
    fn up_up_down_down_walks_history_and_restores_draft() {
        let mut t = term();
        type_line(&mut t, "a");
        type_line(&mut t, "b");

        t.key(Key::Up);
        assert_eq!(t.input(), "b");
        t.key(Key::Up);
        assert_eq!(t.input(), "a");
        t.key(Key::Up);
        assert_eq!(t.input(), "a");
        t.key(Key::Down);
        assert_eq!(t.input(), "b");
        t.key(Key::Down);
        assert_eq!(t.input(), "");
        assert!(!t.is_browsing());
        t.key(Key::Down);
        assert_eq!(t.input(), "");
    }

    #[test]
    fn draft_survives_browse_and_typing_exits_without_restore() {
        let mut t = term();
        type_line(&mut t, "one");
        for b in b"dra" {
            t.key(Key::Char(*b));
        }
        t.key(Key::Up);
        assert_eq!(t.input(), "one");
        t.key(Key::Down);
        assert_eq!(t.input(), "dra");

        t.key(Key::Up);
        t.key(Key::Char(b'!'));
        assert!(!t.is_browsing());
        assert_eq!(t.input(), "one!");
        t.key(Key::Down);
        assert_eq!(t.input(), "one!");
    }

    #[test]
    fn input_line_drops_overflow() {
        let mut t = term();
        for _ in 0..INPUT_CAPACITY + 10 {
            t.key(Key::Char(b'k'));
        }
        assert_eq!(t.input().len(), INPUT_CAPACITY);
        let mut empty = term();
        empty.key(Key::Backspace);
        assert_eq!(empty.cursor(), (0, 0));
    }

    #[test]
    fn render_clips_to_content_area() {
        let mut t = term();
        t.print("hello world");
        let mut display = TestDisplay::new(800, 600);
        // Room for 5 columns and 2 rows.
        let content = Rect::new(0, 0, 5 * 8 + 2 * GRID_PADDING + 3, 2 * 16 + 2 * GRID_PADDING);
        t.render(content, &mut display);
        assert_eq!(display.char_at(GRID_PADDING, GRID_PADDING), Some(b'h'));
        assert_eq!(display.char_at(GRID_PADDING + 4 * 8, GRID_PADDING), Some(b'o'));
        assert_eq!(display.char_at(GRID_PADDING + 5 * 8, GRID_PADDING), None);
        assert_eq!(display.char_at(GRID_PADDING, GRID_PADDING + 2 * 16), None);
        // Cursor at column 11 is outside the visible columns.
        assert_ne!(display.pixel(GRID_PADDING + 11 * 8, GRID_PADDING), 0xC0C0C0);

        t.clear();
        t.render(content, &mut display);
        assert_eq!(display.pixel(GRID_PADDING + 1, GRID_PADDING + 1), 0xC0C0C0);
    }

    #[test]
    fn pool_sessions_are_independent() {
        let mut reg = WindowRegistry::new();
        let a = reg.insert(Rect::new(0, 0, 10, 10), "a", 0).unwrap();
        let b = reg.insert(Rect::new(0, 0, 10, 10), "b", 0).unwrap();
        let mut pool = TerminalPool::new();
        pool.attach(a, 1, 0).unwrap();
        pool.attach(b, 1, 0).unwrap();

        type_line(pool.get_mut(a).unwrap(), "aj version");
        assert_eq!(pool.get(a).unwrap().history_len(), 1);
        assert_eq!(pool.get(b).unwrap().history_len(), 0);
        assert!(pool.content(a, ContentKind::Terminal).is_some());
        assert!(pool.content(a, ContentKind::None).is_none());

        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert!(pool.get(a).is_none());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn new_session_shows_banner_and_prompt() {
        let t = Terminal::new(1, 0);
        assert_eq!(t.row_text(0).as_str(), "AJOS Terminal v0.1");
        assert_eq!(t.row_text(1).as_str(), "Type 'aj help' for commands.");
        assert_eq!(t.row_text(3).as_str(), "AJOS>");
        assert_eq!(t.cursor(), (3, PROMPT.len()));
        assert_eq!(window_size(8, 16), (8 * 80 + 8 + 8, 16 * 24 + 8 + 24 + 4 + 4));
    }
}
